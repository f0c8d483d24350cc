//! Credential handling.
//!
//! - `password`: bcrypt hashing and verification for stored user passwords
//! - `token`: JWT signing used by the `generate-token` tool

pub mod password;
pub mod token;
