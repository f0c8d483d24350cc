//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request and response bodies of the HTTP API.

/// Car inventory model
pub mod car;
/// Registered user model
pub mod user;
