//! Database connection pool and per-connection session setup.
//!
//! This module provides:
//! - A bounded MySQL connection pool that counts every lease it hands out
//! - The session configurator run on each freshly acquired connection

pub mod pool;
pub mod session;

pub use pool::{ConnectionPool, DbConnection, Lease, PoolStats};
pub use session::SessionSettings;
