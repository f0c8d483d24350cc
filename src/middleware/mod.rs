//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Attach request-scoped resources (a database connection)
//! - Short-circuit requests when those resources are unavailable

/// Per-request database connection middleware
pub mod connection;
