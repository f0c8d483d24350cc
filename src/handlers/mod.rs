//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params) and the request's connection
//! 2. Runs exactly one parameterized statement on that connection
//! 3. Returns HTTP response (JSON, status code)

/// Car inventory endpoints
pub mod cars;
/// Greeting endpoint
pub mod root;
/// Registration and log-in endpoints
pub mod users;
