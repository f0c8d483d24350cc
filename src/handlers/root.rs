//! Root greeting endpoint.

/// Greeting text served at `/`.
pub const GREETING: &str = "Welcome to the Car API db";

/// `GET /`
///
/// Still runs behind the connection middleware, so it doubles as a check
/// that a configured connection can be obtained.
pub async fn index() -> &'static str {
    GREETING
}
