//! Password hashing utilities.
//!
//! Uses bcrypt with a per-hash random salt. Hashing is CPU bound, so the
//! async entry points run it on tokio's blocking thread pool.

use bcrypt::BcryptError;
use tokio::task::JoinError;

/// bcrypt work factor for newly stored passwords.
pub const HASH_COST: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Bcrypt(#[from] BcryptError),

    #[error("password hashing task failed: {0}")]
    Task(#[from] JoinError),
}

/// Hash a plaintext password for storage.
///
/// # Example
/// ```
/// use car_api_server::auth::password::{hash_password_blocking, verify_password_blocking};
///
/// let hash = hash_password_blocking("my_password").unwrap();
/// assert!(verify_password_blocking("my_password", &hash).unwrap());
/// ```
pub fn hash_password_blocking(password: &str) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(password, HASH_COST)?)
}

/// Check a plaintext password against a stored bcrypt hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the hash is malformed.
pub fn verify_password_blocking(password: &str, hash: &str) -> Result<bool, PasswordError> {
    Ok(bcrypt::verify(password, hash)?)
}

pub async fn hash_password(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password_blocking(&password)).await?
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password_blocking(&password, &hash)).await?
}
