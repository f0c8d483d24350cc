//! JWT creation and verification for API tokens.
//!
//! The running server never issues tokens; the `generate-token` binary uses
//! [`sign`] to mint one from `JWT_KEY`.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims carried by an API token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: u64,
    pub username: String,
    pub user_is_admin: bool,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
}

impl TokenClaims {
    /// Claims for `username`, issued now.
    pub fn new(user_id: u64, username: impl Into<String>, user_is_admin: bool) -> Self {
        Self {
            user_id,
            username: username.into(),
            user_is_admin,
            iat: Utc::now().timestamp(),
        }
    }
}

/// Sign `claims` with HS256.
pub fn sign(claims: &TokenClaims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify an HS256 token and return its claims.
///
/// Tokens carry no expiry, so `exp` is not required.
pub fn verify(token: &str, secret: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.validate_exp = false;

    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}
