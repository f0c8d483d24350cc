//! User data models and API request types.
//!
//! Users are created by registration and never modified afterwards.
//! Passwords are stored as bcrypt hashes only.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `user` table with columns:
/// - `id`: Auto-increment identifier
/// - `user_name`: Unique login name
/// - `password`: bcrypt hash of the password
/// - `admin_flag`: Whether the user is an administrator
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub user_name: String,
    pub password: String,
    pub admin_flag: bool,
}

/// Request body for `POST /register`.
///
/// # JSON Example
///
/// ```json
/// {
///   "username": "driver",
///   "password": "hunter2",
///   "userIsAdmin": false
/// }
/// ```
///
/// `userIsAdmin` may be omitted and defaults to `false`. Any JSON value is
/// accepted for it and read by [`truthy`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default, deserialize_with = "truthy")]
    pub user_is_admin: bool,
}

/// Loose boolean: `null`, `false`, `0` and `""` are false, everything else
/// (including `"false"`, `[]` and `{}`) is true.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Request body for `POST /log-in`.
#[derive(Debug, Deserialize)]
pub struct LogInRequest {
    pub username: String,
    pub password: String,
}

/// Body returned by endpoints that only report success.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_request_reads_camel_case_admin_flag() {
        let request: RegisterRequest = serde_json::from_value(json!({
            "username": "boss",
            "password": "pw",
            "userIsAdmin": true
        }))
        .unwrap();

        assert_eq!(request.username, "boss");
        assert!(request.user_is_admin);
    }

    #[test]
    fn register_request_admin_flag_defaults_to_false() {
        let request: RegisterRequest =
            serde_json::from_value(json!({ "username": "driver", "password": "pw" })).unwrap();

        assert!(!request.user_is_admin);
    }

    fn admin_flag(value: serde_json::Value) -> bool {
        serde_json::from_value::<RegisterRequest>(json!({
            "username": "driver",
            "password": "pw",
            "userIsAdmin": value
        }))
        .unwrap()
        .user_is_admin
    }

    #[test]
    fn register_request_admin_flag_accepts_truthy_values() {
        assert!(admin_flag(json!(1)));
        assert!(admin_flag(json!("yes")));
        assert!(admin_flag(json!("false")));
        assert!(admin_flag(json!({})));
        assert!(admin_flag(json!(-0.5)));
    }

    #[test]
    fn register_request_admin_flag_rejects_falsy_values() {
        assert!(!admin_flag(json!(0)));
        assert!(!admin_flag(json!("")));
        assert!(!admin_flag(json!(null)));
        assert!(!admin_flag(json!(false)));
    }

    #[test]
    fn success_response_shape() {
        assert_eq!(
            serde_json::to_value(SuccessResponse::ok()).unwrap(),
            json!({ "success": true })
        );
    }
}
