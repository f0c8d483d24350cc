//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use std::time::Duration;

use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;

use crate::db::session::{SessionSettings, SqlMode, TimeZone};

/// Configuration errors raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is missing or cannot be parsed into its expected type.
    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    /// A variable parsed but its value is not acceptable.
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `PORT` (optional): HTTP server port, defaults to 3000
/// - `DB_HOST`, `DB_USER`, `DB_NAME` (required): MySQL connection target
/// - `DB_PORT` (optional): MySQL port, defaults to 3306
/// - `DB_PASSWORD` (optional): MySQL password, defaults to empty
/// - `DB_POOL_SIZE` (optional): maximum pooled connections, defaults to 10
/// - `DB_ACQUIRE_TIMEOUT_SECS` (optional): how long a request waits for a connection, defaults to 30
/// - `DB_SQL_MODE` (optional): session `sql_mode`, defaults to `TRADITIONAL`
/// - `DB_TIME_ZONE` (optional): session `time_zone`, defaults to `-08:00`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    pub db_host: String,

    #[serde(default = "default_db_port")]
    pub db_port: u16,

    pub db_user: String,

    #[serde(default)]
    pub db_password: String,

    pub db_name: String,

    #[serde(default = "default_pool_size")]
    pub db_pool_size: u32,

    #[serde(default = "default_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    #[serde(default = "default_sql_mode")]
    pub db_sql_mode: String,

    #[serde(default = "default_time_zone")]
    pub db_time_zone: String,
}

/// Default port if PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_db_port() -> u16 {
    3306
}

fn default_pool_size() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

fn default_sql_mode() -> String {
    "TRADITIONAL".to_string()
}

fn default_time_zone() -> String {
    "-08:00".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DB_HOST)
    /// - Environment variable values cannot be parsed into expected types
    /// - Pool size or session settings are out of range
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of `(NAME, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        // Field names are automatically converted: db_host -> DB_HOST
        let config = envy::from_iter::<_, Config>(vars)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.db_pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: "DB_POOL_SIZE",
                reason: "must be at least 1".to_string(),
            });
        }
        self.session_settings()?;
        Ok(())
    }

    /// Connection options for the MySQL server.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.db_acquire_timeout_secs)
    }

    /// Per-connection session settings applied after every acquisition.
    pub fn session_settings(&self) -> Result<SessionSettings, ConfigError> {
        let sql_mode = SqlMode::parse(&self.db_sql_mode).map_err(|reason| ConfigError::Invalid {
            name: "DB_SQL_MODE",
            reason,
        })?;
        let time_zone =
            TimeZone::parse(&self.db_time_zone).map_err(|reason| ConfigError::Invalid {
                name: "DB_TIME_ZONE",
                reason,
            })?;

        Ok(SessionSettings {
            sql_mode,
            time_zone,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required() -> Vec<(String, String)> {
        vars(&[
            ("DB_HOST", "localhost"),
            ("DB_USER", "cars"),
            ("DB_NAME", "car_db"),
        ])
    }

    #[test]
    fn defaults_apply_when_optional_vars_missing() {
        let config = Config::from_vars(required()).expect("valid config");

        assert_eq!(config.port, 3000);
        assert_eq!(config.db_port, 3306);
        assert_eq!(config.db_password, "");
        assert_eq!(config.db_pool_size, 10);
        assert_eq!(config.acquire_timeout(), Duration::from_secs(30));
        assert_eq!(config.db_sql_mode, "TRADITIONAL");
        assert_eq!(config.db_time_zone, "-08:00");
    }

    #[test]
    fn overrides_are_read() {
        let mut env = required();
        env.extend(vars(&[
            ("PORT", "8080"),
            ("DB_PASSWORD", "secret"),
            ("DB_POOL_SIZE", "3"),
            ("DB_TIME_ZONE", "+00:00"),
        ]));

        let config = Config::from_vars(env).expect("valid config");

        assert_eq!(config.port, 8080);
        assert_eq!(config.db_password, "secret");
        assert_eq!(config.db_pool_size, 3);
        let session = config.session_settings().expect("valid session");
        assert_eq!(session.time_zone.as_str(), "+00:00");
    }

    #[test]
    fn missing_database_host_is_rejected() {
        let env = vars(&[("DB_USER", "cars"), ("DB_NAME", "car_db")]);

        let err = Config::from_vars(env).unwrap_err();
        assert!(matches!(err, ConfigError::Env(_)));
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let mut env = required();
        env.extend(vars(&[("DB_POOL_SIZE", "0")]));

        let err = Config::from_vars(env).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "DB_POOL_SIZE",
                ..
            }
        ));
    }

    #[test]
    fn quoted_sql_mode_is_rejected() {
        let mut env = required();
        env.extend(vars(&[("DB_SQL_MODE", "TRADITIONAL'; DROP TABLE cars; --")]));

        let err = Config::from_vars(env).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "DB_SQL_MODE",
                ..
            }
        ));
    }
}
