//! Session settings applied to every connection right after it is acquired.

use sqlx::{Executor, MySqlConnection};

/// Validated value for MySQL's `sql_mode` session variable.
///
/// Only letters, digits, underscores and commas are accepted, so the value
/// can be written into a `SET` statement literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlMode(String);

impl SqlMode {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("must not be empty".to_string());
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == ','))
        {
            return Err(format!("unexpected character {bad:?}"));
        }
        Ok(Self(raw.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated value for MySQL's `time_zone` session variable.
///
/// Either a `+HH:MM` / `-HH:MM` offset or a named zone such as `UTC`,
/// `SYSTEM` or `America/Los_Angeles`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeZone(String);

impl TimeZone {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        match raw.chars().next() {
            None => Err("must not be empty".to_string()),
            Some('+' | '-') => Self::parse_offset(raw),
            Some(c) if c.is_ascii_alphabetic() => Self::parse_named(raw),
            Some(c) => Err(format!("unexpected leading character {c:?}")),
        }
    }

    fn parse_offset(raw: &str) -> Result<Self, String> {
        let invalid = || format!("{raw:?} is not a +HH:MM offset");
        let (hours, minutes) = raw[1..].split_once(':').ok_or_else(invalid)?;
        if hours.len() != 2 || minutes.len() != 2 {
            return Err(invalid());
        }
        let hours: u8 = hours.parse().map_err(|_| invalid())?;
        let minutes: u8 = minutes.parse().map_err(|_| invalid())?;
        if hours > 14 || minutes > 59 {
            return Err(format!("{raw:?} is out of range"));
        }
        Ok(Self(raw.to_string()))
    }

    fn parse_named(raw: &str) -> Result<Self, String> {
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '/' | '+' | '-')))
        {
            return Err(format!("unexpected character {bad:?}"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Settings every request-scoped connection runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub sql_mode: SqlMode,
    pub time_zone: TimeZone,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            sql_mode: SqlMode("TRADITIONAL".to_string()),
            time_zone: TimeZone("-08:00".to_string()),
        }
    }
}

impl SessionSettings {
    /// The statements [`configure`] sends, in order.
    pub fn statements(&self) -> [String; 2] {
        [
            format!("SET SESSION sql_mode = '{}'", self.sql_mode.as_str()),
            format!("SET time_zone = '{}'", self.time_zone.as_str()),
        ]
    }
}

/// Apply `settings` to a freshly acquired connection.
///
/// Pooled connections keep session state between leases, so this runs on
/// every acquisition rather than once per physical connection.
///
/// # Errors
///
/// Returns the first statement's error; later statements are not sent.
pub async fn configure(
    conn: &mut MySqlConnection,
    settings: &SessionSettings,
) -> Result<(), sqlx::Error> {
    for statement in settings.statements() {
        (&mut *conn).execute(statement.as_str()).await?;
    }
    Ok(())
}
