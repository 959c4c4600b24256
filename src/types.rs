use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::AccessorError;

/// Values bound as statement parameters and read back from fetched rows.
///
/// Every driver converts to and from this one enum, so callers never branch on driver types:
/// ```rust
/// use sql_accessor::prelude::*;
///
/// let params = vec![
///     SqlValue::Int(1),
///     SqlValue::Text("alice".into()),
///     SqlValue::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    Json(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let SqlValue::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let SqlValue::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let SqlValue::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let SqlValue::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let SqlValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl From<JsonValue> for SqlValue {
    fn from(value: JsonValue) -> Self {
        SqlValue::Json(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// The database dialect behind the `type` configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `SQLite` database
    #[default]
    Sqlite,
    /// `PostgreSQL` database
    Postgres,
}

impl DatabaseType {
    /// Prefix used in the logged connection string.
    #[must_use]
    pub fn dsn_prefix(self) -> &'static str {
        match self {
            DatabaseType::Sqlite => "sqlite",
            DatabaseType::Postgres => "pgsql",
        }
    }
}

/// How each fetched row is keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowShape {
    /// Keyed by column name
    #[default]
    Assoc,
    /// Keyed by zero-based column position ("0", "1", ...)
    Num,
    /// Column name key followed by the positional key, for every column
    Both,
}

/// What happens around a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Return the error to the caller
    #[default]
    Raise,
    /// Emit a warning event, then return the error to the caller
    Warn,
}

/// Parse a configuration enum by its value name, case-insensitively.
///
/// # Errors
///
/// Returns `AccessorError::Config` naming the key when the value is not recognised.
pub(crate) fn parse_value_enum<T: ValueEnum>(key: &str, value: &str) -> Result<T, AccessorError> {
    if key == "type" && value.eq_ignore_ascii_case("mysql") {
        return Err(AccessorError::Config(
            "type: no mysql driver is available; use sqlite or postgres".to_string(),
        ));
    }
    T::from_str(value.trim(), true).map_err(|e| AccessorError::Config(format!("{key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_enums_parse_case_insensitively() {
        let ty: DatabaseType = parse_value_enum("type", "Postgres").unwrap();
        assert_eq!(ty, DatabaseType::Postgres);
        let shape: RowShape = parse_value_enum("row_shape", "BOTH").unwrap();
        assert_eq!(shape, RowShape::Both);
        assert!(parse_value_enum::<ErrorMode>("error_mode", "silent").is_err());
        assert!(matches!(
            parse_value_enum::<DatabaseType>("type", "mysql"),
            Err(AccessorError::Config(_))
        ));
    }

    #[test]
    fn accessors_coerce_the_way_callers_expect() {
        assert_eq!(SqlValue::Int(1).as_bool(), Some(&true));
        assert_eq!(SqlValue::Int(7).as_bool(), None);
        assert!(SqlValue::from(None::<i64>).is_null());
        let ts = SqlValue::from("2024-03-01 10:11:12").as_timestamp();
        assert!(ts.is_some());
        assert_eq!(SqlValue::Blob(vec![1, 2]).as_blob(), Some(&[1u8, 2][..]));
    }
}
