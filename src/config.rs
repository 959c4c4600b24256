use serde::{Deserialize, Serialize};

use crate::error::AccessorError;
use crate::types::{DatabaseType, ErrorMode, RowShape, parse_value_enum};

/// Connection and behaviour settings for a [`crate::Database`].
///
/// Optional keys that were never supplied are absent from the mapping, so
/// [`DatabaseConfig::set_config`] will not create them later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: Option<String>,
    pub port: Option<String>,
    pub user: Option<String>,
    pub pass: Option<String>,
    /// Database (schema) name; the file path for `SQLite`.
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub db_type: DatabaseType,
    pub row_shape: RowShape,
    pub error_mode: ErrorMode,
}

impl DatabaseConfig {
    /// An in-memory `SQLite` configuration.
    #[must_use]
    pub fn sqlite_memory() -> Self {
        Self::default()
    }

    /// A file-backed `SQLite` configuration.
    #[must_use]
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            name: Some(path.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_row_shape(mut self, row_shape: RowShape) -> Self {
        self.row_shape = row_shape;
        self
    }

    #[must_use]
    pub fn with_error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.error_mode = error_mode;
        self
    }

    /// Build a configuration from string key/value pairs.
    ///
    /// Recognised keys are `host`, `port`, `user`, `pass`, `name`, `type`, `row_shape` and
    /// `error_mode`; anything else is ignored.
    ///
    /// # Errors
    ///
    /// Returns `AccessorError::Config` if a typed key carries an unrecognised value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, AccessorError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "host" => config.host = Some(value),
                "port" => config.port = Some(value),
                "user" => config.user = Some(value),
                "pass" => config.pass = Some(value),
                "name" => config.name = Some(value),
                "type" => config.db_type = parse_value_enum("type", &value)?,
                "row_shape" => config.row_shape = parse_value_enum("row_shape", &value)?,
                "error_mode" => config.error_mode = parse_value_enum("error_mode", &value)?,
                _ => {}
            }
        }
        Ok(config)
    }

    /// Overwrite one key, but only if it already exists in the mapping.
    ///
    /// Unknown keys, and optional keys that were never set, are left alone. Returns whether
    /// a value was written.
    ///
    /// # Errors
    ///
    /// Returns `AccessorError::Config` if a typed key is given an unrecognised value.
    pub fn set_config(&mut self, key: &str, value: &str) -> Result<bool, AccessorError> {
        let slot = match key {
            "host" => &mut self.host,
            "port" => &mut self.port,
            "user" => &mut self.user,
            "pass" => &mut self.pass,
            "name" => &mut self.name,
            "type" => {
                self.db_type = parse_value_enum(key, value)?;
                return Ok(true);
            }
            "row_shape" => {
                self.row_shape = parse_value_enum(key, value)?;
                return Ok(true);
            }
            "error_mode" => {
                self.error_mode = parse_value_enum(key, value)?;
                return Ok(true);
            }
            _ => return Ok(false),
        };
        match slot {
            Some(existing) => {
                *existing = value.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// `host:port` when a non-empty port is configured, otherwise the bare host.
    #[must_use]
    pub fn host_with_port(&self) -> Option<String> {
        let host = self.host.as_deref()?;
        match self.port.as_deref().map(str::trim) {
            Some(port) if !port.is_empty() => Some(format!("{host}:{port}")),
            _ => Some(host.to_string()),
        }
    }

    /// Single-string rendering of the connection target, used in log events.
    #[must_use]
    pub fn dsn(&self) -> String {
        let name = self.name.as_deref().unwrap_or("");
        let host = self.host_with_port().unwrap_or_default();
        format!("{}:dbname={name};host={host}", self.db_type.dsn_prefix())
    }
}

/// Explicit overrides passed to `connect`; omitted keys keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    pub host: Option<String>,
    pub port: Option<String>,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub db_type: Option<DatabaseType>,
    pub row_shape: Option<RowShape>,
    pub error_mode: Option<ErrorMode>,
}

impl ConnectOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn pass(mut self, pass: impl Into<String>) -> Self {
        self.pass = Some(pass.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn db_type(mut self, db_type: DatabaseType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    #[must_use]
    pub fn row_shape(mut self, row_shape: RowShape) -> Self {
        self.row_shape = Some(row_shape);
        self
    }

    #[must_use]
    pub fn error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.error_mode = Some(error_mode);
        self
    }

    /// Merge these overrides into `config`.
    pub fn apply(self, config: &mut DatabaseConfig) {
        if let Some(host) = self.host {
            config.host = Some(host);
        }
        if let Some(port) = self.port {
            config.port = Some(port);
        }
        if let Some(user) = self.user {
            config.user = Some(user);
        }
        if let Some(pass) = self.pass {
            config.pass = Some(pass);
        }
        if let Some(name) = self.name {
            config.name = Some(name);
        }
        if let Some(db_type) = self.db_type {
            config.db_type = db_type;
        }
        if let Some(row_shape) = self.row_shape {
            config.row_shape = row_shape;
        }
        if let Some(error_mode) = self.error_mode {
            config.error_mode = error_mode;
        }
    }
}
