use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::{ConnectOptions, DatabaseConfig};
use crate::driver::{Connection, Driver, FetchPlan};
use crate::error::{AccessorError, DriverError, Operation};
use crate::fetch::{FetchMode, Fetched, shape};
use crate::params::Params;
use crate::query_utils::{is_blank, is_select, mentions_insert};
use crate::results::ResultSet;
use crate::types::ErrorMode;

/// Name used when a statement is prepared or executed without an explicit one.
pub const DEFAULT_STATEMENT: &str = "stmt";

struct PreparedStatement<S> {
    sql: String,
    handle: S,
}

/// Query accessor over a single driver connection.
///
/// Holds the outcome of the most recently executed statement (its rows and, for inserts,
/// the generated id) and a registry of named prepared statements. Every `query` or
/// `execute` replaces the previous outcome.
///
/// ```rust,no_run
/// use sql_accessor::prelude::*;
///
/// # fn main() -> Result<(), AccessorError> {
/// let mut db = Database::new(DatabaseConfig::sqlite("app.db"))?;
/// db.query("SELECT name FROM users WHERE id = 1", None)?;
/// if let Fetched::Scalar(name) = db.fetch_array(FetchMode::item("name")) {
///     println!("{name:?}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct Database<D: Driver = Connection> {
    config: DatabaseConfig,
    connection: D,
    statements: HashMap<String, PreparedStatement<D::Statement>>,
    results: ResultSet,
    last_id: Option<i64>,
}

impl Database<Connection> {
    /// Connect with whichever compiled-in driver `config.db_type` selects.
    ///
    /// # Errors
    ///
    /// Returns `AccessorError::Connection` if the driver cannot connect.
    pub fn new(config: DatabaseConfig) -> Result<Self, AccessorError> {
        Self::open(config)
    }
}

impl<D: Driver> Database<D> {
    /// Connect a driver of type `D` using `config`.
    ///
    /// # Errors
    ///
    /// Returns `AccessorError::Connection` if the driver cannot connect.
    pub fn open(config: DatabaseConfig) -> Result<Self, AccessorError> {
        let connection = Self::establish(&config)?;
        Ok(Self::with_driver(config, connection))
    }

    /// Wrap an already connected driver.
    #[must_use]
    pub fn with_driver(config: DatabaseConfig, connection: D) -> Self {
        Self {
            config,
            connection,
            statements: HashMap::new(),
            results: ResultSet::default(),
            last_id: None,
        }
    }

    fn establish(config: &DatabaseConfig) -> Result<D, AccessorError> {
        debug!(dsn = %config.dsn(), "connecting");
        D::connect(config).map_err(|e| fail(config.error_mode, Operation::Connect, e))
    }

    /// Re-establish the connection, merging `options` over the stored configuration.
    ///
    /// The stored configuration is only updated once the new connection succeeds. Prepared
    /// statements belong to the old connection and are discarded.
    ///
    /// # Errors
    ///
    /// Returns `AccessorError::Connection` if the driver cannot connect; the previous
    /// connection is kept in that case.
    pub fn connect(&mut self, options: ConnectOptions) -> Result<&mut Self, AccessorError> {
        let mut config = self.config.clone();
        options.apply(&mut config);
        let connection = Self::establish(&config)?;

        self.config = config;
        self.connection = connection;
        self.statements.clear();
        self.reset();
        Ok(self)
    }

    /// Compile `sql` and register it under `name`, replacing any statement of that name.
    ///
    /// # Errors
    ///
    /// Returns `AccessorError::Prepare` if the driver rejects the statement.
    pub fn prepare(&mut self, sql: &str, name: &str) -> Result<&mut Self, AccessorError> {
        let handle = self
            .connection
            .prepare(sql)
            .map_err(|e| fail(self.config.error_mode, Operation::Prepare, e))?;
        debug!(statement = name, "prepared");
        self.statements.insert(
            name.to_string(),
            PreparedStatement {
                sql: sql.to_string(),
                handle,
            },
        );
        Ok(self)
    }

    /// Execute the statement registered under `name`, bound to `params`.
    ///
    /// Rows are fetched when the statement returns any. If the registered SQL mentions
    /// `insert`, the connection's last generated id is captured.
    ///
    /// # Errors
    ///
    /// Returns `AccessorError::UnknownStatement` if nothing is registered under `name`,
    /// otherwise `Execution` or `Fetch` tagged with the failing step.
    pub fn execute(
        &mut self,
        params: impl Into<Params>,
        name: &str,
    ) -> Result<&mut Self, AccessorError> {
        self.reset();
        let params = params.into();
        let mode = self.config.error_mode;

        let Some(statement) = self.statements.get(name) else {
            let err = AccessorError::UnknownStatement {
                name: name.to_string(),
            };
            report(mode, &err);
            return Err(err);
        };

        let fetched = self
            .connection
            .execute(&statement.handle, &params, self.config.row_shape, FetchPlan::IfReadable)
            .map_err(|e| fail(mode, Operation::Execute, e))?;
        if let Some(results) = fetched {
            self.results = results;
        }

        if mentions_insert(&statement.sql) {
            self.last_id = Some(
                self.connection
                    .last_insert_id()
                    .map_err(|e| fail(mode, Operation::Execute, e))?,
            );
        }

        debug!(
            statement = name,
            rows = self.results.len(),
            insert_id = ?self.last_id,
            "executed"
        );
        Ok(self)
    }

    /// Run `sql` once, bound to `params` when any are given.
    ///
    /// Without parameters the SQL goes straight to the driver; with parameters it is compiled
    /// as a transient statement that is not registered. Rows are fetched only for statements
    /// that start with `SELECT`, and the last generated id is captured when the text mentions
    /// `insert`.
    ///
    /// # Errors
    ///
    /// Returns `AccessorError::EmptyQuery` for blank SQL without contacting the driver,
    /// otherwise `Prepare`, `Execution` or `Fetch` tagged with the failing step.
    pub fn query(
        &mut self,
        sql: &str,
        params: Option<Params>,
    ) -> Result<&mut Self, AccessorError> {
        self.reset();
        let mode = self.config.error_mode;
        if is_blank(sql) {
            report(mode, &AccessorError::EmptyQuery);
            return Err(AccessorError::EmptyQuery);
        }

        let plan = if is_select(sql) {
            FetchPlan::IfReadable
        } else {
            FetchPlan::Skip
        };
        let shape = self.config.row_shape;

        let fetched = match params {
            None => self.connection.query(sql, shape, plan),
            Some(params) => self
                .connection
                .prepare(sql)
                .and_then(|handle| self.connection.execute(&handle, &params, shape, plan)),
        }
        .map_err(|e| fail(mode, Operation::Query, e))?;
        if let Some(results) = fetched {
            self.results = results;
        }

        if mentions_insert(sql) {
            self.last_id = Some(
                self.connection
                    .last_insert_id()
                    .map_err(|e| fail(mode, Operation::Query, e))?,
            );
        }

        debug!(rows = self.results.len(), insert_id = ?self.last_id, "query finished");
        Ok(self)
    }

    /// Shape the current result set; see [`crate::fetch`] for the rules.
    #[must_use]
    pub fn fetch_array(&self, mode: FetchMode) -> Fetched {
        shape(&self.results, &mode)
    }

    /// Rows held from the most recent statement; 0 before anything has run.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.results.len()
    }

    /// Id generated by the most recent statement, if it was an insert.
    #[must_use]
    pub fn insert_id(&self) -> Option<i64> {
        self.last_id
    }

    /// Raw access to the current result set.
    #[must_use]
    pub fn result_set(&self) -> &ResultSet {
        &self.results
    }

    /// Overwrite an existing configuration key; unknown or unset keys are ignored.
    ///
    /// Takes effect on the next [`Database::connect`] for connection keys, immediately for
    /// `row_shape` and `error_mode`.
    ///
    /// # Errors
    ///
    /// Returns `AccessorError::Config` for an unrecognised value of a typed key.
    pub fn set_config(&mut self, key: &str, value: &str) -> Result<bool, AccessorError> {
        self.config.set_config(key, value)
    }

    #[must_use]
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// The SQL text registered under `name`.
    #[must_use]
    pub fn statement_sql(&self, name: &str) -> Option<&str> {
        self.statements.get(name).map(|s| s.sql.as_str())
    }

    /// The driver, for work this accessor does not wrap.
    pub fn driver(&mut self) -> &mut D {
        &mut self.connection
    }

    fn reset(&mut self) {
        self.results = ResultSet::default();
        self.last_id = None;
    }
}

fn fail(mode: ErrorMode, operation: Operation, err: DriverError) -> AccessorError {
    let err = AccessorError::from_driver(operation, err);
    report(mode, &err);
    err
}

fn report(mode: ErrorMode, err: &AccessorError) {
    if mode == ErrorMode::Warn {
        warn!(error = %err, "database operation failed");
    }
}
