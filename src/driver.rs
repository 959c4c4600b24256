//! The database client surface the accessor consumes.
//!
//! A [`Driver`] owns one live connection and performs single round trips; it keeps no
//! result state of its own. [`Connection`] dispatches to whichever drivers are compiled in.

use crate::config::DatabaseConfig;
use crate::error::{DriverError, Step};
use crate::params::Params;
use crate::results::ResultSet;
use crate::types::{DatabaseType, RowShape};

#[cfg(feature = "postgres")]
use crate::postgres::PostgresDriver;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteDriver;

/// Whether rows are read back after a statement runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPlan {
    /// Fetch every row when the statement returns columns
    IfReadable,
    /// Run the statement and discard anything it returns
    Skip,
}

/// A blocking database client.
///
/// Every failure carries the [`Step`] that raised it.
pub trait Driver: Sized {
    /// A compiled statement handle.
    type Statement;

    /// Open a connection, selecting `config.name` as the active database when one is set.
    ///
    /// # Errors
    ///
    /// Returns a `DriverError` at `Step::Connect`.
    fn connect(config: &DatabaseConfig) -> Result<Self, DriverError>;

    /// Compile `sql`.
    ///
    /// # Errors
    ///
    /// Returns a `DriverError` at `Step::Prepare` when the driver rejects the statement.
    fn prepare(&mut self, sql: &str) -> Result<Self::Statement, DriverError>;

    /// Run a compiled statement bound to `params`.
    ///
    /// Returns `Some` rows when `plan` asked for them and the statement produced columns.
    ///
    /// # Errors
    ///
    /// Returns a `DriverError` at `Step::Execute` or `Step::Fetch`.
    fn execute(
        &mut self,
        statement: &Self::Statement,
        params: &Params,
        shape: RowShape,
        plan: FetchPlan,
    ) -> Result<Option<ResultSet>, DriverError>;

    /// Send `sql` for immediate execution without binding anything.
    ///
    /// # Errors
    ///
    /// Returns a `DriverError` at `Step::Execute` or `Step::Fetch`.
    fn query(
        &mut self,
        sql: &str,
        shape: RowShape,
        plan: FetchPlan,
    ) -> Result<Option<ResultSet>, DriverError>;

    /// The id generated by the most recent insert on this connection.
    ///
    /// # Errors
    ///
    /// Returns a `DriverError` at `Step::LastInsertId`.
    fn last_insert_id(&mut self) -> Result<i64, DriverError>;
}

/// A connection to any compiled-in driver, chosen by the configured [`DatabaseType`].
#[derive(Debug)]
pub enum Connection {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteDriver),
    #[cfg(feature = "postgres")]
    Postgres(PostgresDriver),
}

/// Compiled statement for a [`Connection`].
#[derive(Debug, Clone)]
pub enum Statement {
    #[cfg(feature = "sqlite")]
    Sqlite(<SqliteDriver as Driver>::Statement),
    #[cfg(feature = "postgres")]
    Postgres(<PostgresDriver as Driver>::Statement),
}

impl Connection {
    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "sqlite")]
            Connection::Sqlite(_) => DatabaseType::Sqlite,
            #[cfg(feature = "postgres")]
            Connection::Postgres(_) => DatabaseType::Postgres,
        }
    }
}

fn mismatched() -> DriverError {
    DriverError::new(
        Step::Execute,
        "statement was prepared on a different kind of connection",
    )
}

impl Driver for Connection {
    type Statement = Statement;

    fn connect(config: &DatabaseConfig) -> Result<Self, DriverError> {
        match config.db_type {
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => SqliteDriver::connect(config).map(Connection::Sqlite),
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => PostgresDriver::connect(config).map(Connection::Postgres),
            #[allow(unreachable_patterns)]
            other => Err(DriverError::new(
                Step::Connect,
                format!("{other:?} support is not compiled in; enable its cargo feature"),
            )),
        }
    }

    fn prepare(&mut self, sql: &str) -> Result<Statement, DriverError> {
        match self {
            #[cfg(feature = "sqlite")]
            Connection::Sqlite(driver) => driver.prepare(sql).map(Statement::Sqlite),
            #[cfg(feature = "postgres")]
            Connection::Postgres(driver) => driver.prepare(sql).map(Statement::Postgres),
        }
    }

    fn execute(
        &mut self,
        statement: &Statement,
        params: &Params,
        shape: RowShape,
        plan: FetchPlan,
    ) -> Result<Option<ResultSet>, DriverError> {
        match (self, statement) {
            #[cfg(feature = "sqlite")]
            (Connection::Sqlite(driver), Statement::Sqlite(stmt)) => {
                driver.execute(stmt, params, shape, plan)
            }
            #[cfg(feature = "postgres")]
            (Connection::Postgres(driver), Statement::Postgres(stmt)) => {
                driver.execute(stmt, params, shape, plan)
            }
            #[allow(unreachable_patterns)]
            _ => Err(mismatched()),
        }
    }

    fn query(
        &mut self,
        sql: &str,
        shape: RowShape,
        plan: FetchPlan,
    ) -> Result<Option<ResultSet>, DriverError> {
        match self {
            #[cfg(feature = "sqlite")]
            Connection::Sqlite(driver) => driver.query(sql, shape, plan),
            #[cfg(feature = "postgres")]
            Connection::Postgres(driver) => driver.query(sql, shape, plan),
        }
    }

    fn last_insert_id(&mut self) -> Result<i64, DriverError> {
        match self {
            #[cfg(feature = "sqlite")]
            Connection::Sqlite(driver) => driver.last_insert_id(),
            #[cfg(feature = "postgres")]
            Connection::Postgres(driver) => driver.last_insert_id(),
        }
    }
}
