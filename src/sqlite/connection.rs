use std::fmt;
use std::sync::Arc;

use super::query::run_statement;
use crate::config::DatabaseConfig;
use crate::driver::{Driver, FetchPlan};
use crate::error::{DriverError, Step};
use crate::params::Params;
use crate::results::ResultSet;
use crate::types::RowShape;

const MEMORY: &str = ":memory:";

/// Driver over a single rusqlite connection.
///
/// Statements are compiled through rusqlite's statement cache, so a handle only needs the
/// SQL text to find its compiled form again.
pub struct SqliteDriver {
    conn: rusqlite::Connection,
    path: String,
}

/// A statement compiled by [`SqliteDriver::prepare`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteStatement {
    sql: Arc<str>,
    column_count: usize,
}

impl SqliteStatement {
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of result columns; zero for statements that return no rows.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }
}

impl SqliteDriver {
    /// The underlying connection, for work this crate does not wrap.
    #[must_use]
    pub fn raw(&self) -> &rusqlite::Connection {
        &self.conn
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for SqliteDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDriver")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Driver for SqliteDriver {
    type Statement = SqliteStatement;

    fn connect(config: &DatabaseConfig) -> Result<Self, DriverError> {
        let path = config
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(MEMORY);
        let conn = rusqlite::Connection::open(path)
            .map_err(|e| DriverError::sqlite(Step::Connect, &e))?;
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    fn prepare(&mut self, sql: &str) -> Result<SqliteStatement, DriverError> {
        let stmt = self
            .conn
            .prepare_cached(sql)
            .map_err(|e| DriverError::sqlite(Step::Prepare, &e))?;
        Ok(SqliteStatement {
            sql: Arc::from(sql),
            column_count: stmt.column_count(),
        })
    }

    fn execute(
        &mut self,
        statement: &SqliteStatement,
        params: &Params,
        shape: RowShape,
        plan: FetchPlan,
    ) -> Result<Option<ResultSet>, DriverError> {
        // Cache hit unless the cache evicted it, in which case this recompiles.
        let mut stmt = self
            .conn
            .prepare_cached(&statement.sql)
            .map_err(|e| DriverError::sqlite(Step::Execute, &e))?;
        run_statement(&mut stmt, params, shape, plan)
    }

    fn query(
        &mut self,
        sql: &str,
        shape: RowShape,
        plan: FetchPlan,
    ) -> Result<Option<ResultSet>, DriverError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| DriverError::sqlite(Step::Execute, &e))?;
        run_statement(&mut stmt, &Params::None, shape, plan)
    }

    fn last_insert_id(&mut self) -> Result<i64, DriverError> {
        Ok(self.conn.last_insert_rowid())
    }
}
