use std::fmt;
use std::sync::Arc;

use postgres::error::SqlState;
use postgres::{Client, NoTls};

use super::params::as_refs;
use super::query::build_result_set;
use crate::config::DatabaseConfig;
use crate::driver::{Driver, FetchPlan};
use crate::error::{DriverError, Step};
use crate::params::Params;
use crate::results::ResultSet;
use crate::translation::translate_placeholders;
use crate::types::RowShape;

/// Driver over one blocking postgres client.
pub struct PostgresDriver {
    client: Client,
    target: String,
}

/// A server-side prepared statement.
#[derive(Clone)]
pub struct PostgresStatement {
    sql: Arc<str>,
    inner: postgres::Statement,
}

impl PostgresStatement {
    /// The SQL sent to the server, after placeholder translation.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.inner.columns().len()
    }
}

impl fmt::Debug for PostgresStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresStatement")
            .field("sql", &self.sql)
            .field("columns", &self.column_count())
            .finish()
    }
}

impl fmt::Debug for PostgresDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDriver")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl PostgresDriver {
    /// Build the client configuration from the accessor's settings.
    ///
    /// # Errors
    ///
    /// Returns a `DriverError` at `Step::Connect` when the port is not a number.
    pub fn client_config(config: &DatabaseConfig) -> Result<postgres::Config, DriverError> {
        let mut pg = postgres::Config::new();
        pg.host(config.host.as_deref().unwrap_or("localhost"));
        if let Some(port) = config.port.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            let port = port
                .parse::<u16>()
                .map_err(|e| DriverError::new(Step::Connect, format!("invalid port {port:?}: {e}")))?;
            pg.port(port);
        }
        if let Some(user) = config.user.as_deref() {
            pg.user(user);
        }
        if let Some(pass) = config.pass.as_deref() {
            pg.password(pass);
        }
        if let Some(name) = config.name.as_deref() {
            pg.dbname(name);
        }
        Ok(pg)
    }

    fn run(
        &mut self,
        statement: &postgres::Statement,
        params: &Params,
        shape: RowShape,
        plan: FetchPlan,
    ) -> Result<Option<ResultSet>, DriverError> {
        let refs = as_refs(params)?;

        if statement.columns().is_empty() || plan == FetchPlan::Skip {
            self.client
                .execute(statement, &refs)
                .map_err(|e| DriverError::postgres(Step::Execute, &e))?;
            return Ok(None);
        }

        let rows = self
            .client
            .query(statement, &refs)
            .map_err(|e| DriverError::postgres(Step::Execute, &e))?;
        build_result_set(statement.columns(), &rows, shape).map(Some)
    }
}

impl Driver for PostgresDriver {
    type Statement = PostgresStatement;

    fn connect(config: &DatabaseConfig) -> Result<Self, DriverError> {
        let pg = Self::client_config(config)?;
        let client = pg
            .connect(NoTls)
            .map_err(|e| DriverError::postgres(Step::Connect, &e))?;
        Ok(Self {
            client,
            target: config.dsn(),
        })
    }

    fn prepare(&mut self, sql: &str) -> Result<PostgresStatement, DriverError> {
        let translated = translate_placeholders(sql);
        let inner = self
            .client
            .prepare(&translated)
            .map_err(|e| DriverError::postgres(Step::Prepare, &e))?;
        Ok(PostgresStatement {
            sql: Arc::from(translated.as_ref()),
            inner,
        })
    }

    fn execute(
        &mut self,
        statement: &PostgresStatement,
        params: &Params,
        shape: RowShape,
        plan: FetchPlan,
    ) -> Result<Option<ResultSet>, DriverError> {
        self.run(&statement.inner, params, shape, plan)
    }

    fn query(
        &mut self,
        sql: &str,
        shape: RowShape,
        plan: FetchPlan,
    ) -> Result<Option<ResultSet>, DriverError> {
        // Unnamed statement: compiled and run in one exchange, so failures count as execution.
        let statement = self
            .client
            .prepare(sql)
            .map_err(|e| DriverError::postgres(Step::Execute, &e))?;
        self.run(&statement, &Params::None, shape, plan)
    }

    /// `lastval()` for the session, or 0 when no sequence has been used yet.
    fn last_insert_id(&mut self) -> Result<i64, DriverError> {
        let row = match self.client.query_one("SELECT lastval()", &[]) {
            Ok(row) => row,
            Err(e) if lastval_undefined(&e) => return Ok(0),
            Err(e) => return Err(DriverError::postgres(Step::LastInsertId, &e)),
        };
        row.try_get::<_, i64>(0)
            .map_err(|e| DriverError::postgres(Step::LastInsertId, &e))
    }
}

// "lastval is not yet defined in this session": the insert touched no sequence.
fn lastval_undefined(err: &postgres::Error) -> bool {
    err.code() == Some(&SqlState::OBJECT_NOT_IN_PREREQUISITE_STATE)
}
