//! Embedded `PostgreSQL` for running the postgres driver in tests.

use postgresql_embedded::blocking::PostgreSQL;
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::types::DatabaseType;

/// A running embedded server and a configuration that reaches its test database.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    pub config: DatabaseConfig,
}

/// Install (from the bundled archive), start, and create `db_name` on a fresh server.
///
/// # Errors
/// Returns an error if the server cannot be set up or started, or the database cannot be
/// created.
pub fn setup_postgres_embedded(
    db_name: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    let mut postgresql = PostgreSQL::default();
    postgresql.setup()?;
    postgresql.start()?;
    postgresql.create_database(db_name)?;

    let settings = postgresql.settings();
    let config = DatabaseConfig {
        host: Some(settings.host.clone()),
        port: Some(settings.port.to_string()),
        user: Some(settings.username.clone()),
        pass: Some(settings.password.clone()),
        name: Some(db_name.to_string()),
        db_type: DatabaseType::Postgres,
        ..DatabaseConfig::default()
    };
    debug!(dsn = %config.dsn(), "embedded postgres started");

    Ok(EmbeddedPostgres { postgresql, config })
}

/// Stop a server started by [`setup_postgres_embedded`].
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres { postgresql, .. } = postgres;
    let _ = postgresql.stop();
}
