// Postgres driver over the blocking `postgres` client, split into:
// - connection: the `Driver` implementation
// - params: `ToSql` for `SqlValue`
// - query: row value extraction and result set building

pub mod connection;
pub mod params;
pub mod query;

pub use connection::{PostgresDriver, PostgresStatement};
pub use query::{build_result_set, postgres_extract_value};
