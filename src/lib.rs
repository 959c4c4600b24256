//! A small blocking query accessor: connect, prepare and execute named statements, run
//! one-off queries, then read the outcome back in a shape that depends on how many rows
//! came back.

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("enable at least one driver feature: `sqlite` or `postgres`");

pub mod config;
pub mod database;
pub mod driver;
pub mod error;
pub mod fetch;
pub mod params;
pub mod prelude;
pub mod query_utils;
pub mod results;
pub mod translation;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "test-utils-postgres")]
pub mod test_utils;

pub use config::{ConnectOptions, DatabaseConfig};
pub use database::{DEFAULT_STATEMENT, Database};
pub use driver::{Connection, Driver, FetchPlan};
pub use error::{AccessorError, DriverError, Operation, Step};
pub use fetch::{FetchMode, Fetched};
pub use params::Params;
pub use results::{ResultSet, Row};
pub use types::{DatabaseType, ErrorMode, RowShape, SqlValue};
