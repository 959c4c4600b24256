//! Convenient imports for common functionality.

pub use crate::config::{ConnectOptions, DatabaseConfig};
pub use crate::database::{DEFAULT_STATEMENT, Database};
pub use crate::driver::{Connection, Driver, FetchPlan};
pub use crate::error::{AccessorError, DriverError, Operation, Step};
pub use crate::fetch::{FetchMode, Fetched};
pub use crate::params::Params;
pub use crate::results::{ResultSet, Row};
pub use crate::types::{DatabaseType, ErrorMode, RowShape, SqlValue};

#[cfg(feature = "postgres")]
pub use crate::postgres::{PostgresDriver, PostgresStatement};
#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteDriver, SqliteStatement};
