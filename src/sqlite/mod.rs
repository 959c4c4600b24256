// SQLite driver, split into:
// - connection: the `Driver` implementation over one rusqlite connection
// - params: conversion of bound values into rusqlite values
// - query: running a statement and building the result set

pub mod connection;
pub mod params;
pub mod query;

pub use connection::{SqliteDriver, SqliteStatement};
pub use params::{Bound, sql_value_to_sqlite_value};
pub use query::{build_result_set, run_statement, sqlite_extract_value};
