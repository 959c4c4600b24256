use rusqlite::types::Value;
use rusqlite::{Rows, Statement, ToSql, params_from_iter};

use crate::params::{Params, normalize_name};
use crate::types::SqlValue;

/// Convert a single `SqlValue` to a rusqlite `Value`.
#[must_use]
pub fn sql_value_to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        SqlValue::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        SqlValue::Null => Value::Null,
        SqlValue::Json(jval) => Value::Text(jval.to_string()),
        SqlValue::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Parameters converted for rusqlite, in the binding style the caller chose.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Positional(Vec<Value>),
    Named(Vec<(String, Value)>),
}

impl Bound {
    #[must_use]
    pub fn convert(params: &Params) -> Self {
        match params {
            Params::None => Bound::Positional(Vec::new()),
            Params::Positional(values) => {
                Bound::Positional(values.iter().map(sql_value_to_sqlite_value).collect())
            }
            Params::Named(values) => Bound::Named(
                values
                    .iter()
                    .map(|(name, value)| (normalize_name(name, ':'), sql_value_to_sqlite_value(value)))
                    .collect(),
            ),
        }
    }

    /// Run a statement that returns no columns.
    ///
    /// # Errors
    ///
    /// Returns the rusqlite error from binding or stepping the statement.
    pub fn execute(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        match self {
            Bound::Positional(values) => stmt.execute(params_from_iter(values.iter())),
            Bound::Named(values) => {
                let refs = named_refs(values);
                stmt.execute(refs.as_slice())
            }
        }
    }

    /// Bind and start a row-returning statement.
    ///
    /// # Errors
    ///
    /// Returns the rusqlite error from binding the parameters.
    pub fn query<'s>(&self, stmt: &'s mut Statement<'_>) -> rusqlite::Result<Rows<'s>> {
        match self {
            Bound::Positional(values) => stmt.query(params_from_iter(values.iter())),
            Bound::Named(values) => {
                let refs = named_refs(values);
                stmt.query(refs.as_slice())
            }
        }
    }
}

fn named_refs(values: &[(String, Value)]) -> Vec<(&str, &dyn ToSql)> {
    values
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect()
}
