use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::Value;

use super::params::Bound;
use crate::driver::FetchPlan;
use crate::error::{DriverError, Step};
use crate::params::Params;
use crate::query_utils::extract_column_names;
use crate::results::{ResultSet, shape_columns, shape_values};
use crate::types::{RowShape, SqlValue};

/// Extract a `SqlValue` from a `SQLite` row.
///
/// # Errors
///
/// Returns the rusqlite error if the column cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<SqlValue> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Int(i),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    })
}

/// Run `stmt` bound to `params`, reading rows back when `plan` asks for them.
///
/// Statements without result columns are executed and yield `None`. For row-returning
/// statements the first step is the execution itself, so a failure there is reported at
/// `Step::Execute`; later steps are reported at `Step::Fetch`.
///
/// # Errors
///
/// Returns `DriverError` tagged with the failing step.
pub fn run_statement(
    stmt: &mut Statement<'_>,
    params: &Params,
    shape: RowShape,
    plan: FetchPlan,
) -> Result<Option<ResultSet>, DriverError> {
    let bound = Bound::convert(params);

    if stmt.column_count() == 0 {
        bound
            .execute(stmt)
            .map_err(|e| DriverError::sqlite(Step::Execute, &e))?;
        return Ok(None);
    }

    match plan {
        FetchPlan::Skip => {
            let mut rows = bound
                .query(stmt)
                .map_err(|e| DriverError::sqlite(Step::Execute, &e))?;
            while rows
                .next()
                .map_err(|e| DriverError::sqlite(Step::Execute, &e))?
                .is_some()
            {}
            Ok(None)
        }
        FetchPlan::IfReadable => build_result_set(stmt, &bound, shape).map(Some),
    }
}

/// Execute a row-returning statement and materialise every row.
///
/// # Errors
///
/// Returns `DriverError` at `Step::Execute` for binding and the first step, and at
/// `Step::Fetch` for reading later rows or column values.
pub fn build_result_set(
    stmt: &mut Statement<'_>,
    bound: &Bound,
    shape: RowShape,
) -> Result<ResultSet, DriverError> {
    let driver_columns = extract_column_names(stmt.column_names(), |name| *name);
    let column_count = driver_columns.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(shape_columns(shape, &driver_columns)));

    let mut rows = bound
        .query(stmt)
        .map_err(|e| DriverError::sqlite(Step::Execute, &e))?;

    let mut step = Step::Execute;
    while let Some(row) = rows.next().map_err(move |e| DriverError::sqlite(step, &e))? {
        step = Step::Fetch;
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            let value =
                sqlite_extract_value(row, idx).map_err(|e| DriverError::sqlite(Step::Fetch, &e))?;
            row_values.push(value);
        }
        result_set.add_row_values(shape_values(shape, row_values));
    }

    Ok(result_set)
}
