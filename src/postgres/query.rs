use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use postgres::Row;
use postgres::types::Type;
use serde_json::Value;

use crate::error::{DriverError, Step};
use crate::query_utils::extract_column_names;
use crate::results::{ResultSet, shape_columns, shape_values};
use crate::types::{RowShape, SqlValue};

/// Extracts a `SqlValue` from a postgres row at the given index.
///
/// # Errors
/// Returns a `DriverError` at `Step::Fetch` if the column cannot be decoded.
pub fn postgres_extract_value(row: &Row, idx: usize) -> Result<SqlValue, DriverError> {
    let fetch_err = |e: postgres::Error| DriverError::postgres(Step::Fetch, &e);
    let ty = row.columns()[idx].type_().clone();

    let value = match ty {
        Type::INT2 => row
            .try_get::<_, Option<i16>>(idx)
            .map_err(fetch_err)?
            .map(|v| SqlValue::Int(i64::from(v))),
        Type::INT4 => row
            .try_get::<_, Option<i32>>(idx)
            .map_err(fetch_err)?
            .map(|v| SqlValue::Int(i64::from(v))),
        Type::INT8 => row
            .try_get::<_, Option<i64>>(idx)
            .map_err(fetch_err)?
            .map(SqlValue::Int),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(idx)
            .map_err(fetch_err)?
            .map(|v| SqlValue::Float(f64::from(v))),
        Type::FLOAT8 => row
            .try_get::<_, Option<f64>>(idx)
            .map_err(fetch_err)?
            .map(SqlValue::Float),
        Type::BOOL => row
            .try_get::<_, Option<bool>>(idx)
            .map_err(fetch_err)?
            .map(SqlValue::Bool),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(idx)
            .map_err(fetch_err)?
            .map(SqlValue::Timestamp),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)
            .map_err(fetch_err)?
            .map(|v| SqlValue::Timestamp(v.naive_utc())),
        Type::DATE => row
            .try_get::<_, Option<NaiveDate>>(idx)
            .map_err(fetch_err)?
            .map(|v| SqlValue::Text(v.to_string())),
        Type::JSON | Type::JSONB => row
            .try_get::<_, Option<Value>>(idx)
            .map_err(fetch_err)?
            .map(SqlValue::Json),
        Type::BYTEA => row
            .try_get::<_, Option<Vec<u8>>>(idx)
            .map_err(fetch_err)?
            .map(SqlValue::Blob),
        _ => row
            .try_get::<_, Option<String>>(idx)
            .map_err(|e| {
                DriverError::new(
                    Step::Fetch,
                    format!("column {idx} has unsupported type {}: {e}", ty.name()),
                )
            })?
            .map(SqlValue::Text),
    };

    Ok(value.unwrap_or(SqlValue::Null))
}

/// Build a result set using statement column metadata for the row keys.
///
/// # Errors
/// Returns a `DriverError` at `Step::Fetch` if a value cannot be decoded.
pub fn build_result_set(
    columns: &[postgres::Column],
    rows: &[Row],
    shape: RowShape,
) -> Result<ResultSet, DriverError> {
    let driver_columns = extract_column_names(columns, |col| col.name());
    let column_count = driver_columns.len();

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(shape_columns(shape, &driver_columns)));

    for row in rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        result_set.add_row_values(shape_values(shape, row_values));
    }

    Ok(result_set)
}
