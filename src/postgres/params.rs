use std::error::Error;

use bytes::BytesMut;
use chrono::{DateTime, Utc};
use postgres::types::{IsNull, ToSql, Type, to_sql_checked};

use crate::error::{DriverError, Step};
use crate::params::Params;
use crate::types::SqlValue;

/// Borrow positional parameters in the form the postgres client binds.
///
/// # Errors
///
/// Returns a `DriverError` at `Step::Execute` for named parameters, which postgres
/// placeholders cannot address.
pub fn as_refs(params: &Params) -> Result<Vec<&(dyn ToSql + Sync)>, DriverError> {
    match params {
        Params::None => Ok(Vec::new()),
        Params::Positional(values) => Ok(values
            .iter()
            .map(|value| value as &(dyn ToSql + Sync))
            .collect()),
        Params::Named(_) => Err(DriverError::new(
            Step::Execute,
            "named parameters are not supported by the postgres driver; bind positionally",
        )),
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlValue::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                _ => i.to_sql(ty, out),
            },
            #[allow(clippy::cast_possible_truncation)]
            SqlValue::Float(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                _ => f.to_sql(ty, out),
            },
            SqlValue::Text(s) => s.to_sql(ty, out),
            SqlValue::Bool(b) => b.to_sql(ty, out),
            SqlValue::Timestamp(dt) => match *ty {
                Type::TIMESTAMPTZ => {
                    let utc: DateTime<Utc> = dt.and_utc();
                    utc.to_sql(ty, out)
                }
                _ => dt.to_sql(ty, out),
            },
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Json(jsval) => jsval.to_sql(ty, out),
            SqlValue::Blob(bytes) => bytes.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}
