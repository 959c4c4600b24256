//! Fetched rows and the result set that holds them.

mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::Row;

use crate::types::{RowShape, SqlValue};

/// Turn driver column names into the row keys for `shape`.
#[must_use]
pub fn shape_columns(shape: RowShape, names: &[String]) -> Vec<String> {
    match shape {
        RowShape::Assoc => names.to_vec(),
        RowShape::Num => (0..names.len()).map(|i| i.to_string()).collect(),
        RowShape::Both => names
            .iter()
            .enumerate()
            .flat_map(|(i, name)| [name.clone(), i.to_string()])
            .collect(),
    }
}

/// Expand one raw row of driver values to line up with [`shape_columns`].
#[must_use]
pub fn shape_values(shape: RowShape, values: Vec<SqlValue>) -> Vec<SqlValue> {
    match shape {
        RowShape::Assoc | RowShape::Num => values,
        RowShape::Both => values
            .into_iter()
            .flat_map(|value| [value.clone(), value])
            .collect(),
    }
}
