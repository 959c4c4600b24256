//! Cardinality-aware shaping of the current result set.
//!
//! | rows | mode          | result                                        |
//! |------|---------------|-----------------------------------------------|
//! | 0    | any           | [`Fetched::Empty`]                            |
//! | >1   | any           | [`Fetched::Rows`] with every row              |
//! | 1    | `All`         | [`Fetched::Rows`] holding the single row      |
//! | 1    | `Item(name)`  | the value under `name`, or `Empty` if absent  |
//! | 1    | `Single`      | [`Fetched::Row`]                              |
//!
//! More than one row always yields the whole sequence, whatever mode was asked for.

use crate::results::{ResultSet, Row};
use crate::types::SqlValue;

/// What shape the caller would like back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// A lone row comes back unwrapped
    #[default]
    Single,
    /// A lone row comes back wrapped in a sequence
    All,
    /// A lone row yields just the value under this key
    Item(String),
}

impl FetchMode {
    #[must_use]
    pub fn item(name: impl Into<String>) -> Self {
        FetchMode::Item(name.into())
    }
}

/// The shaped outcome of [`shape`].
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Empty,
    Scalar(SqlValue),
    Row(Row),
    Rows(Vec<Row>),
}

impl Fetched {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Fetched::Empty)
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&SqlValue> {
        if let Fetched::Scalar(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_row(&self) -> Option<&Row> {
        if let Fetched::Row(row) = self {
            Some(row)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_rows(&self) -> Option<&[Row]> {
        if let Fetched::Rows(rows) = self {
            Some(rows)
        } else {
            None
        }
    }

    /// Flatten to a row list; scalars have no row and yield nothing.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Fetched::Empty | Fetched::Scalar(_) => Vec::new(),
            Fetched::Row(row) => vec![row],
            Fetched::Rows(rows) => rows,
        }
    }
}

/// Shape `results` according to its row count and `mode`.
#[must_use]
pub fn shape(results: &ResultSet, mode: &FetchMode) -> Fetched {
    match results.rows() {
        [] => Fetched::Empty,
        [row] => shape_single(row, mode),
        rows => Fetched::Rows(rows.to_vec()),
    }
}

fn shape_single(row: &Row, mode: &FetchMode) -> Fetched {
    match mode {
        FetchMode::All => Fetched::Rows(vec![row.clone()]),
        FetchMode::Single => Fetched::Row(row.clone()),
        FetchMode::Item(name) => {
            // The working result is a one-element list, so its only top-level key is "0".
            if is_list_key(name) {
                Fetched::Row(row.clone())
            } else if let Some(value) = row.get(name) {
                Fetched::Scalar(value.clone())
            } else {
                Fetched::Empty
            }
        }
    }
}

fn is_list_key(name: &str) -> bool {
    name == "0"
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn set_of(rows: &[(i64, &str)]) -> ResultSet {
        let mut set = ResultSet::with_capacity(rows.len());
        set.set_column_names(Arc::new(vec!["id".into(), "name".into()]));
        for (id, name) in rows {
            set.add_row_values(vec![SqlValue::Int(*id), SqlValue::Text((*name).into())]);
        }
        set
    }

    #[test]
    fn single_row_default_is_unwrapped() {
        let set = set_of(&[(1, "Alice")]);
        let fetched = shape(&set, &FetchMode::Single);
        assert_eq!(fetched.as_row().and_then(|r| r.get("name")), Some(&SqlValue::Text("Alice".into())));
    }

    #[test]
    fn single_row_all_is_wrapped() {
        let set = set_of(&[(1, "Alice")]);
        assert_eq!(shape(&set, &FetchMode::All).as_rows().map(<[Row]>::len), Some(1));
    }

    #[test]
    fn item_lookup_on_single_row() {
        let set = set_of(&[(1, "Alice")]);
        assert_eq!(shape(&set, &FetchMode::item("id")), Fetched::Scalar(SqlValue::Int(1)));
        assert_eq!(shape(&set, &FetchMode::item("email")), Fetched::Empty);
        // top-level key of the one-element list
        assert_eq!(shape(&set, &FetchMode::item("0")), Fetched::Row(set.rows()[0].clone()));
    }

    #[test]
    fn many_rows_ignore_the_mode() {
        let set = set_of(&[(1, "a"), (2, "b")]);
        for mode in [FetchMode::Single, FetchMode::All, FetchMode::item("id")] {
            assert_eq!(shape(&set, &mode).as_rows().map(<[Row]>::len), Some(2));
        }
    }

    #[test]
    fn no_rows_is_empty() {
        assert!(shape(&ResultSet::default(), &FetchMode::All).is_empty());
    }
}
