use std::collections::HashMap;
use std::sync::Arc;

use super::row::{Row, build_index, collapse_keys, place_values};
use crate::types::SqlValue;

/// The rows produced by the most recent statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    rows: Vec<Row>,
    column_names: Option<Arc<Vec<String>>>,
    column_index_cache: Arc<HashMap<String, usize>>,
    // source column -> key slot, only when some key repeats
    slots: Option<Arc<Vec<usize>>>,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            rows: Vec::with_capacity(capacity),
            column_names: None,
            column_index_cache: Arc::default(),
            slots: None,
        }
    }

    /// Set the row keys shared by every row added afterwards.
    ///
    /// A key that repeats is kept once; rows then hold the value of its last occurrence.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        let column_names = match collapse_keys(&column_names) {
            Some((unique, slots)) => {
                self.slots = Some(Arc::new(slots));
                Arc::new(unique)
            }
            None => {
                self.slots = None;
                column_names
            }
        };
        self.column_index_cache = Arc::new(build_index(&column_names));
        self.column_names = Some(column_names);
    }

    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Add a row laid out in the order of the column names as they were given.
    ///
    /// Values are ignored until column names have been set.
    pub fn add_row_values(&mut self, values: Vec<SqlValue>) {
        let values = match &self.slots {
            Some(slots) => place_values(slots, values),
            None => values,
        };
        if let Some(column_names) = &self.column_names {
            self.rows.push(Row::with_index(
                Arc::clone(column_names),
                values,
                Arc::clone(&self.column_index_cache),
            ));
        }
    }

    /// Add an existing row; its keys become the set's keys if none are set yet.
    pub fn add_row(&mut self, row: Row) {
        if self.column_names.is_none() {
            self.set_column_names(Arc::new(row.column_names().to_vec()));
        }
        self.rows.push(row);
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<Row> for ResultSet {
    fn from_iter<T: IntoIterator<Item = Row>>(iter: T) -> Self {
        let mut set = ResultSet::default();
        for row in iter {
            set.add_row(row);
        }
        set
    }
}
