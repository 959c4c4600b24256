use std::collections::HashMap;
use std::sync::Arc;

use crate::types::SqlValue;

/// One fetched record: an ordered mapping from column key to value.
///
/// Keys are shared with every other row of the same [`super::ResultSet`].
#[derive(Debug, Clone)]
pub struct Row {
    column_names: Arc<Vec<String>>,
    values: Vec<SqlValue>,
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl Row {
    /// Create a standalone row, building its own key index.
    ///
    /// A key that repeats is kept once, holding the value of its last occurrence.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        let (column_names, values) = match collapse_keys(&column_names) {
            Some((unique, slots)) => (Arc::new(unique), place_values(&slots, values)),
            None => (column_names, values),
        };
        let cache = Arc::new(build_index(&column_names));
        Self {
            column_names,
            values,
            column_index_cache: cache,
        }
    }

    pub(crate) fn with_index(
        column_names: Arc<Vec<String>>,
        values: Vec<SqlValue>,
        column_index_cache: Arc<HashMap<String, usize>>,
    ) -> Self {
        Self {
            column_names,
            values,
            column_index_cache,
        }
    }

    /// Position of a key, or `None` when the row has no such key.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index_cache.get(column_name).copied()
    }

    #[must_use]
    pub fn contains_key(&self, column_name: &str) -> bool {
        self.get_column_index(column_name).is_some()
    }

    /// Value stored under `column_name`.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&SqlValue> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Key/value pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.column_names == other.column_names && self.values == other.values
    }
}

// Keys are unique by the time an index is built; see `collapse_keys`.
pub(crate) fn build_index(column_names: &[String]) -> HashMap<String, usize> {
    column_names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect()
}

/// Fold repeated keys (e.g. `SELECT u.id, o.id`) into one entry each.
///
/// Returns `None` when every key is already unique. Otherwise returns the unique keys, in
/// order of first appearance, and for every source column the slot its value lands in.
/// Later columns overwrite earlier ones in the same slot.
pub(crate) fn collapse_keys(column_names: &[String]) -> Option<(Vec<String>, Vec<usize>)> {
    let mut first_seen: HashMap<&str, usize> = HashMap::with_capacity(column_names.len());
    let mut unique = Vec::with_capacity(column_names.len());
    let mut slots = Vec::with_capacity(column_names.len());
    for name in column_names {
        let slot = *first_seen.entry(name.as_str()).or_insert_with(|| {
            unique.push(name.clone());
            unique.len() - 1
        });
        slots.push(slot);
    }
    (unique.len() < column_names.len()).then_some((unique, slots))
}

/// Lay `values` out over the collapsed keys; the last value for a slot wins.
pub(crate) fn place_values(slots: &[usize], values: Vec<SqlValue>) -> Vec<SqlValue> {
    let width = slots.iter().max().map_or(0, |max| max + 1);
    let mut placed = vec![SqlValue::Null; width];
    for (value, &slot) in values.into_iter().zip(slots) {
        placed[slot] = value;
    }
    placed
}
