use crate::types::SqlValue;

/// Values bound to a statement's placeholders.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    /// Nothing to bind
    #[default]
    None,
    /// Bound in placeholder order (`?`, `?1`, `$1`)
    Positional(Vec<SqlValue>),
    /// Bound by placeholder name (`:name`)
    Named(Vec<(String, SqlValue)>),
}

impl Params {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Params::None => 0,
            Params::Positional(values) => values.len(),
            Params::Named(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<SqlValue>> for Params {
    fn from(values: Vec<SqlValue>) -> Self {
        Params::Positional(values)
    }
}

impl From<&[SqlValue]> for Params {
    fn from(values: &[SqlValue]) -> Self {
        Params::Positional(values.to_vec())
    }
}

impl<const N: usize> From<[SqlValue; N]> for Params {
    fn from(values: [SqlValue; N]) -> Self {
        Params::Positional(values.into())
    }
}

impl From<Vec<(String, SqlValue)>> for Params {
    fn from(values: Vec<(String, SqlValue)>) -> Self {
        Params::Named(values)
    }
}

impl<const N: usize> From<[(&str, SqlValue); N]> for Params {
    fn from(values: [(&str, SqlValue); N]) -> Self {
        Params::Named(
            values
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }
}

/// Prefix a bare parameter name with `prefix` unless it already carries a sigil.
#[must_use]
pub fn normalize_name(name: &str, prefix: char) -> String {
    if name.starts_with([':', '@', '$']) {
        name.to_string()
    } else {
        format!("{prefix}{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_get_a_sigil_once() {
        assert_eq!(normalize_name("id", ':'), ":id");
        assert_eq!(normalize_name(":id", ':'), ":id");
        assert_eq!(normalize_name("@id", ':'), "@id");
    }

    #[test]
    fn conversions_pick_the_binding_style() {
        let p: Params = [SqlValue::Int(1), SqlValue::from("a")].into();
        assert!(matches!(p, Params::Positional(ref v) if v.len() == 2));
        let p: Params = [("name", SqlValue::from("Alice"))].into();
        assert!(matches!(p, Params::Named(_)));
        assert!(Params::default().is_empty());
    }
}
