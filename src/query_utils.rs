use std::sync::LazyLock;

use regex::Regex;

static SELECT_LEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*select\b").expect("static regex"));

static INSERT_ANYWHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)insert").expect("static regex"));

/// The statement's leading keyword is `SELECT`.
#[must_use]
pub fn is_select(sql: &str) -> bool {
    SELECT_LEADING.is_match(sql)
}

/// The statement text contains `insert` anywhere, in any case.
///
/// This is a plain substring test: `UPDATE inserts SET ...` counts too.
#[must_use]
pub fn mentions_insert(sql: &str) -> bool {
    INSERT_ANYWHERE.is_match(sql)
}

/// The text holds no statement: only whitespace, `;` separators and comments.
#[must_use]
pub fn is_blank(sql: &str) -> bool {
    let mut rest = sql;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ';');
        if rest.is_empty() {
            return true;
        }
        if let Some(comment) = rest.strip_prefix("--") {
            rest = comment.split_once('\n').map_or("", |(_, tail)| tail);
        } else if rest.starts_with("/*") {
            rest = skip_block_comment(rest);
        } else {
            return false;
        }
    }
}

// `sql` starts with `/*`; returns what follows the matching `*/`, honouring nesting.
fn skip_block_comment(sql: &str) -> &str {
    let mut depth = 0usize;
    let mut idx = 0;
    let bytes = sql.as_bytes();
    while idx + 1 < bytes.len() {
        match (bytes[idx], bytes[idx + 1]) {
            (b'/', b'*') => {
                depth += 1;
                idx += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                idx += 2;
                if depth == 0 {
                    return &sql[idx..];
                }
            }
            _ => idx += 1,
        }
    }
    // unterminated
    ""
}

pub(crate) fn extract_column_names<I, T, F>(columns: I, name: F) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> &str,
{
    columns
        .into_iter()
        .map(|col| name(&col).to_string())
        .collect()
}
