use std::borrow::Cow;

/// Rewrite `?` and `?N` placeholders into Postgres-style `$N`.
///
/// Bare `?` placeholders are numbered in order of appearance. Quoted strings, quoted
/// identifiers, comments and dollar-quoted bodies are copied untouched. The jsonb `?`
/// operators are rewritten like any other `?`; use `jsonb_exists` in statements that need them.
/// Returns a borrowed `Cow` when no changes are needed.
#[must_use]
pub fn translate_placeholders(sql: &str) -> Cow<'_, str> {
    let mut out: Option<String> = None;
    let mut state = State::Normal;
    let mut next_positional = 1usize;
    // start of the not-yet-copied tail of `sql`
    let mut copied = 0;
    let mut idx = 0;
    let bytes = sql.as_bytes();

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                    state = State::LineComment;
                    idx += 1;
                }
                b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' => {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = advance;
                    }
                }
                b'?' => {
                    let buf = out.get_or_insert_with(|| String::with_capacity(sql.len() + 8));
                    buf.push_str(&sql[copied..idx]);
                    buf.push('$');
                    if let Some((digits_end, digits)) = scan_digits(bytes, idx + 1) {
                        buf.push_str(digits);
                        idx = digits_end;
                    } else {
                        buf.push_str(&next_positional.to_string());
                        next_positional += 1;
                        idx += 1;
                    }
                    copied = idx;
                    continue;
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if b == b'/' && bytes.get(idx + 1) == Some(&b'*') {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    idx += tag.len() + 1;
                    state = State::Normal;
                }
            }
        }
        idx += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    }
}

#[derive(Clone)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

fn scan_digits(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let mut idx = start;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == start {
        None
    } else {
        std::str::from_utf8(&bytes[start..idx])
            .ok()
            .map(|digits| (idx, digits))
    }
}

// Returns the tag and the index of the opening tag's closing `$`.
fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut idx = start + 1;
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphabetic() || b == b'_' || (idx > start + 1 && b.is_ascii_digit())) {
            return None;
        }
        idx += 1;
    }

    if idx < bytes.len() {
        let tag = String::from_utf8(bytes[start + 1..idx].to_vec()).ok()?;
        Some((tag, idx))
    } else {
        None
    }
}

// `idx` points at a `$`; true when `tag$` follows it.
fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let end = idx + 1 + tag.len();
    end < bytes.len() && &bytes[idx + 1..end] == tag.as_bytes() && bytes[end] == b'$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_bare_placeholders_in_order() {
        let sql = "INSERT INTO users (name, email) VALUES (?, ?)";
        assert_eq!(
            translate_placeholders(sql),
            "INSERT INTO users (name, email) VALUES ($1, $2)"
        );
    }

    #[test]
    fn keeps_explicit_numbers() {
        let sql = "select * from t where a = ?2 and b = ?1";
        assert_eq!(
            translate_placeholders(sql),
            "select * from t where a = $2 and b = $1"
        );
    }

    #[test]
    fn skips_inside_literals_and_comments() {
        let sql = "select '?', \"a?\" -- ?\n/* ? /* ? */ */ from t where a = ?";
        assert_eq!(
            translate_placeholders(sql),
            "select '?', \"a?\" -- ?\n/* ? /* ? */ */ from t where a = $1"
        );
    }

    #[test]
    fn skips_dollar_quoted_blocks() {
        let sql = "select $tag$ is it? $tag$, $1 from t where b = ?";
        assert_eq!(
            translate_placeholders(sql),
            "select $tag$ is it? $tag$, $1 from t where b = $1"
        );
    }

    #[test]
    fn untouched_sql_is_borrowed() {
        let sql = "select 'é', $1 from t";
        let res = translate_placeholders(sql);
        assert!(matches!(res, Cow::Borrowed(_)));
        assert_eq!(res, sql);
    }

    #[test]
    fn multibyte_text_survives_rewrite() {
        assert_eq!(
            translate_placeholders("select 'café' where x = ?"),
            "select 'café' where x = $1"
        );
    }
}
