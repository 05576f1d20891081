//! Positional placeholder handling for caller-written fragments.
//!
//! Conditions passed to `where_clause` are written with `?` placeholders.
//! A `?` inside a quoted literal or quoted identifier is text, not a
//! placeholder, so scanning tracks quote state. `??` outside quotes is a
//! literal `?`, which lets PostgreSQL's JSONB `?`, `?|` and `?&` operators
//! through.

use crate::dialect::Dialect;

/// Counts the `?` placeholders outside quoted text.
#[must_use]
pub fn count(fragment: &str) -> usize {
    let mut n = 0;
    scan(fragment, |segment| {
        if segment.is_none() {
            n += 1;
        }
    });
    n
}

/// Rewrites each `?` placeholder to the dialect's form, numbering from `first`.
///
/// Returns the rewritten fragment and the number of placeholders replaced.
/// For dialects that use `?` placeholders stay as written; an escaped `??`
/// is collapsed to `?` on every dialect.
#[must_use]
pub fn renumber(fragment: &str, dialect: Dialect, first: usize) -> (String, usize) {
    let mut out = String::with_capacity(fragment.len());
    let mut n = 0;
    scan(fragment, |segment| match segment {
        Some(text) => out.push_str(text),
        None => {
            out.push_str(&dialect.placeholder(first + n));
            n += 1;
        }
    });
    (out, n)
}

/// Splits `fragment` into literal runs (`Some`) and placeholders (`None`).
///
/// An escaped `??` ends a literal run with a single `?`.
fn scan<'a>(fragment: &'a str, mut emit: impl FnMut(Option<&'a str>)) {
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut chars = fragment.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '?' if chars.next_if(|&(_, next)| next == '?').is_some() => {
                    emit(Some(&fragment[start..=i]));
                    start = i + 2;
                }
                '?' => {
                    if start < i {
                        emit(Some(&fragment[start..i]));
                    }
                    emit(None);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }

    if start < fragment.len() {
        emit(Some(&fragment[start..]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_plain() {
        assert_eq!(count("id = ?"), 1);
        assert_eq!(count("a = ? AND b BETWEEN ? AND ?"), 3);
        assert_eq!(count("deleted_at IS NULL"), 0);
    }

    #[test]
    fn test_count_ignores_quoted_text() {
        assert_eq!(count("title = 'why?' AND id = ?"), 1);
        assert_eq!(count("\"odd?col\" = ?"), 1);
        assert_eq!(count("`q?` = ?"), 1);
        // Doubled quotes close and reopen the literal.
        assert_eq!(count("name = 'it''s?' OR name = ?"), 1);
    }

    #[test]
    fn test_renumber_postgres() {
        let (sql, n) = renumber("a = ? AND b IN (?, ?)", Dialect::Postgres, 3);
        assert_eq!(sql, "a = $3 AND b IN ($4, $5)");
        assert_eq!(n, 3);
    }

    #[test]
    fn test_renumber_keeps_question_marks_elsewhere() {
        let (sql, n) = renumber("a = ? AND note = 'eh?'", Dialect::Sqlite, 1);
        assert_eq!(sql, "a = ? AND note = 'eh?'");
        assert_eq!(n, 1);

        let (sql, _) = renumber("note = 'eh?' AND a = ?", Dialect::Postgres, 1);
        assert_eq!(sql, "note = 'eh?' AND a = $1");
    }

    #[test]
    fn test_doubled_question_mark_is_literal() {
        assert_eq!(count("data ?? 'key'"), 0);
        assert_eq!(count("tags ??| ? AND id = ?"), 2);
        assert_eq!(count("note = 'a??b'"), 0);

        let (sql, n) = renumber("data ?? 'key' AND id = ?", Dialect::Postgres, 1);
        assert_eq!(sql, "data ? 'key' AND id = $1");
        assert_eq!(n, 1);

        let (sql, n) = renumber("tags ??& ? AND x = ?", Dialect::Postgres, 2);
        assert_eq!(sql, "tags ?& $2 AND x = $3");
        assert_eq!(n, 2);
    }

    #[test]
    fn test_doubled_question_mark_at_edges() {
        let (sql, n) = renumber("??", Dialect::Postgres, 1);
        assert_eq!(sql, "?");
        assert_eq!(n, 0);

        // Three in a row: an escaped `?` followed by a placeholder.
        let (sql, n) = renumber("a ??? b", Dialect::Postgres, 1);
        assert_eq!(sql, "a ?$1 b");
        assert_eq!(n, 1);
    }

    #[test]
    fn test_renumber_without_placeholders() {
        let (sql, n) = renumber("active", Dialect::Postgres, 1);
        assert_eq!(sql, "active");
        assert_eq!(n, 0);
    }
}
