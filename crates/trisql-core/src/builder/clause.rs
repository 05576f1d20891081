//! JOIN, WHERE and ORDER BY clause pieces.

use std::fmt;

use crate::value::SqlValue;

/// Join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN.
    Inner,
    /// LEFT JOIN.
    Left,
    /// RIGHT JOIN.
    Right,
    /// FULL JOIN.
    Full,
    /// CROSS JOIN.
    Cross,
}

impl JoinType {
    /// Returns the SQL keyword(s) for this join type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl Direction {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A joined table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// How the table is joined.
    pub join_type: JoinType,
    /// The joined table, passed through as written.
    pub table: String,
    /// The ON condition. CROSS joins have none.
    pub condition: Option<String>,
}

impl Join {
    /// Renders the join fragment.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match &self.condition {
            Some(on) => format!("{} {} ON {on}", self.join_type, self.table),
            None => format!("{} {}", self.join_type, self.table),
        }
    }
}

/// A WHERE condition with the values bound to its `?` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// The condition fragment, written with `?` placeholders.
    pub condition: String,
    /// Values for the fragment's placeholders, in order.
    pub params: Vec<SqlValue>,
}
