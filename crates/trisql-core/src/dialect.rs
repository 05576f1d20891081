//! SQL dialect policy.
//!
//! Every piece of syntax that differs between SQLite, MySQL and PostgreSQL
//! is resolved here. The statement and schema builders ask the dialect for
//! fragments instead of branching on it themselves.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A supported SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// SQLite 3.
    Sqlite,
    /// MySQL / MariaDB.
    MySql,
    /// PostgreSQL.
    Postgres,
}

/// MySQL has no `OFFSET` without `LIMIT`; this is its documented "all rows" value.
const MYSQL_NO_LIMIT: u64 = u64::MAX;

impl Dialect {
    /// All supported dialects.
    pub const ALL: [Self; 3] = [Self::Sqlite, Self::MySql, Self::Postgres];

    /// Returns the canonical dialect tag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::MySql => "mysql",
            Self::Postgres => "pgsql",
        }
    }

    /// Returns the auto-incrementing primary key column definition.
    #[must_use]
    pub fn primary_key_syntax(self, column: &str) -> String {
        match self {
            Self::Sqlite => format!("{column} INTEGER PRIMARY KEY AUTOINCREMENT"),
            Self::MySql => format!("{column} INT AUTO_INCREMENT PRIMARY KEY"),
            Self::Postgres => format!("{column} SERIAL PRIMARY KEY"),
        }
    }

    /// Returns the column type used for timestamps.
    #[must_use]
    pub const fn timestamp_type(self) -> &'static str {
        match self {
            Self::Postgres => "TIMESTAMP",
            Self::Sqlite | Self::MySql => "DATETIME",
        }
    }

    /// Returns the default clause for an auto-touched timestamp column.
    #[must_use]
    pub const fn timestamp_default_syntax(self) -> &'static str {
        match self {
            Self::MySql => "DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP",
            Self::Sqlite | Self::Postgres => "DEFAULT CURRENT_TIMESTAMP",
        }
    }

    /// Returns the LIMIT/OFFSET fragment, or an empty string.
    ///
    /// A limit of zero is treated as no limit. MySQL cannot take OFFSET
    /// alone, so an offset without a limit renders `LIMIT 18446744073709551615`.
    #[must_use]
    pub fn pagination_syntax(self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit.filter(|n| *n > 0), offset) {
            (Some(limit), Some(offset)) => format!("LIMIT {limit} OFFSET {offset}"),
            (Some(limit), None) => format!("LIMIT {limit}"),
            (None, Some(offset)) => match self {
                Self::Sqlite => format!("LIMIT -1 OFFSET {offset}"),
                Self::MySql => format!("LIMIT {MYSQL_NO_LIMIT} OFFSET {offset}"),
                Self::Postgres => format!("OFFSET {offset}"),
            },
            (None, None) => String::new(),
        }
    }

    /// Returns the options appended after `CREATE TABLE (...)`.
    #[must_use]
    pub const fn table_options_syntax(self) -> &'static str {
        match self {
            Self::Sqlite => "",
            Self::MySql => "ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
            Self::Postgres => "WITH (fillfactor = 100)",
        }
    }

    /// Returns the bound parameter placeholder for a 1-based position.
    #[must_use]
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${index}"),
            Self::Sqlite | Self::MySql => String::from("?"),
        }
    }

    /// Returns the identifier quote character.
    #[must_use]
    pub const fn identifier_quote(self) -> char {
        match self {
            Self::MySql => '`',
            Self::Sqlite | Self::Postgres => '"',
        }
    }

    /// Quotes an identifier, doubling any embedded quote characters.
    ///
    /// The builders never call this on their own; table and column names
    /// are passed through as written.
    #[must_use]
    pub fn quote_identifier(self, name: &str) -> String {
        let q = self.identifier_quote();
        let escaped = name.replace(q, &format!("{q}{q}"));
        format!("{q}{escaped}{q}")
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "pgsql" | "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(Error::UnsupportedDialect(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialect_tags() {
        assert_eq!("sqlite".parse::<Dialect>().unwrap(), Dialect::Sqlite);
        assert_eq!("MySQL".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert_eq!("pgsql".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Postgres);
    }

    #[test]
    fn test_unsupported_dialect() {
        let err = "oracle".parse::<Dialect>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedDialect(ref tag) if tag == "oracle"));
        assert_eq!(err.to_string(), "Unsupported dialect: oracle");
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.name().parse::<Dialect>().unwrap(), dialect);
            assert_eq!(dialect.to_string(), dialect.name());
        }
    }

    #[test]
    fn test_primary_key_syntax() {
        assert_eq!(
            Dialect::Sqlite.primary_key_syntax("id"),
            "id INTEGER PRIMARY KEY AUTOINCREMENT"
        );
        assert_eq!(
            Dialect::MySql.primary_key_syntax("id"),
            "id INT AUTO_INCREMENT PRIMARY KEY"
        );
        assert_eq!(
            Dialect::Postgres.primary_key_syntax("user_id"),
            "user_id SERIAL PRIMARY KEY"
        );
    }

    #[test]
    fn test_timestamp_syntax() {
        assert_eq!(Dialect::Postgres.timestamp_type(), "TIMESTAMP");
        assert_eq!(Dialect::Sqlite.timestamp_type(), "DATETIME");
        assert!(
            Dialect::MySql
                .timestamp_default_syntax()
                .ends_with("ON UPDATE CURRENT_TIMESTAMP")
        );
        assert!(!Dialect::Sqlite.timestamp_default_syntax().contains("ON UPDATE"));
        assert!(!Dialect::Postgres.timestamp_default_syntax().contains("ON UPDATE"));
    }

    #[test]
    fn test_pagination_limit_and_offset() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.pagination_syntax(Some(10), Some(20)), "LIMIT 10 OFFSET 20");
            assert_eq!(dialect.pagination_syntax(Some(10), None), "LIMIT 10");
            assert_eq!(dialect.pagination_syntax(None, None), "");
        }
    }

    #[test]
    fn test_pagination_offset_without_limit() {
        assert_eq!(Dialect::Sqlite.pagination_syntax(None, Some(5)), "LIMIT -1 OFFSET 5");
        assert_eq!(Dialect::Postgres.pagination_syntax(None, Some(5)), "OFFSET 5");

        let mysql = Dialect::MySql.pagination_syntax(None, Some(5));
        assert!(mysql.ends_with("OFFSET 5"));
        assert!(!mysql.contains("LIMIT -1"));
    }

    #[test]
    fn test_pagination_zero_limit_is_unset() {
        assert_eq!(Dialect::Postgres.pagination_syntax(Some(0), None), "");
        assert_eq!(Dialect::Sqlite.pagination_syntax(Some(0), Some(3)), "LIMIT -1 OFFSET 3");
    }

    #[test]
    fn test_table_options() {
        assert_eq!(Dialect::Sqlite.table_options_syntax(), "");
        assert!(Dialect::MySql.table_options_syntax().contains("ENGINE=InnoDB"));
        assert!(Dialect::Postgres.table_options_syntax().starts_with("WITH ("));
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(Dialect::Sqlite.placeholder(3), "?");
        assert_eq!(Dialect::MySql.placeholder(3), "?");
        assert_eq!(Dialect::Postgres.placeholder(3), "$3");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(Dialect::Sqlite.quote_identifier("users"), "\"users\"");
        assert_eq!(Dialect::MySql.quote_identifier("order"), "`order`");
        assert_eq!(Dialect::Postgres.quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
