//! The fluent statement builder.

use std::fmt;
use std::str::FromStr;

use super::clause::{Direction, Filter, Join, JoinType};
use super::queue::StatementQueue;
use crate::dialect::Dialect;
use crate::error::{BuildError, Error};
use crate::placeholder;
use crate::value::{SqlValue, ToSqlValue};

/// The statement a builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// SELECT.
    Select,
    /// INSERT.
    Insert,
    /// UPDATE.
    Update,
    /// DELETE.
    Delete,
}

impl StatementKind {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    /// Returns true if the statement produces rows.
    #[must_use]
    pub const fn returns_rows(self) -> bool {
        matches!(self, Self::Select)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SELECT" => Ok(Self::Select),
            "INSERT" => Ok(Self::Insert),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(Error::UnsupportedStatementKind(s.to_string())),
        }
    }
}

/// Accumulates the parts of one SELECT, INSERT, UPDATE or DELETE statement.
///
/// Every mutator consumes and returns the builder. [`QueryBuilder::to_sql`]
/// compiles without consuming, so the same builder always yields the same
/// text and parameters.
///
/// Table and column names are passed through as written. Values are never
/// written into the SQL text; they are returned as bound parameters.
///
/// # Example
///
/// ```rust
/// use trisql_core::{Dialect, QueryBuilder, SqlValue};
///
/// let (sql, params) = QueryBuilder::update(Dialect::Postgres, "posts")
///     .value("title", "Hello")
///     .value("published", true)
///     .where_clause("id = ?", [3])
///     .to_sql()
///     .unwrap();
///
/// assert_eq!(sql, "UPDATE posts SET title = $1, published = $2 WHERE id = $3");
/// assert_eq!(
///     params,
///     vec![SqlValue::Text("Hello".into()), SqlValue::Bool(true), SqlValue::Int(3)]
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders do nothing until compiled or executed"]
pub struct QueryBuilder {
    dialect: Dialect,
    kind: StatementKind,
    table: String,
    projection: Vec<String>,
    joins: Vec<Join>,
    filters: Vec<Filter>,
    order: Vec<(String, Direction)>,
    limit: Option<u64>,
    offset: Option<u64>,
    data: Vec<(String, SqlValue)>,
}

impl QueryBuilder {
    /// Creates a builder for `kind` against `table`.
    pub fn new(dialect: Dialect, kind: StatementKind, table: impl Into<String>) -> Self {
        Self {
            dialect,
            kind,
            table: table.into(),
            projection: vec![String::from("*")],
            joins: vec![],
            filters: vec![],
            order: vec![],
            limit: None,
            offset: None,
            data: vec![],
        }
    }

    /// Creates a SELECT builder.
    pub fn select(dialect: Dialect, table: impl Into<String>) -> Self {
        Self::new(dialect, StatementKind::Select, table)
    }

    /// Creates an INSERT builder.
    pub fn insert(dialect: Dialect, table: impl Into<String>) -> Self {
        Self::new(dialect, StatementKind::Insert, table)
    }

    /// Creates an UPDATE builder.
    pub fn update(dialect: Dialect, table: impl Into<String>) -> Self {
        Self::new(dialect, StatementKind::Update, table)
    }

    /// Creates a DELETE builder.
    pub fn delete(dialect: Dialect, table: impl Into<String>) -> Self {
        Self::new(dialect, StatementKind::Delete, table)
    }

    /// Returns the statement kind.
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Returns the target dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the target table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Replaces the SELECT projection. An empty list selects `*`.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.projection = if columns.is_empty() {
            vec![String::from("*")]
        } else {
            columns.iter().map(|&c| String::from(c)).collect()
        };
        self
    }

    /// Adds an INNER JOIN.
    pub fn join(self, table: &str, on: &str) -> Self {
        self.join_with(JoinType::Inner, table, on)
    }

    /// Adds a LEFT JOIN.
    pub fn left_join(self, table: &str, on: &str) -> Self {
        self.join_with(JoinType::Left, table, on)
    }

    /// Adds a RIGHT JOIN.
    pub fn right_join(self, table: &str, on: &str) -> Self {
        self.join_with(JoinType::Right, table, on)
    }

    /// Adds a FULL JOIN.
    pub fn full_join(self, table: &str, on: &str) -> Self {
        self.join_with(JoinType::Full, table, on)
    }

    /// Adds a CROSS JOIN.
    pub fn cross_join(mut self, table: &str) -> Self {
        self.joins.push(Join {
            join_type: JoinType::Cross,
            table: String::from(table),
            condition: None,
        });
        self
    }

    /// Adds a join of any type with an ON condition.
    pub fn join_with(mut self, join_type: JoinType, table: &str, on: &str) -> Self {
        self.joins.push(Join {
            join_type,
            table: String::from(table),
            condition: Some(String::from(on)),
        });
        self
    }

    /// Adds a WHERE condition written with `?` placeholders.
    ///
    /// Conditions are combined with AND in call order. `params` binds one
    /// value per placeholder; pass `params![]` for a condition without any.
    /// Write `??` for a literal `?`, such as PostgreSQL's JSONB operators.
    pub fn where_clause<I, T>(mut self, condition: &str, params: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        self.filters.push(Filter {
            condition: String::from(condition),
            params: params.into_iter().map(ToSqlValue::to_sql_value).collect(),
        });
        self
    }

    /// Adds an ORDER BY column.
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order.push((String::from(column), direction));
        self
    }

    /// Adds an ascending ORDER BY column.
    pub fn order_by_asc(self, column: &str) -> Self {
        self.order_by(column, Direction::Asc)
    }

    /// Adds a descending ORDER BY column.
    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(column, Direction::Desc)
    }

    /// Sets LIMIT. Zero means no limit.
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets OFFSET.
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Replaces the column data used by INSERT and UPDATE.
    pub fn set<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToSqlValue,
    {
        self.data = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_sql_value()))
            .collect();
        self
    }

    /// Appends one column value for INSERT and UPDATE.
    pub fn value<T: ToSqlValue>(mut self, column: &str, value: T) -> Self {
        self.data.push((String::from(column), value.to_sql_value()));
        self
    }

    /// Hands the builder to `queue` without compiling it.
    pub fn queue(self, queue: &mut StatementQueue) {
        queue.push(self);
    }

    /// Compiles the builder into SQL text and its bound parameters.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingData`] for INSERT or UPDATE without
    /// column data, and [`BuildError::PlaceholderMismatch`] when a WHERE
    /// condition's placeholder count differs from its bound values.
    pub fn to_sql(&self) -> Result<(String, Vec<SqlValue>), BuildError> {
        let mut params = Vec::new();

        let mut sql = match self.kind {
            StatementKind::Select => self.select_head(),
            StatementKind::Insert => return self.insert_sql(),
            StatementKind::Update => self.update_head(&mut params)?,
            StatementKind::Delete => format!("DELETE FROM {}", self.table),
        };

        self.push_where(&mut sql, &mut params)?;

        if self.kind == StatementKind::Select {
            self.push_order_and_pagination(&mut sql);
        }

        Ok((sql, params))
    }

    fn select_head(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.projection.join(", "), self.table);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql());
        }
        sql
    }

    fn insert_sql(&self) -> Result<(String, Vec<SqlValue>), BuildError> {
        self.require_data()?;

        let columns: Vec<&str> = self.data.iter().map(|(c, _)| c.as_str()).collect();
        let placeholders: Vec<String> = (1..=self.data.len())
            .map(|i| self.dialect.placeholder(i))
            .collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        );
        let params = self.data.iter().map(|(_, v)| v.clone()).collect();

        Ok((sql, params))
    }

    fn update_head(&self, params: &mut Vec<SqlValue>) -> Result<String, BuildError> {
        self.require_data()?;

        let mut assignments = Vec::with_capacity(self.data.len());
        for (column, value) in &self.data {
            params.push(value.clone());
            assignments.push(format!("{column} = {}", self.dialect.placeholder(params.len())));
        }

        Ok(format!("UPDATE {} SET {}", self.table, assignments.join(", ")))
    }

    fn push_where(&self, sql: &mut String, params: &mut Vec<SqlValue>) -> Result<(), BuildError> {
        if self.filters.is_empty() {
            return Ok(());
        }

        let mut conditions = Vec::with_capacity(self.filters.len());
        for filter in &self.filters {
            let placeholders = placeholder::count(&filter.condition);
            if placeholders != filter.params.len() {
                return Err(BuildError::PlaceholderMismatch {
                    condition: filter.condition.clone(),
                    placeholders,
                    params: filter.params.len(),
                });
            }
            let (condition, _) =
                placeholder::renumber(&filter.condition, self.dialect, params.len() + 1);
            conditions.push(condition);
            params.extend(filter.params.iter().cloned());
        }

        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
        Ok(())
    }

    fn push_order_and_pagination(&self, sql: &mut String) {
        if !self.order.is_empty() {
            let order: Vec<String> = self
                .order
                .iter()
                .map(|(column, direction)| format!("{column} {direction}"))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }

        let pagination = self.dialect.pagination_syntax(self.limit, self.offset);
        if !pagination.is_empty() {
            sql.push(' ');
            sql.push_str(&pagination);
        }
    }

    fn require_data(&self) -> Result<(), BuildError> {
        if self.data.is_empty() {
            return Err(BuildError::MissingData { kind: self.kind });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_simple_select() {
        let (sql, params) = QueryBuilder::select(Dialect::Sqlite, "users").to_sql().unwrap();
        assert_eq!(sql, "SELECT * FROM users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_where_is_and_joined() {
        let (sql, params) = QueryBuilder::select(Dialect::MySql, "users")
            .where_clause("age > ?", [18])
            .where_clause("status = ?", ["active"])
            .to_sql()
            .unwrap();

        assert_eq!(sql, "SELECT * FROM users WHERE age > ? AND status = ?");
        assert_eq!(sql.matches("WHERE").count(), 1);
        assert_eq!(params, vec![SqlValue::Int(18), SqlValue::Text("active".into())]);
    }

    #[test]
    fn test_select_with_joins_and_order() {
        let (sql, _) = QueryBuilder::select(Dialect::Postgres, "posts p")
            .columns(&["p.id", "u.name"])
            .join("users u", "u.id = p.author_id")
            .left_join("comments c", "c.post_id = p.id")
            .cross_join("tags")
            .order_by_asc("p.id")
            .order_by("u.name", Direction::Desc)
            .to_sql()
            .unwrap();

        assert_eq!(
            sql,
            "SELECT p.id, u.name FROM posts p \
             INNER JOIN users u ON u.id = p.author_id \
             LEFT JOIN comments c ON c.post_id = p.id \
             CROSS JOIN tags \
             ORDER BY p.id ASC, u.name DESC"
        );
    }

    #[test]
    fn test_empty_columns_select_star() {
        let (sql, _) = QueryBuilder::select(Dialect::Sqlite, "t")
            .columns(&[])
            .to_sql()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM t");
    }

    #[test]
    fn test_limit_and_offset() {
        let (sql, _) = QueryBuilder::select(Dialect::Sqlite, "t")
            .limit(10)
            .offset(20)
            .to_sql()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM t LIMIT 10 OFFSET 20");
    }

    #[test]
    fn test_offset_without_limit() {
        let sqlite = QueryBuilder::select(Dialect::Sqlite, "t").offset(5).to_sql().unwrap().0;
        assert!(sqlite.contains("LIMIT -1 OFFSET 5"));

        for dialect in [Dialect::MySql, Dialect::Postgres] {
            let sql = QueryBuilder::select(dialect, "t").offset(5).to_sql().unwrap().0;
            assert!(sql.contains("OFFSET 5"), "{dialect}: {sql}");
            assert!(!sql.contains("LIMIT -1"), "{dialect}: {sql}");
        }
    }

    #[test]
    fn test_insert() {
        let (sql, params) = QueryBuilder::insert(Dialect::Sqlite, "users")
            .value("name", "Alice")
            .value("email", "alice@example.com")
            .to_sql()
            .unwrap();

        assert_eq!(sql, "INSERT INTO users (name, email) VALUES (?, ?)");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_insert_postgres_placeholders() {
        let (sql, _) = QueryBuilder::insert(Dialect::Postgres, "users")
            .set([("name", "Bob"), ("email", "bob@example.com")])
            .to_sql()
            .unwrap();
        assert_eq!(sql, "INSERT INTO users (name, email) VALUES ($1, $2)");
    }

    #[test]
    fn test_set_replaces_data() {
        let (sql, params) = QueryBuilder::insert(Dialect::MySql, "t")
            .value("a", 1)
            .set([("b", 2)])
            .to_sql()
            .unwrap();
        assert_eq!(sql, "INSERT INTO t (b) VALUES (?)");
        assert_eq!(params, vec![SqlValue::Int(2)]);
    }

    #[test]
    fn test_update_params_are_data_then_filters() {
        let (sql, params) = QueryBuilder::update(Dialect::Sqlite, "users")
            .value("name", "Bob")
            .value("active", false)
            .where_clause("id = ?", [1])
            .to_sql()
            .unwrap();

        assert_eq!(sql, "UPDATE users SET name = ?, active = ? WHERE id = ?");
        assert_eq!(
            params,
            vec![
                SqlValue::Text("Bob".into()),
                SqlValue::Bool(false),
                SqlValue::Int(1)
            ]
        );
    }

    #[test]
    fn test_postgres_renumbers_across_set_and_where() {
        let (sql, params) = QueryBuilder::update(Dialect::Postgres, "users")
            .value("name", "Bob")
            .where_clause("id = ?", [1])
            .where_clause("tenant IN (?, ?)", [7, 8])
            .to_sql()
            .unwrap();

        assert_eq!(
            sql,
            "UPDATE users SET name = $1 WHERE id = $2 AND tenant IN ($3, $4)"
        );
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_delete() {
        let (sql, params) = QueryBuilder::delete(Dialect::MySql, "sessions")
            .where_clause("expires_at < ?", ["2024-01-01"])
            .to_sql()
            .unwrap();
        assert_eq!(sql, "DELETE FROM sessions WHERE expires_at < ?");
        assert_eq!(params.len(), 1);

        let (sql, _) = QueryBuilder::delete(Dialect::Sqlite, "sessions").to_sql().unwrap();
        assert_eq!(sql, "DELETE FROM sessions");
    }

    #[test]
    fn test_missing_data() {
        let err = QueryBuilder::insert(Dialect::Sqlite, "t").to_sql().unwrap_err();
        assert_eq!(err, BuildError::MissingData { kind: StatementKind::Insert });
        assert_eq!(
            err.to_string(),
            "INSERT statement requires at least one column value"
        );

        let err = QueryBuilder::update(Dialect::Sqlite, "t")
            .where_clause("id = ?", [1])
            .to_sql()
            .unwrap_err();
        assert_eq!(err, BuildError::MissingData { kind: StatementKind::Update });
    }

    #[test]
    fn test_placeholder_mismatch() {
        let err = QueryBuilder::select(Dialect::Sqlite, "t")
            .where_clause("a = ? AND b = ?", [1])
            .to_sql()
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::PlaceholderMismatch {
                condition: "a = ? AND b = ?".into(),
                placeholders: 2,
                params: 1,
            }
        );
    }

    #[test]
    fn test_condition_without_params() {
        let (sql, params) = QueryBuilder::select(Dialect::Postgres, "t")
            .where_clause("deleted_at IS NULL", params![])
            .where_clause("note <> '?' AND id = ?", [4])
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM t WHERE deleted_at IS NULL AND note <> '?' AND id = $1"
        );
        assert_eq!(params, vec![SqlValue::Int(4)]);
    }

    #[test]
    fn test_to_sql_is_repeatable() {
        let builder = QueryBuilder::select(Dialect::Postgres, "t")
            .where_clause("a = ?", ["x"])
            .order_by_desc("a")
            .limit(3);
        assert_eq!(builder.to_sql().unwrap(), builder.to_sql().unwrap());
    }

    #[test]
    fn test_non_select_ignores_pagination() {
        let (sql, _) = QueryBuilder::delete(Dialect::Sqlite, "t")
            .order_by_asc("id")
            .limit(1)
            .to_sql()
            .unwrap();
        assert_eq!(sql, "DELETE FROM t");
    }

    #[test]
    fn test_statement_kind_parse() {
        assert_eq!("select".parse::<StatementKind>().unwrap(), StatementKind::Select);
        assert_eq!("DELETE".parse::<StatementKind>().unwrap(), StatementKind::Delete);
        assert!(matches!(
            "merge".parse::<StatementKind>(),
            Err(Error::UnsupportedStatementKind(_))
        ));
        assert!(StatementKind::Select.returns_rows());
        assert!(!StatementKind::Update.returns_rows());
    }
}
