//! # trisql-core
//!
//! Dialect-aware SQL generation for SQLite, MySQL and PostgreSQL.
//!
//! This crate provides:
//! - A [`Dialect`] policy that owns every piece of dialect-specific syntax
//! - A fluent statement builder for SELECT, INSERT, UPDATE and DELETE
//! - A table schema and DDL builder for CREATE TABLE / DROP TABLE
//! - Protection against SQL injection through bound parameters
//!
//! Nothing in this crate performs I/O. Builders compile to SQL text plus an
//! ordered parameter list; executing them is the job of the `trisql` crate.
//!
//! ## Statements
//!
//! ```rust
//! use trisql_core::{Dialect, QueryBuilder, SqlValue};
//!
//! let (sql, params) = QueryBuilder::select(Dialect::Sqlite, "posts")
//!     .columns(&["id", "title"])
//!     .where_clause("author_id = ?", [7])
//!     .where_clause("published = ?", [true])
//!     .order_by_desc("id")
//!     .limit(10)
//!     .to_sql()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT id, title FROM posts WHERE author_id = ? AND published = ? ORDER BY id DESC LIMIT 10"
//! );
//! assert_eq!(params, vec![SqlValue::Int(7), SqlValue::Bool(true)]);
//! ```
//!
//! ## Schemas
//!
//! ```rust
//! use trisql_core::{Dialect, SchemaBuilder};
//!
//! let sql = SchemaBuilder::new(Dialect::MySql)
//!     .build("posts", |table| {
//!         table.id();
//!         table.string("title").unique()?;
//!         table.timestamps();
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! assert!(sql.starts_with("CREATE TABLE posts (\nid INT AUTO_INCREMENT PRIMARY KEY,"));
//! assert!(sql.ends_with(") ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"));
//! ```

pub mod builder;
pub mod dialect;
pub mod error;
pub mod placeholder;
pub mod schema;
pub mod value;

pub use builder::{Direction, JoinType, QueryBuilder, StatementKind, StatementQueue};
pub use dialect::Dialect;
pub use error::{BuildError, Error, SchemaError};
pub use schema::{ColumnDefinition, ColumnType, DefaultValue, SchemaBuilder, TableConstraint, TableSchema};
pub use value::{SqlValue, ToSqlValue};
