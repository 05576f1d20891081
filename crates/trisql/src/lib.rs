//! # trisql
//!
//! Database sessions for SQLite, MySQL and PostgreSQL.
//!
//! This crate runs the statements and schemas built with [`trisql_core`]
//! over a single `sqlx` connection:
//!
//! - [`ConnectionConfig`] validates driver parameters before connecting
//! - [`Database`] compiles builders, binds their parameters and returns
//!   [`Row`]s or affected row counts
//! - [`Schema`] runs CREATE TABLE / DROP TABLE
//! - Queued statements run as one transaction via
//!   [`Database::execute_queue`]
//!
//! Statement execution goes through the [`Driver`] trait, so sessions can
//! run against a test double.

pub mod config;
pub mod database;
pub mod driver;
pub mod error;
pub mod row;
pub mod schema;

pub use config::{ConnectionConfig, ServerConfig};
pub use database::{Database, Outcome};
pub use driver::{Driver, SqlxDriver};
pub use error::{Error, Result};
pub use row::Row;
pub use schema::Schema;

pub use trisql_core;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ConnectionConfig, Database, Driver, Error, Outcome, Result, Row, Schema};
    pub use trisql_core::{
        Dialect, Direction, JoinType, QueryBuilder, SqlValue, StatementKind, StatementQueue,
        TableSchema, ToSqlValue, params,
    };
}
