//! Error types for SQL generation.

use crate::builder::StatementKind;

/// Errors raised while resolving dialects and statement kinds.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The dialect tag is not one of `sqlite`, `mysql` or `pgsql`.
    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// The statement kind is not one of SELECT, INSERT, UPDATE or DELETE.
    #[error("Unsupported statement kind: {0}")]
    UnsupportedStatementKind(String),

    /// Table schema misuse.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Statement compilation failure.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Errors raised by the table schema builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A column modifier was called before any column was added.
    #[error("Cannot apply {modifier}() without a column to modify")]
    NoCurrentColumn {
        /// The modifier that was called.
        modifier: &'static str,
    },

    /// `nullable()` was called on the auto-incrementing primary key.
    #[error("Primary key column '{column}' cannot be nullable")]
    NullablePrimaryKey {
        /// The primary key column.
        column: String,
    },

    /// A default value with no SQL literal, such as a NaN float.
    #[error("Column '{column}' cannot default to {value}")]
    InvalidDefault {
        /// The column being modified.
        column: String,
        /// The rejected value.
        value: String,
    },

    /// A table-level UNIQUE constraint without columns.
    #[error("Unique constraint on table '{table}' lists no columns")]
    EmptyConstraint {
        /// The table name.
        table: String,
    },

    /// CREATE TABLE was requested for a table with no columns.
    #[error("Table '{table}' has no columns")]
    EmptyTable {
        /// The table name.
        table: String,
    },
}

/// Errors raised while compiling a statement builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// INSERT or UPDATE without any column data.
    #[error("{kind} statement requires at least one column value")]
    MissingData {
        /// The statement kind being compiled.
        kind: StatementKind,
    },

    /// A WHERE fragment whose `?` count differs from its bound values.
    #[error(
        "Condition '{condition}' has {placeholders} placeholder(s) but {params} parameter(s) were bound"
    )]
    PlaceholderMismatch {
        /// The offending condition fragment.
        condition: String,
        /// Number of `?` placeholders found in the fragment.
        placeholders: usize,
        /// Number of values bound with the fragment.
        params: usize,
    },
}

/// Result type for SQL generation.
pub type Result<T> = std::result::Result<T, Error>;
