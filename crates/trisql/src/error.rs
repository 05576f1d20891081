//! Error types for database sessions.

use trisql_core::SqlValue;

/// Errors that can occur while configuring or using a database session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Dialect or statement-kind resolution failed.
    #[error(transparent)]
    Core(#[from] trisql_core::Error),

    /// A table definition was invalid.
    #[error(transparent)]
    Schema(#[from] trisql_core::SchemaError),

    /// A statement builder failed to compile.
    #[error(transparent)]
    Build(#[from] trisql_core::BuildError),

    /// A required connection parameter was not supplied.
    #[error("Missing '{key}' connection parameter for {driver}")]
    MissingConfigKey {
        /// The driver tag being configured.
        driver: String,
        /// The missing parameter.
        key: &'static str,
    },

    /// A connection parameter could not be interpreted.
    #[error("Invalid value for '{key}': {value}")]
    InvalidConfigValue {
        /// The parameter name.
        key: String,
        /// The rejected value.
        value: String,
    },

    /// The JSON configuration document could not be read.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// Opening the connection failed.
    #[error("Connection to {url} failed: {source}")]
    ConnectionFailure {
        /// The connection URL with any password redacted.
        url: String,
        /// The driver error.
        source: sqlx::Error,
    },

    /// A statement failed to execute.
    #[error("Query failed: {source}\nSQL: {sql}\nParams: {}", format_params(.params))]
    QueryFailure {
        /// The SQL text sent to the database.
        sql: String,
        /// The bound parameters.
        params: Vec<SqlValue>,
        /// The driver error.
        source: sqlx::Error,
    },

    /// A statement inside a queued batch failed; the batch was rolled back.
    #[error("Batch statement {index} failed: {source}")]
    BatchFailure {
        /// Zero-based position of the failing statement in the queue.
        index: usize,
        /// The underlying failure.
        source: Box<Error>,
    },
}

fn format_params(params: &[SqlValue]) -> String {
    let rendered: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

/// Result type for database sessions.
pub type Result<T> = std::result::Result<T, Error>;
