//! Database sessions.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};
use trisql_core::{Dialect, QueryBuilder, SqlValue, StatementQueue};

use crate::config::ConnectionConfig;
use crate::driver::{Driver, SqlxDriver};
use crate::error::{Error, Result};
use crate::row::Row;
use crate::schema::Schema;

/// What executing a statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Rows returned by a SELECT.
    Rows(Vec<Row>),
    /// A write completed.
    Success {
        /// Rows inserted, updated or deleted.
        rows_affected: u64,
    },
}

impl Outcome {
    /// Returns the rows of a SELECT outcome.
    #[must_use]
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Success { .. } => None,
        }
    }

    /// Consumes the outcome, returning its rows or an empty list.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Self::Rows(rows) => rows,
            Self::Success { .. } => Vec::new(),
        }
    }

    /// Returns the affected row count of a write outcome.
    #[must_use]
    pub const fn rows_affected(&self) -> Option<u64> {
        match self {
            Self::Rows(_) => None,
            Self::Success { rows_affected } => Some(*rows_affected),
        }
    }
}

/// A session bound to one dialect and one connection.
///
/// Builders created from the session target its dialect. Executing a
/// builder consumes it.
///
/// # Example
///
/// ```rust,no_run
/// use std::collections::BTreeMap;
/// use trisql::Database;
///
/// # async fn run() -> trisql::Result<()> {
/// let params = BTreeMap::from([("database".to_string(), ":memory:".to_string())]);
/// let db = Database::open("sqlite", &params).await?;
///
/// db.schema().create_table("posts", |t| {
///     t.id();
///     t.string("title");
///     Ok(())
/// }).await?;
///
/// db.execute(db.insert("posts").value("title", "Hello")).await?;
/// let rows = db.fetch_all(db.select("posts").where_clause("id = ?", [1])).await?;
/// assert_eq!(rows.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Database<D: Driver = SqlxDriver> {
    dialect: Dialect,
    driver: D,
}

impl Database<SqlxDriver> {
    /// Connects using a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionFailure`] if the database is unreachable.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let url = config.connection_url()?;
        let redacted = config.redacted_url();
        info!(driver = %config.dialect(), url = %redacted, "Connecting to database");

        let driver = SqlxDriver::connect(config.dialect(), &url)
            .await
            .map_err(|source| Error::ConnectionFailure {
                url: redacted,
                source,
            })?;

        Ok(Self::with_driver(config.dialect(), driver))
    }

    /// Validates `params` for the driver `tag` and connects.
    ///
    /// # Errors
    ///
    /// Returns a configuration error before any connection attempt, or
    /// [`Error::ConnectionFailure`].
    pub async fn open(tag: &str, params: &BTreeMap<String, String>) -> Result<Self> {
        let config = ConnectionConfig::from_params(tag, params)?;
        Self::connect(&config).await
    }
}

impl<D: Driver> Database<D> {
    /// Wraps an existing driver.
    #[must_use]
    pub const fn with_driver(dialect: Dialect, driver: D) -> Self {
        Self { dialect, driver }
    }

    /// Returns the session dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the underlying driver.
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Starts a SELECT against `table`.
    pub fn select(&self, table: &str) -> QueryBuilder {
        QueryBuilder::select(self.dialect, table)
    }

    /// Starts an INSERT into `table`.
    pub fn insert(&self, table: &str) -> QueryBuilder {
        QueryBuilder::insert(self.dialect, table)
    }

    /// Starts an UPDATE of `table`.
    pub fn update(&self, table: &str) -> QueryBuilder {
        QueryBuilder::update(self.dialect, table)
    }

    /// Starts a DELETE from `table`.
    pub fn delete(&self, table: &str) -> QueryBuilder {
        QueryBuilder::delete(self.dialect, table)
    }

    /// Returns the schema handle for DDL.
    #[must_use]
    pub const fn schema(&self) -> Schema<'_, D> {
        Schema::new(self)
    }

    /// Compiles and runs a builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Build`] if the builder does not compile and
    /// [`Error::QueryFailure`] if the database rejects the statement.
    #[allow(clippy::needless_pass_by_value)]
    pub async fn execute(&self, builder: QueryBuilder) -> Result<Outcome> {
        let (sql, params) = builder.to_sql()?;
        if builder.kind().returns_rows() {
            Ok(Outcome::Rows(self.query(&sql, params).await?))
        } else {
            let rows_affected = self.statement(&sql, params).await?;
            Ok(Outcome::Success { rows_affected })
        }
    }

    /// Compiles a builder and returns the rows it produces.
    ///
    /// # Errors
    ///
    /// See [`Database::execute`].
    #[allow(clippy::needless_pass_by_value)]
    pub async fn fetch_all(&self, builder: QueryBuilder) -> Result<Vec<Row>> {
        let (sql, params) = builder.to_sql()?;
        self.query(&sql, params).await
    }

    /// Runs raw SQL that returns rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueryFailure`] carrying `sql` and `params`.
    pub async fn query(&self, sql: &str, params: Vec<SqlValue>) -> Result<Vec<Row>> {
        debug!(sql = %sql, params = params.len(), "Fetching rows");
        self.driver
            .fetch_all(sql, &params)
            .await
            .map_err(|source| Error::QueryFailure {
                sql: sql.to_string(),
                params,
                source,
            })
    }

    /// Runs raw SQL that writes, returning the affected row count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueryFailure`] carrying `sql` and `params`.
    pub async fn statement(&self, sql: &str, params: Vec<SqlValue>) -> Result<u64> {
        debug!(sql = %sql, params = params.len(), "Executing SQL");
        self.driver
            .execute(sql, &params)
            .await
            .map_err(|source| Error::QueryFailure {
                sql: sql.to_string(),
                params,
                source,
            })
    }

    /// Runs every queued builder inside one transaction, in queue order.
    ///
    /// The first failure rolls the transaction back. An empty queue does
    /// not touch the connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BatchFailure`] naming the failing statement, or a
    /// [`Error::QueryFailure`] if the transaction cannot be opened or
    /// committed. A failed commit is followed by a rollback.
    pub async fn execute_queue(&self, queue: StatementQueue) -> Result<Vec<Outcome>> {
        if queue.is_empty() {
            return Ok(Vec::new());
        }

        info!(statements = queue.len(), "Running statement batch");
        self.begin().await?;

        let mut outcomes = Vec::with_capacity(queue.len());
        for (index, builder) in queue.into_iter().enumerate() {
            match self.execute(builder).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(source) => {
                    warn!(index, error = %source, "Batch statement failed, rolling back");
                    self.rollback_quietly().await;
                    return Err(Error::BatchFailure {
                        index,
                        source: Box::new(source),
                    });
                }
            }
        }

        if let Err(e) = self.commit().await {
            warn!(error = %e, "Batch commit failed, rolling back");
            self.rollback_quietly().await;
            return Err(e);
        }
        Ok(outcomes)
    }

    /// Rolls back after a failure, logging instead of returning a second error.
    async fn rollback_quietly(&self) {
        if let Err(e) = self.rollback().await {
            warn!(error = %e, "Rollback failed");
        }
    }

    /// Starts a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueryFailure`] if the database refuses.
    pub async fn begin(&self) -> Result<()> {
        debug!("Beginning transaction");
        self.driver
            .begin()
            .await
            .map_err(|source| transaction_failure("BEGIN", source))
    }

    /// Commits the open transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueryFailure`] if the database refuses.
    pub async fn commit(&self) -> Result<()> {
        debug!("Committing transaction");
        self.driver
            .commit()
            .await
            .map_err(|source| transaction_failure("COMMIT", source))
    }

    /// Rolls back the open transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueryFailure`] if the database refuses.
    pub async fn rollback(&self) -> Result<()> {
        warn!("Rolling back transaction");
        self.driver
            .rollback()
            .await
            .map_err(|source| transaction_failure("ROLLBACK", source))
    }
}

fn transaction_failure(sql: &str, source: sqlx::Error) -> Error {
    Error::QueryFailure {
        sql: sql.to_string(),
        params: Vec::new(),
        source,
    }
}
