//! The execution seam between sessions and databases.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::mysql::{MySql, MySqlConnection, MySqlRow};
use sqlx::postgres::{PgConnection, PgRow, Postgres};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteConnection, SqliteRow};
use sqlx::{
    Column, Connection as _, Database, Encode, Executor as _, Row as _, Type, TypeInfo, ValueRef,
};
use tokio::sync::Mutex;
use trisql_core::{Dialect, SqlValue};

use crate::row::Row;

/// Runs SQL text with positional parameters.
///
/// Implemented by [`SqlxDriver`] for real databases; tests substitute
/// their own implementation to observe what a session sends.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Runs a statement and returns every row it produces.
    async fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, sqlx::Error>;

    /// Runs a statement and returns the number of affected rows.
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, sqlx::Error>;

    /// Starts a transaction.
    async fn begin(&self) -> Result<(), sqlx::Error>;

    /// Commits the open transaction.
    async fn commit(&self) -> Result<(), sqlx::Error>;

    /// Rolls back the open transaction.
    async fn rollback(&self) -> Result<(), sqlx::Error>;
}

/// The native connection for one dialect.
enum Connection {
    Sqlite(SqliteConnection),
    MySql(MySqlConnection),
    Postgres(PgConnection),
}

/// Binds `$params` to `$sql` for whichever connection is held, then
/// evaluates `$body` with the bound query and the connection.
macro_rules! with_query {
    ($conn:expr, $sql:expr, $params:expr, |$query:ident, $c:ident| $body:expr) => {
        match $conn {
            Connection::Sqlite($c) => {
                let $query = bind_all(sqlx::query::<Sqlite>($sql), $params);
                $body
            }
            Connection::MySql($c) => {
                let $query = bind_all(sqlx::query::<MySql>($sql), $params);
                $body
            }
            Connection::Postgres($c) => {
                let $query = bind_all(sqlx::query::<Postgres>($sql), $params);
                $body
            }
        }
    };
}

/// A single `sqlx` connection to SQLite, MySQL or PostgreSQL.
///
/// Statements are serialized on the connection, so a transaction opened
/// with [`Driver::begin`] covers every statement until commit or rollback.
pub struct SqlxDriver {
    conn: Mutex<Connection>,
}

impl fmt::Debug for SqlxDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlxDriver").finish_non_exhaustive()
    }
}

impl SqlxDriver {
    /// Opens a `dialect` connection to `url`.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the connection cannot be established.
    pub async fn connect(dialect: Dialect, url: &str) -> Result<Self, sqlx::Error> {
        let conn = match dialect {
            Dialect::Sqlite => Connection::Sqlite(SqliteConnection::connect(url).await?),
            Dialect::MySql => Connection::MySql(MySqlConnection::connect(url).await?),
            Dialect::Postgres => Connection::Postgres(PgConnection::connect(url).await?),
        };
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the shutdown handshake fails.
    pub async fn close(self) -> Result<(), sqlx::Error> {
        match self.conn.into_inner() {
            Connection::Sqlite(c) => c.close().await,
            Connection::MySql(c) => c.close().await,
            Connection::Postgres(c) => c.close().await,
        }
    }

    /// Runs a transaction control statement over the simple query protocol.
    async fn run_control(&self, sql: &'static str) -> Result<(), sqlx::Error> {
        let mut conn = self.conn.lock().await;
        match &mut *conn {
            Connection::Sqlite(c) => c.execute(sql).await.map(|_| ()),
            Connection::MySql(c) => c.execute(sql).await.map(|_| ()),
            Connection::Postgres(c) => c.execute(sql).await.map(|_| ()),
        }
    }
}

#[async_trait]
impl Driver for SqlxDriver {
    async fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, sqlx::Error> {
        let mut conn = self.conn.lock().await;
        let rows = with_query!(&mut *conn, sql, params, |query, c| {
            query
                .fetch_all(c)
                .await?
                .iter()
                .map(decode_row)
                .collect::<Result<Vec<_>, _>>()
        })?;
        Ok(rows)
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, sqlx::Error> {
        let mut conn = self.conn.lock().await;
        let result = with_query!(&mut *conn, sql, params, |query, c| {
            query.execute(c).await?.rows_affected()
        });
        Ok(result)
    }

    async fn begin(&self) -> Result<(), sqlx::Error> {
        self.run_control("BEGIN").await
    }

    async fn commit(&self) -> Result<(), sqlx::Error> {
        self.run_control("COMMIT").await
    }

    async fn rollback(&self) -> Result<(), sqlx::Error> {
        self.run_control("ROLLBACK").await
    }
}

type BoundQuery<'q, DB> = Query<'q, DB, <DB as Database>::Arguments<'q>>;

/// Binds every `SqlValue` parameter to a query, in order.
fn bind_all<'q, DB>(query: BoundQuery<'q, DB>, params: &[SqlValue]) -> BoundQuery<'q, DB>
where
    DB: Database,
    Option<i64>: Encode<'q, DB> + Type<DB>,
    bool: Encode<'q, DB> + Type<DB>,
    i64: Encode<'q, DB> + Type<DB>,
    f64: Encode<'q, DB> + Type<DB>,
    String: Encode<'q, DB> + Type<DB>,
    Vec<u8>: Encode<'q, DB> + Type<DB>,
{
    params.iter().fold(query, |query, value| match value.clone() {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    })
}

/// Per-dialect conversion of a native column value into a `SqlValue`.
trait DecodeValue: sqlx::Row {
    /// Decodes the non-NULL value at `index`.
    fn decode_value(&self, index: usize) -> Result<SqlValue, sqlx::Error>;
}

fn decode_row<R: DecodeValue>(row: &R) -> Result<Row, sqlx::Error>
where
    usize: sqlx::ColumnIndex<R>,
{
    let columns = row.columns().iter().map(|c| c.name().to_string()).collect();
    let values = (0..row.len())
        .map(|i| {
            if row.try_get_raw(i)?.is_null() {
                Ok(SqlValue::Null)
            } else {
                row.decode_value(i)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Row::new(columns, values))
}

fn out_of_range(e: std::num::TryFromIntError) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(e))
}

impl DecodeValue for SqliteRow {
    // SQLite reports the storage class of each value; only the declared
    // column type tells a boolean apart from an integer.
    fn decode_value(&self, index: usize) -> Result<SqlValue, sqlx::Error> {
        let declared = self.column(index).type_info().name();
        let storage = self.try_get_raw(index)?.type_info().name().to_string();
        match storage.as_str() {
            "INTEGER" if declared == "BOOLEAN" => self.try_get(index).map(SqlValue::Bool),
            "INTEGER" => self.try_get(index).map(SqlValue::Int),
            "REAL" => self.try_get(index).map(SqlValue::Float),
            "BLOB" => self.try_get(index).map(SqlValue::Blob),
            _ => self.try_get(index).map(SqlValue::Text),
        }
    }
}

impl DecodeValue for MySqlRow {
    fn decode_value(&self, index: usize) -> Result<SqlValue, sqlx::Error> {
        let name = self.column(index).type_info().name();
        match name {
            "BOOLEAN" => self.try_get(index).map(SqlValue::Bool),
            "TINYINT" | "SMALLINT" | "INT" | "MEDIUMINT" | "BIGINT" => {
                self.try_get(index).map(SqlValue::Int)
            }
            n if n.ends_with("UNSIGNED") => {
                let v: u64 = self.try_get(index)?;
                i64::try_from(v).map(SqlValue::Int).map_err(out_of_range)
            }
            "FLOAT" => self.try_get::<f32, _>(index).map(|f| SqlValue::Float(f.into())),
            "DOUBLE" => self.try_get(index).map(SqlValue::Float),
            "DATETIME" | "TIMESTAMP" => self
                .try_get::<NaiveDateTime, _>(index)
                .map(|t| SqlValue::Text(t.to_string())),
            "DATE" => self
                .try_get::<NaiveDate, _>(index)
                .map(|d| SqlValue::Text(d.to_string())),
            n if n.contains("BLOB") || n.contains("BINARY") => {
                self.try_get(index).map(SqlValue::Blob)
            }
            _ => self.try_get(index).map(SqlValue::Text),
        }
    }
}

impl DecodeValue for PgRow {
    fn decode_value(&self, index: usize) -> Result<SqlValue, sqlx::Error> {
        let name = self.column(index).type_info().name();
        match name {
            "BOOL" => self.try_get(index).map(SqlValue::Bool),
            "INT2" => self.try_get::<i16, _>(index).map(|i| SqlValue::Int(i.into())),
            "INT4" => self.try_get::<i32, _>(index).map(|i| SqlValue::Int(i.into())),
            "INT8" => self.try_get(index).map(SqlValue::Int),
            "FLOAT4" => self.try_get::<f32, _>(index).map(|f| SqlValue::Float(f.into())),
            "FLOAT8" => self.try_get(index).map(SqlValue::Float),
            "TIMESTAMP" => self
                .try_get::<NaiveDateTime, _>(index)
                .map(|t| SqlValue::Text(t.to_string())),
            "TIMESTAMPTZ" => self
                .try_get::<DateTime<Utc>, _>(index)
                .map(|t| SqlValue::Text(t.naive_utc().to_string())),
            "DATE" => self
                .try_get::<NaiveDate, _>(index)
                .map(|d| SqlValue::Text(d.to_string())),
            "BYTEA" => self.try_get(index).map(SqlValue::Blob),
            _ => self.try_get(index).map(SqlValue::Text),
        }
    }
}
