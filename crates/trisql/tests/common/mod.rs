#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use trisql::{Database, Driver, Row};
use trisql_core::{Dialect, SqlValue};

/// One call observed by [`RecordingDriver`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch(String, Vec<SqlValue>),
    Execute(String, Vec<SqlValue>),
    Begin,
    Commit,
    Rollback,
}

/// A driver that records every call and fails statements containing a
/// configured fragment. Transaction control is matched as `BEGIN`,
/// `COMMIT` and `ROLLBACK`.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    calls: Mutex<Vec<Call>>,
    fail_on: Vec<String>,
    rows: Vec<Row>,
}

impl RecordingDriver {
    pub fn failing_on(fragment: &str) -> Self {
        Self::default().also_failing_on(fragment)
    }

    pub fn also_failing_on(mut self, fragment: &str) -> Self {
        self.fail_on.push(fragment.to_string());
        self
    }

    pub fn returning(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, sql: &str) -> Result<(), sqlx::Error> {
        if self.fail_on.iter().any(|fragment| sql.contains(fragment.as_str())) {
            Err(sqlx::Error::Protocol(format!("refused: {sql}")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Driver for RecordingDriver {
    async fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, sqlx::Error> {
        self.record(Call::Fetch(sql.to_string(), params.to_vec()));
        self.check(sql)?;
        Ok(self.rows.clone())
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, sqlx::Error> {
        self.record(Call::Execute(sql.to_string(), params.to_vec()));
        self.check(sql)?;
        Ok(1)
    }

    async fn begin(&self) -> Result<(), sqlx::Error> {
        self.record(Call::Begin);
        self.check("BEGIN")
    }

    async fn commit(&self) -> Result<(), sqlx::Error> {
        self.record(Call::Commit);
        self.check("COMMIT")
    }

    async fn rollback(&self) -> Result<(), sqlx::Error> {
        self.record(Call::Rollback);
        self.check("ROLLBACK")
    }
}

pub fn recording(dialect: Dialect) -> Database<RecordingDriver> {
    Database::with_driver(dialect, RecordingDriver::default())
}

pub async fn memory_db() -> Database {
    Database::open("sqlite", &params(&[("database", ":memory:")]))
        .await
        .expect("Failed to open in-memory SQLite")
}

pub fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|&(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
