#![allow(dead_code)]

use trisql_core::{Dialect, QueryBuilder, SchemaBuilder, SchemaError, SqlValue, TableSchema};

pub fn compile(builder: &QueryBuilder) -> (String, Vec<SqlValue>) {
    builder
        .to_sql()
        .unwrap_or_else(|e| panic!("Failed to compile {builder:?}\nError: {e}"))
}

pub fn create_table<F>(dialect: Dialect, name: &str, define: F) -> String
where
    F: FnOnce(&mut TableSchema) -> Result<(), SchemaError>,
{
    SchemaBuilder::new(dialect)
        .build(name, define)
        .unwrap_or_else(|e| panic!("Failed to build table {name} for {dialect}: {e}"))
}
