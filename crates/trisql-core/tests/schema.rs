//! CREATE TABLE output across dialects.

mod common;
use common::*;

use trisql_core::{Dialect, SchemaBuilder, SchemaError, TableSchema};

#[test]
fn primary_key_per_dialect() {
    for (dialect, marker) in [
        (Dialect::Sqlite, "AUTOINCREMENT"),
        (Dialect::MySql, "AUTO_INCREMENT"),
        (Dialect::Postgres, "SERIAL"),
    ] {
        let sql = create_table(dialect, "t", |t| {
            t.id();
            Ok(())
        });
        assert!(sql.contains("PRIMARY KEY"), "{dialect}: {sql}");
        assert!(sql.contains(marker), "{dialect}: {sql}");
    }
}

#[test]
fn nullable_then_required_has_one_marker() {
    let sql = create_table(Dialect::Postgres, "t", |t| {
        t.string("title").nullable()?.required()?;
        Ok(())
    });
    assert_eq!(sql.matches("NULL").count(), 1);
    assert!(sql.contains("title VARCHAR(255) NOT NULL"));
}

#[test]
fn modifier_before_any_column_fails() {
    let mut table = TableSchema::new("t", Dialect::Sqlite);
    for result in [
        table.nullable().map(|_| ()),
        table.required().map(|_| ()),
        table.unique().map(|_| ()),
        table.default("x").map(|_| ()),
    ] {
        assert!(matches!(result, Err(SchemaError::NoCurrentColumn { .. })));
    }
}

#[test]
fn blog_table_mysql() {
    let sql = create_table(Dialect::MySql, "posts", |t| {
        t.id();
        t.string_with_length("slug", 120).unique()?;
        t.string("title");
        t.integer("views").default(0_i64)?;
        t.boolean("published").default(false)?;
        t.timestamp("published_at").nullable()?;
        t.timestamps();
        Ok(())
    });

    assert_eq!(
        sql,
        "CREATE TABLE posts (\n\
         id INT AUTO_INCREMENT PRIMARY KEY,\n\
         slug VARCHAR(120) NOT NULL UNIQUE,\n\
         title VARCHAR(255) NOT NULL,\n\
         views INTEGER NOT NULL DEFAULT 0,\n\
         published BOOLEAN NOT NULL DEFAULT FALSE,\n\
         published_at DATETIME,\n\
         created_at DATETIME,\n\
         updated_at DATETIME DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP\n\
         ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"
    );
}

#[test]
fn sqlite_has_no_table_options() {
    let sql = create_table(Dialect::Sqlite, "t", |t| {
        t.id();
        Ok(())
    });
    assert!(sql.ends_with("\n)"));
}

#[test]
fn render_reuses_a_table_definition() {
    let mut table = TableSchema::new("tags", Dialect::Postgres);
    table.id();
    table.string("name").unique().unwrap();

    let first = SchemaBuilder::new(Dialect::Postgres).render(&table).unwrap();
    let second = SchemaBuilder::new(Dialect::Postgres).render(&table).unwrap();
    assert_eq!(first, second);
}
