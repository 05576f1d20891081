//! CREATE TABLE / DROP TABLE generation.

use super::table::{TableConstraint, TableSchema};
use crate::dialect::Dialect;
use crate::error::SchemaError;

/// Turns table definitions into DDL for one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaBuilder {
    dialect: Dialect,
}

impl SchemaBuilder {
    /// Creates a builder for `dialect`.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Returns the dialect this builder renders for.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Runs `define` against a fresh [`TableSchema`] and renders it.
    ///
    /// # Errors
    ///
    /// Propagates any error from `define`, and returns
    /// [`SchemaError::EmptyTable`] if no column was added.
    pub fn build<F>(&self, name: &str, define: F) -> Result<String, SchemaError>
    where
        F: FnOnce(&mut TableSchema) -> Result<(), SchemaError>,
    {
        let mut table = TableSchema::new(name, self.dialect);
        define(&mut table)?;
        self.render(&table)
    }

    /// Renders a CREATE TABLE statement for `table`.
    ///
    /// Columns come first in definition order, then table constraints,
    /// then the dialect's table options.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyTable`] if the table has no columns.
    pub fn render(&self, table: &TableSchema) -> Result<String, SchemaError> {
        if table.columns().is_empty() {
            return Err(SchemaError::EmptyTable {
                table: table.name().to_string(),
            });
        }

        let mut sql = format!("CREATE TABLE {} (\n", table.name());

        let column_defs: Vec<String> = table
            .columns()
            .iter()
            .map(|c| c.to_sql(self.dialect))
            .collect();
        sql.push_str(&column_defs.join(",\n"));

        if !table.constraints().is_empty() {
            sql.push_str(",\n");
            let constraint_defs: Vec<String> = table
                .constraints()
                .iter()
                .map(TableConstraint::to_sql)
                .collect();
            sql.push_str(&constraint_defs.join(",\n"));
        }

        sql.push_str("\n)");

        let options = self.dialect.table_options_syntax();
        if !options.is_empty() {
            sql.push(' ');
            sql.push_str(options);
        }

        Ok(sql)
    }

    /// Renders a DROP TABLE statement that tolerates a missing table.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn drop_table(&self, name: &str) -> String {
        format!("DROP TABLE IF EXISTS {name}")
    }
}
