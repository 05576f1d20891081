//! DDL execution for a session.

use tracing::info;
use trisql_core::{SchemaBuilder, SchemaError, TableSchema};

use crate::database::Database;
use crate::driver::Driver;
use crate::error::Result;

/// Creates and drops tables through a [`Database`].
#[derive(Debug)]
pub struct Schema<'db, D: Driver> {
    db: &'db Database<D>,
    builder: SchemaBuilder,
}

impl<'db, D: Driver> Schema<'db, D> {
    pub(crate) const fn new(db: &'db Database<D>) -> Self {
        Self {
            db,
            builder: SchemaBuilder::new(db.dialect()),
        }
    }

    /// Renders the CREATE TABLE statement without running it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Schema`] for an invalid definition.
    pub fn create_table_sql<F>(&self, name: &str, define: F) -> Result<String>
    where
        F: FnOnce(&mut TableSchema) -> std::result::Result<(), SchemaError>,
    {
        Ok(self.builder.build(name, define)?)
    }

    /// Defines and creates a table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Schema`] for an invalid definition and
    /// [`crate::Error::QueryFailure`] if the database rejects it.
    pub async fn create_table<F>(&self, name: &str, define: F) -> Result<&Self>
    where
        F: FnOnce(&mut TableSchema) -> std::result::Result<(), SchemaError>,
    {
        let sql = self.create_table_sql(name, define)?;
        info!(table = %name, "Creating table");
        self.db.statement(&sql, Vec::new()).await?;
        Ok(self)
    }

    /// Drops a table if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::QueryFailure`] if the database rejects it.
    pub async fn drop_table(&self, name: &str) -> Result<&Self> {
        let sql = self.builder.drop_table(name);
        info!(table = %name, "Dropping table");
        self.db.statement(&sql, Vec::new()).await?;
        Ok(self)
    }
}
