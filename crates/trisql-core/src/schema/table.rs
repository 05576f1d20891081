//! Fluent table schema definition.
//!
//! Column adders append a column and make it current. Modifiers change the
//! current column and fail with [`SchemaError::NoCurrentColumn`] when no
//! column has been added yet.

use super::column::{ColumnDefinition, ColumnType, DefaultValue};
use crate::dialect::Dialect;
use crate::error::SchemaError;

/// Default length of `string()` columns.
pub const DEFAULT_STRING_LENGTH: u32 = 255;

/// A table-level constraint, rendered after all columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableConstraint {
    /// UNIQUE across several columns.
    Unique {
        /// Columns covered by the constraint.
        columns: Vec<String>,
    },
}

impl TableConstraint {
    /// Renders the constraint fragment.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Unique { columns } => format!("UNIQUE ({})", columns.join(", ")),
        }
    }
}

/// The columns and constraints of a table being defined.
///
/// # Example
///
/// ```rust
/// use trisql_core::{Dialect, TableSchema};
///
/// let mut table = TableSchema::new("users", Dialect::Sqlite);
/// table.id();
/// table.string("email").unique().unwrap();
/// table.boolean("active").default(true).unwrap();
///
/// assert_eq!(table.columns().len(), 3);
/// assert_eq!(table.column_sql(1).unwrap(), "email VARCHAR(255) NOT NULL UNIQUE");
/// ```
#[derive(Debug, Clone)]
pub struct TableSchema {
    name: String,
    dialect: Dialect,
    columns: Vec<ColumnDefinition>,
    constraints: Vec<TableConstraint>,
    current: Option<usize>,
}

impl TableSchema {
    /// Creates an empty schema for `name` in `dialect`.
    #[must_use]
    pub fn new(name: impl Into<String>, dialect: Dialect) -> Self {
        Self {
            name: name.into(),
            dialect,
            columns: Vec::new(),
            constraints: Vec::new(),
            current: None,
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dialect the schema renders for.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the columns in definition order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Returns the table-level constraints in definition order.
    #[must_use]
    pub fn constraints(&self) -> &[TableConstraint] {
        &self.constraints
    }

    /// Returns the column modifiers currently apply to.
    #[must_use]
    pub fn current_column(&self) -> Option<&ColumnDefinition> {
        self.current.and_then(|i| self.columns.get(i))
    }

    /// Renders the column at `index`.
    #[must_use]
    pub fn column_sql(&self, index: usize) -> Option<String> {
        self.columns.get(index).map(|c| c.to_sql(self.dialect))
    }

    /// Appends a column and makes it current.
    pub fn column(&mut self, column: ColumnDefinition) -> &mut Self {
        self.columns.push(column);
        self.current = Some(self.columns.len() - 1);
        self
    }

    /// Adds an auto-incrementing primary key named `id`.
    pub fn id(&mut self) -> &mut Self {
        self.id_named("id")
    }

    /// Adds an auto-incrementing primary key.
    pub fn id_named(&mut self, name: &str) -> &mut Self {
        self.column(ColumnDefinition::primary_key(name))
    }

    /// Adds a `VARCHAR(255)` column.
    pub fn string(&mut self, name: &str) -> &mut Self {
        self.string_with_length(name, DEFAULT_STRING_LENGTH)
    }

    /// Adds a `VARCHAR(length)` column.
    pub fn string_with_length(&mut self, name: &str, length: u32) -> &mut Self {
        self.column(ColumnDefinition::new(name, ColumnType::Varchar(length)))
    }

    /// Adds an `INTEGER` column.
    pub fn integer(&mut self, name: &str) -> &mut Self {
        self.column(ColumnDefinition::new(name, ColumnType::Integer))
    }

    /// Adds a `BOOLEAN` column.
    pub fn boolean(&mut self, name: &str) -> &mut Self {
        self.column(ColumnDefinition::new(name, ColumnType::Boolean))
    }

    /// Adds a timestamp column.
    pub fn timestamp(&mut self, name: &str) -> &mut Self {
        self.column(ColumnDefinition::new(name, ColumnType::Timestamp))
    }

    /// Adds nullable `created_at` and `updated_at` columns.
    ///
    /// `updated_at` defaults to the current time and, on MySQL, is touched
    /// on every update. `updated_at` is left as the current column.
    pub fn timestamps(&mut self) -> &mut Self {
        let mut created_at = ColumnDefinition::new("created_at", ColumnType::Timestamp);
        created_at.nullable = Some(true);

        let mut updated_at = ColumnDefinition::new("updated_at", ColumnType::Timestamp);
        updated_at.nullable = Some(true);
        updated_at.auto_touch = true;

        self.column(created_at).column(updated_at)
    }

    /// Allows NULL in the current column.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoCurrentColumn`] if no column has been added
    /// and [`SchemaError::NullablePrimaryKey`] on the primary key.
    pub fn nullable(&mut self) -> Result<&mut Self, SchemaError> {
        let column = self.current_mut("nullable")?;
        if column.primary_key {
            return Err(SchemaError::NullablePrimaryKey {
                column: column.name.clone(),
            });
        }
        column.nullable = Some(true);
        Ok(self)
    }

    /// Marks the current column NOT NULL, overriding `nullable()`.
    ///
    /// On the primary key this adds an explicit `NOT NULL`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoCurrentColumn`] if no column has been added.
    pub fn required(&mut self) -> Result<&mut Self, SchemaError> {
        self.current_mut("required")?.nullable = Some(false);
        Ok(self)
    }

    /// Appends a DEFAULT clause to the current column.
    ///
    /// Calling this twice renders two DEFAULT clauses; the database will
    /// reject the statement.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoCurrentColumn`] if no column has been added
    /// and [`SchemaError::InvalidDefault`] for a NaN or infinite float.
    pub fn default(&mut self, value: impl Into<DefaultValue>) -> Result<&mut Self, SchemaError> {
        let value = value.into();
        let column = self.current_mut("default")?;
        if !value.is_representable() {
            return Err(SchemaError::InvalidDefault {
                column: column.name.clone(),
                value: value.to_sql(),
            });
        }
        column.defaults.push(value);
        Ok(self)
    }

    /// Marks the current column UNIQUE.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoCurrentColumn`] if no column has been added.
    pub fn unique(&mut self) -> Result<&mut Self, SchemaError> {
        self.current_mut("unique")?.unique = true;
        Ok(self)
    }

    /// Adds a table-level UNIQUE constraint over `columns`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyConstraint`] if `columns` is empty.
    pub fn add_unique_constraint(&mut self, columns: &[&str]) -> Result<&mut Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::EmptyConstraint {
                table: self.name.clone(),
            });
        }
        self.constraints.push(TableConstraint::Unique {
            columns: columns.iter().map(|&c| c.to_string()).collect(),
        });
        Ok(self)
    }

    fn current_mut(&mut self, modifier: &'static str) -> Result<&mut ColumnDefinition, SchemaError> {
        self.current
            .and_then(|i| self.columns.get_mut(i))
            .ok_or(SchemaError::NoCurrentColumn { modifier })
    }
}
