//! Schema definition and CREATE TABLE generation.

mod builder;
mod column;
mod table;

pub use builder::SchemaBuilder;
pub use column::{ColumnDefinition, ColumnType, DefaultValue};
pub use table::{DEFAULT_STRING_LENGTH, TableConstraint, TableSchema};
