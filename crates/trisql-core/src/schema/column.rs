//! Column descriptors for table schemas.

use crate::dialect::Dialect;

/// Default value for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// NULL default.
    Null,
    /// Boolean default.
    Boolean(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default.
    String(String),
    /// Raw SQL expression (e.g., `CURRENT_TIMESTAMP`).
    Expression(String),
}

impl DefaultValue {
    /// Creates a raw expression default.
    #[must_use]
    pub fn expression(expr: impl Into<String>) -> Self {
        Self::Expression(expr.into())
    }

    /// Returns false for a float that has no SQL literal (NaN, infinities).
    #[must_use]
    pub const fn is_representable(&self) -> bool {
        match self {
            Self::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    /// Returns the literal written after `DEFAULT`.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Boolean(true) => String::from("TRUE"),
            Self::Boolean(false) => String::from("FALSE"),
            Self::Integer(n) => n.to_string(),
            Self::Float(x) => x.to_string(),
            Self::String(text) => format!("'{}'", text.replace('\'', "''")),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

impl From<bool> for DefaultValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for DefaultValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for DefaultValue {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<f64> for DefaultValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for DefaultValue {
    fn from(text: &str) -> Self {
        Self::String(text.to_owned())
    }
}

impl<T: Into<Self>> From<Option<T>> for DefaultValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Column data types offered by the schema builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Variable length string with a maximum length.
    Varchar(u32),
    /// Integer.
    Integer,
    /// Boolean.
    Boolean,
    /// Date and time; the keyword depends on the dialect.
    Timestamp,
}

impl ColumnType {
    /// Returns the type keyword for a dialect.
    #[must_use]
    pub fn sql(self, dialect: Dialect) -> String {
        match self {
            Self::Varchar(len) => format!("VARCHAR({len})"),
            Self::Integer => String::from("INTEGER"),
            Self::Boolean => String::from("BOOLEAN"),
            Self::Timestamp => dialect.timestamp_type().to_string(),
        }
    }
}

/// A column within a table schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Data type. Ignored for primary keys, whose type comes from the dialect.
    pub column_type: ColumnType,
    /// Nullability set by a modifier. Unset means NOT NULL, except on the
    /// primary key, whose fragment carries no marker of its own.
    pub nullable: Option<bool>,
    /// DEFAULT clauses, in the order they were added.
    pub defaults: Vec<DefaultValue>,
    /// Whether the column is UNIQUE.
    pub unique: bool,
    /// Whether this is the auto-incrementing primary key.
    pub primary_key: bool,
    /// Whether the column carries the dialect's auto-touch timestamp default.
    pub auto_touch: bool,
}

impl ColumnDefinition {
    /// Creates a NOT NULL column.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: None,
            defaults: Vec::new(),
            unique: false,
            primary_key: false,
            auto_touch: false,
        }
    }

    /// Creates an auto-incrementing primary key column.
    #[must_use]
    pub fn primary_key(name: impl Into<String>) -> Self {
        Self {
            primary_key: true,
            ..Self::new(name, ColumnType::Integer)
        }
    }

    /// Renders the column definition fragment.
    #[must_use]
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let mut sql = if self.primary_key {
            dialect.primary_key_syntax(&self.name)
        } else {
            format!("{} {}", self.name, self.column_type.sql(dialect))
        };
        if self.nullable.map_or(!self.primary_key, |nullable| !nullable) {
            sql.push_str(" NOT NULL");
        }

        if self.auto_touch {
            sql.push(' ');
            sql.push_str(dialect.timestamp_default_syntax());
        }

        for default in &self.defaults {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default.to_sql());
        }

        if self.unique {
            sql.push_str(" UNIQUE");
        }

        sql
    }
}
