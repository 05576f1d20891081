//! Fluent statement builders.
//!
//! A [`QueryBuilder`] collects the parts of one statement and compiles them
//! into dialect-specific SQL plus an ordered list of bound values.

mod clause;
mod queue;
mod statement;

pub use clause::{Direction, Filter, Join, JoinType};
pub use queue::StatementQueue;
pub use statement::{QueryBuilder, StatementKind};
