//! Deferred statement batches.

use super::statement::QueryBuilder;

/// An ordered list of statements to run later as one batch.
///
/// Builders are stored uncompiled; whoever executes the queue compiles and
/// runs them in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StatementQueue {
    statements: Vec<QueryBuilder>,
}

impl StatementQueue {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            statements: Vec::new(),
        }
    }

    /// Appends a builder.
    pub fn push(&mut self, builder: QueryBuilder) {
        self.statements.push(builder);
    }

    /// Number of queued statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Iterates over the queued builders in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, QueryBuilder> {
        self.statements.iter()
    }
}

impl IntoIterator for StatementQueue {
    type Item = QueryBuilder;
    type IntoIter = std::vec::IntoIter<QueryBuilder>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

impl<'a> IntoIterator for &'a StatementQueue {
    type Item = &'a QueryBuilder;
    type IntoIter = std::slice::Iter<'a, QueryBuilder>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

impl FromIterator<QueryBuilder> for StatementQueue {
    fn from_iter<I: IntoIterator<Item = QueryBuilder>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}
