use std::sync::Arc;

use super::row::Row;
use crate::types::SqlValue;

/// A result set from a database query
///
/// Holds the rows a statement returned, or the number of rows it changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<Row>,
    /// Rows changed by a DML statement, or rows returned by a query
    pub rows_affected: usize,
    column_names: Arc<Vec<String>>,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: Arc::new(Vec::new()),
        }
    }

    /// Result of a statement that returns no rows.
    #[must_use]
    pub fn affected(rows_affected: usize) -> ResultSet {
        ResultSet {
            rows_affected,
            ..ResultSet::default()
        }
    }

    /// Set the column names for this result set (shared by all rows)
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_names = column_names;
    }

    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    /// Whether the statement produced a column list (a query rather than DML).
    #[must_use]
    pub fn has_columns(&self) -> bool {
        !self.column_names.is_empty()
    }

    /// Add a row to the result set
    pub fn add_row_values(&mut self, row_values: Vec<SqlValue>) {
        self.results
            .push(Row::new(Arc::clone(&self.column_names), row_values));
        self.rows_affected += 1;
    }

    /// Rows returned for a query, rows affected otherwise.
    #[must_use]
    pub fn row_count(&self) -> usize {
        if self.has_columns() {
            self.results.len()
        } else {
            self.rows_affected
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<&Row> {
        self.results.first()
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
