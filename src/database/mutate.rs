use super::Database;
use crate::error::SqlSugarError;
use crate::query_builder::{self, Where};
use crate::results::ResultSet;
use crate::types::SqlValue;

impl Database {
    /// Insert one row and return the generated id.
    ///
    /// ```rust,no_run
    /// # use sql_sugar::prelude::*;
    /// # fn demo(db: &mut Database) -> Result<(), SqlSugarError> {
    /// let id = db.insert("users", &columns! {"name" => "A", "age" => 5})?;
    /// # let _ = id;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns `ParameterError` for empty `data`, or the wrapped execution error.
    pub fn insert<K: AsRef<str>>(
        &mut self,
        table: &str,
        data: &[(K, SqlValue)],
    ) -> Result<i64, SqlSugarError> {
        self.execute(query_builder::insert(table, data)?)?;
        self.last_insert_id()
    }

    /// Update matching rows and return how many changed.
    ///
    /// # Errors
    /// Returns `ParameterError` for empty `data` or condition, or the wrapped
    /// execution error.
    pub fn update<K: AsRef<str>>(
        &mut self,
        table: &str,
        data: &[(K, SqlValue)],
        filter: impl Into<Where>,
    ) -> Result<usize, SqlSugarError> {
        let statement = query_builder::update(table, data, filter.into())?;
        Ok(self.execute(statement)?.rows_affected)
    }

    /// Delete matching rows, at most `limit` of them when given.
    ///
    /// `None` removes every matching row; there is no implicit single-row
    /// limit. Pass `Some(1)` to delete one row.
    ///
    /// # Errors
    /// Returns `ParameterError` for an empty condition, or the wrapped
    /// execution error.
    pub fn delete(
        &mut self,
        table: &str,
        filter: impl Into<Where>,
        limit: Option<u64>,
    ) -> Result<usize, SqlSugarError> {
        let statement = query_builder::delete(&self.dialect, table, filter.into(), limit)?;
        Ok(self.execute(statement)?.rows_affected)
    }

    /// # Errors
    /// Returns the wrapped execution error.
    pub fn delete_all(&mut self, table: &str) -> Result<usize, SqlSugarError> {
        Ok(self.execute(query_builder::delete_all(table))?.rows_affected)
    }

    /// # Errors
    /// Returns the wrapped execution error.
    pub fn delete_by_id(
        &mut self,
        table: &str,
        id: impl Into<SqlValue>,
    ) -> Result<usize, SqlSugarError> {
        Ok(self.execute(query_builder::delete_by_id(table, id))?.rows_affected)
    }

    /// Delete rows whose `column` is in the comma separated `ids`.
    ///
    /// `ids` is spliced into the SQL text without binding. Only pass values the
    /// application produced itself, such as a joined list of integers.
    ///
    /// # Errors
    /// Returns the wrapped execution error.
    pub fn delete_by_ids(
        &mut self,
        table: &str,
        column: &str,
        ids: &str,
    ) -> Result<usize, SqlSugarError> {
        Ok(self
            .execute(query_builder::delete_by_ids(table, column, ids))?
            .rows_affected)
    }

    /// Empty `table`.
    ///
    /// # Errors
    /// Returns the wrapped execution error.
    pub fn truncate(&mut self, table: &str) -> Result<usize, SqlSugarError> {
        let statement = query_builder::truncate(&self.dialect, table);
        Ok(self.execute(statement)?.rows_affected)
    }

    /// `SELECT * FROM table` filtered by column equality, bound by name.
    ///
    /// # Errors
    /// Returns the wrapped execution error.
    pub fn select<K: AsRef<str>>(
        &mut self,
        table: &str,
        filter: &[(K, SqlValue)],
    ) -> Result<ResultSet, SqlSugarError> {
        self.execute(query_builder::select(table, filter))
    }
}
