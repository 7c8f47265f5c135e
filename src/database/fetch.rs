use std::collections::HashMap;

use super::Database;
use crate::arguments::Args;
use crate::error::SqlSugarError;
use crate::query_builder;
use crate::results::{KeyedRows, Row, shape};
use crate::types::SqlValue;

impl Database {
    /// Every row of the result.
    ///
    /// # Errors
    /// Propagates any [`run`](Database::run) error.
    pub fn rows(&mut self, sql: &str, args: impl Into<Args>) -> Result<Vec<Row>, SqlSugarError> {
        Ok(self.run(sql, args)?.results)
    }

    /// Every row as a column name → value map.
    ///
    /// # Errors
    /// Propagates any [`run`](Database::run) error.
    pub fn rows_array(
        &mut self,
        sql: &str,
        args: impl Into<Args>,
    ) -> Result<Vec<HashMap<String, SqlValue>>, SqlSugarError> {
        Ok(shape::maps(self.run(sql, args)?))
    }

    /// Every row as a JSON array of objects, columns in select order.
    ///
    /// # Errors
    /// Propagates any [`run`](Database::run) or serialization error.
    pub fn rows_json(&mut self, sql: &str, args: impl Into<Args>) -> Result<String, SqlSugarError> {
        let rs = self.run(sql, args)?;
        shape::to_json(&rs.results)
    }

    /// Rows keyed by their first column, which is dropped from each row.
    /// A repeated key keeps its first position and the last row.
    ///
    /// # Errors
    /// Propagates any [`run`](Database::run) error, or `ShapeError` when the
    /// statement returns no columns.
    pub fn rows_list(
        &mut self,
        sql: &str,
        args: impl Into<Args>,
    ) -> Result<KeyedRows<Row>, SqlSugarError> {
        shape::unique(self.run(sql, args)?)
    }

    /// Like [`rows_list`](Database::rows_list) with plain maps for values.
    ///
    /// # Errors
    /// Same as [`rows_list`](Database::rows_list).
    pub fn rows_array_list(
        &mut self,
        sql: &str,
        args: impl Into<Args>,
    ) -> Result<KeyedRows<HashMap<String, SqlValue>>, SqlSugarError> {
        let keyed = shape::unique(self.run(sql, args)?)?;
        let mut out = KeyedRows::new();
        for (key, row) in keyed {
            out.insert(key, row.to_map());
        }
        Ok(out)
    }

    /// Rows grouped under their first column value.
    ///
    /// # Errors
    /// Propagates any [`run`](Database::run) error, or `ShapeError` when the
    /// statement returns no columns.
    pub fn rows_group(
        &mut self,
        sql: &str,
        args: impl Into<Args>,
    ) -> Result<KeyedRows<Vec<Row>>, SqlSugarError> {
        shape::group(self.run(sql, args)?)
    }

    /// First column → second column.
    ///
    /// # Errors
    /// Propagates any [`run`](Database::run) error, or `ShapeError` when fewer
    /// than two columns come back.
    pub fn rows_column_list(
        &mut self,
        sql: &str,
        args: impl Into<Args>,
    ) -> Result<KeyedRows<SqlValue>, SqlSugarError> {
        shape::key_pairs(self.run(sql, args)?)
    }

    /// # Errors
    /// Propagates any [`run`](Database::run) error, or `ShapeError` when the
    /// statement returns no columns.
    pub fn rows_column(
        &mut self,
        sql: &str,
        args: impl Into<Args>,
    ) -> Result<Vec<SqlValue>, SqlSugarError> {
        shape::first_column(self.run(sql, args)?)
    }

    /// First column of the first row, `None` when nothing matched.
    ///
    /// # Errors
    /// Propagates any [`run`](Database::run) error.
    pub fn cell(
        &mut self,
        sql: &str,
        args: impl Into<Args>,
    ) -> Result<Option<SqlValue>, SqlSugarError> {
        Ok(shape::cell(self.run(sql, args)?))
    }

    /// # Errors
    /// Propagates any [`run`](Database::run) error.
    pub fn row(&mut self, sql: &str, args: impl Into<Args>) -> Result<Option<Row>, SqlSugarError> {
        Ok(self.run(sql, args)?.into_iter().next())
    }

    /// First row as a JSON object, or `null` when nothing matched.
    ///
    /// # Errors
    /// Propagates any [`run`](Database::run) or serialization error.
    pub fn row_json(&mut self, sql: &str, args: impl Into<Args>) -> Result<String, SqlSugarError> {
        let row = self.row(sql, args)?;
        shape::to_json(&row)
    }

    /// The row of `table` whose `id` equals `id`.
    ///
    /// # Errors
    /// Propagates any execution error.
    pub fn record(
        &mut self,
        table: &str,
        id: impl Into<SqlValue>,
    ) -> Result<Option<Row>, SqlSugarError> {
        let rs = self.execute(query_builder::record(table, id))?;
        Ok(rs.into_iter().next())
    }

    /// Rows returned by a query, or rows changed by any other statement.
    ///
    /// # Errors
    /// Propagates any [`run`](Database::run) error.
    pub fn count(&mut self, sql: &str, args: impl Into<Args>) -> Result<usize, SqlSugarError> {
        Ok(self.run(sql, args)?.row_count())
    }
}
