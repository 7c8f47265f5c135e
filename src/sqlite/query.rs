use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Statement, ToSql};

use crate::error::SqlSugarError;
use crate::results::ResultSet;
use crate::types::SqlValue;

/// Extract a `SqlValue` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SqlSugarError` if the value cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<SqlValue, SqlSugarError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Int(i),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    })
}

/// Run a prepared statement that returns columns and collect its rows.
///
/// # Errors
/// Returns `SqlSugarError::SqliteError` if stepping the statement or reading a value fails.
pub fn build_result_set(stmt: &mut Statement, params: &[Value]) -> Result<ResultSet, SqlSugarError> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows_iter = stmt.query(&param_refs[..])?;
    while let Some(row) = rows_iter.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
