//! Projections from a [`ResultSet`] into the shapes the fetch helpers return.

use std::collections::HashMap;
use std::sync::Arc;

use super::{KeyedRows, ResultSet, Row};
use crate::error::SqlSugarError;
use crate::types::{RowKey, SqlValue};

fn require_columns(rs: &ResultSet, needed: usize, shape: &str) -> Result<(), SqlSugarError> {
    let have = rs.column_names().len();
    if have < needed {
        return Err(SqlSugarError::ShapeError(format!(
            "{shape} needs at least {needed} column(s), statement returned {have}"
        )));
    }
    Ok(())
}

fn rest_columns(rs: &ResultSet) -> Arc<Vec<String>> {
    Arc::new(rs.column_names().iter().skip(1).cloned().collect())
}

/// Rows keyed by their first column, the key column removed. Later rows win.
pub(crate) fn unique(rs: ResultSet) -> Result<KeyedRows<Row>, SqlSugarError> {
    require_columns(&rs, 1, "keyed rows")?;
    let rest = rest_columns(&rs);
    let mut keyed = KeyedRows::new();
    for row in rs {
        if let Some((key, row)) = row.split_first(&rest) {
            keyed.insert(RowKey::from(&key), row);
        }
    }
    Ok(keyed)
}

/// Rows grouped by their first column, the key column removed.
pub(crate) fn group(rs: ResultSet) -> Result<KeyedRows<Vec<Row>>, SqlSugarError> {
    require_columns(&rs, 1, "grouped rows")?;
    let rest = rest_columns(&rs);
    let mut grouped: KeyedRows<Vec<Row>> = KeyedRows::new();
    for row in rs {
        if let Some((key, row)) = row.split_first(&rest) {
            grouped
                .get_or_insert_with(RowKey::from(&key), Vec::new)
                .push(row);
        }
    }
    Ok(grouped)
}

/// First column → second column, one pair per row.
pub(crate) fn key_pairs(rs: ResultSet) -> Result<KeyedRows<SqlValue>, SqlSugarError> {
    require_columns(&rs, 2, "column pairs")?;
    let mut pairs = KeyedRows::new();
    for row in rs {
        let mut values = row.into_values().into_iter();
        if let (Some(key), Some(value)) = (values.next(), values.next()) {
            pairs.insert(RowKey::from(&key), value);
        }
    }
    Ok(pairs)
}

/// The first column of every row.
pub(crate) fn first_column(rs: ResultSet) -> Result<Vec<SqlValue>, SqlSugarError> {
    require_columns(&rs, 1, "column list")?;
    Ok(rs
        .into_iter()
        .filter_map(|row| row.into_values().into_iter().next())
        .collect())
}

/// The first column of the first row.
pub(crate) fn cell(rs: ResultSet) -> Option<SqlValue> {
    rs.into_iter()
        .next()
        .and_then(|row| row.into_values().into_iter().next())
}

pub(crate) fn maps(rs: ResultSet) -> Vec<HashMap<String, SqlValue>> {
    rs.results.iter().map(Row::to_map).collect()
}

pub(crate) fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, SqlSugarError> {
    Ok(serde_json::to_string(value)?)
}
