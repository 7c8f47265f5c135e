use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::SqlValue;

/// A row from a database query result
///
/// Column names are shared by every row of a result set. Serializes as a JSON
/// object with keys in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    column_names: Arc<Vec<String>>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Create a new database row
    ///
    /// # Arguments
    ///
    /// * `column_names` - The column names
    /// * `values` - The values for this row
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        Self {
            column_names,
            values,
        }
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&SqlValue> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column/value pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Plain column → value map. A repeated column name keeps its last value.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, SqlValue> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// Split off the first column, returning its value and the remaining row.
    ///
    /// `rest_columns` must be this row's column names minus the first one; it is
    /// passed in so a whole result set can share one allocation.
    pub(crate) fn split_first(self, rest_columns: &Arc<Vec<String>>) -> Option<(SqlValue, Row)> {
        let mut values = self.values.into_iter();
        let first = values.next()?;
        Some((first, Row::new(Arc::clone(rest_columns), values.collect())))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        Row::new(
            Arc::new(vec!["id".into(), "name".into()]),
            vec![SqlValue::Int(1), SqlValue::Text("héllo".into())],
        )
    }

    #[test]
    fn lookup_by_name_and_index() {
        let row = sample();
        assert_eq!(row.get("name"), Some(&SqlValue::Text("héllo".into())));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.get_by_index(0), Some(&SqlValue::Int(1)));
    }

    #[test]
    fn serializes_in_column_order_without_escaping() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"héllo"}"#);
    }

    #[test]
    fn split_first_drops_key_column() {
        let rest = Arc::new(vec!["name".to_string()]);
        let (key, row) = sample().split_first(&rest).unwrap();
        assert_eq!(key, SqlValue::Int(1));
        assert_eq!(row.column_names(), ["name".to_string()]);
        assert_eq!(row.len(), 1);
    }
}
