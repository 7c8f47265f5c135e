use rusqlite::types::Value;

use crate::types::{SqlValue, TIMESTAMP_FORMAT};

/// Convert a single `SqlValue` to a rusqlite `Value`.
#[must_use]
pub fn sql_value_to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        SqlValue::Timestamp(dt) => Value::Text(dt.format(TIMESTAMP_FORMAT).to_string()),
        SqlValue::Null => Value::Null,
        SqlValue::Json(jval) => Value::Text(jval.to_string()),
        SqlValue::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// `SQLite` parameter container.
pub struct Params(pub Vec<Value>);

impl Params {
    #[must_use]
    pub fn convert(params: &[SqlValue]) -> Self {
        Params(params.iter().map(sql_value_to_sqlite_value).collect())
    }

    /// Borrow the underlying values.
    #[must_use]
    pub fn as_values(&self) -> &[Value] {
        &self.0
    }

    /// Build a borrowed params slice suitable for rusqlite execution.
    #[must_use]
    pub fn as_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.0.iter().map(|v| v as &dyn rusqlite::ToSql).collect()
    }
}
