use std::fmt;

use chrono::NaiveDateTime;
use serde::ser::{Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Values bound as statement parameters and read back as row cells.
///
/// ```rust
/// use sql_sugar::prelude::*;
///
/// let params: Vec<SqlValue> = vec![1.into(), "alice".into(), true.into()];
/// assert_eq!(params[1].as_text(), Some("alice"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    Json(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

/// Format used when timestamps are rendered as text.
pub(crate) const TIMESTAMP_FORMAT: &str = "%F %T%.f";

impl SqlValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SqlValue::Int(value) => Some(*value),
            SqlValue::Bool(value) => Some(i64::from(*value)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(value) => Some(*value),
            SqlValue::Int(1) => Some(true),
            SqlValue::Int(0) => Some(false),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SqlValue::Float(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            SqlValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            SqlValue::Timestamp(value) => Some(*value),
            SqlValue::Text(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                .ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let SqlValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let SqlValue::Json(value) = self {
            Some(value)
        } else {
            None
        }
    }
}

/// Raw, unquoted rendering. Used for debug output only, never for building SQL.
impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::Float(v) => write!(f, "{v}"),
            SqlValue::Text(s) => f.write_str(s),
            SqlValue::Bool(b) => write!(f, "{}", i64::from(*b)),
            SqlValue::Timestamp(dt) => write!(f, "{}", dt.format(TIMESTAMP_FORMAT)),
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Json(v) => write!(f, "{v}"),
            SqlValue::Blob(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SqlValue::Int(i) => serializer.serialize_i64(*i),
            SqlValue::Float(v) => serializer.serialize_f64(*v),
            SqlValue::Text(s) => serializer.serialize_str(s),
            SqlValue::Bool(b) => serializer.serialize_bool(*b),
            SqlValue::Timestamp(dt) => {
                serializer.collect_str(&dt.format(TIMESTAMP_FORMAT))
            }
            SqlValue::Null => serializer.serialize_none(),
            SqlValue::Json(v) => v.serialize(serializer),
            SqlValue::Blob(bytes) => serializer.serialize_str(&String::from_utf8_lossy(bytes)),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for SqlValue {
            fn from(value: $t) -> Self {
                SqlValue::Int(i64::from(value))
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        SqlValue::Float(f64::from(value))
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl From<JsonValue> for SqlValue {
    fn from(value: JsonValue) -> Self {
        SqlValue::Json(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Key of a keyed or grouped result map.
///
/// Integer-like cells key as `Int`; everything else keys by its text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    Int(i64),
    Text(String),
}

impl From<&SqlValue> for RowKey {
    fn from(value: &SqlValue) -> Self {
        match value {
            SqlValue::Int(i) => RowKey::Int(*i),
            SqlValue::Bool(b) => RowKey::Int(i64::from(*b)),
            #[allow(clippy::cast_possible_truncation)]
            SqlValue::Float(v) => RowKey::Int(v.trunc() as i64),
            SqlValue::Null => RowKey::Text(String::new()),
            other => RowKey::Text(other.to_string()),
        }
    }
}

impl From<i64> for RowKey {
    fn from(value: i64) -> Self {
        RowKey::Int(value)
    }
}

impl From<i32> for RowKey {
    fn from(value: i32) -> Self {
        RowKey::Int(i64::from(value))
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        RowKey::Text(value.to_string())
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Int(i) => write!(f, "{i}"),
            RowKey::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for RowKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowKey::Int(i) => serializer.serialize_i64(*i),
            RowKey::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// The database engine a configuration targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dialect {
    Mysql,
    Sqlite,
    Postgres,
    /// A dialect with no built-in driver; usable through `Database::with_driver`.
    Other(String),
}

impl Dialect {
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Dialect::Mysql,
            "sqlite" | "sqlite3" => Dialect::Sqlite,
            "pgsql" | "postgres" | "postgresql" => Dialect::Postgres,
            _ => Dialect::Other(name.trim().to_string()),
        }
    }

    #[must_use]
    pub fn supports_delete_limit(&self) -> bool {
        matches!(self, Dialect::Mysql | Dialect::Other(_))
    }

    #[must_use]
    pub fn supports_truncate(&self) -> bool {
        !matches!(self, Dialect::Sqlite)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Mysql => f.write_str("mysql"),
            Dialect::Sqlite => f.write_str("sqlite"),
            Dialect::Postgres => f.write_str("pgsql"),
            Dialect::Other(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_keys_follow_integer_like_cells() {
        assert_eq!(RowKey::from(&SqlValue::Int(3)), RowKey::Int(3));
        assert_eq!(RowKey::from(&SqlValue::Bool(true)), RowKey::Int(1));
        assert_eq!(RowKey::from(&SqlValue::Float(2.9)), RowKey::Int(2));
        assert_eq!(RowKey::from(&SqlValue::Null), RowKey::Text(String::new()));
        assert_eq!(
            RowKey::from(&SqlValue::Text("abc".into())),
            RowKey::Text("abc".into())
        );
    }

    #[test]
    fn dialect_aliases() {
        assert_eq!(Dialect::parse("MySQL"), Dialect::Mysql);
        assert_eq!(Dialect::parse("postgresql"), Dialect::Postgres);
        assert_eq!(Dialect::parse("sqlite3"), Dialect::Sqlite);
        assert_eq!(Dialect::parse("oci"), Dialect::Other("oci".into()));
        assert!(!Dialect::Sqlite.supports_truncate());
        assert!(Dialect::Mysql.supports_delete_limit());
    }

    #[test]
    fn text_timestamps_parse() {
        let v = SqlValue::Text("2024-01-01 08:00:01".into());
        assert!(v.as_timestamp().is_some());
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
    }
}
