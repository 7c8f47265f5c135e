//! SQL assembly: the `WHERE 1=1` predicate marker and the CRUD statement builders.
//!
//! Trust boundary: values are always bound as parameters. Table names, column
//! names and filter keys are interpolated into the SQL text as given, so they
//! must come from the application, never from end users.

use crate::arguments::{Args, FilterValue};
use crate::error::SqlSugarError;
use crate::types::SqlValue;

mod dml;
mod select;

pub use dml::{delete, delete_all, delete_by_id, delete_by_ids, insert, truncate, update};
pub use select::{record, select};

/// Template token replaced by generated predicates.
pub const PREDICATE_MARKER: &str = "WHERE 1=1";

/// Parameters in the form the statement expects them.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundParams {
    Positional(Vec<SqlValue>),
    Named(Vec<(String, SqlValue)>),
}

impl BoundParams {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            BoundParams::Positional(values) => values.len(),
            BoundParams::Named(pairs) => pairs.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A statement ready to hand to a driver.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAndParams {
    pub query: String,
    pub params: BoundParams,
}

impl QueryAndParams {
    #[must_use]
    pub fn positional(query: String, params: Vec<SqlValue>) -> Self {
        Self {
            query,
            params: BoundParams::Positional(params),
        }
    }

    #[must_use]
    pub fn named(query: String, params: Vec<(String, SqlValue)>) -> Self {
        Self {
            query,
            params: BoundParams::Named(params),
        }
    }
}

/// Condition of an `update` or `delete`.
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    /// Shorthand for `id = n`.
    Id(i64),
    /// `AND`-joined `column = ?` equality predicates.
    Columns(Vec<(String, SqlValue)>),
}

impl Where {
    pub(crate) fn into_pairs(self) -> Vec<(String, SqlValue)> {
        match self {
            Where::Id(id) => vec![("id".to_string(), SqlValue::Int(id))],
            Where::Columns(pairs) => pairs,
        }
    }
}

impl From<i64> for Where {
    fn from(id: i64) -> Self {
        Where::Id(id)
    }
}

impl From<i32> for Where {
    fn from(id: i32) -> Self {
        Where::Id(i64::from(id))
    }
}

impl From<Vec<(String, SqlValue)>> for Where {
    fn from(pairs: Vec<(String, SqlValue)>) -> Self {
        Where::Columns(pairs)
    }
}

impl From<Vec<(&str, SqlValue)>> for Where {
    fn from(pairs: Vec<(&str, SqlValue)>) -> Self {
        Where::Columns(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

/// Resolve a template and its arguments into a bindable statement.
///
/// When the template contains [`PREDICATE_MARKER`] and the arguments are a
/// filter set (or named values), each entry becomes a predicate and the
/// `1=1` is replaced by their `AND`-joined text. Named arguments otherwise bind
/// `:name` placeholders; everything else becomes a positional list.
#[must_use]
pub fn resolve(sql: &str, args: Args) -> QueryAndParams {
    let has_marker = sql.contains(PREDICATE_MARKER);
    match args {
        Args::Filter(filters) if has_marker && !filters.is_empty() => expand_marker(sql, filters),
        Args::Named(pairs) if has_marker && !pairs.is_empty() => expand_marker(
            sql,
            pairs
                .into_iter()
                .map(|(k, v)| (k, FilterValue::Scalar(v)))
                .collect(),
        ),
        Args::Named(pairs) => QueryAndParams::named(sql.to_string(), pairs),
        other => QueryAndParams::positional(sql.to_string(), other.into_positional()),
    }
}

fn expand_marker(sql: &str, filters: Vec<(String, FilterValue)>) -> QueryAndParams {
    let (clause, params) = build_predicates(filters);
    let query = sql.replacen(PREDICATE_MARKER, &format!("WHERE {clause}"), 1);
    QueryAndParams::positional(query, params)
}

/// Turn a filter set into an `AND`-joined predicate clause and its parameters.
///
/// - a key that already contains `?` is used verbatim;
/// - list values expand a `(?)` token in the key into one `?` per element,
///   or append `(?,...)` to keys ending in `IN`, or generate `key IN (?,...)`;
/// - scalar values generate `key = ?`.
///
/// An empty list expands to `(NULL)`, which matches nothing.
#[must_use]
pub fn build_predicates(filters: Vec<(String, FilterValue)>) -> (String, Vec<SqlValue>) {
    let mut params = Vec::with_capacity(filters.iter().map(|(_, f)| f.len()).sum());
    let parts: Vec<String> = filters
        .into_iter()
        .map(|(key, value)| match value {
            FilterValue::Scalar(v) => {
                params.push(v);
                if key.contains('?') {
                    key
                } else {
                    format!("{key} = ?")
                }
            }
            FilterValue::List(values) => {
                let group = in_group(values.len());
                params.extend(values);
                if key.contains("(?)") {
                    key.replacen("(?)", &group, 1)
                } else if key.contains('?') {
                    key
                } else if ends_with_in(&key) {
                    format!("{} {group}", key.trim_end())
                } else {
                    format!("{key} IN {group}")
                }
            }
        })
        .collect();
    (parts.join(" AND "), params)
}

fn in_group(count: usize) -> String {
    if count == 0 {
        return "(NULL)".to_string();
    }
    let mut group = String::with_capacity(count * 2 + 1);
    group.push('(');
    for i in 0..count {
        if i > 0 {
            group.push(',');
        }
        group.push('?');
    }
    group.push(')');
    group
}

fn ends_with_in(key: &str) -> bool {
    let bytes = key.trim_end().as_bytes();
    bytes.len() > 3 && bytes[bytes.len() - 3..].eq_ignore_ascii_case(b" in")
}

pub(crate) fn require_nonempty<T>(items: &[T], what: &str) -> Result<(), SqlSugarError> {
    if items.is_empty() {
        return Err(SqlSugarError::ParameterError(format!("{what} must not be empty")));
    }
    Ok(())
}

pub(crate) fn equality_clause(pairs: &[(String, SqlValue)]) -> String {
    pairs
        .iter()
        .map(|(column, _)| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(" AND ")
}
