use crate::types::SqlValue;

/// Value side of a filter predicate: a single value, or a list for `IN (...)`.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Scalar(SqlValue),
    List(Vec<SqlValue>),
}

impl FilterValue {
    /// Number of parameters this predicate binds.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            FilterValue::Scalar(_) => 1,
            FilterValue::List(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Conversion into a [`FilterValue`].
///
/// Scalars become [`FilterValue::Scalar`]; vectors, arrays and slices become
/// [`FilterValue::List`]. A `Vec<u8>` is therefore a list of integers here; wrap
/// binary data in [`SqlValue::Blob`] to bind it as one value.
pub trait IntoFilterValue {
    fn into_filter_value(self) -> FilterValue;
}

impl IntoFilterValue for FilterValue {
    fn into_filter_value(self) -> FilterValue {
        self
    }
}

impl IntoFilterValue for SqlValue {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Scalar(self)
    }
}

macro_rules! impl_scalar_filter {
    ($($t:ty),*) => {
        $(impl IntoFilterValue for $t {
            fn into_filter_value(self) -> FilterValue {
                FilterValue::Scalar(SqlValue::from(self))
            }
        })*
    };
}

impl_scalar_filter!(i8, i16, i32, i64, u8, u16, u32, f32, f64, bool, &str, String);

impl<T: Into<SqlValue>> IntoFilterValue for Vec<T> {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::List(self.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SqlValue>, const N: usize> IntoFilterValue for [T; N] {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::List(self.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SqlValue> + Clone> IntoFilterValue for &[T] {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::List(self.iter().cloned().map(Into::into).collect())
    }
}

/// Arguments of a statement.
///
/// - `Positional` binds `?` placeholders in order.
/// - `Named` binds `:name` placeholders.
/// - `Filter` feeds the `WHERE 1=1` predicate marker; each entry becomes one
///   `AND`-joined predicate. Without the marker a filter set is flattened into a
///   positional list.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Args {
    #[default]
    None,
    Positional(Vec<SqlValue>),
    Named(Vec<(String, SqlValue)>),
    Filter(Vec<(String, FilterValue)>),
}

impl Args {
    #[must_use]
    pub fn new() -> Self {
        Args::None
    }

    /// Start an empty filter set.
    #[must_use]
    pub fn filter() -> Self {
        Args::Filter(Vec::new())
    }

    /// Append a filter predicate.
    ///
    /// `None` and `Named` arguments turn into a filter set first; positional
    /// arguments have no column names, so the value is appended to the list.
    #[must_use]
    pub fn with(self, key: impl Into<String>, value: impl IntoFilterValue) -> Self {
        let value = value.into_filter_value();
        match self {
            Args::None => Args::Filter(vec![(key.into(), value)]),
            Args::Named(pairs) => {
                let mut filters: Vec<(String, FilterValue)> = pairs
                    .into_iter()
                    .map(|(k, v)| (k, FilterValue::Scalar(v)))
                    .collect();
                filters.push((key.into(), value));
                Args::Filter(filters)
            }
            Args::Filter(mut filters) => {
                filters.push((key.into(), value));
                Args::Filter(filters)
            }
            Args::Positional(mut values) => {
                push_flattened(&mut values, value);
                Args::Positional(values)
            }
        }
    }

    /// Append a positional value, coercing other shapes to a positional list first.
    #[must_use]
    pub fn bind(self, value: impl Into<SqlValue>) -> Self {
        let mut values = self.into_positional();
        values.push(value.into());
        Args::Positional(values)
    }

    /// Flatten into an ordered list: named values in insertion order, filter
    /// lists spread element by element.
    #[must_use]
    pub fn into_positional(self) -> Vec<SqlValue> {
        match self {
            Args::None => Vec::new(),
            Args::Positional(values) => values,
            Args::Named(pairs) => pairs.into_iter().map(|(_, v)| v).collect(),
            Args::Filter(filters) => {
                let mut values = Vec::with_capacity(filters.iter().map(|(_, f)| f.len()).sum());
                for (_, filter) in filters {
                    push_flattened(&mut values, filter);
                }
                values
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Args::None => true,
            Args::Positional(values) => values.is_empty(),
            Args::Named(pairs) => pairs.is_empty(),
            Args::Filter(filters) => filters.is_empty(),
        }
    }
}

fn push_flattened(values: &mut Vec<SqlValue>, filter: FilterValue) {
    match filter {
        FilterValue::Scalar(v) => values.push(v),
        FilterValue::List(list) => values.extend(list),
    }
}

impl From<()> for Args {
    fn from((): ()) -> Self {
        Args::None
    }
}

impl From<Vec<SqlValue>> for Args {
    fn from(values: Vec<SqlValue>) -> Self {
        Args::Positional(values)
    }
}

impl From<&[SqlValue]> for Args {
    fn from(values: &[SqlValue]) -> Self {
        Args::Positional(values.to_vec())
    }
}

impl<T: Into<SqlValue>, const N: usize> From<[T; N]> for Args {
    fn from(values: [T; N]) -> Self {
        Args::Positional(values.into_iter().map(Into::into).collect())
    }
}

impl From<SqlValue> for Args {
    fn from(value: SqlValue) -> Self {
        Args::Positional(vec![value])
    }
}

impl From<Vec<(String, SqlValue)>> for Args {
    fn from(pairs: Vec<(String, SqlValue)>) -> Self {
        Args::Named(pairs)
    }
}

impl From<Vec<(&str, SqlValue)>> for Args {
    fn from(pairs: Vec<(&str, SqlValue)>) -> Self {
        Args::Named(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

impl From<Vec<(String, FilterValue)>> for Args {
    fn from(filters: Vec<(String, FilterValue)>) -> Self {
        Args::Filter(filters)
    }
}

/// Build [`Args`].
///
/// `args![]` is empty, `args![1, "a"]` is positional and
/// `args!{"name" => "a", "age" => 5}` binds `:name` and `:age`.
///
/// ```rust
/// use sql_sugar::prelude::*;
///
/// assert_eq!(args![], Args::None);
/// assert_eq!(args![1, "a"], Args::Positional(vec![SqlValue::Int(1), SqlValue::Text("a".into())]));
/// assert!(matches!(args!{"id" => 7}, Args::Named(_)));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::None
    };
    ($($key:literal => $value:expr),+ $(,)?) => {
        $crate::Args::Named(vec![$(($key.to_string(), $crate::SqlValue::from($value))),+])
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Args::Positional(vec![$($crate::SqlValue::from($value)),+])
    };
}

/// Build a filter set for the `WHERE 1=1` predicate marker.
///
/// ```rust
/// use sql_sugar::prelude::*;
///
/// let f = filter!{"status" => "active", "id IN" => vec![1, 2, 3]};
/// assert_eq!(f.clone().into_positional().len(), 4);
/// ```
#[macro_export]
macro_rules! filter {
    ($($key:expr => $value:expr),* $(,)?) => {
        $crate::Args::Filter(vec![$((
            ::std::string::String::from($key),
            $crate::IntoFilterValue::into_filter_value($value),
        )),*])
    };
}

/// Build an ordered column/value list for `insert`, `update` and `select`.
///
/// ```rust
/// use sql_sugar::prelude::*;
///
/// let data = columns!{"name" => "A", "age" => 5};
/// assert_eq!(data[1], ("age".to_string(), SqlValue::Int(5)));
/// ```
#[macro_export]
macro_rules! columns {
    ($($key:expr => $value:expr),* $(,)?) => {
        vec![$((::std::string::String::from($key), $crate::SqlValue::from($value))),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_flattens_in_order() {
        let args = Args::filter()
            .with("status", "active")
            .with("id IN", vec![1, 2, 3]);
        assert_eq!(
            args.into_positional(),
            vec![
                SqlValue::Text("active".into()),
                SqlValue::Int(1),
                SqlValue::Int(2),
                SqlValue::Int(3),
            ]
        );
    }

    #[test]
    fn named_becomes_filter_on_with() {
        let args = Args::Named(vec![("a".into(), SqlValue::Int(1))]).with("b", 2);
        assert_eq!(
            args,
            Args::Filter(vec![
                ("a".into(), FilterValue::Scalar(SqlValue::Int(1))),
                ("b".into(), FilterValue::Scalar(SqlValue::Int(2))),
            ])
        );
    }

    #[test]
    fn bind_coerces_to_positional() {
        let args = Args::Named(vec![("a".into(), SqlValue::Int(1))]).bind("x");
        assert_eq!(
            args,
            Args::Positional(vec![SqlValue::Int(1), SqlValue::Text("x".into())])
        );
    }

    #[test]
    fn macros_build_expected_shapes() {
        assert_eq!(args![], Args::None);
        assert_eq!(args![5], Args::Positional(vec![SqlValue::Int(5)]));
        assert_eq!(
            args! {"id" => 5},
            Args::Named(vec![("id".into(), SqlValue::Int(5))])
        );
        let f = filter! {"id IN" => [1, 2]};
        assert_eq!(
            f,
            Args::Filter(vec![(
                "id IN".into(),
                FilterValue::List(vec![SqlValue::Int(1), SqlValue::Int(2)])
            )])
        );
        assert!(Args::filter().is_empty());
    }
}
