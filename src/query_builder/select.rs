use super::QueryAndParams;
use crate::types::SqlValue;

/// `SELECT * FROM table WHERE a = :a AND b = :b`, bound by name.
///
/// Column names are interpolated as given; the placeholder name is the column
/// name with anything outside `[A-Za-z0-9_]` replaced by `_`, suffixed with
/// `_2`, `_3`, ... when an earlier column already took that name. No columns
/// selects every row.
#[must_use]
pub fn select<K: AsRef<str>>(table: &str, filter: &[(K, SqlValue)]) -> QueryAndParams {
    if filter.is_empty() {
        return QueryAndParams::named(format!("SELECT * FROM {table}"), Vec::new());
    }

    let mut params: Vec<(String, SqlValue)> = Vec::with_capacity(filter.len());
    let predicates = filter
        .iter()
        .map(|(column, value)| {
            let column = column.as_ref();
            let name = unique_name(placeholder_name(column), &params);
            let predicate = format!("{column} = :{name}");
            params.push((name, value.clone()));
            predicate
        })
        .collect::<Vec<_>>()
        .join(" AND ");

    QueryAndParams::named(format!("SELECT * FROM {table} WHERE {predicates}"), params)
}

/// `SELECT * FROM table WHERE id = ?`.
#[must_use]
pub fn record(table: &str, id: impl Into<SqlValue>) -> QueryAndParams {
    QueryAndParams::positional(format!("SELECT * FROM {table} WHERE id = ?"), vec![id.into()])
}

fn unique_name(base: String, taken: &[(String, SqlValue)]) -> String {
    let is_taken = |candidate: &str| taken.iter().any(|(name, _)| name == candidate);
    if !is_taken(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn placeholder_name(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns;
    use crate::query_builder::BoundParams;

    #[test]
    fn select_binds_by_name() {
        let q = select("users", &columns! {"name" => "A", "u.age" => 5});
        assert_eq!(
            q.query,
            "SELECT * FROM users WHERE name = :name AND u.age = :u_age"
        );
        assert_eq!(
            q.params,
            BoundParams::Named(vec![
                ("name".into(), SqlValue::Text("A".into())),
                ("u_age".into(), SqlValue::Int(5)),
            ])
        );
    }

    #[test]
    fn colliding_placeholder_names_get_suffixes() {
        let q = select("t", &columns! {"t.v" => 1, "t_v" => 2, "t-v" => 3});
        assert_eq!(
            q.query,
            "SELECT * FROM t WHERE t.v = :t_v AND t_v = :t_v_2 AND t-v = :t_v_3"
        );
        assert_eq!(
            q.params,
            BoundParams::Named(vec![
                ("t_v".into(), SqlValue::Int(1)),
                ("t_v_2".into(), SqlValue::Int(2)),
                ("t_v_3".into(), SqlValue::Int(3)),
            ])
        );
    }

    #[test]
    fn select_without_filter_reads_all() {
        let empty: Vec<(String, SqlValue)> = Vec::new();
        assert_eq!(select("users", &empty).query, "SELECT * FROM users");
    }

    #[test]
    fn record_by_id() {
        let q = record("users", 9);
        assert_eq!(q.query, "SELECT * FROM users WHERE id = ?");
        assert_eq!(q.params, BoundParams::Positional(vec![SqlValue::Int(9)]));
    }
}
