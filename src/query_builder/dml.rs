use super::{QueryAndParams, Where, equality_clause, require_nonempty};
use crate::error::SqlSugarError;
use crate::types::{Dialect, SqlValue};

/// `INSERT INTO table (c1,c2) VALUES (?,?)` with the data values in order.
///
/// # Errors
/// Returns `SqlSugarError::ParameterError` if `data` is empty.
pub fn insert<K: AsRef<str>>(
    table: &str,
    data: &[(K, SqlValue)],
) -> Result<QueryAndParams, SqlSugarError> {
    require_nonempty(data, "insert data")?;
    let columns = data
        .iter()
        .map(|(k, _)| k.as_ref())
        .collect::<Vec<_>>()
        .join(",");
    let placeholders = vec!["?"; data.len()].join(",");
    let values = data.iter().map(|(_, v)| v.clone()).collect();
    Ok(QueryAndParams::positional(
        format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})"),
        values,
    ))
}

/// `UPDATE table SET a = ?,b = ? WHERE c = ?`; data values bind before where values.
///
/// # Errors
/// Returns `SqlSugarError::ParameterError` if `data` or the condition is empty.
pub fn update<K: AsRef<str>>(
    table: &str,
    data: &[(K, SqlValue)],
    filter: Where,
) -> Result<QueryAndParams, SqlSugarError> {
    require_nonempty(data, "update data")?;
    let predicates = filter.into_pairs();
    require_nonempty(&predicates, "update condition")?;

    let assignments = data
        .iter()
        .map(|(k, _)| format!("{} = ?", k.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    let mut values: Vec<SqlValue> = data.iter().map(|(_, v)| v.clone()).collect();
    let clause = equality_clause(&predicates);
    values.extend(predicates.into_iter().map(|(_, v)| v));

    Ok(QueryAndParams::positional(
        format!("UPDATE {table} SET {assignments} WHERE {clause}"),
        values,
    ))
}

/// `DELETE FROM table WHERE ... [LIMIT n]`.
///
/// Dialects without `DELETE ... LIMIT` get the limit through a row id subquery
/// (`rowid` for SQLite, `ctid` for Postgres).
///
/// # Errors
/// Returns `SqlSugarError::ParameterError` if the condition is empty.
pub fn delete(
    dialect: &Dialect,
    table: &str,
    filter: Where,
    limit: Option<u64>,
) -> Result<QueryAndParams, SqlSugarError> {
    let predicates = filter.into_pairs();
    require_nonempty(&predicates, "delete condition")?;
    let clause = equality_clause(&predicates);
    let values = predicates.into_iter().map(|(_, v)| v).collect();

    let query = match (limit, dialect) {
        (None, _) => format!("DELETE FROM {table} WHERE {clause}"),
        (Some(n), d) if d.supports_delete_limit() => {
            format!("DELETE FROM {table} WHERE {clause} LIMIT {n}")
        }
        (Some(n), Dialect::Postgres) => format!(
            "DELETE FROM {table} WHERE ctid IN (SELECT ctid FROM {table} WHERE {clause} LIMIT {n})"
        ),
        (Some(n), _) => format!(
            "DELETE FROM {table} WHERE rowid IN (SELECT rowid FROM {table} WHERE {clause} LIMIT {n})"
        ),
    };
    Ok(QueryAndParams::positional(query, values))
}

#[must_use]
pub fn delete_all(table: &str) -> QueryAndParams {
    QueryAndParams::positional(format!("DELETE FROM {table}"), Vec::new())
}

#[must_use]
pub fn delete_by_id(table: &str, id: impl Into<SqlValue>) -> QueryAndParams {
    QueryAndParams::positional(format!("DELETE FROM {table} WHERE id = ?"), vec![id.into()])
}

/// `DELETE FROM table WHERE column IN (ids)`.
///
/// `ids` is a pre-formatted comma list spliced into the SQL unbound. It must
/// never contain user input.
#[must_use]
pub fn delete_by_ids(table: &str, column: &str, ids: &str) -> QueryAndParams {
    QueryAndParams::positional(
        format!("DELETE FROM {table} WHERE {column} IN ({ids})"),
        Vec::new(),
    )
}

/// `TRUNCATE TABLE table`, or `DELETE FROM table` where TRUNCATE does not exist.
#[must_use]
pub fn truncate(dialect: &Dialect, table: &str) -> QueryAndParams {
    if dialect.supports_truncate() {
        QueryAndParams::positional(format!("TRUNCATE TABLE {table}"), Vec::new())
    } else {
        delete_all(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns;
    use crate::query_builder::BoundParams;

    fn positional(q: &QueryAndParams) -> &[SqlValue] {
        match &q.params {
            BoundParams::Positional(values) => values,
            BoundParams::Named(_) => panic!("expected positional params"),
        }
    }

    #[test]
    fn insert_lists_columns_in_order() {
        let q = insert("users", &columns! {"name" => "A", "age" => 5}).unwrap();
        assert_eq!(q.query, "INSERT INTO users (name,age) VALUES (?,?)");
        assert_eq!(
            positional(&q),
            [SqlValue::Text("A".into()), SqlValue::Int(5)]
        );
    }

    #[test]
    fn update_by_id_matches_update_by_columns() {
        let data = columns! {"name" => "B"};
        let by_id = update("users", &data, Where::Id(7)).unwrap();
        let by_cols = update("users", &data, Where::from(columns! {"id" => 7})).unwrap();
        assert_eq!(by_id, by_cols);
        assert_eq!(by_id.query, "UPDATE users SET name = ? WHERE id = ?");
        assert_eq!(
            positional(&by_id),
            [SqlValue::Text("B".into()), SqlValue::Int(7)]
        );
    }

    #[test]
    fn update_binds_data_before_conditions() {
        let q = update(
            "users",
            &columns! {"name" => "B", "age" => 9},
            Where::from(columns! {"team" => "red", "active" => true}),
        )
        .unwrap();
        assert_eq!(
            q.query,
            "UPDATE users SET name = ?,age = ? WHERE team = ? AND active = ?"
        );
        assert_eq!(positional(&q)[2], SqlValue::Text("red".into()));
    }

    #[test]
    fn delete_limit_per_dialect() {
        let q = delete(&Dialect::Mysql, "users", Where::from(columns! {"id" => 3}), Some(1)).unwrap();
        assert_eq!(q.query, "DELETE FROM users WHERE id = ? LIMIT 1");
        assert_eq!(positional(&q), [SqlValue::Int(3)]);

        let q = delete(&Dialect::Mysql, "users", Where::Id(3), None).unwrap();
        assert_eq!(q.query, "DELETE FROM users WHERE id = ?");

        let q = delete(&Dialect::Sqlite, "users", Where::Id(3), Some(2)).unwrap();
        assert_eq!(
            q.query,
            "DELETE FROM users WHERE rowid IN (SELECT rowid FROM users WHERE id = ? LIMIT 2)"
        );

        let q = delete(&Dialect::Postgres, "users", Where::Id(3), Some(1)).unwrap();
        assert!(q.query.contains("ctid IN (SELECT ctid FROM users WHERE id = ? LIMIT 1)"));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let empty: Vec<(String, SqlValue)> = Vec::new();
        assert!(matches!(
            insert("t", &empty),
            Err(SqlSugarError::ParameterError(_))
        ));
        assert!(update("t", &columns! {"a" => 1}, Where::Columns(Vec::new())).is_err());
        assert!(delete(&Dialect::Mysql, "t", Where::Columns(Vec::new()), None).is_err());
    }

    #[test]
    fn convenience_deletes() {
        assert_eq!(delete_all("t").query, "DELETE FROM t");
        assert_eq!(delete_by_id("t", 4).query, "DELETE FROM t WHERE id = ?");
        assert_eq!(
            delete_by_ids("t", "uid", "1,2,3").query,
            "DELETE FROM t WHERE uid IN (1,2,3)"
        );
        assert_eq!(truncate(&Dialect::Mysql, "t").query, "TRUNCATE TABLE t");
        assert_eq!(truncate(&Dialect::Sqlite, "t").query, "DELETE FROM t");
    }
}
