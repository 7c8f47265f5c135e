#![cfg(feature = "sqlite")]

use sql_sugar::prelude::*;
use tempfile::tempdir;

const SCHEMA: &str = "CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT NOT NULL, qty INTEGER)";

fn memory_db() -> Result<Database, SqlSugarError> {
    let cfg = DatabaseConfig::builder(":memory:", "tester")
        .dialect("sqlite")
        .finish();
    let mut db = Database::connect(cfg)?;
    db.raw(SCHEMA)?;
    Ok(db)
}

#[test]
fn insert_update_delete_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db()?;
    let first = db.insert("items", &columns! {"name" => "bolt", "qty" => 10})?;
    let second = db.insert("items", &columns! {"name" => "nut", "qty" => 3})?;
    assert_eq!((first, second), (1, 2));
    assert_eq!(db.last_insert_id()?, 2);

    assert_eq!(db.update("items", &columns! {"qty" => 11}, first)?, 1);
    assert_eq!(
        db.cell("SELECT qty FROM items WHERE id = ?", args![first])?,
        Some(SqlValue::Int(11))
    );

    let changed = db.update("items", &columns! {"qty" => 0}, columns! {"name" => "missing"})?;
    assert_eq!(changed, 0);

    assert_eq!(db.delete("items", columns! {"name" => "nut"}, None)?, 1);
    assert_eq!(db.count("SELECT * FROM items", ())?, 1);
    Ok(())
}

#[test]
fn delete_limit_uses_rowid_subquery() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db()?;
    for _ in 0..3 {
        db.insert("items", &columns! {"name" => "dup", "qty" => 1})?;
    }
    assert_eq!(db.delete("items", columns! {"name" => "dup"}, Some(2))?, 2);
    assert_eq!(db.count("SELECT * FROM items", ())?, 1);
    Ok(())
}

#[test]
fn bulk_deletes_and_truncate() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db()?;
    for name in ["a", "b", "c", "d", "e"] {
        db.insert("items", &columns! {"name" => name})?;
    }
    assert_eq!(db.delete_by_id("items", 1)?, 1);
    assert_eq!(db.delete_by_ids("items", "id", "2,3")?, 2);
    assert_eq!(db.truncate("items")?, 2);
    assert_eq!(db.delete_all("items")?, 0);
    Ok(())
}

#[test]
fn select_filters_by_column() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db()?;
    db.insert("items", &columns! {"name" => "bolt", "qty" => 10})?;
    db.insert("items", &columns! {"name" => "bolt", "qty" => 2})?;
    db.insert("items", &columns! {"name" => "nut", "qty" => 2})?;

    let rs = db.select("items", &columns! {"name" => "bolt", "qty" => 2})?;
    assert_eq!(rs.results.len(), 1);
    assert_eq!(rs.results[0].get("id"), Some(&SqlValue::Int(2)));

    let everything: Vec<(String, SqlValue)> = Vec::new();
    assert_eq!(db.select("items", &everything)?.row_count(), 3);
    Ok(())
}

#[test]
fn select_keeps_similar_column_names_apart() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db()?;
    db.raw("CREATE TABLE t (v INTEGER, t_v INTEGER); INSERT INTO t VALUES (1, 2);")?;
    let rs = db.select("t", &columns! {"t.v" => 1, "t_v" => 2})?;
    assert_eq!(rs.results.len(), 1);

    let err = db
        .run("SELECT * FROM t WHERE v = :v", args! {"v" => 1, "v" => 2})
        .unwrap_err();
    assert!(matches!(err.root(), SqlSugarError::ParameterError(_)));
    Ok(())
}

#[test]
fn null_and_optional_values_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db()?;
    let qty: Option<i64> = None;
    let id = db.insert("items", &columns! {"name" => "loose", "qty" => qty})?;
    assert_eq!(db.cell("SELECT qty FROM items WHERE id = ?", args![id])?, Some(SqlValue::Null));
    Ok(())
}

#[test]
fn file_backed_database_persists_between_connections() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("items.db");
    let cfg = DatabaseConfig::builder(path.to_string_lossy(), "tester")
        .dialect("sqlite3")
        .finish();

    {
        let mut db = Database::connect(cfg.clone())?;
        db.raw(SCHEMA)?;
        db.insert("items", &columns! {"name" => "kept"})?;
    }

    let mut db = Database::connect(cfg)?;
    assert_eq!(
        db.cell("SELECT name FROM items", ())?,
        Some(SqlValue::Text("kept".into()))
    );
    Ok(())
}

#[test]
fn wraps_an_existing_connection() -> Result<(), Box<dyn std::error::Error>> {
    let conn = rusqlite::Connection::open_in_memory()?;
    conn.execute_batch("CREATE TABLE t (v TEXT); INSERT INTO t VALUES ('x');")?;
    let cfg = DatabaseConfig::builder(":memory:", "tester").dialect("sqlite").finish();
    let mut db = Database::with_driver(cfg, Box::new(SqliteDriver::from_connection(conn)))?;
    assert_eq!(db.cell("SELECT v FROM t", ())?, Some(SqlValue::Text("x".into())));
    Ok(())
}
