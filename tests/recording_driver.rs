//! Statement text and bindings as a driver receives them, checked without a
//! live database.

use std::cell::RefCell;
use std::rc::Rc;

use sql_sugar::prelude::*;

type Log = Rc<RefCell<Vec<(String, Vec<SqlValue>)>>>;

struct RecordingDriver {
    log: Log,
    fail: bool,
}

impl Driver for RecordingDriver {
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Question
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<ResultSet, SqlSugarError> {
        self.log.borrow_mut().push((sql.to_string(), params.to_vec()));
        if self.fail {
            return Err(SqlSugarError::ExecutionError("server went away".into()));
        }
        Ok(ResultSet::affected(1))
    }

    fn execute_batch(&mut self, sql: &str) -> Result<(), SqlSugarError> {
        self.log.borrow_mut().push((sql.to_string(), Vec::new()));
        Ok(())
    }

    fn last_insert_id(&mut self) -> Result<i64, SqlSugarError> {
        Ok(42)
    }
}

fn recording(dialect: &str, fail: bool) -> (Database, Log) {
    let log: Log = Rc::default();
    let cfg = DatabaseConfig::builder("shop", "app").dialect(dialect).finish();
    let driver = RecordingDriver {
        log: Rc::clone(&log),
        fail,
    };
    let db = Database::with_driver(cfg, Box::new(driver)).expect("valid config");
    (db, log)
}

fn last(log: &Log) -> (String, Vec<SqlValue>) {
    log.borrow().last().cloned().expect("a statement was sent")
}

#[test]
fn missing_credentials_fail_before_connecting() {
    let no_db = DatabaseConfig {
        username: Some("app".into()),
        ..DatabaseConfig::default()
    };
    let err = Database::connect(no_db).unwrap_err();
    assert!(matches!(err, SqlSugarError::ConfigError(_)));

    let no_user = DatabaseConfig {
        database: Some("shop".into()),
        ..DatabaseConfig::default()
    };
    let log: Log = Rc::default();
    let driver = RecordingDriver { log: Rc::clone(&log), fail: false };
    let err = Database::with_driver(no_user, Box::new(driver)).unwrap_err();
    assert!(matches!(err, SqlSugarError::ConfigError(_)));
    assert!(log.borrow().is_empty());
}

#[test]
fn mysql_needs_a_supplied_driver() {
    let cfg = DatabaseConfig::builder("shop", "app").finish();
    let err = Database::connect(cfg).unwrap_err();
    assert!(matches!(err, SqlSugarError::ConnectionError(ref m) if m.contains("with_driver")));
}

#[test]
fn filter_marker_expands_predicates() -> Result<(), Box<dyn std::error::Error>> {
    let (mut db, log) = recording("mysql", false);
    db.run(
        "SELECT * FROM users WHERE 1=1",
        filter! {"status" => "active", "id IN" => vec![1, 2, 3]},
    )?;
    let (sql, params) = last(&log);
    assert_eq!(sql, "SELECT * FROM users WHERE status = ? AND id IN (?,?,?)");
    assert_eq!(
        params,
        vec![
            SqlValue::Text("active".into()),
            SqlValue::Int(1),
            SqlValue::Int(2),
            SqlValue::Int(3),
        ]
    );
    Ok(())
}

#[test]
fn insert_binds_data_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let (mut db, log) = recording("mysql", false);
    let id = db.insert("users", &columns! {"name" => "A", "age" => 5})?;
    assert_eq!(id, 42);
    let (sql, params) = last(&log);
    assert_eq!(sql, "INSERT INTO users (name,age) VALUES (?,?)");
    assert_eq!(params, vec![SqlValue::Text("A".into()), SqlValue::Int(5)]);
    Ok(())
}

#[test]
fn update_by_id_matches_explicit_condition() -> Result<(), Box<dyn std::error::Error>> {
    let (mut db, log) = recording("mysql", false);
    db.update("users", &columns! {"name" => "B"}, 7)?;
    let shorthand = last(&log);
    db.update("users", &columns! {"name" => "B"}, columns! {"id" => 7})?;
    let explicit = last(&log);

    assert_eq!(shorthand, explicit);
    assert_eq!(shorthand.0, "UPDATE users SET name = ? WHERE id = ?");
    assert_eq!(shorthand.1, vec![SqlValue::Text("B".into()), SqlValue::Int(7)]);
    Ok(())
}

#[test]
fn delete_appends_limit_only_when_given() -> Result<(), Box<dyn std::error::Error>> {
    let (mut db, log) = recording("mysql", false);
    db.delete("users", columns! {"id" => 3}, Some(1))?;
    assert_eq!(
        last(&log),
        ("DELETE FROM users WHERE id = ? LIMIT 1".to_string(), vec![SqlValue::Int(3)])
    );

    db.delete("users", columns! {"id" => 3}, None)?;
    assert_eq!(last(&log).0, "DELETE FROM users WHERE id = ?");
    Ok(())
}

#[test]
fn sqlite_dialect_limits_through_rowid() -> Result<(), Box<dyn std::error::Error>> {
    let (mut db, log) = recording("sqlite", false);
    db.delete("users", 3, Some(2))?;
    assert_eq!(
        last(&log).0,
        "DELETE FROM users WHERE rowid IN (SELECT rowid FROM users WHERE id = ? LIMIT 2)"
    );
    db.truncate("users")?;
    assert_eq!(last(&log).0, "DELETE FROM users");
    Ok(())
}

#[test]
fn short_deletes_and_truncate() -> Result<(), Box<dyn std::error::Error>> {
    let (mut db, log) = recording("mysql", false);
    db.delete_by_id("users", 9)?;
    assert_eq!(last(&log), ("DELETE FROM users WHERE id = ?".to_string(), vec![SqlValue::Int(9)]));
    db.delete_by_ids("users", "id", "1,2,3")?;
    assert_eq!(last(&log), ("DELETE FROM users WHERE id IN (1,2,3)".to_string(), vec![]));
    db.delete_all("users")?;
    assert_eq!(last(&log).0, "DELETE FROM users");
    db.truncate("users")?;
    assert_eq!(last(&log).0, "TRUNCATE TABLE users");
    Ok(())
}

#[test]
fn select_resolves_named_binding() -> Result<(), Box<dyn std::error::Error>> {
    let (mut db, log) = recording("mysql", false);
    db.select("users", &columns! {"name" => "A", "age" => 5})?;
    assert_eq!(
        last(&log),
        (
            "SELECT * FROM users WHERE name = ? AND age = ?".to_string(),
            vec![SqlValue::Text("A".into()), SqlValue::Int(5)]
        )
    );
    Ok(())
}

#[test]
fn driver_failure_carries_the_statement() {
    let (mut db, _log) = recording("mysql", true);
    let err = db.run("UPDATE users SET seen = ?", args![1]).unwrap_err();
    assert_eq!(err.sql(), Some("UPDATE users SET seen = ?"));
    assert!(matches!(err.root(), SqlSugarError::ExecutionError(_)));
}

#[test]
fn empty_data_is_rejected_before_sending() {
    let (mut db, log) = recording("mysql", false);
    let nothing: Vec<(String, SqlValue)> = Vec::new();
    assert!(matches!(
        db.insert("users", &nothing),
        Err(SqlSugarError::ParameterError(_))
    ));
    assert!(matches!(
        db.delete("users", nothing, None),
        Err(SqlSugarError::ParameterError(_))
    ));
    assert!(log.borrow().is_empty());
}

#[test]
fn debug_mode_is_per_instance() -> Result<(), Box<dyn std::error::Error>> {
    let (mut db, log) = recording("mysql", false);
    assert_eq!(db.debug(), DebugMode::Off);
    db.set_debug(DebugMode::Log);
    db.run("SELECT ?", args!["x"])?;
    assert_eq!(db.debug(), DebugMode::Log);
    assert_eq!(log.borrow().len(), 1);
    Ok(())
}
