use rusqlite::Connection;

use super::config::open_connection;
use super::params::Params;
use super::query::build_result_set;
use crate::config::DatabaseConfig;
use crate::driver::Driver;
use crate::error::SqlSugarError;
use crate::results::ResultSet;
use crate::translation::PlaceholderStyle;
use crate::types::SqlValue;

/// [`Driver`] over a single rusqlite connection.
pub struct SqliteDriver {
    conn: Connection,
}

impl SqliteDriver {
    /// Open the database named in `config`.
    ///
    /// # Errors
    /// Returns `SqlSugarError::ConnectionError` if the database cannot be opened.
    pub fn open(config: &DatabaseConfig) -> Result<Self, SqlSugarError> {
        let conn = open_connection(config)?;
        tracing::info!(database = config.database(), "opened sqlite database");
        Ok(Self { conn })
    }

    /// Wrap an already open connection.
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl Driver for SqliteDriver {
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Sqlite
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<ResultSet, SqlSugarError> {
        let params = Params::convert(params);
        let mut stmt = self.conn.prepare(sql)?;
        if stmt.column_count() > 0 {
            return build_result_set(&mut stmt, params.as_values());
        }
        let affected = stmt.execute(&params.as_refs()[..])?;
        Ok(ResultSet::affected(affected))
    }

    fn execute_batch(&mut self, sql: &str) -> Result<(), SqlSugarError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn last_insert_id(&mut self) -> Result<i64, SqlSugarError> {
        Ok(self.conn.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> SqliteDriver {
        let cfg = DatabaseConfig::builder(":memory:", "unused")
            .dialect("sqlite")
            .finish();
        SqliteDriver::open(&cfg).unwrap()
    }

    #[test]
    fn dml_reports_affected_rows() {
        let mut driver = memory();
        driver
            .execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT)")
            .unwrap();
        let rs = driver
            .execute("INSERT INTO t (v) VALUES (?1), (?2)", &["a".into(), "b".into()])
            .unwrap();
        assert!(!rs.has_columns());
        assert_eq!(rs.rows_affected, 2);
        assert_eq!(driver.last_insert_id().unwrap(), 2);
    }

    #[test]
    fn queries_return_rows() {
        let mut driver = memory();
        let rs = driver
            .execute("SELECT ?1 AS a, 'x' AS b", &[SqlValue::Int(4)])
            .unwrap();
        assert_eq!(rs.column_names().as_slice(), ["a".to_string(), "b".to_string()]);
        assert_eq!(rs.results[0].get("a"), Some(&SqlValue::Int(4)));
        assert_eq!(rs.row_count(), 1);
    }
}
