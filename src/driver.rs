use crate::config::DatabaseConfig;
use crate::error::SqlSugarError;
use crate::results::ResultSet;
use crate::translation::PlaceholderStyle;
use crate::types::{Dialect, SqlValue};

/// The database client a [`Database`](crate::Database) delegates to.
///
/// Implementations receive SQL already rewritten into their
/// [`placeholder_style`](Driver::placeholder_style) and a positional parameter
/// list. Every failure must come back as an `Err`; there is no silent mode.
pub trait Driver {
    fn placeholder_style(&self) -> PlaceholderStyle;

    /// Prepare, bind and run one statement.
    ///
    /// Statements that produce columns return their rows; others return the
    /// number of rows they changed.
    ///
    /// # Errors
    /// Returns the driver's prepare or execution error.
    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<ResultSet, SqlSugarError>;

    /// Run one or more statements without parameters.
    ///
    /// # Errors
    /// Returns the driver's execution error.
    fn execute_batch(&mut self, sql: &str) -> Result<(), SqlSugarError>;

    /// Identifier generated by the most recent insert on this connection.
    ///
    /// # Errors
    /// Returns an error if the driver cannot report one.
    fn last_insert_id(&mut self) -> Result<i64, SqlSugarError>;
}

/// Open the built-in driver for the configured dialect.
///
/// # Errors
/// Returns `SqlSugarError::ConnectionError` when the dialect has no built-in
/// driver (or its cargo feature is off) or the connection attempt fails.
pub fn connect(config: &DatabaseConfig) -> Result<Box<dyn Driver>, SqlSugarError> {
    match config.dialect() {
        #[cfg(feature = "sqlite")]
        Dialect::Sqlite => Ok(Box::new(crate::sqlite::SqliteDriver::open(config)?)),
        #[cfg(feature = "postgres")]
        Dialect::Postgres => Ok(Box::new(crate::postgres::PostgresDriver::connect(config)?)),
        other => Err(SqlSugarError::ConnectionError(format!(
            "no built-in driver for dialect '{other}' (dsn {}); attach one with Database::with_driver",
            config.dsn()
        ))),
    }
}
