use rusqlite::Connection;

use crate::config::DatabaseConfig;
use crate::error::SqlSugarError;

/// Name that opens a private in-memory database.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Open the `SQLite` database named by `config.database`.
///
/// The value is a file path, `:memory:`, or a `file:` URI. Host, port,
/// charset and credentials do not apply to `SQLite` and are ignored.
///
/// # Errors
/// Returns `SqlSugarError::ConnectionError` if the database cannot be opened.
pub fn open_connection(config: &DatabaseConfig) -> Result<Connection, SqlSugarError> {
    let path = config.database();
    let opened = if path == MEMORY_DATABASE {
        Connection::open_in_memory()
    } else {
        Connection::open(path)
    };
    opened.map_err(|e| {
        SqlSugarError::ConnectionError(format!("Failed to open SQLite database '{path}': {e}"))
    })
}
