use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlSugarError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Result shape error: {0}")]
    ShapeError(String),

    /// A statement failed; `sql` is the statement as sent to the driver.
    #[error("{source} (sql: {sql})")]
    Statement {
        sql: String,
        #[source]
        source: Box<SqlSugarError>,
    },
}

impl SqlSugarError {
    /// The innermost error, looking through `Statement` wrappers.
    #[must_use]
    pub fn root(&self) -> &SqlSugarError {
        match self {
            SqlSugarError::Statement { source, .. } => source.root(),
            other => other,
        }
    }

    /// The SQL text attached to a failed statement, if any.
    #[must_use]
    pub fn sql(&self) -> Option<&str> {
        match self {
            SqlSugarError::Statement { sql, .. } => Some(sql),
            _ => None,
        }
    }
}
