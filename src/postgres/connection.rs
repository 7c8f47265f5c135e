use tokio::runtime::{Builder, Runtime};
use tokio_postgres::{Client, NoTls};

use super::config::client_config;
use super::params::as_refs;
use super::query::build_result_set;
use crate::config::DatabaseConfig;
use crate::driver::Driver;
use crate::error::SqlSugarError;
use crate::results::ResultSet;
use crate::translation::PlaceholderStyle;
use crate::types::SqlValue;

/// [`Driver`] over one `tokio_postgres` client.
///
/// Owns a current-thread runtime; every call blocks on it until the server
/// answers. The connection task only makes progress inside those calls.
pub struct PostgresDriver {
    runtime: Runtime,
    client: Client,
}

impl PostgresDriver {
    /// Connect using the host, port, database and credentials in `config`.
    ///
    /// # Errors
    /// Returns `SqlSugarError::ConnectionError` if the runtime cannot start or
    /// the server refuses the connection.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, SqlSugarError> {
        let runtime = Builder::new_current_thread().enable_all().build().map_err(|e| {
            SqlSugarError::ConnectionError(format!("Failed to start postgres runtime: {e}"))
        })?;

        let pg = client_config(config);
        let (client, connection) = runtime.block_on(pg.connect(NoTls)).map_err(|e| {
            SqlSugarError::ConnectionError(format!(
                "Failed to connect to postgres at {}: {e}",
                config.dsn()
            ))
        })?;
        runtime.spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "postgres connection closed with error");
            }
        });

        tracing::info!(host = %config.host, database = config.database(), "connected to postgres");
        Ok(Self { runtime, client })
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Driver for PostgresDriver {
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Postgres
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<ResultSet, SqlSugarError> {
        let client = &self.client;
        self.runtime.block_on(async move {
            let stmt = client.prepare(sql).await?;
            let refs = as_refs(params);
            if stmt.columns().is_empty() {
                let affected = client.execute(&stmt, &refs).await?;
                let affected = usize::try_from(affected).map_err(|e| {
                    SqlSugarError::ExecutionError(format!(
                        "postgres affected rows conversion error: {e}"
                    ))
                })?;
                Ok(ResultSet::affected(affected))
            } else {
                let rows = client.query(&stmt, &refs).await?;
                build_result_set(&stmt, &rows)
            }
        })
    }

    fn execute_batch(&mut self, sql: &str) -> Result<(), SqlSugarError> {
        self.runtime.block_on(self.client.batch_execute(sql))?;
        Ok(())
    }

    fn last_insert_id(&mut self) -> Result<i64, SqlSugarError> {
        let row = self
            .runtime
            .block_on(self.client.query_one("SELECT lastval()", &[]))?;
        Ok(row.try_get(0)?)
    }
}
