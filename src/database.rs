use std::fmt;

use crate::arguments::Args;
use crate::config::DatabaseConfig;
use crate::debug::{self, DebugMode};
use crate::driver::{self, Driver};
use crate::error::SqlSugarError;
use crate::query_builder::{self, QueryAndParams};
use crate::results::ResultSet;
use crate::translation::translate_placeholders;
use crate::types::Dialect;

mod fetch;
mod mutate;

/// One live database connection plus query helpers.
///
/// Every call is a blocking round trip on the single connection held here.
/// Methods take `&mut self`, so one instance cannot be used from two threads at
/// once; share it behind a `Mutex` or open one per worker.
///
/// ```rust,no_run
/// use sql_sugar::prelude::*;
///
/// # fn demo() -> Result<(), SqlSugarError> {
/// let cfg = DatabaseConfig::builder("app.db", "app").dialect("sqlite").finish();
/// let mut db = Database::connect(cfg)?;
/// let id = db.insert("users", &columns! {"name" => "Ann", "age" => 31})?;
/// let name = db.cell("SELECT name FROM users WHERE id = ?", args![id])?;
/// # let _ = name;
/// # Ok(())
/// # }
/// ```
pub struct Database {
    config: DatabaseConfig,
    dialect: Dialect,
    debug: DebugMode,
    driver: Box<dyn Driver>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("dsn", &self.config.dsn())
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Validate `config` and open the built-in driver for its dialect.
    ///
    /// # Errors
    /// Returns `SqlSugarError::ConfigError` if `database` or `username` is missing
    /// (checked before any connection attempt), or `SqlSugarError::ConnectionError`
    /// if the driver cannot connect.
    pub fn connect(config: DatabaseConfig) -> Result<Self, SqlSugarError> {
        config.validate()?;
        let driver = driver::connect(&config)?;
        Ok(Self::assemble(config, driver))
    }

    /// Validate `config` and use a caller-supplied driver.
    ///
    /// # Errors
    /// Returns `SqlSugarError::ConfigError` if `database` or `username` is missing.
    pub fn with_driver(
        config: DatabaseConfig,
        driver: Box<dyn Driver>,
    ) -> Result<Self, SqlSugarError> {
        config.validate()?;
        Ok(Self::assemble(config, driver))
    }

    fn assemble(config: DatabaseConfig, driver: Box<dyn Driver>) -> Self {
        Self {
            dialect: config.dialect(),
            debug: config.debug,
            config,
            driver,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    #[must_use]
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    #[must_use]
    pub fn debug(&self) -> DebugMode {
        self.debug
    }

    pub fn set_debug(&mut self, debug: DebugMode) {
        self.debug = debug;
    }

    /// The underlying driver, for calls this type does not wrap.
    pub fn driver_mut(&mut self) -> &mut dyn Driver {
        self.driver.as_mut()
    }

    /// Run SQL without parameters; may contain several statements.
    ///
    /// # Errors
    /// Returns `SqlSugarError::Statement` wrapping the driver error.
    pub fn raw(&mut self, sql: &str) -> Result<(), SqlSugarError> {
        debug::emit_statement(
            self.debug,
            &QueryAndParams::positional(sql.to_string(), Vec::new()),
        );
        let outcome = self.driver.execute_batch(sql);
        outcome.map_err(|err| self.statement_error(sql, err))
    }

    /// Resolve `sql` and `args`, then execute through the driver.
    ///
    /// A template containing `WHERE 1=1` with filter (or named) arguments has
    /// the marker replaced by generated predicates; see
    /// [`query_builder::build_predicates`].
    ///
    /// # Errors
    /// Returns `SqlSugarError::Statement` wrapping a parameter or driver error.
    pub fn run(&mut self, sql: &str, args: impl Into<Args>) -> Result<ResultSet, SqlSugarError> {
        self.execute(query_builder::resolve(sql, args.into()))
    }

    /// Execute an already built statement.
    ///
    /// # Errors
    /// Returns `SqlSugarError::Statement` wrapping a parameter or driver error.
    pub fn execute(&mut self, statement: QueryAndParams) -> Result<ResultSet, SqlSugarError> {
        debug::emit_statement(self.debug, &statement);
        let outcome = translate_placeholders(
            &statement.query,
            &statement.params,
            self.driver.placeholder_style(),
        )
        .and_then(|translated| self.driver.execute(&translated.sql, &translated.params));
        outcome.map_err(|err| self.statement_error(&statement.query, err))
    }

    /// Identifier generated by the most recent insert on this connection.
    ///
    /// # Errors
    /// Returns the driver error if no identifier is available.
    pub fn last_insert_id(&mut self) -> Result<i64, SqlSugarError> {
        self.driver.last_insert_id()
    }

    fn statement_error(&self, sql: &str, err: SqlSugarError) -> SqlSugarError {
        debug::emit_failure(self.debug, &err, sql);
        SqlSugarError::Statement {
            sql: sql.to_string(),
            source: Box::new(err),
        }
    }
}
