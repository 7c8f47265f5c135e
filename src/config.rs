use serde::Deserialize;

use crate::debug::DebugMode;
use crate::error::SqlSugarError;
use crate::types::Dialect;

fn default_dialect() -> String {
    "mysql".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_charset() -> String {
    "utf8".to_string()
}

/// Connection settings for a [`Database`](crate::Database).
///
/// `database` and `username` are required; [`DatabaseConfig::validate`] rejects a
/// config without them before any connection attempt. Deserializes from any serde
/// source using the keys `type`, `host`, `port`, `charset`, `database`,
/// `username`, `password` and `debug`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    #[serde(rename = "type", default = "default_dialect")]
    pub dialect: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default = "default_charset")]
    pub charset: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub debug: DebugMode,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            host: default_host(),
            port: None,
            charset: default_charset(),
            database: None,
            username: None,
            password: String::new(),
            debug: DebugMode::Off,
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn builder(database: impl Into<String>, username: impl Into<String>) -> DatabaseConfigBuilder {
        DatabaseConfigBuilder::new(database, username)
    }

    /// Build from string key/value pairs (`type`, `host`, `port`, `charset`,
    /// `database`, `username`, `password`, `debug`). Unknown keys are ignored.
    ///
    /// # Errors
    /// Returns `SqlSugarError::ConfigError` for a non-numeric port or a missing
    /// `database`/`username`.
    pub fn from_map<I, K, V>(entries: I) -> Result<Self, SqlSugarError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut cfg = DatabaseConfig::default();
        for (key, value) in entries {
            let value = value.as_ref();
            match key.as_ref() {
                "type" => cfg.dialect = value.to_string(),
                "host" => cfg.host = value.to_string(),
                "port" => {
                    let port = value.parse::<u16>().map_err(|e| {
                        SqlSugarError::ConfigError(format!("invalid port '{value}': {e}"))
                    })?;
                    cfg.port = Some(port);
                }
                "charset" => cfg.charset = value.to_string(),
                "database" => cfg.database = Some(value.to_string()),
                "username" => cfg.username = Some(value.to_string()),
                "password" => cfg.password = value.to_string(),
                "debug" => cfg.debug = DebugMode::parse(value),
                _ => {}
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the required fields.
    ///
    /// # Errors
    /// Returns `SqlSugarError::ConfigError` if `database` or `username` is missing.
    pub fn validate(&self) -> Result<(), SqlSugarError> {
        if self.database.is_none() {
            return Err(SqlSugarError::ConfigError("database is required".to_string()));
        }
        if self.username.is_none() {
            return Err(SqlSugarError::ConfigError("username is required".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        Dialect::parse(&self.dialect)
    }

    #[must_use]
    pub fn database(&self) -> &str {
        self.database.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }

    /// `{type}:host={host};{port=N;}dbname={database};charset={charset}`
    #[must_use]
    pub fn dsn(&self) -> String {
        let port = self.port.map(|p| format!("port={p};")).unwrap_or_default();
        format!(
            "{}:host={};{port}dbname={};charset={}",
            self.dialect,
            self.host,
            self.database(),
            self.charset
        )
    }
}

/// Fluent builder for [`DatabaseConfig`].
#[derive(Debug, Clone)]
pub struct DatabaseConfigBuilder {
    cfg: DatabaseConfig,
}

impl DatabaseConfigBuilder {
    #[must_use]
    pub fn new(database: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            cfg: DatabaseConfig {
                database: Some(database.into()),
                username: Some(username.into()),
                ..DatabaseConfig::default()
            },
        }
    }

    #[must_use]
    pub fn dialect(mut self, dialect: impl Into<String>) -> Self {
        self.cfg.dialect = dialect.into();
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.cfg.host = host.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.cfg.port = Some(port);
        self
    }

    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.cfg.charset = charset.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.cfg.password = password.into();
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: DebugMode) -> Self {
        self.cfg.debug = debug;
        self
    }

    #[must_use]
    pub fn finish(self) -> DatabaseConfig {
        self.cfg
    }
}
