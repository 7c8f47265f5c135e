use crate::config::DatabaseConfig;

/// Default Postgres port when the config leaves it unset.
pub const DEFAULT_PORT: u16 = 5432;

/// Client configuration for `tokio_postgres`.
///
/// `charset` maps to `client_encoding`; the default `utf8` becomes `UTF8`.
#[must_use]
pub fn client_config(config: &DatabaseConfig) -> tokio_postgres::Config {
    let mut pg = tokio_postgres::Config::new();
    pg.host(&config.host)
        .port(config.port.unwrap_or(DEFAULT_PORT))
        .dbname(config.database())
        .user(config.username());
    if !config.password.is_empty() {
        pg.password(&config.password);
    }
    if !config.charset.is_empty() {
        pg.options(format!("-c client_encoding={}", config.charset.to_ascii_uppercase()));
    }
    pg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_config_fields() {
        let cfg = DatabaseConfig::builder("shop", "app")
            .dialect("pgsql")
            .host("db.internal")
            .password("secret")
            .finish();
        let pg = client_config(&cfg);
        assert_eq!(pg.get_dbname(), Some("shop"));
        assert_eq!(pg.get_user(), Some("app"));
        assert_eq!(pg.get_ports(), [DEFAULT_PORT]);
        assert_eq!(pg.get_password(), Some("secret".as_bytes()));
        assert_eq!(pg.get_options(), Some("-c client_encoding=UTF8"));
    }
}
