// Postgres module - tokio-postgres driven from a private current-thread runtime
//
// - config: client configuration built from a `DatabaseConfig`
// - params: `ToSql` for `SqlValue`
// - query: result extraction and building
// - connection: the `Driver` implementation

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use connection::PostgresDriver;
