//! Thin, synchronous helpers over a single SQL connection: parameterized
//! `run`, result shaping (`rows_list`, `rows_column_list`, `cell`, JSON output)
//! and one-line insert/update/delete/select builders.
//!
//! ```rust,no_run
//! use sql_sugar::prelude::*;
//!
//! # fn demo() -> Result<(), SqlSugarError> {
//! let cfg = DatabaseConfig::builder(":memory:", "app").dialect("sqlite").finish();
//! let mut db = Database::connect(cfg)?;
//! db.raw("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, status TEXT)")?;
//! db.insert("users", &columns! {"name" => "Ann", "status" => "active"})?;
//!
//! let names = db.rows_column_list(
//!     "SELECT id, name FROM users WHERE 1=1",
//!     filter! {"status" => "active", "id IN" => vec![1, 2, 3]},
//! )?;
//! # let _ = names;
//! # Ok(())
//! # }
//! ```

mod arguments;
mod config;
mod database;
mod debug;
mod driver;
mod error;
mod results;
mod types;

pub mod prelude;
pub mod query_builder;
pub mod translation;

#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use arguments::{Args, FilterValue, IntoFilterValue};
pub use config::{DatabaseConfig, DatabaseConfigBuilder};
pub use database::Database;
pub use debug::{DebugMode, render as render_statement};
pub use driver::{Driver, connect as connect_driver};
pub use error::SqlSugarError;
pub use query_builder::{BoundParams, QueryAndParams, Where};
pub use results::{KeyedRows, ResultSet, Row};
pub use translation::PlaceholderStyle;
pub use types::{Dialect, RowKey, SqlValue};

#[cfg(feature = "postgres")]
pub use postgres::PostgresDriver;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDriver;
