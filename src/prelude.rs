//! Common imports: `use sql_sugar::prelude::*;`

pub use crate::{
    Args, Database, DatabaseConfig, DebugMode, Dialect, Driver, FilterValue, KeyedRows,
    PlaceholderStyle, ResultSet, Row, RowKey, SqlSugarError, SqlValue, Where,
};
pub use crate::{args, columns, filter};

#[cfg(feature = "postgres")]
pub use crate::PostgresDriver;
#[cfg(feature = "sqlite")]
pub use crate::SqliteDriver;
