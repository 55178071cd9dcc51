//! Breakwater is a lightweight object-relational mapper built around
//! explicit, registered model schemas.
//!
//! A [`model::Model`] declares its table and columns as plain data; the
//! engine compiles typed [`predicate`] trees into deterministic
//! parameterized SQL, renders DDL and CRUD through a backend [`dialect`],
//! and hands finished statements to a pluggable [`executor::SqlExecutor`].
//! Schema state is reconciled against the live catalog and memoized per
//! connection identity, and two migration engines — automatic
//! reconciliation and versioned up/down scripts — keep the database in step
//! with the declared models.
//!
//! ```no_run
//! use std::sync::Arc;
//! use breakwater::prelude::*;
//!
//! # fn executor() -> Box<dyn breakwater::executor::SqlExecutor> { unimplemented!() }
//! # fn run() -> Result<(), OrmError> {
//! let mut db = Database::new(
//!     "app-db",
//!     executor(),
//!     Arc::new(MssqlDialect),
//!     OrmConfig::load().map_err(|e| OrmError::Config(e.to_string()))?,
//!     Arc::new(CacheSet::new()),
//! );
//! db.create_table::<User>()?;
//! let adults: Vec<User> = db.select(Some(col("age").ge(18)))?;
//! # Ok(()) }
//! # struct User;
//! # impl breakwater::model::Model for User {
//! #     fn schema() -> breakwater::schema::table::TableDefinition { unimplemented!() }
//! #     fn from_row(_: &breakwater::row::Row) -> Result<Self, OrmError> { unimplemented!() }
//! #     fn value_of(&self, _: &str) -> breakwater::value::DbValue { unimplemented!() }
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod database;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod migration;
pub mod model;
pub mod predicate;
pub mod query;
pub mod row;
pub mod schema;
pub mod value;

/// The commonly used surface in one import.
pub mod prelude {
    pub use crate::cache::ResultCache;
    pub use crate::config::OrmConfig;
    pub use crate::database::{CacheSet, Database};
    pub use crate::dialect::{Dialect, MssqlDialect, MySqlDialect};
    pub use crate::error::OrmError;
    pub use crate::executor::{SqlExecutor, StatementKind};
    pub use crate::migration::{
        automatic_migration, migrate, migrate_to_latest, migrate_to_previous_version, Migration,
    };
    pub use crate::model::Model;
    pub use crate::predicate::{col, Predicate};
    pub use crate::query::{OrderBy, SortDirection};
    pub use crate::row::Row;
    pub use crate::schema::column::{ColumnDefinition, RelationDef, RelationKind};
    pub use crate::schema::registry::ModelRegistry;
    pub use crate::schema::table::TableDefinition;
    pub use crate::value::{DbType, DbValue};
}
