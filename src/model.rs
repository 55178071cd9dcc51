//! The model contract.
//!
//! A model supplies a declarative schema descriptor, a row-materialization
//! hook, and field extraction for parameter binding. Descriptors are plain
//! data built in `schema()`; there is no reflection and no derive — the
//! registry collects descriptors at startup.

use crate::database::Database;
use crate::error::OrmError;
use crate::row::Row;
use crate::schema::table::TableDefinition;
use crate::value::DbValue;

/// A type mapped onto a relational table.
pub trait Model: Sized {
    /// The declarative schema descriptor: table name plus columns in field
    /// declaration order. Called once per (model, connection identity) and
    /// memoized; keep it cheap and deterministic.
    fn schema() -> TableDefinition;

    /// Materialize one instance from a result row.
    fn from_row(row: &Row) -> Result<Self, OrmError>;

    /// Extract the value of one mapped column for parameter binding.
    /// Relation fields are never requested.
    fn value_of(&self, column: &str) -> DbValue;

    /// Stitch eagerly-loaded relations onto freshly selected models.
    ///
    /// The default does nothing. Models with relations fetch children
    /// through [`crate::query::eager::load_related`] and assign them here;
    /// the loader batches one query per relation and the child select
    /// recurses into the child's own relations.
    fn load_relations(_models: &mut [Self], _db: &mut Database) -> Result<(), OrmError> {
        Ok(())
    }
}
