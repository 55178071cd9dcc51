//! Statement composition and execution.
//!
//! [`builder`] extends [`crate::database::Database`] with the CRUD, DDL, and
//! probe surface; [`eager`] batches relation loading for freshly selected
//! models. All composed SQL is deterministic for a given (model schema,
//! predicate, dialect) triple, and every literal travels as a positional
//! parameter.

pub mod builder;
pub mod eager;

use crate::error::OrmError;
use crate::schema::table::TableDefinition;

/// Sort direction for an ORDER BY term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One ORDER BY term over a mapped column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }

    pub(crate) fn validate(&self, table: &TableDefinition) -> Result<(), OrmError> {
        match table.column(&self.column) {
            Some(c) if c.is_mapped() => Ok(()),
            _ => Err(OrmError::UnsupportedExpression(format!(
                "ORDER BY references unknown or unmapped column '{}' on table '{}'",
                self.column, table.table_name
            ))),
        }
    }
}
