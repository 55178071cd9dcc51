//! Result rows handed back by the executor.
//!
//! The engine never materializes objects itself; it passes [`Row`]s to the
//! model's `from_row` hook. A row is column names plus values in select-list
//! order.

use crate::error::OrmError;
use crate::value::{DbValue, ValueConvert};

/// One result row: column names and values in select-list order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<DbValue>,
}

impl Row {
    /// Build a row. `columns` and `values` must have equal length.
    pub fn new(columns: Vec<String>, values: Vec<DbValue>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Value by column name, or `None` if the column is absent.
    pub fn get(&self, column: &str) -> Option<&DbValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// Value by position.
    pub fn get_at(&self, index: usize) -> Option<&DbValue> {
        self.values.get(index)
    }

    /// Typed value by column name. Fails on a missing column, a NULL
    /// payload, or a variant mismatch.
    pub fn try_get<T: ValueConvert>(&self, column: &str) -> Result<T, OrmError> {
        let value = self
            .get(column)
            .ok_or_else(|| OrmError::NotFound(format!("column '{column}' in result row")))?;
        T::from_value(value).ok_or_else(|| {
            OrmError::Execution(format!(
                "column '{column}' holds {value:?}, which does not convert to the requested type"
            ))
        })
    }

    /// Typed nullable value by column name. NULL becomes `None`; a missing
    /// column or variant mismatch is still an error.
    pub fn try_get_opt<T: ValueConvert>(&self, column: &str) -> Result<Option<T>, OrmError> {
        let value = self
            .get(column)
            .ok_or_else(|| OrmError::NotFound(format!("column '{column}' in result row")))?;
        if value.is_null() {
            return Ok(None);
        }
        T::from_value(value).map(Some).ok_or_else(|| {
            OrmError::Execution(format!(
                "column '{column}' holds {value:?}, which does not convert to the requested type"
            ))
        })
    }

    /// Column names in select-list order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}
