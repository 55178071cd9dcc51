//! The migration tracking table.
//!
//! Applied versions live in `breakwater_migrations`, one row per applied
//! migration. The runner creates the table on first use and keeps it in
//! sync as migrations apply and revert. Automatic migration never touches
//! it.

use chrono::{DateTime, Utc};

use crate::error::OrmError;
use crate::row::Row;
use crate::schema::column::ColumnDefinition;
use crate::schema::table::TableDefinition;
use crate::value::DbType;

/// Name of the tracking table.
pub const TRACKING_TABLE: &str = "breakwater_migrations";

/// One applied migration.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationRecord {
    pub version: String,
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

impl MigrationRecord {
    pub fn from_row(row: &Row) -> Result<Self, OrmError> {
        Ok(Self {
            version: row.try_get("version")?,
            name: row.try_get("name")?,
            applied_at: row.try_get("applied_at")?,
        })
    }
}

/// Schema of the tracking table.
pub fn tracking_table_definition() -> TableDefinition {
    TableDefinition::new(
        TRACKING_TABLE,
        vec![
            ColumnDefinition::new("version", DbType::String)
                .size(64)
                .primary_key()
                .not_null(),
            ColumnDefinition::new("name", DbType::String)
                .size(255)
                .not_null(),
            ColumnDefinition::new("applied_at", DbType::DateTime).not_null(),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::DbValue;

    #[test]
    fn test_tracking_table_shape() {
        let td = tracking_table_definition();
        assert_eq!(td.table_name, TRACKING_TABLE);
        assert_eq!(td.primary_keys_count(), 1);
        assert_eq!(td.mapped_columns().count(), 3);
    }

    #[test]
    fn test_record_from_row() {
        let applied_at = Utc::now();
        let row = Row::new(
            vec![
                "version".to_string(),
                "name".to_string(),
                "applied_at".to_string(),
            ],
            vec![
                DbValue::String(Some("2".to_string())),
                DbValue::String(Some("add_users".to_string())),
                DbValue::DateTime(Some(applied_at)),
            ],
        );
        let record = MigrationRecord::from_row(&row).unwrap();
        assert_eq!(record.version, "2");
        assert_eq!(record.name, "add_users");
        assert_eq!(record.applied_at, applied_at);
    }
}
