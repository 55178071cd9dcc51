//! MySQL dialect.

use super::Dialect;
use crate::schema::column::ColumnDefinition;
use crate::value::DbType;

/// MySQL capabilities: backtick quoting, `?` placeholders, LIMIT/OFFSET
/// paging, AUTO_INCREMENT. Batch inserts chunk into multi-row VALUES
/// statements under the 65535-parameter limit.
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote(&self, ident: &str) -> String {
        format!("`{ident}`")
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn type_name(&self, column: &ColumnDefinition) -> String {
        match column.db_type {
            DbType::Int16 => "SMALLINT".to_string(),
            DbType::Int32 => "INT".to_string(),
            DbType::Int64 => "BIGINT".to_string(),
            DbType::Float32 => "FLOAT".to_string(),
            DbType::Float64 => "DOUBLE".to_string(),
            DbType::Decimal => {
                let precision = column.precision.unwrap_or(18);
                let scale = column.scale.unwrap_or(2);
                format!("DECIMAL({precision},{scale})")
            }
            DbType::Bool => "TINYINT(1)".to_string(),
            DbType::String => {
                if column.is_size_max {
                    "LONGTEXT".to_string()
                } else {
                    format!("VARCHAR({})", column.size.unwrap_or(255))
                }
            }
            DbType::Text => "LONGTEXT".to_string(),
            DbType::DateTime => "DATETIME".to_string(),
            DbType::Date => "DATE".to_string(),
            DbType::Guid => "CHAR(36)".to_string(),
            DbType::Json => "JSON".to_string(),
            DbType::Binary => {
                if column.is_size_max || column.size.is_none() {
                    "LONGBLOB".to_string()
                } else {
                    format!("VARBINARY({})", column.size.unwrap_or(255))
                }
            }
        }
    }

    fn auto_increment_clause(&self) -> &'static str {
        "AUTO_INCREMENT"
    }

    fn table_exists_sql(&self) -> &'static str {
        "SELECT 1 FROM information_schema.tables WHERE table_schema = DATABASE() AND table_name = ?"
    }

    fn temporary_table_exists_sql(&self) -> &'static str {
        // MySQL keeps temporary tables out of information_schema; probing
        // the regular catalog reports absence, which is the conservative
        // answer for existence-gated DDL.
        "SELECT 1 FROM information_schema.tables WHERE table_schema = DATABASE() AND table_name = ?"
    }

    fn column_exists_sql(&self) -> &'static str {
        "SELECT 1 FROM information_schema.columns WHERE table_schema = DATABASE() AND table_name = ? AND column_name = ?"
    }

    fn paging_clause(&self, offset: u64, limit: u64) -> String {
        format!("LIMIT {limit} OFFSET {offset}")
    }

    fn paging_requires_order(&self) -> bool {
        false
    }

    fn generated_key_sql(&self) -> &'static str {
        "SELECT LAST_INSERT_ID()"
    }

    fn max_statement_params(&self) -> usize {
        65535
    }

    fn supports_bulk_insert(&self) -> bool {
        true
    }
}
