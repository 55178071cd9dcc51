//! SQL Server dialect.

use super::Dialect;
use crate::schema::column::ColumnDefinition;
use crate::value::DbType;

/// SQL Server capabilities: bracket quoting, `@pN` placeholders,
/// OFFSET/FETCH paging, IDENTITY auto-increment, native bulk insert.
pub struct MssqlDialect;

impl Dialect for MssqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn quote(&self, ident: &str) -> String {
        format!("[{ident}]")
    }

    fn placeholder(&self, index: usize) -> String {
        format!("@p{index}")
    }

    fn type_name(&self, column: &ColumnDefinition) -> String {
        match column.db_type {
            DbType::Int16 => "SMALLINT".to_string(),
            DbType::Int32 => "INT".to_string(),
            DbType::Int64 => "BIGINT".to_string(),
            DbType::Float32 => "REAL".to_string(),
            DbType::Float64 => "FLOAT".to_string(),
            DbType::Decimal => {
                let precision = column.precision.unwrap_or(18);
                let scale = column.scale.unwrap_or(2);
                format!("DECIMAL({precision},{scale})")
            }
            DbType::Bool => "BIT".to_string(),
            DbType::String => {
                if column.is_size_max {
                    "NVARCHAR(MAX)".to_string()
                } else {
                    format!("NVARCHAR({})", column.size.unwrap_or(255))
                }
            }
            DbType::Text | DbType::Json => "NVARCHAR(MAX)".to_string(),
            DbType::DateTime => "DATETIME2".to_string(),
            DbType::Date => "DATE".to_string(),
            DbType::Guid => "UNIQUEIDENTIFIER".to_string(),
            DbType::Binary => {
                if column.is_size_max || column.size.is_none() {
                    "VARBINARY(MAX)".to_string()
                } else {
                    format!("VARBINARY({})", column.size.unwrap_or(255))
                }
            }
        }
    }

    fn auto_increment_clause(&self) -> &'static str {
        "IDENTITY(1,1)"
    }

    fn table_exists_sql(&self) -> &'static str {
        "SELECT 1 FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = @p0"
    }

    fn temporary_table_exists_sql(&self) -> &'static str {
        // Temp tables live in tempdb with a uniquified suffix.
        "SELECT 1 FROM tempdb.sys.tables WHERE name LIKE @p0"
    }

    fn column_exists_sql(&self) -> &'static str {
        "SELECT 1 FROM INFORMATION_SCHEMA.COLUMNS WHERE TABLE_NAME = @p0 AND COLUMN_NAME = @p1"
    }

    fn paging_clause(&self, offset: u64, limit: u64) -> String {
        format!("OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY")
    }

    fn paging_requires_order(&self) -> bool {
        true
    }

    fn generated_key_sql(&self) -> &'static str {
        "SELECT CAST(SCOPE_IDENTITY() AS BIGINT)"
    }

    fn max_statement_params(&self) -> usize {
        2100
    }

    fn supports_bulk_insert(&self) -> bool {
        true
    }
}
