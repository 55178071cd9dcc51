//! Backend dialects.
//!
//! Everything that differs between backends is data returned by the
//! [`Dialect`] trait: identifier quoting, placeholder style, probe SQL,
//! paging syntax, type-name rendering, parameter limits, and bulk-insert
//! availability. The query builder and predicate compiler contain no
//! per-backend branching; a dialect is bound once when the `Database` is
//! constructed.

mod mssql;
mod mysql;

pub use mssql::MssqlDialect;
pub use mysql::MySqlDialect;

use crate::schema::column::ColumnDefinition;

/// Per-backend capabilities and SQL fragments.
///
/// Probe statements embed their own placeholders in the dialect's style and
/// take positional parameters: table probes take the table name, the column
/// probe takes table name then column name.
pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    /// Quote one identifier.
    fn quote(&self, ident: &str) -> String;

    /// Positional parameter placeholder for the given zero-based index.
    fn placeholder(&self, index: usize) -> String;

    /// Render a column's canonical type to this backend's SQL type name,
    /// honoring declared size / max-size / precision+scale.
    fn type_name(&self, column: &ColumnDefinition) -> String;

    /// DDL clause marking a column as auto-increment.
    fn auto_increment_clause(&self) -> &'static str;

    /// Probe returning a row when the named table exists.
    fn table_exists_sql(&self) -> &'static str;

    /// Probe returning a row when the named temporary table exists.
    fn temporary_table_exists_sql(&self) -> &'static str;

    /// Probe returning a row when the named column exists on the named table.
    fn column_exists_sql(&self) -> &'static str;

    /// Paging clause appended after ORDER BY.
    fn paging_clause(&self, offset: u64, limit: u64) -> String;

    /// Whether the paging clause is only valid after an ORDER BY.
    fn paging_requires_order(&self) -> bool;

    /// Statement fetching the key generated by the latest insert on this
    /// connection.
    fn generated_key_sql(&self) -> &'static str;

    /// Per-statement parameter limit; chunked batch inserts are sized to
    /// stay within it.
    fn max_statement_params(&self) -> usize;

    /// Whether multi-row VALUES inserts are available. When false, batch
    /// inserts issue one statement per row.
    fn supports_bulk_insert(&self) -> bool;
}
