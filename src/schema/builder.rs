//! Builds and memoizes reconciled table definitions.
//!
//! `table_definition::<M>` turns a model's declarative descriptor into the
//! [`TableDefinition`] the query builder works from: memoized per
//! (model type, connection identity), and reconciled against the live
//! catalog when one is cached for that identity. Reconciliation marks
//! columns that exist in the database and adopts catalog-observed
//! size/precision/scale/nullability where the declaration left them open.

use std::any::TypeId;
use std::sync::Arc;

use crate::database::Database;
use crate::error::OrmError;
use crate::model::Model;
use crate::schema::table::TableDefinition;

/// The reconciled, memoized definition for a model on this connection.
pub fn table_definition<M: Model + 'static>(
    db: &mut Database,
) -> Result<Arc<TableDefinition>, OrmError> {
    let type_id = TypeId::of::<M>();
    let caches = db.caches();
    if let Some(cached) = caches.schema.table_definition(db.identity(), type_id) {
        return Ok(cached);
    }

    db.ensure_catalog()?;

    let mut definition = M::schema();
    if let Some(catalog) = caches.schema.catalog(db.identity()) {
        reconcile(&mut definition, &catalog);
    }

    let definition = Arc::new(definition);
    caches
        .schema
        .store_table_definition(db.identity(), type_id, Arc::clone(&definition));
    Ok(definition)
}

/// Merge catalog observations into a declared definition.
///
/// Matching is by name, case-insensitive, since backends differ in how they
/// report identifier case. Declared sizes win; only unspecified ones adopt
/// the live value. Type and size drift on declared columns is left alone —
/// reconciling it is explicitly unsupported.
pub fn reconcile(definition: &mut TableDefinition, catalog: &[TableDefinition]) {
    let Some(live) = catalog
        .iter()
        .find(|t| t.table_name.eq_ignore_ascii_case(&definition.table_name))
    else {
        return;
    };
    definition.exists_in_db = true;

    for column in definition.columns.iter_mut() {
        if !column.is_mapped() {
            continue;
        }
        let Some(live_col) = live
            .columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(&column.name))
        else {
            continue;
        };
        column.exists_in_db = true;
        if column.size.is_none() && !column.is_size_max {
            column.size = live_col.size;
            column.is_size_max = live_col.is_size_max;
        }
        if column.precision.is_none() {
            column.precision = live_col.precision;
        }
        if column.scale.is_none() {
            column.scale = live_col.scale;
        }
        if !column.is_not_null && live_col.is_not_null {
            column.is_not_null = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::column::ColumnDefinition;
    use crate::value::DbType;

    fn declared() -> TableDefinition {
        TableDefinition::new(
            "users",
            vec![
                ColumnDefinition::new("id", DbType::Int64).primary_key(),
                ColumnDefinition::new("name", DbType::String),
                ColumnDefinition::new("added_later", DbType::Int32),
            ],
        )
    }

    fn live() -> Vec<TableDefinition> {
        vec![TableDefinition::new(
            "Users",
            vec![
                ColumnDefinition::new("Id", DbType::Int64).primary_key(),
                ColumnDefinition::new("Name", DbType::String)
                    .size(120)
                    .not_null(),
            ],
        )]
    }

    #[test]
    fn test_reconcile_marks_existing() {
        let mut td = declared();
        reconcile(&mut td, &live());
        assert!(td.exists_in_db);
        assert!(td.column("id").unwrap().exists_in_db);
        assert!(td.column("name").unwrap().exists_in_db);
        assert!(!td.column("added_later").unwrap().exists_in_db);
    }

    #[test]
    fn test_reconcile_adopts_unspecified_size_and_nullability() {
        let mut td = declared();
        reconcile(&mut td, &live());
        let name = td.column("name").unwrap();
        assert_eq!(name.size, Some(120));
        assert!(name.is_not_null);
    }

    #[test]
    fn test_reconcile_keeps_declared_size() {
        let mut td = TableDefinition::new(
            "users",
            vec![ColumnDefinition::new("name", DbType::String).size(50)],
        );
        reconcile(&mut td, &live());
        assert_eq!(td.column("name").unwrap().size, Some(50));
    }

    #[test]
    fn test_reconcile_unknown_table_is_noop() {
        let mut td = declared();
        reconcile(&mut td, &[]);
        assert!(!td.exists_in_db);
        assert!(!td.column("id").unwrap().exists_in_db);
    }
}
