//! Automatic schema reconciliation.
//!
//! Compares every registered model schema against the live database and
//! issues the DDL needed to close the gap, within what configuration
//! allows: create missing tables, add missing columns, and optionally drop
//! tables and columns the models no longer declare. Column type or size
//! drift is never reconciled. The tracking table of the versioned runner is
//! always left alone.
//!
//! Each action is best-effort: a failed statement is logged and the pass
//! continues, so one bad table does not block the rest of the schema.

use std::collections::HashSet;

use crate::database::Database;
use crate::error::OrmError;
use crate::migration::record::TRACKING_TABLE;
use crate::schema::registry::ModelRegistry;

/// Counts of DDL statements issued by one reconciliation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AutoMigrationReport {
    pub tables_created: usize,
    pub columns_added: usize,
    pub tables_dropped: usize,
    pub columns_dropped: usize,
}

impl AutoMigrationReport {
    /// Whether the pass issued any DDL at all.
    pub fn changed(&self) -> bool {
        self.tables_created + self.columns_added + self.tables_dropped + self.columns_dropped > 0
    }
}

/// Reconcile all registered model schemas against the live database.
///
/// # Errors
///
/// Fails only when the existence probes themselves fail; individual DDL
/// failures are logged and skipped.
pub fn automatic_migration(
    db: &mut Database,
    registry: &ModelRegistry,
) -> Result<AutoMigrationReport, OrmError> {
    db.ensure_catalog()?;
    let config = db.config().clone();
    let mut report = AutoMigrationReport::default();

    for entry in registry.models() {
        let schema = entry.schema.clone();
        if schema.table_name == TRACKING_TABLE {
            continue;
        }
        if !db.table_exists(&schema.table_name)? {
            if !config.allow_create_table {
                log::debug!(
                    "table '{}' is missing but table creation is disabled",
                    schema.table_name
                );
                continue;
            }
            match db.create_table_from(&schema) {
                Ok(()) => report.tables_created += 1,
                Err(err) => log::warn!("creating table '{}' failed: {err}", schema.table_name),
            }
            continue;
        }
        for column in schema.mapped_columns() {
            if db.column_exists(&schema.table_name, &column.name)? {
                continue;
            }
            if !config.allow_create_column {
                log::debug!(
                    "column '{}.{}' is missing but column creation is disabled",
                    schema.table_name,
                    column.name
                );
                continue;
            }
            match db.add_column(&schema.table_name, column) {
                Ok(()) => report.columns_added += 1,
                Err(err) => log::warn!(
                    "adding column '{}.{}' failed: {err}",
                    schema.table_name,
                    column.name
                ),
            }
        }
        if config.allow_update_column {
            // Type and size drift is out of scope; the flag is recognized so
            // configurations carrying it still load.
            log::debug!(
                "allow_update_column is set but column alteration is unsupported; '{}' left as-is",
                schema.table_name
            );
        }
    }

    if config.allow_drop_table || config.allow_drop_column {
        reconcile_drops(db, registry, &config, &mut report)?;
    }

    if report.changed() {
        let caches = db.caches();
        caches.schema.invalidate(db.identity());
        caches.results.invalidate_all();
        log::info!(
            "automatic migration: {} tables created, {} columns added, {} tables dropped, {} columns dropped",
            report.tables_created,
            report.columns_added,
            report.tables_dropped,
            report.columns_dropped
        );
    }
    Ok(report)
}

/// Drop database objects no registered model declares. Runs only off the
/// introspected catalog; without one there is nothing safe to drop.
fn reconcile_drops(
    db: &mut Database,
    registry: &ModelRegistry,
    config: &crate::config::OrmConfig,
    report: &mut AutoMigrationReport,
) -> Result<(), OrmError> {
    let Some(catalog) = db.caches().schema.catalog(db.identity()) else {
        log::debug!("no introspected catalog; skipping drop reconciliation");
        return Ok(());
    };

    let declared_tables: HashSet<String> = registry
        .models()
        .iter()
        .map(|e| e.schema.table_name.to_ascii_lowercase())
        .collect();

    for live in catalog.iter() {
        let live_name = live.table_name.to_ascii_lowercase();
        if live_name == TRACKING_TABLE {
            continue;
        }
        if !declared_tables.contains(&live_name) {
            if config.allow_drop_table {
                match db.drop_table_named(&live.table_name) {
                    Ok(()) => report.tables_dropped += 1,
                    Err(err) => log::warn!("dropping table '{}' failed: {err}", live.table_name),
                }
            }
            continue;
        }
        if !config.allow_drop_column {
            continue;
        }
        let Some(entry) = registry
            .models()
            .iter()
            .find(|e| e.schema.table_name.eq_ignore_ascii_case(&live.table_name))
        else {
            continue;
        };
        for live_column in live.mapped_columns() {
            let declared = entry
                .schema
                .mapped_columns()
                .any(|c| c.name.eq_ignore_ascii_case(&live_column.name));
            if declared {
                continue;
            }
            match db.drop_column(&live.table_name, &live_column.name) {
                Ok(()) => report.columns_dropped += 1,
                Err(err) => log::warn!(
                    "dropping column '{}.{}' failed: {err}",
                    live.table_name,
                    live_column.name
                ),
            }
        }
    }
    Ok(())
}
