//! The versioned migration runner.
//!
//! The runner reconciles the tracking table against the declared migration
//! list: unapplied migrations above the current version and at or below the
//! target run `up`, applied migrations above the target run `down` in
//! reverse order.
//! The whole pass is one transaction; the first failure rolls everything
//! back, tracking rows included. Applied versions the registry no longer
//! declares are left alone.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::database::Database;
use crate::error::OrmError;
use crate::executor::StatementKind;
use crate::migration::auto::automatic_migration;
use crate::migration::record::{tracking_table_definition, MigrationRecord, TRACKING_TABLE};
use crate::migration::{version, Migration};
use crate::schema::registry::ModelRegistry;
use crate::value::DbValue;

/// What a migration pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    /// Versions applied, in execution order.
    pub applied: Vec<String>,
    /// Versions reverted, in execution order.
    pub reverted: Vec<String>,
}

/// Migrate to the highest declared version.
pub fn migrate_to_latest(
    db: &mut Database,
    registry: &ModelRegistry,
) -> Result<MigrationOutcome, OrmError> {
    migrate(db, registry, None)
}

/// Migrate up or down to `target`, or to the latest declared version when
/// `None`.
///
/// When `enable_automatic_migration` is set, the automatic schema
/// reconciliation runs over the registry's models first.
///
/// # Errors
///
/// Fails when `target` names no declared migration, when two declared
/// migrations share a version, or when a migration or tracking statement
/// fails (after rolling the pass back).
pub fn migrate(
    db: &mut Database,
    registry: &ModelRegistry,
    target: Option<&str>,
) -> Result<MigrationOutcome, OrmError> {
    if db.config().enable_automatic_migration {
        automatic_migration(db, registry)?;
    }
    let known = sorted_migrations(registry)?;
    ensure_tracking_table(db)?;
    let applied = load_applied(db)?;

    let upto = match target {
        None => known.len(),
        Some(target) => {
            known
                .iter()
                .position(|m| m.version() == target)
                .ok_or_else(|| {
                    OrmError::NotFound(format!("declared migration with version '{target}'"))
                })?
                + 1
        }
    };
    run_plan(db, &known, &applied, upto)
}

/// Revert the most recently applied migration.
///
/// Returns the reverted version, or `None` when fewer than two migrations
/// are applied or declared, or when the applied history does not line up
/// with the declared list (the mismatch is logged, not raised).
pub fn migrate_to_previous_version(
    db: &mut Database,
    registry: &ModelRegistry,
) -> Result<Option<String>, OrmError> {
    let known = sorted_migrations(registry)?;
    ensure_tracking_table(db)?;
    let applied = load_applied(db)?;

    // Stepping back needs somewhere to step back to: at least two applied
    // versions and at least two declared ones.
    if applied.len() < 2 || known.len() < 2 {
        return Ok(None);
    }
    let last = &applied[applied.len() - 1];
    let Some(position) = known.iter().position(|m| m.version() == last.version) else {
        log::warn!(
            "applied migration '{}' is not declared; refusing to step back",
            last.version
        );
        return Ok(None);
    };
    // The step below the last applied version must agree with the declared
    // list, otherwise stepping back would land on a version the database
    // never saw.
    let history_matches =
        position > 0 && known[position - 1].version() == applied[applied.len() - 2].version;
    if !history_matches {
        log::warn!(
            "applied history does not match declared migrations around '{}'; refusing to step back",
            last.version
        );
        return Ok(None);
    }

    let outcome = run_plan(db, &known, &applied, position)?;
    Ok(outcome.reverted.into_iter().next())
}

fn sorted_migrations(registry: &ModelRegistry) -> Result<Vec<&dyn Migration>, OrmError> {
    let mut known: Vec<&dyn Migration> =
        registry.migrations().iter().map(|m| m.as_ref()).collect();
    known.sort_by(|a, b| version::compare(a.version(), b.version()));
    for pair in known.windows(2) {
        if pair[0].version() == pair[1].version() {
            return Err(OrmError::ConstraintViolation(format!(
                "two migrations declare version '{}'",
                pair[0].version()
            )));
        }
    }
    Ok(known)
}

fn ensure_tracking_table(db: &mut Database) -> Result<(), OrmError> {
    if !db.table_exists(TRACKING_TABLE)? {
        db.create_table_from(&tracking_table_definition())?;
    }
    Ok(())
}

fn load_applied(db: &mut Database) -> Result<Vec<MigrationRecord>, OrmError> {
    let dialect = db.dialect();
    let sql = format!(
        "SELECT {}, {}, {} FROM {}",
        dialect.quote("version"),
        dialect.quote("name"),
        dialect.quote("applied_at"),
        dialect.quote(TRACKING_TABLE)
    );
    let rows = db.fetch(&sql, &[])?;
    let mut applied = rows
        .iter()
        .map(MigrationRecord::from_row)
        .collect::<Result<Vec<_>, OrmError>>()?;
    applied.sort_by(|a, b| version::compare(&a.version, &b.version));
    Ok(applied)
}

fn run_plan(
    db: &mut Database,
    known: &[&dyn Migration],
    applied: &[MigrationRecord],
    upto: usize,
) -> Result<MigrationOutcome, OrmError> {
    let applied_versions: HashSet<&str> = applied.iter().map(|r| r.version.as_str()).collect();

    // `applied` is sorted, so its last entry is the database's current
    // version. Versions sorting at or below it never apply on the way up:
    // a version skipped in the past stays skipped.
    let current = applied.last().map(|r| r.version.as_str());
    let to_apply: Vec<&dyn Migration> = known[..upto]
        .iter()
        .filter(|m| !applied_versions.contains(m.version()))
        .filter(|m| match current {
            Some(current) => version::compare(m.version(), current) == Ordering::Greater,
            None => true,
        })
        .copied()
        .collect();
    let to_revert: Vec<&dyn Migration> = known[upto..]
        .iter()
        .rev()
        .filter(|m| applied_versions.contains(m.version()))
        .copied()
        .collect();
    for record in applied {
        if !known.iter().any(|m| m.version() == record.version) {
            log::warn!(
                "applied version '{}' is no longer declared; leaving it in place",
                record.version
            );
        }
    }

    let mut outcome = MigrationOutcome::default();
    if to_apply.is_empty() && to_revert.is_empty() {
        return Ok(outcome);
    }

    let own_txn = !db.in_transaction();
    if own_txn {
        db.begin()?;
    }
    let result = (|| -> Result<(), OrmError> {
        for migration in &to_revert {
            log::info!("reverting migration {} '{}'", migration.version(), migration.name());
            migration.down(db)?;
            delete_record(db, migration.version())?;
            outcome.reverted.push(migration.version().to_string());
        }
        for migration in &to_apply {
            log::info!("applying migration {} '{}'", migration.version(), migration.name());
            migration.up(db)?;
            insert_record(db, migration.version(), migration.name())?;
            outcome.applied.push(migration.version().to_string());
        }
        Ok(())
    })();
    match result {
        Ok(()) => {
            if own_txn {
                db.commit()?;
            }
            let caches = db.caches();
            caches.schema.invalidate(db.identity());
            caches.results.invalidate_all();
            Ok(outcome)
        }
        Err(err) => {
            if own_txn {
                let _ = db.rollback();
            }
            Err(err)
        }
    }
}

fn insert_record(db: &mut Database, version: &str, name: &str) -> Result<(), OrmError> {
    let dialect = db.dialect();
    let sql = format!(
        "INSERT INTO {} ({}, {}, {}) VALUES ({}, {}, {})",
        dialect.quote(TRACKING_TABLE),
        dialect.quote("version"),
        dialect.quote("name"),
        dialect.quote("applied_at"),
        dialect.placeholder(0),
        dialect.placeholder(1),
        dialect.placeholder(2)
    );
    db.run(
        &sql,
        &[
            DbValue::String(Some(version.to_string())),
            DbValue::String(Some(name.to_string())),
            DbValue::DateTime(Some(chrono::Utc::now())),
        ],
        StatementKind::Mutation,
    )?;
    Ok(())
}

fn delete_record(db: &mut Database, version: &str) -> Result<(), OrmError> {
    let dialect = db.dialect();
    let sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        dialect.quote(TRACKING_TABLE),
        dialect.quote("version"),
        dialect.placeholder(0)
    );
    db.run(
        &sql,
        &[DbValue::String(Some(version.to_string()))],
        StatementKind::Mutation,
    )?;
    Ok(())
}
