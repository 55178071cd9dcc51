//! Schema migration engines.
//!
//! Two engines share the DDL surface of [`crate::database::Database`]:
//!
//! - [`auto::automatic_migration`] reconciles registered model schemas
//!   against the live catalog, creating what is missing and optionally
//!   dropping what is unknown.
//! - [`runner::migrate`] walks declared versioned migrations up or down to
//!   a target version, recording each applied version in a tracking table.

pub mod auto;
pub mod record;
pub mod runner;
pub mod version;

pub use auto::{automatic_migration, AutoMigrationReport};
pub use record::{tracking_table_definition, MigrationRecord, TRACKING_TABLE};
pub use runner::{migrate, migrate_to_latest, migrate_to_previous_version, MigrationOutcome};

use crate::database::Database;
use crate::error::OrmError;

/// One versioned, reversible schema change.
///
/// Versions order by [`version::compare`], which pads numeric segments so
/// `"2"` sorts before `"10"`. `up` and `down` run inside the runner's
/// transaction together with the tracking-table bookkeeping.
pub trait Migration {
    /// Version label, e.g. `"3"` or `"2.1"`. Must be unique per registry.
    fn version(&self) -> &str;

    /// Human-readable label recorded in the tracking table.
    fn name(&self) -> &str;

    /// Apply the change.
    fn up(&self, db: &mut Database) -> Result<(), OrmError>;

    /// Revert the change.
    fn down(&self, db: &mut Database) -> Result<(), OrmError>;
}
