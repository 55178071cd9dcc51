//! Explicit model and migration registration.
//!
//! The registry is built once at startup and handed to the migration
//! engines by reference. It replaces convention-based discovery: a model is
//! known exactly when `register::<M>()` ran for it, and a versioned
//! migration is known exactly when it was added here.

use std::any::TypeId;

use crate::migration::Migration;
use crate::model::Model;
use crate::schema::table::TableDefinition;

/// One registered model type.
pub struct ModelEntry {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub schema: TableDefinition,
}

/// Type-keyed registry of known models and declared versioned migrations.
#[derive(Default)]
pub struct ModelRegistry {
    models: Vec<ModelEntry>,
    migrations: Vec<Box<dyn Migration>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model type. Re-registering the same type is a no-op so
    /// startup paths can be run twice safely.
    pub fn register<M: Model + 'static>(&mut self) {
        let type_id = TypeId::of::<M>();
        if self.models.iter().any(|e| e.type_id == type_id) {
            return;
        }
        self.models.push(ModelEntry {
            type_id,
            type_name: std::any::type_name::<M>(),
            schema: M::schema(),
        });
    }

    /// Declare a versioned migration.
    pub fn add_migration(&mut self, migration: Box<dyn Migration>) {
        self.migrations.push(migration);
    }

    /// All registered models, in registration order.
    pub fn models(&self) -> &[ModelEntry] {
        &self.models
    }

    /// All declared migrations, in declaration order (the runner sorts by
    /// version before use).
    pub fn migrations(&self) -> &[Box<dyn Migration>] {
        &self.migrations
    }
}
