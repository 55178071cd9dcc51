//! Live-catalog caching.
//!
//! [`SchemaCache`] is an explicit cache service, owned by the application
//! and shared by `Arc` between connections with the same identity. It holds
//! two layers: the raw catalog returned by introspection, and reconciled
//! per-model [`TableDefinition`]s memoized on top of it. DDL invalidates
//! both layers for the affected identity.
//!
//! Catalog population is single-loader per identity: while one caller is
//! introspecting, a second caller for the same identity proceeds with an
//! absent cache instead of blocking. Correctness is re-established by the
//! next explicit invalidation.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::error::OrmError;
use crate::executor::SqlExecutor;
use crate::schema::table::TableDefinition;

/// Introspects the live database schema. External collaborator: one
/// implementation per backend, built on the backend's information-schema
/// equivalent (tables, columns, types, sizes, precision/scale, nullability,
/// identity flag, uniqueness, defaults).
pub trait CatalogReflector {
    fn introspect(
        &mut self,
        executor: &mut dyn SqlExecutor,
    ) -> Result<Vec<TableDefinition>, OrmError>;
}

#[derive(Default)]
struct SchemaCacheInner {
    /// connection identity -> introspected catalog
    catalogs: HashMap<String, Arc<Vec<TableDefinition>>>,
    /// (connection identity, model type) -> reconciled definition
    tables: HashMap<(String, TypeId), Arc<TableDefinition>>,
}

/// Process-wide schema cache, keyed by connection identity.
#[derive(Default)]
pub struct SchemaCache {
    inner: Mutex<SchemaCacheInner>,
    /// Identities with an introspection pass in flight.
    loading: Mutex<HashSet<String>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached catalog for an identity, if one has been introspected.
    pub fn catalog(&self, identity: &str) -> Option<Arc<Vec<TableDefinition>>> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.catalogs.get(identity).cloned())
    }

    pub fn has_catalog(&self, identity: &str) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.catalogs.contains_key(identity))
            .unwrap_or(false)
    }

    /// Store a freshly introspected catalog.
    pub fn set_catalog(&self, identity: &str, tables: Vec<TableDefinition>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.catalogs.insert(identity.to_string(), Arc::new(tables));
        }
    }

    /// Claim the single-loader flag for an identity. Returns false when
    /// another caller is already introspecting; that caller must not wait.
    pub fn try_begin_load(&self, identity: &str) -> bool {
        match self.loading.lock() {
            Ok(mut loading) => loading.insert(identity.to_string()),
            Err(_) => false,
        }
    }

    /// Release the single-loader flag.
    pub fn end_load(&self, identity: &str) {
        if let Ok(mut loading) = self.loading.lock() {
            loading.remove(identity);
        }
    }

    /// Memoized reconciled definition for a model type.
    pub fn table_definition(&self, identity: &str, type_id: TypeId) -> Option<Arc<TableDefinition>> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.tables.get(&(identity.to_string(), type_id)).cloned())
    }

    /// Memoize a reconciled definition.
    pub fn store_table_definition(
        &self,
        identity: &str,
        type_id: TypeId,
        definition: Arc<TableDefinition>,
    ) {
        if let Ok(mut inner) = self.inner.lock() {
            inner
                .tables
                .insert((identity.to_string(), type_id), definition);
        }
    }

    /// Drop the catalog and every memoized definition for one identity.
    /// Called after any DDL on that connection.
    pub fn invalidate(&self, identity: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.catalogs.remove(identity);
            inner.tables.retain(|(id, _), _| id != identity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::column::ColumnDefinition;
    use crate::value::DbType;

    fn catalog_table(name: &str) -> TableDefinition {
        TableDefinition::new(name, vec![ColumnDefinition::new("id", DbType::Int64)])
    }

    #[test]
    fn test_catalog_round_trip_and_invalidate() {
        let cache = SchemaCache::new();
        assert!(!cache.has_catalog("a"));
        cache.set_catalog("a", vec![catalog_table("users")]);
        assert!(cache.has_catalog("a"));
        assert_eq!(cache.catalog("a").unwrap().len(), 1);

        cache.invalidate("a");
        assert!(!cache.has_catalog("a"));
    }

    #[test]
    fn test_single_loader_flag() {
        let cache = SchemaCache::new();
        assert!(cache.try_begin_load("a"));
        // A concurrent caller for the same identity does not get the flag.
        assert!(!cache.try_begin_load("a"));
        // A different identity is unaffected.
        assert!(cache.try_begin_load("b"));
        cache.end_load("a");
        assert!(cache.try_begin_load("a"));
    }

    #[test]
    fn test_table_memoization_scoped_by_identity() {
        struct Marker;
        let cache = SchemaCache::new();
        let type_id = TypeId::of::<Marker>();
        cache.store_table_definition("a", type_id, Arc::new(catalog_table("users")));
        assert!(cache.table_definition("a", type_id).is_some());
        assert!(cache.table_definition("b", type_id).is_none());

        cache.invalidate("a");
        assert!(cache.table_definition("a", type_id).is_none());
    }
}
