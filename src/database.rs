//! Connection context.
//!
//! A [`Database`] binds together everything one logical connection needs:
//! the executor collaborator, the dialect chosen at construction, the
//! engine configuration, the shared cache services, and local transaction
//! state. All query-builder and migration operations take a `&mut Database`.

use std::sync::Arc;

use crate::cache::ResultCache;
use crate::config::OrmConfig;
use crate::dialect::Dialect;
use crate::error::OrmError;
use crate::executor::{SqlExecutor, StatementKind};
use crate::row::Row;
use crate::schema::catalog::{CatalogReflector, SchemaCache};
use crate::value::DbValue;

/// Cache services shared across connections of one application.
#[derive(Default)]
pub struct CacheSet {
    pub schema: SchemaCache,
    pub results: ResultCache,
}

impl CacheSet {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One logical database connection plus its engine context.
pub struct Database {
    identity: String,
    executor: Box<dyn SqlExecutor>,
    dialect: Arc<dyn Dialect>,
    config: OrmConfig,
    caches: Arc<CacheSet>,
    reflector: Option<Box<dyn CatalogReflector>>,
    in_transaction: bool,
}

impl Database {
    /// Bind an executor to a dialect and shared caches. `identity` keys the
    /// schema cache; two connections to the same database should share it.
    pub fn new(
        identity: impl Into<String>,
        executor: Box<dyn SqlExecutor>,
        dialect: Arc<dyn Dialect>,
        config: OrmConfig,
        caches: Arc<CacheSet>,
    ) -> Self {
        Self {
            identity: identity.into(),
            executor,
            dialect,
            config,
            caches,
            reflector: None,
            in_transaction: false,
        }
    }

    /// Attach the catalog-introspection collaborator.
    pub fn with_reflector(mut self, reflector: Box<dyn CatalogReflector>) -> Self {
        self.reflector = Some(reflector);
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn dialect(&self) -> Arc<dyn Dialect> {
        Arc::clone(&self.dialect)
    }

    pub fn config(&self) -> &OrmConfig {
        &self.config
    }

    pub fn caches(&self) -> Arc<CacheSet> {
        Arc::clone(&self.caches)
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Open a transaction. Nested transactions are disallowed; beginning
    /// one while another is open fails immediately.
    pub fn begin(&mut self) -> Result<(), OrmError> {
        if self.in_transaction {
            return Err(OrmError::TransactionState(
                "a transaction is already open on this connection".to_string(),
            ));
        }
        self.executor.begin()?;
        self.in_transaction = true;
        Ok(())
    }

    pub fn commit(&mut self) -> Result<(), OrmError> {
        if !self.in_transaction {
            return Err(OrmError::TransactionState(
                "commit with no open transaction".to_string(),
            ));
        }
        self.executor.commit()?;
        self.in_transaction = false;
        Ok(())
    }

    pub fn rollback(&mut self) -> Result<(), OrmError> {
        if !self.in_transaction {
            return Err(OrmError::TransactionState(
                "rollback with no open transaction".to_string(),
            ));
        }
        self.executor.rollback()?;
        self.in_transaction = false;
        Ok(())
    }

    /// Run a non-returning statement through the executor.
    pub(crate) fn run(
        &mut self,
        sql: &str,
        params: &[DbValue],
        kind: StatementKind,
    ) -> Result<u64, OrmError> {
        if self.config.print_sql_queries {
            log::debug!("sql [{}] {sql} {params:?}", self.dialect.name());
        }
        self.executor.execute(sql, params, kind)
    }

    /// Run a row-returning statement through the executor.
    pub(crate) fn fetch(&mut self, sql: &str, params: &[DbValue]) -> Result<Vec<Row>, OrmError> {
        if self.config.print_sql_queries {
            log::debug!("sql [{}] {sql} {params:?}", self.dialect.name());
        }
        self.executor.query(sql, params)
    }

    /// Introspect and cache the live catalog for this identity if absent.
    ///
    /// Single-loader: when another caller holds the load flag for this
    /// identity, this returns immediately and the caller proceeds with an
    /// absent catalog rather than blocking.
    pub(crate) fn ensure_catalog(&mut self) -> Result<(), OrmError> {
        if !self.config.use_database_schema {
            return Ok(());
        }
        if self.caches.schema.has_catalog(&self.identity) {
            return Ok(());
        }
        let Some(reflector) = self.reflector.as_mut() else {
            return Ok(());
        };
        if !self.caches.schema.try_begin_load(&self.identity) {
            return Ok(());
        }
        let result = reflector.introspect(self.executor.as_mut());
        self.caches.schema.end_load(&self.identity);
        let tables = result?;
        self.caches.schema.set_catalog(&self.identity, tables);
        Ok(())
    }
}
