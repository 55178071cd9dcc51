//! In-process result cache.
//!
//! Caches materialization-ready rows keyed by table plus compiled statement
//! text plus parameter fingerprint. Because predicate compilation is
//! deterministic, an identical (predicate, schema) pair always produces the
//! same key. Any mutation through the query builder invalidates the
//! affected table's entries; raw SQL passthrough and migration runs
//! invalidate everything, since their effect cannot be analyzed.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::row::Row;
use crate::value::DbValue;

struct CachedResult {
    table: String,
    rows: Vec<Row>,
}

/// Process-wide SELECT result cache.
#[derive(Default)]
pub struct ResultCache {
    inner: Mutex<HashMap<String, CachedResult>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for a compiled statement against one table.
    pub fn key(table: &str, sql: &str, params: &[DbValue]) -> String {
        let mut key = String::with_capacity(table.len() + sql.len() + 16 * params.len());
        key.push_str(table);
        key.push('\n');
        key.push_str(sql);
        for p in params {
            key.push('\n');
            key.push_str(&p.key_string());
        }
        key
    }

    pub fn get(&self, key: &str) -> Option<Vec<Row>> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.get(key).map(|c| c.rows.clone()))
    }

    pub fn put(&self, table: &str, key: String, rows: Vec<Row>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.insert(
                key,
                CachedResult {
                    table: table.to_string(),
                    rows,
                },
            );
        }
    }

    /// Drop every entry for one table. Called on any mutation of it.
    pub fn invalidate_table(&self, table: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.retain(|_, cached| cached.table != table);
        }
    }

    /// Drop everything. Called on raw passthrough and migration runs.
    pub fn invalidate_all(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
