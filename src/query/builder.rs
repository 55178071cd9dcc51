//! The query-building surface of [`Database`].
//!
//! Every operation here composes parameterized SQL from a model's reconciled
//! table definition and the bound dialect, then hands it to the executor.
//! Mutations invalidate the affected table's result-cache entries; DDL and
//! raw passthrough invalidate more broadly because their effect cannot be
//! analyzed.

use crate::database::Database;
use crate::dialect::Dialect;
use crate::error::OrmError;
use crate::executor::StatementKind;
use crate::model::Model;
use crate::predicate::{col, compile, Predicate};
use crate::query::{OrderBy, SortDirection};
use crate::row::Row;
use crate::schema::builder::table_definition;
use crate::schema::column::ColumnDefinition;
use crate::schema::table::TableDefinition;
use crate::value::DbValue;

impl Database {
    // ---- probes ----

    /// Whether a table of this name exists in the live database.
    pub fn table_exists(&mut self, table: &str) -> Result<bool, OrmError> {
        let sql = self.dialect().table_exists_sql();
        let rows = self.fetch(sql, &[DbValue::String(Some(table.to_string()))])?;
        Ok(!rows.is_empty())
    }

    /// Whether a temporary table of this name exists on this connection.
    pub fn temporary_table_exists(&mut self, table: &str) -> Result<bool, OrmError> {
        let sql = self.dialect().temporary_table_exists_sql();
        let rows = self.fetch(sql, &[DbValue::String(Some(table.to_string()))])?;
        Ok(!rows.is_empty())
    }

    /// Whether the named column exists on the named table.
    pub fn column_exists(&mut self, table: &str, column: &str) -> Result<bool, OrmError> {
        let sql = self.dialect().column_exists_sql();
        let rows = self.fetch(
            sql,
            &[
                DbValue::String(Some(table.to_string())),
                DbValue::String(Some(column.to_string())),
            ],
        )?;
        Ok(!rows.is_empty())
    }

    // ---- DDL ----

    /// Create the model's table if it does not exist yet. Returns whether a
    /// CREATE TABLE was issued.
    pub fn create_table<M: Model + 'static>(&mut self) -> Result<bool, OrmError> {
        let definition = table_definition::<M>(self)?;
        if self.table_exists(&definition.table_name)? {
            return Ok(false);
        }
        self.create_table_from(&definition)?;
        Ok(true)
    }

    /// Issue a CREATE TABLE for the given definition, unconditionally.
    pub fn create_table_from(&mut self, definition: &TableDefinition) -> Result<(), OrmError> {
        let dialect = self.dialect();
        let single_pk = definition.primary_keys_count() == 1;
        let mut parts: Vec<String> = definition
            .columns
            .iter()
            .filter(|c| c.is_mapped())
            .map(|c| column_ddl(c, dialect.as_ref(), single_pk))
            .collect();
        if definition.primary_keys_count() > 1 {
            let keys: Vec<String> = definition
                .primary_keys()
                .map(|c| dialect.quote(&c.name))
                .collect();
            parts.push(format!(
                "CONSTRAINT {} PRIMARY KEY ({})",
                dialect.quote(&format!("PK_{}", definition.table_name)),
                keys.join(", ")
            ));
        }
        let sql = format!(
            "CREATE TABLE {} ({})",
            dialect.quote(&definition.table_name),
            parts.join(", ")
        );
        self.run(&sql, &[], StatementKind::Ddl)?;
        self.invalidate_after_ddl();
        Ok(())
    }

    /// Drop the model's table.
    pub fn drop_table<M: Model + 'static>(&mut self) -> Result<(), OrmError> {
        let definition = table_definition::<M>(self)?;
        self.drop_table_named(&definition.table_name)
    }

    /// Drop a table by name.
    pub fn drop_table_named(&mut self, table: &str) -> Result<(), OrmError> {
        let sql = format!("DROP TABLE {}", self.dialect().quote(table));
        self.run(&sql, &[], StatementKind::Ddl)?;
        self.invalidate_after_ddl();
        Ok(())
    }

    /// Remove all rows from the model's table without dropping it.
    pub fn truncate_table<M: Model + 'static>(&mut self) -> Result<(), OrmError> {
        let definition = table_definition::<M>(self)?;
        let sql = format!(
            "TRUNCATE TABLE {}",
            self.dialect().quote(&definition.table_name)
        );
        self.run(&sql, &[], StatementKind::Ddl)?;
        self.caches().results.invalidate_table(&definition.table_name);
        Ok(())
    }

    /// Add a column to an existing table.
    pub fn add_column(&mut self, table: &str, column: &ColumnDefinition) -> Result<(), OrmError> {
        let dialect = self.dialect();
        let sql = format!(
            "ALTER TABLE {} ADD {}",
            dialect.quote(table),
            column_ddl(column, dialect.as_ref(), false)
        );
        self.run(&sql, &[], StatementKind::Ddl)?;
        self.invalidate_after_ddl();
        Ok(())
    }

    /// Drop a column from an existing table.
    pub fn drop_column(&mut self, table: &str, column: &str) -> Result<(), OrmError> {
        let dialect = self.dialect();
        let sql = format!(
            "ALTER TABLE {} DROP COLUMN {}",
            dialect.quote(table),
            dialect.quote(column)
        );
        self.run(&sql, &[], StatementKind::Ddl)?;
        self.invalidate_after_ddl();
        Ok(())
    }

    // ---- insert ----

    /// Insert one model. Returns the generated key when the table declares
    /// an auto-increment column, `None` otherwise.
    pub fn insert<M: Model + 'static>(&mut self, model: &M) -> Result<Option<i64>, OrmError> {
        let definition = table_definition::<M>(self)?;
        let (sql, params) = self.insert_statement(&definition, std::slice::from_ref(model));
        self.run(&sql, &params, StatementKind::Mutation)?;
        self.caches().results.invalidate_table(&definition.table_name);
        if definition.auto_increment_column().is_none() {
            return Ok(None);
        }
        let key_sql = self.dialect().generated_key_sql();
        let rows = self.fetch(key_sql, &[])?;
        Ok(generated_key(&rows))
    }

    /// Insert a batch of models.
    ///
    /// The standard path chunks the batch into multi-row VALUES statements
    /// sized to the dialect's parameter limit, inside one transaction. If
    /// that path fails and fallback is enabled, the batch is retried one
    /// statement per row; the per-row path also serves dialects without
    /// multi-row VALUES. Returns the number of rows inserted.
    pub fn insert_list<M: Model + 'static>(&mut self, models: &[M]) -> Result<u64, OrmError> {
        if models.is_empty() {
            return Ok(0);
        }
        let definition = table_definition::<M>(self)?;
        let dialect = self.dialect();
        let chunked = self.config().list_insert_allow_bulk && dialect.supports_bulk_insert();
        let fallback = self.config().list_insert_fallback_to_chunks;

        if chunked {
            // Falling back is only safe when the chunked attempt ran in its
            // own transaction and was rolled back whole.
            let can_fall_back = fallback && !self.in_transaction();
            match self.insert_chunked(&definition, models) {
                Ok(affected) => {
                    self.caches().results.invalidate_table(&definition.table_name);
                    return Ok(affected);
                }
                Err(err) if can_fall_back => {
                    log::warn!(
                        "chunked insert into '{}' failed, retrying row-by-row: {err}",
                        definition.table_name
                    );
                }
                Err(err) => return Err(err),
            }
        }

        let own_txn = !self.in_transaction();
        if own_txn {
            self.begin()?;
        }
        let mut affected = 0u64;
        for model in models {
            let (sql, params) = self.insert_statement(&definition, std::slice::from_ref(model));
            match self.run(&sql, &params, StatementKind::Mutation) {
                Ok(n) => affected += n,
                Err(err) => {
                    if own_txn {
                        let _ = self.rollback();
                    }
                    return Err(err);
                }
            }
        }
        if own_txn {
            self.commit()?;
        }
        self.caches().results.invalidate_table(&definition.table_name);
        Ok(affected)
    }

    fn insert_chunked<M: Model>(
        &mut self,
        definition: &TableDefinition,
        models: &[M],
    ) -> Result<u64, OrmError> {
        let dialect = self.dialect();
        let columns: Vec<&ColumnDefinition> = definition
            .columns
            .iter()
            .filter(|c| c.is_mapped() && !c.is_auto_increment)
            .collect();
        let params_per_row = columns.len().max(1);
        let rows_per_statement = (dialect.max_statement_params() / params_per_row).max(1);

        let own_txn = !self.in_transaction();
        if own_txn {
            self.begin()?;
        }
        let mut affected = 0u64;
        for chunk in models.chunks(rows_per_statement) {
            let (sql, params) = self.insert_statement(definition, chunk);
            match self.run(&sql, &params, StatementKind::Mutation) {
                Ok(n) => affected += n,
                Err(err) => {
                    if own_txn {
                        let _ = self.rollback();
                    }
                    return Err(err);
                }
            }
        }
        if own_txn {
            self.commit()?;
        }
        Ok(affected)
    }

    /// Compose one INSERT over the given rows. Auto-increment columns are
    /// never in the column list.
    fn insert_statement<M: Model>(
        &self,
        definition: &TableDefinition,
        models: &[M],
    ) -> (String, Vec<DbValue>) {
        let dialect = self.dialect();
        let columns: Vec<&ColumnDefinition> = definition
            .columns
            .iter()
            .filter(|c| c.is_mapped() && !c.is_auto_increment)
            .collect();
        let names: Vec<String> = columns.iter().map(|c| dialect.quote(&c.name)).collect();

        let mut params = Vec::with_capacity(columns.len() * models.len());
        let mut groups = Vec::with_capacity(models.len());
        for model in models {
            let mut placeholders = Vec::with_capacity(columns.len());
            for column in &columns {
                placeholders.push(dialect.placeholder(params.len()));
                params.push(model.value_of(&column.name));
            }
            groups.push(format!("({})", placeholders.join(", ")));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            dialect.quote(&definition.table_name),
            names.join(", "),
            groups.join(", ")
        );
        (sql, params)
    }

    // ---- select ----

    /// All rows matching the predicate, or the whole table when `None`.
    pub fn select<M: Model + 'static>(
        &mut self,
        predicate: Option<Predicate>,
    ) -> Result<Vec<M>, OrmError> {
        self.select_rows(predicate.as_ref(), None, None)
    }

    /// A page of matching rows.
    pub fn select_limit<M: Model + 'static>(
        &mut self,
        predicate: Option<Predicate>,
        order: Option<OrderBy>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<M>, OrmError> {
        self.select_rows(predicate.as_ref(), order.as_ref(), Some((offset, limit)))
    }

    /// The matching row that sorts first by primary key.
    pub fn select_first<M: Model + 'static>(
        &mut self,
        predicate: Option<Predicate>,
    ) -> Result<Option<M>, OrmError> {
        let order = self.key_order::<M>(SortDirection::Asc)?;
        let mut found = self.select_rows(predicate.as_ref(), Some(&order), Some((0, 1)))?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.remove(0))
        })
    }

    /// The matching row that sorts last by primary key.
    pub fn select_last<M: Model + 'static>(
        &mut self,
        predicate: Option<Predicate>,
    ) -> Result<Option<M>, OrmError> {
        let order = self.key_order::<M>(SortDirection::Desc)?;
        let mut found = self.select_rows(predicate.as_ref(), Some(&order), Some((0, 1)))?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.remove(0))
        })
    }

    /// The row whose primary key equals `id`. Requires a declared primary
    /// key; binds the first key column of composite keys.
    pub fn select_by_id<M: Model + 'static, V: Into<DbValue>>(
        &mut self,
        id: V,
    ) -> Result<Option<M>, OrmError> {
        let definition = table_definition::<M>(self)?;
        let Some(key) = definition.primary_keys().next() else {
            return Err(OrmError::NotFound(format!(
                "table '{}' declares no primary key",
                definition.table_name
            )));
        };
        let predicate = col(key.name.clone()).eq(id.into());
        let mut found: Vec<M> = self.select_rows(Some(&predicate), None, None)?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.remove(0))
        })
    }

    /// Count of matching rows.
    pub fn count<M: Model + 'static>(
        &mut self,
        predicate: Option<Predicate>,
    ) -> Result<u64, OrmError> {
        let definition = table_definition::<M>(self)?;
        let dialect = self.dialect();
        let mut sql = format!(
            "SELECT COUNT(*) FROM {}",
            dialect.quote(&definition.table_name)
        );
        let mut params = Vec::new();
        if let Some(predicate) = predicate.as_ref() {
            let compiled = compile(predicate, &definition, dialect.as_ref())?;
            sql.push_str(" WHERE ");
            sql.push_str(&compiled.text);
            params = compiled.params;
        }
        let rows = self.fetch(&sql, &params)?;
        match rows.first().and_then(|r| r.get_at(0)) {
            Some(DbValue::Int64(Some(n))) => Ok(*n as u64),
            Some(DbValue::Int32(Some(n))) => Ok(*n as u64),
            _ => Err(OrmError::Execution(format!(
                "COUNT over '{}' returned no numeric value",
                definition.table_name
            ))),
        }
    }

    /// Whether any row matches the predicate, or whether the table is
    /// non-empty when `None`.
    pub fn exists<M: Model + 'static>(
        &mut self,
        predicate: Option<Predicate>,
    ) -> Result<bool, OrmError> {
        let definition = table_definition::<M>(self)?;
        let dialect = self.dialect();
        let mut inner = format!("SELECT 1 FROM {}", dialect.quote(&definition.table_name));
        let mut params = Vec::new();
        if let Some(predicate) = predicate.as_ref() {
            let compiled = compile(predicate, &definition, dialect.as_ref())?;
            inner.push_str(" WHERE ");
            inner.push_str(&compiled.text);
            params = compiled.params;
        }
        let sql = format!("SELECT CASE WHEN EXISTS ({inner}) THEN 1 ELSE 0 END");
        let rows = self.fetch(&sql, &params)?;
        match rows.first().and_then(|r| r.get_at(0)) {
            Some(DbValue::Int32(Some(n))) => Ok(*n != 0),
            Some(DbValue::Int64(Some(n))) => Ok(*n != 0),
            Some(DbValue::Bool(Some(b))) => Ok(*b),
            _ => Err(OrmError::Execution(format!(
                "existence check over '{}' returned no value",
                definition.table_name
            ))),
        }
    }

    fn select_rows<M: Model + 'static>(
        &mut self,
        predicate: Option<&Predicate>,
        order: Option<&OrderBy>,
        paging: Option<(u64, u64)>,
    ) -> Result<Vec<M>, OrmError> {
        let definition = table_definition::<M>(self)?;
        let dialect = self.dialect();

        let column_list: Vec<String> = definition
            .mapped_columns()
            .map(|c| dialect.quote(&c.name))
            .collect();
        let mut sql = format!(
            "SELECT {} FROM {}",
            column_list.join(", "),
            dialect.quote(&definition.table_name)
        );
        let mut params = Vec::new();

        if let Some(predicate) = predicate {
            let compiled = compile(predicate, &definition, dialect.as_ref())?;
            sql.push_str(" WHERE ");
            sql.push_str(&compiled.text);
            params = compiled.params;
        }

        let default_order;
        let effective_order = match order {
            Some(order) => Some(order),
            // Some backends reject paging without ORDER BY.
            None if paging.is_some() && dialect.paging_requires_order() => {
                default_order = self.key_order::<M>(SortDirection::Asc)?;
                Some(&default_order)
            }
            None => None,
        };
        if let Some(order) = effective_order {
            order.validate(&definition)?;
            sql.push_str(" ORDER BY ");
            sql.push_str(&dialect.quote(&order.column));
            sql.push_str(match order.direction {
                SortDirection::Asc => " ASC",
                SortDirection::Desc => " DESC",
            });
        }
        if let Some((offset, limit)) = paging {
            sql.push(' ');
            sql.push_str(&dialect.paging_clause(offset, limit));
        }

        let caches = self.caches();
        let cache_key = if self.config().enable_ram_cache {
            Some(crate::cache::ResultCache::key(
                &definition.table_name,
                &sql,
                &params,
            ))
        } else {
            None
        };
        let rows = match cache_key.as_ref().and_then(|key| caches.results.get(key)) {
            Some(rows) => rows,
            None => {
                let rows = self.fetch(&sql, &params)?;
                if let Some(key) = cache_key {
                    caches
                        .results
                        .put(&definition.table_name, key, rows.clone());
                }
                rows
            }
        };

        let mut models = rows
            .iter()
            .map(M::from_row)
            .collect::<Result<Vec<M>, OrmError>>()?;

        let eager = definition.relations().any(|(_, r)| r.auto_load)
            || (definition.contains_relations() && self.config().force_auto_load_nested);
        if eager && !models.is_empty() {
            M::load_relations(&mut models, self)?;
        }
        Ok(models)
    }

    /// Default ordering over the first primary key, or the first mapped
    /// column when no key is declared.
    fn key_order<M: Model + 'static>(
        &mut self,
        direction: SortDirection,
    ) -> Result<OrderBy, OrmError> {
        let definition = table_definition::<M>(self)?;
        let column = definition
            .primary_keys()
            .next()
            .or_else(|| definition.mapped_columns().next())
            .ok_or_else(|| {
                OrmError::NotFound(format!(
                    "table '{}' declares no mapped columns",
                    definition.table_name
                ))
            })?;
        Ok(OrderBy {
            column: column.name.clone(),
            direction,
        })
    }

    // ---- update / delete ----

    /// Update one model's row, matched by its full primary key. Returns the
    /// affected-row count.
    pub fn update<M: Model + 'static>(&mut self, model: &M) -> Result<u64, OrmError> {
        let definition = table_definition::<M>(self)?;
        let dialect = self.dialect();
        let keys: Vec<&ColumnDefinition> = definition.primary_keys().collect();
        if keys.is_empty() {
            return Err(OrmError::NotFound(format!(
                "table '{}' declares no primary key",
                definition.table_name
            )));
        }
        let set_columns: Vec<&ColumnDefinition> = definition
            .columns
            .iter()
            .filter(|c| c.is_mapped() && !c.is_primary_key)
            .collect();
        if set_columns.is_empty() {
            return Ok(0);
        }

        let mut params = Vec::with_capacity(set_columns.len() + keys.len());
        let mut assignments = Vec::with_capacity(set_columns.len());
        for column in &set_columns {
            assignments.push(format!(
                "{} = {}",
                dialect.quote(&column.name),
                dialect.placeholder(params.len())
            ));
            params.push(model.value_of(&column.name));
        }
        let mut conditions = Vec::with_capacity(keys.len());
        for key in &keys {
            conditions.push(format!(
                "{} = {}",
                dialect.quote(&key.name),
                dialect.placeholder(params.len())
            ));
            params.push(model.value_of(&key.name));
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            dialect.quote(&definition.table_name),
            assignments.join(", "),
            conditions.join(" AND ")
        );
        let affected = self.run(&sql, &params, StatementKind::Mutation)?;
        self.caches().results.invalidate_table(&definition.table_name);
        Ok(affected)
    }

    /// Delete one model's row, matched by its full primary key.
    pub fn delete<M: Model + 'static>(&mut self, model: &M) -> Result<u64, OrmError> {
        let definition = table_definition::<M>(self)?;
        let dialect = self.dialect();
        let keys: Vec<&ColumnDefinition> = definition.primary_keys().collect();
        if keys.is_empty() {
            return Err(OrmError::NotFound(format!(
                "table '{}' declares no primary key",
                definition.table_name
            )));
        }

        let mut params = Vec::with_capacity(keys.len());
        let mut conditions = Vec::with_capacity(keys.len());
        for key in &keys {
            conditions.push(format!(
                "{} = {}",
                dialect.quote(&key.name),
                dialect.placeholder(params.len())
            ));
            params.push(model.value_of(&key.name));
        }

        let sql = format!(
            "DELETE FROM {} WHERE {}",
            dialect.quote(&definition.table_name),
            conditions.join(" AND ")
        );
        let affected = self.run(&sql, &params, StatementKind::Mutation)?;
        self.caches().results.invalidate_table(&definition.table_name);
        Ok(affected)
    }

    /// Delete every row matching the predicate. Returns the affected-row
    /// count.
    pub fn delete_where<M: Model + 'static>(
        &mut self,
        predicate: Predicate,
    ) -> Result<u64, OrmError> {
        let definition = table_definition::<M>(self)?;
        let dialect = self.dialect();
        let compiled = compile(&predicate, &definition, dialect.as_ref())?;
        let sql = format!(
            "DELETE FROM {} WHERE {}",
            dialect.quote(&definition.table_name),
            compiled.text
        );
        let affected = self.run(&sql, &compiled.params, StatementKind::Mutation)?;
        self.caches().results.invalidate_table(&definition.table_name);
        Ok(affected)
    }

    /// Update a batch of models in one transaction. The first failure rolls
    /// the whole batch back.
    pub fn update_list<M: Model + 'static>(&mut self, models: &[M]) -> Result<u64, OrmError> {
        self.mutate_list(models, Database::update)
    }

    /// Delete a batch of models in one transaction. The first failure rolls
    /// the whole batch back.
    pub fn delete_list<M: Model + 'static>(&mut self, models: &[M]) -> Result<u64, OrmError> {
        self.mutate_list(models, Database::delete)
    }

    fn mutate_list<M: Model + 'static>(
        &mut self,
        models: &[M],
        op: fn(&mut Database, &M) -> Result<u64, OrmError>,
    ) -> Result<u64, OrmError> {
        if models.is_empty() {
            return Ok(0);
        }
        let own_txn = !self.in_transaction();
        if own_txn {
            self.begin()?;
        }
        let mut affected = 0u64;
        for model in models {
            match op(self, model) {
                Ok(n) => affected += n,
                Err(err) => {
                    if own_txn {
                        let _ = self.rollback();
                    }
                    return Err(err);
                }
            }
        }
        if own_txn {
            self.commit()?;
        }
        Ok(affected)
    }

    /// Delete every row of the model's table.
    pub fn delete_all<M: Model + 'static>(&mut self) -> Result<u64, OrmError> {
        let definition = table_definition::<M>(self)?;
        let sql = format!(
            "DELETE FROM {}",
            self.dialect().quote(&definition.table_name)
        );
        let affected = self.run(&sql, &[], StatementKind::Mutation)?;
        self.caches().results.invalidate_table(&definition.table_name);
        Ok(affected)
    }

    // ---- raw passthrough ----

    /// Run an arbitrary non-returning statement. The whole result cache is
    /// invalidated since the statement's effect cannot be analyzed.
    pub fn execute_sql(&mut self, sql: &str, params: &[DbValue]) -> Result<u64, OrmError> {
        let affected = self.run(sql, params, StatementKind::Mutation)?;
        self.caches().results.invalidate_all();
        Ok(affected)
    }

    /// Run an arbitrary row-returning statement. The whole result cache is
    /// invalidated too: a row-returning call can still mutate, procedure
    /// calls in particular.
    pub fn query_sql(&mut self, sql: &str, params: &[DbValue]) -> Result<Vec<Row>, OrmError> {
        let rows = self.fetch(sql, params)?;
        self.caches().results.invalidate_all();
        Ok(rows)
    }

    fn invalidate_after_ddl(&mut self) {
        let caches = self.caches();
        caches.schema.invalidate(self.identity());
        caches.results.invalidate_all();
    }
}

/// Render one column's DDL clause.
fn column_ddl(column: &ColumnDefinition, dialect: &dyn Dialect, inline_pk: bool) -> String {
    let mut ddl = format!(
        "{} {}",
        dialect.quote(&column.name),
        dialect.type_name(column)
    );
    if column.is_auto_increment {
        ddl.push(' ');
        ddl.push_str(dialect.auto_increment_clause());
    }
    if column.is_not_null || column.is_primary_key {
        ddl.push_str(" NOT NULL");
    } else {
        ddl.push_str(" NULL");
    }
    if let Some(literal) = column
        .default_value
        .as_ref()
        .and_then(default_literal)
    {
        ddl.push_str(" DEFAULT ");
        ddl.push_str(&literal);
    }
    if inline_pk && column.is_primary_key {
        ddl.push_str(" PRIMARY KEY");
    }
    if column.is_unique {
        ddl.push_str(" UNIQUE");
    }
    ddl
}

/// Render a declared default as a SQL literal. Types with no portable
/// literal form are skipped.
fn default_literal(value: &DbValue) -> Option<String> {
    match value {
        DbValue::Int16(Some(v)) => Some(v.to_string()),
        DbValue::Int32(Some(v)) => Some(v.to_string()),
        DbValue::Int64(Some(v)) => Some(v.to_string()),
        DbValue::Float32(Some(v)) => Some(v.to_string()),
        DbValue::Float64(Some(v)) => Some(v.to_string()),
        DbValue::Decimal(Some(v)) => Some(v.to_string()),
        DbValue::Bool(Some(v)) => Some(if *v { "1" } else { "0" }.to_string()),
        DbValue::String(Some(v)) => Some(format!("'{}'", v.replace('\'', "''"))),
        DbValue::Guid(Some(v)) => Some(format!("'{v}'")),
        _ => None,
    }
}

/// First cell of the generated-key fetch, as i64.
fn generated_key(rows: &[Row]) -> Option<i64> {
    match rows.first().and_then(|r| r.get_at(0)) {
        Some(DbValue::Int64(Some(n))) => Some(*n),
        Some(DbValue::Int32(Some(n))) => Some(i64::from(*n)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MssqlDialect, MySqlDialect};
    use crate::value::DbType;

    #[test]
    fn test_column_ddl_identity_primary_key() {
        let column = ColumnDefinition::new("id", DbType::Int64)
            .primary_key()
            .auto_increment();
        assert_eq!(
            column_ddl(&column, &MssqlDialect, true),
            "[id] BIGINT IDENTITY(1,1) NOT NULL PRIMARY KEY"
        );
        assert_eq!(
            column_ddl(&column, &MySqlDialect, true),
            "`id` BIGINT AUTO_INCREMENT NOT NULL PRIMARY KEY"
        );
    }

    #[test]
    fn test_column_ddl_nullable_with_default() {
        let column = ColumnDefinition::new("rating", DbType::Int32).default_value(5);
        assert_eq!(
            column_ddl(&column, &MssqlDialect, false),
            "[rating] INT NULL DEFAULT 5"
        );
    }

    #[test]
    fn test_column_ddl_unique_sized_string() {
        let column = ColumnDefinition::new("email", DbType::String)
            .size(200)
            .not_null()
            .unique();
        assert_eq!(
            column_ddl(&column, &MssqlDialect, false),
            "[email] NVARCHAR(200) NOT NULL UNIQUE"
        );
    }

    #[test]
    fn test_default_literal_escapes_strings() {
        assert_eq!(
            default_literal(&DbValue::String(Some("it's".to_string()))),
            Some("'it''s'".to_string())
        );
        assert_eq!(default_literal(&DbValue::Bool(Some(true))), Some("1".to_string()));
        assert_eq!(default_literal(&DbValue::Binary(Some(vec![1]))), None);
    }

    #[test]
    fn test_generated_key_reads_first_cell() {
        let rows = vec![Row::new(
            vec!["k".to_string()],
            vec![DbValue::Int64(Some(42))],
        )];
        assert_eq!(generated_key(&rows), Some(42));
        assert_eq!(generated_key(&[]), None);
    }
}
