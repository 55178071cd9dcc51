//! Shared test harness: an in-memory executor that records every statement,
//! answers existence probes from a simulated schema, and replays canned
//! result sets for everything else.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use breakwater::error::OrmError;
use breakwater::executor::{SqlExecutor, StatementKind};
use breakwater::row::Row;
use breakwater::value::DbValue;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct RecordedStatement {
    pub sql: String,
    pub params: Vec<DbValue>,
    pub kind: StatementKind,
}

#[derive(Clone, Default)]
struct SchemaState {
    tables: HashSet<String>,
    columns: HashSet<(String, String)>,
    migration_rows: Vec<(String, String, DateTime<Utc>)>,
}

#[derive(Default)]
pub struct MockState {
    pub statements: Vec<RecordedStatement>,
    pub queries: Vec<(String, Vec<DbValue>)>,
    pub canned_results: VecDeque<Vec<Row>>,
    /// Any statement whose SQL or params contain this needle fails.
    pub fail_on: Option<String>,
    pub begin_count: usize,
    pub commit_count: usize,
    pub rollback_count: usize,
    schema: SchemaState,
    snapshot: Option<SchemaState>,
}

impl MockState {
    pub fn add_table(&mut self, table: &str) {
        self.schema.tables.insert(table.to_string());
    }

    pub fn add_column(&mut self, table: &str, column: &str) {
        self.schema
            .columns
            .insert((table.to_string(), column.to_string()));
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.schema.tables.contains(table)
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.schema
            .columns
            .contains(&(table.to_string(), column.to_string()))
    }

    pub fn migration_versions(&self) -> Vec<String> {
        self.schema
            .migration_rows
            .iter()
            .map(|(v, _, _)| v.clone())
            .collect()
    }

    pub fn statements_of_kind(&self, kind: StatementKind) -> Vec<&RecordedStatement> {
        self.statements.iter().filter(|s| s.kind == kind).collect()
    }
}

/// Records everything; simulates just enough of a SQL Server to satisfy the
/// engine's probes, DDL, and tracking-table traffic.
pub struct MockExecutor {
    state: Arc<Mutex<MockState>>,
}

impl MockExecutor {
    pub fn new() -> (Self, Arc<Mutex<MockState>>) {
        let state = Arc::new(Mutex::new(MockState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }
}

fn unquote(ident: &str) -> String {
    ident
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim_matches('`')
        .to_string()
}

fn string_param(params: &[DbValue], index: usize) -> String {
    match params.get(index) {
        Some(DbValue::String(Some(s))) => s.clone(),
        other => panic!("expected string param at {index}, got {other:?}"),
    }
}

fn probe_hit() -> Vec<Row> {
    vec![Row::new(vec!["x".to_string()], vec![DbValue::Int32(Some(1))])]
}

/// Apply a DDL statement's effect to the simulated schema.
fn apply_ddl(schema: &mut SchemaState, sql: &str) {
    if let Some(rest) = sql.strip_prefix("CREATE TABLE ") {
        let Some(open) = rest.find('(') else { return };
        let table = unquote(&rest[..open]);
        for part in rest[open + 1..rest.len() - 1].split(", ") {
            let part = part.trim();
            if part.starts_with("CONSTRAINT") {
                continue;
            }
            if let Some(name) = part.split_whitespace().next() {
                schema.columns.insert((table.clone(), unquote(name)));
            }
        }
        schema.tables.insert(table);
    } else if let Some(rest) = sql.strip_prefix("DROP TABLE ") {
        let table = unquote(rest);
        schema.tables.remove(&table);
        schema.columns.retain(|(t, _)| t != &table);
    } else if let Some(rest) = sql.strip_prefix("ALTER TABLE ") {
        if let Some((table, action)) = rest.split_once(" ADD ") {
            if let Some(name) = action.split_whitespace().next() {
                schema
                    .columns
                    .insert((unquote(table), unquote(name)));
            }
        } else if let Some((table, column)) = rest.split_once(" DROP COLUMN ") {
            schema.columns.remove(&(unquote(table), unquote(column)));
        }
    }
}

impl SqlExecutor for MockExecutor {
    fn execute(
        &mut self,
        sql: &str,
        params: &[DbValue],
        kind: StatementKind,
    ) -> Result<u64, OrmError> {
        let mut state = self.state.lock().unwrap();
        state.statements.push(RecordedStatement {
            sql: sql.to_string(),
            params: params.to_vec(),
            kind,
        });
        if let Some(needle) = state.fail_on.clone() {
            let hit = sql.contains(&needle)
                || params.iter().any(|p| p.key_string().contains(&needle));
            if hit {
                return Err(OrmError::ConstraintViolation(format!(
                    "simulated failure on '{needle}'"
                )));
            }
        }
        if kind == StatementKind::Ddl {
            apply_ddl(&mut state.schema, sql);
            return Ok(0);
        }
        if sql.contains("[breakwater_migrations]") {
            if sql.starts_with("INSERT INTO") {
                let version = string_param(params, 0);
                let name = string_param(params, 1);
                let applied_at = match params.get(2) {
                    Some(DbValue::DateTime(Some(ts))) => *ts,
                    other => panic!("expected timestamp param, got {other:?}"),
                };
                state
                    .schema
                    .migration_rows
                    .push((version, name, applied_at));
            } else if sql.starts_with("DELETE FROM") {
                let version = string_param(params, 0);
                state.schema.migration_rows.retain(|(v, _, _)| v != &version);
            }
        }
        Ok(1)
    }

    fn query(&mut self, sql: &str, params: &[DbValue]) -> Result<Vec<Row>, OrmError> {
        let mut state = self.state.lock().unwrap();
        state.queries.push((sql.to_string(), params.to_vec()));

        if sql.contains("INFORMATION_SCHEMA.TABLES") {
            let table = string_param(params, 0);
            return Ok(if state.schema.tables.contains(&table) {
                probe_hit()
            } else {
                vec![]
            });
        }
        if sql.contains("INFORMATION_SCHEMA.COLUMNS") {
            let table = string_param(params, 0);
            let column = string_param(params, 1);
            return Ok(if state.schema.columns.contains(&(table, column)) {
                probe_hit()
            } else {
                vec![]
            });
        }
        if sql.contains("tempdb.sys.tables") {
            return Ok(vec![]);
        }
        if sql.starts_with("SELECT [version]") && sql.contains("[breakwater_migrations]") {
            return Ok(state
                .schema
                .migration_rows
                .iter()
                .map(|(version, name, applied_at)| {
                    Row::new(
                        vec![
                            "version".to_string(),
                            "name".to_string(),
                            "applied_at".to_string(),
                        ],
                        vec![
                            DbValue::String(Some(version.clone())),
                            DbValue::String(Some(name.clone())),
                            DbValue::DateTime(Some(*applied_at)),
                        ],
                    )
                })
                .collect());
        }
        Ok(state.canned_results.pop_front().unwrap_or_default())
    }

    fn begin(&mut self) -> Result<(), OrmError> {
        let mut state = self.state.lock().unwrap();
        state.begin_count += 1;
        state.snapshot = Some(state.schema.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), OrmError> {
        let mut state = self.state.lock().unwrap();
        state.commit_count += 1;
        state.snapshot = None;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), OrmError> {
        let mut state = self.state.lock().unwrap();
        state.rollback_count += 1;
        if let Some(snapshot) = state.snapshot.take() {
            state.schema = snapshot;
        }
        Ok(())
    }
}

/// A fresh database bound to a mock executor and the SQL Server dialect.
pub fn mock_database(config: breakwater::config::OrmConfig) -> (breakwater::database::Database, Arc<Mutex<MockState>>) {
    mock_database_with(config, Arc::new(breakwater::dialect::MssqlDialect))
}

/// Same harness, bound to an arbitrary dialect.
pub fn mock_database_with(
    config: breakwater::config::OrmConfig,
    dialect: Arc<dyn breakwater::dialect::Dialect>,
) -> (breakwater::database::Database, Arc<Mutex<MockState>>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let (executor, state) = MockExecutor::new();
    let db = breakwater::database::Database::new(
        "test-db",
        Box::new(executor),
        dialect,
        config,
        Arc::new(breakwater::database::CacheSet::new()),
    );
    (db, state)
}
