//! The statement-execution collaborator.
//!
//! The engine composes SQL text and ordered parameters; everything that
//! touches a wire protocol lives behind [`SqlExecutor`]. Drivers, pools and
//! transports implement this trait outside the crate. Tests drive the engine
//! with a scripted implementation.

use crate::error::OrmError;
use crate::row::Row;
use crate::value::DbValue;

/// What a statement does, so executors can route it (e.g. read replicas)
/// and scripted test executors can assert on intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Returns rows.
    Query,
    /// INSERT/UPDATE/DELETE; returns an affected count.
    Mutation,
    /// Schema-changing statement.
    Ddl,
}

/// Narrow execution contract the engine depends on.
///
/// Parameters are positional and ordered; the engine never inlines values
/// into statement text. Transaction control is part of the connection
/// handle: `begin`/`commit`/`rollback` apply to the same underlying
/// connection the statements run on. Nested-transaction detection is the
/// caller's job (see `Database`), so implementations may assume calls are
/// well-paired.
pub trait SqlExecutor {
    /// Run a statement that does not return rows. Returns the affected count.
    fn execute(
        &mut self,
        sql: &str,
        params: &[DbValue],
        kind: StatementKind,
    ) -> Result<u64, OrmError>;

    /// Run a statement that returns rows.
    fn query(&mut self, sql: &str, params: &[DbValue]) -> Result<Vec<Row>, OrmError>;

    /// Open a transaction on this connection.
    fn begin(&mut self) -> Result<(), OrmError>;

    /// Commit the open transaction.
    fn commit(&mut self) -> Result<(), OrmError>;

    /// Roll back the open transaction.
    fn rollback(&mut self) -> Result<(), OrmError>;
}
