//! Error types shared across the crate.
//!
//! All fallible operations return [`OrmError`]. The taxonomy mirrors the
//! failure policy of the engine: lookups against missing entities fail with
//! `NotFound`, predicate shapes the compiler cannot translate fail with
//! `UnsupportedExpression`, constraint violations propagate from the
//! executor, and transaction misuse fails fast with `TransactionState`.

use std::fmt;

/// Crate-wide error type.
#[derive(Debug)]
pub enum OrmError {
    /// A required entity is missing: a primary key on a model, a target
    /// migration version, a column named in an ORDER BY, etc.
    NotFound(String),
    /// The predicate compiler met a shape it cannot translate to SQL.
    /// The message names the offending construct.
    UnsupportedExpression(String),
    /// A uniqueness/check/foreign-key constraint was violated. Raised by the
    /// executor and passed through unchanged.
    ConstraintViolation(String),
    /// Transaction misuse: nested `begin`, or `commit`/`rollback` with no
    /// transaction open.
    TransactionState(String),
    /// Any other execution failure reported by the executor.
    Execution(String),
    /// Configuration could not be loaded or is invalid.
    Config(String),
}

impl fmt::Display for OrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrmError::NotFound(s) => write!(f, "not found: {s}"),
            OrmError::UnsupportedExpression(s) => {
                write!(f, "unsupported expression: {s}")
            }
            OrmError::ConstraintViolation(s) => {
                write!(f, "constraint violation: {s}")
            }
            OrmError::TransactionState(s) => {
                write!(f, "transaction state error: {s}")
            }
            OrmError::Execution(s) => write!(f, "execution error: {s}"),
            OrmError::Config(s) => write!(f, "configuration error: {s}"),
        }
    }
}

impl std::error::Error for OrmError {}
