//! Typed predicate combinators.
//!
//! Predicates are small trees built from column comparisons and boolean
//! connectives:
//!
//! ```
//! use breakwater::predicate::col;
//!
//! let p = col("age").gt(18).and(col("name").contains("bo").or(col("vip").eq(true)));
//! ```
//!
//! The tree is compiled against a table definition by
//! [`compile::compile`], which emits parameterized SQL — values never
//! appear in statement text.

pub mod compile;

pub use compile::{compile, CompiledPredicate};

use crate::value::DbValue;

/// Infix comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// A boolean expression over one model's fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: String,
        op: CompareOp,
        value: DbValue,
    },
    IsNull {
        column: String,
        negated: bool,
    },
    In {
        column: String,
        values: Vec<DbValue>,
    },
    /// `pattern` is the final LIKE pattern, wildcards included. The
    /// `contains`/`starts_with`/`ends_with` builders escape the literal
    /// before adding wildcards; `like` passes the pattern through raw.
    Like {
        column: String,
        pattern: String,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }
}

/// Start a predicate on a named column.
pub fn col(name: impl Into<String>) -> Col {
    Col { name: name.into() }
}

/// A column reference awaiting an operator.
pub struct Col {
    name: String,
}

impl Col {
    fn compare(self, op: CompareOp, value: impl Into<DbValue>) -> Predicate {
        Predicate::Compare {
            column: self.name,
            op,
            value: value.into(),
        }
    }

    pub fn eq(self, value: impl Into<DbValue>) -> Predicate {
        self.compare(CompareOp::Eq, value)
    }

    pub fn ne(self, value: impl Into<DbValue>) -> Predicate {
        self.compare(CompareOp::Ne, value)
    }

    pub fn lt(self, value: impl Into<DbValue>) -> Predicate {
        self.compare(CompareOp::Lt, value)
    }

    pub fn le(self, value: impl Into<DbValue>) -> Predicate {
        self.compare(CompareOp::Le, value)
    }

    pub fn gt(self, value: impl Into<DbValue>) -> Predicate {
        self.compare(CompareOp::Gt, value)
    }

    pub fn ge(self, value: impl Into<DbValue>) -> Predicate {
        self.compare(CompareOp::Ge, value)
    }

    pub fn is_null(self) -> Predicate {
        Predicate::IsNull {
            column: self.name,
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Predicate {
        Predicate::IsNull {
            column: self.name,
            negated: true,
        }
    }

    /// Membership in a value list. An empty list compiles to constant false.
    pub fn is_in<V: Into<DbValue>>(self, values: impl IntoIterator<Item = V>) -> Predicate {
        Predicate::In {
            column: self.name,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Raw LIKE pattern; no escaping is applied.
    pub fn like(self, pattern: impl Into<String>) -> Predicate {
        Predicate::Like {
            column: self.name,
            pattern: pattern.into(),
        }
    }

    /// Substring match: the literal is wildcard-escaped, then wrapped in `%`.
    pub fn contains(self, literal: &str) -> Predicate {
        Predicate::Like {
            column: self.name,
            pattern: format!("%{}%", escape_like(literal)),
        }
    }

    /// Prefix match.
    pub fn starts_with(self, literal: &str) -> Predicate {
        Predicate::Like {
            column: self.name,
            pattern: format!("{}%", escape_like(literal)),
        }
    }

    /// Suffix match.
    pub fn ends_with(self, literal: &str) -> Predicate {
        Predicate::Like {
            column: self.name,
            pattern: format!("%{}", escape_like(literal)),
        }
    }
}

/// Escape LIKE metacharacters in a literal. Compiled patterns carry an
/// `ESCAPE '\'` clause, so backslash is the escape character.
pub(crate) fn escape_like(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for ch in literal.chars() {
        if ch == '\\' || ch == '%' || ch == '_' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
