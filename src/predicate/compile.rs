//! Predicate-to-SQL compilation.
//!
//! A recursive walk over the predicate tree emits a WHERE fragment and the
//! ordered parameter list. Column references resolve against the table
//! definition and are quoted per dialect; every literal becomes a
//! positional parameter. Compilation is deterministic: the same
//! (predicate, schema) pair yields byte-identical text and parameter order
//! on every call, which is what lets the output participate in result-cache
//! keys.

use crate::dialect::Dialect;
use crate::error::OrmError;
use crate::predicate::{CompareOp, Predicate};
use crate::schema::table::TableDefinition;
use crate::value::DbValue;

/// Compiled WHERE fragment plus its ordered parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPredicate {
    pub text: String,
    pub params: Vec<DbValue>,
}

/// Compile a predicate against a table's schema.
pub fn compile(
    predicate: &Predicate,
    table: &TableDefinition,
    dialect: &dyn Dialect,
) -> Result<CompiledPredicate, OrmError> {
    let mut compiler = Compiler {
        table,
        dialect,
        text: String::new(),
        params: Vec::new(),
    };
    compiler.walk(predicate)?;
    Ok(CompiledPredicate {
        text: compiler.text,
        params: compiler.params,
    })
}

struct Compiler<'a> {
    table: &'a TableDefinition,
    dialect: &'a dyn Dialect,
    text: String,
    params: Vec<DbValue>,
}

impl Compiler<'_> {
    fn walk(&mut self, predicate: &Predicate) -> Result<(), OrmError> {
        match predicate {
            Predicate::Compare { column, op, value } => self.compare(column, *op, value),
            Predicate::IsNull { column, negated } => {
                let column = self.resolve(column)?;
                self.text.push_str(&column);
                self.text
                    .push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
                Ok(())
            }
            Predicate::In { column, values } => self.membership(column, values),
            Predicate::Like { column, pattern } => {
                let column = self.resolve(column)?;
                self.text.push_str(&column);
                self.text.push_str(" LIKE ");
                self.bind(DbValue::String(Some(pattern.clone())));
                self.text.push_str(" ESCAPE '\\'");
                Ok(())
            }
            Predicate::And(left, right) => self.connective(left, " AND ", right),
            Predicate::Or(left, right) => self.connective(left, " OR ", right),
            Predicate::Not(inner) => {
                self.text.push_str("NOT (");
                self.walk(inner)?;
                self.text.push(')');
                Ok(())
            }
        }
    }

    fn compare(&mut self, column: &str, op: CompareOp, value: &DbValue) -> Result<(), OrmError> {
        let quoted = self.resolve(column)?;
        if value.is_null() {
            // NULL never matches infix comparison; only (in)equality has a
            // SQL rendering.
            return match op {
                CompareOp::Eq => {
                    self.text.push_str(&quoted);
                    self.text.push_str(" IS NULL");
                    Ok(())
                }
                CompareOp::Ne => {
                    self.text.push_str(&quoted);
                    self.text.push_str(" IS NOT NULL");
                    Ok(())
                }
                _ => Err(OrmError::UnsupportedExpression(format!(
                    "ordering comparison '{}' against NULL on column '{column}'",
                    op.sql()
                ))),
            };
        }
        self.text.push_str(&quoted);
        self.text.push(' ');
        self.text.push_str(op.sql());
        self.text.push(' ');
        self.bind(value.clone());
        Ok(())
    }

    fn membership(&mut self, column: &str, values: &[DbValue]) -> Result<(), OrmError> {
        if values.is_empty() {
            // Empty membership is constant false.
            self.text.push_str("1 = 0");
            return Ok(());
        }
        let quoted = self.resolve(column)?;
        self.text.push_str(&quoted);
        self.text.push_str(" IN (");
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.text.push_str(", ");
            }
            if value.is_null() {
                return Err(OrmError::UnsupportedExpression(format!(
                    "NULL inside IN list on column '{column}'"
                )));
            }
            self.bind(value.clone());
        }
        self.text.push(')');
        Ok(())
    }

    fn connective(
        &mut self,
        left: &Predicate,
        joiner: &str,
        right: &Predicate,
    ) -> Result<(), OrmError> {
        self.text.push('(');
        self.walk(left)?;
        self.text.push(')');
        self.text.push_str(joiner);
        self.text.push('(');
        self.walk(right)?;
        self.text.push(')');
        Ok(())
    }

    /// Resolve a field reference to a quoted physical column.
    fn resolve(&self, column: &str) -> Result<String, OrmError> {
        match self.table.column(column) {
            Some(definition) if definition.is_mapped() => Ok(self.dialect.quote(column)),
            Some(_) => Err(OrmError::UnsupportedExpression(format!(
                "relation field '{column}' used as a scalar in a predicate"
            ))),
            None => Err(OrmError::UnsupportedExpression(format!(
                "unknown column '{column}' on table '{}'",
                self.table.table_name
            ))),
        }
    }

    /// Append the next positional placeholder and record its parameter.
    fn bind(&mut self, value: DbValue) {
        let placeholder = self.dialect.placeholder(self.params.len());
        self.text.push_str(&placeholder);
        self.params.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MssqlDialect, MySqlDialect};
    use crate::predicate::col;
    use crate::schema::column::ColumnDefinition;
    use crate::value::DbType;

    fn table() -> TableDefinition {
        TableDefinition::new(
            "users",
            vec![
                ColumnDefinition::new("id", DbType::Int64).primary_key(),
                ColumnDefinition::new("age", DbType::Int32),
                ColumnDefinition::new("name", DbType::String),
            ],
        )
    }

    #[test]
    fn test_simple_comparison() {
        let compiled = compile(&col("age").gt(18), &table(), &MssqlDialect).unwrap();
        assert_eq!(compiled.text, "[age] > @p0");
        assert_eq!(compiled.params, vec![DbValue::Int32(Some(18))]);
    }

    #[test]
    fn test_and_or_parenthesization() {
        let p = col("age").gt(18).and(col("age").lt(65).or(col("name").eq("bob")));
        let compiled = compile(&p, &table(), &MssqlDialect).unwrap();
        assert_eq!(
            compiled.text,
            "([age] > @p0) AND (([age] < @p1) OR ([name] = @p2))"
        );
        assert_eq!(compiled.params.len(), 3);
    }

    #[test]
    fn test_not_wraps_operand() {
        let compiled = compile(&col("age").ge(21).not(), &table(), &MssqlDialect).unwrap();
        assert_eq!(compiled.text, "NOT ([age] >= @p0)");
    }

    #[test]
    fn test_null_equality_becomes_is_null() {
        let p = col("name").eq(DbValue::String(None));
        let compiled = compile(&p, &table(), &MssqlDialect).unwrap();
        assert_eq!(compiled.text, "[name] IS NULL");
        assert!(compiled.params.is_empty());

        let p = col("name").ne(DbValue::String(None));
        let compiled = compile(&p, &table(), &MssqlDialect).unwrap();
        assert_eq!(compiled.text, "[name] IS NOT NULL");
    }

    #[test]
    fn test_null_ordering_comparison_unsupported() {
        let p = col("age").lt(DbValue::Int32(None));
        let err = compile(&p, &table(), &MssqlDialect).unwrap_err();
        match err {
            OrmError::UnsupportedExpression(msg) => assert!(msg.contains("'<'")),
            other => panic!("expected UnsupportedExpression, got {other:?}"),
        }
    }

    #[test]
    fn test_membership() {
        let p = col("id").is_in(vec![1i64, 2, 3]);
        let compiled = compile(&p, &table(), &MssqlDialect).unwrap();
        assert_eq!(compiled.text, "[id] IN (@p0, @p1, @p2)");
        assert_eq!(compiled.params.len(), 3);
    }

    #[test]
    fn test_empty_membership_is_constant_false() {
        let p = col("id").is_in(Vec::<i64>::new());
        let compiled = compile(&p, &table(), &MssqlDialect).unwrap();
        assert_eq!(compiled.text, "1 = 0");
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn test_like_carries_escape_clause() {
        let p = col("name").contains("50%");
        let compiled = compile(&p, &table(), &MssqlDialect).unwrap();
        assert_eq!(compiled.text, "[name] LIKE @p0 ESCAPE '\\'");
        assert_eq!(
            compiled.params,
            vec![DbValue::String(Some("%50\\%%".to_string()))]
        );
    }

    #[test]
    fn test_unknown_column_fails_naming_it() {
        let err = compile(&col("ghost").eq(1i32), &table(), &MssqlDialect).unwrap_err();
        match err {
            OrmError::UnsupportedExpression(msg) => {
                assert!(msg.contains("ghost"));
                assert!(msg.contains("users"));
            }
            other => panic!("expected UnsupportedExpression, got {other:?}"),
        }
    }

    #[test]
    fn test_compile_is_deterministic() {
        let p = col("age")
            .gt(18)
            .and(col("name").contains("bo"))
            .or(col("id").is_in(vec![5i64, 6]));
        let first = compile(&p, &table(), &MssqlDialect).unwrap();
        for _ in 0..10 {
            let again = compile(&p, &table(), &MssqlDialect).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_mysql_placeholder_style() {
        let p = col("age").gt(18).and(col("name").eq("bob"));
        let compiled = compile(&p, &table(), &MySqlDialect).unwrap();
        assert_eq!(compiled.text, "(`age` > ?) AND (`name` = ?)");
        assert_eq!(compiled.params.len(), 2);
    }
}
