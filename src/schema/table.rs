//! Reconciled schema metadata for one model type.
//!
//! A [`TableDefinition`] is the declared column sequence of a model, in
//! declaration order, optionally reconciled against the live catalog. After
//! construction it is only ever mutated by reconciliation, which flips the
//! `exists_in_db` flags and adopts live size/nullability where the
//! declaration left them open.

use crate::schema::column::{ColumnDefinition, RelationDef};

/// Schema metadata for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub table_name: String,
    /// Declared columns, in model declaration order. Order is stable and
    /// deterministic; SQL column lists are emitted in this order.
    pub columns: Vec<ColumnDefinition>,
    /// Set during reconciliation when the live schema has this table.
    pub exists_in_db: bool,
}

impl TableDefinition {
    pub fn new(table_name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
            exists_in_db: false,
        }
    }

    /// Number of primary-key columns. Always equals the count of columns
    /// with `is_primary_key` set.
    pub fn primary_keys_count(&self) -> usize {
        self.columns.iter().filter(|c| c.is_primary_key).count()
    }

    /// Primary-key columns in declaration order.
    pub fn primary_keys(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }

    /// Scalar columns that map to SQL, excluding relation fields.
    pub fn mapped_columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter().filter(|c| c.is_mapped())
    }

    /// Relation fields with their descriptors.
    pub fn relations(&self) -> impl Iterator<Item = (&ColumnDefinition, &RelationDef)> {
        self.columns
            .iter()
            .filter_map(|c| c.relation.as_ref().map(|r| (c, r)))
    }

    /// Whether any column declares a relation.
    pub fn contains_relations(&self) -> bool {
        self.columns.iter().any(|c| c.relation.is_some())
    }

    /// The auto-increment column, if one is declared.
    pub fn auto_increment_column(&self) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.is_auto_increment)
    }

    /// Column lookup by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::column::{RelationDef, RelationKind};
    use crate::value::DbType;

    fn sample() -> TableDefinition {
        TableDefinition::new(
            "users",
            vec![
                ColumnDefinition::new("id", DbType::Int64)
                    .primary_key()
                    .auto_increment(),
                ColumnDefinition::new("name", DbType::String).size(100),
                ColumnDefinition::new("tenant", DbType::Int32).primary_key(),
                ColumnDefinition::relation(
                    "posts",
                    RelationDef {
                        kind: RelationKind::ToMany,
                        child_table: "posts".to_string(),
                        parent_key: "id".to_string(),
                        child_key: "user_id".to_string(),
                        auto_load: false,
                    },
                ),
            ],
        )
    }

    #[test]
    fn test_columns_preserve_declaration_order() {
        let td = sample();
        let names: Vec<&str> = td.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "tenant", "posts"]);
    }

    #[test]
    fn test_primary_keys_count_matches_flags() {
        let td = sample();
        assert_eq!(td.primary_keys_count(), 2);
        assert_eq!(
            td.primary_keys_count(),
            td.columns.iter().filter(|c| c.is_primary_key).count()
        );
    }

    #[test]
    fn test_mapped_columns_exclude_relations() {
        let td = sample();
        assert_eq!(td.mapped_columns().count(), 3);
        assert!(td.contains_relations());
        assert_eq!(td.relations().count(), 1);
    }

    #[test]
    fn test_auto_increment_lookup() {
        let td = sample();
        assert_eq!(td.auto_increment_column().map(|c| c.name.as_str()), Some("id"));
        assert!(td.column("name").is_some());
        assert!(td.column("absent").is_none());
    }
}
