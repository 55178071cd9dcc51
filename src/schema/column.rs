//! Per-field schema and mapping metadata.
//!
//! A [`ColumnDefinition`] describes one declared model field: its canonical
//! type, constraints, and optionally a relation descriptor when the field
//! holds a related model (or a collection of them) instead of a scalar.
//! Relation fields are part of the model surface but are never rendered into
//! SQL column lists.

use crate::value::{DbType, DbValue};

/// Direction of a declared relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// The field holds at most one related object.
    ToOne,
    /// The field holds a collection of related objects.
    ToMany,
}

/// Descriptor for a relation field: which child table it points at and
/// which key pair stitches child rows back onto parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDef {
    pub kind: RelationKind,
    /// Table the related model maps to.
    pub child_table: String,
    /// Column on the parent whose values the relation is keyed by.
    pub parent_key: String,
    /// Foreign-key column on the child matched against `parent_key`.
    pub child_key: String,
    /// Load the relation eagerly after every SELECT of the parent.
    pub auto_load: bool,
}

/// Schema metadata for one declared column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub db_type: DbType,
    /// Declared character/binary size. `None` means unspecified, in which
    /// case catalog reconciliation may adopt the live size.
    pub size: Option<u32>,
    /// Unbounded size (`VARCHAR(MAX)` / `LONGTEXT` rendering).
    pub is_size_max: bool,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub is_primary_key: bool,
    pub is_auto_increment: bool,
    pub is_unique: bool,
    pub is_not_null: bool,
    pub default_value: Option<DbValue>,
    /// Set during catalog reconciliation when the live schema has a column
    /// of this name.
    pub exists_in_db: bool,
    /// Present when this field is a relation rather than a scalar column.
    pub relation: Option<RelationDef>,
}

impl ColumnDefinition {
    /// A plain nullable column of the given type.
    pub fn new(name: impl Into<String>, db_type: DbType) -> Self {
        Self {
            name: name.into(),
            db_type,
            size: None,
            is_size_max: false,
            precision: None,
            scale: None,
            is_primary_key: false,
            is_auto_increment: false,
            is_unique: false,
            is_not_null: false,
            default_value: None,
            exists_in_db: false,
            relation: None,
        }
    }

    /// A relation field. Relation fields carry no physical column.
    pub fn relation(name: impl Into<String>, def: RelationDef) -> Self {
        let mut col = Self::new(name, DbType::Int64);
        col.relation = Some(def);
        col
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.is_auto_increment = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_not_null = true;
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn size_max(mut self) -> Self {
        self.is_size_max = true;
        self
    }

    pub fn decimal_size(mut self, precision: u8, scale: u8) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn default_value(mut self, value: impl Into<DbValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// True for scalar columns that exist in SQL, false for relation fields.
    pub fn is_mapped(&self) -> bool {
        self.relation.is_none()
    }

    /// Whether a default value was declared.
    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
    }
}
