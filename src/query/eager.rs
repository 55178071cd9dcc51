//! Batched relation loading.
//!
//! One call loads one declared relation for a whole batch of parents with a
//! single child SELECT, regardless of batch size. The child select goes
//! through the normal select path, so the child's own relations load
//! recursively. The parent's `load_relations` implementation takes the
//! grouped result and assigns each bucket to its parent by key.

use std::collections::{HashMap, HashSet};

use crate::database::Database;
use crate::error::OrmError;
use crate::model::Model;
use crate::predicate::col;

/// Fetch the children of one declared relation for every parent in the
/// batch, grouped by the child's foreign-key value rendered with
/// [`crate::value::DbValue::key_string`].
///
/// Parents look up their bucket with the same rendering of their own key
/// column. An empty batch or a batch of all-NULL keys issues no query.
///
/// # Errors
///
/// Fails when `relation_field` is not a declared relation of the parent, or
/// when the child select fails.
pub fn load_related<P: Model, C: Model + 'static>(
    parents: &[P],
    relation_field: &str,
    db: &mut Database,
) -> Result<HashMap<String, Vec<C>>, OrmError> {
    let parent_schema = P::schema();
    let relation = parent_schema
        .column(relation_field)
        .and_then(|c| c.relation.as_ref())
        .ok_or_else(|| {
            OrmError::UnsupportedExpression(format!(
                "'{relation_field}' is not a declared relation on table '{}'",
                parent_schema.table_name
            ))
        })?
        .clone();

    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for parent in parents {
        let key = parent.value_of(&relation.parent_key);
        if key.is_null() {
            continue;
        }
        if seen.insert(key.key_string()) {
            keys.push(key);
        }
    }
    if keys.is_empty() {
        return Ok(HashMap::new());
    }

    let children: Vec<C> = db.select(Some(col(relation.child_key.clone()).is_in(keys)))?;

    let mut grouped: HashMap<String, Vec<C>> = HashMap::new();
    for child in children {
        let key = child.value_of(&relation.child_key).key_string();
        grouped.entry(key).or_default().push(child);
    }
    Ok(grouped)
}
