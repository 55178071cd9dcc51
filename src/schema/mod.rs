//! Schema metadata: column/table definitions, the model registry, the
//! catalog cache, and the reconciling definition builder.

pub mod builder;
pub mod catalog;
pub mod column;
pub mod registry;
pub mod table;
