//! Canonical column types and values.
//!
//! [`DbType`] is the backend-independent type a column is declared with;
//! each dialect renders it to its own SQL type name. [`DbValue`] carries a
//! typed payload for one cell, with `None` meaning SQL NULL, and is the only
//! shape parameters take on their way to the executor.
//!
//! The [`ValueConvert`] trait maps Rust types onto their `DbValue` variant so
//! call sites can write `col("age").gt(18)` or `row.try_get::<i64>("id")`
//! without naming variants.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Backend-independent column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbType {
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    Bool,
    /// Sized character data; `Text` is the unbounded form.
    String,
    Text,
    DateTime,
    Date,
    Guid,
    Json,
    Binary,
}

/// One typed cell value. `None` payloads are SQL NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Bool(Option<bool>),
    String(Option<String>),
    DateTime(Option<DateTime<Utc>>),
    Date(Option<NaiveDate>),
    Guid(Option<Uuid>),
    Json(Option<serde_json::Value>),
    Binary(Option<Vec<u8>>),
}

impl DbValue {
    /// True when the payload is SQL NULL.
    pub fn is_null(&self) -> bool {
        match self {
            DbValue::Int16(v) => v.is_none(),
            DbValue::Int32(v) => v.is_none(),
            DbValue::Int64(v) => v.is_none(),
            DbValue::Float32(v) => v.is_none(),
            DbValue::Float64(v) => v.is_none(),
            DbValue::Decimal(v) => v.is_none(),
            DbValue::Bool(v) => v.is_none(),
            DbValue::String(v) => v.is_none(),
            DbValue::DateTime(v) => v.is_none(),
            DbValue::Date(v) => v.is_none(),
            DbValue::Guid(v) => v.is_none(),
            DbValue::Json(v) => v.is_none(),
            DbValue::Binary(v) => v.is_none(),
        }
    }

    /// The canonical type this value belongs to.
    pub fn db_type(&self) -> DbType {
        match self {
            DbValue::Int16(_) => DbType::Int16,
            DbValue::Int32(_) => DbType::Int32,
            DbValue::Int64(_) => DbType::Int64,
            DbValue::Float32(_) => DbType::Float32,
            DbValue::Float64(_) => DbType::Float64,
            DbValue::Decimal(_) => DbType::Decimal,
            DbValue::Bool(_) => DbType::Bool,
            DbValue::String(_) => DbType::String,
            DbValue::DateTime(_) => DbType::DateTime,
            DbValue::Date(_) => DbType::Date,
            DbValue::Guid(_) => DbType::Guid,
            DbValue::Json(_) => DbType::Json,
            DbValue::Binary(_) => DbType::Binary,
        }
    }

    /// Stable textual key for cache keys and relation grouping.
    ///
    /// Two values compare equal exactly when their keys are equal, so this
    /// is safe to use for equality-matching parent/child key pairs.
    pub fn key_string(&self) -> String {
        format!("{self:?}")
    }
}

/// Maps a Rust type onto its [`DbValue`] variant.
pub trait ValueConvert: Sized {
    /// Wrap this value into its `DbValue` variant.
    fn into_value(self) -> DbValue;

    /// Unwrap a `DbValue` back into this type. Returns `None` on a NULL
    /// payload or a variant mismatch.
    fn from_value(value: &DbValue) -> Option<Self>;

    /// The NULL `DbValue` for this type.
    fn null_value() -> DbValue;
}

macro_rules! impl_value_convert {
    ($rust:ty, $variant:ident) => {
        impl ValueConvert for $rust {
            fn into_value(self) -> DbValue {
                DbValue::$variant(Some(self))
            }

            fn from_value(value: &DbValue) -> Option<Self> {
                match value {
                    DbValue::$variant(Some(v)) => Some(v.clone()),
                    _ => None,
                }
            }

            fn null_value() -> DbValue {
                DbValue::$variant(None)
            }
        }

        impl From<$rust> for DbValue {
            fn from(v: $rust) -> DbValue {
                DbValue::$variant(Some(v))
            }
        }

        impl From<Option<$rust>> for DbValue {
            fn from(v: Option<$rust>) -> DbValue {
                DbValue::$variant(v)
            }
        }
    };
}

impl_value_convert!(i16, Int16);
impl_value_convert!(i32, Int32);
impl_value_convert!(i64, Int64);
impl_value_convert!(f32, Float32);
impl_value_convert!(f64, Float64);
impl_value_convert!(Decimal, Decimal);
impl_value_convert!(bool, Bool);
impl_value_convert!(String, String);
impl_value_convert!(DateTime<Utc>, DateTime);
impl_value_convert!(NaiveDate, Date);
impl_value_convert!(Uuid, Guid);
impl_value_convert!(serde_json::Value, Json);
impl_value_convert!(Vec<u8>, Binary);

impl From<&str> for DbValue {
    fn from(v: &str) -> DbValue {
        DbValue::String(Some(v.to_string()))
    }
}

impl<T: ValueConvert> ValueConvert for Option<T> {
    fn into_value(self) -> DbValue {
        match self {
            Some(v) => v.into_value(),
            None => T::null_value(),
        }
    }

    fn from_value(value: &DbValue) -> Option<Self> {
        if value.is_null() {
            Some(None)
        } else {
            T::from_value(value).map(Some)
        }
    }

    fn null_value() -> DbValue {
        T::null_value()
    }
}
