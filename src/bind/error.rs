use thiserror::Error;

use crate::schema::{SchemaError, ValueType};

/// A present property value that cannot be converted to its field's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert '{raw_value}' at '{key}' to {target_type} for field '{field}': {reason}")]
pub struct ConversionError {
    pub field: &'static str,
    pub key: String,
    pub raw_value: String,
    pub target_type: ValueType,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BindError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Supplied and consumed property counts disagree after a bind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{supplied} properties supplied but {consumed} consumed; unconsumed: {unconsumed:?}")]
pub struct UnconsumedPropertyError {
    pub supplied: usize,
    pub consumed: usize,
    pub unconsumed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PropertyError {
    #[error("property '{0}' has no flat string representation")]
    NonScalar(String),
}
