use thiserror::Error;

use crate::schema::ValueType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum VerifyError {
    #[error("field at '{key}' expected '{expected}', found {actual:?}")]
    FieldMismatch {
        key: String,
        expected: String,
        actual: Option<String>,
    },

    #[error(
        "{assertions} field checks for {fields} bindable fields; {supplied} properties supplied, {consumed} consumed"
    )]
    AssertionCount {
        assertions: usize,
        fields: usize,
        supplied: usize,
        consumed: usize,
    },

    #[error("ambient property '{0}' collides with a generated property")]
    AmbientCollision(String),

    #[error("no synthetic value can be generated for '{0}'")]
    Unsynthesizable(String),

    #[error("no distinct {value_type} value left for '{key}'")]
    DomainExhausted { key: String, value_type: ValueType },
}
