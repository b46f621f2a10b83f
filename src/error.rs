use crate::bind::{BindError, ConversionError, PropertyError, UnconsumedPropertyError};
use crate::schema::SchemaError;
use crate::verify::VerifyError;
use thiserror::Error;

/// Top-level error type for the propbind library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("binding error: {0}")]
    Bind(#[from] BindError),

    #[error("unconsumed properties: {0}")]
    Unconsumed(#[from] UnconsumedPropertyError),

    #[error("property error: {0}")]
    Property(#[from] PropertyError),

    #[error("verification failed: {0}")]
    Verify(#[from] VerifyError),

    #[error("no configuration injected for prefix '{0}'")]
    NotInjected(String),
}
