//! Schema introspection: which fields of a configuration type are bindable,
//! under which external keys, and with which value types.

mod cache;
mod describe;
mod error;
mod introspect;
mod value;

pub use cache::SchemaCache;
pub use describe::{Configurable, FieldDescriptor, TypeDescriptor};
pub use error::SchemaError;
pub use introspect::{introspect, introspect_descriptor, BindableField, ConfigSchema, FieldMeta};
pub use value::{PropertyValue, ValueType};
