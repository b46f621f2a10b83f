//! Derivation of the bindable-field schema from a type description.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::describe::{Accessor, Configurable, TypeDescriptor};
use super::value::ValueType;
use super::SchemaError;

/// A field eligible for binding, resolved to its external key.
pub struct BindableField<T> {
    external_key: &'static str,
    field_name: &'static str,
    value_type: ValueType,
    owner: &'static str,
    pub(crate) accessor: Arc<Accessor<T>>,
}

impl<T> BindableField<T> {
    pub fn external_key(&self) -> &'static str {
        self.external_key
    }

    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Name of the type this field belongs to.
    pub fn owner(&self) -> &'static str {
        self.owner
    }
}

impl<T> Clone for BindableField<T> {
    fn clone(&self) -> Self {
        Self {
            external_key: self.external_key,
            field_name: self.field_name,
            value_type: self.value_type,
            owner: self.owner,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<T> fmt::Debug for BindableField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindableField")
            .field("external_key", &self.external_key)
            .field("field_name", &self.field_name)
            .field("value_type", &self.value_type)
            .field("owner", &self.owner)
            .finish()
    }
}

/// Serializable view of one bindable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMeta {
    pub key: &'static str,
    pub field: &'static str,
    pub value_type: ValueType,
}

/// Ordered bindable fields of a configuration type. Immutable once derived.
pub struct ConfigSchema<T> {
    type_name: &'static str,
    fields: Vec<BindableField<T>>,
}

impl<T> ConfigSchema<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Bindable fields in declaration order.
    pub fn fields(&self) -> &[BindableField<T>] {
        &self.fields
    }

    pub fn field(&self, external_key: &str) -> Option<&BindableField<T>> {
        self.fields.iter().find(|f| f.external_key == external_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.external_key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn metadata(&self) -> Vec<FieldMeta> {
        self.fields
            .iter()
            .map(|f| FieldMeta {
                key: f.external_key,
                field: f.field_name,
                value_type: f.value_type,
            })
            .collect()
    }
}

impl<T> fmt::Debug for ConfigSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSchema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Derives the schema of `T` from its own description.
pub fn introspect<T: Configurable>() -> Result<ConfigSchema<T>, SchemaError> {
    introspect_descriptor(T::describe())
}

/// Derives a schema from an explicit type description.
///
/// Untagged fields are skipped. A tag with an empty key falls back to the
/// field name. Two fields resolving to the same key fail the whole derivation.
pub fn introspect_descriptor<T>(descriptor: TypeDescriptor<T>) -> Result<ConfigSchema<T>, SchemaError> {
    let type_name = descriptor.type_name();
    let mut seen: HashMap<&'static str, &'static str> = HashMap::new();
    let mut fields = Vec::new();

    for field in descriptor.into_fields() {
        let (name, tag, binding) = field.into_parts();
        let (Some(tag), Some(binding)) = (tag, binding) else {
            continue;
        };

        let external_key = if tag.is_empty() { name } else { tag };
        if let Some(first) = seen.insert(external_key, name) {
            return Err(SchemaError::DuplicateKey {
                type_name,
                key: external_key,
                first,
                second: name,
            });
        }

        fields.push(BindableField {
            external_key,
            field_name: name,
            value_type: binding.value_type,
            owner: type_name,
            accessor: binding.accessor,
        });
    }

    Ok(ConfigSchema { type_name, fields })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Service {
        timeout_ms: i64,
        name: String,
        internal: u8,
    }

    crate::configurable!(Service {
        timeout_ms => "timeout",
        name => "",
        internal,
    });

    #[derive(Debug, Default)]
    struct Clashing {
        host: String,
        address: String,
    }

    crate::configurable!(Clashing {
        host => "",
        address => "host",
    });

    #[test]
    fn test_resolves_keys_and_skips_untagged() {
        let schema = introspect::<Service>().unwrap();

        assert_eq!(schema.type_name(), "Service");
        assert_eq!(schema.keys().collect::<Vec<_>>(), ["timeout", "name"]);
        assert_eq!(schema.field("timeout").unwrap().field_name(), "timeout_ms");
        assert_eq!(schema.field("timeout").unwrap().value_type(), ValueType::I64);
        assert_eq!(schema.field("name").unwrap().owner(), "Service");
        assert!(schema.field("internal").is_none());
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let err = introspect::<Clashing>().unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateKey {
                type_name: "Clashing",
                key: "host",
                first: "host",
                second: "address",
            }
        );
    }

    #[test]
    fn test_explicit_descriptor() {
        let descriptor = TypeDescriptor::<Service>::new("svc")
            .untagged("timeout_ms")
            .field("name", Some("display"), |s| &s.name, |s| &mut s.name)
            .field("internal", None, |s| &s.internal, |s| &mut s.internal);

        let schema = introspect_descriptor(descriptor).unwrap();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.keys().next(), Some("display"));
    }

    #[test]
    fn test_empty_schema() {
        let schema = introspect_descriptor(TypeDescriptor::<Service>::new("empty")).unwrap();
        assert!(schema.is_empty());
    }

    #[test]
    fn test_metadata_serializes() {
        let schema = introspect::<Service>().unwrap();
        let json = serde_json::to_value(schema.metadata()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "key": "timeout", "field": "timeout_ms", "value_type": "i64" },
                { "key": "name", "field": "name", "value_type": "string" },
            ])
        );
    }
}
