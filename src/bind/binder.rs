//! Construction of populated configuration instances from property sets.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use super::{BindError, ConversionError, PropertySet};
use crate::schema::{ConfigSchema, Configurable, SchemaCache};

/// A populated instance together with the keys read to build it.
#[derive(Debug, Clone)]
pub struct BindingResult<T> {
    instance: T,
    consumed_keys: BTreeSet<String>,
}

impl<T> BindingResult<T> {
    pub fn instance(&self) -> &T {
        &self.instance
    }

    pub fn into_instance(self) -> T {
        self.instance
    }

    /// Fully-qualified keys that were present and converted.
    pub fn consumed_keys(&self) -> &BTreeSet<String> {
        &self.consumed_keys
    }

    pub fn consumed_count(&self) -> usize {
        self.consumed_keys.len()
    }

    pub fn into_parts(self) -> (T, BTreeSet<String>) {
        (self.instance, self.consumed_keys)
    }
}

/// Binds property values into configuration instances by prefixed key.
///
/// A binder holds no state between calls; concurrent binds through one
/// binder are independent.
#[derive(Debug, Clone)]
pub struct ConfigBinder {
    separator: String,
}

impl Default for ConfigBinder {
    fn default() -> Self {
        Self {
            separator: ".".to_string(),
        }
    }
}

impl ConfigBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text placed between prefix and external key. Defaults to `"."`.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The fully-qualified key for `external_key` under `prefix`.
    pub fn qualify(&self, prefix: &str, external_key: &str) -> String {
        if prefix.is_empty() {
            external_key.to_string()
        } else {
            format!("{prefix}{}{external_key}", self.separator)
        }
    }

    /// Builds an instance of `T` with every bindable field of `schema` set
    /// from `properties`.
    ///
    /// Absent properties leave their field at its default. Fields outside the
    /// schema keep the value from `T::default()`. On a conversion failure no
    /// instance is returned.
    pub fn bind<T: Default>(
        &self,
        schema: &ConfigSchema<T>,
        prefix: &str,
        properties: &PropertySet,
    ) -> Result<BindingResult<T>, ConversionError> {
        let mut instance = T::default();
        let mut consumed_keys = BTreeSet::new();

        for field in schema.fields() {
            let key = self.qualify(prefix, field.external_key());
            let Some(raw) = properties.get(&key) else {
                trace!(key = %key, "property absent, keeping default");
                continue;
            };

            field
                .accessor
                .assign(&mut instance, raw)
                .map_err(|reason| ConversionError {
                    field: field.field_name(),
                    key: key.clone(),
                    raw_value: raw.to_string(),
                    target_type: field.value_type(),
                    reason,
                })?;
            debug!(key = %key, field = field.field_name(), "bound property");
            consumed_keys.insert(key);
        }

        debug!(
            type_name = schema.type_name(),
            prefix,
            consumed = consumed_keys.len(),
            fields = schema.len(),
            "bound config"
        );
        Ok(BindingResult {
            instance,
            consumed_keys,
        })
    }

    /// Introspects `T` through the global schema cache and binds it.
    pub fn bind_type<T: Configurable>(
        &self,
        prefix: &str,
        properties: &PropertySet,
    ) -> Result<BindingResult<T>, BindError> {
        let schema = SchemaCache::global().get_or_introspect::<T>()?;
        Ok(self.bind(&schema, prefix, properties)?)
    }
}
