//! Round-trip verification of configuration schemas.
//!
//! A scenario generates one synthetic value per bindable field, binds the
//! resulting properties, and checks that introspection, binding and
//! accounting all agree: every field reads back its synthetic value, and
//! every supplied property was consumed exactly once.

mod error;

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

pub use error::VerifyError;

use crate::bind::{reconcile, ConfigBinder, Ledger, PropertySet, UnconsumedPropertyError};
use crate::schema::{BindableField, ConfigSchema, Configurable, SchemaCache, ValueType};
use crate::Error;

/// Outcome of a passed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub type_name: &'static str,
    pub prefix: String,
    /// Field-level equality checks performed.
    pub assertions: usize,
    pub ledger: Ledger,
    /// Unrelated properties supplied alongside the generated ones.
    pub ambient: usize,
}

/// Drives verification scenarios through an explicitly supplied binder.
#[derive(Debug, Clone, Default)]
pub struct VerificationHarness {
    binder: ConfigBinder,
}

impl VerificationHarness {
    /// Prefix used by [`verify_default`](Self::verify_default).
    pub const DEFAULT_PREFIX: &'static str = "propbind.test.prefix";

    pub fn new(binder: ConfigBinder) -> Self {
        Self { binder }
    }

    pub fn binder(&self) -> &ConfigBinder {
        &self.binder
    }

    /// Sets up a fresh scenario for `schema` under `prefix`.
    pub fn setup<'s, T>(
        &self,
        schema: &'s ConfigSchema<T>,
        prefix: &str,
    ) -> Result<Scenario<'s, T>, VerifyError> {
        Scenario::generate(schema, prefix, self.binder.clone())
    }

    /// Verifies an explicit schema under `prefix`.
    pub fn verify_schema<T: Default>(
        &self,
        schema: &ConfigSchema<T>,
        prefix: &str,
    ) -> Result<VerificationReport, Error> {
        self.setup(schema, prefix)?.run()
    }

    /// Verifies the schema of `T` under `prefix`.
    pub fn verify<T: Configurable>(&self, prefix: &str) -> Result<VerificationReport, Error> {
        let schema = SchemaCache::global().get_or_introspect::<T>()?;
        self.verify_schema(&schema, prefix)
    }

    pub fn verify_default<T: Configurable>(&self) -> Result<VerificationReport, Error> {
        self.verify::<T>(Self::DEFAULT_PREFIX)
    }
}

/// One setup-bind-check pass over a schema.
#[derive(Debug)]
pub struct Scenario<'s, T> {
    schema: &'s ConfigSchema<T>,
    binder: ConfigBinder,
    prefix: String,
    expectations: BTreeMap<&'static str, String>,
    generated: PropertySet,
    ambient: PropertySet,
}

impl<'s, T> Scenario<'s, T> {
    fn generate(
        schema: &'s ConfigSchema<T>,
        prefix: &str,
        binder: ConfigBinder,
    ) -> Result<Self, VerifyError> {
        let mut expectations = BTreeMap::new();
        let mut generated = PropertySet::new();
        let mut drawn: HashMap<ValueType, HashSet<String>> = HashMap::new();

        for field in schema.fields() {
            let key = binder.qualify(prefix, field.external_key());
            let value = draw_distinct(field, &key, drawn.entry(field.value_type()).or_default())?;
            expectations.insert(field.external_key(), value.clone());
            generated.insert(key, value);
        }

        Ok(Self {
            schema,
            binder,
            prefix: prefix.to_string(),
            expectations,
            generated,
            ambient: PropertySet::new(),
        })
    }

    /// Adds unrelated properties to the supplied set.
    ///
    /// They are expected to stay unconsumed and are accounted for as such.
    #[must_use]
    pub fn with_ambient(mut self, ambient: PropertySet) -> Self {
        self.ambient.merge(ambient);
        self
    }

    /// Synthetic values by external key.
    pub fn expectations(&self) -> &BTreeMap<&'static str, String> {
        &self.expectations
    }

    /// The full property set handed to the binder.
    pub fn properties(&self) -> PropertySet {
        let mut properties = self.ambient.clone();
        properties.merge(self.generated.clone());
        properties
    }
}

const MAX_DRAWS: usize = 1024;

/// Draws a synthetic value for `field` that no earlier field of the same
/// value type received in this scenario.
fn draw_distinct<T>(
    field: &BindableField<T>,
    key: &str,
    taken: &mut HashSet<String>,
) -> Result<String, VerifyError> {
    for _ in 0..MAX_DRAWS {
        let value = field
            .accessor
            .synthesize(Uuid::new_v4())
            .ok_or_else(|| VerifyError::Unsynthesizable(key.to_string()))?;
        if taken.insert(value.clone()) {
            return Ok(value);
        }
    }
    Err(VerifyError::DomainExhausted {
        key: key.to_string(),
        value_type: field.value_type(),
    })
}

impl<T: Default> Scenario<'_, T> {
    /// Binds the scenario's properties and checks the result.
    pub fn run(self) -> Result<VerificationReport, Error> {
        let binder = &self.binder;
        if let Some(key) = self.ambient.keys().find(|key| self.generated.contains_key(key)) {
            return Err(VerifyError::AmbientCollision(key.to_string()).into());
        }

        let properties = self.properties();
        let result = binder.bind(self.schema, &self.prefix, &properties)?;

        let mut assertions = 0;
        for field in self.schema.fields() {
            let key = field.external_key();
            let expected = self.expectations.get(key).cloned().unwrap_or_default();
            let actual = field.accessor.render(result.instance());
            if actual.as_deref() != Some(expected.as_str()) {
                return Err(VerifyError::FieldMismatch {
                    key: binder.qualify(&self.prefix, key),
                    expected,
                    actual,
                }
                .into());
            }
            assertions += 1;
        }

        let ledger = reconcile(&properties, &result);
        let stray: Vec<String> = ledger
            .unconsumed
            .iter()
            .filter(|key| !self.ambient.contains_key(key))
            .cloned()
            .collect();
        if !stray.is_empty() {
            return Err(UnconsumedPropertyError {
                supplied: ledger.supplied_count,
                consumed: ledger.consumed_count,
                unconsumed: stray,
            }
            .into());
        }

        let fields = self.schema.len();
        if assertions != fields
            || ledger.consumed_count != fields
            || ledger.supplied_count != fields + self.ambient.len()
        {
            return Err(VerifyError::AssertionCount {
                assertions,
                fields,
                supplied: ledger.supplied_count,
                consumed: ledger.consumed_count,
            }
            .into());
        }

        info!(
            type_name = self.schema.type_name(),
            prefix = %self.prefix,
            assertions,
            ambient = self.ambient.len(),
            "config schema verified"
        );
        Ok(VerificationReport {
            type_name: self.schema.type_name(),
            prefix: self.prefix,
            assertions,
            ledger,
            ambient: self.ambient.len(),
        })
    }
}
