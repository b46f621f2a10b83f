pub mod bind;
mod error;
pub mod provider;
pub mod schema;
pub mod verify;

pub use bind::{
    reconcile, BindError, BindingResult, ConfigBinder, ConversionError, Ledger, PropertyError,
    PropertySet, UnconsumedPropertyError,
};
pub use error::Error;
pub use provider::ConfigProvider;
pub use schema::{
    introspect, ConfigSchema, Configurable, SchemaCache, SchemaError, TypeDescriptor, ValueType,
};
pub use verify::{Scenario, VerificationHarness, VerificationReport, VerifyError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_types_reachable_from_root() {
        let cache = SchemaCache::new();
        assert!(cache.is_empty());

        let err: Error = VerifyError::Unsynthesizable("p.k".to_string()).into();
        assert!(matches!(err, Error::Verify(_)));

        let err: Error = UnconsumedPropertyError {
            supplied: 1,
            consumed: 0,
            unconsumed: vec!["p.k".to_string()],
        }
        .into();
        assert!(matches!(err, Error::Unconsumed(e) if e.unconsumed == ["p.k"]));

        let schema = schema::introspect_descriptor(TypeDescriptor::<()>::new("unit")).unwrap();
        let scenario: Scenario<'_, ()> = VerificationHarness::default().setup(&schema, "p").unwrap();
        let report: VerificationReport = scenario.run().unwrap();
        assert_eq!(report.assertions, 0);
    }
}
