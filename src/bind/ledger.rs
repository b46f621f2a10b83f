//! Accounting of supplied versus consumed properties after a bind.
//!
//! The binder itself never enforces full consumption: a property set may
//! carry keys for other schemas sharing the same namespace. Callers that
//! expect every property to be used reconcile and check the ledger.

use serde::Serialize;
use tracing::warn;

use super::{BindingResult, PropertySet, UnconsumedPropertyError};

/// Counts for one bind run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ledger {
    pub supplied_count: usize,
    pub consumed_count: usize,
    /// Supplied keys the bind never read, in key order.
    pub unconsumed: Vec<String>,
}

impl Ledger {
    pub fn is_balanced(&self) -> bool {
        self.supplied_count == self.consumed_count
    }

    /// Fails when anything supplied was left unbound.
    ///
    /// Fields with no supplied property are invisible here; under-supply is
    /// detected only by comparing against the schema.
    pub fn assert_fully_consumed(&self) -> Result<(), UnconsumedPropertyError> {
        if self.is_balanced() {
            return Ok(());
        }
        warn!(
            supplied = self.supplied_count,
            consumed = self.consumed_count,
            unconsumed = ?self.unconsumed,
            "properties left unconsumed"
        );
        Err(UnconsumedPropertyError {
            supplied: self.supplied_count,
            consumed: self.consumed_count,
            unconsumed: self.unconsumed.clone(),
        })
    }
}

/// Builds the ledger for `result`, which must come from binding `properties`.
pub fn reconcile<T>(properties: &PropertySet, result: &BindingResult<T>) -> Ledger {
    let consumed = result.consumed_keys();
    Ledger {
        supplied_count: properties.len(),
        consumed_count: consumed.len(),
        unconsumed: properties
            .keys()
            .filter(|key| !consumed.contains(*key))
            .map(str::to_string)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::ConfigBinder;
    use crate::schema::introspect;

    #[derive(Debug, Default)]
    struct Service {
        timeout_ms: u32,
        name: String,
    }

    crate::configurable!(Service {
        timeout_ms => "timeout",
        name => "name",
    });

    fn bind(properties: &PropertySet) -> BindingResult<Service> {
        let schema = introspect::<Service>().unwrap();
        ConfigBinder::new().bind(&schema, "svc", properties).unwrap()
    }

    #[test]
    fn test_exact_supply_is_balanced() {
        let properties = PropertySet::new()
            .with("svc.timeout", "500")
            .with("svc.name", "alpha");
        let ledger = reconcile(&properties, &bind(&properties));

        assert_eq!(ledger.supplied_count, 2);
        assert_eq!(ledger.consumed_count, 2);
        assert!(ledger.unconsumed.is_empty());
        ledger.assert_fully_consumed().unwrap();
    }

    #[test]
    fn test_typoed_key_is_reported() {
        let properties = PropertySet::new()
            .with("svc.timeout", "500")
            .with("svc.nmae", "alpha");
        let ledger = reconcile(&properties, &bind(&properties));

        let err = ledger.assert_fully_consumed().unwrap_err();
        assert_eq!(err.supplied, 2);
        assert_eq!(err.consumed, 1);
        assert_eq!(err.unconsumed, ["svc.nmae"]);
    }

    #[test]
    fn test_under_supply_is_not_detected() {
        let properties = PropertySet::new().with("svc.name", "alpha");
        let ledger = reconcile(&properties, &bind(&properties));

        assert!(ledger.is_balanced());
        assert_eq!(ledger.consumed_count, 1);
    }

    #[test]
    fn test_empty_bind() {
        let properties = PropertySet::new();
        let ledger = reconcile(&properties, &bind(&properties));
        assert_eq!(ledger.consumed_count, 0);
        assert!(ledger.is_balanced());
    }
}
