//! Prefix-scoped providers that yield bound configuration instances.

use std::collections::BTreeSet;

use crate::bind::{BindError, BindingResult, ConfigBinder, PropertySet};
use crate::schema::Configurable;
use crate::Error;

/// Yields an instance of `T` bound from the properties under one prefix.
///
/// The provider starts empty and holds a value once [`inject`](Self::inject)
/// succeeds.
///
/// ## Example
///
/// ```
/// use propbind::{configurable, ConfigBinder, ConfigProvider, PropertySet};
///
/// #[derive(Debug, Default)]
/// struct ServiceConfig {
///     timeout_ms: u64,
///     name: String,
/// }
///
/// configurable!(ServiceConfig {
///     timeout_ms => "timeout",
///     name => "",
/// });
///
/// let properties = PropertySet::new()
///     .with("svc.timeout", "500")
///     .with("svc.name", "alpha");
///
/// let mut provider = ConfigProvider::<ServiceConfig>::of("svc");
/// provider.inject(&properties, &ConfigBinder::new())?;
///
/// let config = provider.require()?;
/// assert_eq!(config.timeout_ms, 500);
/// # Ok::<(), propbind::Error>(())
/// ```
#[derive(Debug)]
pub struct ConfigProvider<T> {
    prefix: String,
    bound: Option<BindingResult<T>>,
}

impl<T: Configurable> ConfigProvider<T> {
    pub fn of(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            bound: None,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Binds `T` from `properties`, replacing any earlier value.
    ///
    /// On failure the provider is left empty.
    pub fn inject(&mut self, properties: &PropertySet, binder: &ConfigBinder) -> Result<(), BindError> {
        self.bound = None;
        self.bound = Some(binder.bind_type::<T>(&self.prefix, properties)?);
        Ok(())
    }

    pub fn get(&self) -> Option<&T> {
        self.bound.as_ref().map(BindingResult::instance)
    }

    /// Like [`get`](Self::get), but an empty provider is an error.
    pub fn require(&self) -> Result<&T, Error> {
        self.get().ok_or_else(|| Error::NotInjected(self.prefix.clone()))
    }

    /// Keys read by the last successful injection.
    pub fn consumed_keys(&self) -> Option<&BTreeSet<String>> {
        self.bound.as_ref().map(BindingResult::consumed_keys)
    }

    pub fn into_inner(self) -> Option<T> {
        self.bound.map(BindingResult::into_instance)
    }
}
