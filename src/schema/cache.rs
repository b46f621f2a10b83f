//! Build-once, read-many schema cache keyed by configuration type.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::debug;

use super::describe::Configurable;
use super::introspect::{introspect, ConfigSchema};
use super::SchemaError;

type Entry = Arc<dyn Any + Send + Sync>;

/// Caches derived schemas by type identity.
///
/// Lookups share a read lock. A miss introspects outside the lock and then
/// stores the result with entry-or-insert, so concurrent first uses of the
/// same type all observe whichever schema was stored first. Failed
/// introspections are not cached.
#[derive(Default)]
pub struct SchemaCache {
    entries: RwLock<HashMap<TypeId, Entry>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache.
    pub fn global() -> &'static SchemaCache {
        static GLOBAL: OnceLock<SchemaCache> = OnceLock::new();
        GLOBAL.get_or_init(SchemaCache::new)
    }

    /// Returns the cached schema of `T`, deriving it on first use.
    pub fn get_or_introspect<T: Configurable>(&self) -> Result<Arc<ConfigSchema<T>>, SchemaError> {
        let id = TypeId::of::<T>();

        let cached = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned();
        if let Some(entry) = cached {
            if let Ok(schema) = entry.downcast::<ConfigSchema<T>>() {
                return Ok(schema);
            }
        }

        let schema = Arc::new(introspect::<T>()?);
        debug!(type_name = schema.type_name(), fields = schema.len(), "cached config schema");

        let stored = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_insert_with(|| schema.clone() as Entry)
            .clone();

        // Entries are keyed by `TypeId`, so the stored value always has type `T`.
        Ok(stored.downcast::<ConfigSchema<T>>().unwrap_or(schema))
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCache").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[derive(Debug, Default)]
    struct Pool {
        size: u32,
    }

    crate::configurable!(Pool { size => "" });

    #[derive(Debug, Default)]
    struct Broken {
        a: String,
        b: String,
    }

    crate::configurable!(Broken { a => "x", b => "x" });

    #[test]
    fn test_repeated_lookup_returns_same_schema() {
        let cache = SchemaCache::new();
        let first = cache.get_or_introspect::<Pool>().unwrap();
        let second = cache.get_or_introspect::<Pool>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_first_use_converges() {
        let cache = SchemaCache::new();
        let schemas: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.get_or_introspect::<Pool>().unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for schema in &schemas[1..] {
            assert!(Arc::ptr_eq(&schemas[0], schema));
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = SchemaCache::new();
        assert!(matches!(
            cache.get_or_introspect::<Broken>(),
            Err(SchemaError::DuplicateKey { .. })
        ));
        assert!(cache.is_empty());
    }
}
