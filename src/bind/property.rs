//! Flat string-keyed property collections.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};
use toml::{Table, Value};

use super::PropertyError;

/// A flat mapping from fully-qualified key to raw string value.
///
/// Keys are unique; inserting an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet {
    entries: BTreeMap<String, String>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a property, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merges `other` into this set; values from `other` win on conflicts.
    pub fn merge(&mut self, other: PropertySet) {
        self.entries.extend(other.entries);
    }

    /// Returns the properties whose keys live under `prefix`.
    ///
    /// An empty prefix selects every property.
    pub fn scoped(&self, prefix: &str, separator: &str) -> PropertySet {
        if prefix.is_empty() {
            return self.clone();
        }
        let head = format!("{prefix}{separator}");
        self.entries
            .iter()
            .filter(|(key, _)| key.starts_with(&head))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Flattens a TOML table into dotted keys.
    ///
    /// Nested tables contribute their path segments; scalar values are
    /// stored in their display form. Arrays have no flat representation and
    /// are rejected.
    pub fn from_toml(table: &Table) -> Result<Self, PropertyError> {
        let mut set = PropertySet::new();
        flatten_into(&mut set, "", table)?;
        Ok(set)
    }
}

fn flatten_into(set: &mut PropertySet, path: &str, table: &Table) -> Result<(), PropertyError> {
    for (key, value) in table {
        let full = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}.{key}")
        };
        match value {
            Value::Table(nested) => flatten_into(set, &full, nested)?,
            Value::String(s) => {
                set.insert(full, s.clone());
            }
            Value::Integer(i) => {
                set.insert(full, i.to_string());
            }
            Value::Float(f) => {
                set.insert(full, f.to_string());
            }
            Value::Boolean(b) => {
                set.insert(full, b.to_string());
            }
            Value::Datetime(dt) => {
                set.insert(full, dt.to_string());
            }
            Value::Array(_) => return Err(PropertyError::NonScalar(full)),
        }
    }
    Ok(())
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = PropertySet::new();
        set.extend(iter);
        set
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for PropertySet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for PropertySet {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut set = PropertySet::new().with("a.b", "1");
        assert_eq!(set.insert("a.b", "2").as_deref(), Some("1"));
        assert_eq!(set.get("a.b"), Some("2"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_merge_overrides() {
        let mut base: PropertySet = [("x", "1"), ("y", "2")].into_iter().collect();
        base.merge([("y", "3"), ("z", "4")].into_iter().collect());

        assert_eq!(base.len(), 3);
        assert_eq!(base.get("y"), Some("3"));
        assert_eq!(base.get("z"), Some("4"));
    }

    #[test]
    fn test_scoped_selects_prefix() {
        let set: PropertySet = [
            ("svc.name", "alpha"),
            ("svc.timeout", "500"),
            ("svcx.name", "beta"),
            ("other", "x"),
        ]
        .into_iter()
        .collect();

        let scoped = set.scoped("svc", ".");
        assert_eq!(scoped.keys().collect::<Vec<_>>(), ["svc.name", "svc.timeout"]);
        assert_eq!(set.scoped("", ".").len(), 4);
    }

    #[test]
    fn test_from_toml_flattens_tables() {
        let table: Table = toml::from_str(
            r#"
            [svc]
            name = "alpha"
            timeout = 500
            ratio = 0.5
            enabled = true

            [svc.pool]
            size = 4
            "#,
        )
        .unwrap();

        let set = PropertySet::from_toml(&table).unwrap();
        assert_eq!(set.get("svc.name"), Some("alpha"));
        assert_eq!(set.get("svc.timeout"), Some("500"));
        assert_eq!(set.get("svc.ratio"), Some("0.5"));
        assert_eq!(set.get("svc.enabled"), Some("true"));
        assert_eq!(set.get("svc.pool.size"), Some("4"));
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_from_toml_rejects_arrays() {
        let table: Table = toml::from_str("hosts = [\"a\", \"b\"]").unwrap();
        let result = PropertySet::from_toml(&table);
        assert!(matches!(result, Err(PropertyError::NonScalar(key)) if key == "hosts"));
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let set = PropertySet::new().with("svc.name", "alpha");
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"svc.name":"alpha"}"#);

        let back: PropertySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
