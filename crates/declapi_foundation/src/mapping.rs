//! Insertion-ordered name mappings.
//!
//! A [`Mapping`] associates a placeholder or body-field name with the request
//! field it reads from. Iteration follows insertion order, which is also the
//! order URL placeholders are substituted in.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// An insertion-ordered dictionary from a name to a request field name.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<(String, String)>,
}

impl Mapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the identity mapping over the given field names.
    ///
    /// Each field maps to itself.
    #[must_use]
    pub fn identity<S: AsRef<str>>(fields: &[S]) -> Self {
        fields
            .iter()
            .map(|f| (f.as_ref().to_string(), f.as_ref().to_string()))
            .collect()
    }

    /// Inserts a mapping, replacing the target of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, target: impl Into<String>) {
        let key = key.into();
        let target = target.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = target;
        } else {
            self.entries.push((key, target));
        }
    }

    /// Returns the target field for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, t)| t.as_str())
    }

    /// Returns true if the key is mapped.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates over `(key, target)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t.as_str()))
    }
}

impl<K: Into<String>, T: Into<String>> FromIterator<(K, T)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (key, target) in iter {
            mapping.insert(key, target);
        }
        mapping
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl fmt::Display for Mapping {
    /// Renders the mapping in declaration syntax: `{:key target ...}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, target)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, ":{key} {target}")?;
        }
        write!(f, "}}")
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, target) in self.iter() {
            map.serialize_entry(key, target)?;
        }
        map.end()
    }
}
