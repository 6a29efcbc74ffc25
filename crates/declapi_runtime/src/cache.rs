//! The compiled-fact cache.
//!
//! Maps each compiled declaration, by its exact text, to the request fields
//! it was compiled against. Mappings are not stored: they are re-derived
//! from these fields whenever the declaration is evaluated.

use declapi_foundation::{Error, Result};
use declapi_language::CompilationResult;
use serde::{Deserialize, Serialize};

/// Declaration text → request field names.
///
/// Backed by a persistent map, so cloning a snapshot is O(1). Serializes as
/// a plain object, `{"(Rest/get ...)": ["id", ...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactCache {
    entries: im::OrdMap<String, Vec<String>>,
}

impl FactCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a declaration's fields, replacing any previous entry.
    ///
    /// Returns the fields previously recorded for it.
    pub fn insert(
        &mut self,
        declaration: impl Into<String>,
        request_fields: Vec<String>,
    ) -> Option<Vec<String>> {
        self.entries.insert(declaration.into(), request_fields)
    }

    /// Records a successful compilation. Failed results are ignored.
    pub fn record(&mut self, result: &CompilationResult) {
        if result.is_ok() {
            self.insert(result.declaration.clone(), result.request_fields.clone());
        }
    }

    /// Returns the fields a declaration was compiled against.
    #[must_use]
    pub fn get(&self, declaration: &str) -> Option<&[String]> {
        self.entries.get(declaration).map(Vec::as_slice)
    }

    /// Like [`get`](Self::get), but a miss is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotCompiled`](declapi_foundation::ErrorKind::NotCompiled)
    /// if the declaration was never compiled.
    pub fn require(&self, declaration: &str) -> Result<&[String]> {
        self.get(declaration)
            .ok_or_else(|| Error::not_compiled(declaration))
    }

    /// Returns true if the declaration has been compiled.
    #[must_use]
    pub fn contains(&self, declaration: &str) -> bool {
        self.entries.contains_key(declaration)
    }

    /// Returns the number of compiled declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }
}
