//! The runtime context.
//!
//! A [`Runtime`] owns the compiled-fact cache and the collaborators that
//! evaluated declarations are dispatched to. It is built once per process
//! with a [`RuntimeBuilder`] (or [`Runtime::setup`]), filled by
//! [`Runtime::compile_all`] or [`Runtime::load_entries`], and then used to
//! evaluate declarations from any thread.

use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use declapi_foundation::{Error, ErrorKind, Payload, Result};
use declapi_language::{FactContext, Keyword, compile_batch, derive_facts, first_error, split};
use declapi_source::read_units;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::FactCache;
use crate::collaborator::{Storage, Transport};
use crate::config::LoaderConfig;
use crate::loader::{LoadReport, compile_unit, validate_source};
use crate::request::{RequestDescriptor, resolve};

/// Builds a [`Runtime`].
///
/// Both collaborators are required.
#[derive(Default)]
pub struct RuntimeBuilder {
    transport: Option<Box<dyn Transport>>,
    storage: Option<Box<dyn Storage>>,
    config: LoaderConfig,
    cache: FactCache,
}

impl RuntimeBuilder {
    /// Creates a builder with the default configuration and an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the REST transport.
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Sets the local storage.
    #[must_use]
    pub fn storage(mut self, storage: impl Storage + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    /// Sets the loader configuration.
    #[must_use]
    pub fn config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Starts from a previously saved cache.
    #[must_use]
    pub fn cache(mut self, cache: FactCache) -> Self {
        self.cache = cache;
        self
    }

    /// Builds the runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingCollaborator`] naming the first missing
    /// collaborator.
    pub fn build(self) -> Result<Runtime> {
        let transport = self
            .transport
            .ok_or_else(|| Error::new(ErrorKind::MissingCollaborator("transport")))?;
        let storage = self
            .storage
            .ok_or_else(|| Error::new(ErrorKind::MissingCollaborator("storage")))?;

        Ok(Runtime {
            cache: RwLock::new(self.cache),
            transport,
            storage,
            config: self.config,
        })
    }
}

/// The compiled-fact cache plus its collaborators.
pub struct Runtime {
    cache: RwLock<FactCache>,
    transport: Box<dyn Transport>,
    storage: Box<dyn Storage>,
    config: LoaderConfig,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("compiled", &self.cache.read().map(|c| c.len()).ok())
            .finish_non_exhaustive()
    }
}

impl Runtime {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Builds a runtime and compiles every declaration under the
    /// configured source root.
    ///
    /// # Errors
    ///
    /// Fails like [`RuntimeBuilder::build`] and [`Runtime::compile_all`].
    pub fn setup(
        transport: impl Transport + 'static,
        storage: impl Storage + 'static,
        config: LoaderConfig,
    ) -> Result<Self> {
        let runtime = Self::builder()
            .transport(transport)
            .storage(storage)
            .config(config)
            .build()?;
        runtime.compile_all()?;
        Ok(runtime)
    }

    /// Returns the loader configuration.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    fn read_cache(&self) -> Result<RwLockReadGuard<'_, FactCache>> {
        self.cache
            .read()
            .map_err(|_| Error::new(ErrorKind::Internal("fact cache lock poisoned".to_string())))
    }

    fn write_cache(&self) -> Result<RwLockWriteGuard<'_, FactCache>> {
        self.cache
            .write()
            .map_err(|_| Error::new(ErrorKind::Internal("fact cache lock poisoned".to_string())))
    }

    /// Compiles every declaration under the configured source root.
    ///
    /// Files are processed in path order. Each file is all-or-nothing: the
    /// first rejected declaration aborts the load, leaving entries from
    /// earlier files cached and nothing from the failing one.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::SourceNotFound`] if the source root is missing,
    /// or the first compilation failure.
    pub fn compile_all(&self) -> Result<LoadReport> {
        let units = read_units(&self.config.source_root, &self.config.extensions)?;
        let mut report = LoadReport {
            files: units.len(),
            ..LoadReport::default()
        };

        for unit in &units {
            if unit.declarations.is_empty() {
                report.empty_files.push(unit.path.clone());
                continue;
            }
            let results = compile_unit(unit)?;
            let mut cache = self.write_cache()?;
            for result in &results {
                cache.record(result);
            }
            report.declarations += results.len();
            info!(path = %unit.path.display(), count = results.len(), "compiled declarations");
        }
        Ok(report)
    }

    /// Compiles `(declaration, request fields)` entries into the cache.
    ///
    /// All-or-nothing: if any entry is rejected, nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns the first compilation failure.
    pub fn load_entries<I, D, F>(&self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (D, F)>,
        D: AsRef<str>,
        F: AsRef<[String]>,
    {
        let results = compile_batch(entries);
        if let Some(failed) = first_error(&results) {
            let message = failed.error_message().unwrap_or_default();
            return Err(Error::compilation(&failed.declaration, message));
        }

        let mut cache = self.write_cache()?;
        for result in &results {
            cache.record(result);
        }
        Ok(results.len())
    }

    /// Compiles every declaration in `source` into the cache.
    ///
    /// # Errors
    ///
    /// Fails like [`validate_source`] or [`Runtime::load_entries`].
    pub fn compile_source(&self, source: &str) -> Result<usize> {
        let results = validate_source(source)?;
        self.load_entries(
            results
                .iter()
                .map(|r| (&r.declaration, &r.request_fields)),
        )
    }

    /// Returns true if the declaration is in the cache.
    ///
    /// A poisoned cache lock reads as not compiled.
    #[must_use]
    pub fn is_compiled(&self, declaration: &str) -> bool {
        self.read_cache().is_ok_and(|cache| cache.contains(declaration))
    }

    /// Returns a snapshot of the cache.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the cache lock is poisoned.
    pub fn cache(&self) -> Result<FactCache> {
        Ok(self.read_cache()?.clone())
    }

    /// Re-derives the facts of a compiled declaration.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotCompiled`] on a cache miss, or a compilation
    /// error if a loaded cache holds a declaration that no longer compiles.
    pub fn facts(&self, declaration: &str) -> Result<(Keyword, FactContext)> {
        let fields = self.read_cache()?.require(declaration)?.to_vec();
        derive_facts(declaration, fields)
            .map_err(|err| Error::compilation(declaration, err.to_string()))
    }

    /// Resolves a compiled declaration against a payload without
    /// dispatching it.
    ///
    /// # Errors
    ///
    /// Fails like [`Runtime::facts`] and [`resolve`].
    pub fn describe(&self, declaration: &str, payload: &Payload) -> Result<RequestDescriptor> {
        let (keyword, facts) = self.facts(declaration)?;
        resolve(keyword, &split(declaration), &facts, payload)
    }

    /// Evaluates a compiled declaration.
    ///
    /// REST declarations return the transport's response. `get-in` returns
    /// the stored value (`null` if nothing is stored). `set-in` stores the
    /// payload and returns `None`.
    ///
    /// # Errors
    ///
    /// Fails like [`Runtime::describe`], with [`ErrorKind::EmptyStoreData`]
    /// for a `set-in` with an empty payload, or with the collaborator's error.
    pub fn evaluate(&self, declaration: &str, payload: &Payload) -> Result<Option<Value>> {
        match self.describe(declaration, payload)? {
            RequestDescriptor::Rest(call) => {
                debug!(method = %call.method, url = %call.url, "sending request");
                self.transport
                    .send(&call.url, call.method, call.body.as_ref())
                    .map(Some)
            }
            RequestDescriptor::Storage(op) if op.write => {
                let data = op.data.ok_or_else(|| Error::new(ErrorKind::EmptyStoreData))?;
                debug!(key = %op.key, "storing");
                self.storage.store(&op.key, &data)?;
                Ok(None)
            }
            RequestDescriptor::Storage(op) => {
                debug!(key = %op.key, "retrieving");
                self.storage.retrieve(&op.key).map(Some)
            }
        }
    }
}
