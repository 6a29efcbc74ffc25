//! The collaborators a runtime dispatches to.
//!
//! REST declarations go through a [`Transport`]; local-storage declarations
//! go through a [`Storage`]. Both are supplied by the embedding application
//! when the runtime is built.

use std::collections::HashMap;
use std::sync::RwLock;

use declapi_foundation::{Error, ErrorKind, HttpMethod, Payload, Result};
use serde_json::{Value, json};

/// Sends a resolved REST request.
pub trait Transport: Send + Sync {
    /// Sends `body` (if any) to `url` with `method`, returning the response.
    ///
    /// # Errors
    ///
    /// Implementations report their own failures, typically as
    /// [`ErrorKind::Transport`].
    fn send(&self, url: &str, method: HttpMethod, body: Option<&Payload>) -> Result<Value>;
}

impl<F> Transport for F
where
    F: Fn(&str, HttpMethod, Option<&Payload>) -> Result<Value> + Send + Sync,
{
    fn send(&self, url: &str, method: HttpMethod, body: Option<&Payload>) -> Result<Value> {
        self(url, method, body)
    }
}

/// Key-value persistence for local-storage declarations.
pub trait Storage: Send + Sync {
    /// Stores `data` under `key`, replacing what was there.
    ///
    /// # Errors
    ///
    /// Implementations report their own failures, typically as
    /// [`ErrorKind::Storage`].
    fn store(&self, key: &str, data: &Payload) -> Result<()>;

    /// Retrieves the value under `key`, or `null` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Implementations report their own failures.
    fn retrieve(&self, key: &str) -> Result<Value>;
}

/// A transport that answers every request with a description of it.
///
/// Used by the CLI's `resolve` command and handy in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct EchoTransport;

impl Transport for EchoTransport {
    fn send(&self, url: &str, method: HttpMethod, body: Option<&Payload>) -> Result<Value> {
        Ok(json!({
            "method": method,
            "url": url,
            "body": body,
        }))
    }
}

/// In-process storage backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, Value>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> Error {
    Error::new(ErrorKind::Storage("storage lock poisoned".to_string()))
}

impl Storage for MemoryStorage {
    fn store(&self, key: &str, data: &Payload) -> Result<()> {
        self.slots
            .write()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), Value::Object(data.clone()));
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Value> {
        Ok(self
            .slots
            .read()
            .map_err(|_| poisoned())?
            .get(key)
            .cloned()
            .unwrap_or(Value::Null))
    }
}
