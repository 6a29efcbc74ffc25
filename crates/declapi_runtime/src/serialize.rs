//! Compiled-fact cache persistence.
//!
//! A cache file ending in `.json` is written as JSON; anything else uses
//! `MessagePack`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use declapi_foundation::{Error, ErrorKind, Result};
use tracing::info;

use crate::cache::FactCache;

fn serialization_error(e: impl ToString) -> Error {
    Error::new(ErrorKind::SerializationError(e.to_string()))
}

/// Serializes a cache to `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(cache: &FactCache) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(cache).map_err(serialization_error)
}

/// Deserializes a cache from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes(bytes: &[u8]) -> Result<FactCache> {
    rmp_serde::from_slice(bytes).map_err(serialization_error)
}

/// Serializes a cache to pretty-printed JSON, `{"<declaration>": [fields]}`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(cache: &FactCache) -> Result<String> {
    serde_json::to_string_pretty(cache).map_err(serialization_error)
}

/// Deserializes a cache from JSON.
///
/// # Errors
///
/// Returns an error if the text is not a JSON object of string arrays.
pub fn from_json(text: &str) -> Result<FactCache> {
    serde_json::from_str(text).map_err(serialization_error)
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Saves a cache to a file, overwriting it.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn save_to_file<P: AsRef<Path>>(cache: &FactCache, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = if is_json(path) {
        to_json(cache)?.into_bytes()
    } else {
        to_bytes(cache)?
    };

    let file = File::create(path).map_err(|e| {
        Error::io(format!("failed to create file '{}': {e}", path.display()))
    })?;
    let mut writer = BufWriter::new(file);

    writer.write_all(&bytes).map_err(|e| {
        Error::io(format!("failed to write to file '{}': {e}", path.display()))
    })?;
    writer.flush().map_err(|e| {
        Error::io(format!("failed to flush file '{}': {e}", path.display()))
    })?;

    info!(path = %path.display(), entries = cache.len(), "saved fact cache");
    Ok(())
}

/// Loads a cache from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or deserialization fails.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<FactCache> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::io(format!("failed to open file '{}': {e}", path.display()))
    })?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| {
        Error::io(format!("failed to read file '{}': {e}", path.display()))
    })?;

    let cache = if is_json(path) {
        let text = String::from_utf8(bytes).map_err(serialization_error)?;
        from_json(&text)?
    } else {
        from_bytes(&bytes)?
    };
    info!(path = %path.display(), entries = cache.len(), "loaded fact cache");
    Ok(cache)
}
