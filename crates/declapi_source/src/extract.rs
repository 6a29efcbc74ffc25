//! Pulling declarations out of source text.
//!
//! This is a text scanner, not a parser: it knows nothing about the host
//! language beyond the shape of a declaration site.

use std::sync::LazyLock;

use declapi_foundation::{Error, ErrorContext, ErrorKind, Result};
use regex::Regex;

/// A quoted `(...)` key followed by `: { req:`.
static SITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(\([^"\n]*)"\s*:\s*\{\s*req\s*:"#).expect("site pattern is valid")
});

/// The `{ ... }` block right after `req:`, up to its first `}`.
static REQ_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\{([^}]*)\}").expect("request block pattern is valid"));

/// An identifier key, optional keys (`name?:`) included.
static FIELD_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"((?-u:\w)+)\s*\??\s*:").expect("field key pattern is valid"));

/// A declaration found in source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedDeclaration {
    /// The declaration text, e.g. `(Rest/get /users/:id selfMappings)`.
    pub declaration: String,
    /// Request field names from the `req` block, in order, without duplicates.
    pub request_fields: Vec<String>,
    /// 1-based line of the declaration in the source.
    pub line: u32,
}

/// Extracts every declaration site from source text.
///
/// Text without any declaration yields an empty list.
///
/// # Errors
///
/// Returns [`ErrorKind::MalformedDeclaration`] when a site is found but the
/// declaration cannot be isolated: the quoted key does not close its
/// parenthesis, or the `req` block is not a `{ ... }` object.
pub fn extract(source: &str) -> Result<Vec<ExtractedDeclaration>> {
    SITE.captures_iter(source)
        .map(|caps| {
            let site = caps.get(0).expect("group 0 is the whole match");
            let declaration = &caps[1];
            let line = line_of(source, site.start());

            if !declaration.trim_end().ends_with(')') {
                return Err(malformed(site.as_str(), line));
            }

            let block = REQ_BLOCK
                .captures(&source[site.end()..])
                .ok_or_else(|| malformed(site.as_str(), line))?;

            Ok(ExtractedDeclaration {
                declaration: declaration.to_string(),
                request_fields: field_keys(&block[1]),
                line,
            })
        })
        .collect()
}

fn field_keys(block: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for caps in FIELD_KEY.captures_iter(block) {
        let key = &caps[1];
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

#[allow(clippy::cast_possible_truncation)]
fn line_of(source: &str, offset: usize) -> u32 {
    source[..offset].matches('\n').count() as u32 + 1
}

fn malformed(site: &str, line: u32) -> Error {
    Error::new(ErrorKind::MalformedDeclaration(site.to_string()))
        .with_context(ErrorContext::new().with_line(line))
}
