//! Resolving a compiled declaration into a concrete request.
//!
//! Resolution is pure: it reads the declaration, its facts, and the payload,
//! and describes what should be sent or stored. Dispatch happens in
//! [`Runtime::evaluate`](crate::Runtime::evaluate).

use declapi_foundation::{
    Error, ErrorKind, HttpMethod, Mapping, Payload, Result, render_value,
};
use declapi_language::{FactContext, Form, Keyword};
use serde::Serialize;

/// What evaluating a declaration does.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RequestDescriptor {
    /// Send a REST request.
    Rest(RestCall),
    /// Read or write local storage.
    Storage(StorageOp),
}

/// A resolved REST request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RestCall {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The URL with every placeholder substituted.
    pub url: String,
    /// The request body; always `None` for `get`.
    pub body: Option<Payload>,
}

/// A resolved local-storage operation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StorageOp {
    /// The storage key.
    pub key: String,
    /// True for `set-in`, false for `get-in`.
    pub write: bool,
    /// The data to store; `None` for reads and for writes without data.
    pub data: Option<Payload>,
}

/// Resolves a validated declaration against a payload.
///
/// URL mappings are applied in their insertion order. Each placeholder
/// `:name` is replaced only as a whole token: a path placeholder becomes the
/// value itself, a query placeholder becomes `name=value`. Payload values are
/// looked up by the mapping's key.
///
/// # Errors
///
/// Returns [`ErrorKind::MissingRequestData`] if the URL uses a mapped
/// placeholder whose value is absent from the payload, or an internal error
/// if the declaration lacks its first argument.
pub fn resolve(
    keyword: Keyword,
    form: &Form<'_>,
    facts: &FactContext,
    payload: &Payload,
) -> Result<RequestDescriptor> {
    let target = form
        .arg(0)
        .ok_or_else(|| Error::new(ErrorKind::Internal(format!("{keyword} has no target"))))?;

    let Some(method) = keyword.http_method() else {
        let write = keyword == Keyword::LocalSetIn;
        return Ok(RequestDescriptor::Storage(StorageOp {
            key: target.to_string(),
            write,
            data: (write && !payload.is_empty()).then(|| payload.clone()),
        }));
    };

    let url = format_url(target, facts.url_mappings.as_ref(), payload)?;
    let body = method
        .has_body()
        .then(|| request_body(facts.body_mappings.as_ref(), payload));

    Ok(RequestDescriptor::Rest(RestCall { method, url, body }))
}

/// Substitutes mapped placeholders into a URL template.
///
/// # Errors
///
/// See [`resolve`].
pub fn format_url(template: &str, mappings: Option<&Mapping>, payload: &Payload) -> Result<String> {
    let (mut path, mut query) = match template.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (template.to_string(), None),
    };

    for key in mappings.into_iter().flat_map(Mapping::keys) {
        let value = || {
            payload
                .get(key)
                .map(render_value)
                .ok_or_else(|| Error::missing_request_data(key))
        };
        path = substitute(&path, key, value)?;
        query = query
            .map(|q| substitute(&q, key, || Ok(format!("{key}={}", value()?))))
            .transpose()?;
    }

    Ok(match query {
        Some(query) => format!("{path}?{query}"),
        None => path,
    })
}

/// Replaces every whole-token `:key` in `text`.
///
/// `replacement` is only called when a replacement happens.
fn substitute(
    text: &str,
    key: &str,
    replacement: impl Fn() -> Result<String>,
) -> Result<String> {
    let needle = format!(":{key}");
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(&needle) {
        let end = start + needle.len();
        out.push_str(&rest[..start]);
        if rest[end..].chars().next().is_some_and(is_word_char) {
            out.push_str(&needle);
        } else {
            out.push_str(&replacement()?);
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    Ok(out)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Builds a request body from the body mappings.
///
/// Keys absent from the payload are omitted.
#[must_use]
pub fn request_body(mappings: Option<&Mapping>, payload: &Payload) -> Payload {
    mappings
        .into_iter()
        .flat_map(Mapping::keys)
        .filter_map(|key| payload.get(key).map(|value| (key.to_string(), value.clone())))
        .collect()
}
