//! Runtime request data.

use serde_json::Value;

/// The data a caller passes when evaluating a declaration.
///
/// Keys are request field names; values are arbitrary JSON.
pub type Payload = serde_json::Map<String, Value>;

/// Renders a payload value for substitution into a URL.
///
/// Strings are written without quotes; every other value uses its JSON text.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
