//! The per-declaration fact context.

use declapi_foundation::Mapping;

/// Facts derived while validating one declaration.
///
/// Validators read and write these in place. A mapping directive (a map
/// literal, `selfMappings`, or `asBody`) establishes the mappings that the
/// URL validator later checks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FactContext {
    /// Known request field names, in declaration order.
    pub request_fields: Vec<String>,
    /// Placeholder name → request field, once a directive has set it.
    pub url_mappings: Option<Mapping>,
    /// Body field name → request field, once a directive has set it.
    pub body_mappings: Option<Mapping>,
}

impl FactContext {
    /// Creates a context that knows the given request fields.
    #[must_use]
    pub fn new(request_fields: Vec<String>) -> Self {
        Self {
            request_fields,
            url_mappings: None,
            body_mappings: None,
        }
    }

    /// Returns true if `field` is a known request field.
    #[must_use]
    pub fn knows_field(&self, field: &str) -> bool {
        self.request_fields.iter().any(|f| f == field)
    }

    /// Returns the identity mapping over the known request fields.
    #[must_use]
    pub fn identity(&self) -> Mapping {
        Mapping::identity(&self.request_fields)
    }
}
