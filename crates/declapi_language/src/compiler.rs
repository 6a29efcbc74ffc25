//! The validation driver.
//!
//! Compiling a declaration splits it, looks up its keyword's grammar, and
//! runs the validators over the arguments. The outcome is a
//! [`CompilationResult`]; the derived [`FactContext`] is what the runtime
//! resolves requests from.

use declapi_foundation::{Error, Result};
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

use crate::facts::FactContext;
use crate::grammar::{ArgSpec, Keyword};
use crate::syntax::{Form, split};
use crate::validate::{SyntaxError, validate};

/// Why a declaration was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The head of the declaration is not a known keyword.
    #[error("Invalid keyword.")]
    InvalidKeyword,
    /// The argument at `position` (0-based) failed validation.
    ///
    /// The message always uses the `st` suffix, whatever the position.
    #[error("Error on the {}st argument: {source}", .position + 1)]
    Argument {
        /// 0-based argument position.
        position: usize,
        /// The validator's error.
        source: SyntaxError,
    },
}

/// The outcome of compiling one declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationResult {
    /// The declaration text, exactly as written.
    pub declaration: String,
    /// The request fields the declaration was compiled against.
    pub request_fields: Vec<String>,
    /// The rejection reason, if any.
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<CompileError>,
}

impl CompilationResult {
    /// Returns true if the declaration compiled.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the error message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Converts a failed result into an [`Error`].
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Compilation`](declapi_foundation::ErrorKind::Compilation)
    /// if the declaration was rejected.
    pub fn into_result(self) -> Result<Self> {
        match &self.error {
            Some(err) => Err(Error::compilation(&self.declaration, err.to_string())),
            None => Ok(self),
        }
    }
}

#[allow(clippy::ref_option)]
fn serialize_error<S: Serializer>(
    error: &Option<CompileError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Compiles a declaration against its request fields.
///
/// Logs each successful compilation at debug level.
#[must_use]
pub fn compile(declaration: &str, request_fields: &[String]) -> CompilationResult {
    let error = derive_facts(declaration, request_fields.to_vec()).err();
    if error.is_none() {
        debug!(declaration, ?request_fields, "compiled successfully");
    }
    CompilationResult {
        declaration: declaration.to_string(),
        request_fields: request_fields.to_vec(),
        error,
    }
}

/// Compiles a declaration and returns its keyword and derived facts.
///
/// # Errors
///
/// Returns [`CompileError::InvalidKeyword`] for an unknown keyword (no
/// validator runs), or the first failing argument.
pub fn derive_facts(
    declaration: &str,
    request_fields: Vec<String>,
) -> std::result::Result<(Keyword, FactContext), CompileError> {
    let form = split(declaration);
    let mut facts = FactContext::new(request_fields);
    let keyword = check(&form, &mut facts)?;
    Ok((keyword, facts))
}

/// Validates a split declaration into `facts`.
///
/// # Errors
///
/// See [`derive_facts`].
pub fn check(form: &Form<'_>, facts: &mut FactContext) -> std::result::Result<Keyword, CompileError> {
    let keyword = Keyword::parse(form.keyword).ok_or(CompileError::InvalidKeyword)?;
    validate_in_reverse(keyword.grammar(), form, facts)?;
    Ok(keyword)
}

/// Runs the grammar from the last position down to the first.
///
/// Invariant: mapping directives sit after the URL they describe, so they
/// must run first to establish the facts the URL validator checks. Walking
/// forward would validate the URL against empty mappings.
fn validate_in_reverse(
    grammar: &[ArgSpec],
    form: &Form<'_>,
    facts: &mut FactContext,
) -> std::result::Result<(), CompileError> {
    for (position, spec) in grammar.iter().enumerate().rev() {
        validate(*spec, form.arg(position), facts)
            .map_err(|source| CompileError::Argument { position, source })?;
    }
    Ok(())
}

/// Compiles every entry of a batch, in encounter order.
///
/// Every result is returned, failures included; see [`first_error`].
pub fn compile_batch<I, D, F>(entries: I) -> Vec<CompilationResult>
where
    I: IntoIterator<Item = (D, F)>,
    D: AsRef<str>,
    F: AsRef<[String]>,
{
    entries
        .into_iter()
        .map(|(declaration, fields)| compile(declaration.as_ref(), fields.as_ref()))
        .collect()
}

/// Returns the first failed result of a batch.
#[must_use]
pub fn first_error(results: &[CompilationResult]) -> Option<&CompilationResult> {
    results.iter().find(|r| !r.is_ok())
}
