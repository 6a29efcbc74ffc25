//! Turning declaration sources into cache entries.

use std::path::PathBuf;

use declapi_foundation::{Error, ErrorContext, Result};
use declapi_language::{CompilationResult, compile_batch};
use declapi_source::{ExtractedDeclaration, SourceUnit, extract};

/// A summary of one bulk load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Files that were scanned.
    pub files: usize,
    /// Declarations compiled into the cache.
    pub declarations: usize,
    /// Files that held no declaration.
    pub empty_files: Vec<PathBuf>,
}

/// Compiles every declaration found in `source`.
///
/// Every result is returned, failures included. Nothing is cached.
///
/// # Errors
///
/// Fails only if a declaration cannot be extracted from the text.
pub fn validate_source(source: &str) -> Result<Vec<CompilationResult>> {
    Ok(compile_declarations(&extract(source)?))
}

fn compile_declarations(declarations: &[ExtractedDeclaration]) -> Vec<CompilationResult> {
    compile_batch(
        declarations
            .iter()
            .map(|d| (&d.declaration, &d.request_fields)),
    )
}

/// Compiles one source unit, all-or-nothing.
///
/// # Errors
///
/// Returns the first rejected declaration as a compilation error carrying
/// the unit's path and the declaration's line.
pub(crate) fn compile_unit(unit: &SourceUnit) -> Result<Vec<CompilationResult>> {
    let results = compile_declarations(&unit.declarations);

    let failure = results
        .iter()
        .zip(&unit.declarations)
        .find(|(result, _)| !result.is_ok());
    if let Some((result, extracted)) = failure {
        let message = result.error_message().unwrap_or_default();
        return Err(Error::compilation(&result.declaration, message).with_context(
            ErrorContext::new()
                .with_source(&unit.path)
                .with_line(extracted.line),
        ));
    }
    Ok(results)
}
