//! Walking a declaration source directory.

use std::fs;
use std::path::{Path, PathBuf};

use declapi_foundation::{Error, ErrorContext, Result};
use tracing::{debug, warn};

use crate::extract::{ExtractedDeclaration, extract};

/// The declarations of one source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceUnit {
    /// The file the declarations were read from.
    pub path: PathBuf,
    /// Declarations in file order.
    pub declarations: Vec<ExtractedDeclaration>,
}

/// Recursively collects files under `root` whose extension is one of
/// `extensions` (without the leading dot), sorted by path.
///
/// # Errors
///
/// Returns [`ErrorKind::SourceNotFound`](declapi_foundation::ErrorKind::SourceNotFound)
/// if `root` does not exist, or an I/O error if a directory cannot be read.
pub fn collect_source_files<S: AsRef<str>>(root: &Path, extensions: &[S]) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(Error::source_not_found(root));
    }
    let mut files = Vec::new();
    walk(root, extensions, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk<S: AsRef<str>>(dir: &Path, extensions: &[S], files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .map_err(|e| Error::io(format!("failed to read directory '{}': {e}", dir.display())))?;

    for entry in entries {
        let path = entry
            .map_err(|e| Error::io(format!("failed to read entry in '{}': {e}", dir.display())))?
            .path();
        if path.is_dir() {
            walk(&path, extensions, files)?;
        } else if has_extension(&path, extensions) {
            files.push(path);
        }
    }
    Ok(())
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.as_ref() == ext))
}

/// Reads and extracts every source file under `root`.
///
/// Files without declarations are kept (with an empty list) and logged.
///
/// # Errors
///
/// Fails like [`collect_source_files`], if a file cannot be read, or if a
/// file holds a malformed declaration (the error carries the file path).
pub fn read_units<S: AsRef<str>>(root: &Path, extensions: &[S]) -> Result<Vec<SourceUnit>> {
    collect_source_files(root, extensions)?
        .into_iter()
        .map(|path| {
            let source = fs::read_to_string(&path).map_err(|e| {
                Error::io(format!("failed to read file '{}': {e}", path.display()))
            })?;
            let declarations = extract(&source).map_err(|err| {
                let line = err.context.as_ref().and_then(|c| c.line);
                let mut context = ErrorContext::new().with_source(&path);
                if let Some(line) = line {
                    context = context.with_line(line);
                }
                err.with_context(context)
            })?;

            if declarations.is_empty() {
                warn!(path = %path.display(), "no api definition found");
            } else {
                debug!(path = %path.display(), count = declarations.len(), "extracted declarations");
            }
            Ok(SourceUnit { path, declarations })
        })
        .collect()
}
