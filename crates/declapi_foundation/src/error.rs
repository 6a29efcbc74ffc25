//! Error types for the declapi system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for declapi operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a compilation failure for a declaration.
    #[must_use]
    pub fn compilation(declaration: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Compilation {
            declaration: declaration.into(),
            message: message.into(),
        })
    }

    /// Creates a cache-miss error for a declaration that was never compiled.
    #[must_use]
    pub fn not_compiled(declaration: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotCompiled(declaration.into()))
    }

    /// Creates a missing declaration source error.
    #[must_use]
    pub fn source_not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(ErrorKind::SourceNotFound(path.into()))
    }

    /// Creates a missing request data error.
    #[must_use]
    pub fn missing_request_data(field: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingRequestData(field.into()))
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IoError(message.into()))
    }

    /// Returns true if this error is a cache miss.
    #[must_use]
    pub fn is_not_compiled(&self) -> bool {
        matches!(self.kind, ErrorKind::NotCompiled(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A declaration failed grammar validation.
    #[error("ERROR when compiling '{declaration}': {message}")]
    Compilation {
        /// The declaration text as written in the source.
        declaration: String,
        /// The compiler's message, e.g. `Invalid keyword.`.
        message: String,
    },

    /// A declaration was evaluated before it was compiled.
    #[error("No compilation found for the declaration. Call compile_all before evaluating it.")]
    NotCompiled(String),

    /// The declaration source directory does not exist.
    #[error("Add the data access layer to your project root folder before compiling.")]
    SourceNotFound(PathBuf),

    /// A runtime was built without one of its collaborators.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// A store operation was invoked without any data.
    #[error("Data should not be null on store operation.")]
    EmptyStoreData,

    /// A URL placeholder had no value in the request data.
    #[error("no value for '{0}' in the request data")]
    MissingRequestData(String),

    /// Declaration text could not be isolated from its source.
    #[error("unable to extract the declaration from: {0}")]
    MalformedDeclaration(String),

    /// The transport collaborator failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The storage collaborator failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error (file operations).
    #[error("I/O error: {0}")]
    IoError(String),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file the declaration came from.
    pub source: Option<PathBuf>,
    /// Line number in source.
    pub line: Option<u32>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source file.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line.
    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {}", source.display())?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
        } else if let Some(line) = self.line {
            write!(f, "at line {line}")?;
        }
        Ok(())
    }
}
