//! Core types, errors, and mappings for declapi.
//!
//! This crate provides:
//! - [`Error`] - Rich error types with context
//! - [`Mapping`] - Insertion-ordered name mappings used by declarations
//! - [`Payload`] - The runtime request data handed to a declaration
//! - [`HttpMethod`] - The REST verbs a declaration can resolve to

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod mapping;
mod method;
mod payload;

pub use error::{Error, ErrorContext, ErrorKind};
pub use mapping::Mapping;
pub use method::HttpMethod;
pub use payload::{Payload, render_value};

/// Result type alias using declapi's Error type.
pub type Result<T> = std::result::Result<T, Error>;
