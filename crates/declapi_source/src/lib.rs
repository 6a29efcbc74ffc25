//! Declaration extraction and source scanning for declapi.
//!
//! Declarations live as quoted keys of TypeScript object types:
//!
//! ```text
//! "(Rest/get /users/:id selfMappings)": {
//!     req: { id: number },
//!     res: User
//! }
//! ```
//!
//! This crate provides:
//! - [`extract`] - A best-effort scanner pulling declarations and their
//!   request fields out of source text
//! - [`collect_source_files`] / [`read_units`] - Walking a declaration
//!   source directory

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod extract;
pub mod scan;

pub use extract::{ExtractedDeclaration, extract};
pub use scan::{SourceUnit, collect_source_files, read_units};
