//! Declaration splitting, keyword grammar, validators, and compiler for declapi.
//!
//! This crate provides:
//! - [`split`] - Splitting a declaration into keyword and arguments
//! - [`Keyword`] / [`ArgSpec`] / [`Category`] - The fixed keyword grammar
//! - [`FactContext`] - Mappings derived while validating a declaration
//! - [`compile`] - The reverse-positional validation driver
//!
//! The flow is: declaration → [`split`] → [`Form`] → validators → [`CompilationResult`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod compiler;
pub mod facts;
pub mod grammar;
pub mod syntax;
pub mod validate;

pub use compiler::{
    CompilationResult, CompileError, check, compile, compile_batch, derive_facts, first_error,
};
pub use facts::FactContext;
pub use grammar::{ArgSpec, Category, Keyword};
pub use syntax::{Form, split};
pub use validate::{SyntaxError, is_url, parse_map_literal, placeholders};
