//! Compiled-fact cache, resolver, evaluator, and CLI for declapi.
//!
//! This crate provides:
//! - [`Runtime`] - The context object holding the compiled-fact cache and
//!   the transport and storage collaborators
//! - [`resolve`] - Turning a declaration plus a payload into a
//!   [`RequestDescriptor`]
//! - [`LoaderConfig`] - Where declaration sources live
//! - Cache serialization to JSON and `MessagePack`
//!
//! The lifecycle is: uncompiled → compiled (cached) → evaluable. A
//! declaration that never went through [`Runtime::compile_all`] (or
//! [`Runtime::load_entries`]) cannot be evaluated.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod collaborator;
pub mod config;
pub mod loader;
pub mod request;
pub mod runtime;
pub mod serialize;

pub use cache::FactCache;
pub use collaborator::{EchoTransport, MemoryStorage, Storage, Transport};
pub use config::LoaderConfig;
pub use loader::{LoadReport, validate_source};
pub use request::{RequestDescriptor, RestCall, StorageOp, resolve};
pub use runtime::{Runtime, RuntimeBuilder};
