//! declapi - Declarative REST and local-storage endpoints
//!
//! This crate re-exports all layers of the declapi system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: declapi_runtime    - Fact cache, resolver, evaluator, CLI
//! Layer 2: declapi_source     - Declaration extraction, source scanning
//! Layer 1: declapi_language   - Splitting, grammar, validators, compiler
//! Layer 0: declapi_foundation - Core types (Mapping, HttpMethod, Error)
//! ```

pub use declapi_foundation as foundation;
pub use declapi_language as language;
pub use declapi_runtime as runtime;
pub use declapi_source as source;
