//! copywith - companion-member generator for Swift declarations
//!
//! This crate re-exports all layers of the copywith system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: copywith_runtime   : expansion session, splicing, CLI, REPL
//! Layer 2: copywith_engine    : property classifier, type resolver, generators
//! Layer 1: copywith_syntax    : lexer, declaration parser, printer
//! Layer 0: copywith_foundation: Error, TypeExpr
//! ```

pub use copywith_engine as engine;
pub use copywith_foundation as foundation;
pub use copywith_runtime as runtime;
pub use copywith_syntax as syntax;
