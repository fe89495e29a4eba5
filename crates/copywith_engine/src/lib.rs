//! Property classification and member generation for copywith.
//!
//! This crate provides:
//! - [`stored_properties`] - Stored-property classification in source order
//! - [`resolve_type`] - Type inference for unannotated properties
//! - [`normalize`] - Access modifiers valid on a generated extension
//! - [`generate_copy_with`] / [`generate_mutation`] - Member builders
//! - [`ExtensionMacro`] and [`MacroRegistry`] - The `@CopyWith`, `@MutableCopy`,
//!   `@MutatedCopy` and `@Mutating` generators
//!
//! Everything here is a pure function of the parsed declaration. Nothing logs
//! and nothing is emitted on failure; attaching source locations to errors is
//! left to the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod access;
pub mod classify;
pub mod copy_with;
pub mod infer;
pub mod kind;
pub mod macros;
pub mod mutation;
pub mod registry;

pub use access::normalize;
pub use classify::{StoredProperty, has_mutable_storage, stored_properties};
pub use copy_with::generate_copy_with;
pub use infer::{infer_expr, resolve_type};
pub use kind::DeclKind;
pub use macros::{CopyWith, ExtensionMacro, MutableCopy, MutatedCopy, Mutating};
pub use mutation::{MutationShape, generate_mutation};
pub use registry::MacroRegistry;
