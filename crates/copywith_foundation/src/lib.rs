//! Error types and type expressions for copywith.
//!
//! This crate provides:
//! - [`Error`] - Typed failures surfaced to the expansion harness
//! - [`TypeExpr`] - Recursive type-expression tree used for property types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod types;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use types::{FunctionParam, FunctionType, OpaqueKind, PathSegment, TupleElement, TypeExpr};
