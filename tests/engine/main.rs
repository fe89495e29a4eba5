//! Integration tests for the copywith_engine crate.
//!
//! Tests for classification, generation, and macro dispatch:
//! - Stored-property classification
//! - Generated `copyWith` and mutation members
//! - Dispatch and failure kinds per macro
//! - Property-based checks over generated structs

mod classify;
mod dispatch;
mod generate;
