//! Integration tests for the copywith_runtime crate.
//!
//! Tests for source expansion end to end:
//! - `@CopyWith` output for stored, optional, inferred and computed properties
//! - `@MutableCopy`, `@MutatedCopy` and `@Mutating` output
//! - Diagnostics and attribute removal on failure
//! - Configuration and file handling

mod copy_with;
mod files;
mod mutation;

use copywith_runtime::{Expansion, ExpansionSession};

/// Expands `input` with the default session.
pub fn expand(input: &str) -> Expansion {
    ExpansionSession::new().expand_source(input).unwrap()
}

/// Asserts the rewritten source and the `(message, line, column)` of every
/// diagnostic.
pub fn assert_expansion(input: &str, expected: &str, diagnostics: &[(&str, u32, u32)]) {
    let expansion = expand(input);
    assert_eq!(expansion.source, expected);
    let actual: Vec<(String, u32, u32)> = expansion
        .diagnostics
        .iter()
        .map(|d| (d.message(), d.line, d.column))
        .collect();
    let expected: Vec<(String, u32, u32)> = diagnostics
        .iter()
        .map(|(message, line, column)| ((*message).to_string(), *line, *column))
        .collect();
    assert_eq!(actual, expected);
}
