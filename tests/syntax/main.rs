//! Integration tests for the copywith_syntax crate.
//!
//! Tests for the Swift declaration front end:
//! - Tokenization and spans
//! - Parsing whole source files
//! - Type syntax round-trips
//! - Printing generated extensions

mod lexer;
mod parser;
mod printer;
mod types;
