//! Lexer, declaration parser, and printer for the Swift subset copywith
//! reads and writes.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of Swift source
//! - [`Parser`] - Parsing tokens into [`ast::DeclGroup`] trees
//! - [`pretty`] - Rendering generated extensions back to Swift

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod span;
pub mod token;


pub use ast::{DeclGroup, DeclGroupKind, ExtensionDecl, SourceFile};
pub use lexer::Lexer;
pub use parser::{Parser, parse, parse_expression, parse_type};
pub use pretty::{PrinterConfig, pretty_print_all, pretty_print_extension};
pub use span::Span;
pub use token::{Token, TokenKind};
