//! Expansion session, CLI, and REPL for copywith.
//!
//! This crate provides:
//! - [`ExpansionSession`] - Rewrites annotated Swift source
//! - [`Repl`] - Interactive expansion loop
//! - The `copywith` command-line tool

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod editor;
pub mod logging;
pub mod repl;
pub mod session;

pub use config::ExpansionConfig;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::{Outcome, Repl, is_complete};
pub use session::{Diagnostic, Expansion, ExpansionSession};
