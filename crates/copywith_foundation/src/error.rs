//! Error types for copywith.
//!
//! Uses `thiserror` for ergonomic error definition. Every failure raised by the
//! generators is a typed [`ErrorKind`] whose `Display` text is the stable,
//! human-readable description attached to the offending declaration.

use std::fmt;

use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for copywith operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// A value-type-only generator was applied to something else.
    #[must_use]
    pub fn not_value_type() -> Self {
        Self::new(ErrorKind::NotValueType)
    }

    /// A generator accepting value types or protocols was applied to something else.
    #[must_use]
    pub fn not_value_type_or_protocol() -> Self {
        Self::new(ErrorKind::NotValueTypeOrProtocol)
    }

    /// An in-place mutation generator was applied to a value type or other declaration.
    #[must_use]
    pub fn not_reference_type_or_protocol() -> Self {
        Self::new(ErrorKind::NotReferenceTypeOrProtocol)
    }

    /// A protocol lacks the reference-identity capability.
    #[must_use]
    pub fn not_reference_capable() -> Self {
        Self::new(ErrorKind::NotReferenceCapable)
    }

    /// A property statement bound more than one name or used a tuple pattern.
    #[must_use]
    pub fn multiple_bindings() -> Self {
        Self::new(ErrorKind::MultipleBindings)
    }

    /// A property type could not be inferred (strict inference only).
    #[must_use]
    pub fn unresolvable_type(property: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvableType {
            property: property.into(),
        })
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>, line: u32, column: u32, context: String) -> Self {
        Self::new(ErrorKind::ParseError {
            message: message.into(),
            line,
            column,
            context,
        })
    }

    /// Returns true if this error came from a generator rejecting a declaration.
    #[must_use]
    pub const fn is_expansion_error(&self) -> bool {
        self.kind.is_expansion_error()
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err.to_string()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Generator requires a `struct` declaration.
    #[error("Must be `struct` declaration")]
    NotValueType,

    /// Generator requires a `struct` or `protocol` declaration.
    #[error("Must be `struct` or `protocol` declaration")]
    NotValueTypeOrProtocol,

    /// Generator requires a `class` or `protocol` declaration.
    #[error("Must be `class` or `protocol` declaration")]
    NotReferenceTypeOrProtocol,

    /// Protocol must be constrained to reference types.
    #[error("Protocol must inherit from `AnyObject`")]
    NotReferenceCapable,

    /// Destructuring or multi-name property declaration.
    #[error("Use single variable")]
    MultipleBindings,

    /// No explicit annotation and the initializer shape is not inferable.
    #[error("Cannot infer type of `{property}`, add an explicit type annotation")]
    UnresolvableType {
        /// Name of the property whose type is unknown.
        property: String,
    },

    /// Attribute names a generator that is not registered.
    #[error("unknown macro: {0}")]
    UnknownMacro(String),

    /// Source could not be parsed.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
        /// The source line where the error occurred.
        context: String,
    },

    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    /// Returns true for the kinds a generator raises against a declaration.
    #[must_use]
    pub const fn is_expansion_error(&self) -> bool {
        matches!(
            self,
            Self::NotValueType
                | Self::NotValueTypeOrProtocol
                | Self::NotReferenceTypeOrProtocol
                | Self::NotReferenceCapable
                | Self::MultipleBindings
                | Self::UnresolvableType { .. }
        )
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Source file name.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<u32>,
    /// Column number in source.
    pub column: Option<u32>,
    /// Enclosing declarations and attributes, innermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source file.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds a frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
