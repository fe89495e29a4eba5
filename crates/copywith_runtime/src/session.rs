//! Source expansion.
//!
//! An [`ExpansionSession`] parses a Swift source file, runs the registered
//! generator for every annotated declaration, and rewrites the file: the
//! annotations are removed and generated extensions are appended after the
//! top-level declaration that contains them. Generator failures do not stop
//! the pass; each one becomes a [`Diagnostic`] at its attribute.

use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::Path;

use copywith_engine::{CopyWith, ExtensionMacro, MacroRegistry, stored_properties};
use copywith_foundation::{Error, ErrorContext, ErrorKind, Result};
use copywith_syntax::ast::Attribute;
use copywith_syntax::pretty::pretty_print_extension_with_config;
use copywith_syntax::{DeclGroup, ExtensionDecl, parse};
use tracing::{debug, warn};

use crate::config::ExpansionConfig;

// =============================================================================
// Results
// =============================================================================

/// A generator failure attached to the attribute that requested it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line of the attribute.
    pub line: u32,
    /// 1-based column of the attribute.
    pub column: u32,
    /// Attribute name without the `@`.
    pub attribute: String,
    /// What went wrong.
    pub kind: ErrorKind,
}

impl Diagnostic {
    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Converts into an [`Error`] carrying the location as context.
    #[must_use]
    pub fn into_error(self, source: Option<&str>) -> Error {
        let mut context = ErrorContext::new()
            .with_position(self.line, self.column)
            .with_frame(format!("@{}", self.attribute));
        if let Some(source) = source {
            context = context.with_source(source);
        }
        Error::new(self.kind).with_context(context)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: error: {}", self.line, self.column, self.kind)
    }
}

/// The result of expanding one source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expansion {
    /// Rewritten source text.
    pub source: String,
    /// Failures, in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of extensions spliced into `source`.
    pub extension_count: usize,
}

impl Expansion {
    /// Returns true if no generator failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// =============================================================================
// ExpansionSession
// =============================================================================

/// Expands annotated declarations in Swift source text.
#[derive(Debug)]
pub struct ExpansionSession {
    registry: MacroRegistry,
    config: ExpansionConfig,
}

impl Default for ExpansionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpansionSession {
    /// Creates a session with the standard generators and default config.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ExpansionConfig::default())
    }

    /// Creates a session with the standard generators.
    #[must_use]
    pub fn with_config(config: ExpansionConfig) -> Self {
        Self::with_registry(MacroRegistry::standard(), config)
    }

    /// Creates a session with a custom registry.
    #[must_use]
    pub const fn with_registry(registry: MacroRegistry, config: ExpansionConfig) -> Self {
        Self { registry, config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    /// Returns a mutable reference to the configuration.
    pub fn config_mut(&mut self) -> &mut ExpansionConfig {
        &mut self.config
    }

    /// Returns the generator registry.
    #[must_use]
    pub const fn registry(&self) -> &MacroRegistry {
        &self.registry
    }

    /// Expands every annotated declaration in `source`.
    ///
    /// # Errors
    ///
    /// Returns a parse error if `source` cannot be parsed. Generator failures
    /// are reported through [`Expansion::diagnostics`] instead.
    pub fn expand_source(&self, source: &str) -> Result<Expansion> {
        let file = parse(source)?;

        let mut removals = Vec::new();
        let mut generated: Vec<(usize, ExtensionDecl)> = Vec::new();
        let mut diagnostics = Vec::new();

        file.walk(&mut |decl, parents| {
            let anchor = parents.first().map_or(decl.span.end, |outer| outer.span.end);
            let type_name = qualified_name(decl, parents);

            for attribute in &decl.attributes {
                if !self.registry.contains(&attribute.name) {
                    continue;
                }
                if !self.config.keep_annotations {
                    removals.push(attribute.span.range());
                }
                match self.expand_annotation(decl, attribute, &type_name) {
                    Ok(extensions) => {
                        debug!(
                            attribute = %attribute.name,
                            type_name = %type_name,
                            extensions = extensions.len(),
                            "expanded annotation"
                        );
                        generated.extend(extensions.into_iter().map(|ext| (anchor, ext)));
                    }
                    Err(error) => {
                        debug!(
                            attribute = %attribute.name,
                            type_name = %type_name,
                            error = %error,
                            "annotation failed"
                        );
                        diagnostics.push(Diagnostic {
                            line: attribute.span.line,
                            column: attribute.span.column,
                            attribute: attribute.name.clone(),
                            kind: error.kind,
                        });
                    }
                }
            }
        });

        let extension_count = generated.len();
        let mut edits: Vec<Edit> = merge_adjacent(source, removals)
            .into_iter()
            .map(|span| Edit::remove(source, span.start, span.end))
            .collect();
        edits.extend(self.insertions(generated));
        edits.sort_by_key(|edit| edit.start);

        Ok(Expansion {
            source: apply_edits(source, &edits),
            diagnostics,
            extension_count,
        })
    }

    /// Reads and expands a file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a parse error
    /// located in that file.
    pub fn expand_file(&self, path: &Path) -> Result<Expansion> {
        let source = fs::read_to_string(path)?;
        self.expand_source(&source).map_err(|error| {
            let mut context = ErrorContext::new().with_source(path.display().to_string());
            if let ErrorKind::ParseError { line, column, .. } = &error.kind {
                context = context.with_position(*line, *column);
            }
            error.with_context(context)
        })
    }

    /// Runs one generator and applies the inference policy.
    fn expand_annotation(
        &self,
        decl: &DeclGroup,
        attribute: &Attribute,
        type_name: &str,
    ) -> Result<Vec<ExtensionDecl>> {
        let extensions = self.registry.expand(&attribute.name, decl, type_name)?;
        if attribute.name == CopyWith.name() {
            self.check_inference(decl, type_name)?;
        }
        Ok(extensions)
    }

    /// Untyped properties are left out of `copyWith`; say so, or refuse in
    /// strict mode.
    fn check_inference(&self, decl: &DeclGroup, type_name: &str) -> Result<()> {
        for property in stored_properties(decl)? {
            if property.ty.is_some() {
                continue;
            }
            if self.config.strict_inference {
                return Err(Error::unresolvable_type(property.name));
            }
            warn!(
                type_name = %type_name,
                property = %property.name,
                "cannot infer property type; left out of copyWith"
            );
        }
        Ok(())
    }

    /// Renders generated extensions into one insertion per anchor.
    fn insertions(&self, generated: Vec<(usize, ExtensionDecl)>) -> Vec<Edit> {
        let mut edits: Vec<Edit> = Vec::new();
        for (anchor, extension) in generated {
            let text = pretty_print_extension_with_config(&extension, &self.config.printer);
            match edits.last_mut() {
                Some(last) if last.start == anchor => {
                    last.replacement.push_str(&self.config.separator);
                    last.replacement.push_str(&text);
                }
                _ => edits.push(Edit {
                    start: anchor,
                    end: anchor,
                    replacement: format!("{}{text}", self.config.separator),
                }),
            }
        }
        edits
    }
}

/// `Outer.Inner` for a declaration nested in `Outer`.
fn qualified_name(decl: &DeclGroup, parents: &[&DeclGroup]) -> String {
    parents
        .iter()
        .map(|parent| parent.name.as_str())
        .chain(std::iter::once(decl.name.as_str()))
        .collect::<Vec<_>>()
        .join(".")
}

// =============================================================================
// Text Edits
// =============================================================================

/// Replaces `start..end` of the source with `replacement`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    replacement: String,
}

impl Edit {
    /// Removes an attribute together with the whitespace it leaves behind.
    ///
    /// An attribute alone on its line takes the whole line with it. One
    /// followed by more code takes its trailing blanks; one that ends a line
    /// takes its leading blanks.
    fn remove(source: &str, start: usize, end: usize) -> Self {
        let bytes = source.as_bytes();
        let is_blank = |b: &u8| *b == b' ' || *b == b'\t';

        let mut after = end;
        while after < bytes.len() && is_blank(&bytes[after]) {
            after += 1;
        }
        let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[after..].find('\n').map_or(source.len(), |i| after + i);

        let ends_line = after == line_end;
        let starts_line = bytes[line_start..start].iter().all(is_blank);

        let (start, end) = if ends_line && starts_line {
            let through_newline = (line_end + 1).min(source.len());
            (line_start, through_newline)
        } else if ends_line {
            let mut before = start;
            while before > line_start && is_blank(&bytes[before - 1]) {
                before -= 1;
            }
            (before, end)
        } else {
            (start, after)
        };

        Self {
            start,
            end,
            replacement: String::new(),
        }
    }
}

/// Joins attribute spans separated only by blanks, so that a line holding
/// several removed attributes is recognized as empty.
fn merge_adjacent(source: &str, mut spans: Vec<Range<usize>>) -> Vec<Range<usize>> {
    spans.sort_unstable_by_key(|span| (span.start, span.end));
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last)
                if last.end <= span.start
                    && source[last.end..span.start].bytes().all(|b| b == b' ' || b == b'\t') =>
            {
                last.end = span.end;
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// Applies edits sorted by start offset. Overlapping removals merge.
fn apply_edits(source: &str, edits: &[Edit]) -> String {
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        let start = edit.start.max(cursor);
        output.push_str(&source[cursor..start]);
        output.push_str(&edit.replacement);
        cursor = cursor.max(edit.end);
    }
    output.push_str(&source[cursor..]);
    output
}
