//! Configuration for source expansion.

use copywith_syntax::PrinterConfig;

/// Configuration for an [`ExpansionSession`](crate::ExpansionSession).
///
/// Controls type-inference strictness, annotation handling and the layout of
/// generated code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpansionConfig {
    /// Report properties whose type cannot be inferred as errors instead of
    /// leaving them out of `copyWith`.
    pub strict_inference: bool,

    /// Leave the `@CopyWith`-style attributes in the expanded source.
    pub keep_annotations: bool,

    /// Layout of generated extensions.
    pub printer: PrinterConfig,

    /// Text between a declaration and each extension generated for it.
    pub separator: String,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            strict_inference: false,
            keep_annotations: false,
            printer: PrinterConfig::default(),
            separator: "\n\n".to_string(),
        }
    }
}

impl ExpansionConfig {
    /// Creates a configuration that rejects unresolvable property types.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_inference: true,
            ..Self::default()
        }
    }

    /// Creates a configuration that keeps annotations, for previewing what
    /// would be generated without rewriting the declaration.
    #[must_use]
    pub fn preview() -> Self {
        Self {
            keep_annotations: true,
            ..Self::default()
        }
    }

    /// Builder method to set strict inference.
    #[must_use]
    pub fn with_strict_inference(mut self, strict: bool) -> Self {
        self.strict_inference = strict;
        self
    }

    /// Builder method to keep or remove annotations.
    #[must_use]
    pub fn with_keep_annotations(mut self, keep: bool) -> Self {
        self.keep_annotations = keep;
        self
    }

    /// Builder method to set the indentation width in spaces.
    #[must_use]
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.printer = self.printer.with_indent_width(width).with_tabs(false);
        self
    }

    /// Builder method to indent with tabs.
    #[must_use]
    pub fn with_tabs(mut self, tabs: bool) -> Self {
        self.printer = self.printer.with_tabs(tabs);
        self
    }

    /// Builder method to set the separator before each extension.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}
