//! Pretty-printer for generated declarations.
//!
//! This module renders [`ExtensionDecl`] trees and expressions back to Swift
//! source, in the layout expanded code is expected to have: one member per
//! line, `switch` cases aligned with the `switch` keyword, and vertical
//! argument lists for member-wise reconstruction calls.
//!
//! # Example
//!
//! ```
//! use copywith_syntax::ast::Expr;
//! use copywith_syntax::pretty::pretty_print_expr;
//!
//! let expr = Expr::binary(Expr::ident("a"), "??", Expr::self_member("a"));
//! assert_eq!(pretty_print_expr(&expr), "a ?? self.a");
//! ```

use std::fmt::Write;

use crate::ast::{
    Argument, EnumDecl, Expr, ExtensionDecl, FunctionDecl, GeneratedMember, Modifier, Stmt,
    SwitchCase,
};

/// Reserved words that must be escaped with backticks when used as names.
const RESERVED: &[&str] = &[
    "associatedtype",
    "class",
    "deinit",
    "enum",
    "extension",
    "fileprivate",
    "func",
    "import",
    "init",
    "inout",
    "internal",
    "let",
    "open",
    "operator",
    "private",
    "precedencegroup",
    "protocol",
    "public",
    "rethrows",
    "static",
    "struct",
    "subscript",
    "typealias",
    "var",
    "break",
    "case",
    "catch",
    "continue",
    "default",
    "defer",
    "do",
    "else",
    "fallthrough",
    "for",
    "guard",
    "if",
    "in",
    "repeat",
    "return",
    "throw",
    "switch",
    "where",
    "while",
    "Any",
    "as",
    "await",
    "false",
    "is",
    "nil",
    "self",
    "Self",
    "super",
    "throws",
    "true",
    "try",
];

/// Words that are valid expressions on their own.
const SELF_EXPRESSIONS: &[&str] = &["self", "Self", "super"];

/// Configuration for pretty-printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Number of spaces for each indentation level.
    pub indent_width: usize,
    /// Indent with tabs instead of spaces.
    pub use_tabs: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            use_tabs: false,
        }
    }
}

impl PrinterConfig {
    /// Sets the number of spaces per indentation level.
    #[must_use]
    pub const fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Indents with tabs.
    #[must_use]
    pub const fn with_tabs(mut self, use_tabs: bool) -> Self {
        self.use_tabs = use_tabs;
        self
    }

    /// Returns the text of one indentation level.
    #[must_use]
    pub fn indent_unit(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indent_width)
        }
    }
}

/// Pretty-print an extension to a string, without a trailing newline.
#[must_use]
pub fn pretty_print_extension(extension: &ExtensionDecl) -> String {
    pretty_print_extension_with_config(extension, &PrinterConfig::default())
}

/// Pretty-print an extension with custom configuration.
#[must_use]
pub fn pretty_print_extension_with_config(
    extension: &ExtensionDecl,
    config: &PrinterConfig,
) -> String {
    let mut printer = PrettyPrinter::new(config);
    printer.print_extension(extension);
    printer.finish()
}

/// Pretty-print several extensions separated by blank lines.
#[must_use]
pub fn pretty_print_all(extensions: &[ExtensionDecl], config: &PrinterConfig) -> String {
    extensions
        .iter()
        .map(|extension| pretty_print_extension_with_config(extension, config))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Pretty-print an expression at indentation level zero.
#[must_use]
pub fn pretty_print_expr(expr: &Expr) -> String {
    let mut printer = PrettyPrinter::new(&PrinterConfig::default());
    printer.print_expr(expr);
    printer.output
}

/// Escapes `name` with backticks if it is a reserved word.
#[must_use]
pub fn escape_identifier(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

/// Pretty-printer state.
struct PrettyPrinter {
    unit: String,
    output: String,
    indent_level: usize,
}

impl PrettyPrinter {
    fn new(config: &PrinterConfig) -> Self {
        Self {
            unit: config.indent_unit(),
            output: String::new(),
            indent_level: 0,
        }
    }

    fn finish(mut self) -> String {
        while self.output.ends_with('\n') {
            self.output.pop();
        }
        self.output
    }

    fn indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.unit);
        }
    }

    fn newline(&mut self) {
        self.output.push('\n');
    }

    fn print_modifiers(&mut self, modifiers: &[Modifier]) {
        for modifier in modifiers {
            self.output.push_str(&modifier.name);
            if let Some(detail) = &modifier.detail {
                let _ = write!(self.output, "({detail})");
            }
            self.output.push(' ');
        }
    }

    fn print_extension(&mut self, extension: &ExtensionDecl) {
        self.indent();
        self.print_modifiers(&extension.modifiers);
        let _ = write!(self.output, "extension {} {{", extension.extended_type);
        self.newline();

        self.indent_level += 1;
        for member in &extension.members {
            match member {
                GeneratedMember::Enum(decl) => self.print_enum(decl),
                GeneratedMember::Function(decl) => self.print_function(decl),
            }
        }
        self.indent_level -= 1;

        self.indent();
        self.output.push('}');
        self.newline();
    }

    fn print_enum(&mut self, decl: &EnumDecl) {
        self.indent();
        self.print_modifiers(&decl.modifiers);
        let _ = write!(self.output, "enum {}", escape_identifier(&decl.name));
        if !decl.generic_params.is_empty() {
            let _ = write!(self.output, "<{}>", decl.generic_params.join(", "));
        }
        self.output.push_str(" {");
        self.newline();

        self.indent_level += 1;
        for case in &decl.cases {
            self.indent();
            let _ = write!(self.output, "case {}", escape_identifier(&case.name));
            if !case.associated.is_empty() {
                let types: Vec<_> = case.associated.iter().map(ToString::to_string).collect();
                let _ = write!(self.output, "({})", types.join(", "));
            }
            self.newline();
        }
        self.indent_level -= 1;

        self.indent();
        self.output.push('}');
        self.newline();
    }

    fn print_function(&mut self, decl: &FunctionDecl) {
        for attribute in &decl.attributes {
            self.indent();
            let _ = write!(self.output, "@{attribute}");
            self.newline();
        }

        self.indent();
        self.print_modifiers(&decl.modifiers);
        let _ = write!(self.output, "func {}(", escape_identifier(&decl.name));
        for (i, param) in decl.params.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            let _ = write!(self.output, "{}: {}", param.name, param.ty);
            if let Some(default) = &param.default {
                self.output.push_str(" = ");
                self.print_expr(default);
            }
        }
        self.output.push(')');
        if decl.rethrows {
            self.output.push_str(" rethrows");
        }
        if let Some(return_type) = &decl.return_type {
            let _ = write!(self.output, " -> {return_type}");
        }
        self.output.push_str(" {");
        self.newline();

        self.indent_level += 1;
        for stmt in &decl.body {
            self.print_stmt(stmt);
        }
        self.indent_level -= 1;

        self.indent();
        self.output.push('}');
        self.newline();
    }

    fn print_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Blank => {}
            Stmt::Expr(expr) => {
                self.indent();
                self.print_expr(expr);
            }
            Stmt::Return(expr) => {
                self.indent();
                self.output.push_str("return ");
                self.print_expr(expr);
            }
            Stmt::Binding {
                specifier,
                name,
                ty,
                value,
            } => {
                self.indent();
                let _ = write!(
                    self.output,
                    "{} {}",
                    specifier.keyword(),
                    escape_identifier(name)
                );
                if let Some(ty) = ty {
                    let _ = write!(self.output, ": {ty}");
                }
                self.output.push_str(" = ");
                self.print_expr(value);
            }
        }
        self.newline();
    }

    fn print_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::String { text, multiline } => {
                let quotes = if *multiline { "\"\"\"" } else { "\"" };
                let _ = write!(self.output, "{quotes}{text}{quotes}");
            }
            Expr::Int(text) | Expr::Float(text) => self.output.push_str(text),
            Expr::Bool(value) => self.output.push_str(if *value { "true" } else { "false" }),
            Expr::Nil => self.output.push_str("nil"),
            Expr::Identifier(name) => {
                if SELF_EXPRESSIONS.contains(&name.as_str()) {
                    self.output.push_str(name);
                } else {
                    self.output.push_str(&escape_identifier(name));
                }
            }
            Expr::ImplicitMember(name) => {
                let _ = write!(self.output, ".{name}");
            }
            Expr::MemberAccess { base, member } => {
                self.print_expr(base);
                let _ = write!(self.output, ".{member}");
            }
            Expr::Call {
                callee,
                arguments,
                vertical,
            } => {
                self.print_expr(callee);
                if *vertical {
                    self.print_vertical_arguments(arguments);
                } else {
                    self.output.push('(');
                    self.print_arguments(arguments);
                    self.output.push(')');
                }
            }
            Expr::Subscript { base, arguments } => {
                self.print_expr(base);
                self.output.push('[');
                self.print_arguments(arguments);
                self.output.push(']');
            }
            Expr::Specialize { base, args } => {
                self.print_expr(base);
                let args: Vec<_> = args.iter().map(ToString::to_string).collect();
                let _ = write!(self.output, "<{}>", args.join(", "));
            }
            Expr::Array(elements) => {
                self.output.push('[');
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.print_expr(element);
                }
                self.output.push(']');
            }
            Expr::Dictionary(entries) => {
                if entries.is_empty() {
                    self.output.push_str("[:]");
                    return;
                }
                self.output.push('[');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.print_expr(key);
                    self.output.push_str(": ");
                    self.print_expr(value);
                }
                self.output.push(']');
            }
            Expr::Tuple(elements) => {
                self.output.push('(');
                self.print_arguments(elements);
                self.output.push(')');
            }
            Expr::Prefix { operator, operand } => {
                self.output.push_str(operator);
                self.print_expr(operand);
            }
            Expr::Postfix { operand, operator } => {
                self.print_expr(operand);
                self.output.push_str(operator);
            }
            Expr::Binary { lhs, operator, rhs } => {
                self.print_expr(lhs);
                let _ = write!(self.output, " {operator} ");
                self.print_expr(rhs);
            }
            Expr::Ternary {
                condition,
                then,
                otherwise,
            } => {
                self.print_expr(condition);
                self.output.push_str(" ? ");
                self.print_expr(then);
                self.output.push_str(" : ");
                self.print_expr(otherwise);
            }
            Expr::Try(inner) => {
                self.output.push_str("try ");
                self.print_expr(inner);
            }
            Expr::Await(inner) => {
                self.output.push_str("await ");
                self.print_expr(inner);
            }
            Expr::Cast { expr, operator, ty } => {
                self.print_expr(expr);
                let _ = write!(self.output, " {operator} {ty}");
            }
            Expr::Switch { subject, cases } => self.print_switch(subject, cases),
            // The text of opaque expressions lives in the source, not the tree
            Expr::Opaque(_) => self.output.push('_'),
        }
    }

    fn print_arguments(&mut self, arguments: &[Argument]) {
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.print_argument(argument);
        }
    }

    fn print_argument(&mut self, argument: &Argument) {
        if let Some(label) = &argument.label {
            let _ = write!(self.output, "{label}: ");
        }
        self.print_expr(&argument.value);
    }

    fn print_vertical_arguments(&mut self, arguments: &[Argument]) {
        if arguments.is_empty() {
            self.output.push_str("()");
            return;
        }
        self.output.push('(');
        self.newline();
        self.indent_level += 1;
        for (i, argument) in arguments.iter().enumerate() {
            self.indent();
            self.print_argument(argument);
            if i + 1 < arguments.len() {
                self.output.push(',');
            }
            self.newline();
        }
        self.indent_level -= 1;
        self.indent();
        self.output.push(')');
    }

    fn print_switch(&mut self, subject: &Expr, cases: &[SwitchCase]) {
        self.output.push_str("switch ");
        self.print_expr(subject);
        self.output.push_str(" {");
        self.newline();
        for case in cases {
            self.indent();
            self.output.push_str("case ");
            if case.binds {
                self.output.push_str("let ");
            }
            self.print_expr(&case.pattern);
            self.output.push(':');
            self.newline();
            self.indent_level += 1;
            self.indent();
            self.print_expr(&case.body);
            self.newline();
            self.indent_level -= 1;
        }
        self.indent();
        self.output.push('}');
    }
}
