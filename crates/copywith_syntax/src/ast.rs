//! Syntax tree for the Swift declaration subset.
//!
//! The parser produces [`DeclGroup`] trees for every `struct`, `class`,
//! `actor`, `enum`, `protocol` and `extension` it finds. Members that do not
//! matter to expansion (functions, initializers, subscripts, ...) are kept as
//! opaque spans so the harness can still pass them through untouched.
//!
//! The generated side of the tree ([`ExtensionDecl`] and friends) is built by
//! the engine and rendered by [`crate::pretty`].

use copywith_foundation::TypeExpr;

use crate::span::Span;

// =============================================================================
// Source Files and Declarations
// =============================================================================

/// A parsed source file.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceFile {
    /// Top-level type declarations in source order.
    pub declarations: Vec<DeclGroup>,
}

impl SourceFile {
    /// Visits every declaration, outermost first, with its enclosing path.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DeclGroup, &[&'a DeclGroup])) {
        fn walk_group<'a>(
            group: &'a DeclGroup,
            parents: &mut Vec<&'a DeclGroup>,
            visit: &mut impl FnMut(&'a DeclGroup, &[&'a DeclGroup]),
        ) {
            visit(group, parents);
            parents.push(group);
            for nested in group.nested_groups() {
                walk_group(nested, parents, visit);
            }
            parents.pop();
        }

        let mut parents = Vec::new();
        for declaration in &self.declarations {
            walk_group(declaration, &mut parents, visit);
        }
    }
}

/// An `@name(...)` attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    /// Attribute name without the `@`, e.g. `CopyWith` or `frozen`.
    pub name: String,
    /// Raw argument text between the parentheses, if any.
    pub arguments: Option<String>,
    /// Span from `@` through the closing parenthesis.
    pub span: Span,
}

/// A declaration modifier such as `public`, `static` or `private(set)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Modifier {
    /// Modifier keyword.
    pub name: String,
    /// Parenthesized detail, e.g. `set` for `private(set)`.
    pub detail: Option<String>,
    /// Source span; empty for generated modifiers.
    pub span: Span,
}

impl Modifier {
    /// Creates a modifier without detail, for generated code.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: None,
            span: Span::at_start(),
        }
    }

    /// Returns true if this is `name` with no detail.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.detail.is_none() && self.name == name
    }
}

/// The keyword introducing a declaration group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclGroupKind {
    /// `struct`
    Struct,
    /// `class`
    Class,
    /// `actor`
    Actor,
    /// `enum`
    Enum,
    /// `protocol`
    Protocol,
    /// `extension`
    Extension,
}

impl DeclGroupKind {
    /// Maps a keyword to a declaration kind.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "struct" => Some(Self::Struct),
            "class" => Some(Self::Class),
            "actor" => Some(Self::Actor),
            "enum" => Some(Self::Enum),
            "protocol" => Some(Self::Protocol),
            "extension" => Some(Self::Extension),
            _ => None,
        }
    }

    /// Returns the introducing keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Class => "class",
            Self::Actor => "actor",
            Self::Enum => "enum",
            Self::Protocol => "protocol",
            Self::Extension => "extension",
        }
    }
}

/// A type declaration with a member block.
#[derive(Clone, Debug, PartialEq)]
pub struct DeclGroup {
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Modifiers in source order.
    pub modifiers: Vec<Modifier>,
    /// Declaration keyword.
    pub kind: DeclGroupKind,
    /// Declared name; for extensions the extended type as written.
    pub name: String,
    /// Inheritance clause entries.
    pub inheritance: Vec<TypeExpr>,
    /// Members in source order.
    pub members: Vec<Member>,
    /// Span from the first attribute or modifier through the closing brace.
    pub span: Span,
}

impl DeclGroup {
    /// Returns the first attribute named `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Returns true if the inheritance clause names `name`.
    #[must_use]
    pub fn inherits(&self, name: &str) -> bool {
        self.inheritance
            .iter()
            .any(|ty| ty.nominal_name().as_deref() == Some(name))
    }

    /// Returns the variable declarations among the members.
    pub fn variables(&self) -> impl Iterator<Item = &VariableDecl> {
        self.members.iter().filter_map(|member| match member {
            Member::Variable(variable) => Some(variable),
            _ => None,
        })
    }

    /// Returns nested declaration groups.
    pub fn nested_groups(&self) -> impl Iterator<Item = &DeclGroup> {
        self.members.iter().filter_map(|member| match member {
            Member::Decl(group) => Some(group),
            _ => None,
        })
    }
}

/// A member of a declaration group.
#[derive(Clone, Debug, PartialEq)]
pub enum Member {
    /// `let` or `var` declaration.
    Variable(VariableDecl),
    /// Nested type declaration.
    Decl(DeclGroup),
    /// Any other member, kept by keyword and span.
    Other {
        /// Introducing keyword such as `func` or `init`.
        keyword: String,
        /// Source span of the whole member.
        span: Span,
    },
}

// =============================================================================
// Variables
// =============================================================================

/// `let` or `var`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingSpecifier {
    /// `let`
    Let,
    /// `var`
    Var,
}

impl BindingSpecifier {
    /// Returns the keyword text.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Let => "let",
            Self::Var => "var",
        }
    }
}

/// A `let`/`var` member declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDecl {
    /// Attributes such as `@Published`.
    pub attributes: Vec<Attribute>,
    /// Modifiers such as `static` or `private(set)`.
    pub modifiers: Vec<Modifier>,
    /// `let` or `var`.
    pub specifier: BindingSpecifier,
    /// Comma-separated bindings.
    pub bindings: Vec<PatternBinding>,
    /// Source span of the declaration.
    pub span: Span,
}

impl VariableDecl {
    /// Returns true if a modifier named `name` is present.
    #[must_use]
    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.iter().any(|m| m.name == name)
    }
}

/// One `pattern: Type = value { accessors }` binding.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternBinding {
    /// Bound pattern.
    pub pattern: Pattern,
    /// Explicit type annotation.
    pub type_annotation: Option<TypeExpr>,
    /// Initializer expression.
    pub initializer: Option<Expr>,
    /// Accessor block following the binding.
    pub accessors: Option<AccessorBlock>,
}

/// A binding pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    /// A single name.
    Identifier(String),
    /// `(a, b)`
    Tuple(Vec<Pattern>),
    /// `_`
    Wildcard,
}

/// The `{ ... }` block after a variable binding.
#[derive(Clone, Debug, PartialEq)]
pub enum AccessorBlock {
    /// Explicit accessors like `get`, `set` or `didSet`.
    Accessors(Vec<AccessorKind>),
    /// An implicit getter body.
    Getter,
}

impl AccessorBlock {
    /// Returns true if every accessor is an observer.
    #[must_use]
    pub fn is_observers_only(&self) -> bool {
        match self {
            Self::Accessors(accessors) => accessors.iter().all(|a| a.is_observer()),
            Self::Getter => false,
        }
    }
}

/// Kinds of explicit accessors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessorKind {
    /// `get`
    Get,
    /// `set`
    Set,
    /// `willSet`
    WillSet,
    /// `didSet`
    DidSet,
    /// `_read`
    Read,
    /// `_modify`
    Modify,
    /// `init`
    Init,
    /// Any other accessor keyword.
    Other(String),
}

impl AccessorKind {
    /// Parses an accessor keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "get" => Some(Self::Get),
            "set" => Some(Self::Set),
            "willSet" => Some(Self::WillSet),
            "didSet" => Some(Self::DidSet),
            "_read" => Some(Self::Read),
            "_modify" => Some(Self::Modify),
            "init" => Some(Self::Init),
            "unsafeAddress" | "unsafeMutableAddress" | "read" | "modify" => {
                Some(Self::Other(keyword.to_string()))
            }
            _ => None,
        }
    }

    /// Returns true for `willSet` and `didSet`.
    #[must_use]
    pub const fn is_observer(&self) -> bool {
        matches!(self, Self::WillSet | Self::DidSet)
    }
}

// =============================================================================
// Expressions
// =============================================================================

/// An expression.
///
/// Parsed initializers and generated function bodies share this type.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// String literal, raw contents.
    String {
        /// Contents between the delimiters.
        text: String,
        /// `"""` literal.
        multiline: bool,
    },
    /// Integer literal text.
    Int(String),
    /// Float literal text.
    Float(String),
    /// `true` or `false`
    Bool(bool),
    /// `nil`
    Nil,
    /// A bare name like `value` or `Int`.
    Identifier(String),
    /// `.member` with the base inferred from context.
    ImplicitMember(String),
    /// `base.member`
    MemberAccess {
        /// Base expression.
        base: Box<Expr>,
        /// Member name.
        member: String,
    },
    /// `callee(arguments)`
    Call {
        /// Called expression.
        callee: Box<Expr>,
        /// Arguments in order.
        arguments: Vec<Argument>,
        /// Whether the arguments print one per line.
        vertical: bool,
    },
    /// `base[arguments]`
    Subscript {
        /// Subscripted expression.
        base: Box<Expr>,
        /// Arguments in order.
        arguments: Vec<Argument>,
    },
    /// `Name<Args>` in expression position.
    Specialize {
        /// Specialized expression.
        base: Box<Expr>,
        /// Generic arguments.
        args: Vec<TypeExpr>,
    },
    /// `[a, b]`
    Array(Vec<Expr>),
    /// `[k: v]`; `[:]` is empty.
    Dictionary(Vec<(Expr, Expr)>),
    /// `(a, b: c)`
    Tuple(Vec<Argument>),
    /// `-x`, `!x`, `&x`
    Prefix {
        /// Operator text.
        operator: String,
        /// Operand.
        operand: Box<Expr>,
    },
    /// `x!`, `x?`, `x...`
    Postfix {
        /// Operand.
        operand: Box<Expr>,
        /// Operator text.
        operator: String,
    },
    /// `a ?? b`
    Binary {
        /// Left operand.
        lhs: Box<Expr>,
        /// Operator text.
        operator: String,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// `c ? a : b`
    Ternary {
        /// Condition.
        condition: Box<Expr>,
        /// Value when true.
        then: Box<Expr>,
        /// Value when false.
        otherwise: Box<Expr>,
    },
    /// `try x`
    Try(Box<Expr>),
    /// `await x`
    Await(Box<Expr>),
    /// `x as T`, `x as? T`, `x is T`
    Cast {
        /// Operand.
        expr: Box<Expr>,
        /// `as`, `as?`, `as!` or `is`.
        operator: String,
        /// Target type.
        ty: TypeExpr,
    },
    /// `switch subject { cases }`
    Switch {
        /// Scrutinee.
        subject: Box<Expr>,
        /// Cases in order.
        cases: Vec<SwitchCase>,
    },
    /// A closure, key path or other construct kept only by span.
    Opaque(Span),
}

impl Expr {
    /// Creates an identifier expression.
    #[must_use]
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// Creates `base.member`.
    #[must_use]
    pub fn member(base: Expr, member: impl Into<String>) -> Self {
        Self::MemberAccess {
            base: Box::new(base),
            member: member.into(),
        }
    }

    /// Creates `self.name`.
    #[must_use]
    pub fn self_member(name: impl Into<String>) -> Self {
        Self::member(Self::ident("self"), name)
    }

    /// Creates a single-line call.
    #[must_use]
    pub fn call(callee: Expr, arguments: Vec<Argument>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            arguments,
            vertical: false,
        }
    }

    /// Creates a call with one argument per line.
    #[must_use]
    pub fn vertical_call(callee: Expr, arguments: Vec<Argument>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            arguments,
            vertical: true,
        }
    }

    /// Creates `lhs operator rhs`.
    #[must_use]
    pub fn binary(lhs: Expr, operator: impl Into<String>, rhs: Expr) -> Self {
        Self::Binary {
            lhs: Box::new(lhs),
            operator: operator.into(),
            rhs: Box::new(rhs),
        }
    }

    /// Creates a prefix operator application.
    #[must_use]
    pub fn prefix(operator: impl Into<String>, operand: Expr) -> Self {
        Self::Prefix {
            operator: operator.into(),
            operand: Box::new(operand),
        }
    }
}

/// A call or tuple argument.
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    /// Argument label.
    pub label: Option<String>,
    /// Argument value.
    pub value: Expr,
}

impl Argument {
    /// Creates an unlabeled argument.
    #[must_use]
    pub const fn unlabeled(value: Expr) -> Self {
        Self { label: None, value }
    }

    /// Creates a labeled argument.
    #[must_use]
    pub fn labeled(label: impl Into<String>, value: Expr) -> Self {
        Self {
            label: Some(label.into()),
            value,
        }
    }
}

/// One `case pattern: body` clause of a switch expression.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchCase {
    /// Whether the pattern is introduced by `let`.
    pub binds: bool,
    /// Case pattern.
    pub pattern: Expr,
    /// Result expression.
    pub body: Expr,
}

// =============================================================================
// Generated Declarations
// =============================================================================

/// An `extension` produced by expansion.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtensionDecl {
    /// Modifiers on the extension itself.
    pub modifiers: Vec<Modifier>,
    /// Extended type.
    pub extended_type: TypeExpr,
    /// Generated members in order.
    pub members: Vec<GeneratedMember>,
}

impl ExtensionDecl {
    /// Creates an extension with no members.
    #[must_use]
    pub const fn new(extended_type: TypeExpr, modifiers: Vec<Modifier>) -> Self {
        Self {
            modifiers,
            extended_type,
            members: Vec::new(),
        }
    }

    /// Returns true if the extension has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A member of a generated extension.
#[derive(Clone, Debug, PartialEq)]
pub enum GeneratedMember {
    /// A nested enum.
    Enum(EnumDecl),
    /// A method.
    Function(FunctionDecl),
}

/// A generated enum declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumDecl {
    /// Modifiers.
    pub modifiers: Vec<Modifier>,
    /// Enum name.
    pub name: String,
    /// Generic parameter names.
    pub generic_params: Vec<String>,
    /// Cases in order.
    pub cases: Vec<EnumCase>,
}

/// A generated enum case.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumCase {
    /// Case name.
    pub name: String,
    /// Associated value types.
    pub associated: Vec<TypeExpr>,
}

/// A generated function declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    /// Attribute names without `@`.
    pub attributes: Vec<String>,
    /// Modifiers.
    pub modifiers: Vec<Modifier>,
    /// Function name.
    pub name: String,
    /// Parameters in order.
    pub params: Vec<Parameter>,
    /// `rethrows` effect.
    pub rethrows: bool,
    /// Result type, `None` for `Void`.
    pub return_type: Option<TypeExpr>,
    /// Body statements.
    pub body: Vec<Stmt>,
}

/// A function parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    /// Parameter name, also used as the argument label.
    pub name: String,
    /// Parameter type.
    pub ty: TypeExpr,
    /// Default value.
    pub default: Option<Expr>,
}

/// A statement in a generated body.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// Expression statement.
    Expr(Expr),
    /// `return value`
    Return(Expr),
    /// `let`/`var name: Type = value`
    Binding {
        /// `let` or `var`.
        specifier: BindingSpecifier,
        /// Bound name.
        name: String,
        /// Optional annotation.
        ty: Option<TypeExpr>,
        /// Initial value.
        value: Expr,
    },
    /// An empty line.
    Blank,
}
