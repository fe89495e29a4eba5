//! Type expressions.
//!
//! Property types, generated parameter types and extended type names are all
//! represented as a [`TypeExpr`] tree and rendered back to Swift syntax through
//! `Display`. Composite shapes such as "optional of T" are built structurally,
//! never by concatenating strings, so nested generics always print well-formed.

use std::fmt;

/// A Swift type expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// Nominal type such as `Int`, `Foo.Bar` or `Set<String>`.
    Nominal(Vec<PathSegment>),
    /// `T?`
    Optional(Box<TypeExpr>),
    /// `T!`
    ImplicitlyUnwrapped(Box<TypeExpr>),
    /// `[T]`
    Array(Box<TypeExpr>),
    /// `[K: V]`
    Dictionary(Box<TypeExpr>, Box<TypeExpr>),
    /// `(a: Int, String)`; the empty tuple is `()`.
    Tuple(Vec<TupleElement>),
    /// `(Int) async throws -> Bool`
    Function(FunctionType),
    /// `A & B`
    Composition(Vec<TypeExpr>),
    /// `some P` or `any P`
    Opaque(OpaqueKind, Box<TypeExpr>),
    /// `T.Type`
    Metatype(Box<TypeExpr>),
}

/// One dotted component of a nominal type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathSegment {
    /// Identifier text.
    pub name: String,
    /// Generic arguments, empty when not specialized.
    pub generic_args: Vec<TypeExpr>,
}

impl PathSegment {
    /// Creates an unspecialized segment.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic_args: Vec::new(),
        }
    }
}

/// An element of a tuple type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleElement {
    /// Optional element label.
    pub label: Option<String>,
    /// Element type.
    pub ty: TypeExpr,
}

/// Keyword introducing an existential or opaque type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpaqueKind {
    /// `some`
    Some,
    /// `any`
    Any,
}

/// A function type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionType {
    /// Type attributes without the `@`, e.g. `escaping`, `Sendable`.
    pub attributes: Vec<String>,
    /// Parameters in order.
    pub params: Vec<FunctionParam>,
    /// `async` effect.
    pub is_async: bool,
    /// `throws` effect.
    pub throws: bool,
    /// Result type.
    pub result: Box<TypeExpr>,
}

/// A parameter of a function type.
///
/// Function types only carry labels for documentation, so both names are
/// optional: `(_ it: inout T)` has label `_` and name `it`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionParam {
    /// Argument label, usually `_`.
    pub label: Option<String>,
    /// Parameter name.
    pub name: Option<String>,
    /// `inout` specifier.
    pub is_inout: bool,
    /// Parameter type.
    pub ty: TypeExpr,
}

impl FunctionParam {
    /// Creates an unlabeled parameter.
    #[must_use]
    pub fn unnamed(ty: TypeExpr) -> Self {
        Self {
            label: None,
            name: None,
            is_inout: false,
            ty,
        }
    }

    /// Creates a `_ name: T` parameter.
    #[must_use]
    pub fn documented(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            label: Some("_".to_string()),
            name: Some(name.into()),
            is_inout: false,
            ty,
        }
    }

    /// Marks the parameter `inout`.
    #[must_use]
    pub fn inout(mut self) -> Self {
        self.is_inout = true;
        self
    }
}

impl TypeExpr {
    /// Creates a nominal type from a single identifier.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Nominal(vec![PathSegment::new(name)])
    }

    /// Creates a nominal type from a dotted path like `Outer.Inner`.
    #[must_use]
    pub fn path(path: &str) -> Self {
        Self::Nominal(path.split('.').map(PathSegment::new).collect())
    }

    /// Creates a specialized nominal type like `OR<T>`.
    #[must_use]
    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        Self::Nominal(vec![PathSegment {
            name: name.into(),
            generic_args: args,
        }])
    }

    /// The abstract `Self` type of a protocol.
    #[must_use]
    pub fn self_type() -> Self {
        Self::named("Self")
    }

    /// `Void`
    #[must_use]
    pub fn void() -> Self {
        Self::named("Void")
    }

    /// Wraps a type in an optional.
    #[must_use]
    pub fn optional(inner: TypeExpr) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Creates an array type.
    #[must_use]
    pub fn array(element: TypeExpr) -> Self {
        Self::Array(Box::new(element))
    }

    /// Creates a dictionary type.
    #[must_use]
    pub fn dictionary(key: TypeExpr, value: TypeExpr) -> Self {
        Self::Dictionary(Box::new(key), Box::new(value))
    }

    /// Returns true if this is `T?`.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Returns the wrapped type of an optional, or the type itself.
    #[must_use]
    pub fn non_optional(&self) -> &TypeExpr {
        match self {
            Self::Optional(inner) => inner,
            other => other,
        }
    }

    /// Returns the dotted name of a nominal type, ignoring generic arguments.
    #[must_use]
    pub fn nominal_name(&self) -> Option<String> {
        match self {
            Self::Nominal(segments) => Some(
                segments
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join("."),
            ),
            _ => None,
        }
    }

    /// Returns true if printing this type as an operand of a postfix
    /// (`?`, `!`, `.Type`) needs parentheses.
    const fn needs_parens_as_operand(&self) -> bool {
        matches!(
            self,
            Self::Function(_) | Self::Composition(_) | Self::Opaque(_, _)
        )
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_parens_as_operand() {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nominal(segments) => {
                for (i, segment) in segments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{segment}")?;
                }
                Ok(())
            }
            Self::Optional(inner) => {
                inner.fmt_operand(f)?;
                f.write_str("?")
            }
            Self::ImplicitlyUnwrapped(inner) => {
                inner.fmt_operand(f)?;
                f.write_str("!")
            }
            Self::Array(element) => write!(f, "[{element}]"),
            Self::Dictionary(key, value) => write!(f, "[{key}: {value}]"),
            Self::Tuple(elements) => {
                f.write_str("(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if let Some(label) = &element.label {
                        write!(f, "{label}: ")?;
                    }
                    write!(f, "{}", element.ty)?;
                }
                f.write_str(")")
            }
            Self::Function(function) => write!(f, "{function}"),
            Self::Composition(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" & ")?;
                    }
                    part.fmt_operand(f)?;
                }
                Ok(())
            }
            Self::Opaque(kind, inner) => {
                let keyword = match kind {
                    OpaqueKind::Some => "some",
                    OpaqueKind::Any => "any",
                };
                write!(f, "{keyword} {inner}")
            }
            Self::Metatype(inner) => {
                inner.fmt_operand(f)?;
                f.write_str(".Type")
            }
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.generic_args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.generic_args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attribute in &self.attributes {
            write!(f, "@{attribute} ")?;
        }
        f.write_str("(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")?;
        if self.is_async {
            f.write_str(" async")?;
        }
        if self.throws {
            f.write_str(" throws")?;
        }
        write!(f, " -> {}", self.result)
    }
}

impl fmt::Display for FunctionParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.label, &self.name) {
            (Some(label), Some(name)) => write!(f, "{label} {name}: ")?,
            (Some(single), None) | (None, Some(single)) => write!(f, "{single}: ")?,
            (None, None) => {}
        }
        if self.is_inout {
            f.write_str("inout ")?;
        }
        write!(f, "{}", self.ty)
    }
}
