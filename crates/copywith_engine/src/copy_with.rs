//! The `copyWith` generator.
//!
//! For a value type with stored properties `a: A` and `b: B?` this produces:
//!
//! ```swift
//! extension S {
//!     enum OR<T> {
//!         case value(T)
//!         case `nil`
//!         case ignored
//!     }
//!     func copyWith(a: A? = nil, b: OR<B> = .ignored) -> S {
//!         let b: B? = switch b {
//!         case let .value(value):
//!             value
//!         case .nil:
//!             nil
//!         case .ignored:
//!             self.b
//!         }
//!         return S(
//!             a: a ?? self.a,
//!             b: b
//!         )
//!     }
//! }
//! ```
//!
//! A plain optional parameter cannot tell "set to nil" apart from "leave
//! alone", so optional properties take the three-state `OR` selector instead.

use copywith_foundation::TypeExpr;
use copywith_syntax::ast::{
    Argument, BindingSpecifier, EnumCase, EnumDecl, Expr, ExtensionDecl, FunctionDecl,
    GeneratedMember, Modifier, Parameter, Stmt, SwitchCase,
};

use crate::classify::StoredProperty;

/// Name of the nested selector enum.
pub const SELECTOR_NAME: &str = "OR";

/// Name of the generated method.
pub const FUNCTION_NAME: &str = "copyWith";

/// Builds the `copyWith` extension for `extended_type`.
///
/// Properties without a known type are left out. When nothing remains the
/// returned extension has no members.
#[must_use]
pub fn generate_copy_with(
    extended_type: &TypeExpr,
    properties: &[StoredProperty],
    modifiers: Vec<Modifier>,
) -> ExtensionDecl {
    let typed: Vec<(&str, &TypeExpr)> = properties
        .iter()
        .filter_map(|p| p.ty.as_ref().map(|ty| (p.name.as_str(), ty)))
        .collect();

    let mut extension = ExtensionDecl::new(extended_type.clone(), modifiers);
    if typed.is_empty() {
        return extension;
    }

    let has_optional = typed.iter().any(|(_, ty)| ty.is_optional());
    if has_optional {
        extension
            .members
            .push(GeneratedMember::Enum(selector_enum(extension.modifiers.clone())));
    }

    let mut params = Vec::with_capacity(typed.len());
    let mut body = Vec::new();
    let mut arguments = Vec::with_capacity(typed.len());
    for &(name, ty) in &typed {
        if let TypeExpr::Optional(wrapped) = ty {
            params.push(Parameter {
                name: name.to_string(),
                ty: TypeExpr::generic(SELECTOR_NAME, vec![wrapped.as_ref().clone()]),
                default: Some(Expr::ImplicitMember("ignored".into())),
            });
            body.push(Stmt::Binding {
                specifier: BindingSpecifier::Let,
                name: name.to_string(),
                ty: Some(ty.clone()),
                value: resolve_selector(name),
            });
            arguments.push(Argument::labeled(name, Expr::ident(name)));
        } else {
            params.push(Parameter {
                name: name.to_string(),
                ty: TypeExpr::optional(ty.clone()),
                default: Some(Expr::Nil),
            });
            arguments.push(Argument::labeled(
                name,
                Expr::binary(Expr::ident(name), "??", Expr::self_member(name)),
            ));
        }
    }

    let reconstruction = Expr::vertical_call(type_reference(extended_type), arguments);
    if has_optional {
        body.push(Stmt::Return(reconstruction));
    } else {
        body.push(Stmt::Expr(reconstruction));
    }

    extension
        .members
        .push(GeneratedMember::Function(FunctionDecl {
            attributes: Vec::new(),
            modifiers: Vec::new(),
            name: FUNCTION_NAME.to_string(),
            params,
            rethrows: false,
            return_type: Some(extended_type.clone()),
            body,
        }));
    extension
}

/// `enum OR<T> { case value(T); case `nil`; case ignored }`
fn selector_enum(modifiers: Vec<Modifier>) -> EnumDecl {
    EnumDecl {
        modifiers,
        name: SELECTOR_NAME.to_string(),
        generic_params: vec!["T".to_string()],
        cases: vec![
            EnumCase {
                name: "value".to_string(),
                associated: vec![TypeExpr::named("T")],
            },
            EnumCase {
                name: "nil".to_string(),
                associated: Vec::new(),
            },
            EnumCase {
                name: "ignored".to_string(),
                associated: Vec::new(),
            },
        ],
    }
}

/// `switch name { case let .value(value): value ... case .ignored: self.name }`
fn resolve_selector(name: &str) -> Expr {
    Expr::Switch {
        subject: Box::new(Expr::ident(name)),
        cases: vec![
            SwitchCase {
                binds: true,
                pattern: Expr::call(
                    Expr::ImplicitMember("value".into()),
                    vec![Argument::unlabeled(Expr::ident("value"))],
                ),
                body: Expr::ident("value"),
            },
            SwitchCase {
                binds: false,
                pattern: Expr::ImplicitMember("nil".into()),
                body: Expr::Nil,
            },
            SwitchCase {
                binds: false,
                pattern: Expr::ImplicitMember("ignored".into()),
                body: Expr::self_member(name),
            },
        ],
    }
}

/// Turns a type into the expression that names its initializer.
fn type_reference(ty: &TypeExpr) -> Expr {
    let TypeExpr::Nominal(segments) = ty else {
        return Expr::ident(ty.to_string());
    };
    let mut expr: Option<Expr> = None;
    for segment in segments {
        let mut next = match expr {
            None => Expr::ident(segment.name.clone()),
            Some(base) => Expr::member(base, segment.name.clone()),
        };
        if !segment.generic_args.is_empty() {
            next = Expr::Specialize {
                base: Box::new(next),
                args: segment.generic_args.clone(),
            };
        }
        expr = Some(next);
    }
    expr.unwrap_or_else(|| Expr::ident(ty.to_string()))
}
