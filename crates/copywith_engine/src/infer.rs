//! Property type resolution.
//!
//! An explicit annotation always wins. Without one, the type is read off the
//! initializer's shape: literals map to their default standard-library types,
//! `Type.member` and `Type(...)` to `Type`, and collection literals to
//! collections of their first element. Anything else is unresolved.

use copywith_foundation::{PathSegment, TypeExpr};
use copywith_syntax::ast::{Expr, PatternBinding};

/// Returns the binding's annotated or inferred type.
#[must_use]
pub fn resolve_type(binding: &PatternBinding) -> Option<TypeExpr> {
    if let Some(annotation) = &binding.type_annotation {
        return Some(annotation.clone());
    }
    binding.initializer.as_ref().and_then(infer_expr)
}

/// Infers the type of an initializer expression.
#[must_use]
pub fn infer_expr(expr: &Expr) -> Option<TypeExpr> {
    match expr {
        Expr::String { .. } => Some(TypeExpr::named("String")),
        Expr::Int(_) => Some(TypeExpr::named("Int")),
        Expr::Bool(_) => Some(TypeExpr::named("Bool")),
        Expr::Float(_) => Some(TypeExpr::named("Double")),
        Expr::Prefix { operator, operand }
            if matches!(operator.as_str(), "-" | "+")
                && matches!(operand.as_ref(), Expr::Int(_) | Expr::Float(_)) =>
        {
            infer_expr(operand)
        }
        Expr::MemberAccess { base, .. } => type_path(base),
        Expr::Call {
            callee, arguments, ..
        } => {
            if is_optional_constructor(callee) {
                let wrapped = arguments.first()?;
                return infer_expr(&wrapped.value).map(TypeExpr::optional);
            }
            match callee.as_ref() {
                Expr::MemberAccess { base, .. } => type_path(base),
                other => type_path(other),
            }
        }
        Expr::Array(elements) => elements
            .first()
            .and_then(infer_expr)
            .map(TypeExpr::array),
        Expr::Dictionary(entries) => {
            let (key, value) = entries.first()?;
            Some(TypeExpr::dictionary(infer_expr(key)?, infer_expr(value)?))
        }
        _ => None,
    }
}

/// `Optional(x)` and `Optional.some(x)`.
fn is_optional_constructor(callee: &Expr) -> bool {
    match callee {
        Expr::Identifier(name) => name == "Optional",
        Expr::MemberAccess { base, member } => {
            member == "some" && matches!(base.as_ref(), Expr::Identifier(name) if name == "Optional")
        }
        _ => false,
    }
}

/// Reads a type from an expression naming one, such as `Foo`, `Outer.Inner`
/// or `Box<Int>`. `Optional<T>` reads as `T?`, like an annotation does.
///
/// Only capitalized names count as types, so `makeValue()` and `value.count`
/// stay unresolved.
fn type_path(expr: &Expr) -> Option<TypeExpr> {
    match expr {
        Expr::Specialize { base, args }
            if args.len() == 1 && matches!(base.as_ref(), Expr::Identifier(name) if name == "Optional") =>
        {
            Some(TypeExpr::optional(args[0].clone()))
        }
        Expr::Identifier(name) if is_type_name(name) => Some(TypeExpr::named(name.clone())),
        Expr::MemberAccess { base, member } if is_type_name(member) => {
            let base = type_path(base)?;
            let TypeExpr::Nominal(mut segments) = base else {
                return None;
            };
            segments.push(PathSegment::new(member.clone()));
            Some(TypeExpr::Nominal(segments))
        }
        Expr::Specialize { base, args } => {
            let TypeExpr::Nominal(mut segments) = type_path(base)? else {
                return None;
            };
            let last = segments.last_mut()?;
            last.generic_args.clone_from(args);
            Some(TypeExpr::Nominal(segments))
        }
        _ => None,
    }
}

fn is_type_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase) && name != "Self"
}
