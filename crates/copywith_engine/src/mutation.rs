//! Scoped-mutation generators.
//!
//! Value types get `mutatedCopy`, which hands an `inout` copy to a closure
//! and returns it. Reference types get `mutating`, which hands the instance
//! itself to a closure and returns it for chaining. Protocol extensions use
//! the same shapes over `Self`.

use copywith_foundation::{FunctionParam, FunctionType, TypeExpr};
use copywith_syntax::ast::{
    Argument, BindingSpecifier, Expr, ExtensionDecl, FunctionDecl, GeneratedMember, Modifier,
    Parameter, Stmt,
};

/// Name of the value-type method.
pub const MUTATED_COPY: &str = "mutatedCopy";

/// Name of the reference-type method.
pub const MUTATING: &str = "mutating";

/// Which receiver shape the generated method has.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationShape {
    /// Mutates and returns a copy.
    Value,
    /// Mutates and returns the receiver.
    Reference,
}

/// Builds a one-method extension of `extended_type`.
///
/// `subject` is the type the closure receives and the method returns: the
/// declared type for concrete types, `Self` for protocols.
#[must_use]
pub fn generate_mutation(
    shape: MutationShape,
    extended_type: &TypeExpr,
    subject: &TypeExpr,
    modifiers: Vec<Modifier>,
) -> ExtensionDecl {
    let function = match shape {
        MutationShape::Value => mutated_copy(subject),
        MutationShape::Reference => mutating(subject),
    };
    let mut extension = ExtensionDecl::new(extended_type.clone(), modifiers);
    extension.members.push(GeneratedMember::Function(function));
    extension
}

/// `configuring: (param) throws -> Void`
fn configuring(param: FunctionParam) -> Parameter {
    Parameter {
        name: "configuring".to_string(),
        ty: TypeExpr::Function(FunctionType {
            attributes: Vec::new(),
            params: vec![param],
            is_async: false,
            throws: true,
            result: Box::new(TypeExpr::void()),
        }),
        default: None,
    }
}

fn invoke_configuring(argument: Expr) -> Stmt {
    Stmt::Expr(Expr::Try(Box::new(Expr::call(
        Expr::ident("configuring"),
        vec![Argument::unlabeled(argument)],
    ))))
}

fn mutated_copy(subject: &TypeExpr) -> FunctionDecl {
    let param = FunctionParam::documented("it", subject.clone()).inout();
    FunctionDecl {
        attributes: Vec::new(),
        modifiers: Vec::new(),
        name: MUTATED_COPY.to_string(),
        params: vec![configuring(param)],
        rethrows: true,
        return_type: Some(subject.clone()),
        body: vec![
            Stmt::Binding {
                specifier: BindingSpecifier::Var,
                name: "mutableCopy".to_string(),
                ty: None,
                value: Expr::ident("self"),
            },
            invoke_configuring(Expr::prefix("&", Expr::ident("mutableCopy"))),
            Stmt::Blank,
            Stmt::Return(Expr::ident("mutableCopy")),
        ],
    }
}

fn mutating(subject: &TypeExpr) -> FunctionDecl {
    let param = FunctionParam::documented("it", subject.clone());
    FunctionDecl {
        attributes: vec!["discardableResult".to_string()],
        modifiers: Vec::new(),
        name: MUTATING.to_string(),
        params: vec![configuring(param)],
        rethrows: true,
        return_type: Some(subject.clone()),
        body: vec![
            invoke_configuring(Expr::ident("self")),
            Stmt::Blank,
            Stmt::Return(Expr::ident("self")),
        ],
    }
}
