//! Member generation tests, from parsed declarations.

use copywith_engine::copy_with::{FUNCTION_NAME, SELECTOR_NAME};
use copywith_engine::mutation::{MUTATED_COPY, MUTATING};
use copywith_engine::{MutationShape, generate_copy_with, generate_mutation, normalize, stored_properties};
use copywith_foundation::TypeExpr;
use copywith_syntax::ast::{Expr, FunctionDecl, GeneratedMember, Modifier, Stmt};
use copywith_syntax::{ExtensionDecl, parse, pretty_print_extension};

fn copy_with_for(source: &str) -> ExtensionDecl {
    let file = parse(source).unwrap();
    let decl = &file.declarations[0];
    let properties = stored_properties(decl).unwrap();
    generate_copy_with(&TypeExpr::path(&decl.name), &properties, normalize(&decl.modifiers))
}

fn function(extension: &ExtensionDecl) -> &FunctionDecl {
    extension
        .members
        .iter()
        .find_map(|member| match member {
            GeneratedMember::Function(function) => Some(function),
            GeneratedMember::Enum(_) => None,
        })
        .unwrap()
}

#[test]
fn parameters_follow_property_types() {
    let extension = copy_with_for(
        "public struct Account {\n    let id: UUID\n    var email: String?\n    var roles = [Role.admin]\n}",
    );
    let function = function(&extension);
    assert_eq!(function.name, FUNCTION_NAME);
    let params: Vec<_> = function
        .params
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty))
        .collect();
    assert_eq!(params, vec!["id: UUID?", "email: OR<String>", "roles: [Role]?"]);
    assert_eq!(function.return_type, Some(TypeExpr::named("Account")));
}

#[test]
fn selector_enum_only_with_optionals() {
    let with = copy_with_for("struct S {\n    var a: Int?\n}");
    assert!(matches!(&with.members[0], GeneratedMember::Enum(e) if e.name == SELECTOR_NAME));
    assert!(matches!(function(&with).body.last(), Some(Stmt::Return(_))));

    let without = copy_with_for("struct S {\n    var a: Int\n}");
    assert_eq!(without.members.len(), 1);
    assert!(matches!(function(&without).body.last(), Some(Stmt::Expr(Expr::Call { .. }))));
}

#[test]
fn selector_enum_shares_extension_access() {
    let extension = copy_with_for("fileprivate struct S {\n    var a: Int?\n}");
    let GeneratedMember::Enum(selector) = &extension.members[0] else {
        panic!("expected selector enum");
    };
    assert_eq!(selector.modifiers, extension.modifiers);
    assert!(pretty_print_extension(&extension).starts_with("fileprivate extension S {\n    fileprivate enum OR<T> {"));
}

#[test]
fn open_and_non_access_modifiers() {
    let extension = copy_with_for("@frozen open struct S {\n    var a: Int\n}");
    assert_eq!(extension.modifiers, vec![Modifier::new("public")]);

    let extension = copy_with_for("private(set) struct S {\n    var a: Int\n}");
    assert!(extension.modifiers.is_empty());
}

#[test]
fn mutation_shapes() {
    let value = generate_mutation(
        MutationShape::Value,
        &TypeExpr::named("Point"),
        &TypeExpr::named("Point"),
        vec![],
    );
    let value_fn = function(&value);
    assert_eq!(value_fn.name, MUTATED_COPY);
    assert!(value_fn.rethrows);
    assert!(value_fn.attributes.is_empty());

    let reference = generate_mutation(
        MutationShape::Reference,
        &TypeExpr::named("Delegate"),
        &TypeExpr::self_type(),
        vec![Modifier::new("public")],
    );
    let reference_fn = function(&reference);
    assert_eq!(reference_fn.name, MUTATING);
    assert_eq!(reference_fn.attributes, vec!["discardableResult".to_string()]);
    assert_eq!(reference_fn.return_type, Some(TypeExpr::self_type()));
    assert!(pretty_print_extension(&reference).starts_with("public extension Delegate {\n    @discardableResult\n"));
}
