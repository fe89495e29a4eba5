//! Macro dispatch tests through the registry.

use copywith_engine::{ExtensionMacro, MacroRegistry};
use copywith_foundation::{ErrorKind, Result, TypeExpr};
use copywith_syntax::ast::Modifier;
use copywith_syntax::{DeclGroup, ExtensionDecl, parse, pretty_print_extension};

fn expand(name: &str, source: &str) -> Result<Vec<String>> {
    let file = parse(source).unwrap();
    let decl = &file.declarations[0];
    let extensions = MacroRegistry::standard().expand(name, decl, &decl.name)?;
    Ok(extensions.iter().map(pretty_print_extension).collect())
}

fn failure(name: &str, source: &str) -> ErrorKind {
    expand(name, source).unwrap_err().kind
}

#[test]
fn kind_failures_per_macro() {
    let cases = [
        ("CopyWith", "class C {}", ErrorKind::NotValueType),
        ("CopyWith", "enum E {}", ErrorKind::NotValueType),
        ("MutableCopy", "protocol P {}", ErrorKind::NotValueType),
        ("MutatedCopy", "class C {}", ErrorKind::NotValueTypeOrProtocol),
        ("MutatedCopy", "actor A {}", ErrorKind::NotValueTypeOrProtocol),
        ("Mutating", "struct S {}", ErrorKind::NotReferenceTypeOrProtocol),
        ("Mutating", "enum E {}", ErrorKind::NotReferenceTypeOrProtocol),
        ("Mutating", "protocol P: Sendable {}", ErrorKind::NotReferenceCapable),
    ];
    for (name, source, kind) in cases {
        assert_eq!(failure(name, source), kind, "@{name} {source}");
    }
}

#[test]
fn failure_messages() {
    assert_eq!(
        expand("CopyWith", "class C {}").unwrap_err().to_string(),
        "Must be `struct` declaration"
    );
    assert_eq!(
        expand("MutatedCopy", "class C {}").unwrap_err().to_string(),
        "Must be `struct` or `protocol` declaration"
    );
    assert_eq!(
        expand("Mutating", "struct S {}").unwrap_err().to_string(),
        "Must be `class` or `protocol` declaration"
    );
    assert_eq!(
        expand("Mutating", "protocol P {}").unwrap_err().to_string(),
        "Protocol must inherit from `AnyObject`"
    );
}

#[test]
fn kind_is_checked_before_properties() {
    assert_eq!(
        failure("CopyWith", "class C {\n    let (a, b): (Int, Int)\n}"),
        ErrorKind::NotValueType
    );
    assert_eq!(
        failure("Mutating", "struct S {\n    var a = 1, b = 2\n}"),
        ErrorKind::NotReferenceTypeOrProtocol
    );
    assert_eq!(
        failure("MutatedCopy", "struct S {\n    var a = 1, b = 2\n}"),
        ErrorKind::MultipleBindings
    );
}

#[test]
fn nothing_to_generate() {
    assert!(expand("CopyWith", "struct S {}").unwrap().is_empty());
    assert!(expand("MutableCopy", "struct S {\n    let a: Int\n}").unwrap().is_empty());
    assert!(expand("MutatedCopy", "struct S {\n    let a: Int\n}").unwrap().is_empty());
    assert!(expand("Mutating", "class C {\n    let a: Int\n}").unwrap().is_empty());
}

#[test]
fn protocols_always_get_a_member() {
    let value = expand("MutatedCopy", "public protocol Configurable {\n    var name: String { get }\n}").unwrap();
    assert_eq!(value.len(), 1);
    assert!(value[0].starts_with("public extension Configurable {"));
    assert!(value[0].contains("(_ it: inout Self) throws -> Void) rethrows -> Self {"));

    let reference = expand("Mutating", "protocol Delegate: AnyObject {}").unwrap();
    assert!(reference[0].contains("func mutating(configuring: (_ it: Self) throws -> Void) rethrows -> Self {"));
}

/// Generates an empty extension carrying only the access level.
struct Marker;

impl ExtensionMacro for Marker {
    fn name(&self) -> &'static str {
        "Marker"
    }

    fn expand(&self, decl: &DeclGroup, type_name: &str) -> Result<Vec<ExtensionDecl>> {
        Ok(vec![ExtensionDecl::new(
            TypeExpr::path(type_name),
            decl.modifiers.iter().map(|m| Modifier::new(m.name.clone())).collect(),
        )])
    }
}

#[test]
fn custom_generators_can_be_registered() {
    let mut registry = MacroRegistry::standard();
    registry.register(Box::new(Marker));
    assert_eq!(registry.len(), 5);
    assert!(registry.contains("Marker"));

    let file = parse("public struct S {}").unwrap();
    let extensions = registry.expand("Marker", &file.declarations[0], "Outer.S").unwrap();
    assert_eq!(pretty_print_extension(&extensions[0]), "public extension Outer.S {\n}");
}

#[test]
fn unknown_attribute_is_not_an_expansion_error() {
    let file = parse("struct S {}").unwrap();
    let err = MacroRegistry::new()
        .expand("CopyWith", &file.declarations[0], "S")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownMacro("CopyWith".into()));
    assert!(!err.is_expansion_error());
}
