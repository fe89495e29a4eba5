//! Stored-property classification tests.

use copywith_engine::{StoredProperty, has_mutable_storage, stored_properties};
use copywith_foundation::{ErrorKind, TypeExpr};
use copywith_syntax::ast::BindingSpecifier;
use copywith_syntax::parse;

fn classify(source: &str) -> Vec<StoredProperty> {
    let file = parse(source).unwrap();
    stored_properties(&file.declarations[0]).unwrap()
}

#[test]
fn keeps_member_wise_initializer_order() {
    let properties = classify(
        "struct Settings {
    static var shared = Settings()
    let id: Int
    let version = 2
    var theme: String = \"dark\"
    lazy var cache = Cache()
    var label: String { theme.uppercased() }
    var volume = 0.5 {
        didSet { clamp() }
    }
    func clamp() {}
}",
    );
    let summary: Vec<_> = properties
        .iter()
        .map(|p| (p.name.as_str(), p.ty.as_ref().map(ToString::to_string)))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("id", Some("Int".to_string())),
            ("theme", Some("String".to_string())),
            ("cache", Some("Cache".to_string())),
            ("volume", Some("Double".to_string())),
        ]
    );
}

#[test]
fn records_mutability_and_optionality() {
    let properties = classify("struct S {\n    let a: Int?\n    var b: [Int]\n}");
    assert_eq!(properties[0].mutability, BindingSpecifier::Let);
    assert!(properties[0].is_optional());
    assert!(!properties[0].is_mutable());
    assert!(properties[1].is_mutable());
    assert_eq!(properties[1].ty, Some(TypeExpr::array(TypeExpr::named("Int"))));
}

#[test]
fn unresolvable_initializer_keeps_property_untyped() {
    let properties = classify("struct S {\n    var a = makeValue()\n}");
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].ty, None);
    assert!(!properties[0].is_optional());
}

#[test]
fn multiple_bindings_fail() {
    for source in [
        "struct S {\n    var a = 1, b = 2\n}",
        "struct S {\n    let (a, b): (Int, Int)\n}",
        "struct S {\n    static let (a, b) = (1, 2)\n}",
    ] {
        let file = parse(source).unwrap();
        let err = stored_properties(&file.declarations[0]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MultipleBindings, "{source}");
        assert_eq!(err.to_string(), "Use single variable");
    }
}

#[test]
fn mutable_storage_ignores_computed_and_static() {
    let file = parse(
        "class C {\n    let a: Int\n    static var b = 0\n    var c: Int { a }\n}",
    )
    .unwrap();
    assert!(!has_mutable_storage(&file.declarations[0]).unwrap());

    let file = parse("class C {\n    private(set) var a: Int {\n        willSet {}\n    }\n}").unwrap();
    assert!(has_mutable_storage(&file.declarations[0]).unwrap());
}
