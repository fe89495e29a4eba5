//! Whole-file parsing tests.

use copywith_foundation::ErrorKind;
use copywith_syntax::ast::{BindingSpecifier, Member, Pattern};
use copywith_syntax::{DeclGroupKind, parse};

const MODELS: &str = r#"import Foundation

/// A user profile.
@CopyWith
public struct Profile: Codable, Sendable {
    public static let empty = Profile(id: 0, name: "")

    public let id: Int
    public var name: String
    public var nickname: String?
    var tags = [String]()

    public init(id: Int, name: String) {
        self.id = id
        self.name = name
    }

    enum CodingKeys: String, CodingKey {
        case id, name, nickname, tags
    }

    var displayName: String {
        nickname ?? name
    }
}

@Mutating
final class Store {
    var profiles: [Profile] = []
}

#if DEBUG
@MutatedCopy
protocol Preview {}
#endif
"#;

#[test]
fn parses_realistic_file() {
    let file = parse(MODELS).unwrap();
    let kinds: Vec<_> = file.declarations.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DeclGroupKind::Struct, DeclGroupKind::Class, DeclGroupKind::Protocol]
    );

    let profile = &file.declarations[0];
    assert_eq!(profile.name, "Profile");
    assert!(profile.attribute("CopyWith").is_some());
    assert!(profile.inherits("Codable"));
    assert!(profile.inherits("Sendable"));
    assert_eq!(profile.variables().count(), 6);
    assert_eq!(profile.nested_groups().count(), 1);
    assert!(
        profile
            .members
            .iter()
            .any(|member| matches!(member, Member::Other { keyword, .. } if keyword == "init"))
    );
}

#[test]
fn variables_keep_order_and_specifiers() {
    let file = parse(MODELS).unwrap();
    let names: Vec<_> = file.declarations[0]
        .variables()
        .map(|variable| {
            let Pattern::Identifier(name) = &variable.bindings[0].pattern else {
                panic!("expected identifier pattern");
            };
            (variable.specifier, name.clone())
        })
        .collect();
    assert_eq!(
        names,
        vec![
            (BindingSpecifier::Let, "empty".to_string()),
            (BindingSpecifier::Let, "id".to_string()),
            (BindingSpecifier::Var, "name".to_string()),
            (BindingSpecifier::Var, "nickname".to_string()),
            (BindingSpecifier::Var, "tags".to_string()),
            (BindingSpecifier::Var, "displayName".to_string()),
        ]
    );
}

#[test]
fn walk_visits_nested_with_parents() {
    let file = parse("enum A {\n    struct B {\n        class C {}\n    }\n}\nstruct D {}").unwrap();
    let mut seen = Vec::new();
    file.walk(&mut |decl, parents| {
        let path: Vec<_> = parents.iter().map(|p| p.name.as_str()).collect();
        seen.push((decl.name.clone(), path.join(".")));
    });
    assert_eq!(
        seen,
        vec![
            ("A".to_string(), String::new()),
            ("B".to_string(), "A".to_string()),
            ("C".to_string(), "A.B".to_string()),
            ("D".to_string(), String::new()),
        ]
    );
}

#[test]
fn attribute_span_points_at_at_sign() {
    let source = "struct Outer {\n  @CopyWith\n  struct Inner { var a: Int }\n}";
    let file = parse(source).unwrap();
    let inner = file.declarations[0].nested_groups().next().unwrap();
    let attribute = inner.attribute("CopyWith").unwrap();
    assert_eq!((attribute.span.line, attribute.span.column), (2, 3));
    assert_eq!(attribute.span.text(source), "@CopyWith");
}

#[test]
fn parse_errors_carry_position() {
    let err = parse("struct S {\n    var a: [Int\n}").unwrap_err();
    let ErrorKind::ParseError { line, .. } = err.kind else {
        panic!("expected parse error, got {:?}", err.kind);
    };
    assert!(line >= 2);
}

#[test]
fn stray_closing_brace_is_error() {
    assert!(parse("struct S {}\n}").is_err());
}
