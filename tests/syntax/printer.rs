//! Extension printing tests.

use copywith_syntax::ast::{
    Argument, Expr, FunctionDecl, GeneratedMember, Modifier, Parameter, Stmt,
};
use copywith_syntax::{ExtensionDecl, PrinterConfig, parse_type, pretty_print_all, pretty_print_extension};
use copywith_syntax::pretty::pretty_print_extension_with_config;

fn copy_function(params: &[(&str, &str)]) -> FunctionDecl {
    FunctionDecl {
        attributes: vec![],
        modifiers: vec![],
        name: "copyWith".into(),
        params: params
            .iter()
            .map(|(name, ty)| Parameter {
                name: (*name).into(),
                ty: parse_type(ty).unwrap(),
                default: Some(Expr::Nil),
            })
            .collect(),
        rethrows: false,
        return_type: Some(parse_type("Point").unwrap()),
        body: vec![Stmt::Expr(Expr::vertical_call(
            Expr::ident("Point"),
            params
                .iter()
                .map(|(name, _)| {
                    Argument::labeled(
                        *name,
                        Expr::binary(Expr::ident(*name), "??", Expr::self_member(*name)),
                    )
                })
                .collect(),
        ))],
    }
}

fn point_extension() -> ExtensionDecl {
    let mut extension = ExtensionDecl::new(parse_type("Point").unwrap(), vec![Modifier::new("public")]);
    extension.members.push(GeneratedMember::Function(copy_function(&[
        ("x", "Double?"),
        ("y", "Double?"),
    ])));
    extension
}

#[test]
fn prints_defaulted_parameters_and_vertical_call() {
    let expected = "public extension Point {
    func copyWith(x: Double? = nil, y: Double? = nil) -> Point {
        Point(
            x: x ?? self.x,
            y: y ?? self.y
        )
    }
}";
    assert_eq!(pretty_print_extension(&point_extension()), expected);
}

#[test]
fn reserved_names_are_escaped_in_expressions() {
    let mut extension = ExtensionDecl::new(parse_type("Point").unwrap(), vec![]);
    extension
        .members
        .push(GeneratedMember::Function(copy_function(&[("default", "Int?")])));
    let printed = pretty_print_extension(&extension);
    assert!(printed.contains("func copyWith(default: Int? = nil) -> Point {"), "{printed}");
    assert!(printed.contains("default: `default` ?? self.default"), "{printed}");
}

#[test]
fn tab_indentation_applies_at_every_level() {
    let printed = pretty_print_extension_with_config(
        &point_extension(),
        &PrinterConfig::default().with_tabs(true),
    );
    assert!(printed.contains("\n\tfunc copyWith("));
    assert!(printed.contains("\n\t\tPoint(\n\t\t\tx: x ?? self.x,"));
    assert!(printed.ends_with("\n\t}\n}"));
}

#[test]
fn print_all_separates_extensions() {
    let printed = pretty_print_all(
        &[point_extension(), point_extension()],
        &PrinterConfig::default(),
    );
    assert_eq!(printed.matches("public extension Point {").count(), 2);
    assert!(printed.contains("}\n\npublic extension Point {"));
}
