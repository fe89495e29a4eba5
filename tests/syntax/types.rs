//! Type syntax tests.

use copywith_foundation::TypeExpr;
use copywith_syntax::parse_type;
use proptest::prelude::*;

fn type_strategy() -> impl Strategy<Value = TypeExpr> {
    let leaf = prop_oneof![
        Just(TypeExpr::named("Int")),
        Just(TypeExpr::named("String")),
        Just(TypeExpr::named("MyCustomType")),
        Just(TypeExpr::path("Outer.Inner")),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(TypeExpr::optional),
            inner.clone().prop_map(TypeExpr::array),
            (inner.clone(), inner.clone()).prop_map(|(k, v)| TypeExpr::dictionary(k, v)),
            inner.prop_map(|arg| TypeExpr::generic("Set", vec![arg])),
        ]
    })
}

proptest! {
    #[test]
    fn displayed_types_parse_back(ty in type_strategy()) {
        let text = ty.to_string();
        let parsed = parse_type(&text).unwrap();
        prop_assert_eq!(parsed.to_string(), text);
    }

    #[test]
    fn non_optional_strips_one_level(ty in type_strategy()) {
        let wrapped = TypeExpr::optional(ty.clone());
        prop_assert!(wrapped.is_optional());
        prop_assert_eq!(wrapped.non_optional(), &ty);
    }
}

#[test]
fn sugar_and_generic_forms() {
    assert_eq!(parse_type("Int?").unwrap(), parse_type("Optional<Int>").unwrap());
    assert_eq!(
        parse_type("[MyCustomEnum: MyCustomType]").unwrap().to_string(),
        "[MyCustomEnum: MyCustomType]"
    );
    assert_eq!(
        parse_type("Outer.Inner").unwrap().nominal_name().as_deref(),
        Some("Outer.Inner")
    );
}
