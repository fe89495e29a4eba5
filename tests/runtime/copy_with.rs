//! `@CopyWith` expansion tests.

use crate::assert_expansion;

#[test]
fn empty_struct() {
    assert_expansion("@CopyWith\nstruct SomeStruct {\n}", "struct SomeStruct {\n}", &[]);
}

#[test]
fn empty_structs_with_access_modifiers() {
    assert_expansion(
        "@CopyWith
public struct SomeStruct {
}
@CopyWith
open struct SomeStruct1 {
}
@CopyWith
fileprivate struct SomeStruct2 {
}
@CopyWith
internal struct SomeStruct3 {
}",
        "public struct SomeStruct {
}
open struct SomeStruct1 {
}
fileprivate struct SomeStruct2 {
}
internal struct SomeStruct3 {
}",
        &[],
    );
}

#[test]
fn class_and_enum_are_rejected() {
    assert_expansion(
        "@CopyWith\nclass SomeStruct {\n}",
        "class SomeStruct {\n}",
        &[("Must be `struct` declaration", 1, 1)],
    );
    assert_expansion(
        "@CopyWith\nenum SomeStruct {\n}",
        "enum SomeStruct {\n}",
        &[("Must be `struct` declaration", 1, 1)],
    );
}

#[test]
fn computed_only() {
    let body = "struct SomeStruct {
    var someVariable: Int { 1 }
    var someVariable1: Int {
        get { 1 }
        set {}
    }
}";
    assert_expansion(&format!("@CopyWith\n{body}"), body, &[]);
}

#[test]
fn tuple_binding_is_rejected() {
    assert_expansion(
        "@CopyWith\nstruct SomeStruct {\n    let (a, b): (Int, Int)\n}",
        "struct SomeStruct {\n    let (a, b): (Int, Int)\n}",
        &[("Use single variable", 1, 1)],
    );
}

#[test]
fn static_properties_are_skipped() {
    let body = "struct SomeStruct {
    static let someVariable = 1
    class let someVariable1 = false
}";
    assert_expansion(&format!("@CopyWith\n{body}"), body, &[]);
}

#[test]
fn stored_properties() {
    assert_expansion(
        "@CopyWith
    @frozen  public struct SomeStruct {
    let someProperty: Int
    var someProperty1: Bool
}",
        "    @frozen  public struct SomeStruct {
    let someProperty: Int
    var someProperty1: Bool
}

public extension SomeStruct {
    func copyWith(someProperty: Int? = nil, someProperty1: Bool? = nil) -> SomeStruct {
        SomeStruct(
            someProperty: someProperty ?? self.someProperty,
            someProperty1: someProperty1 ?? self.someProperty1
        )
    }
}",
        &[],
    );
}

#[test]
fn inferred_property_types() {
    let body = r#"struct SomeStruct {
    var optionalProperty1 = Optional(false)
    var optionalProperty = Optional.some(1)
    var customDictProperty = [MyCustomEnum.one: MyCustomType(field: 1)]
    var customArrProperty = [MyCustomEnum.one]
    var dictProperty = ["key": "value"]
    var arrProperty = [1]
    let ksomeProperty = 1
    let ksomeProperty1 = true
    let ksomeProperty2 = 1.0
    let ksomeProperty3 = "1.0"
    let ksomeProperty4 = """
    1.0
    """
    let kcustomProperty = MyCustomEnum.one
    let kcustomProperty1 = MyCustomType(field: 1)
    let kcustomProperty2 = MyCustomType.init(field: 1)
    let kcustomProperty3 = MyCustomType.parse("1")
    var someProperty = 1
    var someProperty1 = true
    var someProperty2 = 1.0
    var someProperty3 = "1.0"
    var someProperty4 = """
    1.0
    """
    var customProperty = MyCustomEnum.one
    var customProperty1 = MyCustomType(field: 1)
    var customProperty2 = MyCustomType.init(field: 1)
    var customProperty3 = MyCustomType.parse("1")
}"#;
    let extension = "extension SomeStruct {
    enum OR<T> {
        case value(T)
        case `nil`
        case ignored
    }
    func copyWith(optionalProperty1: OR<Bool> = .ignored, optionalProperty: OR<Int> = .ignored, customDictProperty: [MyCustomEnum: MyCustomType]? = nil, customArrProperty: [MyCustomEnum]? = nil, dictProperty: [String: String]? = nil, arrProperty: [Int]? = nil, someProperty: Int? = nil, someProperty1: Bool? = nil, someProperty2: Double? = nil, someProperty3: String? = nil, someProperty4: String? = nil, customProperty: MyCustomEnum? = nil, customProperty1: MyCustomType? = nil, customProperty2: MyCustomType? = nil, customProperty3: MyCustomType? = nil) -> SomeStruct {
        let optionalProperty1: Bool? = switch optionalProperty1 {
        case let .value(value):
            value
        case .nil:
            nil
        case .ignored:
            self.optionalProperty1
        }
        let optionalProperty: Int? = switch optionalProperty {
        case let .value(value):
            value
        case .nil:
            nil
        case .ignored:
            self.optionalProperty
        }
        return SomeStruct(
            optionalProperty1: optionalProperty1,
            optionalProperty: optionalProperty,
            customDictProperty: customDictProperty ?? self.customDictProperty,
            customArrProperty: customArrProperty ?? self.customArrProperty,
            dictProperty: dictProperty ?? self.dictProperty,
            arrProperty: arrProperty ?? self.arrProperty,
            someProperty: someProperty ?? self.someProperty,
            someProperty1: someProperty1 ?? self.someProperty1,
            someProperty2: someProperty2 ?? self.someProperty2,
            someProperty3: someProperty3 ?? self.someProperty3,
            someProperty4: someProperty4 ?? self.someProperty4,
            customProperty: customProperty ?? self.customProperty,
            customProperty1: customProperty1 ?? self.customProperty1,
            customProperty2: customProperty2 ?? self.customProperty2,
            customProperty3: customProperty3 ?? self.customProperty3
        )
    }
}";
    assert_expansion(
        &format!("@CopyWith\n{body}"),
        &format!("{body}\n\n{extension}"),
        &[],
    );
}

#[test]
fn optional_properties() {
    let body = "public struct SomeStruct {
    let someProperty: String?
    let someProperty1: Int
    let someProperty2: Bool?
}";
    let extension = "public extension SomeStruct {
    public enum OR<T> {
        case value(T)
        case `nil`
        case ignored
    }
    func copyWith(someProperty: OR<String> = .ignored, someProperty1: Int? = nil, someProperty2: OR<Bool> = .ignored) -> SomeStruct {
        let someProperty: String? = switch someProperty {
        case let .value(value):
            value
        case .nil:
            nil
        case .ignored:
            self.someProperty
        }
        let someProperty2: Bool? = switch someProperty2 {
        case let .value(value):
            value
        case .nil:
            nil
        case .ignored:
            self.someProperty2
        }
        return SomeStruct(
            someProperty: someProperty,
            someProperty1: someProperty1 ?? self.someProperty1,
            someProperty2: someProperty2
        )
    }
}";
    assert_expansion(
        &format!("@CopyWith\n{body}"),
        &format!("{body}\n\n{extension}"),
        &[],
    );
}

#[test]
fn computed_and_observed_properties() {
    let body = "internal struct SomeStruct {
    let someProperty: Int
    private(set) var someProperty1: Bool {
        willSet { print(newValue) }
        didSet { print(oldValue, someProperty1) }
    }
    var someProperty2: String { String(someProperty) }
    var someProperty3: Int {
        get { someProperty1 ? 1 : 0 }
        set { someProperty1 = newValue == 0 ? false : true }
    }
}";
    let extension = "internal extension SomeStruct {
    func copyWith(someProperty: Int? = nil, someProperty1: Bool? = nil) -> SomeStruct {
        SomeStruct(
            someProperty: someProperty ?? self.someProperty,
            someProperty1: someProperty1 ?? self.someProperty1
        )
    }
}";
    assert_expansion(
        &format!("@CopyWith\n{body}"),
        &format!("{body}\n\n{extension}"),
        &[],
    );
}

#[test]
fn nested_struct_extends_qualified_name_after_outer_declaration() {
    let expansion = crate::expand(
        "enum Namespace {
    @CopyWith
    struct Point {
        var x: Double
    }
}",
    );
    assert!(expansion.is_clean());
    assert_eq!(
        expansion.source,
        "enum Namespace {
    struct Point {
        var x: Double
    }
}

extension Namespace.Point {
    func copyWith(x: Double? = nil) -> Namespace.Point {
        Namespace.Point(
            x: x ?? self.x
        )
    }
}"
    );
}

#[test]
fn specialized_optional_initializers_use_selector() {
    let body = "struct SomeStruct {
    var a = Optional<Int>.none
    var b = Optional<Int>(5)
    var c: Optional<Int>
}";
    let extension = "extension SomeStruct {
    enum OR<T> {
        case value(T)
        case `nil`
        case ignored
    }
    func copyWith(a: OR<Int> = .ignored, b: OR<Int> = .ignored, c: OR<Int> = .ignored) -> SomeStruct {
        let a: Int? = switch a {
        case let .value(value):
            value
        case .nil:
            nil
        case .ignored:
            self.a
        }
        let b: Int? = switch b {
        case let .value(value):
            value
        case .nil:
            nil
        case .ignored:
            self.b
        }
        let c: Int? = switch c {
        case let .value(value):
            value
        case .nil:
            nil
        case .ignored:
            self.c
        }
        return SomeStruct(
            a: a,
            b: b,
            c: c
        )
    }
}";
    assert_expansion(
        &format!("@CopyWith\n{body}"),
        &format!("{body}\n\n{extension}"),
        &[],
    );
}

#[test]
fn private_struct_extension_is_fileprivate() {
    let body = "private struct SomeStruct {
    var a: Int?
}";
    let extension = "fileprivate extension SomeStruct {
    fileprivate enum OR<T> {
        case value(T)
        case `nil`
        case ignored
    }
    func copyWith(a: OR<Int> = .ignored) -> SomeStruct {
        let a: Int? = switch a {
        case let .value(value):
            value
        case .nil:
            nil
        case .ignored:
            self.a
        }
        return SomeStruct(
            a: a
        )
    }
}";
    assert_expansion(
        &format!("@CopyWith\n{body}"),
        &format!("{body}\n\n{extension}"),
        &[],
    );
}

#[test]
fn conditionally_compiled_members_are_ignored() {
    let body = "struct SomeStruct {
    #if DEBUG
    var debug: Int
    #else
    var release: Int
    #endif
    var a: Int
}";
    let extension = "extension SomeStruct {
    func copyWith(a: Int? = nil) -> SomeStruct {
        SomeStruct(
            a: a ?? self.a
        )
    }
}";
    assert_expansion(
        &format!("@CopyWith\n{body}"),
        &format!("{body}\n\n{extension}"),
        &[],
    );
}
