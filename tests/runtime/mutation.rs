//! `@MutableCopy`, `@MutatedCopy` and `@Mutating` expansion tests.

use crate::{assert_expansion, expand};

const TUPLE_CLASS: &str = "class SomeStruct {\n    let (a, b): (Int, Int)\n}";
const TUPLE_STRUCT: &str = "struct SomeClass {\n    let (a, b): (Int, Int)\n}";

#[test]
fn mutable_copy() {
    assert_expansion("@MutableCopy\nstruct SomeStruct {\n}", "struct SomeStruct {\n}", &[]);
    assert_expansion(
        &format!("@MutableCopy\n{TUPLE_CLASS}"),
        TUPLE_CLASS,
        &[("Must be `struct` declaration", 1, 1)],
    );
    assert_expansion(
        "@MutableCopy\nstruct SomeStruct {\n    let a: Int\n}",
        "struct SomeStruct {\n    let a: Int\n}",
        &[],
    );
    assert_expansion(
        "@MutableCopy\nstruct SomeStruct {\n    var a: Int\n}",
        "struct SomeStruct {
    var a: Int
}

extension SomeStruct {
    func mutatedCopy(configuring: (_ it: inout SomeStruct) throws -> Void) rethrows -> SomeStruct {
        var mutableCopy = self
        try configuring(&mutableCopy)

        return mutableCopy
    }
}",
        &[],
    );
}

#[test]
fn mutated_copy_struct() {
    assert_expansion("@MutatedCopy\nstruct SomeStruct {\n}", "struct SomeStruct {\n}", &[]);
    assert_expansion(
        &format!("@MutatedCopy\n{TUPLE_CLASS}"),
        TUPLE_CLASS,
        &[("Must be `struct` or `protocol` declaration", 1, 1)],
    );
    assert_expansion(
        "@MutatedCopy\nstruct SomeStruct {\n    let a: Int\n}",
        "struct SomeStruct {\n    let a: Int\n}",
        &[],
    );
    assert_expansion(
        "@MutatedCopy\nstruct SomeStruct {\n    var a: Int\n}",
        "struct SomeStruct {
    var a: Int
}

extension SomeStruct {
    func mutatedCopy(configuring: (_ it: inout SomeStruct) throws -> Void) rethrows -> SomeStruct {
        var mutableCopy = self
        try configuring(&mutableCopy)

        return mutableCopy
    }
}",
        &[],
    );
}

#[test]
fn mutated_copy_protocol() {
    assert_expansion(
        "@MutatedCopy\nprotocol SomeProtocol {}",
        "protocol SomeProtocol {}

extension SomeProtocol {
    func mutatedCopy(configuring: (_ it: inout Self) throws -> Void) rethrows -> Self {
        var mutableCopy = self
        try configuring(&mutableCopy)

        return mutableCopy
    }
}",
        &[],
    );
}

#[test]
fn mutating_class() {
    assert_expansion("@Mutating\nclass SomeClass {\n}", "class SomeClass {\n}", &[]);
    assert_expansion(
        &format!("@Mutating\n{TUPLE_STRUCT}"),
        TUPLE_STRUCT,
        &[("Must be `class` or `protocol` declaration", 1, 1)],
    );
    assert_expansion(
        "@Mutating\nclass SomeClass {\n    let a: Int\n}",
        "class SomeClass {\n    let a: Int\n}",
        &[],
    );
    assert_expansion(
        "@Mutating\nclass SomeClass {\n    var a: Int\n}",
        "class SomeClass {
    var a: Int
}

extension SomeClass {
    @discardableResult
    func mutating(configuring: (_ it: SomeClass) throws -> Void) rethrows -> SomeClass {
        try configuring(self)

        return self
    }
}",
        &[],
    );
}

#[test]
fn mutating_protocol() {
    assert_expansion(
        "@Mutating\nprotocol SomeProtocol: AnyObject {}",
        "protocol SomeProtocol: AnyObject {}

extension SomeProtocol {
    @discardableResult
    func mutating(configuring: (_ it: Self) throws -> Void) rethrows -> Self {
        try configuring(self)

        return self
    }
}",
        &[],
    );
    assert_expansion(
        "@Mutating\nprotocol SomeProtocol {}",
        "protocol SomeProtocol {}",
        &[("Protocol must inherit from `AnyObject`", 1, 1)],
    );
}

#[test]
fn several_macros_on_one_declaration() {
    let expansion = expand(
        "@CopyWith
@MutatedCopy
public struct Point {
    var x: Int
}",
    );
    assert!(expansion.is_clean());
    assert_eq!(expansion.extension_count, 2);
    let copy = expansion.source.find("func copyWith").unwrap();
    let mutated = expansion.source.find("func mutatedCopy").unwrap();
    assert!(copy < mutated);
    assert!(expansion.source.starts_with("public struct Point {"));
    assert!(expansion.source.contains("}\n\npublic extension Point {\n    func mutatedCopy"));
}

#[test]
fn one_failure_does_not_stop_other_declarations() {
    let expansion = expand(
        "@Mutating
struct Broken {}

@Mutating
final class Box {
    var value = 0
}",
    );
    assert_eq!(expansion.diagnostics.len(), 1);
    assert_eq!(expansion.diagnostics[0].line, 1);
    assert_eq!(expansion.extension_count, 1);
    assert!(expansion.source.starts_with("struct Broken {}\n\nfinal class Box {"));
    assert!(expansion.source.contains("func mutating(configuring: (_ it: Box) throws -> Void) rethrows -> Box {"));
}
