//! Configuration and file handling tests.

use std::fs;
use std::path::PathBuf;

use copywith_foundation::ErrorKind;
use copywith_runtime::{ExpansionConfig, ExpansionSession};

const POINT: &str = "@CopyWith\nstruct Point {\n    var x: Double\n    var label = makeLabel()\n}\n";

/// A scratch file removed on drop.
struct ScratchFile(PathBuf);

impl ScratchFile {
    fn new(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!("copywith-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        Self(path)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

#[test]
fn expand_file_matches_expand_source() {
    let file = ScratchFile::new("point.swift", POINT);
    let session = ExpansionSession::new();
    let from_file = session.expand_file(&file.0).unwrap();
    let from_source = session.expand_source(POINT).unwrap();
    assert_eq!(from_file, from_source);
    assert!(from_file.source.ends_with("}\n\nextension Point {\n    func copyWith(x: Double? = nil) -> Point {\n        Point(\n            x: x ?? self.x\n        )\n    }\n}\n"));
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("copywith-definitely-missing.swift");
    let err = ExpansionSession::new().expand_file(&path).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Io(_)));
}

#[test]
fn parse_error_names_the_file() {
    let file = ScratchFile::new("broken.swift", "struct Broken {\n    var a: [Int\n");
    let err = ExpansionSession::new().expand_file(&file.0).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ParseError { .. }));
    let context = err.context.unwrap();
    assert!(context.source.unwrap().ends_with("broken.swift"));
    assert!(context.line.is_some());
}

#[test]
fn strict_inference_reports_untyped_property() {
    let session = ExpansionSession::with_config(ExpansionConfig::strict());
    let expansion = session.expand_source(POINT).unwrap();
    assert_eq!(expansion.diagnostics.len(), 1);
    assert_eq!(
        expansion.diagnostics[0].message(),
        "Cannot infer type of `label`, add an explicit type annotation"
    );
    assert_eq!(expansion.extension_count, 0);
    assert!(!expansion.source.contains("extension"));
}

#[test]
fn printer_and_separator_settings() {
    let config = ExpansionConfig::default()
        .with_indent_width(2)
        .with_separator("\n\n// Generated\n");
    let expansion = ExpansionSession::with_config(config)
        .expand_source("@MutatedCopy\nstruct S {\n    var a: Int\n}")
        .unwrap();
    assert!(expansion.source.contains("}\n\n// Generated\nextension S {\n  func mutatedCopy("));
    assert!(expansion.source.contains("\n    var mutableCopy = self\n"));
}

#[test]
fn diagnostics_convert_to_located_errors() {
    let expansion = ExpansionSession::new()
        .expand_source("struct Outer {\n    @Mutating\n    struct Inner {}\n}")
        .unwrap();
    let diagnostic = expansion.diagnostics[0].clone();
    assert_eq!(diagnostic.to_string(), "2:5: error: Must be `class` or `protocol` declaration");

    let error = diagnostic.into_error(Some("Models.swift"));
    assert_eq!(error.kind, ErrorKind::NotReferenceTypeOrProtocol);
    assert!(error.is_expansion_error());
}
