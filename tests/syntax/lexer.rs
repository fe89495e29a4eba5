//! Lexer tests.

use copywith_syntax::{Lexer, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize_all(source)
        .into_iter()
        .map(|token| token.kind)
        .filter(|kind| !kind.is_trivia())
        .collect()
}

#[test]
fn attribute_then_declaration() {
    assert_eq!(
        kinds("@CopyWith struct S {}"),
        vec![
            TokenKind::At,
            TokenKind::Identifier("CopyWith".into()),
            TokenKind::Identifier("struct".into()),
            TokenKind::Identifier("S".into()),
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_trivia() {
    let tokens = Lexer::tokenize_all("// leading\nstruct /* inline */ S {}");
    assert!(tokens.iter().any(|token| token.kind.is_trivia()));
    assert_eq!(kinds("// leading\nstruct /* inline */ S {}").len(), 5);
}

#[test]
fn spans_are_one_based() {
    let source = "struct S {\n    var a: Int\n}";
    let tokens = Lexer::tokenize_all(source);
    let var = tokens.iter().find(|token| token.is_word("var")).unwrap();
    assert_eq!(var.span.line, 2);
    assert_eq!(var.span.column, 5);
    assert_eq!(var.text(source), "var");
    assert!(var.leading_newline);
}

#[test]
fn unterminated_input_yields_error_token() {
    let tokens = Lexer::tokenize_all("let a = \"open");
    assert!(
        tokens
            .iter()
            .any(|token| matches!(&token.kind, TokenKind::Error(m) if m.contains("unterminated")))
    );

    let tokens = Lexer::tokenize_all("/* never closed");
    assert!(
        tokens
            .iter()
            .any(|token| matches!(&token.kind, TokenKind::Error(m) if m == "unterminated block comment"))
    );
}

#[test]
fn tokenize_all_ends_with_eof() {
    for source in ["", "struct", "@", "}}}"] {
        let tokens = Lexer::tokenize_all(source);
        assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }
}
