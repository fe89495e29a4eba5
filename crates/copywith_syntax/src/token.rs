//! Token types for the Swift declaration subset.
//!
//! Tokens are the output of the lexer and input to the parser. Keywords are
//! lexed as identifiers; the parser gives them meaning by position, the same
//! way Swift treats most of its contextual keywords.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
    /// Whether a line break separates this token from the previous one.
    pub leading_newline: bool,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span, leading_newline: bool) -> Self {
        Self {
            kind,
            span,
            leading_newline,
        }
    }

    /// Returns the text this token covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }

    /// Returns true if this token opens a bracketed group.
    #[must_use]
    pub const fn is_open_delimiter(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace
        )
    }

    /// Returns true if this token closes a bracketed group.
    #[must_use]
    pub const fn is_close_delimiter(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        )
    }

    /// Returns true if this is the unescaped identifier `word`.
    #[must_use]
    pub fn is_word(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Identifier(name) if name == word)
    }
}

/// Token types.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,

    // Punctuation
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `.`
    Dot,
    /// `=`
    Equal,
    /// `->`
    Arrow,
    /// `@`
    At,
    /// `\`
    Backslash,
    /// Postfix `?` bound to the preceding token.
    Question,
    /// Postfix `!` bound to the preceding token.
    Bang,

    // Literals
    /// Integer literal, raw text such as `42`, `0xFF` or `1_000`.
    Int(String),
    /// Float literal, raw text such as `1.0` or `2e10`.
    Float(String),
    /// String literal contents between the delimiters.
    String {
        /// Raw contents.
        text: String,
        /// `"""` literal.
        multiline: bool,
    },

    // Names
    /// Identifier or keyword like `struct`, `var`, `foo`.
    Identifier(String),
    /// Backtick-escaped identifier like `` `default` ``.
    EscapedIdentifier(String),
    /// `#if`, `#selector`, ...
    PoundKeyword(String),
    /// Operator run like `??`, `==`, `&`.
    Operator(String),

    // Meta
    /// Comment text including the delimiters.
    Comment(String),
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Returns true if this token kind should be ignored during parsing.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Comma => "','",
            Self::Colon => "':'",
            Self::Semicolon => "';'",
            Self::Dot => "'.'",
            Self::Equal => "'='",
            Self::Arrow => "'->'",
            Self::At => "'@'",
            Self::Backslash => "'\\'",
            Self::Question => "'?'",
            Self::Bang => "'!'",
            Self::Int(_) => "integer literal",
            Self::Float(_) => "float literal",
            Self::String { .. } => "string literal",
            Self::Identifier(_) | Self::EscapedIdentifier(_) => "identifier",
            Self::PoundKeyword(_) => "pound keyword",
            Self::Operator(_) => "operator",
            Self::Comment(_) => "comment",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
        }
    }
}
