//! Lexer for the Swift declaration subset.
//!
//! The lexer converts source text into a stream of tokens. It understands
//! enough of Swift's lexical grammar to skip arbitrary code safely: nested
//! block comments, multi-line and raw string literals with interpolation,
//! operator runs, and the left-bound postfix `?`/`!` that distinguishes
//! `Int?` from the `??` operator.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer for Swift source code.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
    /// Whether a line break was skipped since the last significant token.
    pending_newline: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            line: 1,
            column: 1,
            pending_newline: false,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;
        let leading_newline = self.pending_newline;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(start, start, start_line, start_column),
                leading_newline,
            );
        };

        let kind = match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            ':' => self.single(TokenKind::Colon),
            '@' => self.single(TokenKind::At),
            '\\' => self.single(TokenKind::Backslash),
            '"' => self.scan_string(0),
            '#' => self.scan_hash(),
            '`' => self.scan_escaped_identifier(),
            '/' if self.peek_char_n(1) == Some('/') => self.scan_line_comment(),
            '/' if self.peek_char_n(1) == Some('*') => self.scan_block_comment(),
            '.' if self.peek_char_n(1) != Some('.') => self.single(TokenKind::Dot),
            '?' if self.is_left_bound() => self.single(TokenKind::Question),
            '!' if self.is_left_bound() => self.single(TokenKind::Bang),
            c if c.is_ascii_digit() => self.scan_number(),
            c if c == '.' || is_operator_char(c) => self.scan_operator(),
            c if is_identifier_start(c) => self.scan_identifier(),
            c => {
                self.advance();
                TokenKind::Error(format!("unexpected character: {c}"))
            }
        };

        if !kind.is_trivia() {
            self.pending_newline = false;
        }

        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column),
            leading_newline,
        )
    }

    /// Tokenizes all source and returns a vector of tokens ending in `Eof`.
    ///
    /// Comments are included in the output.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks `n` characters ahead.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    /// Consumes one character and yields `kind`.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// True when the character before the cursor binds a postfix operator.
    fn is_left_bound(&self) -> bool {
        self.source[..self.position]
            .chars()
            .next_back()
            .is_some_and(|prev| {
                !prev.is_whitespace() && !matches!(prev, '(' | '[' | '{' | ',' | ';' | ':')
            })
    }

    /// Skips whitespace, remembering line breaks.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            if c == '\n' {
                self.pending_newline = true;
            }
            self.advance();
        }
    }

    /// Scans a `//` comment up to (not including) the line break.
    fn scan_line_comment(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        TokenKind::Comment(self.source[start..self.position].to_string())
    }

    /// Scans a `/* */` comment; Swift block comments nest.
    fn scan_block_comment(&mut self) -> TokenKind {
        let start = self.position;
        self.advance_by(2);
        let mut depth = 1usize;
        while depth > 0 {
            if self.rest.starts_with("/*") {
                depth += 1;
                self.advance_by(2);
            } else if self.rest.starts_with("*/") {
                depth -= 1;
                self.advance_by(2);
            } else if let Some(c) = self.peek_char() {
                if c == '\n' {
                    self.pending_newline = true;
                }
                self.advance();
            } else {
                return TokenKind::Error("unterminated block comment".into());
            }
        }
        TokenKind::Comment(self.source[start..self.position].to_string())
    }

    /// Scans tokens starting with `#`: raw strings and pound keywords.
    fn scan_hash(&mut self) -> TokenKind {
        let hashes = self.rest.chars().take_while(|&c| c == '#').count();
        if self.rest[hashes..].starts_with('"') {
            self.advance_by(hashes);
            return self.scan_string(hashes);
        }

        self.advance(); // consume '#'
        match self.peek_char() {
            Some(c) if is_identifier_start(c) => TokenKind::PoundKeyword(self.scan_identifier_text()),
            Some(c) => TokenKind::Error(format!("unexpected character after #: {c}")),
            None => TokenKind::Error("unexpected end of input after #".into()),
        }
    }

    /// Scans a string literal whose opening quote is at the cursor.
    ///
    /// `hashes` is the number of `#` already consumed for a raw string.
    fn scan_string(&mut self, hashes: usize) -> TokenKind {
        let multiline = self.rest.starts_with("\"\"\"");
        let quote_len = if multiline { 3 } else { 1 };
        self.advance_by(quote_len);
        let content_start = self.position;

        loop {
            let Some(c) = self.peek_char() else {
                return TokenKind::Error("unterminated string literal".into());
            };

            if c == '"' && self.closes_string(multiline, hashes) {
                let text = self.source[content_start..self.position].to_string();
                self.advance_by(quote_len + hashes);
                return TokenKind::String { text, multiline };
            }

            if c == '\n' && !multiline {
                return TokenKind::Error("unterminated string literal".into());
            }

            if c == '\\' && self.rest[1..].starts_with(&"#".repeat(hashes)) {
                self.advance_by(1 + hashes);
                match self.peek_char() {
                    Some('(') => {
                        if let Err(message) = self.skip_interpolation() {
                            return TokenKind::Error(message);
                        }
                    }
                    Some(_) => self.advance(),
                    None => {
                        return TokenKind::Error("unexpected end of input in string escape".into());
                    }
                }
                continue;
            }

            self.advance();
        }
    }

    fn closes_string(&self, multiline: bool, hashes: usize) -> bool {
        let quotes = if multiline { "\"\"\"" } else { "\"" };
        self.rest.starts_with(quotes) && self.rest[quotes.len()..].starts_with(&"#".repeat(hashes))
    }

    /// Skips `( ... )` inside a string interpolation, including nested strings.
    fn skip_interpolation(&mut self) -> Result<(), String> {
        let mut depth = 0usize;
        while let Some(c) = self.peek_char() {
            match c {
                '(' => {
                    depth += 1;
                    self.advance();
                }
                ')' => {
                    self.advance();
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '"' => {
                    if let TokenKind::Error(message) = self.scan_string(0) {
                        return Err(message);
                    }
                }
                _ => self.advance(),
            }
        }
        Err("unterminated string interpolation".into())
    }

    /// Scans a backtick-escaped identifier.
    fn scan_escaped_identifier(&mut self) -> TokenKind {
        self.advance(); // consume opening '`'
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c == '`' {
                let name = self.source[start..self.position].to_string();
                self.advance();
                if name.is_empty() {
                    return TokenKind::Error("empty escaped identifier".into());
                }
                return TokenKind::EscapedIdentifier(name);
            }
            if c == '\n' {
                break;
            }
            self.advance();
        }
        TokenKind::Error("unterminated escaped identifier".into())
    }

    /// Scans an integer or floating-point literal.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.position;
        let radix_prefix = ["0x", "0b", "0o"]
            .iter()
            .find(|prefix| self.rest.starts_with(**prefix))
            .copied();

        if let Some(prefix) = radix_prefix {
            self.advance_by(2);
            while self
                .peek_char()
                .is_some_and(|c| c.is_ascii_hexdigit() || c == '_')
            {
                self.advance();
            }
            let mut is_float = false;
            if prefix == "0x" {
                if self.peek_char() == Some('.')
                    && self.peek_char_n(1).is_some_and(|c| c.is_ascii_hexdigit())
                {
                    is_float = true;
                    self.advance();
                    self.consume_while(|c| c.is_ascii_hexdigit() || c == '_');
                }
                if matches!(self.peek_char(), Some('p' | 'P')) {
                    is_float = true;
                    self.scan_exponent();
                }
            }
            let text = self.source[start..self.position].to_string();
            return if is_float {
                TokenKind::Float(text)
            } else {
                TokenKind::Int(text)
            };
        }

        self.consume_while(|c| c.is_ascii_digit() || c == '_');
        let mut is_float = false;
        if self.peek_char() == Some('.') && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.advance();
            self.consume_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let digit_follows = match self.peek_char_n(1) {
                Some('+' | '-') => self.peek_char_n(2).is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if digit_follows {
                is_float = true;
                self.scan_exponent();
            }
        }

        let text = self.source[start..self.position].to_string();
        if is_float {
            TokenKind::Float(text)
        } else {
            TokenKind::Int(text)
        }
    }

    /// Consumes an exponent marker, optional sign and digits.
    fn scan_exponent(&mut self) {
        self.advance();
        if matches!(self.peek_char(), Some('+' | '-')) {
            self.advance();
        }
        self.consume_while(|c| c.is_ascii_digit() || c == '_');
    }

    fn consume_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Scans an operator run.
    fn scan_operator(&mut self) -> TokenKind {
        let start = self.position;
        let first = self.peek_char().unwrap_or('.');
        self.advance();

        if first == '.' {
            // Dot operators like `...` and `..<`
            self.consume_while(|c| c == '.' || (is_operator_char(c) && c != '?' && c != '!'));
        } else {
            let mut only_questions = first == '?';
            while let Some(c) = self.peek_char() {
                if c == '/' && matches!(self.peek_char_n(1), Some('/' | '*')) {
                    break;
                }
                match c {
                    '?' if only_questions => self.advance(),
                    '?' | '!' => break,
                    c if is_operator_char(c) => {
                        only_questions = false;
                        self.advance();
                    }
                    _ => break,
                }
            }
        }

        match &self.source[start..self.position] {
            "=" => TokenKind::Equal,
            "->" => TokenKind::Arrow,
            text => TokenKind::Operator(text.to_string()),
        }
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> TokenKind {
        TokenKind::Identifier(self.scan_identifier_text())
    }

    fn scan_identifier_text(&mut self) -> String {
        let start = self.position;
        self.consume_while(is_identifier_char);
        self.source[start..self.position].to_string()
    }
}

/// Returns true if `c` can start an identifier.
fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Returns true if `c` can continue an identifier.
fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Returns true if `c` can appear in an operator.
fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '/' | '=' | '-' | '+' | '!' | '*' | '%' | '<' | '>' | '&' | '|' | '^' | '~' | '?'
    )
}
