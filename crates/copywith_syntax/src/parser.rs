//! Parser for the Swift declaration subset.
//!
//! The parser converts a stream of tokens into [`DeclGroup`] trees. It parses
//! what expansion needs in full (type declarations, their attributes,
//! modifiers and inheritance, stored-property bindings, type annotations and
//! initializer expressions) and skips everything else by bracket depth and
//! line structure, keeping only spans.

use copywith_foundation::{
    Error, FunctionParam, FunctionType, OpaqueKind, PathSegment, Result, TupleElement, TypeExpr,
};

use crate::ast::{
    AccessorBlock, AccessorKind, Argument, Attribute, BindingSpecifier, DeclGroup, DeclGroupKind,
    Expr, Member, Modifier, Pattern, PatternBinding, SourceFile, VariableDecl,
};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Words parsed as declaration modifiers.
const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "fileprivate",
    "internal",
    "package",
    "open",
    "static",
    "final",
    "override",
    "mutating",
    "nonmutating",
    "lazy",
    "weak",
    "unowned",
    "dynamic",
    "optional",
    "required",
    "convenience",
    "indirect",
    "nonisolated",
    "isolated",
    "distributed",
    "prefix",
    "postfix",
    "infix",
    "consuming",
    "borrowing",
    "__consuming",
];

/// Declaration keywords that may follow a `class` modifier.
const CLASS_MEMBER_KEYWORDS: &[&str] = &["let", "var", "func", "subscript", "typealias"];

/// Words that continue a skipped statement onto a new line.
const CONTINUATION_WORDS: &[&str] = &["where", "throws", "rethrows", "async", "as", "is"];

/// What a declaration prefix turned out to introduce.
enum Declared {
    Group(DeclGroup),
    Variable(VariableDecl),
    Other { keyword: String, span: Span },
}

/// Saved parser position for backtracking.
#[derive(Clone, Copy)]
struct Checkpoint {
    pos: usize,
    splits: usize,
}

/// Parser for Swift source code.
pub struct Parser<'src> {
    /// Source text (for error messages and raw attribute arguments).
    source: &'src str,
    /// Significant tokens, always ending in `Eof`.
    tokens: Vec<Token>,
    /// Index of the current token.
    pos: usize,
    /// Tokens rewritten by splitting `>>`, for undoing on backtrack.
    split_log: Vec<(usize, Token)>,
    /// First lexical error, reported before parsing starts.
    lex_error: Option<(String, Span)>,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut tokens: Vec<Token> = Lexer::tokenize_all(source)
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            tokens.push(Token::new(
                TokenKind::Eof,
                Span::new(source.len(), source.len(), 1, 1),
                false,
            ));
        }
        let lex_error = tokens.iter().find_map(|t| match &t.kind {
            TokenKind::Error(message) => Some((message.clone(), t.span)),
            _ => None,
        });
        Self {
            source,
            tokens,
            pos: 0,
            split_log: Vec::new(),
            lex_error,
        }
    }

    /// Parses a whole source file.
    ///
    /// # Errors
    /// Returns an error if the source cannot be tokenized or a type
    /// declaration is malformed.
    pub fn parse_file(&mut self) -> Result<SourceFile> {
        self.check_lex_error()?;
        let mut declarations = Vec::new();

        loop {
            let token = self.current();
            match &token.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon => self.advance(),
                TokenKind::PoundKeyword(word) if is_directive(word) => self.skip_directive(),
                _ if token.is_close_delimiter() => {
                    return Err(self.error(&format!("unexpected {}", token.kind.name())));
                }
                _ => {
                    if let Declared::Group(group) = self.parse_declaration(true)? {
                        declarations.push(group);
                    }
                }
            }
        }

        Ok(SourceFile { declarations })
    }

    /// Parses a single type expression spanning the whole source.
    ///
    /// # Errors
    /// Returns an error if the source is not exactly one type.
    pub fn parse_type_only(&mut self) -> Result<TypeExpr> {
        self.check_lex_error()?;
        let ty = self.parse_type()?;
        self.expect_eof()?;
        Ok(ty)
    }

    /// Parses a single expression spanning the whole source.
    ///
    /// # Errors
    /// Returns an error if the source is not exactly one expression.
    pub fn parse_expression_only(&mut self) -> Result<Expr> {
        self.check_lex_error()?;
        let expr = self.parse_expr()?;
        self.expect_eof()?;
        Ok(expr)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Parses attributes, modifiers and whatever declaration follows them.
    ///
    /// At top level, variables are skipped rather than parsed.
    fn parse_declaration(&mut self, top_level: bool) -> Result<Declared> {
        let start = self.current().span;
        let attributes = self.parse_attributes()?;
        let modifiers = self.parse_modifiers();

        let keyword = match &self.current().kind {
            TokenKind::Identifier(word) => word.clone(),
            _ => String::new(),
        };

        if let Some(kind) = DeclGroupKind::from_keyword(&keyword) {
            return self
                .parse_decl_group(start, attributes, modifiers, kind)
                .map(Declared::Group);
        }

        let specifier = match keyword.as_str() {
            "let" => Some(BindingSpecifier::Let),
            "var" => Some(BindingSpecifier::Var),
            _ => None,
        };
        if let (Some(specifier), false) = (specifier, top_level) {
            return self
                .parse_variable(start, attributes, modifiers, specifier)
                .map(Declared::Variable);
        }

        let keyword = if keyword.is_empty() {
            self.current().kind.name().to_string()
        } else {
            keyword
        };
        let span = self.skip_statement()?;
        Ok(Declared::Other {
            keyword,
            span: start.to(span),
        })
    }

    /// Parses `@name` and `@name(arguments)` attributes.
    fn parse_attributes(&mut self) -> Result<Vec<Attribute>> {
        let mut attributes = Vec::new();
        while self.current().kind == TokenKind::At {
            let start = self.current().span;
            self.advance();
            let mut name = self.expect_identifier("attribute name")?;
            while self.current().kind == TokenKind::Dot && self.is_adjacent() {
                self.advance();
                name.push('.');
                name.push_str(&self.expect_identifier("attribute name")?);
            }
            let mut end = self.previous_span();

            let mut arguments = None;
            if self.current().kind == TokenKind::LParen && self.is_adjacent() {
                let open = self.current().span;
                end = self.skip_balanced()?;
                arguments = Some(self.source[open.end..end.start].to_string());
            }

            attributes.push(Attribute {
                name,
                arguments,
                span: start.to(end),
            });
        }
        Ok(attributes)
    }

    /// Parses declaration modifiers.
    fn parse_modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        loop {
            let token = self.current();
            let TokenKind::Identifier(word) = &token.kind else {
                break;
            };
            let is_modifier = if word == "class" {
                matches!(&self.peek(1).kind, TokenKind::Identifier(next)
                    if MODIFIERS.contains(&next.as_str())
                        || CLASS_MEMBER_KEYWORDS.contains(&next.as_str()))
            } else {
                MODIFIERS.contains(&word.as_str())
            };
            if !is_modifier {
                break;
            }

            let name = word.clone();
            let start = token.span;
            self.advance();

            let mut detail = None;
            let mut end = start;
            if self.current().kind == TokenKind::LParen
                && self.peek(2).kind == TokenKind::RParen
            {
                if let TokenKind::Identifier(inner) = &self.peek(1).kind {
                    detail = Some(inner.clone());
                    self.advance();
                    self.advance();
                    end = self.current().span;
                    self.advance();
                }
            }

            modifiers.push(Modifier {
                name,
                detail,
                span: start.to(end),
            });
        }
        modifiers
    }

    /// Parses a type declaration starting at its keyword.
    fn parse_decl_group(
        &mut self,
        start: Span,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
        kind: DeclGroupKind,
    ) -> Result<DeclGroup> {
        self.advance(); // keyword

        let name = if kind == DeclGroupKind::Extension {
            self.parse_type()?.to_string()
        } else {
            let name = self.expect_identifier("type name")?;
            if self.at_angle_open() {
                self.skip_angle_brackets()?;
            }
            name
        };

        let mut inheritance = Vec::new();
        if self.eat(&TokenKind::Colon) {
            loop {
                inheritance.push(self.parse_type()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        if self.current().is_word("where") {
            self.skip_until_open_brace()?;
        }

        self.expect(&TokenKind::LBrace)?;
        let members = self.parse_members()?;
        let end = self.current().span;
        self.expect(&TokenKind::RBrace)?;

        Ok(DeclGroup {
            attributes,
            modifiers,
            kind,
            name,
            inheritance,
            members,
            span: start.to(end),
        })
    }

    /// Parses members up to (not including) the closing brace.
    ///
    /// Members inside `#if ... #endif` are parsed and then dropped: whether
    /// they exist depends on build flags, so generated code cannot rely on
    /// them.
    fn parse_members(&mut self) -> Result<Vec<Member>> {
        let mut members = Vec::new();
        let mut conditional_depth = 0usize;
        loop {
            let token = self.current();
            match &token.kind {
                TokenKind::RBrace => break,
                TokenKind::Eof => return Err(self.error("expected '}' before end of input")),
                TokenKind::Semicolon => self.advance(),
                TokenKind::PoundKeyword(word) if is_directive(word) => {
                    match word.as_str() {
                        "if" => conditional_depth += 1,
                        "endif" => conditional_depth = conditional_depth.saturating_sub(1),
                        _ => {}
                    }
                    self.skip_directive();
                }
                _ if token.is_close_delimiter() => {
                    return Err(self.error(&format!("unexpected {}", token.kind.name())));
                }
                _ => {
                    let member = match self.parse_declaration(false)? {
                        Declared::Group(group) => Member::Decl(group),
                        Declared::Variable(variable) => Member::Variable(variable),
                        Declared::Other { keyword, span } => Member::Other { keyword, span },
                    };
                    if conditional_depth == 0 {
                        members.push(member);
                    }
                }
            }
        }
        Ok(members)
    }

    /// Parses a `let`/`var` declaration starting at its keyword.
    fn parse_variable(
        &mut self,
        start: Span,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
        specifier: BindingSpecifier,
    ) -> Result<VariableDecl> {
        self.advance(); // let / var

        let mut bindings = Vec::new();
        loop {
            let pattern = self.parse_pattern()?;

            let type_annotation = if self.eat(&TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };

            let initializer = if self.eat(&TokenKind::Equal) {
                Some(self.parse_initializer()?)
            } else {
                None
            };

            let accessors = if self.current().kind == TokenKind::LBrace {
                Some(self.parse_accessor_block()?)
            } else {
                None
            };

            bindings.push(PatternBinding {
                pattern,
                type_annotation,
                initializer,
                accessors,
            });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(VariableDecl {
            attributes,
            modifiers,
            specifier,
            bindings,
            span: start.to(self.previous_span()),
        })
    }

    /// Parses a binding pattern.
    fn parse_pattern(&mut self) -> Result<Pattern> {
        match self.current().kind.clone() {
            TokenKind::Identifier(name) if name == "_" => {
                self.advance();
                Ok(Pattern::Wildcard)
            }
            TokenKind::Identifier(name) | TokenKind::EscapedIdentifier(name) => {
                self.advance();
                Ok(Pattern::Identifier(name))
            }
            TokenKind::LParen => {
                self.advance();
                let mut elements = Vec::new();
                while self.current().kind != TokenKind::RParen {
                    elements.push(self.parse_pattern()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RParen)?;
                Ok(Pattern::Tuple(elements))
            }
            other => Err(self.error(&format!("expected pattern, found {}", other.name()))),
        }
    }

    /// Parses an initializer, degrading to an opaque span when the
    /// expression uses syntax this parser does not model.
    fn parse_initializer(&mut self) -> Result<Expr> {
        let checkpoint = self.checkpoint();
        if let Ok(expr) = self.parse_expr() {
            if self.at_binding_end() {
                return Ok(expr);
            }
        }
        self.restore(checkpoint);
        let start = self.current().span;
        let end = self.skip_initializer_tokens()?;
        Ok(Expr::Opaque(start.to(end)))
    }

    /// True when the current token can follow a complete binding.
    fn at_binding_end(&self) -> bool {
        let token = self.current();
        token.leading_newline
            || matches!(
                token.kind,
                TokenKind::Comma
                    | TokenKind::LBrace
                    | TokenKind::Semicolon
                    | TokenKind::RBrace
                    | TokenKind::Eof
            )
    }

    /// Parses the `{ ... }` after a binding.
    fn parse_accessor_block(&mut self) -> Result<AccessorBlock> {
        if !self.block_starts_with_accessor() {
            self.skip_balanced()?;
            return Ok(AccessorBlock::Getter);
        }

        self.advance(); // {
        let mut accessors = Vec::new();
        while self.current().kind != TokenKind::RBrace {
            self.parse_attributes()?;
            while matches!(&self.current().kind, TokenKind::Identifier(w)
                if matches!(w.as_str(), "mutating" | "nonmutating" | "__consuming"))
            {
                self.advance();
            }

            let keyword = match &self.current().kind {
                TokenKind::Identifier(word) => AccessorKind::from_keyword(word),
                _ => None,
            };
            let Some(accessor) = keyword else {
                return Err(self.error(&format!(
                    "expected accessor, found {}",
                    self.current().kind.name()
                )));
            };
            self.advance();

            if self.current().kind == TokenKind::LParen {
                self.skip_balanced()?;
            }
            while self.current().is_word("async") || self.current().is_word("throws") {
                self.advance();
                if self.current().kind == TokenKind::LParen {
                    self.skip_balanced()?;
                }
            }
            if self.current().kind == TokenKind::LBrace {
                self.skip_balanced()?;
            }
            accessors.push(accessor);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(AccessorBlock::Accessors(accessors))
    }

    /// True if the `{` at the cursor opens an explicit accessor list.
    fn block_starts_with_accessor(&self) -> bool {
        let mut offset = 1;
        // Skip accessor attributes like `@inlinable`
        while self.peek(offset).kind == TokenKind::At {
            offset += 2;
            if self.peek(offset).kind == TokenKind::LParen {
                return false;
            }
        }
        while matches!(&self.peek(offset).kind, TokenKind::Identifier(w)
            if matches!(w.as_str(), "mutating" | "nonmutating" | "__consuming"))
        {
            offset += 1;
        }

        let TokenKind::Identifier(word) = &self.peek(offset).kind else {
            return false;
        };
        let Some(accessor) = AccessorKind::from_keyword(word) else {
            return false;
        };
        let takes_name = matches!(
            accessor,
            AccessorKind::Set | AccessorKind::WillSet | AccessorKind::DidSet
        );
        match &self.peek(offset + 1).kind {
            TokenKind::LBrace | TokenKind::RBrace => true,
            TokenKind::LParen => takes_name,
            TokenKind::Identifier(next) => {
                AccessorKind::from_keyword(next).is_some() || next == "async" || next == "throws"
            }
            _ => false,
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Parses a type, including `A & B` compositions.
    fn parse_type(&mut self) -> Result<TypeExpr> {
        let first = self.parse_type_postfix()?;
        if !self.at_operator("&") {
            return Ok(first);
        }
        let mut parts = vec![first];
        while self.at_operator("&") {
            self.advance();
            parts.push(self.parse_type_postfix()?);
        }
        Ok(TypeExpr::Composition(parts))
    }

    /// Parses a primary type followed by `?`, `!` and `.Type`.
    fn parse_type_postfix(&mut self) -> Result<TypeExpr> {
        let mut ty = self.parse_type_primary()?;
        loop {
            match &self.current().kind {
                TokenKind::Question if self.is_adjacent() => {
                    self.advance();
                    ty = TypeExpr::optional(ty);
                }
                TokenKind::Bang if self.is_adjacent() => {
                    self.advance();
                    ty = TypeExpr::ImplicitlyUnwrapped(Box::new(ty));
                }
                TokenKind::Dot
                    if self.peek(1).is_word("Type") || self.peek(1).is_word("Protocol") =>
                {
                    self.advance();
                    self.advance();
                    ty = TypeExpr::Metatype(Box::new(ty));
                }
                _ => break,
            }
        }
        Ok(ty)
    }

    /// Parses a primary type.
    fn parse_type_primary(&mut self) -> Result<TypeExpr> {
        match self.current().kind.clone() {
            TokenKind::At => {
                let mut attributes = Vec::new();
                while self.current().kind == TokenKind::At {
                    self.advance();
                    attributes.push(self.expect_identifier("type attribute")?);
                    if self.current().kind == TokenKind::LParen && self.is_adjacent() {
                        self.skip_balanced()?;
                    }
                }
                let mut ty = self.parse_type_primary()?;
                if let TypeExpr::Function(function) = &mut ty {
                    function.attributes = attributes;
                }
                Ok(ty)
            }
            TokenKind::Identifier(word)
                if (word == "some" || word == "any")
                    && !self.peek(1).leading_newline
                    && starts_type(&self.peek(1).kind) =>
            {
                self.advance();
                let kind = if word == "some" {
                    OpaqueKind::Some
                } else {
                    OpaqueKind::Any
                };
                let inner = self.parse_type_postfix()?;
                Ok(TypeExpr::Opaque(kind, Box::new(inner)))
            }
            TokenKind::Identifier(_) | TokenKind::EscapedIdentifier(_) => self.parse_nominal_type(),
            TokenKind::LBracket => {
                self.advance();
                let element = self.parse_type()?;
                let ty = if self.eat(&TokenKind::Colon) {
                    let value = self.parse_type()?;
                    TypeExpr::dictionary(element, value)
                } else {
                    TypeExpr::array(element)
                };
                self.expect(&TokenKind::RBracket)?;
                Ok(ty)
            }
            TokenKind::LParen => self.parse_parenthesized_type(),
            other => Err(self.error(&format!("expected type, found {}", other.name()))),
        }
    }

    /// Parses `A.B<C>.D`.
    fn parse_nominal_type(&mut self) -> Result<TypeExpr> {
        let mut segments = Vec::new();
        loop {
            let name = self.expect_identifier("type name")?;
            let generic_args = if self.at_angle_open() {
                self.parse_generic_args()?
            } else {
                Vec::new()
            };
            segments.push(PathSegment { name, generic_args });

            let continues = self.current().kind == TokenKind::Dot
                && is_identifier_like(&self.peek(1).kind)
                && !self.peek(1).is_word("Type")
                && !self.peek(1).is_word("Protocol");
            if !continues {
                break;
            }
            self.advance();
        }

        // `Optional<T>` is the same type as `T?`
        if let [segment] = segments.as_slice() {
            if segment.name == "Optional" && segment.generic_args.len() == 1 {
                return Ok(TypeExpr::optional(segment.generic_args[0].clone()));
            }
        }
        Ok(TypeExpr::Nominal(segments))
    }

    /// Parses `<A, B>` generic arguments.
    fn parse_generic_args(&mut self) -> Result<Vec<TypeExpr>> {
        self.advance(); // <
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_angle_close()?;
        Ok(args)
    }

    /// Parses a tuple type, a function type, or a parenthesized type.
    fn parse_parenthesized_type(&mut self) -> Result<TypeExpr> {
        self.advance(); // (
        let mut params = Vec::new();
        while self.current().kind != TokenKind::RParen {
            params.push(self.parse_type_element()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;

        let mut is_async = false;
        let mut throws = false;
        loop {
            if self.current().is_word("async") {
                is_async = true;
                self.advance();
            } else if self.current().is_word("throws") || self.current().is_word("rethrows") {
                throws = true;
                self.advance();
                if self.current().kind == TokenKind::LParen && self.is_adjacent() {
                    self.skip_balanced()?;
                }
            } else {
                break;
            }
        }

        if self.eat(&TokenKind::Arrow) {
            let result = self.parse_type()?;
            return Ok(TypeExpr::Function(FunctionType {
                attributes: Vec::new(),
                params,
                is_async,
                throws,
                result: Box::new(result),
            }));
        }
        if is_async || throws {
            return Err(self.error("expected '->' after function effects"));
        }

        if let [param] = params.as_slice() {
            if param.label.is_none() && param.name.is_none() && !param.is_inout {
                return Ok(param.ty.clone());
            }
        }
        Ok(TypeExpr::Tuple(
            params
                .into_iter()
                .map(|param| TupleElement {
                    label: param.name.or(param.label),
                    ty: param.ty,
                })
                .collect(),
        ))
    }

    /// Parses one element of a tuple or function parameter list.
    fn parse_type_element(&mut self) -> Result<FunctionParam> {
        let mut param = FunctionParam::unnamed(TypeExpr::void());

        if is_identifier_like(&self.current().kind) {
            if self.peek(1).kind == TokenKind::Colon {
                param.label = Some(self.expect_identifier("label")?);
                self.advance();
            } else if is_identifier_like(&self.peek(1).kind) && self.peek(2).kind == TokenKind::Colon
            {
                param.label = Some(self.expect_identifier("label")?);
                param.name = Some(self.expect_identifier("parameter name")?);
                self.advance();
            }
        }

        loop {
            let token = self.current();
            if token.is_word("inout") {
                param.is_inout = true;
            } else if !["borrowing", "consuming", "__owned", "__shared", "sending"]
                .iter()
                .any(|w| token.is_word(w))
            {
                break;
            }
            self.advance();
        }

        param.ty = self.parse_type()?;
        if self.at_operator("...") {
            self.advance();
        }
        Ok(param)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Parses an expression with a flat, left-associative operator chain.
    fn parse_expr(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_prefix_expr()?;
        loop {
            let token = self.current();
            match &token.kind {
                TokenKind::Operator(op) if op == "?" => {
                    self.advance();
                    let then = self.parse_expr()?;
                    self.expect(&TokenKind::Colon)?;
                    let otherwise = self.parse_expr()?;
                    lhs = Expr::Ternary {
                        condition: Box::new(lhs),
                        then: Box::new(then),
                        otherwise: Box::new(otherwise),
                    };
                }
                TokenKind::Operator(op) => {
                    let operator = op.clone();
                    self.advance();
                    let rhs = self.parse_prefix_expr()?;
                    lhs = Expr::binary(lhs, operator, rhs);
                }
                TokenKind::Identifier(word) if word == "as" || word == "is" => {
                    let mut operator = word.clone();
                    self.advance();
                    if operator == "as" {
                        match self.current().kind {
                            TokenKind::Question => operator.push('?'),
                            TokenKind::Bang => operator.push('!'),
                            _ => {}
                        }
                        if operator.len() > 2 {
                            self.advance();
                        }
                    }
                    let ty = self.parse_type()?;
                    lhs = Expr::Cast {
                        expr: Box::new(lhs),
                        operator,
                        ty,
                    };
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    /// Parses `try`, `await` and prefix operators.
    fn parse_prefix_expr(&mut self) -> Result<Expr> {
        let token = self.current().clone();
        match &token.kind {
            TokenKind::Identifier(word) if word == "try" => {
                self.advance();
                if matches!(self.current().kind, TokenKind::Question | TokenKind::Bang) {
                    self.advance();
                }
                Ok(Expr::Try(Box::new(self.parse_prefix_expr()?)))
            }
            TokenKind::Identifier(word) if word == "await" => {
                self.advance();
                Ok(Expr::Await(Box::new(self.parse_prefix_expr()?)))
            }
            TokenKind::Operator(op) => {
                self.advance();
                Ok(Expr::prefix(op.clone(), self.parse_prefix_expr()?))
            }
            TokenKind::Backslash => {
                self.advance();
                let mut end = token.span;
                while !self.current().leading_newline
                    && matches!(
                        self.current().kind,
                        TokenKind::Dot
                            | TokenKind::Identifier(_)
                            | TokenKind::Question
                            | TokenKind::Bang
                    )
                {
                    end = self.current().span;
                    self.advance();
                }
                Ok(Expr::Opaque(token.span.to(end)))
            }
            _ => self.parse_postfix_expr(),
        }
    }

    /// Parses member access, calls, subscripts and postfix operators.
    fn parse_postfix_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            let token = self.current().clone();
            match &token.kind {
                TokenKind::Dot => {
                    self.advance();
                    let member = match self.current().kind.clone() {
                        TokenKind::Identifier(name)
                        | TokenKind::EscapedIdentifier(name)
                        | TokenKind::Int(name) => name,
                        other => {
                            return Err(self.error(&format!(
                                "expected member name, found {}",
                                other.name()
                            )));
                        }
                    };
                    self.advance();
                    expr = Expr::member(expr, member);
                }
                TokenKind::LParen if !token.leading_newline => {
                    let arguments = self.parse_arguments(&TokenKind::RParen)?;
                    expr = Expr::call(expr, arguments);
                }
                TokenKind::LBracket if !token.leading_newline => {
                    let arguments = self.parse_arguments(&TokenKind::RBracket)?;
                    expr = Expr::Subscript {
                        base: Box::new(expr),
                        arguments,
                    };
                }
                TokenKind::Question | TokenKind::Bang => {
                    self.advance();
                    let operator = if token.kind == TokenKind::Question {
                        "?"
                    } else {
                        "!"
                    };
                    expr = Expr::Postfix {
                        operand: Box::new(expr),
                        operator: operator.to_string(),
                    };
                }
                TokenKind::LBrace
                    if !token.leading_newline
                        && is_callable(&expr)
                        && !self.block_starts_with_accessor() =>
                {
                    let span = self.skip_balanced()?;
                    let closure = Argument::unlabeled(Expr::Opaque(token.span.to(span)));
                    expr = match expr {
                        Expr::Call {
                            callee,
                            mut arguments,
                            vertical,
                        } => {
                            arguments.push(closure);
                            Expr::Call {
                                callee,
                                arguments,
                                vertical,
                            }
                        }
                        other => Expr::call(other, vec![closure]),
                    };
                }
                TokenKind::Operator(op) if op == "<" && self.is_adjacent() && is_type_like(&expr) => {
                    let checkpoint = self.checkpoint();
                    match self.parse_generic_args() {
                        Ok(args)
                            if matches!(self.current().kind, TokenKind::LParen | TokenKind::Dot) =>
                        {
                            expr = Expr::Specialize {
                                base: Box::new(expr),
                                args,
                            };
                        }
                        _ => {
                            self.restore(checkpoint);
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Parses a primary expression.
    fn parse_primary_expr(&mut self) -> Result<Expr> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Int(text) => {
                self.advance();
                Ok(Expr::Int(text))
            }
            TokenKind::Float(text) => {
                self.advance();
                Ok(Expr::Float(text))
            }
            TokenKind::String { text, multiline } => {
                self.advance();
                Ok(Expr::String { text, multiline })
            }
            TokenKind::Identifier(word) => match word.as_str() {
                "true" | "false" => {
                    self.advance();
                    Ok(Expr::Bool(word == "true"))
                }
                "nil" => {
                    self.advance();
                    Ok(Expr::Nil)
                }
                "if" | "switch" | "do" => self.skip_control_expression(),
                _ => {
                    self.advance();
                    Ok(Expr::Identifier(word))
                }
            },
            TokenKind::EscapedIdentifier(name) => {
                self.advance();
                Ok(Expr::Identifier(name))
            }
            TokenKind::Dot => {
                self.advance();
                let name = self.expect_identifier("member name")?;
                Ok(Expr::ImplicitMember(name))
            }
            TokenKind::LBrace => {
                let end = self.skip_balanced()?;
                Ok(Expr::Opaque(token.span.to(end)))
            }
            TokenKind::LBracket => self.parse_collection_literal(),
            TokenKind::LParen => {
                let mut elements = self.parse_arguments(&TokenKind::RParen)?;
                if elements.len() == 1 && elements[0].label.is_none() {
                    Ok(elements.remove(0).value)
                } else {
                    Ok(Expr::Tuple(elements))
                }
            }
            TokenKind::PoundKeyword(_) => {
                self.advance();
                let mut end = token.span;
                if self.current().kind == TokenKind::LParen && self.is_adjacent() {
                    end = self.skip_balanced()?;
                }
                Ok(Expr::Opaque(token.span.to(end)))
            }
            other => Err(self.error(&format!("expected expression, found {}", other.name()))),
        }
    }

    /// Parses `[a, b]`, `[k: v]` or `[:]`.
    fn parse_collection_literal(&mut self) -> Result<Expr> {
        self.advance(); // [
        if self.eat(&TokenKind::Colon) {
            self.expect(&TokenKind::RBracket)?;
            return Ok(Expr::Dictionary(Vec::new()));
        }
        if self.eat(&TokenKind::RBracket) {
            return Ok(Expr::Array(Vec::new()));
        }

        let first = self.parse_expr()?;
        if self.eat(&TokenKind::Colon) {
            let value = self.parse_expr()?;
            let mut entries = vec![(first, value)];
            while self.eat(&TokenKind::Comma) {
                if self.current().kind == TokenKind::RBracket {
                    break;
                }
                let key = self.parse_expr()?;
                self.expect(&TokenKind::Colon)?;
                entries.push((key, self.parse_expr()?));
            }
            self.expect(&TokenKind::RBracket)?;
            return Ok(Expr::Dictionary(entries));
        }

        let mut elements = vec![first];
        while self.eat(&TokenKind::Comma) {
            if self.current().kind == TokenKind::RBracket {
                break;
            }
            elements.push(self.parse_expr()?);
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Expr::Array(elements))
    }

    /// Parses a delimited, comma-separated argument list.
    fn parse_arguments(&mut self, close: &TokenKind) -> Result<Vec<Argument>> {
        self.advance(); // ( or [
        let mut arguments = Vec::new();
        while &self.current().kind != close {
            let label = if is_identifier_like(&self.current().kind)
                && self.peek(1).kind == TokenKind::Colon
            {
                let label = self.expect_identifier("argument label")?;
                self.advance();
                Some(label)
            } else {
                None
            };

            let value = match &self.current().kind {
                // Operator references such as `reduce(0, +)`
                TokenKind::Operator(_)
                    if matches!(&self.peek(1).kind, TokenKind::Comma)
                        || &self.peek(1).kind == close =>
                {
                    let span = self.current().span;
                    self.advance();
                    Expr::Opaque(span)
                }
                _ => self.parse_expr()?,
            };
            arguments.push(Argument { label, value });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Ok(arguments)
    }

    /// Skips an `if`, `switch` or `do` expression.
    fn skip_control_expression(&mut self) -> Result<Expr> {
        let start = self.current().span;
        let mut end;
        loop {
            self.advance(); // if / switch / do / else / catch
            self.skip_until_open_brace()?;
            end = self.skip_balanced()?;
            if !self.current().is_word("else") && !self.current().is_word("catch") {
                break;
            }
            if self.peek(1).is_word("if") {
                self.advance();
            }
        }
        Ok(Expr::Opaque(start.to(end)))
    }

    // =========================================================================
    // Skipping
    // =========================================================================

    /// Skips a bracketed group starting at the current open delimiter and
    /// returns the span of its closing delimiter.
    fn skip_balanced(&mut self) -> Result<Span> {
        let open = self.current().span;
        let mut stack = Vec::new();
        loop {
            let token = self.current().clone();
            match token.kind {
                TokenKind::LParen => stack.push(TokenKind::RParen),
                TokenKind::LBracket => stack.push(TokenKind::RBracket),
                TokenKind::LBrace => stack.push(TokenKind::RBrace),
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if stack.pop().as_ref() != Some(&token.kind) {
                        return Err(self.error(&format!("unbalanced {}", token.kind.name())));
                    }
                }
                TokenKind::Eof => {
                    return Err(self.error_at(open, "unterminated bracketed group"));
                }
                _ => {}
            }
            self.advance();
            if stack.is_empty() {
                return Ok(token.span);
            }
        }
    }

    /// Skips a statement or member declaration and returns the span of its
    /// last token.
    fn skip_statement(&mut self) -> Result<Span> {
        self.skip_until_boundary(false)
    }

    /// Skips the rest of an initializer expression, stopping before a comma.
    fn skip_initializer_tokens(&mut self) -> Result<Span> {
        self.skip_until_boundary(true)
    }

    fn skip_until_boundary(&mut self, stop_at_comma: bool) -> Result<Span> {
        let mut end = self.current().span;
        let mut first = true;
        loop {
            let token = self.current();
            let at_boundary = match &token.kind {
                TokenKind::Eof => true,
                TokenKind::Semicolon => !first,
                TokenKind::Comma => stop_at_comma,
                _ if token.is_close_delimiter() => true,
                _ => !first && token.leading_newline && !self.continues_statement(),
            };
            if at_boundary {
                break;
            }
            if token.is_open_delimiter() {
                end = self.skip_balanced()?;
            } else {
                end = token.span;
                self.advance();
            }
            first = false;
        }
        Ok(end)
    }

    /// True if the current token, which starts a new line, still belongs to
    /// the statement being skipped.
    fn continues_statement(&self) -> bool {
        let token = self.current();
        let previous = self.peek_back();
        let continues_from_here = match &token.kind {
            TokenKind::LBrace => previous.kind != TokenKind::RBrace,
            TokenKind::Dot
            | TokenKind::Arrow
            | TokenKind::Equal
            | TokenKind::Colon
            | TokenKind::Comma
            | TokenKind::Operator(_) => true,
            _ => CONTINUATION_WORDS.iter().any(|w| token.is_word(w)),
        };
        let continues_from_previous = match &previous.kind {
            TokenKind::Equal
            | TokenKind::Arrow
            | TokenKind::Comma
            | TokenKind::Colon
            | TokenKind::Dot => true,
            TokenKind::Operator(op) => !op.ends_with('>'),
            _ => false,
        };
        continues_from_here || continues_from_previous
    }

    /// Skips tokens up to a `{` at bracket depth zero; returns the last
    /// skipped span.
    fn skip_until_open_brace(&mut self) -> Result<Span> {
        let mut end = self.previous_span();
        loop {
            let token = self.current();
            match &token.kind {
                TokenKind::LBrace => return Ok(end),
                TokenKind::Eof => return Err(self.error("expected '{' before end of input")),
                _ if token.is_close_delimiter() => {
                    return Err(self.error(&format!("unexpected {}", token.kind.name())));
                }
                _ if token.is_open_delimiter() => end = self.skip_balanced()?,
                _ => {
                    end = token.span;
                    self.advance();
                }
            }
        }
    }

    /// Skips a `<...>` clause by counting angle brackets in operator runs.
    fn skip_angle_brackets(&mut self) -> Result<()> {
        let mut depth = 0i32;
        loop {
            let token = self.current();
            match &token.kind {
                TokenKind::Operator(op) => {
                    for c in op.chars() {
                        match c {
                            '<' => depth += 1,
                            '>' => depth -= 1,
                            _ => {}
                        }
                    }
                }
                TokenKind::Arrow => {}
                TokenKind::Eof | TokenKind::LBrace => {
                    return Err(self.error("unterminated generic parameter clause"));
                }
                _ if token.is_open_delimiter() => {
                    self.skip_balanced()?;
                    continue;
                }
                _ => {}
            }
            self.advance();
            if depth <= 0 {
                return Ok(());
            }
        }
    }

    /// Skips a `#if`/`#else`/`#endif` line.
    fn skip_directive(&mut self) {
        self.advance();
        while !self.current().leading_newline && self.current().kind != TokenKind::Eof {
            self.advance();
        }
    }

    // =========================================================================
    // Token Helpers
    // =========================================================================

    /// Returns the current token.
    fn current(&self) -> &Token {
        self.peek(0)
    }

    /// Returns the token `offset` positions ahead, clamped to `Eof`.
    fn peek(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    /// Returns the previous token, or the current one at the start.
    fn peek_back(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn previous_span(&self) -> Span {
        self.peek_back().span
    }

    /// True if no whitespace separates the current token from the previous.
    fn is_adjacent(&self) -> bool {
        self.pos > 0 && self.peek_back().span.end == self.current().span.start
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    /// Consumes the current token if it matches `kind`.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.current().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to be of a specific kind, then advances.
    fn expect(&mut self, expected: &TokenKind) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!(
                "expected {}, found {}",
                expected.name(),
                self.current().kind.name()
            )))
        }
    }

    /// Expects an identifier (escaped or not) and returns its text.
    fn expect_identifier(&mut self, what: &str) -> Result<String> {
        match &self.current().kind {
            TokenKind::Identifier(name) | TokenKind::EscapedIdentifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => Err(self.error(&format!("expected {what}, found {}", other.name()))),
        }
    }

    fn expect_eof(&self) -> Result<()> {
        if self.current().kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.error(&format!(
                "unexpected {} after end of input",
                self.current().kind.name()
            )))
        }
    }

    fn at_operator(&self, text: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Operator(op) if op == text)
    }

    fn at_angle_open(&self) -> bool {
        self.at_operator("<")
    }

    /// Consumes one `>`, splitting runs such as `>>` or `>=`.
    fn expect_angle_close(&mut self) -> Result<()> {
        let token = self.current().clone();
        match &token.kind {
            TokenKind::Operator(op) if op == ">" => {
                self.advance();
                Ok(())
            }
            TokenKind::Operator(op) if op.starts_with('>') => {
                let rest = &op[1..];
                let kind = if rest == "=" {
                    TokenKind::Equal
                } else {
                    TokenKind::Operator(rest.to_string())
                };
                let span = Span::new(
                    token.span.start + 1,
                    token.span.end,
                    token.span.line,
                    token.span.column + 1,
                );
                self.split_log.push((self.pos, token));
                self.tokens[self.pos] = Token::new(kind, span, false);
                Ok(())
            }
            other => Err(self.error(&format!("expected '>', found {}", other.name()))),
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            splits: self.split_log.len(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        while self.split_log.len() > checkpoint.splits {
            if let Some((index, token)) = self.split_log.pop() {
                self.tokens[index] = token;
            }
        }
        self.pos = checkpoint.pos;
    }

    fn check_lex_error(&self) -> Result<()> {
        match &self.lex_error {
            Some((message, span)) => Err(self.error_at(*span, message)),
            None => Ok(()),
        }
    }

    /// Creates a parse error at the current position.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.current().span, message)
    }

    /// Creates a parse error at a specific span.
    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::parse(message, span.line, span.column, self.context_at(span))
    }

    /// Gets context around a span for error messages.
    fn context_at(&self, span: Span) -> String {
        let start = span.start.min(self.source.len());
        let line_start = self.source[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = self.source[start..]
            .find('\n')
            .map_or(self.source.len(), |i| start + i);

        self.source[line_start..line_end].to_string()
    }
}

/// True for conditional-compilation keywords.
fn is_directive(word: &str) -> bool {
    matches!(word, "if" | "elseif" | "else" | "endif")
}

fn is_identifier_like(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier(_) | TokenKind::EscapedIdentifier(_)
    )
}

/// True if a token can start a type.
fn starts_type(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier(_)
            | TokenKind::EscapedIdentifier(_)
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::At
    )
}

/// True if a trailing closure can attach to `expr`.
fn is_callable(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Identifier(_)
            | Expr::ImplicitMember(_)
            | Expr::MemberAccess { .. }
            | Expr::Call { .. }
            | Expr::Specialize { .. }
    )
}

/// True if `expr` names a type, judged by a capitalized final component.
fn is_type_like(expr: &Expr) -> bool {
    let name = match expr {
        Expr::Identifier(name) => name,
        Expr::MemberAccess { member, .. } => member,
        _ => return false,
    };
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Parses source code into a [`SourceFile`].
///
/// # Errors
/// Returns an error if the source cannot be parsed.
pub fn parse(source: &str) -> Result<SourceFile> {
    Parser::new(source).parse_file()
}

/// Parses a type expression such as `[String: Int]?`.
///
/// # Errors
/// Returns an error if the source is not a single type.
pub fn parse_type(source: &str) -> Result<TypeExpr> {
    Parser::new(source).parse_type_only()
}

/// Parses a single expression.
///
/// # Errors
/// Returns an error if the source is not a single expression.
pub fn parse_expression(source: &str) -> Result<Expr> {
    Parser::new(source).parse_expression_only()
}
