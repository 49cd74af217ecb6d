//! Core Parser struct and unit-level parsing

use super::*;

/// Recursive descent parser for Sable
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) current: usize,
    pub(crate) diagnostics: Vec<SyntaxDiagnostic>,
}

impl Parser {
    /// Creates a new parser from a token stream.
    ///
    /// Lexer error tokens are reported as diagnostics here and removed
    /// from the stream, so later "expected X" messages point at real
    /// tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut diagnostics = Vec::new();
        let tokens = tokens
            .into_iter()
            .filter(|t| {
                if t.kind == TokenKind::Error {
                    diagnostics.push(SyntaxDiagnostic::error(t.value.clone(), t.span));
                    false
                } else {
                    true
                }
            })
            .collect();
        Self {
            tokens,
            current: 0,
            diagnostics,
        }
    }

    /// Parses a complete compilation unit.
    pub fn parse_unit(mut self) -> SyntaxTree {
        let start_span = self.current_token().span;
        let mut usings = Vec::new();
        let mut items = Vec::new();

        while !self.is_at_end() {
            match self.current_token().kind {
                TokenKind::Using => match self.parse_using() {
                    Ok(using) => usings.push(using),
                    Err(err) => {
                        self.report(err);
                        self.synchronize();
                    }
                },
                TokenKind::Semicolon => {
                    let span = self.current_token().span;
                    self.diagnostics
                        .push(SyntaxDiagnostic::warning("redundant semicolon", span));
                    self.advance();
                }
                _ => match self.parse_item() {
                    Ok(item) => items.push(item),
                    Err(err) => {
                        self.report(err);
                        self.synchronize();
                    }
                },
            }
        }

        let end_span = self.previous_token().span;
        let unit = Unit {
            usings,
            items,
            span: start_span.merge(&end_span),
        };
        SyntaxTree::new(unit, self.diagnostics)
    }

    // =========================================================================
    // Using Directives
    // =========================================================================

    pub(crate) fn parse_using(&mut self) -> ParseResult<Node<UsingDirective>> {
        let start = self.current_token().span;
        self.consume(TokenKind::Using)?;
        let path = self.parse_qualified_name()?;
        self.consume(TokenKind::Semicolon)?;
        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(UsingDirective { path }, span))
    }

    // =========================================================================
    // Top-level Items
    // =========================================================================

    pub(crate) fn parse_item(&mut self) -> ParseResult<Node<Item>> {
        let start = self.current_token().span;

        let item = match self.current_token().kind {
            TokenKind::Namespace => Item::Namespace(self.parse_namespace()?),
            _ => Item::Class(self.parse_class()?),
        };

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(item, span))
    }

    pub(crate) fn parse_namespace(&mut self) -> ParseResult<NamespaceDecl> {
        self.consume(TokenKind::Namespace)?;
        let name = self.parse_qualified_name()?;
        self.consume(TokenKind::LBrace)?;

        let mut classes = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let start = self.current_token().span;
            match self.parse_class() {
                Ok(class) => {
                    let span = start.merge(&self.previous_token().span);
                    classes.push(Node::new(class, span));
                }
                Err(err) => {
                    self.report(err);
                    self.synchronize();
                }
            }
        }

        self.consume(TokenKind::RBrace)?;
        Ok(NamespaceDecl { name, classes })
    }
}
