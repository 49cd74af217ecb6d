//! Helper methods and utilities

use super::*;

impl Parser {
    pub(crate) fn current_token(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    pub(crate) fn previous_token(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    pub(crate) fn peek_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.current + offset).map(|t| &t.kind)
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        &self.current_token().kind == kind
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current_token().kind == TokenKind::Eof
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous_token()
    }

    /// Consumes the current token if it matches, otherwise errors.
    pub(crate) fn consume(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(&kind) {
            Ok(self.advance().clone())
        } else {
            Err(self.error(format!(
                "Expected {:?}, found {:?}",
                kind,
                self.current_token().kind
            )))
        }
    }

    /// Consumes the current token if it matches, without erroring.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(&kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            span: self.current_token().span,
        }
    }

    pub(crate) fn report(&mut self, err: ParseError) {
        self.diagnostics
            .push(SyntaxDiagnostic::error(err.message, err.span));
    }

    /// Panic-mode recovery: skip ahead to a token that can plausibly
    /// start a new declaration or statement.
    pub(crate) fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.previous_token().kind == TokenKind::Semicolon {
                return;
            }
            match self.current_token().kind {
                TokenKind::Using
                | TokenKind::Namespace
                | TokenKind::Class
                | TokenKind::Public
                | TokenKind::Private
                | TokenKind::RBrace
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    pub(crate) fn parse_identifier(&mut self) -> ParseResult<Node<Ident>> {
        let token = self.consume(TokenKind::Identifier)?;
        Ok(Node::new(Ident::new(token.value.clone()), token.span))
    }

    pub(crate) fn parse_qualified_name(&mut self) -> ParseResult<QualifiedName> {
        let mut segments = vec![self.parse_identifier()?];
        while self.check(&TokenKind::Dot) {
            self.advance();
            segments.push(self.parse_identifier()?);
        }
        Ok(QualifiedName { segments })
    }

    pub(crate) fn parse_access_modifier(&mut self) -> AccessModifier {
        match self.current_token().kind {
            TokenKind::Public => {
                self.advance();
                AccessModifier::Public
            }
            TokenKind::Private => {
                self.advance();
                AccessModifier::Private
            }
            _ => AccessModifier::Private,
        }
    }
}
