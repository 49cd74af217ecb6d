//! Statement parsing

use super::*;

impl Parser {
    pub(crate) fn parse_block(&mut self) -> ParseResult<Node<BlockStmt>> {
        let start = self.current_token().span;
        self.consume(TokenKind::LBrace)?;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_statement()?);
        }

        self.consume(TokenKind::RBrace)?;
        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(BlockStmt { stmts }, span))
    }

    pub(crate) fn parse_statement(&mut self) -> ParseResult<Node<Stmt>> {
        let start = self.current_token().span;

        let stmt = match self.current_token().kind {
            TokenKind::LBrace => Stmt::Block(self.parse_block()?.value),
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::Return => self.parse_return()?,
            TokenKind::Break => {
                self.advance();
                self.consume(TokenKind::Semicolon)?;
                Stmt::Break
            }
            TokenKind::Continue => {
                self.advance();
                self.consume(TokenKind::Semicolon)?;
                Stmt::Continue
            }
            _ if self.looks_like_var_decl() => self.parse_var_decl()?,
            _ => {
                let expr = self.parse_expression()?;
                self.consume(TokenKind::Semicolon)?;
                Stmt::Expr(expr)
            }
        };

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(stmt, span))
    }

    fn parse_var_decl(&mut self) -> ParseResult<Stmt> {
        let ty = self.parse_type()?;
        let name = self.parse_identifier()?;
        let init = if self.eat(TokenKind::Eq) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon)?;
        Ok(Stmt::VarDecl(VarDecl { ty, name, init }))
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::If)?;
        self.consume(TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.consume(TokenKind::RParen)?;
        let then_block = self.parse_block()?;

        let else_branch = if self.eat(TokenKind::Else) {
            if self.check(&TokenKind::If) {
                Some(Box::new(self.parse_statement()?))
            } else {
                let start = self.current_token().span;
                let block = self.parse_block()?;
                let span = start.merge(&self.previous_token().span);
                Some(Box::new(Node::new(Stmt::Block(block.value), span)))
            }
        } else {
            None
        };

        Ok(Stmt::If {
            cond,
            then_block,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::While)?;
        self.consume(TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.consume(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Stmt::While { cond, body })
    }

    fn parse_for(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::For)?;
        self.consume(TokenKind::LParen)?;

        let init = if self.eat(TokenKind::Semicolon) {
            None
        } else {
            let start = self.current_token().span;
            let stmt = if self.looks_like_var_decl() {
                self.parse_var_decl()?
            } else {
                let expr = self.parse_expression()?;
                self.consume(TokenKind::Semicolon)?;
                Stmt::Expr(expr)
            };
            let span = start.merge(&self.previous_token().span);
            Some(Box::new(Node::new(stmt, span)))
        };

        let cond = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::Semicolon)?;

        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::RParen)?;

        let body = self.parse_block()?;
        Ok(Stmt::For {
            init,
            cond,
            update,
            body,
        })
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Return)?;
        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::Semicolon)?;
        Ok(Stmt::Return(value))
    }
}
