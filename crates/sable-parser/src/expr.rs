//! Expression parsing with precedence climbing

use super::*;

impl Parser {
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Node<Expr>> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> ParseResult<Node<Expr>> {
        let target = self.parse_or()?;

        if self.eat(TokenKind::Eq) {
            // Right-associative; target validity is checked by lowering.
            let value = self.parse_assignment()?;
            let span = target.span.merge(&value.span);
            return Ok(Node::new(
                Expr::Assign {
                    target: Box::new(target),
                    value: Box::new(value),
                },
                span,
            ));
        }

        Ok(target)
    }

    fn parse_or(&mut self) -> ParseResult<Node<Expr>> {
        let mut left = self.parse_and()?;
        while self.eat(TokenKind::PipePipe) {
            let right = self.parse_and()?;
            left = Self::binary(left, BinaryOp::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Node<Expr>> {
        let mut left = self.parse_equality()?;
        while self.eat(TokenKind::AmpAmp) {
            let right = self.parse_equality()?;
            left = Self::binary(left, BinaryOp::And, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> ParseResult<Node<Expr>> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.current_token().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::BangEq => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = Self::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> ParseResult<Node<Expr>> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current_token().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Self::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> ParseResult<Node<Expr>> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.current_token().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Self::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> ParseResult<Node<Expr>> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current_token().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Self::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;
        let op = match self.current_token().kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            let span = start.merge(&operand.span);
            return Ok(Node::new(
                Expr::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> ParseResult<Node<Expr>> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.eat(TokenKind::Dot) {
                let property = self.parse_identifier()?;
                let span = expr.span.merge(&property.span);
                expr = Node::new(
                    Expr::Member {
                        object: Box::new(expr),
                        property,
                    },
                    span,
                );
            } else if self.check(&TokenKind::LParen) {
                self.advance();
                let mut args = Vec::new();
                while !self.check(&TokenKind::RParen) && !self.is_at_end() {
                    args.push(self.parse_expression()?);
                    if !self.check(&TokenKind::RParen) {
                        self.consume(TokenKind::Comma)?;
                    }
                }
                self.consume(TokenKind::RParen)?;
                let span = expr.span.merge(&self.previous_token().span);
                expr = Node::new(
                    Expr::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Node<Expr>> {
        let token = self.current_token().clone();

        let expr = match token.kind {
            TokenKind::IntLiteral => {
                self.advance();
                let value = token.value.parse::<i64>().map_err(|_| ParseError {
                    message: format!("Integer literal out of range: {}", token.value),
                    span: token.span,
                })?;
                Expr::Literal(Literal::Int(value))
            }
            TokenKind::FloatLiteral => {
                self.advance();
                let value = token.value.parse::<f64>().map_err(|_| ParseError {
                    message: format!("Invalid float literal: {}", token.value),
                    span: token.span,
                })?;
                Expr::Literal(Literal::Float(value))
            }
            TokenKind::StringLiteral => {
                self.advance();
                Expr::Literal(Literal::Str(token.value.clone()))
            }
            TokenKind::True => {
                self.advance();
                Expr::Literal(Literal::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                Expr::Literal(Literal::Bool(false))
            }
            TokenKind::Null => {
                self.advance();
                Expr::Literal(Literal::Null)
            }
            TokenKind::This => {
                self.advance();
                Expr::This
            }
            TokenKind::Identifier => {
                self.advance();
                Expr::Ident(Ident::new(token.value.clone()))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.consume(TokenKind::RParen)?;
                return Ok(inner);
            }
            _ => {
                return Err(self.error(format!("Expected expression, found {:?}", token.kind)));
            }
        };

        Ok(Node::new(expr, token.span))
    }

    fn binary(left: Node<Expr>, op: BinaryOp, right: Node<Expr>) -> Node<Expr> {
        let span = left.span.merge(&right.span);
        Node::new(
            Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        )
    }
}
