//! Class and member parsing

use super::*;

impl Parser {
    pub(crate) fn parse_class(&mut self) -> ParseResult<ClassDecl> {
        let access = self.parse_access_modifier();
        self.consume(TokenKind::Class)?;
        let name = self.parse_identifier()?;
        self.consume(TokenKind::LBrace)?;

        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.check(&TokenKind::Semicolon) {
                let span = self.current_token().span;
                self.diagnostics
                    .push(SyntaxDiagnostic::warning("redundant semicolon", span));
                self.advance();
                continue;
            }
            match self.parse_member() {
                Ok(member) => members.push(member),
                Err(err) => {
                    self.report(err);
                    self.synchronize();
                }
            }
        }

        self.consume(TokenKind::RBrace)?;
        Ok(ClassDecl {
            access,
            name,
            members,
        })
    }

    pub(crate) fn parse_member(&mut self) -> ParseResult<ClassMember> {
        let access = self.parse_access_modifier();
        let static_span = self.current_token().span;
        let is_static = self.eat(TokenKind::Static);
        let const_span = self.current_token().span;
        let is_const = self.eat(TokenKind::Const);

        let ty = self.parse_type()?;
        let name = self.parse_identifier()?;

        if self.check(&TokenKind::LParen) {
            if is_const {
                self.diagnostics.push(SyntaxDiagnostic::error(
                    "methods cannot be declared const",
                    const_span,
                ));
            }
            let method = self.parse_method_rest(access, is_static, ty, name)?;
            Ok(ClassMember::Method(method))
        } else {
            if is_static {
                self.diagnostics.push(SyntaxDiagnostic::error(
                    "static fields are not supported",
                    static_span,
                ));
            }
            let field = self.parse_field_rest(access, is_const, ty, name)?;
            Ok(ClassMember::Field(field))
        }
    }

    fn parse_field_rest(
        &mut self,
        access: AccessModifier,
        is_const: bool,
        ty: Node<TypeRef>,
        name: Node<Ident>,
    ) -> ParseResult<FieldDecl> {
        let init = if self.eat(TokenKind::Eq) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon)?;

        // Initializers are restricted so the data block stays limited to
        // this/null initial values.
        match (&init, is_const) {
            (Some(expr), false) => {
                self.diagnostics.push(SyntaxDiagnostic::error(
                    "only const fields may have initializers",
                    expr.span,
                ));
            }
            (Some(expr), true) => {
                if !matches!(expr.value, Expr::Literal(_)) {
                    self.diagnostics.push(SyntaxDiagnostic::error(
                        "const initializer must be a literal",
                        expr.span,
                    ));
                }
            }
            (None, true) => {
                self.diagnostics.push(SyntaxDiagnostic::error(
                    "const field requires an initializer",
                    name.span,
                ));
            }
            (None, false) => {}
        }

        Ok(FieldDecl {
            access,
            is_const,
            ty,
            name,
            init,
        })
    }

    fn parse_method_rest(
        &mut self,
        access: AccessModifier,
        is_static: bool,
        return_type: Node<TypeRef>,
        name: Node<Ident>,
    ) -> ParseResult<MethodDecl> {
        self.consume(TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.consume(TokenKind::RParen)?;
        let body = self.parse_block()?;

        Ok(MethodDecl {
            access,
            is_static,
            return_type,
            name,
            params,
            body,
        })
    }

    pub(crate) fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = Vec::new();

        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            let ty = self.parse_type()?;
            let name = self.parse_identifier()?;
            params.push(Param { ty, name });
            if !self.check(&TokenKind::RParen) {
                self.consume(TokenKind::Comma)?;
            }
        }

        Ok(params)
    }
}
