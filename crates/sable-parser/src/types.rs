//! Type annotation parsing

use super::*;

impl Parser {
    pub(crate) fn parse_type(&mut self) -> ParseResult<Node<TypeRef>> {
        let start = self.current_token().span;

        let primitive = match self.current_token().kind {
            TokenKind::Int => Some(PrimitiveType::Int),
            TokenKind::Float => Some(PrimitiveType::Float),
            TokenKind::Bool => Some(PrimitiveType::Bool),
            TokenKind::StringTy => Some(PrimitiveType::Str),
            TokenKind::Void => Some(PrimitiveType::Void),
            _ => None,
        };

        if let Some(primitive) = primitive {
            self.advance();
            return Ok(Node::new(TypeRef::Primitive(primitive), start));
        }

        if self.check(&TokenKind::Identifier) {
            let name = self.parse_qualified_name()?;
            let span = start.merge(&self.previous_token().span);
            return Ok(Node::new(TypeRef::Named(name), span));
        }

        Err(self.error(format!(
            "Expected type, found {:?}",
            self.current_token().kind
        )))
    }

    /// True when the upcoming tokens look like the start of a local
    /// variable declaration (`type ident ...`).
    pub(crate) fn looks_like_var_decl(&self) -> bool {
        match self.current_token().kind {
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Bool
            | TokenKind::StringTy
            | TokenKind::Void => true,
            TokenKind::Identifier => {
                // Scan over a qualified name; a declaration follows it with
                // another identifier (`Demo.Counter c`).
                let mut offset = 1;
                while self.peek_kind(offset) == Some(&TokenKind::Dot)
                    && self.peek_kind(offset + 1) == Some(&TokenKind::Identifier)
                {
                    offset += 2;
                }
                self.peek_kind(offset) == Some(&TokenKind::Identifier)
            }
            _ => false,
        }
    }
}
