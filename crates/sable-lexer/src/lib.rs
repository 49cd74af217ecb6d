//! # Sable Lexer
//!
//! Hand-written single-pass tokenizer. Unexpected input becomes
//! `TokenKind::Error` tokens rather than aborting the scan, so the
//! parser can surface every lexical problem as a diagnostic.

mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_idents() {
        assert_eq!(
            kinds("class Counter"),
            vec![TokenKind::Class, TokenKind::Identifier, TokenKind::Eof]
        );
        assert_eq!(
            kinds("using System;"),
            vec![
                TokenKind::Using,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = Lexer::new("42 3.25").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[0].value, "42");
        assert_eq!(tokens[1].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[1].value, "3.25");
    }

    #[test]
    fn test_member_access_is_not_a_float() {
        assert_eq!(
            kinds("a.b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_string_literal_with_escapes() {
        let tokens = Lexer::new(r#""a\nb""#).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].value, "a\nb");
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let tokens = Lexer::new("\"oops").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("== != <= >= && || ="),
            vec![
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::Eq,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("1 // line\n/* block\n */ 2"),
            vec![TokenKind::IntLiteral, TokenKind::IntLiteral, TokenKind::Eof]
        );
    }

    #[test]
    fn test_error_token_for_unexpected_char() {
        let tokens = Lexer::new("#").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert!(tokens[0].value.contains("Unexpected character"));
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::new("int x").tokenize();
        assert_eq!(tokens[0].span, sable_ast::Span::new(0, 3));
        assert_eq!(tokens[1].span, sable_ast::Span::new(4, 5));
    }
}
