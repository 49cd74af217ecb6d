use sable_ast::Span;

/// Represents the different kinds of tokens in Sable source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Using,
    Namespace,
    Class,
    Public,
    Private,
    Static,
    Const,
    Return,
    If,
    Else,
    While,
    For,
    Break,
    Continue,
    This,
    True,
    False,
    Null,

    // Type keywords
    Int,
    Float,
    Bool,
    StringTy,
    Void,

    // Literals and identifiers
    Identifier,
    IntLiteral,
    FloatLiteral,
    StringLiteral,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    EqEq,
    BangEq,
    Bang,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AmpAmp,
    PipePipe,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Dot,

    // Special
    Error,
    Eof,
}

/// A single token with its source span and raw text.
///
/// For `Error` tokens, `value` holds the error message instead of
/// the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub value: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, value: String) -> Self {
        Self { kind, span, value }
    }
}
