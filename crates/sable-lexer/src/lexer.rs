use crate::token::{Token, TokenKind};
use sable_ast::Span;

/// The lexer/tokenizer for Sable.
pub struct Lexer<'a> {
    chars: std::str::CharIndices<'a>,
    current_pos: usize,
    current_char: Option<char>,
    source_len: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer from source code.
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.char_indices();
        let current_char = chars.next().map(|(_, c)| c);
        Self {
            chars,
            current_pos: 0,
            current_char,
            source_len: source.len(),
        }
    }

    /// Tokenizes the entire source code and returns all tokens.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Gets the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let start = self.current_pos;

        match self.current_char {
            None => Token::new(TokenKind::Eof, Span::new(start, start), String::new()),
            Some(ch) => match ch {
                '"' => self.read_string_literal(),
                '0'..='9' => self.read_number(),
                'a'..='z' | 'A'..='Z' | '_' => self.read_identifier_or_keyword(),

                '+' => self.single(TokenKind::Plus, "+"),
                '-' => self.single(TokenKind::Minus, "-"),
                '*' => self.single(TokenKind::Star, "*"),
                '/' => self.single(TokenKind::Slash, "/"),
                '%' => self.single(TokenKind::Percent, "%"),
                '=' => self.read_eq(),
                '!' => self.read_bang(),
                '<' => self.read_lt(),
                '>' => self.read_gt(),
                '&' => self.read_amp(),
                '|' => self.read_pipe(),

                '(' => self.single(TokenKind::LParen, "("),
                ')' => self.single(TokenKind::RParen, ")"),
                '{' => self.single(TokenKind::LBrace, "{"),
                '}' => self.single(TokenKind::RBrace, "}"),
                ';' => self.single(TokenKind::Semicolon, ";"),
                ',' => self.single(TokenKind::Comma, ","),
                '.' => self.single(TokenKind::Dot, "."),

                _ => {
                    self.advance();
                    Token::new(
                        TokenKind::Error,
                        Span::new(start, self.current_pos),
                        format!("Unexpected character: {}", ch),
                    )
                }
            },
        }
    }

    // Helper methods

    fn advance(&mut self) {
        if let Some((pos, ch)) = self.chars.next() {
            self.current_pos = pos;
            self.current_char = Some(ch);
        } else {
            self.current_pos = self.source_len;
            self.current_char = None;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next().map(|(_, c)| c)
    }

    fn single(&mut self, kind: TokenKind, text: &str) -> Token {
        let start = self.current_pos;
        self.advance();
        Token::new(kind, Span::new(start, self.current_pos), text.to_string())
    }

    fn two_char(&mut self, start: usize, kind: TokenKind, text: &str) -> Token {
        self.advance();
        self.advance();
        Token::new(kind, Span::new(start, self.current_pos), text.to_string())
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.current_char {
                Some(ch) if ch.is_whitespace() => self.advance(),
                Some('/') if self.peek() == Some('/') => {
                    while let Some(ch) = self.current_char {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek() == Some('*') => {
                    self.advance();
                    self.advance();
                    loop {
                        match self.current_char {
                            None => break,
                            Some('*') if self.peek() == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => self.advance(),
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn read_eq(&mut self) -> Token {
        let start = self.current_pos;
        if self.peek() == Some('=') {
            self.two_char(start, TokenKind::EqEq, "==")
        } else {
            self.single(TokenKind::Eq, "=")
        }
    }

    fn read_bang(&mut self) -> Token {
        let start = self.current_pos;
        if self.peek() == Some('=') {
            self.two_char(start, TokenKind::BangEq, "!=")
        } else {
            self.single(TokenKind::Bang, "!")
        }
    }

    fn read_lt(&mut self) -> Token {
        let start = self.current_pos;
        if self.peek() == Some('=') {
            self.two_char(start, TokenKind::LtEq, "<=")
        } else {
            self.single(TokenKind::Lt, "<")
        }
    }

    fn read_gt(&mut self) -> Token {
        let start = self.current_pos;
        if self.peek() == Some('=') {
            self.two_char(start, TokenKind::GtEq, ">=")
        } else {
            self.single(TokenKind::Gt, ">")
        }
    }

    fn read_amp(&mut self) -> Token {
        let start = self.current_pos;
        if self.peek() == Some('&') {
            self.two_char(start, TokenKind::AmpAmp, "&&")
        } else {
            self.advance();
            Token::new(
                TokenKind::Error,
                Span::new(start, self.current_pos),
                "Expected '&&'".to_string(),
            )
        }
    }

    fn read_pipe(&mut self) -> Token {
        let start = self.current_pos;
        if self.peek() == Some('|') {
            self.two_char(start, TokenKind::PipePipe, "||")
        } else {
            self.advance();
            Token::new(
                TokenKind::Error,
                Span::new(start, self.current_pos),
                "Expected '||'".to_string(),
            )
        }
    }

    fn read_string_literal(&mut self) -> Token {
        let start = self.current_pos;
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            match self.current_char {
                None | Some('\n') => {
                    return Token::new(
                        TokenKind::Error,
                        Span::new(start, self.current_pos),
                        "Unterminated string literal".to_string(),
                    );
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.current_char {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some('0') => value.push('\0'),
                        Some(other) => {
                            return Token::new(
                                TokenKind::Error,
                                Span::new(start, self.current_pos),
                                format!("Invalid escape sequence: \\{}", other),
                            );
                        }
                        None => {
                            return Token::new(
                                TokenKind::Error,
                                Span::new(start, self.current_pos),
                                "Unterminated string literal".to_string(),
                            );
                        }
                    }
                    self.advance();
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
            }
        }

        Token::new(TokenKind::StringLiteral, Span::new(start, self.current_pos), value)
    }

    fn read_number(&mut self) -> Token {
        let start = self.current_pos;
        let mut value = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                value.push(ch);
                self.advance();
            } else if ch == '.' && !is_float && self.peek().is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        Token::new(kind, Span::new(start, self.current_pos), value)
    }

    fn read_identifier_or_keyword(&mut self) -> Token {
        let start = self.current_pos;
        let mut value = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_alphanumeric() || ch == '_' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = match value.as_str() {
            "using" => TokenKind::Using,
            "namespace" => TokenKind::Namespace,
            "class" => TokenKind::Class,
            "public" => TokenKind::Public,
            "private" => TokenKind::Private,
            "static" => TokenKind::Static,
            "const" => TokenKind::Const,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "this" => TokenKind::This,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "int" => TokenKind::Int,
            "float" => TokenKind::Float,
            "bool" => TokenKind::Bool,
            "string" => TokenKind::StringTy,
            "void" => TokenKind::Void,
            _ => TokenKind::Identifier,
        };

        Token::new(kind, Span::new(start, self.current_pos), value)
    }
}
