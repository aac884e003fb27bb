use crate::token::{Token, TokenKind};
use std::{iter::Peekable, str::Chars};

#[derive(Debug)]
pub struct Lexer<'a> {
    source: &'a str,
    stream: Peekable<Chars<'a>>,
    line: usize,
    start: usize,
    current: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            stream: source.chars().peekable(),
            line: 0,
            start: 0,
            current: 0,
        }
    }

    /// Collects every token up to, but not including, the end of file.
    pub fn lex_all(mut self) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::default();
        loop {
            let t = self.next_token();
            if t.kind == TokenKind::EOF {
                break;
            }
            tokens.push(t);
        }
        tokens
    }

    /// Produces the next token. Once the input is exhausted, every
    /// subsequent call yields an end of file token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.current;
        let Some(c) = self.advance() else {
            return Token::new(TokenKind::EOF, self.line + 1, String::default());
        };
        match c {
            '!' => self.lookahead_for_token('=', TokenKind::BANG_EQUAL, TokenKind::BANG),
            '=' => self.lookahead_for_token('=', TokenKind::EQUAL_EQUAL, TokenKind::EQUAL),
            '>' => self.lookahead_for_token('=', TokenKind::GREATER_EQUAL, TokenKind::GREATER),
            '<' => self.lookahead_for_token('=', TokenKind::LESS_EQUAL, TokenKind::LESS),
            '"' => self.lex_quoted('"', TokenKind::STRING),
            '\'' => self.lex_quoted('\'', TokenKind::CHAR),
            _ => {
                if let Some(t) = TokenKind::from_char(c) {
                    self.make_token(t)
                } else if c.is_alphabetic() || c == '_' {
                    self.lex_ident()
                } else if c.is_ascii_digit() {
                    self.lex_number()
                } else {
                    self.make_token(TokenKind::ILLEGAL)
                }
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.advance_if(|c| matches!(c, ' ' | '\t' | '\r' | '\n')) {
            if c == '\n' {
                self.line += 1;
            }
        }
    }

    fn lex_ident(&mut self) -> Token {
        self.advance_while(|c| c.is_alphabetic() || c == '_');
        if let Some(t) = TokenKind::from_keyword(self.lexeme_from_range()) {
            self.make_token(t)
        } else {
            self.make_token(TokenKind::IDENT)
        }
    }

    fn lex_number(&mut self) -> Token {
        self.advance_while(|c| c.is_ascii_digit());
        self.make_token(TokenKind::INT)
    }

    /// Reads a string or character literal. The lexeme excludes the
    /// delimiters, and an unterminated literal runs to the end of input.
    fn lex_quoted(&mut self, delimiter: char, kind: TokenKind) -> Token {
        // Literals may span lines, but the token belongs to the opening line
        let line = self.line;
        // Skip the opening delimiter
        self.start = self.current;
        while let Some(c) = self.advance_if(|c| c != delimiter) {
            if c == '\n' {
                self.line += 1;
            }
        }
        let token = Token::new(kind, line + 1, self.lexeme_from_range().to_string());
        // Consume the closing delimiter
        self.advance_if(|c| c == delimiter);
        token
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.line + 1, self.lexeme_from_range().to_string())
    }

    fn lexeme_from_range(&self) -> &'a str {
        &self.source[self.start..self.current]
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.stream.next()?;
        self.current += c.len_utf8();
        Some(c)
    }

    fn advance_if<F>(&mut self, cond: F) -> Option<char>
    where
        F: FnOnce(char) -> bool,
    {
        if self.stream.peek().filter(|&&c| cond(c)).is_some() {
            self.advance()
        } else {
            None
        }
    }

    fn advance_while<F>(&mut self, cond: F) -> Option<usize>
    where
        F: Fn(char) -> bool,
    {
        let mut count: usize = 0;
        while self.stream.peek().filter(|&&c| cond(c)).is_some() {
            count += 1;
            self.advance();
        }
        count.ne(&0).then_some(count)
    }

    fn lookahead_for_token(
        &mut self,
        match_char: char,
        if_match: TokenKind,
        no_match: TokenKind,
    ) -> Token {
        if self.advance_if(|c| c == match_char).is_some() {
            self.make_token(if_match)
        } else {
            self.make_token(no_match)
        }
    }
}
