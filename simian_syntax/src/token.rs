use std::fmt::Display;

/// The enum variants are in SCREAMING_SNAKE_CASE as they technically
/// represent constants, but Rust does not allow const enum variants.
#[allow(nonstandard_style)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    // Symbols
    LPAREN,
    RPAREN,
    LBRACE,
    RBRACE,
    LBRACKET,
    RBRACKET,
    COMMA,
    SEMICOLON,
    COLON,
    // Arithmetic
    BANG,
    MINUS,
    PLUS,
    SLASH,
    STAR,
    // Comparisons
    BANG_EQUAL,
    EQUAL_EQUAL,
    GREATER,
    GREATER_EQUAL,
    LESS,
    LESS_EQUAL,
    // Literals
    IDENT,
    INT,
    CHAR,
    STRING,
    // Keywords
    ELSE,
    FALSE,
    FN,
    IF,
    LET,
    RETURN,
    TRUE,
    // Miscellaneous tokens
    EQUAL,
    ILLEGAL,
    EOF,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::LPAREN => "(",
            Self::RPAREN => ")",
            Self::LBRACE => "{",
            Self::RBRACE => "}",
            Self::LBRACKET => "[",
            Self::RBRACKET => "]",
            Self::COMMA => ",",
            Self::SEMICOLON => ";",
            Self::COLON => ":",
            Self::BANG => "!",
            Self::MINUS => "-",
            Self::PLUS => "+",
            Self::SLASH => "/",
            Self::STAR => "*",
            Self::BANG_EQUAL => "!=",
            Self::EQUAL_EQUAL => "==",
            Self::GREATER => ">",
            Self::GREATER_EQUAL => ">=",
            Self::LESS => "<",
            Self::LESS_EQUAL => "<=",
            Self::IDENT => "IDENT",
            Self::INT => "INT",
            Self::CHAR => "CHAR",
            Self::STRING => "STRING",
            Self::ELSE => "ELSE",
            Self::FALSE => "FALSE",
            Self::FN => "FN",
            Self::IF => "IF",
            Self::LET => "LET",
            Self::RETURN => "RETURN",
            Self::TRUE => "TRUE",
            Self::EQUAL => "=",
            Self::ILLEGAL => "ILLEGAL",
            Self::EOF => "EOF",
        })
    }
}

impl TokenKind {
    pub fn from_char(c: char) -> Option<Self> {
        let token = match c {
            '(' => Self::LPAREN,
            ')' => Self::RPAREN,
            '{' => Self::LBRACE,
            '}' => Self::RBRACE,
            '[' => Self::LBRACKET,
            ']' => Self::RBRACKET,
            ',' => Self::COMMA,
            ';' => Self::SEMICOLON,
            ':' => Self::COLON,
            '-' => Self::MINUS,
            '+' => Self::PLUS,
            '/' => Self::SLASH,
            '*' => Self::STAR,
            _ => return None,
        };
        Some(token)
    }

    pub fn from_keyword(kw: &str) -> Option<Self> {
        let token = match kw {
            "else" => Self::ELSE,
            "false" => Self::FALSE,
            "fn" => Self::FN,
            "if" => Self::IF,
            "let" => Self::LET,
            "return" => Self::RETURN,
            "true" => Self::TRUE,
            _ => return None,
        };
        Some(token)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub lexeme: String,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind == TokenKind::EOF {
            f.write_str("end of file")
        } else {
            f.write_str(&self.lexeme)
        }
    }
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, lexeme: String) -> Self {
        Self { kind, line, lexeme }
    }
}
