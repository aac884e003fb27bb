use std::fmt::Display;

use crate::token::TokenKind;

pub type Error = String;

#[derive(Debug)]
pub enum ErrorMsg {
    ExpectedToken(TokenKind),
    NoPrefixParseFn(TokenKind),
    InvalidInteger,
    InvalidChar,
}

impl Display for ErrorMsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExpectedToken(kind) => write!(f, "expected next token to be {kind}, found"),
            Self::NoPrefixParseFn(kind) => write!(f, "no prefix parse function for {kind} found"),
            Self::InvalidInteger => f.write_str("could not parse as integer"),
            Self::InvalidChar => f.write_str("could not parse as char"),
        }
    }
}
