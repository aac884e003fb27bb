pub mod ast;
pub mod error;
pub mod lex;
pub mod parse;
pub mod token;
