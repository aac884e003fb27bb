pub mod environment;
pub mod error;
pub mod interpret;
pub mod stdlib;
pub mod types;

use interpret::Interpreter;
use log::trace;
use simian_syntax::{error::Error, lex::Lexer, parse::Parser};
use types::Value;

/// Parses and evaluates `source` in the interpreter's session. Syntax
/// errors are returned as a batch and nothing is evaluated; a runtime
/// failure is an ordinary [`Value::Error`].
pub fn run(source: &str, interpreter: &Interpreter) -> Result<Value, Vec<Error>> {
    trace!("Lexing {source}");
    let parser = Parser::new(Lexer::new(source));
    let program = parser.parse_all()?;
    trace!("Interpreting {program:#?}");
    let value = interpreter.interpret(&program);
    trace!("Result {value:?}");
    Ok(value)
}
