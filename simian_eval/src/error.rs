use std::fmt::Display;

use crate::types::Value;

/// Unwinds evaluation up to the nearest point that handles it.
#[derive(Debug, PartialEq)]
pub enum Exception {
    Error(String),
    Return(Value),
    /// A valueless result. It stops evaluation of the enclosing
    /// statements the same way an error does.
    Null,
}

#[derive(Debug)]
pub enum ErrorMsg {
    // Operator errors
    TypeMismatch,
    UnsupportedType,
    UnknownOperator,
    DivisionByZero,
    // Lookup errors
    UndefinedIdent,
    NotAFunction,
    // Collection errors
    UnhashableKey,
    IndexOutOfBounds,
    UnsupportedIndex,
    // Builtin errors
    WrongArgCount,
    UnsupportedArg,
}

impl Display for ErrorMsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::TypeMismatch => "type mismatch",
            Self::UnsupportedType => "type cannot operate",
            Self::UnknownOperator => "unknown operator",
            Self::DivisionByZero => "division by zero",
            Self::UndefinedIdent => "identifier not found",
            Self::NotAFunction => "not a function",
            Self::UnhashableKey => "unusable as hash key",
            Self::IndexOutOfBounds => "index out of bounds",
            Self::UnsupportedIndex => "index operator not supported",
            Self::WrongArgCount => "wrong number of arguments",
            Self::UnsupportedArg => "argument not supported",
        })
    }
}

pub fn runtime_error(msg: ErrorMsg, ctx: impl Display) -> Exception {
    Exception::Error(format!("{msg}: {ctx}"))
}
