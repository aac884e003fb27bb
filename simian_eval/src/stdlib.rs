use log::debug;

use crate::{
    error::{runtime_error, ErrorMsg, Exception},
    types::{Builtin, Value},
};

/// Native functions, consulted after the environment when resolving an
/// identifier. The order is stable so that entries can be addressed by
/// their index.
pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "len",
        body: len,
    },
    Builtin {
        name: "puts",
        body: puts,
    },
    Builtin {
        name: "first",
        body: first,
    },
    Builtin {
        name: "last",
        body: last,
    },
    Builtin {
        name: "rest",
        body: rest,
    },
    Builtin {
        name: "push",
        body: push,
    },
];

pub fn lookup(name: &str) -> Option<Builtin> {
    debug!("Lookup builtin {name}");
    BUILTINS.iter().find(|b| b.name == name).copied()
}

pub fn index_of(name: &str) -> Option<usize> {
    BUILTINS.iter().position(|b| b.name == name)
}

fn check_args(name: &str, args: &[Value], want: usize) -> Result<(), Exception> {
    if args.len() == want {
        Ok(())
    } else {
        Err(runtime_error(
            ErrorMsg::WrongArgCount,
            format!("{name} got {}, want {want}", args.len()),
        ))
    }
}

fn unsupported(name: &str, args: &[Value]) -> Exception {
    let kinds = args
        .iter()
        .map(|a| a.kind().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    runtime_error(ErrorMsg::UnsupportedArg, format!("{name}({kinds})"))
}

fn to_int(n: usize) -> Value {
    Value::Integer(i32::try_from(n).unwrap_or(i32::MAX))
}

fn len(args: Vec<Value>) -> Result<Value, Exception> {
    check_args("len", &args, 1)?;
    match &args[0] {
        Value::Str(s) => Ok(to_int(s.chars().count())),
        Value::Array(elements) => Ok(to_int(elements.len())),
        Value::Hash(pairs) => Ok(to_int(pairs.len())),
        _ => Err(unsupported("len", &args)),
    }
}

fn puts(args: Vec<Value>) -> Result<Value, Exception> {
    for arg in args {
        println!("{arg}");
    }
    Ok(Value::Null)
}

fn first(args: Vec<Value>) -> Result<Value, Exception> {
    check_args("first", &args, 1)?;
    match &args[0] {
        Value::Array(elements) => Ok(elements.first().cloned().unwrap_or(Value::Null)),
        _ => Err(unsupported("first", &args)),
    }
}

fn last(args: Vec<Value>) -> Result<Value, Exception> {
    check_args("last", &args, 1)?;
    match &args[0] {
        Value::Array(elements) => Ok(elements.last().cloned().unwrap_or(Value::Null)),
        _ => Err(unsupported("last", &args)),
    }
}

fn rest(args: Vec<Value>) -> Result<Value, Exception> {
    check_args("rest", &args, 1)?;
    match &args[0] {
        Value::Array(elements) if elements.is_empty() => Ok(Value::Null),
        Value::Array(elements) => Ok(Value::Array(elements[1..].to_vec())),
        _ => Err(unsupported("rest", &args)),
    }
}

fn push(args: Vec<Value>) -> Result<Value, Exception> {
    check_args("push", &args, 2)?;
    match &args[0] {
        Value::Array(elements) => {
            let mut elements = elements.clone();
            elements.push(args[1].clone());
            Ok(Value::Array(elements))
        }
        _ => Err(unsupported("push", &args)),
    }
}
