use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt::{Debug, Display},
    rc::Rc,
};

use simian_syntax::ast::Block;

use crate::{environment::Env, error::Exception, interpret};

/// Tag reported by every runtime value, used in error messages.
#[allow(nonstandard_style)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    INTEGER,
    BOOLEAN,
    CHAR,
    STRING,
    NULL,
    RETURN_VALUE,
    ERROR,
    FUNCTION,
    BUILTIN,
    ARRAY,
    HASH,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(i32),
    Boolean(bool),
    Char(char),
    Str(String),
    Null,
    ReturnValue(Box<Value>),
    Error(String),
    Func(Func),
    Builtin(Builtin),
    Array(Vec<Value>),
    Hash(BTreeMap<HashKey, HashPair>),
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Str(s) => f.write_str(s),
            Self::Null => f.write_str("null"),
            Self::ReturnValue(v) => write!(f, "{v}"),
            Self::Error(msg) => write!(f, "ERROR: {msg}"),
            Self::Func(func) => write!(f, "{func}"),
            Self::Builtin(builtin) => write!(f, "{builtin}"),
            Self::Array(elements) => write!(
                f,
                "[{}]",
                elements
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::Hash(pairs) => write!(
                f,
                "{{{}}}",
                pairs
                    .values()
                    .map(|p| format!("{}: {}", p.key, p.value))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Integer(_) => ValueKind::INTEGER,
            Self::Boolean(_) => ValueKind::BOOLEAN,
            Self::Char(_) => ValueKind::CHAR,
            Self::Str(_) => ValueKind::STRING,
            Self::Null => ValueKind::NULL,
            Self::ReturnValue(_) => ValueKind::RETURN_VALUE,
            Self::Error(_) => ValueKind::ERROR,
            Self::Func(_) => ValueKind::FUNCTION,
            Self::Builtin(_) => ValueKind::BUILTIN,
            Self::Array(_) => ValueKind::ARRAY,
            Self::Hash(_) => ValueKind::HASH,
        }
    }

    /// Only `null` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Null | Self::Boolean(false))
    }

    /// Returns the key under which this value is stored in a hash,
    /// or `None` if the value cannot be used as a key.
    pub fn hash_key(&self) -> Option<HashKey> {
        let key = match self {
            Self::Integer(n) => HashKey::Integer(*n),
            Self::Boolean(b) => HashKey::Boolean(*b),
            Self::Str(s) => HashKey::Str(s.clone()),
            _ => return None,
        };
        Some(key)
    }

    /// Splits off the values that unwind evaluation.
    pub fn into_result(self) -> Result<Value, Exception> {
        match self {
            Self::Null => Err(Exception::Null),
            Self::Error(msg) => Err(Exception::Error(msg)),
            Self::ReturnValue(v) => Err(Exception::Return(*v)),
            v => Ok(v),
        }
    }
}

impl From<Exception> for Value {
    fn from(e: Exception) -> Self {
        match e {
            Exception::Null => Self::Null,
            Exception::Error(msg) => Self::Error(msg),
            Exception::Return(v) => Self::ReturnValue(Box::new(v)),
        }
    }
}

/// Keys compare by exact value, so two distinct
/// strings can never collide in a hash.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashKey {
    Integer(i32),
    Boolean(bool),
    Str(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

pub trait Callable {
    fn call(&self, args: Vec<Value>) -> Result<Value, Exception>;
}

#[derive(Clone)]
pub struct Func {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Block,
    pub env: Rc<RefCell<Env>>,
}

// The captured environment may hold this very function, so it is
// compared by identity and left out of the debug output.
impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.body == other.body && Rc::ptr_eq(&self.env, &other.env)
    }
}

impl Debug for Func {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Func")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &self.body)
            .finish()
    }
}

impl Display for Func {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "fn {}({}) {{...}}", name, self.params.join(", ")),
            None => write!(f, "fn({}) {{...}}", self.params.join(", ")),
        }
    }
}

impl Callable for Func {
    fn call(&self, args: Vec<Value>) -> Result<Value, Exception> {
        interpret::call_func(self, args)
    }
}

pub type NativeFn = fn(Vec<Value>) -> Result<Value, Exception>;

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub body: NativeFn,
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

impl Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("builtin function")
    }
}

impl Callable for Builtin {
    fn call(&self, args: Vec<Value>) -> Result<Value, Exception> {
        (self.body)(args).and_then(Value::into_result)
    }
}
