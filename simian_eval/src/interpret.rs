use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use log::debug;
use simian_syntax::ast::{Block, Expr, Ident, InfixOp, Literal, PrefixOp, Program, Stmt};

use crate::{
    environment::Env,
    error::{runtime_error, ErrorMsg, Exception},
    stdlib,
    types::{Callable, Func, HashPair, Value},
};

/// A session: one top-level environment shared by every
/// program interpreted through it.
#[derive(Debug)]
pub struct Interpreter {
    pub env: Rc<RefCell<Env>>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self { env: Env::new() }
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interpret(&self, program: &Program) -> Value {
        eval(program, &self.env)
    }
}

/// Evaluates a program. Failures come back as [`Value::Error`], a
/// top-level `return` as [`Value::ReturnValue`], and a statement that
/// produced nothing stops the program with [`Value::Null`].
pub fn eval(program: &Program, env: &Rc<RefCell<Env>>) -> Value {
    interpret_stmts(&program.stmts, env).unwrap_or_else(Value::from)
}

pub fn eval_stmt(stmt: &Stmt, env: &Rc<RefCell<Env>>) -> Value {
    interpret_stmt(stmt, env).unwrap_or_else(Value::from)
}

pub fn eval_expr(expr: &Expr, env: &Rc<RefCell<Env>>) -> Value {
    interpret_expr(expr, env).unwrap_or_else(Value::from)
}

/// Runs statements in order and yields the value of the last one.
/// Any unwinding result stops the sequence, and an empty sequence has
/// no value.
fn interpret_stmts(stmts: &[Stmt], env: &Rc<RefCell<Env>>) -> Result<Value, Exception> {
    stmts
        .iter()
        .try_fold(None, |_, stmt| interpret_stmt(stmt, env).map(Some))?
        .ok_or(Exception::Null)
}

fn interpret_block(block: &Block, env: &Rc<RefCell<Env>>) -> Result<Value, Exception> {
    interpret_stmts(&block.stmts, env)
}

fn interpret_stmt(stmt: &Stmt, env: &Rc<RefCell<Env>>) -> Result<Value, Exception> {
    match stmt {
        Stmt::Expr(expr) => interpret_expr(expr, env),
        Stmt::Let { name, value } => interpret_let_stmt(name, value, env),
        Stmt::Return(expr) => Err(Exception::Return(interpret_expr(expr, env)?)),
    }
}

fn interpret_let_stmt(
    name: &Ident,
    value: &Expr,
    env: &Rc<RefCell<Env>>,
) -> Result<Value, Exception> {
    let value = interpret_expr(value, env)?;
    env.borrow_mut().set(&name.name, value.clone());
    Ok(value)
}

fn interpret_expr(expr: &Expr, env: &Rc<RefCell<Env>>) -> Result<Value, Exception> {
    match expr {
        Expr::Ident(ident) => interpret_ident(ident, env),
        Expr::Literal(lit) => Ok(interpret_literal(lit)),
        Expr::Prefix { op, rhs } => interpret_prefix(*op, interpret_expr(rhs, env)?),
        Expr::Infix { lhs, op, rhs } => {
            let left = interpret_expr(lhs, env)?;
            let right = interpret_expr(rhs, env)?;
            interpret_infix(left, *op, right)
        }
        Expr::If {
            condition,
            consequence,
            alternative,
        } => interpret_if(condition, consequence, alternative.as_ref(), env),
        Expr::Function { params, body, name } => Ok(Value::Func(Func {
            name: name.clone(),
            params: params.iter().map(|p| p.name.clone()).collect(),
            body: body.clone(),
            env: Rc::clone(env),
        })),
        Expr::Call { func, args } => interpret_call(func, args, env),
        Expr::Array(elements) => Ok(Value::Array(interpret_exprs(elements, env)?)),
        Expr::Index { collection, index } => {
            let collection = interpret_expr(collection, env)?;
            let index = interpret_expr(index, env)?;
            interpret_index(collection, index)
        }
        Expr::Hash(pairs) => interpret_hash(pairs, env),
    }
}

fn interpret_exprs(exprs: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Vec<Value>, Exception> {
    exprs.iter().map(|e| interpret_expr(e, env)).collect()
}

fn interpret_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Integer(n) => Value::Integer(*n),
        Literal::Char(c) => Value::Char(*c),
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::Boolean(b) => Value::Boolean(*b),
    }
}

/// Names resolve through the scope chain first and fall back to the
/// builtin table.
fn interpret_ident(ident: &Ident, env: &Rc<RefCell<Env>>) -> Result<Value, Exception> {
    if let Some(value) = env.borrow().get(&ident.name) {
        return Ok(value);
    }
    stdlib::lookup(&ident.name)
        .map(Value::Builtin)
        .ok_or_else(|| runtime_error(ErrorMsg::UndefinedIdent, &ident.name))
}

fn interpret_prefix(op: PrefixOp, rhs: Value) -> Result<Value, Exception> {
    match op {
        PrefixOp::Bang => Ok(Value::Boolean(!rhs.is_truthy())),
        PrefixOp::Minus => match rhs {
            Value::Integer(n) => Ok(Value::Integer(n.wrapping_neg())),
            _ => Err(runtime_error(
                ErrorMsg::UnknownOperator,
                format!("{op}{}", rhs.kind()),
            )),
        },
    }
}

fn interpret_infix(lhs: Value, op: InfixOp, rhs: Value) -> Result<Value, Exception> {
    let operation = format!("{} {op} {}", lhs.kind(), rhs.kind());
    match (lhs, rhs) {
        (Value::Integer(l), Value::Integer(r)) => interpret_integer_infix(l, op, r),
        (Value::Char(l), Value::Char(r)) => match op {
            InfixOp::EqualEqual => Ok(from_bool(l == r)),
            InfixOp::BangEqual => Ok(from_bool(l != r)),
            _ => Err(runtime_error(ErrorMsg::UnknownOperator, operation)),
        },
        // Any operator other than `+` joins two strings
        (Value::Str(l), Value::Str(r)) => match op {
            InfixOp::Plus => Err(runtime_error(ErrorMsg::UnknownOperator, operation)),
            _ => Ok(Value::Str(l + &r)),
        },
        (l, r) if l.kind() != r.kind() => Err(runtime_error(ErrorMsg::TypeMismatch, operation)),
        _ => Err(runtime_error(ErrorMsg::UnsupportedType, operation)),
    }
}

/// Comparisons yield the integers 1 and 0 rather than booleans.
fn interpret_integer_infix(l: i32, op: InfixOp, r: i32) -> Result<Value, Exception> {
    Ok(match op {
        InfixOp::Plus => Value::Integer(l.wrapping_add(r)),
        InfixOp::Minus => Value::Integer(l.wrapping_sub(r)),
        InfixOp::Star => Value::Integer(l.wrapping_mul(r)),
        InfixOp::Slash => {
            if r == 0 {
                return Err(runtime_error(
                    ErrorMsg::DivisionByZero,
                    format!("{l} {op} {r}"),
                ));
            }
            Value::Integer(l.wrapping_div(r))
        }
        InfixOp::Less => from_bool(l < r),
        InfixOp::LessEqual => from_bool(l <= r),
        InfixOp::Greater => from_bool(l > r),
        InfixOp::GreaterEqual => from_bool(l >= r),
        InfixOp::EqualEqual => from_bool(l == r),
        InfixOp::BangEqual => from_bool(l != r),
    })
}

fn from_bool(b: bool) -> Value {
    Value::Integer(i32::from(b))
}

fn interpret_if(
    condition: &Expr,
    consequence: &Block,
    alternative: Option<&Block>,
    env: &Rc<RefCell<Env>>,
) -> Result<Value, Exception> {
    if interpret_expr(condition, env)?.is_truthy() {
        interpret_block(consequence, env)
    } else if let Some(block) = alternative {
        interpret_block(block, env)
    } else {
        Err(Exception::Null)
    }
}

fn interpret_call(
    func_expr: &Expr,
    arg_exprs: &[Expr],
    env: &Rc<RefCell<Env>>,
) -> Result<Value, Exception> {
    let value = interpret_expr(func_expr, env)?;
    let args = interpret_exprs(arg_exprs, env)?;
    let func: &dyn Callable = match &value {
        Value::Func(f) => f,
        Value::Builtin(b) => {
            debug!("Call builtin {}", b.name);
            b
        }
        _ => return Err(runtime_error(ErrorMsg::NotAFunction, value.kind())),
    };

    func.call(args)
}

/// Binds the arguments in a fresh scope under the captured one. Extra
/// arguments are dropped and missing ones are simply left unbound.
pub(crate) fn call_func(func: &Func, args: Vec<Value>) -> Result<Value, Exception> {
    debug!("Call {func} with {} arguments", args.len());
    let func_env = Env::with_parent(Rc::clone(&func.env));
    for (param, arg) in func.params.iter().zip(args) {
        func_env.borrow_mut().set(param, arg);
    }

    match interpret_block(&func.body, &func_env) {
        // A `return` stops at the call that it belongs to
        Err(Exception::Return(value)) => Ok(value),
        res => res,
    }
}

fn interpret_index(collection: Value, index: Value) -> Result<Value, Exception> {
    match (&collection, &index) {
        (Value::Str(s), Value::Integer(i)) => usize::try_from(*i)
            .ok()
            .and_then(|idx| s.chars().nth(idx))
            .map(Value::Char)
            .ok_or_else(|| runtime_error(ErrorMsg::IndexOutOfBounds, i)),
        (Value::Array(elements), Value::Integer(i)) => usize::try_from(*i)
            .ok()
            .and_then(|idx| elements.get(idx))
            .cloned()
            .ok_or_else(|| runtime_error(ErrorMsg::IndexOutOfBounds, i)),
        (Value::Hash(pairs), _) => {
            let key = index
                .hash_key()
                .ok_or_else(|| runtime_error(ErrorMsg::UnhashableKey, index.kind()))?;
            // A missing key has no value
            pairs
                .get(&key)
                .map(|pair| pair.value.clone())
                .ok_or(Exception::Null)
        }
        _ => Err(runtime_error(ErrorMsg::UnsupportedIndex, collection.kind())),
    }
}

fn interpret_hash(pairs: &[(Expr, Expr)], env: &Rc<RefCell<Env>>) -> Result<Value, Exception> {
    let mut hash = BTreeMap::new();
    for (key_expr, value_expr) in pairs {
        let key = interpret_expr(key_expr, env)?;
        let hash_key = key
            .hash_key()
            .ok_or_else(|| runtime_error(ErrorMsg::UnhashableKey, key.kind()))?;
        let value = interpret_expr(value_expr, env)?;
        hash.insert(hash_key, HashPair { key, value });
    }

    Ok(Value::Hash(hash))
}
