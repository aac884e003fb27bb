use std::fmt::{Display, Write};

use crate::token::TokenKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixOp {
    Bang,
    Minus,
}

impl Display for PrefixOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Bang => "!",
            Self::Minus => "-",
        })
    }
}

impl PrefixOp {
    pub fn from_token(t: TokenKind) -> Option<Self> {
        let op = match t {
            TokenKind::BANG => Self::Bang,
            TokenKind::MINUS => Self::Minus,
            _ => return None,
        };
        Some(op)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfixOp {
    Slash,
    Star,
    Plus,
    Minus,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    BangEqual,
    EqualEqual,
}

impl Display for InfixOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Slash => "/",
            Self::Star => "*",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::BangEqual => "!=",
            Self::EqualEqual => "==",
        })
    }
}

impl InfixOp {
    pub fn from_token(t: TokenKind) -> Option<Self> {
        let op = match t {
            TokenKind::SLASH => Self::Slash,
            TokenKind::STAR => Self::Star,
            TokenKind::PLUS => Self::Plus,
            TokenKind::MINUS => Self::Minus,
            TokenKind::GREATER => Self::Greater,
            TokenKind::GREATER_EQUAL => Self::GreaterEqual,
            TokenKind::LESS => Self::Less,
            TokenKind::LESS_EQUAL => Self::LessEqual,
            TokenKind::BANG_EQUAL => Self::BangEqual,
            TokenKind::EQUAL_EQUAL => Self::EqualEqual,
            _ => return None,
        };
        Some(op)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Integer(i32),
    Char(char),
    Str(String),
    Boolean(bool),
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Char(c) => f.write_char(*c),
            Self::Str(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: String,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Literal(Literal),
    Prefix {
        op: PrefixOp,
        rhs: Box<Expr>,
    },
    Infix {
        lhs: Box<Expr>,
        op: InfixOp,
        rhs: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        consequence: Block,
        alternative: Option<Block>,
    },
    Function {
        params: Vec<Ident>,
        body: Block,
        /// Set when the literal is bound directly by a `let`. Only
        /// used when rendering the function.
        name: Option<String>,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
    },
    Array(Vec<Expr>),
    Index {
        collection: Box<Expr>,
        index: Box<Expr>,
    },
    Hash(Vec<(Expr, Expr)>),
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ident(ident) => write!(f, "{ident}"),
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::Prefix { op, rhs } => write!(f, "({op}{rhs})"),
            Self::Infix { lhs, op, rhs } => write!(f, "({lhs} {op} {rhs})"),
            Self::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if {condition} {consequence}")?;
                if let Some(alt) = alternative {
                    write!(f, "else {alt}")?;
                }
                Ok(())
            }
            Self::Function { params, body, name } => {
                f.write_str("fn")?;
                if let Some(name) = name {
                    write!(f, "<{name}>")?;
                }
                write!(f, "({}) {body}", join(params))
            }
            Self::Call { func, args } => write!(f, "{func}({})", join(args)),
            Self::Array(elements) => write!(f, "[{}]", join(elements)),
            Self::Index { collection, index } => write!(f, "({collection}[{index}])"),
            Self::Hash(pairs) => {
                let pairs = pairs
                    .iter()
                    .map(|(k, v)| format!("{k}:{v}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{pairs}}}")
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.stmts.iter().try_for_each(|stmt| write!(f, "{stmt}"))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Let { name: Ident, value: Expr },
    Return(Expr),
    Expr(Expr),
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Let { name, value } => write!(f, "let {name} = {value};"),
            Self::Return(value) => write!(f, "return {value};"),
            Self::Expr(expr) => write!(f, "{expr}"),
        }
    }
}

/// The root of a parsed source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.stmts.iter().try_for_each(|stmt| write!(f, "{stmt}"))
    }
}

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Box<Expr> {
        Box::new(Expr::Ident(Ident::new(name)))
    }

    #[test]
    fn let_stmt() {
        let program = Program {
            stmts: vec![Stmt::Let {
                name: Ident::new("my_var"),
                value: Expr::Ident(Ident::new("another_var")),
            }],
        };
        assert_eq!(program.to_string(), "let my_var = another_var;");
    }

    #[test]
    fn operators() {
        let expr = Expr::Infix {
            lhs: Box::new(Expr::Prefix {
                op: PrefixOp::Minus,
                rhs: ident("a"),
            }),
            op: InfixOp::Star,
            rhs: ident("b"),
        };
        assert_eq!(expr.to_string(), "((-a) * b)");
    }

    #[test]
    fn function_and_call() {
        let func = Expr::Function {
            params: vec![Ident::new("x"), Ident::new("y")],
            body: Block {
                stmts: vec![Stmt::Expr(Expr::Infix {
                    lhs: ident("x"),
                    op: InfixOp::Plus,
                    rhs: ident("y"),
                })],
            },
            name: Some("add".to_string()),
        };
        assert_eq!(func.to_string(), "fn<add>(x, y) (x + y)");

        let call = Expr::Call {
            func: ident("add"),
            args: vec![
                Expr::Literal(Literal::Integer(1)),
                Expr::Literal(Literal::Integer(2)),
            ],
        };
        assert_eq!(call.to_string(), "add(1, 2)");
    }

    #[test]
    fn collections() {
        let index = Expr::Index {
            collection: Box::new(Expr::Array(vec![
                Expr::Literal(Literal::Integer(1)),
                Expr::Literal(Literal::Char('c')),
            ])),
            index: Box::new(Expr::Literal(Literal::Integer(0))),
        };
        assert_eq!(index.to_string(), "([1, c][0])");

        let hash = Expr::Hash(vec![(
            Expr::Literal(Literal::Str("one".to_string())),
            Expr::Literal(Literal::Boolean(true)),
        )]);
        assert_eq!(hash.to_string(), "{one:true}");
    }

    #[test]
    fn if_else() {
        let expr = Expr::If {
            condition: Box::new(Expr::Infix {
                lhs: ident("x"),
                op: InfixOp::Less,
                rhs: ident("y"),
            }),
            consequence: Block {
                stmts: vec![Stmt::Return(Expr::Ident(Ident::new("x")))],
            },
            alternative: Some(Block {
                stmts: vec![Stmt::Expr(Expr::Ident(Ident::new("y")))],
            }),
        };
        assert_eq!(expr.to_string(), "if (x < y) return x;else y");
    }
}
