use std::mem;

use crate::{
    ast::{Block, Expr, Ident, InfixOp, Literal, PrefixOp, Program, Stmt},
    error::{Error, ErrorMsg},
    lex::Lexer,
    token::{Token, TokenKind},
};

/// Binding power of operators, from loosest to tightest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    Less,
    Greater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl Precedence {
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::EQUAL_EQUAL | TokenKind::BANG_EQUAL => Self::Equals,
            TokenKind::LESS | TokenKind::LESS_EQUAL => Self::Less,
            TokenKind::GREATER | TokenKind::GREATER_EQUAL => Self::Greater,
            TokenKind::PLUS | TokenKind::MINUS => Self::Sum,
            TokenKind::SLASH | TokenKind::STAR => Self::Product,
            TokenKind::LPAREN => Self::Call,
            TokenKind::LBRACKET => Self::Index,
            _ => Self::Lowest,
        }
    }
}

type PrefixParseFn<'a> = fn(&mut Parser<'a>) -> Result<Expr, Error>;
type InfixParseFn<'a> = fn(&mut Parser<'a>, Expr) -> Result<Expr, Error>;

#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
    errors: Vec<Error>,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            errors: Vec::default(),
        }
    }

    /// Parses the whole token stream. Statements that fail to parse are
    /// skipped and left out of the program, and their errors are
    /// available through [`Parser::errors`]. The program must not be
    /// evaluated if any errors were recorded.
    pub fn parse_program(&mut self) -> Program {
        let mut stmts = Vec::default();
        while self.current.kind != TokenKind::EOF {
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    self.errors.push(e);
                    self.sync();
                }
            }
            self.next_token();
        }
        Program { stmts }
    }

    /// Convenience wrapper over [`Parser::parse_program`] that
    /// only yields the program when there were no errors.
    pub fn parse_all(mut self) -> Result<Program, Vec<Error>> {
        let program = self.parse_program();
        self.errors.is_empty().then_some(program).ok_or(self.errors)
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    fn parse_stmt(&mut self) -> Result<Stmt, Error> {
        match self.current.kind {
            TokenKind::LET => self.parse_let_stmt(),
            TokenKind::RETURN => self.parse_return_stmt(),
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_let_stmt(&mut self) -> Result<Stmt, Error> {
        let name = Ident::new(self.expect_peek(TokenKind::IDENT)?.lexeme);
        self.expect_peek(TokenKind::EQUAL)?;
        self.next_token();
        let mut value = self.parse_expr(Precedence::Lowest)?;
        if let Expr::Function { name: func_name, .. } = &mut value {
            *func_name = Some(name.name.clone());
        }
        self.skip_semicolon();

        Ok(Stmt::Let { name, value })
    }

    fn parse_return_stmt(&mut self) -> Result<Stmt, Error> {
        // Consume the `return` keyword
        self.next_token();
        let value = self.parse_expr(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(Stmt::Return(value))
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt, Error> {
        let expr = self.parse_expr(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(Stmt::Expr(expr))
    }

    /// Parses statements until a closing brace or the end of file.
    /// The current token must be the opening brace, and it is left on
    /// the closing brace.
    fn parse_block(&mut self) -> Block {
        let mut stmts = Vec::default();
        // Consume the opening brace
        self.next_token();
        while !matches!(self.current.kind, TokenKind::RBRACE | TokenKind::EOF) {
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    self.errors.push(e);
                    self.sync();
                    // The broken statement ran into the end of the block
                    if self.current.kind == TokenKind::RBRACE {
                        break;
                    }
                }
            }
            self.next_token();
        }
        Block { stmts }
    }

    pub fn parse_expr(&mut self, precedence: Precedence) -> Result<Expr, Error> {
        let Some(prefix) = Self::prefix_parse_fn(self.current.kind) else {
            return Err(Self::error_at(
                &self.current,
                ErrorMsg::NoPrefixParseFn(self.current.kind),
            ));
        };
        let mut lhs = prefix(self)?;

        while !self.peek_is(TokenKind::SEMICOLON) && precedence < Precedence::of(self.peek.kind) {
            let Some(infix) = Self::infix_parse_fn(self.peek.kind) else {
                return Ok(lhs);
            };
            self.next_token();
            lhs = infix(self, lhs)?;
        }

        Ok(lhs)
    }

    fn prefix_parse_fn(kind: TokenKind) -> Option<PrefixParseFn<'a>> {
        let func: PrefixParseFn<'a> = match kind {
            TokenKind::IDENT => Self::parse_ident,
            TokenKind::INT => Self::parse_integer,
            TokenKind::CHAR => Self::parse_char,
            TokenKind::STRING => Self::parse_string,
            TokenKind::TRUE | TokenKind::FALSE => Self::parse_boolean,
            TokenKind::BANG | TokenKind::MINUS => Self::parse_prefix,
            TokenKind::LPAREN => Self::parse_group,
            TokenKind::IF => Self::parse_if,
            TokenKind::FN => Self::parse_function,
            TokenKind::LBRACKET => Self::parse_array,
            TokenKind::LBRACE => Self::parse_hash,
            _ => return None,
        };
        Some(func)
    }

    fn infix_parse_fn(kind: TokenKind) -> Option<InfixParseFn<'a>> {
        let func: InfixParseFn<'a> = match kind {
            TokenKind::PLUS
            | TokenKind::MINUS
            | TokenKind::SLASH
            | TokenKind::STAR
            | TokenKind::EQUAL_EQUAL
            | TokenKind::BANG_EQUAL
            | TokenKind::LESS
            | TokenKind::LESS_EQUAL
            | TokenKind::GREATER
            | TokenKind::GREATER_EQUAL => Self::parse_infix,
            TokenKind::LPAREN => Self::parse_call,
            TokenKind::LBRACKET => Self::parse_index,
            _ => return None,
        };
        Some(func)
    }

    fn parse_ident(&mut self) -> Result<Expr, Error> {
        Ok(Expr::Ident(Ident::new(self.current.lexeme.clone())))
    }

    fn parse_integer(&mut self) -> Result<Expr, Error> {
        self.current
            .lexeme
            .parse()
            .map(|n| Expr::Literal(Literal::Integer(n)))
            .map_err(|_| Self::error(&self.current, ErrorMsg::InvalidInteger))
    }

    fn parse_char(&mut self) -> Result<Expr, Error> {
        let mut chars = self.current.lexeme.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Expr::Literal(Literal::Char(c))),
            _ => Err(Self::error(&self.current, ErrorMsg::InvalidChar)),
        }
    }

    fn parse_string(&mut self) -> Result<Expr, Error> {
        Ok(Expr::Literal(Literal::Str(self.current.lexeme.clone())))
    }

    fn parse_boolean(&mut self) -> Result<Expr, Error> {
        Ok(Expr::Literal(Literal::Boolean(
            self.current.kind == TokenKind::TRUE,
        )))
    }

    fn parse_prefix(&mut self) -> Result<Expr, Error> {
        // Infallible unwrap as only prefix operators are registered for this
        let op = PrefixOp::from_token(self.current.kind)
            .expect("non-prefix operators cannot be present here");
        self.next_token();
        let rhs = self.parse_expr(Precedence::Prefix)?;

        Ok(Expr::Prefix {
            op,
            rhs: Box::new(rhs),
        })
    }

    fn parse_infix(&mut self, lhs: Expr) -> Result<Expr, Error> {
        // Infallible unwrap as only infix operators are registered for this
        let op = InfixOp::from_token(self.current.kind)
            .expect("non-infix operators cannot be present here");
        let precedence = Precedence::of(self.current.kind);
        self.next_token();
        let rhs = self.parse_expr(precedence)?;

        Ok(Expr::Infix {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    fn parse_group(&mut self) -> Result<Expr, Error> {
        // Consume the opening parenthesis
        self.next_token();
        let expr = self.parse_expr(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RPAREN)?;

        Ok(expr)
    }

    fn parse_if(&mut self) -> Result<Expr, Error> {
        self.expect_peek(TokenKind::LPAREN)?;
        self.next_token();
        let condition = self.parse_expr(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RPAREN)?;
        self.expect_peek(TokenKind::LBRACE)?;
        let consequence = self.parse_block();
        let alternative = if self.peek_is(TokenKind::ELSE) {
            // Consume the `else` keyword
            self.next_token();
            self.expect_peek(TokenKind::LBRACE)?;
            Some(self.parse_block())
        } else {
            None
        };

        Ok(Expr::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function(&mut self) -> Result<Expr, Error> {
        self.expect_peek(TokenKind::LPAREN)?;
        let params = self.parse_params()?;
        self.expect_peek(TokenKind::LBRACE)?;
        let body = self.parse_block();

        Ok(Expr::Function {
            params,
            body,
            name: None,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Ident>, Error> {
        let mut params = vec![];
        if self.peek_is(TokenKind::RPAREN) {
            self.next_token();
            return Ok(params);
        }
        params.push(Ident::new(self.expect_peek(TokenKind::IDENT)?.lexeme));
        while self.peek_is(TokenKind::COMMA) {
            self.next_token();
            params.push(Ident::new(self.expect_peek(TokenKind::IDENT)?.lexeme));
        }
        self.expect_peek(TokenKind::RPAREN)?;

        Ok(params)
    }

    fn parse_call(&mut self, func: Expr) -> Result<Expr, Error> {
        let args = self.parse_expr_list(TokenKind::RPAREN)?;

        Ok(Expr::Call {
            func: Box::new(func),
            args,
        })
    }

    fn parse_array(&mut self) -> Result<Expr, Error> {
        Ok(Expr::Array(self.parse_expr_list(TokenKind::RBRACKET)?))
    }

    /// Parses comma separated expressions up to the `end` token. The
    /// current token must be the opening delimiter.
    fn parse_expr_list(&mut self, end: TokenKind) -> Result<Vec<Expr>, Error> {
        let mut list = vec![];
        if self.peek_is(end) {
            self.next_token();
            return Ok(list);
        }
        self.next_token();
        list.push(self.parse_expr(Precedence::Lowest)?);
        while self.peek_is(TokenKind::COMMA) {
            // Skip past the comma
            self.next_token();
            self.next_token();
            list.push(self.parse_expr(Precedence::Lowest)?);
        }
        self.expect_peek(end)?;

        Ok(list)
    }

    fn parse_index(&mut self, collection: Expr) -> Result<Expr, Error> {
        // Consume the opening bracket
        self.next_token();
        let index = self.parse_expr(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RBRACKET)?;

        Ok(Expr::Index {
            collection: Box::new(collection),
            index: Box::new(index),
        })
    }

    fn parse_hash(&mut self) -> Result<Expr, Error> {
        let mut pairs = vec![];
        while !self.peek_is(TokenKind::RBRACE) {
            self.next_token();
            let key = self.parse_expr(Precedence::Lowest)?;
            self.expect_peek(TokenKind::COLON)?;
            self.next_token();
            let value = self.parse_expr(Precedence::Lowest)?;
            pairs.push((key, value));
            if !self.peek_is(TokenKind::RBRACE) {
                self.expect_peek(TokenKind::COMMA)?;
            }
        }
        self.expect_peek(TokenKind::RBRACE)?;

        Ok(Expr::Hash(pairs))
    }

    fn next_token(&mut self) {
        self.current = mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    fn skip_semicolon(&mut self) {
        if self.peek_is(TokenKind::SEMICOLON) {
            self.next_token();
        }
    }

    /// Advances if the next token is of the given kind and returns it,
    /// otherwise leaves the stream untouched.
    fn expect_peek(&mut self, kind: TokenKind) -> Result<Token, Error> {
        if self.peek_is(kind) {
            self.next_token();
            Ok(self.current.clone())
        } else {
            Err(Self::error(&self.peek, ErrorMsg::ExpectedToken(kind)))
        }
    }

    /// Skips the remainder of a broken statement. Stops on a semicolon
    /// or closing brace, or just before the next statement keyword or the
    /// end of the enclosing block.
    fn sync(&mut self) {
        while !matches!(self.current.kind, TokenKind::SEMICOLON | TokenKind::RBRACE)
            && !matches!(
                self.peek.kind,
                TokenKind::LET | TokenKind::RETURN | TokenKind::RBRACE | TokenKind::EOF
            )
        {
            self.next_token();
        }
    }

    fn error(token: &Token, msg: ErrorMsg) -> Error {
        format!("Parse error at line {}: {} {}", token.line, msg, token)
    }

    fn error_at(token: &Token, msg: ErrorMsg) -> Error {
        format!("Parse error at line {}: {}", token.line, msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> (Program, Vec<Error>) {
        let mut parser = Parser::new(Lexer::new(input));
        let program = parser.parse_program();
        (program, parser.errors().to_vec())
    }

    fn parse_test(input: &str, expected: Program) {
        let program = Parser::new(Lexer::new(input)).parse_all().unwrap();
        assert_eq!(program, expected);
    }

    fn render_test(input: &str, expected: &str) {
        let program = Parser::new(Lexer::new(input)).parse_all().unwrap();
        assert_eq!(program.to_string(), expected, "input: {input}");
    }

    fn int(n: i32) -> Expr {
        Expr::Literal(Literal::Integer(n))
    }

    fn ident(name: &str) -> Expr {
        Expr::Ident(Ident::new(name))
    }

    #[test]
    fn let_stmt() {
        parse_test(
            "let x = 42;",
            Program {
                stmts: vec![Stmt::Let {
                    name: Ident::new("x"),
                    value: int(42),
                }],
            },
        );
    }

    #[test]
    fn return_stmt() {
        parse_test(
            "return x; return 5",
            Program {
                stmts: vec![Stmt::Return(ident("x")), Stmt::Return(int(5))],
            },
        );
    }

    #[test]
    fn literals() {
        parse_test(
            r#"5; 'a'; "hi"; true; false"#,
            Program {
                stmts: vec![
                    Stmt::Expr(int(5)),
                    Stmt::Expr(Expr::Literal(Literal::Char('a'))),
                    Stmt::Expr(Expr::Literal(Literal::Str("hi".to_string()))),
                    Stmt::Expr(Expr::Literal(Literal::Boolean(true))),
                    Stmt::Expr(Expr::Literal(Literal::Boolean(false))),
                ],
            },
        );
    }

    #[test]
    fn precedence() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d", "((a + (b * c)) + d)"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            ("a < b > c", "(a < (b > c))"),
            ("a > b < c", "((a > b) < c)"),
            ("a <= b >= c", "(a <= (b >= c))"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d)",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
        ];
        for (input, expected) in cases {
            render_test(input, expected);
        }
    }

    #[test]
    fn if_expr() {
        parse_test(
            "if (x < y) { x } else { y }",
            Program {
                stmts: vec![Stmt::Expr(Expr::If {
                    condition: Box::new(Expr::Infix {
                        lhs: Box::new(ident("x")),
                        op: InfixOp::Less,
                        rhs: Box::new(ident("y")),
                    }),
                    consequence: Block {
                        stmts: vec![Stmt::Expr(ident("x"))],
                    },
                    alternative: Some(Block {
                        stmts: vec![Stmt::Expr(ident("y"))],
                    }),
                })],
            },
        );
    }

    #[test]
    fn function_literal() {
        parse_test(
            "fn(x, y) { x + y; }",
            Program {
                stmts: vec![Stmt::Expr(Expr::Function {
                    params: vec![Ident::new("x"), Ident::new("y")],
                    body: Block {
                        stmts: vec![Stmt::Expr(Expr::Infix {
                            lhs: Box::new(ident("x")),
                            op: InfixOp::Plus,
                            rhs: Box::new(ident("y")),
                        })],
                    },
                    name: None,
                })],
            },
        );
        render_test("fn() {}", "fn() ");
        render_test("fn(x) { x }", "fn(x) x");
    }

    #[test]
    fn let_names_function_literal() {
        render_test("let add = fn(a, b) { a + b };", "let add = fn<add>(a, b) (a + b);");
    }

    #[test]
    fn call_expr() {
        parse_test(
            "add(1, 2 * 3)",
            Program {
                stmts: vec![Stmt::Expr(Expr::Call {
                    func: Box::new(ident("add")),
                    args: vec![
                        int(1),
                        Expr::Infix {
                            lhs: Box::new(int(2)),
                            op: InfixOp::Star,
                            rhs: Box::new(int(3)),
                        },
                    ],
                })],
            },
        );
    }

    #[test]
    fn collections() {
        render_test("[1, 2 * 2, 3 + 3]", "[1, (2 * 2), (3 + 3)]");
        render_test("[]", "[]");
        render_test("myArray[1 + 1]", "(myArray[(1 + 1)])");
        render_test(r#"{"one": 1, "two": 2}"#, "{one:1, two:2}");
        render_test("{}", "{}");
        render_test(r#"{"one": 0 + 1, true: 10 / 5}"#, "{one:(0 + 1), true:(10 / 5)}");
    }

    #[test]
    fn unterminated_block_ends_at_eof() {
        let (program, errors) = parse("if (x) { x");
        assert!(errors.is_empty());
        assert_eq!(program.to_string(), "if x x");
    }

    #[test]
    fn missing_assign_is_reported_and_parsing_continues() {
        let (program, errors) = parse("let x 5; let y = 10;");
        assert_eq!(
            errors,
            vec!["Parse error at line 1: expected next token to be =, found 5".to_string()]
        );
        assert_eq!(program.to_string(), "let y = 10;");
    }

    #[test]
    fn multiple_errors() {
        let (_, errors) = parse("let = 10;\nlet 838383;");
        assert_eq!(
            errors,
            vec![
                "Parse error at line 1: expected next token to be IDENT, found =".to_string(),
                "Parse error at line 2: expected next token to be IDENT, found 838383".to_string(),
            ]
        );
    }

    #[test]
    fn error_before_closing_brace_stays_in_block() {
        let (program, errors) = parse("let f = fn() { 1 + }; let y = 2; let z = ;");
        assert_eq!(
            errors,
            vec![
                "Parse error at line 1: no prefix parse function for } found".to_string(),
                "Parse error at line 1: no prefix parse function for ; found".to_string(),
            ]
        );
        assert_eq!(
            program,
            Program {
                stmts: vec![
                    Stmt::Let {
                        name: Ident::new("f"),
                        value: Expr::Function {
                            params: vec![],
                            body: Block::default(),
                            name: Some("f".to_string()),
                        },
                    },
                    Stmt::Let {
                        name: Ident::new("y"),
                        value: int(2),
                    },
                ]
            }
        );
    }

    #[test]
    fn missing_closing_paren() {
        let (_, errors) = parse("(1 + 2 * 3;");
        assert_eq!(
            errors,
            vec!["Parse error at line 1: expected next token to be ), found ;".to_string()]
        );
    }

    #[test]
    fn missing_closing_bracket_at_eof() {
        let (_, errors) = parse("[1, 2");
        assert_eq!(
            errors,
            vec![
                "Parse error at line 1: expected next token to be ], found end of file".to_string()
            ]
        );
    }

    #[test]
    fn illegal_token() {
        let (_, errors) = parse("@");
        assert_eq!(
            errors,
            vec!["Parse error at line 1: no prefix parse function for ILLEGAL found".to_string()]
        );
    }

    #[test]
    fn invalid_literals() {
        let (_, errors) = parse("99999999999; 'ab'; ''");
        assert_eq!(
            errors,
            vec![
                "Parse error at line 1: could not parse as integer 99999999999".to_string(),
                "Parse error at line 1: could not parse as char ab".to_string(),
                "Parse error at line 1: could not parse as char ".to_string(),
            ]
        );
    }
}
