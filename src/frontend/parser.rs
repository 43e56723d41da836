use super::grammar::{BuiltinFunction, Expr, ExprType, FuncInfo, PrefixOperator};
use super::lexer::Lexer;
use super::parser_utils::{ParserOperator, Precedence};
use super::token::{Token, TokenType};
use super::token_stream::TokenStream;
use super::vocabulary::Vocabulary;
use crate::errors::{RuntimeError, RuntimeResult};

use std::rc::Rc;

pub struct Parser<'a> {
    tokens: TokenStream<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, vocabulary: &'a Vocabulary) -> RuntimeResult<Self> {
        let tokens = TokenStream::new(Lexer::new(source, vocabulary))?;
        Ok(Parser { tokens })
    }

    /// Advances the stream, returning the token that was current.
    fn bump(&mut self) -> RuntimeResult<Token> {
        self.tokens.advance()
    }

    /// Checks whether or not the current token has the given type.
    fn check(&self, t: TokenType) -> bool {
        self.tokens.current().token_type == t
    }

    /// If the current token has the given type, consume it and return true.
    fn check_consume(&mut self, t: TokenType) -> RuntimeResult<bool> {
        if self.check(t) {
            self.bump()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn consume(&mut self, expected: TokenType) -> RuntimeResult<Token> {
        if self.check(expected) {
            self.bump()
        } else {
            let current = self.tokens.current();
            Err(RuntimeError::new(
                current.line_num,
                format!("expected {}, got {}", expected, current),
            ))
        }
    }

    /// Parses the program as a sequence of `;` terminated expressions.
    pub fn parse(mut self) -> RuntimeResult<Vec<Expr>> {
        let mut stmts = vec![];

        while !self.check(TokenType::Eof) {
            stmts.push(self.parse_expression()?);
            self.consume(TokenType::Semicolon)?;
        }

        Ok(stmts)
    }

    /// Parse expression with precedence.
    pub fn parse_expression(&mut self) -> RuntimeResult<Expr> {
        self.run_pratt_parse_algo(Precedence::Lowest)
    }

    /// Pratt parsing algo.
    pub fn run_pratt_parse_algo(&mut self, min_precedence: Precedence) -> RuntimeResult<Expr> {
        let mut lhs = self.parse_prefix()?;

        while let Some(op) = ParserOperator::from_token(self.tokens.current().token_type) {
            if !op.is_higher_precedence(min_precedence) {
                break;
            }

            let line_num = self.bump()?.line_num;

            let new_lhs = match op {
                ParserOperator::Postfix(op) => ExprType::Postfix(op, Box::new(lhs)),
                ParserOperator::Infix(infix) => {
                    let rhs = self.run_pratt_parse_algo(op.precedence())?;
                    ExprType::Infix(infix, Box::new(lhs), Box::new(rhs))
                }
            };

            lhs = Expr::new(new_lhs, line_num);
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> RuntimeResult<Expr> {
        let prefix_op = match self.tokens.current().token_type {
            TokenType::Minus => Some(PrefixOperator::Negate),
            TokenType::Plus => Some(PrefixOperator::Absolute),
            TokenType::Not => Some(PrefixOperator::Not),
            TokenType::Pack => Some(PrefixOperator::Pack),
            _ => None,
        };

        if let Some(op) = prefix_op {
            let op_token = self.bump()?;
            let expr = self.run_pratt_parse_algo(Precedence::Prefix)?;
            return Ok(Expr::new(
                ExprType::Prefix(op, Box::new(expr)),
                op_token.line_num,
            ));
        }

        match self.tokens.current().token_type {
            TokenType::Identifier => self.parse_identifier(),
            TokenType::OpenParen => self.parse_group(),
            TokenType::Function => self.parse_function(),
            TokenType::When => self.parse_when(),
            TokenType::For => self.parse_for(),
            TokenType::Number | TokenType::String | TokenType::Boolean => self.parse_literal(),
            _ => {
                let current = self.tokens.current();
                Err(RuntimeError::new(
                    current.line_num,
                    format!("invalid prefix operator: {}", current),
                ))
            }
        }
    }

    fn parse_literal(&mut self) -> RuntimeResult<Expr> {
        let token = self.bump()?;
        let line_num = token.line_num;

        let expr = match token.token_type {
            TokenType::Number => match token.value.parse() {
                Ok(value) => ExprType::Number(value),
                Err(_) => {
                    return Err(RuntimeError::new(
                        line_num,
                        format!("invalid number literal '{}'", token.value),
                    ))
                }
            },
            TokenType::Boolean => ExprType::Boolean(token.value == "true"),
            TokenType::String => ExprType::String(token.value),
            _ => unreachable!("not a literal token: {}", token),
        };

        Ok(Expr::new(expr, line_num))
    }

    /// Assignment, builtin reference or plain identifier.
    fn parse_identifier(&mut self) -> RuntimeResult<Expr> {
        let is_assignment = self.tokens.peek()?.token_type == TokenType::Assign;
        let name = self.bump()?;

        if is_assignment {
            self.bump()?;
            let value = self.parse_expression()?;
            return Ok(Expr::new(
                ExprType::Assignment(name.value, Box::new(value)),
                name.line_num,
            ));
        }

        let expr = match BuiltinFunction::from_name(&name.value) {
            Some(builtin) => ExprType::Builtin(builtin),
            None => ExprType::Identifier(name.value),
        };
        Ok(Expr::new(expr, name.line_num))
    }

    /// `()` is the empty list, `(e)` is just `e`, and a comma makes a list.
    fn parse_group(&mut self) -> RuntimeResult<Expr> {
        let open = self.consume(TokenType::OpenParen)?;

        if self.check_consume(TokenType::ClosedParen)? {
            return Ok(Expr::list(vec![], open.line_num));
        }

        let first = self.parse_expression()?;
        if self.check_consume(TokenType::ClosedParen)? {
            return Ok(first);
        }

        self.consume(TokenType::Comma)?;
        let mut values = vec![first];

        while !self.check_consume(TokenType::ClosedParen)? {
            values.push(self.parse_expression()?);
            if !self.check(TokenType::ClosedParen) {
                self.consume(TokenType::Comma)?;
            }
        }

        Ok(Expr::list(values, open.line_num))
    }

    /// `func a, b: body`
    fn parse_function(&mut self) -> RuntimeResult<Expr> {
        let func = self.consume(TokenType::Function)?;

        let mut params = vec![];
        if !self.check(TokenType::Colon) {
            loop {
                params.push(self.consume(TokenType::Identifier)?.value);
                if !self.check_consume(TokenType::Comma)? {
                    break;
                }
            }
        }

        self.consume(TokenType::Colon)?;
        let body = self.parse_expression()?;

        Ok(Expr::new(
            ExprType::Function(Rc::new(FuncInfo { params, body })),
            func.line_num,
        ))
    }

    /// `when [switch]: (is)? cond: result ... else: result`
    ///
    /// Without a switch expression every case condition is a Boolean test.
    /// The `else` branch is stored as a final case whose condition is a copy
    /// of the switch, or literal `true` when there is none.
    fn parse_when(&mut self) -> RuntimeResult<Expr> {
        let when = self.consume(TokenType::When)?;

        let switch = if self.check(TokenType::Colon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let has_switch = switch.is_some();
        self.consume(TokenType::Colon)?;

        let mut cases = vec![];
        loop {
            if has_switch {
                self.consume(TokenType::Is)?;
            }
            let condition = self.parse_expression()?;
            self.consume(TokenType::Colon)?;
            let result = self.parse_expression()?;
            cases.push((condition, result));

            if self.check(TokenType::Else) {
                break;
            }
        }

        let else_token = self.consume(TokenType::Else)?;
        self.consume(TokenType::Colon)?;
        let result = self.parse_expression()?;
        let else_condition = match &switch {
            Some(switch) => Expr::new(switch.expr.clone(), else_token.line_num),
            None => Expr::boolean(true, else_token.line_num),
        };
        cases.push((else_condition, result));

        Ok(Expr::new(
            ExprType::When(switch.map(Box::new), cases),
            when.line_num,
        ))
    }

    /// `for ident in values [if condition]: body`
    fn parse_for(&mut self) -> RuntimeResult<Expr> {
        let for_token = self.consume(TokenType::For)?;
        let ident = self.consume(TokenType::Identifier)?;
        self.consume(TokenType::In)?;
        let values = self.parse_expression()?;

        let condition = if self.check_consume(TokenType::If)? {
            self.parse_expression()?
        } else {
            Expr::boolean(true, for_token.line_num)
        };

        self.consume(TokenType::Colon)?;
        let body = self.parse_expression()?;

        Ok(Expr::new(
            ExprType::ForLoop(
                ident.value,
                Box::new(values),
                Box::new(condition),
                Box::new(body),
            ),
            for_token.line_num,
        ))
    }
}

/// Lexes and parses `source` with the given vocabulary.
pub fn parse_source(source: &str, vocabulary: &Vocabulary) -> RuntimeResult<Vec<Expr>> {
    Parser::new(source, vocabulary)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> RuntimeResult<Vec<Expr>> {
        parse_source(source, &Vocabulary::default())
    }

    fn ast(source: &str) -> String {
        let stmts = parse(source).unwrap();
        assert_eq!(stmts.len(), 1);
        stmts[0].ast_string()
    }

    fn parse_error(source: &str) -> String {
        parse(source).unwrap_err().to_string()
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(ast("1 + 2 * 4;"), "(+ 1 (* 2 4))");
        assert_eq!(ast("3 ** 2 * 2;"), "(* (** 3 2) 2)");
        assert_eq!(ast("1 - 2 - 3;"), "(- (- 1 2) 3)");
        assert_eq!(ast("-2 ** 2;"), "(** (- 2) 2)");
        assert_eq!(ast("4! + 1;"), "(+ (! 4) 1)");
        assert_eq!(ast("-3!;"), "(- (! 3))");
    }

    #[test]
    fn test_list_operator_precedence() {
        assert_eq!(ast("(1, 2) @ 1 + 1;"), "(@ (list 1 2) (+ 1 1))");
        assert_eq!(ast("(1, 2) @ 0 == 1;"), "(== (@ (list 1 2) 0) 1)");
        assert_eq!(ast("-(1, 2) <- 5;"), "(<- (- (list 1 2)) 5)");
        assert_eq!(
            ast("len <- (list,) == 10;"),
            "(== (<- len (list list)) 10)"
        );
        assert_eq!(
            ast("list @ randint <- (0, 10,);"),
            "(@ list (<- randint (list 0 10)))"
        );
        assert_eq!(
            ast("n != 0 and n % 2 == 0;"),
            "(and (!= n 0) (== (% n 2) 0))"
        );
    }

    #[test]
    fn test_groups_and_lists() {
        assert_eq!(ast("();"), "(list )");
        assert_eq!(ast("(1,);"), "(list 1)");
        assert_eq!(ast("(1, 2);"), "(list 1 2)");
        assert_eq!(ast("(1 + 1);"), "(+ 1 1)");
        assert_eq!(ast("((1, 2), 3,);"), "(list (list 1 2) 3)");
    }

    #[test]
    fn test_assignment() {
        assert_eq!(ast("x = 1 + 2;"), "(set x (+ 1 2))");
        assert_eq!(ast("x = y = 3;"), "(set x (set y 3))");
    }

    #[test]
    fn test_function() {
        assert_eq!(ast("func a, b: a + b;"), "(func (a b) (+ a b))");
        assert_eq!(ast("func: 1;"), "(func () 1)");
        assert_eq!(
            ast("f <- (1, 2);"),
            "(<- f (list 1 2))"
        );
        assert_eq!(
            parse_error("func 1: 2;"),
            "Error at line 1: expected IDENTIFIER, got NUMBER ('1')"
        );
    }

    #[test]
    fn test_when() {
        assert_eq!(
            ast("when a: is 1: \"1\" else: \"0\";"),
            "(when a (1 \"1\") (a \"0\"))"
        );
        assert_eq!(
            ast("when: x > 1: 1 x < 0: 2 else: 3;"),
            "(when ((> x 1) 1) ((< x 0) 2) (true 3))"
        );
        assert_eq!(
            parse_error("when a: 1: 2 else: 3;"),
            "Error at line 1: expected IS, got NUMBER ('1')"
        );
    }

    #[test]
    fn test_when_else_line() {
        let stmts = parse("when a:\n  is 1: 2\n  else: 3;").unwrap();
        match &stmts[0].expr {
            ExprType::When(_, cases) => {
                assert_eq!(cases.len(), 2);
                assert_eq!(cases[1].0.line_num, 3);
            }
            other => panic!("expected when, got {:?}", other),
        }
    }

    #[test]
    fn test_for() {
        assert_eq!(
            ast("for i in (1, 2, 3): i + 1;"),
            "(for i (list 1 2 3) true (+ i 1))"
        );
        assert_eq!(
            ast("for i in range <- (5,) if i % 2 == 0: i;"),
            "(for i (<- range (list 5)) (== (% i 2) 0) i)"
        );
    }

    #[test]
    fn test_builtins_are_recognized() {
        let stmts = parse("print; printer;").unwrap();
        assert_eq!(stmts[0].expr, ExprType::Builtin(BuiltinFunction::Print));
        assert_eq!(stmts[1].expr, ExprType::Identifier("printer".to_owned()));
    }

    #[test]
    fn test_operator_nodes_take_operator_line() {
        let stmts = parse("x\n+\n1;").unwrap();
        assert_eq!(stmts[0].line_num, 2);

        let stmts = parse("3\n!;").unwrap();
        assert_eq!(stmts[0].line_num, 2);
    }

    #[test]
    fn test_multiple_statements() {
        let stmts = parse("x = 1;\ny = x + 1;\n").unwrap();
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[1].line_num, 2);
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(
            parse_error("1 + 2"),
            "Error at line 1: expected SEMICOLON, got EOF ('')"
        );
        assert_eq!(
            parse_error("1 +;"),
            "Error at line 1: invalid prefix operator: SEMICOLON (';')"
        );
        assert_eq!(
            parse_error("(1, 2;"),
            "Error at line 1: expected COMMA, got SEMICOLON (';')"
        );
        assert_eq!(
            parse_error("1;\n2 $ 3;"),
            "Error at line 2: invalid character '$'"
        );
    }
}
