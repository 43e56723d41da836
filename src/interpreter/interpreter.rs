use super::environment::Environment;
use crate::errors::{RuntimeError, RuntimeResult};
use crate::frontend::grammar::{Expr, ExprType, FuncInfo, InfixOperator, ListRef};

use std::io::{self, BufRead, BufReader, Write};

pub struct Interpreter<W: Write> {
    pub env: Environment,
    pub(super) output: W,
    input: Box<dyn BufRead>,
}

impl Interpreter<io::Stdout> {
    /// Interpreter attached to the process's stdin and stdout.
    pub fn new() -> Self {
        let stdin = Box::new(BufReader::new(io::stdin()));
        Interpreter::with_io(Environment::new(), io::stdout(), stdin)
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_io(env: Environment, output: W, input: Box<dyn BufRead>) -> Self {
        Interpreter { env, output, input }
    }

    /// Gives back the output sink, e.g. to read captured text.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Evaluates statements in order and returns a snapshot of each result.
    /// The first failure is appended as an `Error` value and also written to
    /// the output; the remaining statements are skipped.
    pub fn eval_statements(&mut self, stmts: &[Expr]) -> Vec<Expr> {
        let mut results = Vec::with_capacity(stmts.len());

        for stmt in stmts.iter() {
            match self.eval_expression(stmt) {
                Ok(value) => results.push(value.deep_copy()),
                Err(error) => {
                    results.push(self.report_error(&error));
                    break;
                }
            }
        }

        results
    }

    /// Turns an error into its `Error` value and logs the message.
    pub fn report_error(&mut self, error: &RuntimeError) -> Expr {
        let message = error.to_string();
        if let Err(e) = writeln!(self.output, "{}", message) {
            eprintln!("could not write error message: {}", e);
        }
        Expr::new(ExprType::Error(message), error.line_num)
    }

    /// Reads one line from the input source without its line terminator.
    /// Returns `None` once the input is exhausted.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(&['\r', '\n'][..]).len();
        line.truncate(len);
        Ok(Some(line))
    }

    pub(super) fn write_line(&mut self, line: &str, line_num: usize) -> RuntimeResult<()> {
        writeln!(self.output, "{}", line)
            .map_err(|e| RuntimeError::new(line_num, format!("could not write output: {}", e)))
    }

    pub fn eval_expression(&mut self, expr: &Expr) -> RuntimeResult<Expr> {
        #[cfg(feature = "trace-execution")]
        eprintln!("[line {}] {}", expr.line_num, expr.ast_string());

        match &expr.expr {
            ExprType::Number(_)
            | ExprType::String(_)
            | ExprType::Boolean(_)
            | ExprType::Closure(..)
            | ExprType::Builtin(_)
            | ExprType::Output(_)
            | ExprType::Error(_) => Ok(expr.clone()),
            ExprType::Function(func) => Ok(Expr::new(
                ExprType::Closure(func.clone(), self.env.clone()),
                expr.line_num,
            )),
            ExprType::List(values) => {
                // A list literal builds new storage each time it runs.
                let values = values.borrow().clone();
                let mut evaluated = Vec::with_capacity(values.len());
                for value in values.iter() {
                    evaluated.push(self.eval_expression(value)?);
                }
                Ok(Expr::list(evaluated, expr.line_num))
            }
            ExprType::Identifier(name) => self
                .env
                .get_at_line(name, expr.line_num)
                .ok_or_else(|| {
                    RuntimeError::new(expr.line_num, format!("undefined variable: {}", name))
                }),
            ExprType::Assignment(name, value) => {
                let value = self.eval_expression(value)?;
                self.env.define(name.clone(), value.clone());
                Ok(value)
            }
            ExprType::Prefix(op, operand) => {
                let value = self.eval_expression(operand)?;
                Expr::apply_prefix_op(*op, value)
            }
            ExprType::Postfix(op, operand) => {
                let value = self.eval_expression(operand)?;
                Expr::apply_postfix_op(*op, value)
            }
            ExprType::Infix(InfixOperator::Send, lhs, rhs) => self.eval_send(lhs, rhs),
            ExprType::Infix(op, lhs, rhs) => {
                let lhs = self.eval_expression(lhs)?;
                let rhs = self.eval_expression(rhs)?;
                Expr::apply_infix_op(*op, lhs, rhs)
            }
            ExprType::FunctionCall(callee, args) => self.eval_func_call(callee, args),
            ExprType::When(switch, cases) => {
                self.eval_when(switch.as_deref(), cases, expr.line_num)
            }
            ExprType::ForLoop(ident, values, condition, body) => {
                self.eval_for_loop(ident, values, condition, body, expr.line_num)
            }
        }
    }

    /// `callee <- value`. A bare identifier on the left that is not bound is
    /// reported as a missing function rather than a missing variable.
    fn eval_send(&mut self, lhs: &Expr, rhs: &Expr) -> RuntimeResult<Expr> {
        let lhs = match &lhs.expr {
            ExprType::Identifier(name) => {
                self.env.get_at_line(name, lhs.line_num).ok_or_else(|| {
                    RuntimeError::new(lhs.line_num, format!("undefined function: {}", name))
                })?
            }
            _ => self.eval_expression(lhs)?,
        };
        let rhs = self.eval_expression(rhs)?;

        let result = Expr::apply_infix_op(InfixOperator::Send, lhs, rhs)?;
        match result.expr {
            ExprType::FunctionCall(..) => self.eval_expression(&result),
            _ => Ok(result),
        }
    }

    fn eval_func_call(&mut self, callee: &Expr, args: &ListRef) -> RuntimeResult<Expr> {
        let args = args.borrow().clone();
        match &callee.expr {
            ExprType::Closure(func, closure) => {
                self.call_function(func, closure, args, callee.line_num)
            }
            ExprType::Builtin(builtin) => self.call_builtin(*builtin, args, callee.line_num),
            _ => panic!("{} is not callable", callee.type_name()),
        }
    }

    /// Runs the body in a new scope whose parent is the scope the function
    /// was created in.
    fn call_function(
        &mut self,
        func: &FuncInfo,
        closure: &Environment,
        args: Vec<Expr>,
        line_num: usize,
    ) -> RuntimeResult<Expr> {
        if func.params.len() != args.len() {
            return Err(RuntimeError::new(
                line_num,
                format!(
                    "incorrect number of arguments. Expected {} but got {}.",
                    func.params.len(),
                    args.len()
                ),
            ));
        }

        let prev_env = self.env.clone();
        self.env = Environment::with_enclosing(closure);

        for (param, arg) in func.params.iter().zip(args.into_iter()) {
            self.env.define(param.clone(), arg);
        }

        let result = self.eval_expression(&func.body);

        // Reset to the caller's environment.
        self.env = prev_env;
        result
    }

    /// The switch is evaluated once and compared against each case in turn.
    /// Without a switch, each condition must be a Boolean and the first `true`
    /// wins. The last case is the `else` branch and is taken unconditionally.
    fn eval_when(
        &mut self,
        switch: Option<&Expr>,
        cases: &[(Expr, Expr)],
        line_num: usize,
    ) -> RuntimeResult<Expr> {
        let requires_boolean = switch.is_none();
        let switch = match switch {
            Some(switch) => self.eval_expression(switch)?,
            None => Expr::boolean(true, line_num),
        };

        let ((_, else_result), cases) = match cases.split_last() {
            Some(split) => split,
            None => unreachable!("when expression without an else case"),
        };

        for (condition, result) in cases.iter() {
            let value = self.eval_expression(condition)?;

            if requires_boolean && !matches!(value.expr, ExprType::Boolean(_)) {
                return Err(RuntimeError::new(
                    value.line_num,
                    format!(
                        "invalid type for when conditional expression: {}",
                        value.type_name()
                    ),
                ));
            }

            if value == switch {
                return self.eval_expression(result);
            }
        }

        self.eval_expression(else_result)
    }

    fn eval_for_loop(
        &mut self,
        ident: &str,
        values: &Expr,
        condition: &Expr,
        body: &Expr,
        line_num: usize,
    ) -> RuntimeResult<Expr> {
        let source = self.eval_expression(values)?;
        let elements = match &source.expr {
            // Iterate over a snapshot so the body may append to the source.
            ExprType::List(values) => values.borrow().clone(),
            _ => {
                return Err(RuntimeError::new(
                    source.line_num,
                    format!("expected List, got {}", source.type_name()),
                ))
            }
        };

        let prev_env = self.env.clone();
        self.env = Environment::with_enclosing(&prev_env);

        let result = self.collect_for_loop(ident, elements, condition, body);

        // Reset to enclosing environment.
        self.env = prev_env;
        Ok(Expr::list(result?, line_num))
    }

    fn collect_for_loop(
        &mut self,
        ident: &str,
        elements: Vec<Expr>,
        condition: &Expr,
        body: &Expr,
    ) -> RuntimeResult<Vec<Expr>> {
        let mut collected = vec![];

        for element in elements.into_iter() {
            self.env.define(ident.to_owned(), element);

            let keep = self.eval_expression(condition)?;
            match keep.expr {
                ExprType::Boolean(true) => collected.push(self.eval_expression(body)?),
                ExprType::Boolean(false) => {}
                _ => {
                    return Err(RuntimeError::new(
                        keep.line_num,
                        format!(
                            "invalid type for for-loop conditional expression: {}",
                            keep.type_name()
                        ),
                    ))
                }
            }
        }

        Ok(collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{parse_source, Vocabulary};

    fn interpreter() -> Interpreter<Vec<u8>> {
        Interpreter::with_io(Environment::new(), vec![], Box::new(io::empty()))
    }

    fn run(interpreter: &mut Interpreter<Vec<u8>>, source: &str) -> Vec<String> {
        let stmts = parse_source(source, &Vocabulary::default()).unwrap();
        interpreter
            .eval_statements(&stmts)
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    fn eval(source: &str) -> Vec<String> {
        run(&mut interpreter(), source)
    }

    #[test]
    fn test_batch_stops_at_first_error() {
        assert_eq!(
            eval("1 / 0; 2 + 2;"),
            vec!["Error at line 1: cannot divide by zero"]
        );
        assert_eq!(
            eval("1;\n2;\nx;\n4;"),
            vec!["1", "2", "Error at line 3: undefined variable: x"]
        );
    }

    #[test]
    fn test_error_is_logged() {
        let mut interpreter = interpreter();
        run(&mut interpreter, "\n\nfoo <- (1,);");
        let output = String::from_utf8(interpreter.into_output()).unwrap();
        assert_eq!(output, "Error at line 3: undefined function: foo\n");
    }

    #[test]
    fn test_snapshots_are_not_aliased() {
        assert_eq!(
            eval("a = (1,); a <- 2; a <- 3;"),
            vec!["(1)", "(1, 2)", "(1, 2, 3)"]
        );
    }

    #[test]
    fn test_aliasing_is_observable() {
        assert_eq!(eval("a = (1,); b = a; b <- 2; a;")[3], "(1, 2)");
        assert_eq!(eval("a = (1,); b = a + (); b <- 2; a;")[3], "(1)");
    }

    #[test]
    fn test_functions() {
        assert_eq!(eval("add = func a, b: a + b; add <- (1, 2);")[1], "3");
        assert_eq!(
            eval("fac = func n: when n: is 0: 1 else: n * (fac <- (n - 1,)); fac <- (5,);")[1],
            "120"
        );
        assert_eq!(
            eval("f = func a: a;\nf <- (1, 2);")[1],
            "Error at line 2: incorrect number of arguments. Expected 1 but got 2."
        );
    }

    #[test]
    fn test_scope_is_restored() {
        assert_eq!(eval("x = 1; f = func: x = 2; f <- (); x;")[3], "1");
        assert_eq!(
            eval("f = func a: a / 0; f <- (1,); a;")[1],
            "Error at line 1: cannot divide by zero"
        );

        let mut interpreter = interpreter();
        let globals = interpreter.env.clone();
        run(&mut interpreter, "f = func a: a / 0; f <- (1,);");
        assert_eq!(interpreter.env, globals);
        assert!(interpreter.env.get("a").is_none());
    }

    #[test]
    fn test_functions_capture_their_scope() {
        assert_eq!(
            eval("make = func x: func y: x + y; add2 = make <- (2,); add2 <- (3,);")[2],
            "5"
        );
        assert_eq!(
            eval("x = 10; get_x = func: x; shadow = func x: get_x <- (); shadow <- (5,);")[3],
            "10"
        );
    }

    #[test]
    fn test_closures_share_captured_lists() {
        let results = eval(
            "make = func items: func x: items <- x;\n\
             acc = make <- ((),);\n\
             acc <- (1,);\n\
             acc <- (2,);",
        );
        assert_eq!(results[3], "(1, 2)");
    }

    #[test]
    fn test_when() {
        assert_eq!(eval("a = 2; when a: is 1: \"1\" else: \"0\";")[1], "\"0\"");
        assert_eq!(eval("a = 1; when a: is 1: \"1\" else: \"0\";")[1], "\"1\"");
        assert_eq!(eval("x = 5; when: x < 0: -1 x > 0: 1 else: 0;")[1], "1");
        assert_eq!(
            eval("when: 1: 2 else: 3;")[0],
            "Error at line 1: invalid type for when conditional expression: Number"
        );
    }

    #[test]
    fn test_when_with_boolean_switch_compares_by_value() {
        assert_eq!(
            eval("flag = true; when flag: is 1: \"one\" else: \"other\";")[1],
            "\"other\""
        );
        assert_eq!(
            eval("flag = false; when flag: is true: 1 is false: 0 else: 2;")[1],
            "0"
        );
    }

    #[test]
    fn test_when_evaluates_switch_once() {
        let results = eval("l = (); when l <- 1: is (1, 2): \"a\" else: \"b\"; l;");
        assert_eq!(results[1], "\"b\"");
        assert_eq!(results[2], "(1)");
    }

    #[test]
    fn test_for_loop() {
        assert_eq!(eval("for i in (1, 2, 3): i + 1;"), vec!["(2, 3, 4)"]);
        assert_eq!(
            eval("for i in (0, 1, 2, 3, 4) if i % 2 == 0: i;"),
            vec!["(0, 2, 4)"]
        );
        assert_eq!(eval("for i in 5: i;")[0], "Error at line 1: expected List, got Number");
        assert_eq!(
            eval("for i in (1,) if i: i;")[0],
            "Error at line 1: invalid type for for-loop conditional expression: Number"
        );
        assert_eq!(eval("for i in (1, 2): i; i;")[1], "Error at line 1: undefined variable: i");
    }

    #[test]
    fn test_identifier_line_is_use_site() {
        assert_eq!(
            eval("x = \"a\";\n\nx + 1;")[1],
            "Error at line 3: invalid types String and Number for PLUS"
        );
    }
}
