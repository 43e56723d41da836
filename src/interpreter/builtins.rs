use super::interpreter::Interpreter;
use crate::errors::{RuntimeError, RuntimeResult};
use crate::frontend::grammar::{is_whole_number, BuiltinFunction, Expr, ExprType};

use rand::Rng;
use std::io::Write;

impl<W: Write> Interpreter<W> {
    /// Runs a builtin on already evaluated arguments. Errors point at the
    /// line the builtin was referenced on.
    pub(super) fn call_builtin(
        &mut self,
        builtin: BuiltinFunction,
        args: Vec<Expr>,
        line_num: usize,
    ) -> RuntimeResult<Expr> {
        match builtin {
            BuiltinFunction::Print => self.builtin_print(args, line_num),
            BuiltinFunction::Input => self.builtin_input(args, line_num),
            BuiltinFunction::RandomInt => random_int(args, line_num),
            BuiltinFunction::RandomFloat => random_float(args, line_num),
            BuiltinFunction::Length => length(args, line_num),
            BuiltinFunction::Range => range(args, line_num),
            BuiltinFunction::Round => round(args, line_num),
            BuiltinFunction::Format => format(args, line_num),
        }
    }

    /// Writes the arguments on one line and returns that line as `Output`.
    fn builtin_print(&mut self, args: Vec<Expr>, line_num: usize) -> RuntimeResult<Expr> {
        let line: Vec<_> = args.iter().map(|arg| arg.to_string()).collect();
        let line = line.join(", ");
        self.write_line(&line, line_num)?;
        Ok(Expr::new(ExprType::Output(line), line_num))
    }

    fn builtin_input(&mut self, args: Vec<Expr>, line_num: usize) -> RuntimeResult<Expr> {
        let prompt = match args.as_slice() {
            [prompt] => prompt,
            _ => return Err(expected_one_argument(&args, line_num)),
        };
        let prompt = match &prompt.expr {
            ExprType::String(s) => s,
            _ => return Err(unsupported_type(prompt, "input", line_num)),
        };

        let io_error = |e: std::io::Error| {
            RuntimeError::new(line_num, format!("could not read input: {}", e))
        };

        write!(self.output, "{}", prompt)
            .and_then(|_| self.output.flush())
            .map_err(io_error)?;

        let line = self.read_line().map_err(io_error)?.unwrap_or_default();
        Ok(Expr::string(line, line_num))
    }
}

fn random_int(args: Vec<Expr>, line_num: usize) -> RuntimeResult<Expr> {
    let (start, end) = match args.as_slice() {
        [end] => (0.0, expect_number(end, "end", line_num)?),
        [start, end] => (
            expect_number(start, "start", line_num)?,
            expect_number(end, "end", line_num)?,
        ),
        _ => {
            return Err(incorrect_arg_count("1 or 2", args.len(), line_num));
        }
    };

    expect_whole(start, "start", line_num)?;
    expect_whole(end, "end", line_num)?;
    expect_ordered(start, end, line_num)?;

    let value = rand::thread_rng().gen_range(start as i64..=end as i64);
    Ok(Expr::number(value as f64, line_num))
}

fn random_float(args: Vec<Expr>, line_num: usize) -> RuntimeResult<Expr> {
    let (start, end) = match args.as_slice() {
        [] => (0.0, 1.0),
        [end] => (0.0, expect_number(end, "end", line_num)?),
        [start, end] => (
            expect_number(start, "start", line_num)?,
            expect_number(end, "end", line_num)?,
        ),
        _ => {
            return Err(incorrect_arg_count("0, 1, or 2", args.len(), line_num));
        }
    };

    expect_ordered(start, end, line_num)?;

    let value = start + (end - start) * rand::thread_rng().gen::<f64>();
    Ok(Expr::number(value, line_num))
}

fn length(args: Vec<Expr>, line_num: usize) -> RuntimeResult<Expr> {
    let collection = match args.as_slice() {
        [collection] => collection,
        _ => return Err(expected_one_argument(&args, line_num)),
    };

    let len = match &collection.expr {
        ExprType::String(s) => s.chars().count(),
        ExprType::List(values) => values.borrow().len(),
        _ => return Err(unsupported_type(collection, "len", line_num)),
    };
    Ok(Expr::number(len as f64, line_num))
}

/// Builds the whole list eagerly. The sign of `step` must move `start`
/// towards `end`.
fn range(args: Vec<Expr>, line_num: usize) -> RuntimeResult<Expr> {
    let (start, end, step) = match args.as_slice() {
        [end] => (0.0, expect_number(end, "end", line_num)?, 1.0),
        [start, end] => (
            expect_number(start, "start", line_num)?,
            expect_number(end, "end", line_num)?,
            1.0,
        ),
        [start, end, step] => (
            expect_number(start, "start", line_num)?,
            expect_number(end, "end", line_num)?,
            expect_number(step, "step", line_num)?,
        ),
        _ => {
            return Err(incorrect_arg_count("1, 2, or 3", args.len(), line_num));
        }
    };

    if step == 0.0 {
        return Err(RuntimeError::new(line_num, "step cannot be 0"));
    }
    if start > end && step > 0.0 {
        return Err(RuntimeError::new(
            line_num,
            "step value must be negative if start value is greater than end value",
        ));
    }
    if start < end && step < 0.0 {
        return Err(RuntimeError::new(
            line_num,
            "step value must be positive if start value is less than end value",
        ));
    }

    let ascending = start < end;
    let mut values = vec![];
    let mut next_value = start;
    while (ascending && next_value < end) || (!ascending && next_value > end) {
        values.push(Expr::number(next_value, line_num));
        next_value += step;
    }

    Ok(Expr::list(values, line_num))
}

/// Rounds half away from zero.
fn round(args: Vec<Expr>, line_num: usize) -> RuntimeResult<Expr> {
    let (number, round_to) = match args.as_slice() {
        [number, round_to] => (
            expect_number(number, "number", line_num)?,
            expect_number(round_to, "round_to", line_num)?,
        ),
        _ => return Err(incorrect_arg_count("2", args.len(), line_num)),
    };

    expect_whole(round_to, "round_to", line_num)?;
    if round_to < 0.0 {
        return Err(RuntimeError::new(
            line_num,
            "round_to must be greater than or equal to 0",
        ));
    }

    // Exact halves go to the even neighbour.
    let factor = 10f64.powf(round_to);
    Ok(Expr::number((number * factor).round_ties_even() / factor, line_num))
}

/// Replaces `$0`, `$1`, ... in the format string with the remaining
/// arguments. Strings are inserted without quotes.
fn format(args: Vec<Expr>, line_num: usize) -> RuntimeResult<Expr> {
    let (format_string, rest) = match args.split_first() {
        Some(split) => split,
        None => {
            return Err(RuntimeError::new(
                line_num,
                "incorrect number of arguments. Excepted at least 1 argument, but got 0.",
            ))
        }
    };

    let mut formatted = match &format_string.expr {
        ExprType::String(s) => s.clone(),
        _ => {
            return Err(RuntimeError::new(
                line_num,
                format!("expected String, got {}", format_string.type_name()),
            ))
        }
    };

    for (i, arg) in rest.iter().enumerate() {
        let replacement = match &arg.expr {
            ExprType::String(s) => s.clone(),
            _ => arg.to_string(),
        };
        formatted = formatted.replace(&format!("${}", i), &replacement);
    }

    Ok(Expr::string(formatted, format_string.line_num))
}

fn expect_number(value: &Expr, name: &str, line_num: usize) -> RuntimeResult<f64> {
    match value.expr {
        ExprType::Number(n) => Ok(n),
        _ => Err(RuntimeError::new(
            line_num,
            format!("expected Number for {}, got {}", name, value.type_name()),
        )),
    }
}

fn expect_whole(value: f64, name: &str, line_num: usize) -> RuntimeResult<()> {
    if is_whole_number(value) {
        Ok(())
    } else {
        Err(RuntimeError::new(
            line_num,
            format!("{} must be a whole number", name),
        ))
    }
}

fn expect_ordered(start: f64, end: f64, line_num: usize) -> RuntimeResult<()> {
    if end < start {
        let (start, end) = (Expr::number(start, line_num), Expr::number(end, line_num));
        return Err(RuntimeError::new(
            line_num,
            format!("end ({}) must be greater than start ({})", end, start),
        ));
    }
    Ok(())
}

fn incorrect_arg_count(expected: &str, got: usize, line_num: usize) -> RuntimeError {
    RuntimeError::new(
        line_num,
        format!(
            "incorrect number of arguments. Excepts {} arguments, but got {}",
            expected, got
        ),
    )
}

fn expected_one_argument(args: &[Expr], line_num: usize) -> RuntimeError {
    RuntimeError::new(
        line_num,
        format!("expected 1 argument, got {}", args.len()),
    )
}

fn unsupported_type(value: &Expr, builtin: &str, line_num: usize) -> RuntimeError {
    RuntimeError::new(
        line_num,
        format!(
            "unsupported type {} for built-in function {}",
            value.type_name(),
            builtin
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{parse_source, Vocabulary};
    use crate::interpreter::Environment;
    use ::more_asserts::*;
    use std::io::{self, Cursor};

    fn run_with_input(source: &str, input: &str) -> (Vec<String>, String) {
        let input = Box::new(Cursor::new(input.as_bytes().to_vec()));
        let mut interpreter = Interpreter::with_io(Environment::new(), vec![], input);
        let stmts = parse_source(source, &Vocabulary::default()).unwrap();
        let results = interpreter
            .eval_statements(&stmts)
            .iter()
            .map(|e| e.to_string())
            .collect();
        let output = String::from_utf8(interpreter.into_output()).unwrap();
        (results, output)
    }

    fn eval(source: &str) -> String {
        let (mut results, _) = run_with_input(source, "");
        results.pop().unwrap()
    }

    fn eval_number(source: &str) -> f64 {
        eval(source).parse().unwrap()
    }

    #[test]
    fn test_print() {
        let (results, output) = run_with_input("print <- (1, \"a\", (true,));", "");
        assert_eq!(results, vec!["1, \"a\", (true)"]);
        assert_eq!(output, "1, \"a\", (true)\n");

        let (results, output) = run_with_input("print <- ();", "");
        assert_eq!(results, vec![""]);
        assert_eq!(output, "\n");
    }

    #[test]
    fn test_print_returns_output() {
        let mut interpreter =
            Interpreter::with_io(Environment::new(), vec![], Box::new(io::empty()));
        let stmts = parse_source("print <- (1, true);", &Vocabulary::default()).unwrap();
        let results = interpreter.eval_statements(&stmts);

        assert_eq!(
            results,
            vec![Expr::new(ExprType::Output("1, true".to_owned()), 1)]
        );
    }

    #[test]
    fn test_input() {
        let (results, output) = run_with_input("name = input <- (\"name? \",);", "Ada\nrest\n");
        assert_eq!(results, vec!["\"Ada\""]);
        assert_eq!(output, "name? ");

        assert_eq!(
            eval("input <- (1,);"),
            "Error at line 1: unsupported type Number for built-in function input"
        );
        assert_eq!(eval("input <- ();"), "Error at line 1: expected 1 argument, got 0");
    }

    #[test]
    fn test_randint() {
        for _ in 0..20 {
            let value = eval_number("randint <- (3, 5);");
            assert_ge!(value, 3.0);
            assert_le!(value, 5.0);
        }
        assert_eq!(eval_number("randint <- (0,);"), 0.0);
        assert_eq!(
            eval("randint <- (5, 3);"),
            "Error at line 1: end (3) must be greater than start (5)"
        );
        assert_eq!(
            eval("randint <- (1.5, 3);"),
            "Error at line 1: start must be a whole number"
        );
        assert_eq!(
            eval("randint <- ();"),
            "Error at line 1: incorrect number of arguments. Excepts 1 or 2 arguments, but got 0"
        );
    }

    #[test]
    fn test_randfloat() {
        for _ in 0..20 {
            let value = eval_number("randfloat <- ();");
            assert_ge!(value, 0.0);
            assert_lt!(value, 1.0);

            let value = eval_number("randfloat <- (2.5, 3);");
            assert_ge!(value, 2.5);
            assert_le!(value, 3.0);
        }
        assert_eq!(
            eval("randfloat <- (\"a\",);"),
            "Error at line 1: expected Number for end, got String"
        );
    }

    #[test]
    fn test_len() {
        assert_eq!(eval("len <- (\"héllo\",);"), "5");
        assert_eq!(eval("len <- ((1, 2, 3),);"), "3");
        assert_eq!(
            eval("len <- (1,);"),
            "Error at line 1: unsupported type Number for built-in function len"
        );
        assert_eq!(eval("len <- (1, 2);"), "Error at line 1: expected 1 argument, got 2");
    }

    #[test]
    fn test_range() {
        assert_eq!(eval("range <- (0,);"), "()");
        assert_eq!(eval("range <- (1,);"), "(0)");
        assert_eq!(eval("range <- (1, 3);"), "(1, 2)");
        assert_eq!(eval("range <- (5, 0, -2);"), "(5, 3, 1)");
        assert_eq!(eval("range <- (0, 1, 0.25);"), "(0, 0.25, 0.5, 0.75)");
        assert_eq!(
            eval("range <- (1, 2, -1);"),
            "Error at line 1: step value must be positive if start value is less than end value"
        );
        assert_eq!(
            eval("range <- (2, 1, 1);"),
            "Error at line 1: step value must be negative if start value is greater than end value"
        );
        assert_eq!(eval("range <- (1, 2, 0);"), "Error at line 1: step cannot be 0");
        assert_eq!(
            eval("range <- (1, \"2\");"),
            "Error at line 1: expected Number for end, got String"
        );
    }

    #[test]
    fn test_round() {
        assert_eq!(eval("round <- (3.14159, 2);"), "3.14");
        assert_eq!(eval("round <- (3.14159, 0);"), "3");
        assert_eq!(eval("round <- (2.5, 0);"), "2");
        assert_eq!(eval("round <- (3.5, 0);"), "4");
        assert_eq!(eval("round <- (-2.5, 0);"), "-2");
        assert_eq!(eval("round <- (0.125, 2);"), "0.12");
        assert_eq!(eval("round <- (0.375, 2);"), "0.38");
        assert_eq!(
            eval("round <- (1, -1);"),
            "Error at line 1: round_to must be greater than or equal to 0"
        );
        assert_eq!(eval("round <- (1, 0.5);"), "Error at line 1: round_to must be a whole number");
        assert_eq!(
            eval("round <- (1,);"),
            "Error at line 1: incorrect number of arguments. Excepts 2 arguments, but got 1"
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(
            eval("format <- (\"$0 + $1 = $2\", 1, 2, \"three\");"),
            "\"1 + 2 = three\""
        );
        assert_eq!(eval("format <- (\"none\",);"), "\"none\"");
        assert_eq!(
            eval("format <- ();"),
            "Error at line 1: incorrect number of arguments. Excepted at least 1 argument, but got 0."
        );
        assert_eq!(eval("format <- (1,);"), "Error at line 1: expected String, got Number");
    }
}
