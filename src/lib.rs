pub mod errors;
pub mod frontend;
pub mod interpreter;

pub use errors::{RuntimeError, RuntimeResult};
pub use frontend::grammar::{Expr, ExprType};
pub use frontend::Vocabulary;
pub use interpreter::{Environment, Interpreter};

use std::io;

/// Runs `source` against `env` with the standard vocabulary.
///
/// Returns one result per evaluated statement plus every line written to the
/// output while running. A lexing or parsing failure yields a single `Error`
/// result. Bindings made by the program persist in `env`.
pub fn evaluate(source: &str, env: &Environment) -> (Vec<Expr>, Vec<String>) {
    evaluate_with_vocabulary(source, env, &Vocabulary::default())
}

pub fn evaluate_with_vocabulary(
    source: &str,
    env: &Environment,
    vocabulary: &Vocabulary,
) -> (Vec<Expr>, Vec<String>) {
    // There is no one to answer `input` here, so it always reads an empty line.
    let mut interpreter = Interpreter::with_io(env.clone(), vec![], Box::new(io::empty()));

    let results = match frontend::parse_source(source, vocabulary) {
        Ok(stmts) => interpreter.eval_statements(&stmts),
        Err(error) => vec![interpreter.report_error(&error)],
    };

    let output = String::from_utf8_lossy(&interpreter.into_output())
        .lines()
        .map(str::to_owned)
        .collect();

    (results, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::token::TokenType;
    use crate::frontend::TokenCategory;

    #[test]
    fn test_evaluate_captures_output() {
        let env = Environment::new();
        let (results, output) = evaluate("x = 2;\nprint <- (x, x * 2);", &env);

        assert_eq!(results.len(), 2);
        assert_eq!(results[1].to_string(), "(2, 4)");
        assert_eq!(output, vec!["2, 4"]);
    }

    #[test]
    fn test_print_yields_output_value() {
        let env = Environment::new();
        let (results, output) = evaluate("print <- (1, \"a\");\nprint <- ();", &env);

        assert_eq!(
            results,
            vec![
                Expr::new(ExprType::Output("1, \"a\"".to_owned()), 1),
                Expr::new(ExprType::Output(String::new()), 2),
            ]
        );
        assert_eq!(output, vec!["1, \"a\"", ""]);
    }

    #[test]
    fn test_environment_persists() {
        let env = Environment::new();
        evaluate("x = 41;", &env);
        let (results, _) = evaluate("x + 1;", &env);
        assert_eq!(results, vec![Expr::number(42.0, 1)]);
    }

    #[test]
    fn test_parse_error_is_single_result() {
        let env = Environment::new();
        let (results, output) = evaluate("1 + 2;\n3 +;", &env);

        assert_eq!(
            results,
            vec![Expr::new(
                ExprType::Error(
                    "Error at line 2: invalid prefix operator: SEMICOLON (';')".to_owned()
                ),
                2
            )]
        );
        assert_eq!(
            output,
            vec!["Error at line 2: invalid prefix operator: SEMICOLON (';')"]
        );
    }

    #[test]
    fn test_custom_vocabulary() {
        let mut vocabulary = Vocabulary::default();
        vocabulary.insert("fn", TokenCategory::Keyword, TokenType::Function);

        let env = Environment::new();
        let (results, _) =
            evaluate_with_vocabulary("double = fn x: x * 2; double <- (4,);", &env, &vocabulary);
        assert_eq!(results[1], Expr::number(8.0, 1));
    }
}
