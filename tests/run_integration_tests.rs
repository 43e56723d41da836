use boomerang::{evaluate, Environment, ExprType};

use regex::Regex;
use test_generator::test_resources;

#[derive(Debug, PartialEq)]
struct Output {
    output: Vec<String>,
    runtime_error: Option<String>,
}

#[test_resources("tests/boomerang_test_cases/**/*.bng")]
fn test_evaluator(file: &str) {
    let source = std::fs::read_to_string(file).unwrap();

    let expected_output = get_expected_output(&source);
    let output = run_on_source(&source);

    assert_eq!(expected_output, output);
}

fn run_on_source(source: &str) -> Output {
    let env = Environment::new();
    let (results, mut output) = evaluate(source, &env);

    let runtime_error = match results.last().map(|r| &r.expr) {
        Some(ExprType::Error(message)) => {
            // The message is also the last line of the output log.
            assert_eq!(output.pop().as_ref(), Some(message));
            Some(message.clone())
        }
        _ => None,
    };

    Output {
        output,
        runtime_error,
    }
}

fn get_expected_output(source: &str) -> Output {
    let output_regexer = Regex::new(r"# expect: (.*)$").unwrap();
    let error_regexer = Regex::new(r"# expect error: (.*)$").unwrap();

    let mut result = Output {
        output: vec![],
        runtime_error: None,
    };

    for line in source.lines() {
        if let Some(r) = output_regexer.captures(line) {
            result.output.push(r.get(1).unwrap().as_str().to_owned());
        }
        if let Some(r) = error_regexer.captures(line) {
            result
                .runtime_error
                .replace(r.get(1).unwrap().as_str().to_owned());
        }
    }

    result
}
