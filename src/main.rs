use boomerang::frontend::{parse_source, Vocabulary};
use boomerang::{Expr, ExprType, Interpreter};

use clap::Parser;
use std::io::{self, Write};
use std::{fs, process};

#[derive(Parser, Debug)]
#[clap(name = "boomerang", version, about = "Runs a Boomerang script, or starts a REPL")]
struct Args {
    /// Script to run. Starts a REPL when omitted.
    file: Option<String>,

    /// Print the value of every statement after running the script.
    #[clap(long)]
    show_results: bool,
}

fn main() {
    let args = Args::parse();

    match args.file {
        Some(file) => run_file(&file, args.show_results),
        None => run_prompt(),
    }
}

fn run_prompt() {
    let mut interpreter = Interpreter::new();

    loop {
        print!(">> ");
        if let Err(e) = io::stdout().flush() {
            eprintln!("could not write prompt: {}", e);
            process::exit(74);
        }

        let line = match interpreter.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("could not read line: {}", e);
                process::exit(74);
            }
        };

        if line.trim() == "exit" {
            break;
        }

        // Errors and printed lines were already written by the interpreter.
        if let Some(value) = run(&mut interpreter, &line).last() {
            if !is_written(value) {
                println!("{}", value);
            }
        }
    }
}

fn run_file(filename: &str, show_results: bool) {
    let contents = match fs::read_to_string(filename) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("could not read {}: {}", filename, e);
            process::exit(66);
        }
    };

    let mut interpreter = Interpreter::new();
    let results = run(&mut interpreter, &contents);

    if show_results {
        for value in results.iter().filter(|value| !is_written(value)) {
            println!("{}", value);
        }
    }

    if results.last().map_or(false, is_error) {
        process::exit(70);
    }
}

fn run<W: Write>(interpreter: &mut Interpreter<W>, source: &str) -> Vec<Expr> {
    let stmts = match parse_source(source, &Vocabulary::default()) {
        Ok(stmts) => stmts,
        Err(error) => return vec![interpreter.report_error(&error)],
    };

    #[cfg(feature = "print-ast")]
    for stmt in stmts.iter() {
        eprintln!("{}", stmt.ast_string());
    }

    interpreter.eval_statements(&stmts)
}

fn is_error(value: &Expr) -> bool {
    matches!(value.expr, ExprType::Error(_))
}

/// `Output` and `Error` values reach stdout as they are produced.
fn is_written(value: &Expr) -> bool {
    is_error(value) || matches!(value.expr, ExprType::Output(_))
}
