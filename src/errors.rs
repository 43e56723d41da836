/// The single failure kind shared by the lexer, parser and evaluator.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
#[error("Error at line {line_num}: {description}")]
pub struct RuntimeError {
    pub line_num: usize,
    pub description: String,
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

impl RuntimeError {
    pub fn new<S: Into<String>>(line_num: usize, description: S) -> Self {
        RuntimeError {
            line_num,
            description: description.into(),
        }
    }

    pub fn divide_by_zero(line_num: usize) -> Self {
        Self::new(line_num, "cannot divide by zero")
    }

    pub fn unexpected_eof(line_num: usize) -> Self {
        Self::new(line_num, "Unexpected end of file")
    }
}
