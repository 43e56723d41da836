mod builtins;
mod environment;
mod interpreter;
mod operations;

pub use environment::Environment;
pub use interpreter::Interpreter;
