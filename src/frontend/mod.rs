pub mod cursor;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod parser_utils;
pub mod token;
pub mod token_stream;
pub mod vocabulary;

pub use lexer::Lexer;
pub use parser::{parse_source, Parser};
pub use vocabulary::{TokenCategory, Vocabulary};
