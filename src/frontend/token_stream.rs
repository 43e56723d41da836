use super::lexer::{Lexer, LexerIterator};
use super::token::Token;
use crate::errors::{RuntimeError, RuntimeResult};

/// Buffers the lexer so the parser can look one token ahead.
pub struct TokenStream<'a> {
    tokens: LexerIterator<'a>,
    current: Token,
    next: Option<Token>,
}

impl<'a> TokenStream<'a> {
    pub fn new(lexer: Lexer<'a>) -> RuntimeResult<Self> {
        let mut tokens = lexer.iter();
        let current = match tokens.next() {
            Some(token) => token?,
            None => return Err(RuntimeError::unexpected_eof(1)),
        };
        let next = tokens.next().transpose()?;

        Ok(TokenStream {
            tokens,
            current,
            next,
        })
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    pub fn peek(&self) -> RuntimeResult<&Token> {
        self.next
            .as_ref()
            .ok_or_else(|| RuntimeError::unexpected_eof(self.current.line_num))
    }

    /// Moves to the next token and returns the one that was current. Once
    /// `current` is EOF there is nothing left to move to.
    pub fn advance(&mut self) -> RuntimeResult<Token> {
        let next = match self.next.take() {
            Some(token) => token,
            None => return Err(RuntimeError::unexpected_eof(self.current.line_num)),
        };
        self.next = self.tokens.next().transpose()?;

        Ok(std::mem::replace(&mut self.current, next))
    }
}
