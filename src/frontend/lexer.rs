use super::cursor::Cursor;
use super::token::{Token, TokenType};
use super::vocabulary::Vocabulary;
use crate::errors::{RuntimeError, RuntimeResult};

const COMMENT_CHAR: char = '#';
const STRING_DELIMITER: char = '"';

pub struct Lexer<'a> {
    source: &'a str,
    cursor: Cursor<'a>,
    vocabulary: &'a Vocabulary,
    seen_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer from source.
    pub fn new(source: &'a str, vocabulary: &'a Vocabulary) -> Self {
        Lexer {
            source,
            cursor: Cursor::new(source),
            vocabulary,
            seen_eof: false,
        }
    }

    /// Returns the next token. A single EOF token is produced at the end of the
    /// source, after which the lexer is exhausted.
    pub fn next_token(&mut self) -> Option<RuntimeResult<Token>> {
        if self.seen_eof {
            return None;
        }

        self.skip_whitespace_and_comments();

        let line_num = self.cursor.line_num();
        let (byte_idx, ch) = match self.cursor.take() {
            Some(t) => t,
            None => {
                self.seen_eof = true;
                return Some(Ok(Token::new(line_num, "", TokenType::Eof)));
            }
        };

        let token = match ch {
            STRING_DELIMITER => self.lex_string(byte_idx, line_num),
            _ if is_number_char(ch) => self.lex_number(byte_idx, line_num),
            _ if is_identifier_start(ch) => Ok(self.lex_identifier_or_kw(byte_idx, line_num)),
            _ => self.lex_symbol(byte_idx, ch, line_num),
        };

        Some(token)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.cursor.take_while(char::is_whitespace);
            if !self.cursor.take_if(COMMENT_CHAR) {
                break;
            }
            self.cursor.take_until(|ch| ch == '\n');
        }
    }

    /// Scans a string up to the closing delimiter. There are no escapes.
    fn lex_string(&mut self, start_idx: usize, line_num: usize) -> RuntimeResult<Token> {
        // Move past the opening quote.
        let start_idx = start_idx + STRING_DELIMITER.len_utf8();

        self.cursor.take_until(|ch| ch == STRING_DELIMITER);

        match self.cursor.take() {
            Some((end_idx, _)) => Ok(Token::new(
                line_num,
                &self.source[start_idx..end_idx],
                TokenType::String,
            )),
            None => Err(RuntimeError::new(line_num, "unterminated string literal")),
        }
    }

    fn lex_number(&mut self, start_idx: usize, line_num: usize) -> RuntimeResult<Token> {
        self.cursor.take_while(is_number_char);

        let scanned_number = &self.source[start_idx..self.cursor.offset()];
        match scanned_number.parse::<f64>() {
            Ok(_) => Ok(Token::new(line_num, scanned_number, TokenType::Number)),
            Err(_) => Err(RuntimeError::new(
                line_num,
                format!("invalid number literal '{}'", scanned_number),
            )),
        }
    }

    /// Scans up to the end of the word. Checks for keywords.
    fn lex_identifier_or_kw(&mut self, start_idx: usize, line_num: usize) -> Token {
        self.cursor.take_while(is_identifier_char);

        let word = &self.source[start_idx..self.cursor.offset()];
        let token_type = self
            .vocabulary
            .keyword(word)
            .unwrap_or(TokenType::Identifier);

        Token::new(line_num, word, token_type)
    }

    /// Maximal munch over the symbol table.
    fn lex_symbol(&mut self, start_idx: usize, ch: char, line_num: usize) -> RuntimeResult<Token> {
        match self.vocabulary.longest_symbol(&self.source[start_idx..]) {
            Some((literal, token_type)) => {
                // The first character is already consumed.
                self.cursor.skip(literal.chars().count() - 1);
                Ok(Token::new(line_num, literal, token_type))
            }
            None => Err(RuntimeError::new(
                line_num,
                format!("invalid character '{}'", ch),
            )),
        }
    }

    /// Returns an iterator version of lexer.
    pub fn iter(self) -> LexerIterator<'a> {
        LexerIterator { lexer: self }
    }
}

pub struct LexerIterator<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Iterator for LexerIterator<'a> {
    type Item = RuntimeResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lexer.next_token()
    }
}

fn is_number_char(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '.'
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
