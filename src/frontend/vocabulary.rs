use super::token::TokenType;

use std::collections::HashMap;

/// How a literal is matched by the lexer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenCategory {
    /// Punctuation, matched by longest prefix.
    Symbol,
    /// Reserved word, matched against a whole identifier.
    Keyword,
}

/// Table of every fixed literal the lexer recognizes.
///
/// A lexer borrows one of these at construction, so hosts can extend or
/// replace the surface syntax without touching global state.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: HashMap<String, (TokenCategory, TokenType)>,
}

const SYMBOLS: &[(&str, TokenType)] = &[
    (";", TokenType::Semicolon),
    (":", TokenType::Colon),
    (",", TokenType::Comma),
    ("(", TokenType::OpenParen),
    (")", TokenType::ClosedParen),
    ("=", TokenType::Assign),
    ("+", TokenType::Plus),
    ("-", TokenType::Minus),
    ("*", TokenType::Multiply),
    ("/", TokenType::Divide),
    ("%", TokenType::Mod),
    ("**", TokenType::Pack),
    ("<-", TokenType::Send),
    ("@", TokenType::Index),
    ("==", TokenType::Eq),
    ("!=", TokenType::Ne),
    (">", TokenType::Gt),
    (">=", TokenType::Ge),
    ("<", TokenType::Lt),
    ("<=", TokenType::Le),
    ("!", TokenType::Bang),
    ("++", TokenType::Inc),
    ("--", TokenType::Dec),
];

const KEYWORDS: &[(&str, TokenType)] = &[
    ("true", TokenType::Boolean),
    ("false", TokenType::Boolean),
    ("func", TokenType::Function),
    ("when", TokenType::When),
    ("is", TokenType::Is),
    ("else", TokenType::Else),
    ("for", TokenType::For),
    ("in", TokenType::In),
    ("if", TokenType::If),
    ("and", TokenType::And),
    ("or", TokenType::Or),
    ("xor", TokenType::Xor),
    ("not", TokenType::Not),
];

impl Vocabulary {
    /// A vocabulary with no entries; every word lexes as an identifier.
    pub fn empty() -> Self {
        Vocabulary {
            entries: HashMap::new(),
        }
    }

    /// Adds or replaces a literal.
    pub fn insert<S: Into<String>>(
        &mut self,
        literal: S,
        category: TokenCategory,
        token_type: TokenType,
    ) {
        self.entries.insert(literal.into(), (category, token_type));
    }

    pub fn keyword(&self, word: &str) -> Option<TokenType> {
        match self.entries.get(word) {
            Some((TokenCategory::Keyword, token_type)) => Some(*token_type),
            _ => None,
        }
    }

    /// Longest symbol literal that `source` starts with.
    pub fn longest_symbol(&self, source: &str) -> Option<(&str, TokenType)> {
        self.entries
            .iter()
            .filter(|(literal, (category, _))| {
                *category == TokenCategory::Symbol && source.starts_with(literal.as_str())
            })
            .max_by_key(|(literal, _)| literal.len())
            .map(|(literal, (_, token_type))| (literal.as_str(), *token_type))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        let mut vocabulary = Vocabulary::empty();
        for (literal, token_type) in SYMBOLS.iter() {
            vocabulary.insert(*literal, TokenCategory::Symbol, *token_type);
        }
        for (literal, token_type) in KEYWORDS.iter() {
            vocabulary.insert(*literal, TokenCategory::Keyword, *token_type);
        }
        vocabulary
    }
}
