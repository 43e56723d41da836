use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenType {
    // Symbols.
    Semicolon,
    Colon,
    Comma,
    OpenParen,
    ClosedParen,
    Assign,
    Plus,
    Minus,
    Multiply,
    Divide,
    Mod,
    Pack,
    Send,
    Index,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Bang,
    Inc,
    Dec,

    // Keywords.
    Boolean,
    Function,
    When,
    Is,
    Else,
    For,
    In,
    If,
    And,
    Or,
    Xor,
    Not,

    // Data.
    Number,
    String,
    Identifier,
    Eof,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub line_num: usize,
    pub value: String,
    pub token_type: TokenType,
}

impl TokenType {
    /// Name used when a token type appears in an error message.
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Semicolon => "SEMICOLON",
            TokenType::Colon => "COLON",
            TokenType::Comma => "COMMA",
            TokenType::OpenParen => "OPEN_PAREN",
            TokenType::ClosedParen => "CLOSED_PAREN",
            TokenType::Assign => "ASSIGN",
            TokenType::Plus => "PLUS",
            TokenType::Minus => "MINUS",
            TokenType::Multiply => "MULTIPLY",
            TokenType::Divide => "DIVIDE",
            TokenType::Mod => "MOD",
            TokenType::Pack => "PACK",
            TokenType::Send => "SEND",
            TokenType::Index => "INDEX",
            TokenType::Eq => "EQ",
            TokenType::Ne => "NE",
            TokenType::Gt => "GT",
            TokenType::Ge => "GE",
            TokenType::Lt => "LT",
            TokenType::Le => "LE",
            TokenType::Bang => "BANG",
            TokenType::Inc => "INC",
            TokenType::Dec => "DEC",
            TokenType::Boolean => "BOOLEAN",
            TokenType::Function => "FUNCTION",
            TokenType::When => "WHEN",
            TokenType::Is => "IS",
            TokenType::Else => "ELSE",
            TokenType::For => "FOR",
            TokenType::In => "IN",
            TokenType::If => "IF",
            TokenType::And => "AND",
            TokenType::Or => "OR",
            TokenType::Xor => "XOR",
            TokenType::Not => "NOT",
            TokenType::Number => "NUMBER",
            TokenType::String => "STRING",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Token {
    pub fn new<S: Into<String>>(line_num: usize, value: S, token_type: TokenType) -> Self {
        Token {
            line_num,
            value: value.into(),
            token_type,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ('{}')", self.token_type, self.value)
    }
}
