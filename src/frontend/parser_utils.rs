use super::grammar::{InfixOperator, PostfixOperator};
use super::token::TokenType;

/// An operator that can follow a complete left operand.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParserOperator {
    Infix(InfixOperator),
    Postfix(PostfixOperator),
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Precedence {
    // Lowest precedence
    Lowest,
    Boolean,
    Compare,
    Index,
    Send,
    Sum,
    Product,
    Power,
    Prefix,
    Postfix, // Highest precedence
}

impl ParserOperator {
    pub fn from_token(token_type: TokenType) -> Option<ParserOperator> {
        if let Some(op) = Self::try_postfix(token_type) {
            return Some(ParserOperator::Postfix(op));
        }

        let op = match token_type {
            TokenType::And => InfixOperator::And,
            TokenType::Or => InfixOperator::Or,
            TokenType::Xor => InfixOperator::Xor,
            TokenType::In => InfixOperator::In,
            TokenType::Eq => InfixOperator::EqualTo,
            TokenType::Ne => InfixOperator::NotEqualTo,
            TokenType::Gt => InfixOperator::GreaterThan,
            TokenType::Ge => InfixOperator::GreaterEq,
            TokenType::Lt => InfixOperator::LessThan,
            TokenType::Le => InfixOperator::LessEq,
            TokenType::Index => InfixOperator::Index,
            TokenType::Send => InfixOperator::Send,
            TokenType::Plus => InfixOperator::Add,
            TokenType::Minus => InfixOperator::Subtract,
            TokenType::Multiply => InfixOperator::Multiply,
            TokenType::Divide => InfixOperator::Divide,
            TokenType::Mod => InfixOperator::Modulo,
            TokenType::Pack => InfixOperator::Power,
            _ => return None,
        };
        Some(ParserOperator::Infix(op))
    }

    fn try_postfix(token_type: TokenType) -> Option<PostfixOperator> {
        let op = match token_type {
            TokenType::Bang => PostfixOperator::Factorial,
            TokenType::Inc => PostfixOperator::Increment,
            TokenType::Dec => PostfixOperator::Decrement,
            _ => return None,
        };
        Some(op)
    }

    /// Operators bind left to right, so an operator only extends the current
    /// expression when it binds strictly tighter than the caller's level.
    pub fn is_higher_precedence(&self, min_precedence: Precedence) -> bool {
        self.precedence() > min_precedence
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            ParserOperator::Postfix(_) => Precedence::Postfix,
            ParserOperator::Infix(op) => match op {
                InfixOperator::And | InfixOperator::Or | InfixOperator::Xor | InfixOperator::In => {
                    Precedence::Boolean
                }
                InfixOperator::EqualTo
                | InfixOperator::NotEqualTo
                | InfixOperator::GreaterThan
                | InfixOperator::GreaterEq
                | InfixOperator::LessThan
                | InfixOperator::LessEq => Precedence::Compare,
                InfixOperator::Index => Precedence::Index,
                InfixOperator::Send => Precedence::Send,
                InfixOperator::Add | InfixOperator::Subtract => Precedence::Sum,
                InfixOperator::Multiply | InfixOperator::Divide | InfixOperator::Modulo => {
                    Precedence::Product
                }
                InfixOperator::Power => Precedence::Power,
            },
        }
    }
}
