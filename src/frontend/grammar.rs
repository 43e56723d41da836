use crate::interpreter::Environment;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrefixOperator {
    Negate,
    Absolute,
    Not,
    Pack,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PostfixOperator {
    Factorial,
    Increment,
    Decrement,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InfixOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Send,
    Index,
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterEq,
    LessThan,
    LessEq,
    And,
    Or,
    Xor,
    In,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BuiltinFunction {
    Print,
    Input,
    RandomInt,
    RandomFloat,
    Length,
    Range,
    Round,
    Format,
}

/// Lists are shared: every binding of a list sees in-place appends.
pub type ListRef = Rc<RefCell<Vec<Expr>>>;

#[derive(Debug, Clone)]
pub struct Expr {
    pub expr: ExprType,
    pub line_num: usize,
}

/// Syntax tree nodes and runtime values share one type. Evaluating a node
/// produces another node, usually one of the literal variants.
#[derive(Debug, PartialEq, Clone)]
pub enum ExprType {
    Number(f64),
    String(String),
    Boolean(bool),
    List(ListRef),
    Identifier(String),
    Function(Rc<FuncInfo>),
    /// A function value: the literal plus the scope it was evaluated in.
    Closure(Rc<FuncInfo>, Environment),
    FunctionCall(Box<Expr>, ListRef),
    Builtin(BuiltinFunction),
    /// Optional switch, then `(condition, result)` cases ending with `else`.
    When(Option<Box<Expr>>, Vec<(Expr, Expr)>),
    ForLoop(String, Box<Expr>, Box<Expr>, Box<Expr>),
    Prefix(PrefixOperator, Box<Expr>),
    Postfix(PostfixOperator, Box<Expr>),
    Infix(InfixOperator, Box<Expr>, Box<Expr>),
    Assignment(String, Box<Expr>),
    Output(String),
    Error(String),
}

#[derive(Debug, PartialEq, Clone)]
pub struct FuncInfo {
    pub params: Vec<String>,
    pub body: Expr,
}

impl PrefixOperator {
    pub fn symbol(&self) -> &str {
        match self {
            PrefixOperator::Negate => "-",
            PrefixOperator::Absolute => "+",
            PrefixOperator::Not => "not",
            PrefixOperator::Pack => "**",
        }
    }

    /// How the operation is named in type errors.
    pub fn description(&self) -> &str {
        match self {
            PrefixOperator::Negate => "negation",
            PrefixOperator::Absolute => "absolute value",
            PrefixOperator::Not => "NOT",
            PrefixOperator::Pack => "PACK",
        }
    }
}

impl PostfixOperator {
    pub fn symbol(&self) -> &str {
        match self {
            PostfixOperator::Factorial => "!",
            PostfixOperator::Increment => "++",
            PostfixOperator::Decrement => "--",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            PostfixOperator::Factorial => "factorial",
            PostfixOperator::Increment => "increment",
            PostfixOperator::Decrement => "decrement",
        }
    }
}

impl InfixOperator {
    pub fn symbol(&self) -> &str {
        match self {
            InfixOperator::Add => "+",
            InfixOperator::Subtract => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Modulo => "%",
            InfixOperator::Power => "**",
            InfixOperator::Send => "<-",
            InfixOperator::Index => "@",
            InfixOperator::EqualTo => "==",
            InfixOperator::NotEqualTo => "!=",
            InfixOperator::GreaterThan => ">",
            InfixOperator::GreaterEq => ">=",
            InfixOperator::LessThan => "<",
            InfixOperator::LessEq => "<=",
            InfixOperator::And => "and",
            InfixOperator::Or => "or",
            InfixOperator::Xor => "xor",
            InfixOperator::In => "in",
        }
    }

    /// Token name of the operator, as used in type errors.
    pub fn token_name(&self) -> &str {
        match self {
            InfixOperator::Add => "PLUS",
            InfixOperator::Subtract => "MINUS",
            InfixOperator::Multiply => "MULTIPLY",
            InfixOperator::Divide => "DIVIDE",
            InfixOperator::Modulo => "MOD",
            InfixOperator::Power => "PACK",
            InfixOperator::Send => "SEND",
            InfixOperator::Index => "INDEX",
            InfixOperator::EqualTo => "EQ",
            InfixOperator::NotEqualTo => "NE",
            InfixOperator::GreaterThan => "GT",
            InfixOperator::GreaterEq => "GE",
            InfixOperator::LessThan => "LT",
            InfixOperator::LessEq => "LE",
            InfixOperator::And => "AND",
            InfixOperator::Or => "OR",
            InfixOperator::Xor => "XOR",
            InfixOperator::In => "IN",
        }
    }
}

impl BuiltinFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name {
            "print" => BuiltinFunction::Print,
            "input" => BuiltinFunction::Input,
            "randint" => BuiltinFunction::RandomInt,
            "randfloat" => BuiltinFunction::RandomFloat,
            "len" => BuiltinFunction::Length,
            "range" => BuiltinFunction::Range,
            "round" => BuiltinFunction::Round,
            "format" => BuiltinFunction::Format,
            _ => return None,
        };
        Some(builtin)
    }

    /// Name the builtin is referenced by in source code.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinFunction::Print => "print",
            BuiltinFunction::Input => "input",
            BuiltinFunction::RandomInt => "randint",
            BuiltinFunction::RandomFloat => "randfloat",
            BuiltinFunction::Length => "len",
            BuiltinFunction::Range => "range",
            BuiltinFunction::Round => "round",
            BuiltinFunction::Format => "format",
        }
    }

    /// Type name of the builtin, as reported in type errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            BuiltinFunction::Print => "Print",
            BuiltinFunction::Input => "Input",
            BuiltinFunction::RandomInt => "RandomInt",
            BuiltinFunction::RandomFloat => "RandomFloat",
            BuiltinFunction::Length => "Length",
            BuiltinFunction::Range => "Range",
            BuiltinFunction::Round => "Round",
            BuiltinFunction::Format => "Format",
        }
    }
}

impl PartialEq for Expr {
    // Values compare by content; where they were written does not matter.
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

impl Expr {
    pub fn new(expr: ExprType, line_num: usize) -> Self {
        Expr { expr, line_num }
    }

    pub fn number(value: f64, line_num: usize) -> Self {
        Self::new(ExprType::Number(value), line_num)
    }

    pub fn string<S: Into<String>>(value: S, line_num: usize) -> Self {
        Self::new(ExprType::String(value.into()), line_num)
    }

    pub fn boolean(value: bool, line_num: usize) -> Self {
        Self::new(ExprType::Boolean(value), line_num)
    }

    pub fn list(values: Vec<Expr>, line_num: usize) -> Self {
        Self::new(ExprType::List(Rc::new(RefCell::new(values))), line_num)
    }

    pub fn type_name(&self) -> &'static str {
        match &self.expr {
            ExprType::Number(_) => "Number",
            ExprType::String(_) => "String",
            ExprType::Boolean(_) => "Boolean",
            ExprType::List(_) => "List",
            ExprType::Identifier(_) => "Identifier",
            ExprType::Function(_) | ExprType::Closure(..) => "Function",
            ExprType::FunctionCall(..) => "FunctionCall",
            ExprType::Builtin(builtin) => builtin.type_name(),
            ExprType::When(..) => "When",
            ExprType::ForLoop(..) => "ForLoop",
            ExprType::Prefix(..) => "PrefixExpression",
            ExprType::Postfix(..) => "PostfixExpression",
            ExprType::Infix(..) => "InfixExpression",
            ExprType::Assignment(..) => "Assignment",
            ExprType::Output(_) => "Output",
            ExprType::Error(_) => "Error",
        }
    }

    /// Copies the value, giving every nested list its own storage.
    pub fn deep_copy(&self) -> Expr {
        let expr = match &self.expr {
            ExprType::List(values) => {
                let values = values.borrow().iter().map(Expr::deep_copy).collect();
                ExprType::List(Rc::new(RefCell::new(values)))
            }
            other => other.clone(),
        };
        Expr::new(expr, self.line_num)
    }

    pub fn ast_string(&self) -> String {
        match &self.expr {
            ExprType::Number(_)
            | ExprType::String(_)
            | ExprType::Boolean(_)
            | ExprType::Identifier(_) => self.to_string(),
            ExprType::List(values) => {
                let exprs: Vec<_> = values.borrow().iter().map(|e| e.ast_string()).collect();
                format!("(list {})", exprs.join(" "))
            }
            ExprType::Function(func) | ExprType::Closure(func, _) => format!(
                "(func ({}) {})",
                func.params.join(" "),
                func.body.ast_string()
            ),
            ExprType::FunctionCall(callee, args) => {
                let exprs: Vec<_> = args.borrow().iter().map(|e| e.ast_string()).collect();
                format!("(call {} {})", callee.ast_string(), exprs.join(" "))
            }
            ExprType::Builtin(builtin) => builtin.name().to_owned(),
            ExprType::When(switch, cases) => {
                let mut parts: Vec<_> = switch.iter().map(|s| s.ast_string()).collect();
                parts.extend(cases.iter().map(|(cond, result)| {
                    format!("({} {})", cond.ast_string(), result.ast_string())
                }));
                format!("(when {})", parts.join(" "))
            }
            ExprType::ForLoop(ident, values, cond, body) => format!(
                "(for {} {} {} {})",
                ident,
                values.ast_string(),
                cond.ast_string(),
                body.ast_string()
            ),
            ExprType::Prefix(op, expr) => format!("({} {})", op.symbol(), expr.ast_string()),
            ExprType::Postfix(op, expr) => format!("({} {})", op.symbol(), expr.ast_string()),
            ExprType::Infix(op, lhs, rhs) => format!(
                "({} {} {})",
                op.symbol(),
                lhs.ast_string(),
                rhs.ast_string()
            ),
            ExprType::Assignment(name, expr) => format!("(set {} {})", name, expr.ast_string()),
            ExprType::Output(text) => format!("(output \"{}\")", text),
            ExprType::Error(message) => format!("(error \"{}\")", message),
        }
    }
}

pub fn is_whole_number(value: f64) -> bool {
    value % 1.0 == 0.0
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Also covers negative zero.
        "0".to_owned()
    } else if is_whole_number(value) {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.expr {
            ExprType::Number(n) => write!(f, "{}", format_number(*n)),
            ExprType::String(s) => write!(f, "\"{}\"", s),
            ExprType::Boolean(b) => write!(f, "{}", b),
            ExprType::List(values) => {
                let values: Vec<_> = values.borrow().iter().map(|v| v.to_string()).collect();
                write!(f, "({})", values.join(", "))
            }
            ExprType::Identifier(name) => write!(f, "{}", name),
            ExprType::Function(func) | ExprType::Closure(func, _) => {
                write!(f, "<function {:p}>", Rc::as_ptr(func))
            }
            ExprType::Builtin(builtin) => write!(f, "<built-in function {}>", builtin.name()),
            ExprType::Output(text) => write!(f, "{}", text),
            ExprType::Error(message) => write!(f, "{}", message),
            _ => write!(f, "{}", self.ast_string()),
        }
    }
}
