use crate::errors::{RuntimeError, RuntimeResult};
use crate::frontend::grammar::{
    is_whole_number, Expr, ExprType, InfixOperator, ListRef, PostfixOperator, PrefixOperator,
};

use std::cell::RefCell;
use std::rc::Rc;

impl Expr {
    /// Applies a binary operator to two evaluated operands. The result, and
    /// any error, carries the left operand's line.
    pub fn apply_infix_op(op: InfixOperator, lhs: Expr, rhs: Expr) -> RuntimeResult<Expr> {
        let line_num = lhs.line_num;

        let result = match op {
            InfixOperator::Add => match (&lhs.expr, &rhs.expr) {
                (ExprType::Number(a), ExprType::Number(b)) => ExprType::Number(a + b),
                (ExprType::String(a), ExprType::String(b)) => {
                    ExprType::String(format!("{}{}", a, b))
                }
                (ExprType::List(a), ExprType::List(b)) => {
                    let mut values = a.borrow().clone();
                    values.extend(b.borrow().iter().cloned());
                    new_list(values)
                }
                _ => return Err(invalid_types(op, &lhs, &rhs)),
            },
            InfixOperator::Subtract => match (&lhs.expr, &rhs.expr) {
                (ExprType::Number(a), ExprType::Number(b)) => ExprType::Number(a - b),
                (ExprType::List(a), ExprType::List(b)) => {
                    let to_remove = b.borrow();
                    let values = a
                        .borrow()
                        .iter()
                        .filter(|value| !to_remove.contains(*value))
                        .cloned()
                        .collect();
                    new_list(values)
                }
                _ => return Err(invalid_types(op, &lhs, &rhs)),
            },
            InfixOperator::Multiply => {
                numerical_binop(op, &lhs, &rhs, |a, b| ExprType::Number(a * b))?
            }
            InfixOperator::Divide => match (&lhs.expr, &rhs.expr) {
                (ExprType::Number(_), ExprType::Number(b)) if *b == 0.0 => {
                    return Err(RuntimeError::divide_by_zero(line_num))
                }
                (ExprType::Number(a), ExprType::Number(b)) => ExprType::Number(a / b),
                _ => return Err(invalid_types(op, &lhs, &rhs)),
            },
            InfixOperator::Modulo => match (&lhs.expr, &rhs.expr) {
                (ExprType::Number(_), ExprType::Number(b)) if *b == 0.0 => {
                    return Err(RuntimeError::divide_by_zero(line_num))
                }
                (ExprType::Number(a), ExprType::Number(b)) => ExprType::Number(floored_mod(*a, *b)),
                _ => return Err(invalid_types(op, &lhs, &rhs)),
            },
            InfixOperator::Power => match (&lhs.expr, &rhs.expr) {
                (ExprType::Number(a), ExprType::Number(b)) if *a == 0.0 && *b < 0.0 => {
                    return Err(RuntimeError::divide_by_zero(line_num))
                }
                (ExprType::Number(a), ExprType::Number(b)) => ExprType::Number(a.powf(*b)),
                _ => return Err(invalid_types(op, &lhs, &rhs)),
            },
            InfixOperator::EqualTo => ExprType::Boolean(lhs == rhs),
            InfixOperator::NotEqualTo => ExprType::Boolean(lhs != rhs),
            InfixOperator::GreaterThan => {
                numerical_binop(op, &lhs, &rhs, |a, b| ExprType::Boolean(a > b))?
            }
            InfixOperator::GreaterEq => {
                numerical_binop(op, &lhs, &rhs, |a, b| ExprType::Boolean(a >= b))?
            }
            InfixOperator::LessThan => {
                numerical_binop(op, &lhs, &rhs, |a, b| ExprType::Boolean(a < b))?
            }
            InfixOperator::LessEq => {
                numerical_binop(op, &lhs, &rhs, |a, b| ExprType::Boolean(a <= b))?
            }
            InfixOperator::And => boolean_binop(op, &lhs, &rhs, |a, b| a && b)?,
            InfixOperator::Or => boolean_binop(op, &lhs, &rhs, |a, b| a || b)?,
            InfixOperator::Xor => boolean_binop(op, &lhs, &rhs, |a, b| a != b)?,
            InfixOperator::In => match &rhs.expr {
                ExprType::List(values) => ExprType::Boolean(values.borrow().contains(&lhs)),
                _ => return Err(invalid_types(op, &lhs, &rhs)),
            },
            InfixOperator::Index => match (&lhs.expr, &rhs.expr) {
                (ExprType::List(values), ExprType::Number(index)) => {
                    return index_list(values, *index, &rhs, line_num)
                }
                _ => return Err(invalid_types(op, &lhs, &rhs)),
            },
            InfixOperator::Send => match (&lhs.expr, &rhs.expr) {
                // Appends in place, so every alias of the list sees the new element.
                (ExprType::List(values), _) => {
                    values.borrow_mut().push(rhs.clone());
                    return Ok(lhs.clone());
                }
                (ExprType::Closure(..) | ExprType::Builtin(_), ExprType::List(args)) => {
                    ExprType::FunctionCall(Box::new(lhs.clone()), args.clone())
                }
                _ => return Err(invalid_types(op, &lhs, &rhs)),
            },
        };

        Ok(Expr::new(result, line_num))
    }

    pub fn apply_prefix_op(op: PrefixOperator, value: Expr) -> RuntimeResult<Expr> {
        let result = match (op, &value.expr) {
            (PrefixOperator::Negate, ExprType::Number(n)) => ExprType::Number(-n),
            (PrefixOperator::Negate, ExprType::List(values)) => {
                new_list(values.borrow().iter().rev().cloned().collect())
            }
            (PrefixOperator::Absolute, ExprType::Number(n)) => ExprType::Number(n.abs()),
            (PrefixOperator::Not, ExprType::Boolean(b)) => ExprType::Boolean(!b),
            (PrefixOperator::Pack, ExprType::List(values)) => {
                let inner = Expr::list(values.borrow().clone(), value.line_num);
                new_list(vec![inner])
            }
            _ => return Err(invalid_type(op.description(), &value)),
        };

        Ok(Expr::new(result, value.line_num))
    }

    pub fn apply_postfix_op(op: PostfixOperator, value: Expr) -> RuntimeResult<Expr> {
        let n = match value.expr {
            ExprType::Number(n) => n,
            _ => return Err(invalid_type(op.description(), &value)),
        };

        let result = match op {
            PostfixOperator::Factorial => factorial(n, value.line_num)?,
            PostfixOperator::Increment => n + 1.0,
            PostfixOperator::Decrement => n - 1.0,
        };

        Ok(Expr::number(result, value.line_num))
    }
}

fn new_list(values: Vec<Expr>) -> ExprType {
    ExprType::List(Rc::new(RefCell::new(values)))
}

fn invalid_types(op: InfixOperator, lhs: &Expr, rhs: &Expr) -> RuntimeError {
    RuntimeError::new(
        lhs.line_num,
        format!(
            "invalid types {} and {} for {}",
            lhs.type_name(),
            rhs.type_name(),
            op.token_name()
        ),
    )
}

fn invalid_type(description: &str, value: &Expr) -> RuntimeError {
    RuntimeError::new(
        value.line_num,
        format!("invalid type {} for {}", value.type_name(), description),
    )
}

fn numerical_binop<F>(op: InfixOperator, lhs: &Expr, rhs: &Expr, func: F) -> RuntimeResult<ExprType>
where
    F: Fn(f64, f64) -> ExprType,
{
    match (&lhs.expr, &rhs.expr) {
        (ExprType::Number(a), ExprType::Number(b)) => Ok(func(*a, *b)),
        _ => Err(invalid_types(op, lhs, rhs)),
    }
}

fn boolean_binop<F>(op: InfixOperator, lhs: &Expr, rhs: &Expr, func: F) -> RuntimeResult<ExprType>
where
    F: Fn(bool, bool) -> bool,
{
    match (&lhs.expr, &rhs.expr) {
        (ExprType::Boolean(a), ExprType::Boolean(b)) => Ok(ExprType::Boolean(func(*a, *b))),
        _ => Err(invalid_types(op, lhs, rhs)),
    }
}

/// Remainder that takes the sign of the divisor.
fn floored_mod(a: f64, b: f64) -> f64 {
    let remainder = a % b;
    if remainder != 0.0 && (remainder < 0.0) != (b < 0.0) {
        remainder + b
    } else {
        remainder
    }
}

/// `0! == 1! == 1`, and a negative `n` is offset by one: `-n! == (n + 1)!`.
fn factorial(n: f64, line_num: usize) -> RuntimeResult<f64> {
    if !is_whole_number(n) {
        return Err(RuntimeError::new(
            line_num,
            "expression for factorial must be whole number",
        ));
    }

    let end = if n < 0.0 { n.abs() + 1.0 } else { n };

    let mut product: f64 = 1.0;
    let mut i = 2.0;
    while i <= end && product.is_finite() {
        product *= i;
        i += 1.0;
    }
    Ok(product)
}

fn index_list(values: &ListRef, index: f64, rhs: &Expr, line_num: usize) -> RuntimeResult<Expr> {
    if !is_whole_number(index) {
        return Err(RuntimeError::new(line_num, "list index must be a whole number"));
    }

    let values = values.borrow();
    let len = values.len() as f64;
    if index < -len || index >= len {
        return Err(RuntimeError::new(
            line_num,
            format!("list index {} is out of range", rhs),
        ));
    }

    let position = if index < 0.0 { len + index } else { index };
    Ok(values[position as usize].clone())
}
