//! Evaluator

use crate::ast::{BinOp, Expr, UnaryOp};
use crate::parser::parse_expr;
use crate::ExprError;

/// Apply a binary operator with calculator semantics.
///
/// Division by exactly zero is an error, and so is any result that is not
/// finite (overflow, or a negative base raised to a fractional power).
pub fn apply(op: BinOp, l: f64, r: f64) -> Result<f64, ExprError> {
    let result = match op {
        BinOp::Add => l + r,
        BinOp::Sub => l - r,
        BinOp::Mul => l * r,
        BinOp::Div => {
            if r == 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            l / r
        }
        BinOp::Pow => l.powf(r),
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(ExprError::NonFinite)
    }
}

/// Evaluate a parsed expression
pub fn eval(expr: &Expr) -> Result<f64, ExprError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::UnaryOp(UnaryOp::Neg, inner) => Ok(-eval(inner)?),
        Expr::BinaryOp(left, op, right) => {
            let l = eval(left)?;
            let r = eval(right)?;
            apply(*op, l, r)
        }
    }
}

/// Parse and evaluate `text`
pub fn evaluate(text: &str) -> Result<f64, ExprError> {
    eval(&parse_expr(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        assert_eq!(apply(BinOp::Add, 5.0, 3.0), Ok(8.0));
        assert_eq!(apply(BinOp::Sub, 5.0, 3.0), Ok(2.0));
        assert_eq!(apply(BinOp::Mul, 6.0, 7.0), Ok(42.0));
        assert_eq!(apply(BinOp::Div, 9.0, 3.0), Ok(3.0));
        assert_eq!(apply(BinOp::Pow, 2.0, 10.0), Ok(1024.0));
    }

    #[test]
    fn test_apply_division_by_zero() {
        assert_eq!(apply(BinOp::Div, 5.0, 0.0), Err(ExprError::DivisionByZero));
        assert_eq!(apply(BinOp::Div, 0.0, -0.0), Err(ExprError::DivisionByZero));
    }

    #[test]
    fn test_apply_non_finite() {
        assert_eq!(apply(BinOp::Pow, -8.0, 0.5), Err(ExprError::NonFinite));
        assert_eq!(apply(BinOp::Mul, f64::MAX, 2.0), Err(ExprError::NonFinite));
    }

    #[test]
    fn test_evaluate_precedence() {
        assert_eq!(evaluate("2 + 3 * 4"), Ok(14.0));
        assert_eq!(evaluate("(2 + 3) * 4"), Ok(20.0));
        assert_eq!(evaluate("10 - 4 - 3"), Ok(3.0));
        assert_eq!(evaluate("12 / 3 / 2"), Ok(2.0));
    }

    #[test]
    fn test_evaluate_power() {
        assert_eq!(evaluate("2^3^2"), Ok(512.0));
        assert_eq!(evaluate("-2^2"), Ok(-4.0));
        assert_eq!(evaluate("2^-1"), Ok(0.5));
        assert_eq!(evaluate("(-2)^2"), Ok(4.0));
    }

    #[test]
    fn test_evaluate_unary() {
        assert_eq!(evaluate("--3"), Ok(3.0));
        assert_eq!(evaluate("+5 - -5"), Ok(10.0));
        assert_eq!(evaluate(".5 + .5"), Ok(1.0));
    }

    #[test]
    fn test_evaluate_keypad_symbols() {
        assert_eq!(evaluate("6 × 7"), Ok(42.0));
        assert_eq!(evaluate("8 ÷ 2"), Ok(4.0));
    }

    #[test]
    fn test_evaluate_errors() {
        assert_eq!(evaluate("5 / 0"), Err(ExprError::DivisionByZero));
        assert_eq!(evaluate("5 / (2 - 2)"), Err(ExprError::DivisionByZero));
        assert_eq!(evaluate("(-8)^0.5"), Err(ExprError::NonFinite));
        assert_eq!(evaluate("10^400"), Err(ExprError::NonFinite));
        assert_eq!(evaluate(""), Err(ExprError::Empty));
    }
}
