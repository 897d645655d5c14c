//! Evaluator errors

use keycalc_core::{codes, CalcError};
use thiserror::Error;

/// Positions are character offsets into the input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unbalanced parenthesis at position {pos}")]
    UnbalancedParen { pos: usize },

    #[error("unexpected input after expression at position {pos}")]
    TrailingInput { pos: usize },

    #[error("expression is longer than {max} tokens")]
    TooLong { max: usize },

    #[error("expression nests too deeply at position {pos}")]
    TooDeep { pos: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NonFinite,
}

impl From<ExprError> for CalcError {
    fn from(err: ExprError) -> Self {
        match err {
            ExprError::DivisionByZero => CalcError::div_zero(),
            ExprError::NonFinite => CalcError::domain_error(err.to_string()),
            ExprError::InvalidNumber(ref s) => CalcError::invalid_operand(s),
            other => CalcError::new(codes::PARSE_FAILURE, format!("Invalid expression: {}", other))
                .with_suggestion("Use numbers, + - * / ^ and parentheses"),
        }
    }
}
