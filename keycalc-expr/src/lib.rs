//! keycalc Expr - Restricted arithmetic evaluator
//!
//! Numbers, `+ - * / ^`, the keypad's `×` and `÷`, unary signs and
//! parentheses. Nothing else is accepted; there are no names, functions
//! or variables.
//!
//! ```text
//! expr           := additive
//! additive       := multiplicative (('+' | '-') multiplicative)*
//! multiplicative := unary (('*' | '/') unary)*
//! unary          := ('-' | '+') unary | power
//! power          := primary ('^' unary)?
//! primary        := number | '(' expr ')'
//! ```
//!
//! Input is capped at [`MAX_TOKENS`] tokens and [`MAX_DEPTH`] nested
//! parentheses or exponents.

mod ast;
mod parser;
mod eval;
mod error;

pub use ast::{Expr, BinOp, UnaryOp};
pub use parser::{parse_expr, MAX_DEPTH, MAX_TOKENS};
pub use eval::{apply, eval, evaluate};
pub use error::ExprError;
