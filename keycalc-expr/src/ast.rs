//! Abstract Syntax Tree

use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Number(f64),
    BinaryOp(Box<Expr>, BinOp, Box<Expr>),
    UnaryOp(UnaryOp, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp { Add, Sub, Mul, Div, Pow }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp { Neg }

impl BinOp {
    /// Operator for an input symbol, including the keypad's × and ÷
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinOp::Add),
            '-' => Some(BinOp::Sub),
            '*' | '×' => Some(BinOp::Mul),
            '/' | '÷' => Some(BinOp::Div),
            '^' => Some(BinOp::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
            BinOp::Pow => '^',
        }
    }

    /// Symbol as printed on the keypad and in history
    pub fn display_symbol(self) -> char {
        match self {
            BinOp::Mul => '×',
            BinOp::Div => '÷',
            other => other.symbol(),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_symbol())
    }
}
