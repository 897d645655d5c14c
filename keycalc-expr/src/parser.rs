//! Tokenizer and recursive descent parser

use crate::ast::{BinOp, Expr, UnaryOp};
use crate::ExprError;

/// Most tokens accepted in one expression. Bounds the tree height, so
/// evaluating and dropping a parsed tree cannot exhaust the stack.
pub const MAX_TOKENS: usize = 1024;

/// Most nested parentheses or exponents
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenKind {
    Number(f64),
    Op(BinOp),
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy)]
struct Token {
    kind: TokenKind,
    ch: char,
    pos: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if tokens.len() == MAX_TOKENS {
            return Err(ExprError::TooLong { max: MAX_TOKENS });
        }

        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
                // A second point starts a new token ("1.2.3" is trailing input)
                if chars[i - 1] == '.' && chars[start..i - 1].contains(&'.') {
                    i -= 1;
                    break;
                }
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token {
                kind: TokenKind::Number(parse_literal(&text)?),
                ch: c,
                pos: start,
            });
            continue;
        }

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            _ => match BinOp::from_symbol(c) {
                Some(op) => TokenKind::Op(op),
                None => return Err(ExprError::UnexpectedChar { ch: c, pos: i }),
            },
        };
        tokens.push(Token { kind, ch: c, pos: i });
        i += 1;
    }

    Ok(tokens)
}

/// digits ['.' digits] | '.' digits
fn parse_literal(text: &str) -> Result<f64, ExprError> {
    let (int, frac) = match text.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (text, None),
    };
    let valid = match frac {
        Some(frac) => !frac.is_empty(),
        None => !int.is_empty(),
    };
    if !valid {
        return Err(ExprError::InvalidNumber(text.to_string()));
    }
    text.parse::<f64>().map_err(|_| ExprError::InvalidNumber(text.to_string()))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_op(&self, ops: &[BinOp]) -> Option<BinOp> {
        match self.peek()?.kind {
            TokenKind::Op(op) if ops.contains(&op) => Some(op),
            _ => None,
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ExprError> {
        self.parse_additive()
    }

    /// Parse `f` one nesting level deeper
    fn nested(
        &mut self,
        pos: usize,
        f: impl FnOnce(&mut Self) -> Result<Expr, ExprError>,
    ) -> Result<Expr, ExprError> {
        if self.depth == MAX_DEPTH {
            return Err(ExprError::TooDeep { pos });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn parse_additive(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.peek_op(&[BinOp::Add, BinOp::Sub]) {
            self.pos += 1;
            let right = self.parse_multiplicative()?;
            left = Expr::BinaryOp(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek_op(&[BinOp::Mul, BinOp::Div]) {
            self.pos += 1;
            let right = self.parse_unary()?;
            left = Expr::BinaryOp(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    // Runs of signs fold into at most one negation: "--1" is 1
    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        let mut negate = false;
        while let Some(op) = self.peek_op(&[BinOp::Add, BinOp::Sub]) {
            self.pos += 1;
            if op == BinOp::Sub {
                negate = !negate;
            }
        }

        let operand = self.parse_power()?;
        if negate {
            Ok(Expr::UnaryOp(UnaryOp::Neg, Box::new(operand)))
        } else {
            Ok(operand)
        }
    }

    // Exponent goes back through unary, so 2^-1 and 2^3^2 (right assoc) work
    fn parse_power(&mut self) -> Result<Expr, ExprError> {
        let base = self.parse_primary()?;
        if let Some(token) = self.peek().filter(|t| t.kind == TokenKind::Op(BinOp::Pow)) {
            self.pos += 1;
            let exponent = self.nested(token.pos, Self::parse_unary)?;
            return Ok(Expr::BinaryOp(Box::new(base), BinOp::Pow, Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let token = self.next().ok_or(ExprError::UnexpectedEnd)?;
        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::LParen => {
                let inner = self.nested(token.pos, Self::parse_expr)?;
                match self.next() {
                    Some(Token { kind: TokenKind::RParen, .. }) => Ok(inner),
                    Some(other) => Err(ExprError::UnexpectedChar { ch: other.ch, pos: other.pos }),
                    None => Err(ExprError::UnbalancedParen { pos: token.pos }),
                }
            }
            TokenKind::RParen => Err(ExprError::UnbalancedParen { pos: token.pos }),
            TokenKind::Op(_) => Err(ExprError::UnexpectedChar { ch: token.ch, pos: token.pos }),
        }
    }
}

/// Parse an arithmetic expression
pub fn parse_expr(input: &str) -> Result<Expr, ExprError> {
    if input.trim().is_empty() {
        return Err(ExprError::Empty);
    }

    let mut parser = Parser {
        tokens: tokenize(input)?,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_expr()?;

    match parser.peek() {
        None => Ok(expr),
        Some(Token { kind: TokenKind::RParen, pos, .. }) => Err(ExprError::UnbalancedParen { pos }),
        Some(token) => Err(ExprError::TrailingInput { pos: token.pos }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_expr("42"), Ok(Expr::Number(42.0)));
        assert_eq!(parse_expr(" .5 "), Ok(Expr::Number(0.5)));
    }

    #[test]
    fn test_precedence() {
        // 2 + (3 * 4)
        let expected = Expr::BinaryOp(
            num(2.0),
            BinOp::Add,
            Box::new(Expr::BinaryOp(num(3.0), BinOp::Mul, num(4.0))),
        );
        assert_eq!(parse_expr("2 + 3 * 4"), Ok(expected));
    }

    #[test]
    fn test_left_associative_subtraction() {
        // (10 - 4) - 3
        let expected = Expr::BinaryOp(
            Box::new(Expr::BinaryOp(num(10.0), BinOp::Sub, num(4.0))),
            BinOp::Sub,
            num(3.0),
        );
        assert_eq!(parse_expr("10 - 4 - 3"), Ok(expected));
    }

    #[test]
    fn test_power_binds_tighter_than_negation() {
        let expected = Expr::UnaryOp(
            UnaryOp::Neg,
            Box::new(Expr::BinaryOp(num(2.0), BinOp::Pow, num(2.0))),
        );
        assert_eq!(parse_expr("-2^2"), Ok(expected));
    }

    #[test]
    fn test_keypad_symbols() {
        assert_eq!(
            parse_expr("6 × 7"),
            Ok(Expr::BinaryOp(num(6.0), BinOp::Mul, num(7.0)))
        );
        assert_eq!(
            parse_expr("8÷2"),
            Ok(Expr::BinaryOp(num(8.0), BinOp::Div, num(2.0)))
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_expr(""), Err(ExprError::Empty));
        assert_eq!(parse_expr("   "), Err(ExprError::Empty));
        assert_eq!(parse_expr("2 +"), Err(ExprError::UnexpectedEnd));
        assert_eq!(parse_expr("2 $ 3"), Err(ExprError::UnexpectedChar { ch: '$', pos: 2 }));
        assert_eq!(parse_expr("2 * * 3"), Err(ExprError::UnexpectedChar { ch: '*', pos: 4 }));
        assert_eq!(parse_expr("(1 + 2"), Err(ExprError::UnbalancedParen { pos: 0 }));
        assert_eq!(parse_expr("1 + 2)"), Err(ExprError::UnbalancedParen { pos: 5 }));
        assert_eq!(parse_expr(")"), Err(ExprError::UnbalancedParen { pos: 0 }));
        assert_eq!(parse_expr("1 2"), Err(ExprError::TrailingInput { pos: 2 }));
        assert_eq!(parse_expr("1.2.3"), Err(ExprError::TrailingInput { pos: 3 }));
        assert_eq!(parse_expr("5."), Err(ExprError::InvalidNumber("5.".to_string())));
        assert_eq!(parse_expr("."), Err(ExprError::InvalidNumber(".".to_string())));
    }

    #[test]
    fn test_sign_runs_fold() {
        assert_eq!(parse_expr("--3"), Ok(Expr::Number(3.0)));
        assert_eq!(parse_expr("-+-+-3"), Ok(Expr::UnaryOp(UnaryOp::Neg, num(3.0))));
        assert_eq!(
            parse_expr("2 - -3"),
            Ok(Expr::BinaryOp(num(2.0), BinOp::Sub, Box::new(Expr::UnaryOp(UnaryOp::Neg, num(3.0)))))
        );
    }

    #[test]
    fn test_nesting_limit() {
        let fits = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(parse_expr(&fits), Ok(Expr::Number(1.0)));

        let too_deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(parse_expr(&too_deep), Err(ExprError::TooDeep { pos: MAX_DEPTH }));

        let tower = vec!["2"; MAX_DEPTH + 2].join("^");
        assert!(matches!(parse_expr(&tower), Err(ExprError::TooDeep { .. })));
    }

    #[test]
    fn test_huge_input_is_rejected_not_fatal() {
        let signs = format!("{}1", "-".repeat(200_000));
        assert_eq!(parse_expr(&signs), Err(ExprError::TooLong { max: MAX_TOKENS }));

        let parens = "(".repeat(100_000);
        assert_eq!(parse_expr(&parens), Err(ExprError::TooLong { max: MAX_TOKENS }));

        let sum = vec!["1"; 100_000].join("+");
        assert_eq!(parse_expr(&sum), Err(ExprError::TooLong { max: MAX_TOKENS }));
    }

    #[test]
    fn test_long_chain_within_limit() {
        // 512 numbers and 511 operators
        let sum = vec!["1"; 512].join("+");
        assert!(parse_expr(&sum).is_ok());
    }
}
