//! Keypad keys

use std::fmt;
use std::str::FromStr;
use keycalc_core::{codes, CalcError};
use keycalc_expr::BinOp;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Point,
    Op(BinOp),
    Equals,
    Clear,
    ToggleSign,
    Percent,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key '{0}'")]
pub struct UnknownKey(pub String);

impl From<UnknownKey> for CalcError {
    fn from(err: UnknownKey) -> Self {
        CalcError::new(codes::PARSE_FAILURE, err.to_string())
            .with_suggestion("Keys are 0-9 . + - × ÷ ^ = C ± %")
    }
}

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let label = label.trim();
        let key = match label {
            "." => Key::Point,
            "=" => Key::Equals,
            "C" | "c" => Key::Clear,
            "±" | "+/-" => Key::ToggleSign,
            "%" => Key::Percent,
            _ => {
                let mut chars = label.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() => Key::Digit(c as u8 - b'0'),
                    (Some(c), None) => match BinOp::from_symbol(c) {
                        Some(op) => Key::Op(op),
                        None => return Err(UnknownKey(label.to_string())),
                    },
                    _ => return Err(UnknownKey(label.to_string())),
                }
            }
        };
        Ok(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Digit(d) => write!(f, "{}", d),
            Key::Point => f.write_str("."),
            Key::Op(op) => write!(f, "{}", op),
            Key::Equals => f.write_str("="),
            Key::Clear => f.write_str("C"),
            Key::ToggleSign => f.write_str("±"),
            Key::Percent => f.write_str("%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!("7".parse::<Key>(), Ok(Key::Digit(7)));
        assert_eq!("×".parse::<Key>(), Ok(Key::Op(BinOp::Mul)));
        assert_eq!("*".parse::<Key>(), Ok(Key::Op(BinOp::Mul)));
        assert_eq!("÷".parse::<Key>(), Ok(Key::Op(BinOp::Div)));
        assert_eq!("^".parse::<Key>(), Ok(Key::Op(BinOp::Pow)));
        assert_eq!("-".parse::<Key>(), Ok(Key::Op(BinOp::Sub)));
        assert_eq!("=".parse::<Key>(), Ok(Key::Equals));
        assert_eq!("C".parse::<Key>(), Ok(Key::Clear));
        assert_eq!("±".parse::<Key>(), Ok(Key::ToggleSign));
        assert_eq!("%".parse::<Key>(), Ok(Key::Percent));
        assert_eq!(".".parse::<Key>(), Ok(Key::Point));
    }

    #[test]
    fn test_unknown_labels() {
        assert_eq!("12".parse::<Key>(), Err(UnknownKey("12".to_string())));
        assert!("sin".parse::<Key>().is_err());
        assert!("".parse::<Key>().is_err());
    }

    #[test]
    fn test_display_round_trips_label() {
        for label in ["0", "9", ".", "+", "×", "÷", "^", "=", "C", "±", "%"] {
            let key: Key = label.parse().unwrap();
            assert_eq!(key.to_string(), label);
        }
    }
}
