//! Keypad state machine

use std::fmt;
use std::str::FromStr;
use keycalc_core::{format_number, parse_number, CalcError};
use keycalc_expr::{apply, BinOp};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use crate::{HistoryEntry, HistorySink, Key};

/// Display text shown after a failed operation
pub const ERROR_DISPLAY: &str = "Error";

/// Basic mode has the four functions; scientific adds `^`.
///
/// Parsed case-insensitively, both from text and when deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Mode {
    #[default]
    Basic,
    Scientific,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown calculator mode '{0}', expected 'basic' or 'scientific'")]
pub struct UnknownMode(pub String);

impl From<UnknownMode> for CalcError {
    fn from(err: UnknownMode) -> Self {
        CalcError::config_error(err.to_string())
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Mode::Basic),
            "scientific" => Ok(Mode::Scientific),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = UnknownMode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Basic => f.write_str("basic"),
            Mode::Scientific => f.write_str("scientific"),
        }
    }
}

/// One calculator session.
///
/// Completed calculations are written to a [`HistorySink`] passed in on
/// each key press; the calculator never owns the history.
#[derive(Debug, Clone)]
pub struct Calculator {
    mode: Mode,
    display: String,
    operator: Option<BinOp>,
    previous: String,
    // Next digit starts a new operand
    fresh: bool,
}

impl Calculator {
    pub fn new(mode: Mode) -> Self {
        Calculator {
            mode,
            display: "0".to_string(),
            operator: None,
            previous: String::new(),
            fresh: true,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Main display line
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Secondary line: left operand and pending operator, e.g. "5 + "
    pub fn equation(&self) -> String {
        match self.operator {
            Some(op) => format!("{} {} ", self.previous, op),
            None => String::new(),
        }
    }

    pub fn press(&mut self, key: Key, history: &mut dyn HistorySink) {
        match key {
            Key::Digit(d) => self.input_digit(d),
            Key::Point => self.input_point(),
            Key::Op(op) => self.input_operator(op),
            Key::Equals => self.equals(history),
            Key::Clear => self.clear(),
            Key::ToggleSign => self.map_display(|n| -n),
            Key::Percent => self.map_display(|n| n / 100.0),
        }
    }

    fn input_digit(&mut self, digit: u8) {
        let Some(digit) = char::from_digit(u32::from(digit), 10) else {
            debug!(digit, "digit key out of range ignored");
            return;
        };
        if self.fresh {
            self.display = digit.to_string();
            self.fresh = false;
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
    }

    fn input_point(&mut self) {
        if self.fresh {
            self.display = "0.".to_string();
            self.fresh = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    fn input_operator(&mut self, op: BinOp) {
        if op == BinOp::Pow && self.mode == Mode::Basic {
            debug!("power key ignored in basic mode");
            return;
        }

        match self.operator {
            Some(pending) if !self.fresh => {
                let result = self.calculate(pending);
                self.display = result.clone();
                self.previous = result;
            }
            _ => self.previous = self.display.clone(),
        }
        self.operator = Some(op);
        self.fresh = true;
    }

    fn equals(&mut self, history: &mut dyn HistorySink) {
        let Some(op) = self.operator else { return };
        if self.fresh {
            return;
        }

        let result = self.calculate(op);
        if result != ERROR_DISPLAY {
            let expression = format!("{} {} {}", self.previous, op, self.display);
            history.add_to_history(HistoryEntry::new(expression, result.clone()));
        }

        self.display = result;
        self.previous.clear();
        self.operator = None;
        self.fresh = true;
    }

    fn clear(&mut self) {
        self.display = "0".to_string();
        self.previous.clear();
        self.operator = None;
        self.fresh = true;
    }

    fn map_display(&mut self, f: impl Fn(f64) -> f64) {
        self.display = match parse_number(&self.display) {
            Ok(n) => format_number(f(n)),
            Err(_) => ERROR_DISPLAY.to_string(),
        };
    }

    fn calculate(&self, op: BinOp) -> String {
        let (Ok(l), Ok(r)) = (parse_number(&self.previous), parse_number(&self.display)) else {
            debug!(previous = %self.previous, display = %self.display, "unparseable operand");
            return ERROR_DISPLAY.to_string();
        };
        match apply(op, l, r) {
            Ok(n) => format_number(n),
            Err(e) => {
                debug!(error = %e, "calculation failed");
                ERROR_DISPLAY.to_string()
            }
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}
