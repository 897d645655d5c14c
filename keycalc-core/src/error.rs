//! Structured errors for callers
//!
//! Errors never crash the engine. Every failure path ends up as a value
//! with a machine-readable code and a human-readable message.

use crate::NumberError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_FAILURE: &str = "PARSE_FAILURE";
    pub const UNSUPPORTED_CONVERSION: &str = "UNSUPPORTED_CONVERSION";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const INVALID_OPERAND: &str = "INVALID_OPERAND";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const BACKEND_FAILURE: &str = "BACKEND_FAILURE";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Operation failed, nothing was produced
    Error,
    /// The engine cannot start (bad configuration)
    Fatal,
}

/// Context about where an error occurred
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Raw input that caused the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Structured error returned at the engine boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Where the error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    /// Severity level
    pub severity: Severity,
}

impl CalcError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: record the raw input
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.input = Some(input.into());
        self
    }

    /// Builder: add propagation note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.notes.push(note.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_code(&self, code: &str) -> bool {
        self.code == code
    }

    // ========== Common Error Constructors ==========

    pub fn parse_failure(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_FAILURE, format!("Invalid conversion: {}", details.into()))
            .with_suggestion("Try a format like \"100 km to miles\"")
    }

    pub fn unsupported_conversion(from: &str, to: &str) -> Self {
        Self::new(
            codes::UNSUPPORTED_CONVERSION,
            format!("Conversion from {} to {} is not supported", from, to),
        )
        .with_suggestion("Use list_units to see the supported unit pairs")
    }

    pub fn div_zero() -> Self {
        Self::new(codes::DIV_ZERO, "Division by zero")
            .with_suggestion("Ensure divisor is not zero")
    }

    pub fn invalid_operand(operand: &str) -> Self {
        Self::new(codes::INVALID_OPERAND, format!("Invalid operand: {}", operand))
    }

    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::new(codes::DOMAIN_ERROR, format!("Domain error: {}", details.into()))
    }

    pub fn backend_failure(details: impl Into<String>) -> Self {
        Self::new(codes::BACKEND_FAILURE, format!("Backend failure: {}", details.into()))
    }

    pub fn config_error(details: impl Into<String>) -> Self {
        Self::new(codes::CONFIG_ERROR, format!("Configuration error: {}", details.into()))
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for CalcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for CalcError {}

impl From<NumberError> for CalcError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::ParseError(s) => Self::invalid_operand(&s),
            NumberError::NonFinite(s) => Self::domain_error(format!("non-finite number {}", s)),
        }
    }
}
