//! Conversion failures

use keycalc_core::CalcError;
use thiserror::Error;

/// Why a conversion could not be produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Input matched none of the request patterns
    #[error("no conversion pattern matched: {0:?}")]
    NoPattern(String),

    /// Bare unit pair given without a value to carry over
    #[error("no value given and no previous value to convert")]
    MissingCarriedValue,

    /// Carried-over value is not a finite number
    #[error("previous value is not a number: {0:?}")]
    InvalidCarriedValue(String),

    /// Both units normalized, but no edge joins them
    #[error("conversion from {from} to {to} is not supported")]
    Unsupported { from: String, to: String },
}

impl ConversionError {
    /// True for every failure that happens before unit lookup
    pub fn is_parse_failure(&self) -> bool {
        !matches!(self, ConversionError::Unsupported { .. })
    }
}

impl From<ConversionError> for CalcError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::Unsupported { from, to } => CalcError::unsupported_conversion(&from, &to),
            other => CalcError::parse_failure(other.to_string()),
        }
    }
}
