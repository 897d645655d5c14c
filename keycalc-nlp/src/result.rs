//! Helper output

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NlpKind {
    Calculation,
    Conversion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionUnits {
    pub from: String,
    pub to: String,
}

/// What the helper made of a sentence.
///
/// Conversions carry the number as `expression` and leave `result` empty;
/// the caller runs them through the unit converter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NlpResult {
    #[serde(rename = "type")]
    pub kind: NlpKind,
    pub expression: String,
    pub result: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    #[serde(rename = "conversionUnits", skip_serializing_if = "Option::is_none", default)]
    pub conversion_units: Option<ConversionUnits>,
}

impl NlpResult {
    pub fn calculation(expression: impl Into<String>, result: f64) -> Self {
        NlpResult {
            kind: NlpKind::Calculation,
            expression: expression.into(),
            result: Some(result),
            error: None,
            conversion_units: None,
        }
    }

    pub fn conversion(value: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        NlpResult {
            kind: NlpKind::Conversion,
            expression: value.into(),
            result: None,
            error: None,
            conversion_units: Some(ConversionUnits {
                from: from.into(),
                to: to.into(),
            }),
        }
    }

    pub fn failed(expression: impl Into<String>, error: impl Into<String>) -> Self {
        NlpResult {
            kind: NlpKind::Calculation,
            expression: expression.into(),
            result: None,
            error: Some(error.into()),
            conversion_units: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Text the unit converter understands, e.g. "5 meters to feet"
    pub fn conversion_request(&self) -> Option<String> {
        let units = self.conversion_units.as_ref()?;
        Some(format!("{} {} to {}", self.expression, units.from, units.to))
    }
}
