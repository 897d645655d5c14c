//! Conversion request and result types

use std::fmt;
use serde::{Serialize, Deserialize};

/// Value plus raw (not yet normalized) unit tokens, as typed by the user
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub value: f64,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    pub fn new(value: f64, from: impl Into<String>, to: impl Into<String>) -> Self {
        ConversionRequest {
            value,
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionKind {
    Unit,
    Currency,
}

/// A completed conversion. `from` and `to` are canonical names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub value: f64,
    pub from: String,
    pub to: String,
    pub result: f64,
    #[serde(rename = "type")]
    pub kind: ConversionKind,
}

impl ConversionResult {
    pub fn unit(value: f64, from: impl Into<String>, to: impl Into<String>, result: f64) -> Self {
        ConversionResult {
            value,
            from: from.into(),
            to: to.into(),
            result,
            kind: ConversionKind::Unit,
        }
    }

    pub fn currency(value: f64, from: impl Into<String>, to: impl Into<String>, result: f64) -> Self {
        ConversionResult {
            value,
            from: from.into(),
            to: to.into(),
            result,
            kind: ConversionKind::Currency,
        }
    }
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format_conversion_result(self))
    }
}
