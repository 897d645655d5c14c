//! Conversion request parsing - "100 km to miles", "convert c to f"

use std::sync::LazyLock;
use regex::Regex;
use tracing::debug;
use keycalc_core::parse_number;
use crate::{ConversionRequest, ConversionError};

// Unit tokens are letters plus the degree mark. Patterns are unanchored so a
// request can sit inside a sentence ("what is 5 kg in lbs").
static VALUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:convert\s+)?(-?[0-9]+(?:\.[0-9]+)?)\s+([a-z°]+)\s+(?:to|in)\s+([a-z°]+)")
        .expect("value pattern compiles")
});

static FROM_TO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:convert\s+)?(?:from\s+)?([a-z°]+)\s+(?:to|in)\s+([a-z°]+)")
        .expect("from-to pattern compiles")
});

static SIMPLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([a-z°]+)\s+(?:to|in)\s+([a-z°]+)")
        .expect("simple pattern compiles")
});

/// Parse a conversion request.
///
/// Patterns are tried most specific first:
/// 1. explicit number: "100 km to miles", "convert 0 celsius to fahrenheit"
/// 2. unit pair with optional "convert"/"from": "convert from km to miles"
/// 3. bare unit pair: "km in miles"
///
/// The unit-pair forms take their value from `carried_value`, which must
/// be present and a finite number. A typed number always wins over the
/// carried value.
pub fn parse_request(input: &str, carried_value: Option<&str>) -> Result<ConversionRequest, ConversionError> {
    if let Some(caps) = VALUE_PATTERN.captures(input) {
        let value = parse_number(&caps[1])
            .map_err(|_| ConversionError::NoPattern(input.to_string()))?;
        return Ok(ConversionRequest::new(value, &caps[2], &caps[3]));
    }

    let caps = FROM_TO_PATTERN.captures(input)
        .or_else(|| SIMPLE_PATTERN.captures(input))
        .ok_or_else(|| {
            debug!(input, "no conversion pattern matched");
            ConversionError::NoPattern(input.to_string())
        })?;

    let carried = carried_value.ok_or_else(|| {
        debug!(input, "unit pair without a previous value");
        ConversionError::MissingCarriedValue
    })?;

    let value = parse_number(carried)
        .map_err(|_| ConversionError::InvalidCarriedValue(carried.to_string()))?;

    Ok(ConversionRequest::new(value, &caps[1], &caps[2]))
}
