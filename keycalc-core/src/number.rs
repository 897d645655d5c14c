//! Number parsing and display
//!
//! All arithmetic in keycalc is plain `f64`. These helpers give the display
//! layer one consistent textual form: shortest round-trip digits, and
//! fixed-point rounding that rounds halves away from zero.

use thiserror::Error;

/// Numbers at or beyond this magnitude are shown in exponent form
const EXPONENT_UPPER: f64 = 1e21;
/// Non-zero numbers below this magnitude are shown in exponent form
const EXPONENT_LOWER: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Non-finite number: {0}")]
    NonFinite(String),
}

/// Parse display text as a finite number.
///
/// Leading and trailing whitespace is ignored. Text that parses to NaN or
/// an infinity (`"NaN"`, `"inf"`) is rejected.
pub fn parse_number(s: &str) -> Result<f64, NumberError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(NumberError::ParseError(s.to_string()));
    }
    let n: f64 = trimmed
        .parse()
        .map_err(|_| NumberError::ParseError(trimmed.to_string()))?;
    if !n.is_finite() {
        return Err(NumberError::NonFinite(trimmed.to_string()));
    }
    Ok(n)
}

/// Render a number in its shortest round-trip form.
///
/// Whole numbers print without a fractional part (`8`, not `8.0`), negative
/// zero prints as `0`, and very large or very small magnitudes switch to
/// exponent form (`1e+21`, `1e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() };
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if magnitude >= EXPONENT_UPPER || magnitude < EXPONENT_LOWER {
        let s = format!("{:e}", n);
        // Rust omits the sign on positive exponents
        return match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => s,
        };
    }

    format!("{}", n)
}

/// Round to `places` fractional digits, halves away from zero.
pub fn round_half_away(n: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let scaled = (n * factor).round() / factor;
    if !scaled.is_finite() {
        return n;
    }
    // Avoid printing "-0.00"
    if scaled == 0.0 {
        0.0
    } else {
        scaled
    }
}

/// Fixed-point rendering with exactly `places` fractional digits.
pub fn to_fixed(n: f64, places: u32) -> String {
    if !n.is_finite() {
        return format_number(n);
    }
    format!("{:.*}", places as usize, round_half_away(n, places))
}
