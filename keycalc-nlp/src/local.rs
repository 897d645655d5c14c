//! Local word-substitution parser

use std::sync::LazyLock;
use regex::Regex;
use tracing::debug;
use keycalc_expr::evaluate;
use crate::NlpResult;

pub const NO_EXPRESSION_MESSAGE: &str = "Could not parse the input. Please try a simpler expression.";
pub const EVALUATION_FAILED_MESSAGE: &str =
    "Failed to parse the input. Try a simpler format like \"5 + 3\" or \"convert 5 meters to feet\".";
pub const NO_CONVERSION_MESSAGE: &str =
    "Could not read the conversion. Try a format like \"convert 5 meters to feet\".";

static CONVERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?[0-9]+\.?[0-9]*)\s*([a-z°]+)\s+(?:to|in)\s+([a-z°]+)").expect("conversion pattern compiles")
});

// Longer phrases first so "multiplied by" is not half-replaced
static WORDS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bmultiplied by\b", "*"),
        (r"\bdivided by\b", "/"),
        (r"\bplus\b", "+"),
        (r"\bminus\b", "-"),
        (r"\btimes\b", "*"),
    ]
    .into_iter()
    .map(|(pattern, symbol)| (Regex::new(pattern).expect("word pattern compiles"), symbol))
    .collect()
});

static MATH_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+\.?[0-9]*|[-+*/()]").expect("math token pattern compiles")
});

/// Turn a sentence into a calculation or conversion without any backend.
///
/// "convert 5 meters to feet" becomes a conversion; "what is 5 plus 3"
/// becomes the calculation `5+3`. Everything that is not a number, an
/// operator or a parenthesis is dropped.
pub fn parse_locally(input: &str) -> NlpResult {
    let lower = input.to_lowercase();

    let asks_conversion = lower.contains("convert");
    if asks_conversion || lower.contains(" to ") || lower.contains(" in ") {
        if let Some(caps) = CONVERSION.captures(&lower) {
            return NlpResult::conversion(&caps[1], &caps[2], &caps[3]);
        }
    }
    // Digits left in a conversion request are not arithmetic
    if asks_conversion {
        debug!(input, "conversion request without a recognizable form");
        return NlpResult::failed(input, NO_CONVERSION_MESSAGE);
    }

    let mut text = lower;
    for (pattern, symbol) in WORDS.iter() {
        text = pattern.replace_all(&text, *symbol).into_owned();
    }

    let expression: String = MATH_TOKEN.find_iter(&text).map(|m| m.as_str()).collect();
    if expression.is_empty() {
        debug!(input, "no arithmetic found");
        return NlpResult::failed(input, NO_EXPRESSION_MESSAGE);
    }

    match evaluate(&expression) {
        Ok(result) => NlpResult::calculation(expression, result),
        Err(e) => {
            debug!(%expression, error = %e, "local evaluation failed");
            NlpResult::failed(input, EVALUATION_FAILED_MESSAGE)
        }
    }
}
