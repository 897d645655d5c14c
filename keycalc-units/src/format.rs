//! Display form of a conversion result

use keycalc_core::{format_number, to_fixed};
use crate::ConversionResult;

/// Render as `"{value} {from} = {result} {to}"`.
///
/// The value keeps its shortest form; the result is rounded half away from
/// zero to two places. Unit names are printed as stored, never pluralized.
pub fn format_conversion_result(result: &ConversionResult) -> String {
    format!(
        "{} {} = {} {}",
        format_number(result.value),
        result.from,
        to_fixed(result.result, 2),
        result.to
    )
}
