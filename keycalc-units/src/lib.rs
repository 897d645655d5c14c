//! keycalc Units - Free-text unit conversion
//!
//! Turns requests like "100 km to miles" into structured results:
//!
//! text -> [`parse_request`] -> [`normalize`] -> [`resolve`] -> [`format_conversion_result`]
//!
//! Categories:
//! - Length (km, mi, m, cm, ft, in, yd)
//! - Mass (kg, lb, g, oz)
//! - Temperature (C, F)
//! - Volume (L, gal, mL)
//!
//! Conversions are one hop only. Each supported direction is an authored
//! edge in [`GRAPH`].

mod aliases;
mod graph;
mod request;
mod error;
mod parse;
mod resolve;
mod format;
mod catalog;

pub use aliases::{ALIASES, AliasTable, normalize};
pub use graph::{GRAPH, ConversionGraph, ConvertFn};
pub use request::{ConversionRequest, ConversionResult, ConversionKind};
pub use error::ConversionError;
pub use parse::parse_request;
pub use resolve::resolve;
pub use format::format_conversion_result;
pub use catalog::{list_units, UnitInfo, CATEGORIES};

/// Parse and resolve a conversion, keeping the failure kind.
///
/// `previous_value` is the calculator's current display, used when the
/// input names only a unit pair ("km to miles").
pub fn try_detect_conversion(
    input: &str,
    previous_value: Option<&str>,
) -> Result<ConversionResult, ConversionError> {
    let request = parse_request(input, previous_value)?;
    resolve(&request)
}

/// Parse and resolve a conversion; `None` on any failure.
pub fn detect_conversion(input: &str, previous_value: Option<&str>) -> Option<ConversionResult> {
    try_detect_conversion(input, previous_value).ok()
}
