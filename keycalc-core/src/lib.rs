//! keycalc Core - Fundamental types
//!
//! This crate provides the core types used throughout keycalc:
//! - `CalcError`: Structured errors with machine-readable codes
//! - Number helpers: parsing and the display forms shared by every surface

mod number;
mod error;

pub use number::{NumberError, parse_number, format_number, round_half_away, to_fixed};
pub use error::{CalcError, ErrorContext, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{CalcError, Severity, format_number, parse_number, to_fixed};
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod number_tests {
        use super::*;

        #[test]
        fn test_parse_integer() {
            assert_eq!(parse_number("123"), Ok(123.0));
            assert_eq!(parse_number("  42 "), Ok(42.0));
        }

        #[test]
        fn test_parse_decimal() {
            assert_eq!(parse_number("3.14"), Ok(3.14));
            assert_eq!(parse_number("-0.5"), Ok(-0.5));
        }

        #[test]
        fn test_parse_rejects_garbage() {
            assert!(matches!(parse_number(""), Err(NumberError::ParseError(_))));
            assert!(matches!(parse_number("Error"), Err(NumberError::ParseError(_))));
            assert!(matches!(parse_number("12abc"), Err(NumberError::ParseError(_))));
        }

        #[test]
        fn test_parse_rejects_non_finite() {
            assert!(matches!(parse_number("NaN"), Err(NumberError::NonFinite(_))));
            assert!(matches!(parse_number("inf"), Err(NumberError::NonFinite(_))));
        }

        #[test]
        fn test_format_whole_numbers() {
            assert_eq!(format_number(8.0), "8");
            assert_eq!(format_number(-12.0), "-12");
            assert_eq!(format_number(-0.0), "0");
        }

        #[test]
        fn test_format_fractions() {
            assert_eq!(format_number(0.5), "0.5");
            assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        }

        #[test]
        fn test_format_exponent_range() {
            assert_eq!(format_number(1e21), "1e+21");
            assert_eq!(format_number(1.5e-7), "1.5e-7");
            assert_eq!(format_number(f64::INFINITY), "Infinity");
        }

        #[test]
        fn test_to_fixed_rounds_half_away_from_zero() {
            assert_eq!(to_fixed(62.1371, 2), "62.14");
            assert_eq!(to_fixed(31.06855, 2), "31.07");
            assert_eq!(to_fixed(2.5, 0), "3");
            assert_eq!(to_fixed(-2.5, 0), "-3");
            assert_eq!(to_fixed(32.0, 2), "32.00");
        }

        #[test]
        fn test_to_fixed_no_negative_zero() {
            assert_eq!(to_fixed(-0.001, 2), "0.00");
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_display_includes_code_and_suggestion() {
            let err = CalcError::div_zero();
            let text = err.to_string();
            assert!(text.starts_with("[DIV_ZERO]"));
            assert!(text.contains("suggestion"));
        }

        #[test]
        fn test_builders_fill_context() {
            let err = CalcError::parse_failure("no pattern")
                .with_input("garbage text")
                .with_note("from detect_conversion");
            let ctx = err.context.unwrap();
            assert_eq!(ctx.input.as_deref(), Some("garbage text"));
            assert_eq!(ctx.notes, vec!["from detect_conversion".to_string()]);
        }

        #[test]
        fn test_from_number_error() {
            let err: CalcError = NumberError::ParseError("abc".into()).into();
            assert!(err.is_code(codes::INVALID_OPERAND));

            let err: CalcError = NumberError::NonFinite("inf".into()).into();
            assert!(err.is_code(codes::DOMAIN_ERROR));
        }

        #[test]
        fn test_serializes_lowercase_severity() {
            let err = CalcError::config_error("bad file");
            let json = serde_json::to_value(&err).unwrap();
            assert_eq!(json["severity"], "fatal");
            assert_eq!(json["code"], "CONFIG_ERROR");
            assert!(json.get("context").is_none());
        }
    }
}
