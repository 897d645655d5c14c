//! Conversion resolver - one-hop lookup in the conversion graph

use tracing::debug;
use crate::{normalize, ConversionError, ConversionRequest, ConversionResult, GRAPH};

/// Resolve a parsed request against the conversion graph.
///
/// Both unit tokens are normalized first. Only direct edges are used; a
/// missing source or target is `Unsupported` with the canonical names.
pub fn resolve(request: &ConversionRequest) -> Result<ConversionResult, ConversionError> {
    let from = normalize(&request.from);
    let to = normalize(&request.to);

    let Some(convert) = GRAPH.edge(&from, &to) else {
        debug!(%from, %to, "no conversion edge");
        return Err(ConversionError::Unsupported { from, to });
    };

    let result = convert(request.value);
    Ok(ConversionResult::unit(request.value, from, to, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConversionKind;

    #[test]
    fn test_resolve_normalizes_both_tokens() {
        let result = resolve(&ConversionRequest::new(10.0, "KG", "lbs")).unwrap();
        assert_eq!(result.from, "kilograms");
        assert_eq!(result.to, "pounds");
        assert_eq!(result.kind, ConversionKind::Unit);
        assert!((result.result - 22.0462).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_yards() {
        let result = resolve(&ConversionRequest::new(1.0, "mile", "yd")).unwrap();
        assert_eq!(result.result, 1760.0);
    }

    #[test]
    fn test_unknown_source() {
        assert_eq!(
            resolve(&ConversionRequest::new(1.0, "Parsecs", "km")),
            Err(ConversionError::Unsupported {
                from: "parsecs".to_string(),
                to: "kilometers".to_string(),
            })
        );
    }

    #[test]
    fn test_cross_category_is_unsupported() {
        let err = resolve(&ConversionRequest::new(1.0, "kg", "miles")).unwrap_err();
        assert!(!err.is_parse_failure());
    }

    #[test]
    fn test_unauthored_direction_is_unsupported() {
        assert!(resolve(&ConversionRequest::new(1.0, "cm", "ft")).is_err());
        assert!(resolve(&ConversionRequest::new(1.0, "cm", "in")).is_ok());
    }
}
