//! keycalc - Calculator engine
//!
//! A keypad calculator with history, free-text unit conversion
//! ("100 km to miles"), optional currency rates, and a natural-language
//! helper. [`Keycalc`] bundles one session; the member crates can also be
//! used directly.
//!
//! ```no_run
//! use keycalc::{Config, Keycalc};
//!
//! let mut engine = Keycalc::new(&Config::load().unwrap_or_default());
//! engine.press_labels(&["5", "+", "3", "="]).unwrap();
//! assert_eq!(engine.display(), "8");
//!
//! let result = engine.convert("100 km to miles", None).unwrap();
//! assert_eq!(result.to_string(), "100 kilometers = 62.14 miles");
//! ```

mod config;
mod engine;

pub use config::{
    apply_env_overrides, default_config_path, load_config_file, load_config_with_precedence,
    CalculatorConfig, Config, ConfigError,
};
pub use engine::Keycalc;

pub use keycalc_calc::{Calculator, History, HistoryEntry, HistorySink, Key, Mode};
pub use keycalc_core::{codes, CalcError, Severity};
pub use keycalc_currency::{CurrencyConfig, CurrencyConverter, RateSource};
pub use keycalc_nlp::{NaturalLanguage, NlpConfig, NlpResult};
pub use keycalc_units::{
    detect_conversion, format_conversion_result, try_detect_conversion, ConversionKind,
    ConversionResult, UnitInfo,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{CalcError, Config, ConversionResult, Key, Keycalc, Mode};
}
