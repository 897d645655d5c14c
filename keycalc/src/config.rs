//! Configuration loading with precedence handling.
//!
//! Defaults, then the TOML file, then environment variables:
//!
//! ```toml
//! [calculator]
//! mode = "scientific"
//!
//! [nlp]
//! api_key = "sk-..."
//! model = "gpt-3.5-turbo"
//! base_url = "https://api.openai.com/v1"
//!
//! [currency]
//! enabled = true
//! base_url = "https://api.exchangerate-api.com/v4/latest"
//! ```

use std::path::{Path, PathBuf};
use keycalc_calc::Mode;
use keycalc_core::CalcError;
use keycalc_currency::CurrencyConfig;
use keycalc_nlp::NlpConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_PATH_VAR: &str = "KEYCALC_CONFIG";
pub const API_KEY_VAR: &str = "KEYCALC_OPENAI_API_KEY";
pub const FALLBACK_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const CURRENCY_VAR: &str = "KEYCALC_CURRENCY";
pub const MODE_VAR: &str = "KEYCALC_MODE";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Invalid TOML in {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

impl From<ConfigError> for CalcError {
    fn from(err: ConfigError) -> Self {
        CalcError::config_error(err.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    pub mode: Mode,
}

/// Resolved configuration. Every section is optional in the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub calculator: CalculatorConfig,
    pub nlp: NlpConfig,
    pub currency: CurrencyConfig,
}

impl Config {
    /// Load from the default locations and apply the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        let config = load_config_with_precedence(explicit)?.unwrap_or_default();
        apply_env_overrides(config, |name| std::env::var(name).ok())
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// `<config dir>/keycalc/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("keycalc").join("config.toml"))
}

/// Load a config file. A missing file is `Ok(None)`, not an error.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<Option<Config>, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "no config file");
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let config = Config::from_toml(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    debug!(path = %path.display(), "loaded config file");
    Ok(Some(config))
}

/// Explicit path if given, otherwise the default path
pub fn load_config_with_precedence(explicit: Option<PathBuf>) -> Result<Option<Config>, ConfigError> {
    match explicit.or_else(default_config_path) {
        Some(path) => load_config_file(path),
        None => Ok(None),
    }
}

/// Apply environment overrides, reading variables through `lookup`.
///
/// - `KEYCALC_OPENAI_API_KEY`, else `OPENAI_API_KEY`: completion API key
/// - `KEYCALC_CURRENCY`: `1`/`true`/`yes` or `0`/`false`/`no`
/// - `KEYCALC_MODE`: `basic` or `scientific`
pub fn apply_env_overrides(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty(API_KEY_VAR).or_else(|| non_empty(FALLBACK_API_KEY_VAR)) {
        config.nlp.api_key = Some(key);
    }

    if let Some(value) = non_empty(CURRENCY_VAR) {
        let flag = value.trim().to_ascii_lowercase();
        config.currency.enabled = match flag.as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                return Err(ConfigError::InvalidValue {
                    name: CURRENCY_VAR.to_string(),
                    value,
                    reason: "expected true or false".to_string(),
                })
            }
        };
    }

    if let Some(value) = non_empty(MODE_VAR) {
        config.calculator.mode = value.parse().map_err(|e: keycalc_calc::UnknownMode| {
            ConfigError::InvalidValue {
                name: MODE_VAR.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            }
        })?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.calculator.mode, Mode::Basic);
        assert!(config.nlp.api_key.is_none());
        assert_eq!(config.nlp.model, "gpt-3.5-turbo");
        assert!(!config.currency.enabled);
        assert_eq!(config.currency.base_url, "https://api.exchangerate-api.com/v4/latest");
    }

    #[test]
    fn test_parse_full_file() {
        let config = Config::from_toml(
            r#"
[calculator]
mode = "scientific"

[nlp]
api_key = "sk-file"
model = "gpt-4o-mini"
base_url = "http://localhost:11434/v1"

[currency]
enabled = true
"#,
        )
        .unwrap();

        assert_eq!(config.calculator.mode, Mode::Scientific);
        assert_eq!(config.nlp.api_key.as_deref(), Some("sk-file"));
        assert_eq!(config.nlp.model, "gpt-4o-mini");
        assert_eq!(config.nlp.base_url, "http://localhost:11434/v1");
        assert!(config.currency.enabled);
        // Unset keys keep their defaults
        assert_eq!(config.currency.base_url, "https://api.exchangerate-api.com/v4/latest");
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.calculator.mode, Mode::Basic);
    }

    #[test]
    fn test_file_mode_is_case_insensitive_like_env() {
        let config = Config::from_toml("[calculator]\nmode = \"Scientific\"").unwrap();
        assert_eq!(config.calculator.mode, Mode::Scientific);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Config::from_toml("theme = \"dark\"").is_err());
        assert!(Config::from_toml("[nlp]\ntemperature = 1").is_err());
        assert!(Config::from_toml("[calculator]\nmode = \"graphing\"").is_err());
    }

    #[test]
    fn test_missing_file_is_none() {
        assert!(matches!(load_config_file("/nonexistent/keycalc/config.toml"), Ok(None)));
    }

    #[test]
    fn test_load_file_and_parse_error() {
        let dir = std::env::temp_dir();

        let good = dir.join(format!("keycalc_test_good_{}.toml", std::process::id()));
        std::fs::write(&good, "[calculator]\nmode = \"scientific\"\n").unwrap();
        let config = load_config_file(&good).unwrap().unwrap();
        assert_eq!(config.calculator.mode, Mode::Scientific);
        std::fs::remove_file(&good).unwrap();

        let bad = dir.join(format!("keycalc_test_bad_{}.toml", std::process::id()));
        std::fs::write(&bad, "[calculator\n").unwrap();
        assert!(matches!(load_config_file(&bad), Err(ConfigError::ParseError { .. })));
        std::fs::remove_file(&bad).unwrap();
    }

    #[test]
    fn test_default_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("keycalc/config.toml"));
        }
    }

    #[test]
    fn test_env_overrides_file() {
        let file = Config::from_toml("[nlp]\napi_key = \"sk-file\"\n[calculator]\nmode = \"basic\"").unwrap();
        let config = apply_env_overrides(
            file,
            env(&[
                ("KEYCALC_OPENAI_API_KEY", "sk-env"),
                ("KEYCALC_CURRENCY", "true"),
                ("KEYCALC_MODE", "Scientific"),
            ]),
        )
        .unwrap();

        assert_eq!(config.nlp.api_key.as_deref(), Some("sk-env"));
        assert!(config.currency.enabled);
        assert_eq!(config.calculator.mode, Mode::Scientific);
    }

    #[test]
    fn test_fallback_api_key() {
        let config = apply_env_overrides(Config::default(), env(&[("OPENAI_API_KEY", "sk-openai")])).unwrap();
        assert_eq!(config.nlp.api_key.as_deref(), Some("sk-openai"));

        let config = apply_env_overrides(
            Config::default(),
            env(&[("OPENAI_API_KEY", "sk-openai"), ("KEYCALC_OPENAI_API_KEY", "sk-keycalc")]),
        )
        .unwrap();
        assert_eq!(config.nlp.api_key.as_deref(), Some("sk-keycalc"));
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let config = apply_env_overrides(Config::default(), env(&[("KEYCALC_OPENAI_API_KEY", "")])).unwrap();
        assert!(config.nlp.api_key.is_none());
    }

    #[test]
    fn test_invalid_env_values() {
        let err = apply_env_overrides(Config::default(), env(&[("KEYCALC_CURRENCY", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "KEYCALC_CURRENCY"));

        let err = apply_env_overrides(Config::default(), env(&[("KEYCALC_MODE", "graphing")])).unwrap_err();
        let err: CalcError = err.into();
        assert!(err.is_code(keycalc_core::codes::CONFIG_ERROR));
    }
}
