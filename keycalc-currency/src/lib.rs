//! keycalc Currency - Exchange-rate conversions
//!
//! Rates come from a [`RateSource`]. [`ExchangeRateApi`] fetches
//! `{base_url}/{FROM}` and reads the `rates` map of the reply. Nothing is
//! cached or retried.

use std::collections::HashMap;
use async_trait::async_trait;
use keycalc_core::CalcError;
use keycalc_units::ConversionResult;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com/v4/latest";

#[derive(Debug, Error)]
pub enum CurrencyError {
    #[error("currency conversion is disabled")]
    Disabled,

    #[error("'{0}' is not a currency code")]
    InvalidCode(String),

    #[error("amount is not a finite number")]
    InvalidAmount,

    #[error("exchange rate request failed: {message}")]
    RequestFailed { message: String },

    #[error("exchange rate service returned HTTP {status}")]
    Status { status: u16 },

    #[error("failed to decode exchange rates: {message}")]
    Decode { message: String },

    #[error("no exchange rate from {from} to {to}")]
    MissingRate { from: String, to: String },
}

impl From<CurrencyError> for CalcError {
    fn from(err: CurrencyError) -> Self {
        match err {
            CurrencyError::InvalidCode(code) => CalcError::invalid_operand(&code),
            CurrencyError::InvalidAmount => CalcError::domain_error(err.to_string()),
            CurrencyError::Disabled => CalcError::backend_failure(err.to_string())
                .with_suggestion("Set [currency] enabled = true or KEYCALC_CURRENCY=1"),
            other => CalcError::backend_failure(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurrencyConfig {
    pub enabled: bool,
    pub base_url: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

/// Source of exchange rates relative to a base currency
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Rates keyed by currency code; `base` is already uppercased
    async fn rates(&self, base: &str) -> Result<HashMap<String, f64>, CurrencyError>;
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// exchangerate-api.com style HTTP source
pub struct ExchangeRateApi {
    client: reqwest::Client,
    base_url: String,
}

impl ExchangeRateApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, base: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), base)
    }
}

#[async_trait]
impl RateSource for ExchangeRateApi {
    async fn rates(&self, base: &str) -> Result<HashMap<String, f64>, CurrencyError> {
        let url = self.url(base);
        debug!(%url, "fetching exchange rates");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CurrencyError::RequestFailed { message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CurrencyError::Status { status: status.as_u16() });
        }

        let body: RatesResponse = response
            .json()
            .await
            .map_err(|e| CurrencyError::Decode { message: e.to_string() })?;
        Ok(body.rates)
    }
}

/// Currency converter over an injected rate source
pub struct CurrencyConverter {
    source: Box<dyn RateSource>,
}

impl CurrencyConverter {
    pub fn new(source: impl RateSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// HTTP-backed converter, or `None` when disabled
    pub fn from_config(config: &CurrencyConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(ExchangeRateApi::new(&config.base_url)))
    }

    pub async fn convert_currency(&self, value: f64, from: &str, to: &str) -> Result<ConversionResult, CurrencyError> {
        if !value.is_finite() {
            return Err(CurrencyError::InvalidAmount);
        }
        let from = currency_code(from)?;
        let to = currency_code(to)?;

        let rates = self.source.rates(&from).await?;
        let rate = rates
            .get(&to)
            .copied()
            .filter(|r| r.is_finite())
            .ok_or_else(|| CurrencyError::MissingRate {
                from: from.clone(),
                to: to.clone(),
            })?;

        Ok(ConversionResult::currency(value, from, to, value * rate))
    }
}

/// Uppercased code; letters only so it is safe to put in a URL path
fn currency_code(raw: &str) -> Result<String, CurrencyError> {
    let code = raw.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CurrencyError::InvalidCode(raw.to_string()));
    }
    Ok(code.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keycalc_units::{format_conversion_result, ConversionKind};
    use std::sync::{Arc, Mutex};

    /// Fixed rates, recording the base currencies asked for
    struct FakeRates {
        rates: HashMap<String, f64>,
        asked: Arc<Mutex<Vec<String>>>,
    }

    impl FakeRates {
        fn new(pairs: &[(&str, f64)]) -> Self {
            Self {
                rates: pairs.iter().map(|(c, r)| (c.to_string(), *r)).collect(),
                asked: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl RateSource for FakeRates {
        async fn rates(&self, base: &str) -> Result<HashMap<String, f64>, CurrencyError> {
            self.asked.lock().unwrap().push(base.to_string());
            Ok(self.rates.clone())
        }
    }

    struct Down;

    #[async_trait]
    impl RateSource for Down {
        async fn rates(&self, _base: &str) -> Result<HashMap<String, f64>, CurrencyError> {
            Err(CurrencyError::Status { status: 503 })
        }
    }

    #[tokio::test]
    async fn test_convert_currency() {
        let converter = CurrencyConverter::new(FakeRates::new(&[("EUR", 0.5), ("GBP", 0.25)]));
        let result = converter.convert_currency(10.0, "usd", "eur").await.unwrap();

        assert_eq!(result.from, "USD");
        assert_eq!(result.to, "EUR");
        assert_eq!(result.result, 5.0);
        assert_eq!(result.kind, ConversionKind::Currency);
        assert_eq!(format_conversion_result(&result), "10 USD = 5.00 EUR");
    }

    #[tokio::test]
    async fn test_base_is_uppercased() {
        let source = FakeRates::new(&[("EUR", 0.5)]);
        let asked = Arc::clone(&source.asked);
        let converter = CurrencyConverter::new(source);
        converter.convert_currency(1.0, " usd ", "EUR").await.unwrap();
        assert_eq!(*asked.lock().unwrap(), vec!["USD".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_rate() {
        let converter = CurrencyConverter::new(FakeRates::new(&[("EUR", 0.5)]));
        let err = converter.convert_currency(1.0, "USD", "XYZ").await.unwrap_err();
        assert!(matches!(err, CurrencyError::MissingRate { ref to, .. } if to == "XYZ"));
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let converter = CurrencyConverter::new(FakeRates::new(&[("EUR", 0.5)]));
        assert!(matches!(
            converter.convert_currency(1.0, "US/D", "EUR").await,
            Err(CurrencyError::InvalidCode(_))
        ));
        assert!(matches!(
            converter.convert_currency(f64::NAN, "USD", "EUR").await,
            Err(CurrencyError::InvalidAmount)
        ));
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let converter = CurrencyConverter::new(Down);
        let err = converter.convert_currency(1.0, "USD", "EUR").await.unwrap_err();
        let err: CalcError = err.into();
        assert!(err.is_code(keycalc_core::codes::BACKEND_FAILURE));
    }

    #[test]
    fn test_disabled_by_default() {
        assert!(CurrencyConverter::from_config(&CurrencyConfig::default()).is_none());
        let enabled = CurrencyConfig { enabled: true, ..CurrencyConfig::default() };
        assert!(CurrencyConverter::from_config(&enabled).is_some());
    }

    #[test]
    fn test_url() {
        let api = ExchangeRateApi::new("https://api.exchangerate-api.com/v4/latest/");
        assert_eq!(api.url("USD"), "https://api.exchangerate-api.com/v4/latest/USD");
    }

    #[test]
    fn test_rates_response_shape() {
        let body = r#"{"base":"USD","date":"2024-01-01","rates":{"EUR":0.91,"JPY":141.2}}"#;
        let parsed: RatesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.rates["JPY"], 141.2);
    }
}
