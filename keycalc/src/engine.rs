//! One calculator session with all of its helpers

use keycalc_calc::{Calculator, History, HistoryEntry, HistorySink, Key, Mode};
use keycalc_core::CalcError;
use keycalc_currency::{CurrencyConverter, CurrencyError};
use keycalc_nlp::{NaturalLanguage, NlpResult};
use keycalc_units::{ConversionResult, UnitInfo};
use tracing::debug;
use crate::Config;

/// Calculator session: keypad, history, unit and currency conversion, and
/// natural-language input.
///
/// The session owns its history; nothing is persisted.
pub struct Keycalc {
    calculator: Calculator,
    history: History,
    nlp: NaturalLanguage,
    currency: Option<CurrencyConverter>,
}

impl Keycalc {
    pub fn new(config: &Config) -> Self {
        Self::with_backends(
            config.calculator.mode,
            NaturalLanguage::from_config(&config.nlp),
            CurrencyConverter::from_config(&config.currency),
        )
    }

    /// Session over explicitly supplied backends
    pub fn with_backends(mode: Mode, nlp: NaturalLanguage, currency: Option<CurrencyConverter>) -> Self {
        Self {
            calculator: Calculator::new(mode),
            history: History::new(),
            nlp,
            currency,
        }
    }

    pub fn mode(&self) -> Mode {
        self.calculator.mode()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.calculator.set_mode(mode);
    }

    pub fn display(&self) -> &str {
        self.calculator.display()
    }

    pub fn equation(&self) -> String {
        self.calculator.equation()
    }

    pub fn press(&mut self, key: Key) {
        self.calculator.press(key, &mut self.history);
    }

    /// Press keys by label. Labels are all checked before any is pressed.
    pub fn press_labels<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<(), CalcError> {
        let keys = labels
            .iter()
            .map(|label| label.as_ref().parse::<Key>())
            .collect::<Result<Vec<_>, _>>()?;
        for key in keys {
            self.press(key);
        }
        Ok(())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn add_to_history(&mut self, entry: HistoryEntry) {
        self.history.add_to_history(entry);
    }

    pub fn clear_history(&mut self) {
        self.history.clear_history();
    }

    /// Unit conversion; `None` on any failure
    pub fn detect_conversion(&self, input: &str, previous_value: Option<&str>) -> Option<ConversionResult> {
        keycalc_units::detect_conversion(input, previous_value)
    }

    /// Unit conversion with the failure reason
    pub fn convert(&self, input: &str, previous_value: Option<&str>) -> Result<ConversionResult, CalcError> {
        keycalc_units::try_detect_conversion(input, previous_value)
            .map_err(|e| CalcError::from(e).with_input(input))
    }

    /// Unit conversion that carries the current display value
    pub fn convert_display(&self, input: &str) -> Result<ConversionResult, CalcError> {
        self.convert(input, Some(self.display()))
            .map_err(|e| e.with_note(format!("carried value '{}' from the display", self.display())))
    }

    pub fn list_units(&self, category: Option<&str>) -> Vec<UnitInfo> {
        keycalc_units::list_units(category)
    }

    pub fn calculate(&self, expression: &str) -> Result<f64, CalcError> {
        keycalc_expr::evaluate(expression).map_err(|e| CalcError::from(e).with_input(expression))
    }

    pub fn currency_enabled(&self) -> bool {
        self.currency.is_some()
    }

    pub async fn convert_currency(&self, value: f64, from: &str, to: &str) -> Result<ConversionResult, CalcError> {
        let converter = self.currency.as_ref().ok_or(CurrencyError::Disabled)?;
        Ok(converter.convert_currency(value, from, to).await?)
    }

    pub fn has_nlp_backend(&self) -> bool {
        self.nlp.has_backend()
    }

    /// Interpret a sentence. Conversions are returned unresolved; see
    /// [`Keycalc::resolve_nlp_conversion`].
    pub async fn process_natural_language(&self, input: &str) -> NlpResult {
        self.nlp.process_natural_language(input).await
    }

    /// Run a conversion found by the natural-language helper
    pub fn resolve_nlp_conversion(&self, result: &NlpResult) -> Option<ConversionResult> {
        let request = result.conversion_request()?;
        let resolved = self.detect_conversion(&request, None);
        if resolved.is_none() {
            debug!(%request, "natural-language conversion not supported");
        }
        resolved
    }
}

impl Default for Keycalc {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
