//! keycalc NLP - Natural-language calculator input
//!
//! "what is 5 plus 3" or "convert 5 meters to feet" in, an [`NlpResult`]
//! out. With an API key the sentence goes to a completion backend first;
//! any backend failure falls back to the local parser.

mod backend;
mod local;
mod result;

pub use backend::{CompletionBackend, NlpConfig, NlpError, OpenAiBackend, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use local::{parse_locally, EVALUATION_FAILED_MESSAGE, NO_CONVERSION_MESSAGE, NO_EXPRESSION_MESSAGE};
pub use result::{ConversionUnits, NlpKind, NlpResult};

use keycalc_expr::evaluate;
use serde_json::Value;
use tracing::{debug, warn};

pub const SYSTEM_PROMPT: &str = r#"You are a calculator that processes natural language into mathematical expressions or unit conversions.
For calculations, respond with a JSON object containing:
{
  "expression": "mathematical expression to evaluate",
  "type": "calculation"
}

For conversions, respond with:
{
  "type": "conversion",
  "conversionUnits": {
    "from": "source unit",
    "to": "target unit"
  },
  "expression": "number to convert"
}

Only respond with the JSON object, nothing else."#;

/// Natural-language front end
pub struct NaturalLanguage {
    backend: Option<Box<dyn CompletionBackend>>,
}

impl NaturalLanguage {
    /// Local parsing only
    pub fn local() -> Self {
        Self { backend: None }
    }

    pub fn with_backend(backend: impl CompletionBackend + 'static) -> Self {
        Self {
            backend: Some(Box::new(backend)),
        }
    }

    pub fn from_config(config: &NlpConfig) -> Self {
        match OpenAiBackend::from_config(config) {
            Some(backend) => Self::with_backend(backend),
            None => {
                debug!("no completion API key, natural language uses local parsing");
                Self::local()
            }
        }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn process_natural_language(&self, input: &str) -> NlpResult {
        let Some(backend) = &self.backend else {
            return parse_locally(input);
        };

        let reply = backend.complete(SYSTEM_PROMPT, input).await;
        match reply.and_then(|content| interpret_reply(&content)) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "completion backend failed, falling back to local parsing");
                parse_locally(input)
            }
        }
    }
}

/// Turn a backend reply into a result.
///
/// Calculations are evaluated locally; conversions pass through with no
/// result. A reply wrapped in a markdown code fence is accepted.
pub fn interpret_reply(content: &str) -> Result<NlpResult, NlpError> {
    let invalid = |message: &str| NlpError::InvalidReply { message: message.to_string() };

    let trimmed = content.trim();
    let json_text = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    let reply: Value = serde_json::from_str(json_text.trim())
        .map_err(|e| NlpError::InvalidReply { message: e.to_string() })?;

    // Models sometimes send the expression as a bare number
    let expression = match &reply["expression"] {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return Err(invalid("missing expression")),
    };

    match reply["type"].as_str() {
        Some("calculation") => {
            let result = evaluate(&expression)
                .map_err(|e| NlpError::InvalidReply { message: e.to_string() })?;
            Ok(NlpResult::calculation(expression, result))
        }
        Some("conversion") => {
            let units = &reply["conversionUnits"];
            match (units["from"].as_str(), units["to"].as_str()) {
                (Some(from), Some(to)) => Ok(NlpResult::conversion(expression, from, to)),
                _ => Err(invalid("conversion without units")),
            }
        }
        _ => Err(invalid("unknown reply type")),
    }
}
