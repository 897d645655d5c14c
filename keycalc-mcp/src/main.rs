//! keycalc MCP Server
//!
//! Line-delimited JSON-RPC 2.0 on stdin/stdout. Logs go to stderr.
//!
//! Tools:
//! - convert: Unit conversion from free text ("100 km to miles")
//! - convert_currency: Currency conversion at current rates
//! - calculate: Evaluate an arithmetic expression
//! - keypad: Press calculator keys on the session calculator
//! - history: List finished calculations
//! - clear_history: Empty the history
//! - natural_language: Interpret a sentence as a calculation or conversion
//! - list_units: List supported units

use std::io::{self, BufRead, Write};
use keycalc::{CalcError, Config, Keycalc};
use keycalc_core::{format_number, parse_number};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "keycalc";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError {
            code: INVALID_PARAMS,
            message: message.into(),
            data: None,
        }
    }
}

/// Session state: one engine and the runtime that drives its async backends
struct Server {
    engine: Keycalc,
    runtime: tokio::runtime::Runtime,
}

impl Server {
    fn new(engine: Keycalc) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Server { engine, runtime })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let mut server = match Server::new(Keycalc::new(&config)) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "failed to start async runtime");
            std::process::exit(1);
        }
    };

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "keycalc MCP server started");
    info!(
        mode = %server.engine.mode(),
        nlp_backend = server.engine.has_nlp_backend(),
        currency = server.engine.currency_enabled(),
        "engine configured"
    );

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(bytes = line.len(), "received request");

                let Some(response) = process_line(&mut server, line) else {
                    continue;
                };
                if let Err(e) = write_response(&response) {
                    error!(error = %e, "failed to write response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "failed to read input");
                break;
            }
        }
    }

    info!("server shutting down");
}

fn write_response(response: &McpResponse) -> io::Result<()> {
    let response_json = serde_json::to_string(response).map_err(io::Error::other)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", response_json)?;
    stdout.flush()
}

/// Handle one input line. Notifications (no id) produce no response.
fn process_line(server: &mut Server, line: &str) -> Option<McpResponse> {
    let request: McpRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "unparseable request");
            return Some(McpResponse {
                jsonrpc: "2.0".to_string(),
                id: None,
                result: None,
                error: Some(McpError {
                    code: PARSE_ERROR,
                    message: format!("Parse error: {}", e),
                    data: None,
                }),
            });
        }
    };

    debug!(method = %request.method, "processing");
    let response = handle_request(server, &request);

    if request.id.is_none() {
        debug!(method = %request.method, "notification processed");
        return None;
    }
    Some(response)
}

fn handle_request(server: &mut Server, request: &McpRequest) -> McpResponse {
    let result = if request.jsonrpc != "2.0" {
        Err(McpError {
            code: INVALID_REQUEST,
            message: format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            data: None,
        })
    } else {
        match request.method.as_str() {
            "initialize" => handle_initialize(&request.params),
            "initialized" | "notifications/initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),
            "tools/list" => handle_tools_list(),
            "tools/call" => handle_tool_call(server, &request.params),
            _ => Err(McpError {
                code: METHOD_NOT_FOUND,
                message: format!("Method not found: {}", request.method),
                data: None,
            }),
        }
    };

    match result {
        Ok(r) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: None,
            error: Some(e),
        },
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Echo the client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Calculator with unit conversion, keypad history and natural-language input"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "keycalc converts units ('100 km to miles'), evaluates arithmetic, and runs a keypad calculator session with history. Use 'convert' for units, 'calculate' for expressions, 'keypad' to press calculator keys."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    Ok(json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert units from free text, e.g. '100 km to miles' or 'convert 0 celsius to fahrenheit'. A bare unit pair ('km to miles') converts previous_value, or the calculator display when omitted.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "input": {
                            "type": "string",
                            "description": "Conversion request"
                        },
                        "previous_value": {
                            "type": ["string", "number"],
                            "description": "Value to convert when the input has no number"
                        }
                    },
                    "required": ["input"]
                }
            },
            {
                "name": "convert_currency",
                "description": "Convert between currencies at current exchange rates. Requires the currency backend to be enabled.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": {
                            "type": ["number", "string"],
                            "description": "Amount to convert"
                        },
                        "from": {
                            "type": "string",
                            "description": "Source currency code, e.g. USD"
                        },
                        "to": {
                            "type": "string",
                            "description": "Target currency code, e.g. EUR"
                        }
                    },
                    "required": ["value", "from", "to"]
                }
            },
            {
                "name": "calculate",
                "description": "Evaluate an arithmetic expression with + - * / ^ and parentheses.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "expression": {
                            "type": "string",
                            "description": "Expression, e.g. '(2 + 3) * 4'"
                        }
                    },
                    "required": ["expression"]
                }
            },
            {
                "name": "keypad",
                "description": "Press keys on the session calculator. Keys: 0-9 . + - × ÷ ^ = C ± %. Returns the display, the equation line and the history length.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "keys": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Key labels in press order"
                        }
                    },
                    "required": ["keys"]
                }
            },
            {
                "name": "history",
                "description": "List finished calculations, most recent first.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "clear_history",
                "description": "Remove all history entries.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "natural_language",
                "description": "Interpret a sentence such as 'what is 5 plus 3' or 'convert 5 meters to feet'.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "input": {
                            "type": "string",
                            "description": "Sentence to interpret"
                        }
                    },
                    "required": ["input"]
                }
            },
            {
                "name": "list_units",
                "description": "List supported units with their aliases and conversion targets.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Filter by category",
                            "enum": ["length", "mass", "temperature", "volume"]
                        }
                    }
                }
            }
        ]
    }))
}

fn handle_tool_call(server: &mut Server, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    match name {
        "convert" => tool_convert(server, args),
        "convert_currency" => tool_convert_currency(server, args),
        "calculate" => tool_calculate(server, args),
        "keypad" => tool_keypad(server, args),
        "history" => tool_history(server),
        "clear_history" => tool_clear_history(server),
        "natural_language" => tool_natural_language(server, args),
        "list_units" => tool_list_units(server, args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn arg_str<'a>(args: &'a JsonValue, name: &str) -> Result<&'a str, McpError> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", name)))
}

/// Number given either as a JSON number or as text
fn arg_number(args: &JsonValue, name: &str) -> Result<f64, McpError> {
    match args.get(name) {
        Some(JsonValue::Number(n)) => n.as_f64()
            .ok_or_else(|| McpError::invalid_params(format!("{} is out of range", name))),
        Some(JsonValue::String(s)) => parse_number(s)
            .map_err(|e| McpError::invalid_params(format!("{} is not a number: {}", name, e))),
        _ => Err(McpError::invalid_params(format!("Missing {} argument", name))),
    }
}

fn text_result(text: impl Into<String>, extra: JsonValue) -> JsonValue {
    let mut result = json!({
        "content": [{ "type": "text", "text": text.into() }],
        "isError": false
    });
    if let (Some(target), JsonValue::Object(fields)) = (result.as_object_mut(), extra) {
        target.extend(fields);
    }
    result
}

/// Failed tool call. Reported in the result, not as a protocol error.
fn error_result(err: &CalcError) -> Result<JsonValue, McpError> {
    let error = serde_json::to_value(err).map_err(|e| McpError {
        code: INTERNAL_ERROR,
        message: e.to_string(),
        data: None,
    })?;
    Ok(json!({
        "content": [{ "type": "text", "text": err.to_string() }],
        "error": error,
        "isError": true
    }))
}

fn to_json(value: &impl Serialize) -> Result<JsonValue, McpError> {
    serde_json::to_value(value).map_err(|e| McpError {
        code: INTERNAL_ERROR,
        message: e.to_string(),
        data: None,
    })
}

fn tool_convert(server: &mut Server, args: JsonValue) -> Result<JsonValue, McpError> {
    let input = arg_str(&args, "input")?;
    let previous_value = match args.get("previous_value") {
        None | Some(JsonValue::Null) => server.engine.display().to_string(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    match server.engine.convert(input, Some(&previous_value)) {
        Ok(result) => Ok(text_result(result.to_string(), json!({ "result": to_json(&result)? }))),
        Err(e) => error_result(&e),
    }
}

fn tool_convert_currency(server: &mut Server, args: JsonValue) -> Result<JsonValue, McpError> {
    let value = arg_number(&args, "value")?;
    let from = arg_str(&args, "from")?;
    let to = arg_str(&args, "to")?;

    let engine = &server.engine;
    match server.runtime.block_on(engine.convert_currency(value, from, to)) {
        Ok(result) => Ok(text_result(result.to_string(), json!({ "result": to_json(&result)? }))),
        Err(e) => error_result(&e),
    }
}

fn tool_calculate(server: &mut Server, args: JsonValue) -> Result<JsonValue, McpError> {
    let expression = arg_str(&args, "expression")?;
    match server.engine.calculate(expression) {
        Ok(value) => Ok(text_result(
            format!("{} = {}", expression.trim(), format_number(value)),
            json!({ "value": value }),
        )),
        Err(e) => error_result(&e),
    }
}

fn tool_keypad(server: &mut Server, args: JsonValue) -> Result<JsonValue, McpError> {
    let keys: Vec<&str> = args.get("keys")
        .and_then(|v| v.as_array())
        .ok_or_else(|| McpError::invalid_params("Missing keys argument"))?
        .iter()
        .map(|k| k.as_str().ok_or_else(|| McpError::invalid_params("Keys must be strings")))
        .collect::<Result<_, _>>()?;

    if let Err(e) = server.engine.press_labels(&keys) {
        return error_result(&e);
    }

    let engine = &server.engine;
    let equation = engine.equation();
    let text = if equation.is_empty() {
        engine.display().to_string()
    } else {
        format!("{}\n{}", equation.trim_end(), engine.display())
    };

    Ok(text_result(text, json!({
        "display": engine.display(),
        "equation": equation,
        "mode": engine.mode(),
        "history_length": engine.history().len()
    })))
}

fn tool_history(server: &mut Server) -> Result<JsonValue, McpError> {
    let history = server.engine.history();
    let text = if history.is_empty() {
        "No calculations yet".to_string()
    } else {
        history.entries().iter()
            .map(|e| format!("{} = {}", e.expression, e.result))
            .collect::<Vec<_>>()
            .join("\n")
    };
    Ok(text_result(text, json!({ "entries": to_json(history)? })))
}

fn tool_clear_history(server: &mut Server) -> Result<JsonValue, McpError> {
    let removed = server.engine.history().len();
    server.engine.clear_history();
    Ok(text_result(format!("Cleared {} entries", removed), json!({ "removed": removed })))
}

fn tool_natural_language(server: &mut Server, args: JsonValue) -> Result<JsonValue, McpError> {
    let input = arg_str(&args, "input")?;

    let engine = &server.engine;
    let interpreted = server.runtime.block_on(engine.process_natural_language(input));

    if let Some(message) = &interpreted.error {
        return Ok(json!({
            "content": [{ "type": "text", "text": message }],
            "interpretation": to_json(&interpreted)?,
            "isError": true
        }));
    }

    if interpreted.conversion_units.is_some() {
        let conversion = engine.resolve_nlp_conversion(&interpreted);
        let text = match (&conversion, interpreted.conversion_request()) {
            (Some(result), _) => result.to_string(),
            (None, Some(request)) => format!("Conversion not supported: {}", request),
            (None, None) => "Conversion not supported".to_string(),
        };
        return Ok(text_result(text, json!({
            "interpretation": to_json(&interpreted)?,
            "conversion": to_json(&conversion)?
        })));
    }

    let text = match interpreted.result {
        Some(value) => format!("{} = {}", interpreted.expression, format_number(value)),
        None => interpreted.expression.clone(),
    };
    Ok(text_result(text, json!({ "interpretation": to_json(&interpreted)? })))
}

fn tool_list_units(server: &mut Server, args: JsonValue) -> Result<JsonValue, McpError> {
    let category = args.get("category").and_then(|v| v.as_str());
    let units = server.engine.list_units(category);

    let text = units.iter()
        .map(|u| format!("{} ({}): -> {}", u.name, u.category, u.converts_to.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(text_result(text, json!({ "units": to_json(&units)? })))
}
