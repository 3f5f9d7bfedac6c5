//! JSON-lines operation scripts.
//!
//! Each non-blank line not starting with `#` is one request:
//!
//! ```text
//! {"op": "createAgreement", "args": ["UFA1", "SELLER", {"netCharge": "1000", "chargeTolerance": "5"}]}
//! ```
//!
//! String arguments are passed through as they are; any other JSON value is
//! passed as its JSON text, so payloads can be written inline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ufa_ledger::dispatch::{DispatchError, Dispatcher};
use ufa_ledger::ports::inbound::UfaLedgerApi;

/// One scripted request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptRequest {
    pub op: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl ScriptRequest {
    /// Arguments in the string form the dispatcher takes.
    pub fn string_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| match arg {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

/// One result line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptResponse {
    pub line: usize,
    pub op: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ScriptResponse {
    fn success(line: usize, op: &str, result: Value) -> Self {
        Self {
            line,
            op: op.to_string(),
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    fn failure(line: usize, op: &str, error: &DispatchError) -> Self {
        Self {
            line,
            op: op.to_string(),
            ok: false,
            result: None,
            error: Some(error.to_json()),
        }
    }
}

/// Parse a script line. `None` for blank lines and comments.
pub fn parse_line(text: &str) -> Option<Result<ScriptRequest, serde_json::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(serde_json::from_str(trimmed))
}

/// Run one script line through the dispatcher.
pub fn run_line<A: UfaLedgerApi>(
    dispatcher: &Dispatcher<A>,
    line: usize,
    text: &str,
) -> Option<ScriptResponse> {
    let request = match parse_line(text)? {
        Ok(request) => request,
        Err(e) => {
            let error = DispatchError::InvalidParams(format!("malformed request: {e}"));
            return Some(ScriptResponse::failure(line, "", &error));
        }
    };

    let response = match dispatcher.execute(&request.op, &request.string_args()) {
        Ok(result) => ScriptResponse::success(line, &request.op, result),
        Err(e) => ScriptResponse::failure(line, &request.op, &e),
    };
    Some(response)
}
