//! Classification of explorer response bodies

use serde_json::Value;

use crate::errors::ExplorerError;

/// JSON-RPC version accepted from proxy endpoints.
pub const JSONRPC_VERSION: &str = "2.0";

/// Extracts the payload of an explorer response.
///
/// Two envelopes are understood:
///
/// - `{ status, message, result }`: `status == "0"` or `message == "NOTOK"`
///   fails with `result` as detail
/// - `{ jsonrpc, id, result | error }`: a version other than `2.0` fails, as
///   does an `error` object
pub fn classify(body: Value) -> Result<Value, ExplorerError> {
    let Value::Object(mut envelope) = body else {
        return Err(ExplorerError::MalformedResponse {
            reason: "response body is not a JSON object".to_string(),
        });
    };

    if envelope.contains_key("status") {
        let status = envelope.get("status").map(scalar_text).unwrap_or_default();
        let message = envelope
            .get("message")
            .map(scalar_text)
            .unwrap_or_default();
        if status == "0" || message == "NOTOK" {
            let detail = envelope.get("result").map(scalar_text).unwrap_or_default();
            return Err(ExplorerError::Upstream { message, detail });
        }
    } else if let Some(version) = envelope.get("jsonrpc") {
        let version = scalar_text(version);
        if version != JSONRPC_VERSION {
            return Err(ExplorerError::ProtocolVersion { version });
        }
        if let Some(error) = envelope.get("error") {
            let detail = error
                .get("message")
                .map(scalar_text)
                .unwrap_or_else(|| error.to_string());
            return Err(ExplorerError::Upstream {
                message: "JSON-RPC error".to_string(),
                detail,
            });
        }
    }

    envelope
        .remove("result")
        .ok_or_else(|| ExplorerError::MalformedResponse {
            reason: "response has no `result` field".to_string(),
        })
}

/// Strings verbatim, other values as JSON text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
