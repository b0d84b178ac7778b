//! Mapping raw HTTP responses onto the `{code, message, data}` envelope.

use portal_model::{Envelope, UNAUTHORIZED};
use reqwest::StatusCode;
use serde_json::Value;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
pub const REDIRECT_MESSAGE: &str = "Unauthorized (Redirect)";

/// A normalized response plus whether it signals a rejected credential.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub envelope: Envelope,
    pub unauthorized: bool,
}

/// Parses a body as JSON, keeping non-JSON text as a string. Empty bodies
/// become `null`.
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Normalizes a status and body into an envelope.
///
/// A JSON object that already carries `code` and `message` is passed through
/// whatever the status. Otherwise redirects and 401 become authorization
/// failures, 2xx becomes success with the parsed body as data, and anything
/// else keeps its status as the code.
pub fn normalize(status: StatusCode, text: &str) -> Normalized {
    if status.is_redirection() {
        return Normalized {
            envelope: Envelope::failure(UNAUTHORIZED, REDIRECT_MESSAGE),
            unauthorized: true,
        };
    }

    let parsed = parse_body(text);
    if let Some(envelope) = passthrough(&parsed) {
        return Normalized {
            envelope,
            unauthorized: false,
        };
    }

    let code = i64::from(status.as_u16());
    let (envelope, unauthorized) = if status == StatusCode::UNAUTHORIZED {
        (Envelope::failure(UNAUTHORIZED, UNAUTHORIZED_MESSAGE), true)
    } else if status.is_success() {
        let message = if status == StatusCode::CREATED {
            "created"
        } else {
            "ok"
        };
        (Envelope::new(code, message, parsed), false)
    } else {
        let reason = status.canonical_reason().unwrap_or("error");
        (Envelope::failure(code, reason), false)
    };
    Normalized {
        envelope,
        unauthorized,
    }
}

fn passthrough(parsed: &Value) -> Option<Envelope> {
    let object = parsed.as_object()?;
    let code = object.get("code")?;
    let message = object.get("message")?;
    let code = match code {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    let message = match message {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    let data = object.get("data").cloned().unwrap_or(Value::Null);
    Some(Envelope::new(code, message, data))
}
