use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// Request payload for PIN verification.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyRequest {
    pub pin: Option<Value>,
}

// Request payload for a check-in.
#[derive(Debug, Default, Deserialize)]
pub struct CheckinRequest {
    pub id: Option<Value>,
    #[serde(rename = "checkedInAt")]
    pub checked_in_at: Option<Value>,
}

// Plain `{ok}` response used by verify, logout and me.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

// Response payload for a recorded check-in.
#[derive(Debug, Serialize)]
pub struct CheckinResponse {
    pub ok: bool,
    pub id: String,
    #[serde(rename = "checkedInAt")]
    pub checked_in_at: String,
}

// Response payload listing check-ins for the event.
#[derive(Debug, Serialize)]
pub struct CheckinsResponse {
    pub ok: bool,
    pub checkins: BTreeMap<String, String>,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    pub error: String,
}

// Reads a body leniently: missing or malformed JSON behaves like `{}`.
pub fn parse_body<T>(body: &[u8]) -> T
where
    T: Default + for<'de> Deserialize<'de>,
{
    serde_json::from_slice(body).unwrap_or_default()
}

// Coerces a loosely typed field to text. Null, false, zero and "" count as absent.
pub fn loose_string(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
