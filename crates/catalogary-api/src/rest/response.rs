// Response envelope and error-body interpretation
//
// Every call yields a `Response` carrying status, headers, raw bytes, and the
// parsed payload. Whether an error status raises is decided by the engine;
// this module only knows how to read bodies.

use std::borrow::Cow;

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::error::Error;

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The body was empty.
    Empty,
    /// The body parsed as JSON.
    Json(Value),
    /// The body was not JSON; the text is passed through.
    Text(String),
}

impl Payload {
    /// Decode a body: empty → [`Empty`](Self::Empty), invalid JSON → [`Text`](Self::Text).
    pub fn from_body(body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::Empty;
        }
        match serde_json::from_slice(body) {
            Ok(value) => Self::Json(value),
            Err(e) => {
                warn!(error = %e, "response body is not JSON, returning text");
                Self::Text(String::from_utf8_lossy(body).into_owned())
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Collapse into a JSON value: empty → `null`, text → JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Json(v) => v,
            Self::Text(s) => Value::String(s),
        }
    }
}

/// The full outcome of one HTTP call.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub url: Url,
    pub body: Bytes,
    pub payload: Payload,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, url: Url, body: Bytes) -> Self {
        let payload = Payload::from_body(&body);
        Self {
            status,
            headers,
            url,
            body,
            payload,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Deserialize the body into a typed model.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| {
            let body = self.text().into_owned();
            Error::Deserialization {
                message: format!("{e} (from {})", self.url),
                body,
            }
        })
    }

    /// Raise for statuses in `[400, 600)` with the best diagnostic the body offers.
    pub fn error_for_status(&self) -> Result<(), Error> {
        let status = self.status.as_u16();
        if !(400..600).contains(&status) {
            return Ok(());
        }
        let url = self.url.to_string();
        match error_message(&self.body) {
            Some(message) => Err(Error::Http {
                status,
                url,
                message,
            }),
            None => Err(Error::HttpStatus { status, url }),
        }
    }
}

/// Assemble a diagnostic from an error body.
///
/// Preference order: the `errorMessages` list (extended by any `errors`
/// entries), then `field: message` pairs from an `errors` object or from the
/// top-level object itself. Returns `None` when the body is not a JSON object
/// or yields no text.
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let obj = value.as_object()?;

    let lines: Vec<String> = if let Some(messages) = obj.get("errorMessages") {
        let mut lines: Vec<String> = match messages {
            Value::Array(items) => items.iter().map(value_text).collect(),
            other => vec![value_text(other)],
        };
        if let Some(errors) = obj.get("errors").and_then(Value::as_object) {
            lines.extend(errors.values().map(error_entry_text));
        }
        lines
    } else {
        let pairs = obj.get("errors").and_then(Value::as_object).unwrap_or(obj);
        pairs
            .iter()
            .map(|(field, v)| format!("{field}: {}", error_entry_text(v)))
            .collect()
    };

    let message = lines
        .into_iter()
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    (!message.is_empty()).then_some(message)
}

fn error_entry_text(value: &Value) -> String {
    match value {
        Value::Object(m) => m.get("message").map(value_text).unwrap_or_default(),
        other => value_text(other),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn body(v: &Value) -> Vec<u8> {
        serde_json::to_vec(v).unwrap_or_default()
    }

    #[test]
    fn empty_body_is_empty_payload() {
        assert_eq!(Payload::from_body(b""), Payload::Empty);
    }

    #[test]
    fn invalid_json_is_passed_through_as_text() {
        assert_eq!(
            Payload::from_body(b"<html>oops</html>"),
            Payload::Text("<html>oops</html>".into())
        );
    }

    #[test]
    fn error_messages_are_preferred() {
        let msg = error_message(&body(&json!({
            "errorMessages": ["not found", "gone"],
            "errors": {"key": "bad key"},
            "other": "ignored"
        })));
        assert_eq!(msg.as_deref(), Some("not found\ngone\nbad key"));
    }

    #[test]
    fn nested_error_objects_contribute_their_message() {
        let msg = error_message(&body(&json!({
            "errorMessages": [],
            "errors": {"date_from": {"message": "invalid date"}}
        })));
        assert_eq!(msg.as_deref(), Some("invalid date"));
    }

    #[test]
    fn errors_object_yields_field_pairs() {
        let msg = error_message(&body(&json!({
            "errors": {"date_from": "required", "scope": "unknown"}
        })));
        assert_eq!(msg.as_deref(), Some("date_from: required\nscope: unknown"));
    }

    #[test]
    fn plain_object_yields_field_pairs() {
        let msg = error_message(&body(&json!({"message": "Not found", "code": 404})));
        assert_eq!(msg.as_deref(), Some("message: Not found\ncode: 404"));
    }

    #[test]
    fn unparseable_or_non_object_bodies_yield_nothing() {
        assert_eq!(error_message(b"Internal Server Error"), None);
        assert_eq!(error_message(b"[1, 2]"), None);
        assert_eq!(error_message(b"{}"), None);
    }
}
