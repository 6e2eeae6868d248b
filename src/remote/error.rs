//! Turning HTTP responses into [`RequestError`]s.

use serde::Deserialize;

use crate::error::RequestError;

/// Longest slice of a non-JSON error body kept in a message.
const MAX_BODY_IN_MESSAGE: usize = 200;

/// Error body in the `{"detail": ...}` shape the issue API uses. `detail`
/// may also be a list of validation problems, so it is kept as raw JSON.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Build the error for a non-success response.
pub fn server_error(status: reqwest::StatusCode, body: &[u8]) -> RequestError {
    RequestError::Server {
        status: status.as_u16(),
        message: error_message(status, body),
    }
}

fn error_message(status: reqwest::StatusCode, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return match parsed.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string();
    }

    text.chars().take(MAX_BODY_IN_MESSAGE).collect()
}

/// Decode a success body, reporting anything unexpected as malformed.
pub fn decode_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, RequestError> {
    serde_json::from_slice(body).map_err(|e| RequestError::MalformedResponse(e.to_string()))
}
