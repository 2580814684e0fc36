use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;

use crate::error::DecodeError;

pub fn decode_envelope(body: &[u8]) -> Result<Value, DecodeError> {
    let envelope = serde_json::from_slice::<Value>(body).map_err(|e| {
        DecodeError::MalformedEnvelope(format!("request body is not a json document: {e}"))
    })?;

    extract_notification(&envelope)
}

pub fn extract_notification(envelope: &Value) -> Result<Value, DecodeError> {
    let data = envelope
        .get("message")
        .and_then(|message| message.get("data"))
        .ok_or_else(|| {
            DecodeError::MalformedEnvelope(
                "expected a `message` object carrying a `data` field".to_string(),
            )
        })?;

    let encoded = data.as_str().ok_or_else(|| {
        DecodeError::InvalidEncoding("data field should be a string".to_string())
    })?;

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|e| DecodeError::InvalidEncoding(e.to_string()))?;

    let text = String::from_utf8(decoded)
        .map_err(|e| DecodeError::InvalidEncoding(format!("decoded data is not UTF-8: {e}")))?;

    serde_json::from_str(text.trim()).map_err(|e| DecodeError::InvalidPayload(e.to_string()))
}
