//! Response body decoding

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;

/// Decode a JSON body
pub fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|_| ApiError::decode(body))
}

/// Decode a body that may be JSON, or JSON encoded inside a JSON string
///
/// Some endpoints serialize their payload twice, so the body is a quoted
/// string whose contents are the real document.
pub fn decode_lenient<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let outer: Value = decode_json(body)?;
    let document = match outer {
        Value::String(inner) => decode_json::<Value>(&inner)?,
        other => other,
    };
    serde_json::from_value(document).map_err(|_| ApiError::decode(body))
}
