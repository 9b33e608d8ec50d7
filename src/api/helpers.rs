//! Shared helpers for WASM API operations
//!
//! Serialization, deserialization and error conversion used by every
//! exported class and function. Each failure is logged before it is handed
//! back to JavaScript as a string `JsValue`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| js_error(format!("{}: {}", error_context, e)))
}

/// Deserialize an optional config object; `undefined`/`null` yield `None`
pub fn deserialize_optional<T: DeserializeOwned>(
    value: JsValue,
    error_context: &str,
) -> Result<Option<T>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    deserialize(value, error_context).map(Some)
}

/// Serialize a value to JavaScript with automatic error handling
///
/// JSON-compatible output: maps become plain objects and `None` becomes `null`.
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| js_error(format!("{}: {}", error_context, e)))
}

// ============================================================================
// Result Conversion Helpers
// ============================================================================

/// Log an error and convert it to a JsValue
pub fn js_error(msg: impl Into<String>) -> JsValue {
    let msg = msg.into();
    log::error!("{}", msg);
    JsValue::from_str(&msg)
}

/// Describe a thrown JS value for logs and error strings
pub fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
