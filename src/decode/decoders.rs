//! Decoder implementations

use super::types::{PageRecords, PageResponse};
use crate::error::{Error, Result};
use crate::types::{json_type_name, JsonObject, JsonValue};

/// Parse one page response body
///
/// Fails when the body is not JSON, is not a JSON object, or carries a
/// non-empty `data` that is not an object.
pub fn parse_page(body: &str) -> Result<PageResponse> {
    let value: JsonValue = serde_json::from_str(body).map_err(|e| Error::Decode {
        message: format!("Failed to parse JSON: {e}"),
    })?;

    let mut root = match value {
        JsonValue::Object(root) => root,
        other => {
            return Err(Error::decode(format!(
                "Expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let code = root.get("code").and_then(JsonValue::as_i64);
    let data = root.remove("data").unwrap_or(JsonValue::Null);

    if !data.is_object() && !is_empty_payload(&data) {
        return Err(Error::decode(format!(
            "Expected 'data' to be an object, got {}",
            json_type_name(&data)
        )));
    }

    Ok(PageResponse { code, data })
}

/// Check whether a payload counts as empty
///
/// Empty means absent or falsy: `null`, `{}`, `[]`, `""`, `false`, `0`.
pub fn is_empty_payload(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64() == Some(0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
    }
}

/// Extract the records under `data_key`
pub fn extract_records(data: &JsonObject, data_key: &str) -> PageRecords {
    match data.get(data_key) {
        None => PageRecords::Missing,
        Some(JsonValue::Array(items)) => PageRecords::List(items.clone()),
        Some(JsonValue::Object(map)) => PageRecords::Map(map.values().cloned().collect()),
        Some(other) => PageRecords::Unexpected(json_type_name(other)),
    }
}
