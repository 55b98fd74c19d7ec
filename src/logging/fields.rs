// SPDX-License-Identifier: Apache-2.0 OR MIT
// Structured fields attached to extended records

use super::template::NULL_STR;
use serde::Serialize;

/// Structured fields for the extended record format
///
/// Keys are emitted in sorted order. Build one with the [`fields!`] macro:
///
/// ```
/// let fields = logcore::fields! { "count" => 3, "route" => "/" };
/// assert_eq!(fields["count"], 3);
/// ```
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Convert one field value, mapping serialization failures to `null`
pub fn field_value<T>(value: &T) -> serde_json::Value
where
    T: Serialize + ?Sized,
{
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

/// Serialize structured fields for the `Extra` template slot.
///
/// Absent, null, empty and unserializable values all render as `null`; a
/// serialization failure is never reported to the caller.
pub fn encode_extra<F>(fields: Option<&F>) -> String
where
    F: Serialize + ?Sized,
{
    let Some(fields) = fields else {
        return NULL_STR.to_string();
    };
    match serde_json::to_value(fields) {
        Ok(serde_json::Value::Null) => NULL_STR.to_string(),
        Ok(serde_json::Value::Object(map)) if map.is_empty() => NULL_STR.to_string(),
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|_| NULL_STR.to_string()),
        Err(_) => NULL_STR.to_string(),
    }
}
