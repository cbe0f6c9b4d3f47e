use serde_json::{Map, Value};

// Request payloads are flat key/value maps specific to each operation.
pub type Payload = Map<String, Value>;

// Only truthy values are transmitted. Empty strings, zero, false and null are
// all treated as "not set", so a literal 0/false/"" cannot be sent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        // Containers are truthy even when empty.
        Value::Array(_) | Value::Object(_) => true,
    }
}

// Drop every field whose value is falsy.
pub fn strip_empty_fields(payload: &Payload) -> Payload {
    payload
        .iter()
        .filter(|(_, value)| is_truthy(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
