use serde_json::{Map, Value};

/// Result of a single sensor query: whatever JSON object the upstream returned,
/// keys kept in upstream order.
pub type Reading = Map<String, Value>;

/// Free-form options passed alongside an operation. Accepted for interface
/// compatibility and currently ignored.
pub type Extra = Map<String, Value>;

/// Payload of a `do_command` call and its result.
pub type Command = Map<String, Value>;

/// A geometry description as the host would receive it.
pub type Geometry = Map<String, Value>;

/// Key under which an error reading carries its message.
pub const ERROR_KEY: &str = "error";

/// Build a reading holding only `{"error": message}`.
pub fn error_reading(message: impl Into<String>) -> Reading {
    let mut reading = Reading::new();
    reading.insert(ERROR_KEY.to_string(), Value::String(message.into()));
    reading
}

/// True when the reading is an error reading rather than upstream data.
pub fn is_error_reading(reading: &Reading) -> bool {
    reading.len() == 1 && reading.get(ERROR_KEY).is_some_and(Value::is_string)
}
