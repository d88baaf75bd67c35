use serde_json::Value;
use std::fmt;

/// Borrowed view over a node input value, rendered the way the report prints it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputValue<'a>(pub &'a Value);

impl<'a> InputValue<'a> {
    /// Whether the value counts as "set" when picking between fallbacks.
    ///
    /// `null`, `false`, zero and empty strings/collections are unset, so a
    /// `strength_model` of `0` defers to `strength`.
    pub fn is_truthy(&self) -> bool {
        match self.0 {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.0.as_str()
    }
}

impl fmt::Display for InputValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "None"),
            // serde_json keeps the written form: `1.0` stays `1.0`, `1` stays `1`
            other => write!(f, "{}", other),
        }
    }
}
