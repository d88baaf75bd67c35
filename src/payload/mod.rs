//! Recovers a [`NodeGraph`] from the raw text stored in a container tag.
//!
//! Tag values arrive in several shapes: a plain JSON object, an object wrapping
//! the graph under `"prompt"` (possibly several times), a JSON string holding
//! any of the former, or a backslash-escaped document that never became valid
//! JSON. Recovery parses with the first [`DecodeStrategy`] that succeeds and
//! then reduces the result until a node mapping remains.

use crate::error::DecodeError;
use crate::workflow::NodeGraph;
use log::debug;
use serde_json::Value;

mod strategy;
pub mod unescape;

pub use strategy::{DecodeStrategy, DirectJson, EscapedJson};

/// Key under which wrapper objects nest the actual workflow.
pub const DEFAULT_WRAPPER_KEY: &str = "prompt";

pub struct PayloadRecoverer {
    strategies: Vec<Box<dyn DecodeStrategy>>,
    wrapper_key: String,
}

pub struct PayloadRecovererBuilder {
    strategies: Vec<Box<dyn DecodeStrategy>>,
    wrapper_key: String,
}

impl PayloadRecovererBuilder {
    pub fn new() -> Self {
        Self {
            strategies: strategy::default_strategies(),
            wrapper_key: DEFAULT_WRAPPER_KEY.to_string(),
        }
    }

    /// Appends a strategy after the defaults.
    pub fn with_strategy(mut self, strategy: Box<dyn DecodeStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn with_wrapper_key(mut self, key: &str) -> Self {
        self.wrapper_key = key.to_string();
        self
    }

    pub fn build(self) -> PayloadRecoverer {
        PayloadRecoverer {
            strategies: self.strategies,
            wrapper_key: self.wrapper_key,
        }
    }
}

impl Default for PayloadRecovererBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for PayloadRecoverer {
    fn default() -> Self {
        PayloadRecovererBuilder::new().build()
    }
}

impl PayloadRecoverer {
    pub fn builder() -> PayloadRecovererBuilder {
        PayloadRecovererBuilder::new()
    }

    /// Recovers the node mapping from `raw`.
    ///
    /// Objects carrying the wrapper key are replaced by the wrapped value, strings
    /// are parsed again, and the first object without the wrapper key is the graph.
    /// Every step consumes a strictly smaller value, so the loop terminates.
    pub fn recover(&self, raw: &str) -> Result<NodeGraph, DecodeError> {
        let mut value = self.parse(raw)?;
        loop {
            value = match value {
                Value::Object(mut map) => match map.remove(&self.wrapper_key) {
                    Some(inner) => {
                        debug!("Unwrapping '{}' wrapper object", self.wrapper_key);
                        inner
                    }
                    None => return Ok(NodeGraph::new(map)),
                },
                Value::String(text) => self.parse(&text)?,
                other => {
                    return Err(DecodeError::NotAMapping {
                        found: json_kind(&other),
                    });
                }
            };
        }
    }

    fn parse(&self, raw: &str) -> Result<Value, DecodeError> {
        if raw.trim().is_empty() {
            return Err(DecodeError::EmptyPayload);
        }

        let mut last_error = None;
        for strategy in &self.strategies {
            match strategy.decode(raw) {
                Ok(value) => {
                    debug!("Payload parsed by '{}' strategy", strategy.name());
                    return Ok(value);
                }
                Err(e) => {
                    debug!("Strategy '{}' failed: {}", strategy.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(DecodeError::Unparsable(message)) => DecodeError::Unparsable(message),
            Some(other) => DecodeError::Unparsable(other.to_string()),
            None => DecodeError::Unparsable("no decode strategies registered".to_string()),
        })
    }
}

/// Convenience wrapper around the default recoverer.
pub fn recover(raw: &str) -> Result<NodeGraph, DecodeError> {
    PayloadRecoverer::default().recover(raw)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
