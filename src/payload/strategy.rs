use super::unescape::{strip_quote_layer, unescape};
use crate::error::DecodeError;
use serde_json::Value;

/// One way of turning a raw tag string into JSON.
///
/// Strategies are tried in registration order and the first one that parses wins.
/// They only parse; unwrapping wrapper objects is left to the recoverer.
pub trait DecodeStrategy: Send + Sync {
    fn name(&self) -> &str;
    fn decode(&self, raw: &str) -> Result<Value, DecodeError>;
}

/// Parses the string as-is.
pub struct DirectJson;

impl DecodeStrategy for DirectJson {
    fn name(&self) -> &str {
        "direct"
    }

    fn decode(&self, raw: &str) -> Result<Value, DecodeError> {
        serde_json::from_str(raw).map_err(|e| DecodeError::Unparsable(e.to_string()))
    }
}

/// Decodes backslash escapes and drops one layer of surrounding quotes before parsing.
///
/// This catches payloads such as `{\"3\": {...}}` that were escaped for embedding
/// but never wrapped into a proper JSON string.
pub struct EscapedJson;

impl DecodeStrategy for EscapedJson {
    fn name(&self) -> &str {
        "escaped"
    }

    fn decode(&self, raw: &str) -> Result<Value, DecodeError> {
        let fixed = unescape(raw);
        serde_json::from_str(strip_quote_layer(&fixed))
            .map_err(|e| DecodeError::Unparsable(e.to_string()))
    }
}

pub(super) fn default_strategies() -> Vec<Box<dyn DecodeStrategy>> {
    vec![Box::new(DirectJson), Box::new(EscapedJson)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn direct_rejects_escaped_payload() {
        assert!(DirectJson.decode(r#"{\"1\": {}}"#).is_err());
    }

    #[test]
    fn escaped_recovers_escaped_payload() {
        let value = EscapedJson.decode(r#""{\"1\": {\"class_type\": \"VAEDecode\"}}""#);
        assert_eq!(value, Ok(json!({"1": {"class_type": "VAEDecode"}})));
    }
}
