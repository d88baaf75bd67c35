use super::node::Node;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A decoded workflow: node identifiers mapped to node records, in the order
/// the producing application wrote them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeGraph(Map<String, Value>);

impl NodeGraph {
    pub fn new(nodes: Map<String, Value>) -> Self {
        Self(nodes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw entries, including ones that are not node records.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(id, value)| (id.as_str(), value))
    }

    /// Node records only. Entries that are not JSON objects are skipped.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        self.entries().filter_map(|(id, value)| {
            let node = Node::from_entry(id, value);
            if node.is_none() {
                debug!("Skipping node '{}': not a record", id);
            }
            node
        })
    }
}

impl From<Map<String, Value>> for NodeGraph {
    fn from(nodes: Map<String, Value>) -> Self {
        Self(nodes)
    }
}

impl TryFrom<Value> for NodeGraph {
    type Error = Value;

    /// Succeeds only for JSON objects; the rejected value is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_insertion_order() {
        let graph: NodeGraph =
            serde_json::from_str(r#"{"9": {}, "2": {}, "10": {}}"#).expect("graph");
        let ids: Vec<&str> = graph.entries().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["9", "2", "10"]);
    }

    #[test]
    fn nodes_skip_non_records() {
        let graph = NodeGraph::try_from(json!({
            "1": {"class_type": "VAEDecode"},
            "2": "stray",
            "3": [1, 2]
        }))
        .expect("object");
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.nodes().count(), 1);
    }
}
