use super::value::InputValue;
use serde_json::{Map, Value};

/// Read-only view of one workflow node.
///
/// Fields are looked up leniently: a missing or mistyped `class_type`,
/// `inputs` or `_meta.title` behaves as if it were absent.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    pub id: &'a str,
    pub class_type: &'a str,
    inputs: Option<&'a Map<String, Value>>,
    title: Option<&'a str>,
}

impl<'a> Node<'a> {
    /// Builds a view over a graph entry. Returns `None` when the entry is not a record.
    pub fn from_entry(id: &'a str, value: &'a Value) -> Option<Self> {
        let record = value.as_object()?;
        Some(Self {
            id,
            class_type: record
                .get("class_type")
                .and_then(Value::as_str)
                .unwrap_or_default(),
            inputs: record.get("inputs").and_then(Value::as_object),
            title: record
                .get("_meta")
                .and_then(Value::as_object)
                .and_then(|meta| meta.get("title"))
                .and_then(Value::as_str),
        })
    }

    pub fn input(&self, name: &str) -> Option<InputValue<'a>> {
        self.inputs?.get(name).map(InputValue)
    }

    /// The first of `names` whose value is set.
    pub fn first_truthy_input(&self, names: &[&str]) -> Option<InputValue<'a>> {
        names
            .iter()
            .filter_map(|name| self.input(name))
            .find(InputValue::is_truthy)
    }

    /// True when the title (case-insensitive) or the node id contains `needle`.
    pub fn is_labelled(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title
            .is_some_and(|title| title.to_lowercase().contains(&needle))
            || self.id.to_lowercase().contains(&needle)
    }
}
