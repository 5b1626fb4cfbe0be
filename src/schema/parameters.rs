//! Builder for the `parameters` object of a tool definition.

use serde_json::{json, Map, Value};

/// Builds `{"type":"object","properties":{...},"required":[...]}`.
///
/// Properties keep insertion order. `required` is always emitted, even when
/// empty.
#[derive(Debug, Clone, Default)]
pub struct ParametersSchemaBuilder {
    properties: Vec<(String, Value)>,
    required: Vec<String>,
}

impl ParametersSchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_property(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.properties.push((name.into(), schema));
        self
    }

    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    pub fn build(self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), json!("object"));

        let mut properties = Map::new();
        for (name, schema) in self.properties {
            properties.insert(name, schema);
        }
        map.insert("properties".into(), properties.into());
        map.insert("required".into(), self.required.into());

        map.into()
    }
}
