//! Native type description → JSON-Schema fragment.

use super::error::SchemaError;
use super::types::{FloatKind, IntegerKind, ObjectType, ParameterType, StringFormat, TypeTable};
use crate::config::SchemaConfig;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const UNSIGNED_NOTE: &str = "unsigned integer, greater than or equal to 0";
const FLOAT_NOTE: &str = "floating point number";

/// JSON-Schema keyword and intrinsic description for a type.
///
/// Floating kinds keep the `integer` keyword with a descriptive note; models
/// consuming these definitions rely on the note rather than the keyword.
pub fn type_info(ty: &ParameterType) -> (&'static str, Option<&'static str>) {
    match ty {
        ParameterType::Boolean => ("boolean", None),
        ParameterType::Integer(kind) => ("integer", integer_note(*kind)),
        ParameterType::Float(FloatKind::F32 | FloatKind::F64 | FloatKind::Decimal) => {
            ("integer", Some(FLOAT_NOTE))
        }
        ParameterType::String(format) => ("string", string_note(*format)),
        ParameterType::Enum(_) => ("string", None),
        ParameterType::Array(_) => ("array", None),
        ParameterType::Object(_) | ParameterType::Named(_) => ("object", None),
    }
}

fn integer_note(kind: IntegerKind) -> Option<&'static str> {
    match kind {
        IntegerKind::I8 => Some("8-bit signed integer from -128 to 127"),
        IntegerKind::U8 => Some("8-bit unsigned integer from 0 to 255"),
        IntegerKind::I16 => Some("16-bit signed integer from -32,768 to 32,767"),
        IntegerKind::U16 => Some("16-bit unsigned integer from 0 to 65,535"),
        IntegerKind::I32 | IntegerKind::I64 | IntegerKind::Isize => None,
        IntegerKind::U32 | IntegerKind::U64 | IntegerKind::Usize => Some(UNSIGNED_NOTE),
    }
}

fn string_note(format: StringFormat) -> Option<&'static str> {
    match format {
        StringFormat::Plain => None,
        StringFormat::Char => Some("single character"),
        StringFormat::Uri => Some("absolute URI, e.g. https://example.com/abc"),
        StringFormat::Guid => {
            Some("GUID separated by hyphens xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx")
        }
        StringFormat::DateTime => Some("date and time in ISO 8601 format yyyy-mm-ddThh:mm:ss"),
        StringFormat::Duration => Some("time interval in ISO 8601 format hh:mm:ss"),
    }
}

/// Synthesizes JSON-Schema fragments against a table of named composites.
///
/// Synthesis is pure: the synthesizer holds no mutable state and can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SchemaSynthesizer {
    table: Arc<TypeTable>,
    config: SchemaConfig,
}

impl SchemaSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: Arc<TypeTable>) -> Self {
        self.table = table;
        self
    }

    pub fn with_config(mut self, config: SchemaConfig) -> Self {
        self.config = config;
        self
    }

    pub fn table(&self) -> &Arc<TypeTable> {
        &self.table
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Synthesize the schema of one parameter.
    ///
    /// `description` is the caller-supplied description; it is used only when
    /// the type carries no intrinsic note.
    pub fn synthesize(
        &self,
        ty: &ParameterType,
        description: Option<&str>,
    ) -> Result<Value, SchemaError> {
        let mut walk = Walk {
            table: &self.table,
            config: &self.config,
            expanding: Vec::new(),
        };
        walk.node(ty, description, "$", 1)
    }
}

/// Synthesize with an empty type table and default configuration.
pub fn synthesize(ty: &ParameterType, description: Option<&str>) -> Result<Value, SchemaError> {
    SchemaSynthesizer::new().synthesize(ty, description)
}

struct Walk<'a> {
    table: &'a TypeTable,
    config: &'a SchemaConfig,
    // Named composites on the current path.
    expanding: Vec<String>,
}

impl Walk<'_> {
    fn node(
        &mut self,
        ty: &ParameterType,
        description: Option<&str>,
        path: &str,
        depth: usize,
    ) -> Result<Value, SchemaError> {
        if depth > self.config.max_depth {
            return Err(SchemaError::DepthExceeded {
                max_depth: self.config.max_depth,
                path: path.to_string(),
            });
        }

        let (type_name, note) = type_info(ty);
        let mut node = Map::new();
        node.insert("type".into(), json!(type_name));

        let description = note.or(description).or(self.config.placeholder.as_deref());
        if let Some(desc) = description {
            node.insert("description".into(), json!(desc));
        }

        match ty {
            ParameterType::Enum(members) => {
                node.insert("enum".into(), json!(members));
            }
            ParameterType::Array(element) => {
                let items = self.node(element, None, &format!("{}[]", path), depth + 1)?;
                node.insert("items".into(), items);
            }
            ParameterType::Object(object) => {
                self.properties(&mut node, object, path, depth)?;
            }
            ParameterType::Named(name) => {
                if self.expanding.iter().any(|n| n == name) {
                    let mut cycle = self.expanding.clone();
                    cycle.push(name.clone());
                    return Err(SchemaError::CyclicType { path: cycle });
                }
                match self.table.resolve(name) {
                    Some(object) => {
                        self.expanding.push(name.clone());
                        let result = self.properties(&mut node, object, path, depth);
                        self.expanding.pop();
                        result?;
                    }
                    None => {
                        tracing::debug!(type_name = %name, "unresolved named type, emitting bare object");
                    }
                }
            }
            _ => {}
        }

        Ok(Value::Object(node))
    }

    fn properties(
        &mut self,
        node: &mut Map<String, Value>,
        object: &ObjectType,
        path: &str,
        depth: usize,
    ) -> Result<(), SchemaError> {
        if object.is_empty() {
            return Ok(());
        }
        let mut properties = Map::new();
        for member in &object.members {
            let member_path = format!("{}.{}", path, member.name);
            let schema = self.node(&member.ty, None, &member_path, depth + 1)?;
            properties.insert(member.name.clone(), schema);
        }
        node.insert("properties".into(), Value::Object(properties));
        Ok(())
    }
}
