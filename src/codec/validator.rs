//! Argument validation against a descriptor's parameters schema.

use crate::function::FunctionDescriptor;
use crate::{Error, ErrorContext, Result};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

/// Compiled parameters schema of one tool.
///
/// Mostly useful on the remote path, where a schema-only descriptor decoded
/// from a tool definition is all that is known about a tool.
pub struct ArgumentValidator {
    tool: String,
    schema: JSONSchema,
}

impl ArgumentValidator {
    pub fn compile(descriptor: &FunctionDescriptor) -> Result<Self> {
        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(descriptor.parameters_schema())
            .map_err(|e| {
                Error::validation_with_context(
                    format!("parameters schema does not compile: {}", e),
                    ErrorContext::new().with_source(descriptor.name()),
                )
            })?;
        Ok(Self {
            tool: descriptor.name().to_string(),
            schema,
        })
    }

    /// Validate a decoded arguments object.
    pub fn validate(&self, arguments: &Value) -> Result<()> {
        let messages: Vec<String> = match self.schema.validate(arguments) {
            Ok(()) => return Ok(()),
            Err(errors) => errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect(),
        };
        Err(Error::validation_with_context(
            format!("arguments do not match the parameters schema: {}", messages.join("; ")),
            ErrorContext::new().with_source(self.tool.clone()),
        ))
    }

    /// Parse a JSON arguments string and validate it.
    pub fn validate_str(&self, arguments: &str) -> Result<Value> {
        let value: Value = serde_json::from_str(arguments)?;
        self.validate(&value)?;
        Ok(value)
    }
}

/// One-shot validation of a JSON arguments string.
pub fn validate_arguments(descriptor: &FunctionDescriptor, arguments: &str) -> Result<Value> {
    ArgumentValidator::compile(descriptor)?.validate_str(arguments)
}
