//! Tool manifests: schema-only tools declared in YAML or JSON.
//!
//! ```yaml
//! types:
//!   Point:
//!     members:
//!       - { name: x, type: { kind: float, of: f64 } }
//!       - { name: y, type: { kind: float, of: f64 } }
//! tools:
//!   - name: plot
//!     description: Plot a point
//!     parameters:
//!       - name: at
//!         type: { kind: named, of: Point }
//!       - name: color
//!         type: { kind: enum, of: [red, green, blue] }
//!         optional: true
//! ```

use super::Toolset;
use crate::config::{SchemaConfig, ToolsConfig};
use crate::function::{FunctionDescriptor, ParameterSpec};
use crate::schema::{SchemaSynthesizer, TypeTable};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// One declared tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolManifest {
    /// Named composite types the parameters may reference.
    #[serde(default)]
    pub types: TypeTable,
    #[serde(default)]
    pub tools: Vec<ToolDeclaration>,
}

impl ToolManifest {
    /// Load a manifest from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let manifest = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
        .map_err(|e| match e {
            Error::Yaml(_) | Error::Serialization(_) => Error::configuration_with_context(
                "manifest could not be parsed",
                ErrorContext::new()
                    .with_source(path.display().to_string())
                    .with_details(e.to_string()),
            ),
            other => other,
        })?;
        tracing::debug!(path = %path.display(), tools = manifest.tools.len(), "loaded tool manifest");
        Ok(manifest)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Schema-only descriptors for every declared tool, in declaration order.
    pub fn descriptors(&self, config: &SchemaConfig) -> Result<Vec<FunctionDescriptor>> {
        let synthesizer = SchemaSynthesizer::new()
            .with_table(Arc::new(self.types.clone()))
            .with_config(config.clone());
        self.tools
            .iter()
            .map(|tool| {
                FunctionDescriptor::describe_with(
                    &synthesizer,
                    tool.name.clone(),
                    tool.description.clone(),
                    tool.parameters.clone(),
                    None,
                )
            })
            .collect()
    }

    /// A toolset holding the declared tools. Calls to them are answered with
    /// the neutral envelope until native tools replace them.
    pub fn into_toolset(self, config: ToolsConfig) -> Result<Toolset> {
        let descriptors = self.descriptors(&config.schema)?;
        let mut toolset = Toolset::with_config(config);
        for descriptor in descriptors {
            toolset.register(descriptor)?;
        }
        Ok(toolset)
    }
}
