//! Runtime configuration for schema synthesis and tool dispatch.
//!
//! Configuration is plain data: it can be built in code, loaded from a YAML or
//! JSON file, and selectively overridden from the environment.
//!
//! ```yaml
//! max_concurrency: 4
//! schema:
//!   placeholder: "Default"
//!   max_depth: 32
//! ```

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`ToolsConfig::max_concurrency`].
pub const ENV_MAX_CONCURRENCY: &str = "AI_LIB_TOOLS_MAX_CONCURRENCY";
/// Environment variable overriding [`SchemaConfig::max_depth`].
pub const ENV_MAX_SCHEMA_DEPTH: &str = "AI_LIB_TOOLS_MAX_SCHEMA_DEPTH";

/// Placeholder description emitted on schema nodes that have neither a
/// type note nor a caller-supplied description.
pub const DEFAULT_PLACEHOLDER: &str = "Default";

/// Schema synthesis options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Description used when a node has no other description. `None` omits it.
    pub placeholder: Option<String>,
    /// Maximum nesting depth of a synthesized schema.
    pub max_depth: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            placeholder: Some(DEFAULT_PLACEHOLDER.to_string()),
            max_depth: 32,
        }
    }
}

impl SchemaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(mut self, placeholder: Option<String>) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn without_placeholder(self) -> Self {
        self.with_placeholder(None)
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Toolset configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Maximum number of tool calls from one model turn dispatched at once.
    pub max_concurrency: usize,
    /// Applied to manifest-declared tools and to [`Toolset::builder`].
    /// Descriptors built with [`FunctionDescriptor::builder`] keep their own
    /// synthesizer config.
    ///
    /// [`Toolset::builder`]: crate::Toolset::builder
    /// [`FunctionDescriptor::builder`]: crate::FunctionDescriptor::builder
    pub schema: SchemaConfig,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            schema: SchemaConfig::default(),
        }
    }
}

impl ToolsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n;
        self
    }

    pub fn with_schema(mut self, schema: SchemaConfig) -> Self {
        self.schema = schema;
        self
    }

    /// Load configuration from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        tracing::debug!(path = %path.display(), "loaded tools config");
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `AI_LIB_TOOLS_*` environment overrides.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(ENV_MAX_CONCURRENCY) {
            self.max_concurrency = parse_env_usize(ENV_MAX_CONCURRENCY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_SCHEMA_DEPTH) {
            self.schema.max_depth = parse_env_usize(ENV_MAX_SCHEMA_DEPTH, &raw)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(Error::configuration_with_context(
                "max_concurrency must be at least 1",
                ErrorContext::new().with_field_path("max_concurrency"),
            ));
        }
        if self.schema.max_depth == 0 {
            return Err(Error::configuration_with_context(
                "max_depth must be at least 1",
                ErrorContext::new().with_field_path("schema.max_depth"),
            ));
        }
        Ok(())
    }
}

fn parse_env_usize(key: &str, raw: &str) -> Result<usize> {
    raw.trim().parse::<usize>().map_err(|e| {
        Error::configuration_with_context(
            format!("invalid value '{}'", raw),
            ErrorContext::new()
                .with_field_path(key)
                .with_details(e.to_string())
                .with_source("env"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn loads_yaml_with_partial_fields() {
        let config = ToolsConfig::from_yaml_str("max_concurrency: 2\n").unwrap();
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.schema, SchemaConfig::default());
    }

    #[test]
    fn loads_json_and_disables_placeholder() {
        let config =
            ToolsConfig::from_json_str(r#"{"schema": {"placeholder": null, "max_depth": 8}}"#)
                .unwrap();
        assert_eq!(config.schema.placeholder, None);
        assert_eq!(config.schema.max_depth, 8);
        assert_eq!(config.max_concurrency, 4);
    }

    #[test]
    fn rejects_zero_concurrency() {
        let err = ToolsConfig::from_yaml_str("max_concurrency: 0").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn env_overrides_apply_and_validate() {
        let vars: HashMap<&str, &str> = [(ENV_MAX_CONCURRENCY, "1"), (ENV_MAX_SCHEMA_DEPTH, "5")]
            .into_iter()
            .collect();
        let config = ToolsConfig::default()
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.schema.max_depth, 5);

        let err = ToolsConfig::default()
            .apply_overrides(|k| (k == ENV_MAX_CONCURRENCY).then(|| "many".to_string()))
            .unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some(ENV_MAX_CONCURRENCY)
        );
    }
}
