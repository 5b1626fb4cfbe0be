use crate::schema::SchemaError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Parameter or configuration key that caused the error (e.g., "celsius", "values[2]")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error, usually the tool name or the loader that failed
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Kinds of failure that can happen while describing or dispatching a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolErrorKind {
    ArgumentParseError,
    MissingRequiredParameter,
    TypeCoercionError,
    UnknownEnumMember,
    CallableThrew,
    DuplicateParameter,
    NotInvocable,
}

impl ToolErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorKind::ArgumentParseError => "ArgumentParseError",
            ToolErrorKind::MissingRequiredParameter => "MissingRequiredParameter",
            ToolErrorKind::TypeCoercionError => "TypeCoercionError",
            ToolErrorKind::UnknownEnumMember => "UnknownEnumMember",
            ToolErrorKind::CallableThrew => "CallableThrew",
            ToolErrorKind::DuplicateParameter => "DuplicateParameter",
            ToolErrorKind::NotInvocable => "NotInvocable",
        }
    }
}

impl std::fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool-level failure. Dispatch reports these through an
/// [`ErrorSink`](crate::dispatch::ErrorSink) instead of returning them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}{}", format_context(.context))]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub context: ErrorContext,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    /// Tool name the error belongs to, if known.
    pub fn tool(&self) -> Option<&str> {
        self.context.source.as_deref()
    }

    /// Parameter the error belongs to, if any.
    pub fn parameter(&self) -> Option<&str> {
        self.context.field_path.as_deref()
    }
}

/// Unified error type for synchronous operations (description, codec, config).
#[derive(Debug, Error)]
pub enum Error {
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Schema synthesis error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Signature mismatch for '{tool}': declared [{declared}], callable expects [{expected}]")]
    SignatureMismatch {
        tool: String,
        declared: String,
        expected: String,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML syntax error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Kind of the underlying tool error, if this is one.
    pub fn tool_kind(&self) -> Option<ToolErrorKind> {
        match self {
            Error::Tool(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Tool(ToolError { context, .. })
            | Error::Configuration { context, .. }
            | Error::Validation { context, .. } => Some(context),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_error_display_includes_context() {
        let err = ToolError::new(ToolErrorKind::MissingRequiredParameter, "missing 'celsius'")
            .with_context(
                ErrorContext::new()
                    .with_field_path("celsius")
                    .with_source("to_fahrenheit"),
            );
        assert_eq!(
            err.to_string(),
            "MissingRequiredParameter: missing 'celsius' (field: celsius, source: to_fahrenheit)"
        );
        assert_eq!(err.tool(), Some("to_fahrenheit"));
        assert_eq!(err.parameter(), Some("celsius"));
    }

    #[test]
    fn tool_kind_is_exposed_through_error() {
        let err: Error = ToolError::new(ToolErrorKind::DuplicateParameter, "dup").into();
        assert_eq!(err.tool_kind(), Some(ToolErrorKind::DuplicateParameter));
        assert!(err.context().is_some());
    }
}
