//! 工具集模块：按名称注册工具描述符，生成请求的 `tools` 数组并路由工具调用。
//!
//! # Toolset
//!
//! A name-keyed registry of [`FunctionDescriptor`]s. It produces the `tools`
//! array for a request and routes a model turn's tool calls to the dispatcher,
//! returning one correlated [`ToolResultMessage`] per call, in call order.
//!
//! | Operation | Description |
//! |-----------|-------------|
//! | [`Toolset::builder`] | Start a descriptor using the toolset's schema config |
//! | [`Toolset::register`] | Add a descriptor; names are unique |
//! | [`Toolset::definitions`] | Tool definitions in registration order |
//! | [`Toolset::handle_call`] | Dispatch one call |
//! | [`Toolset::handle_calls`] | Dispatch a turn's calls with bounded concurrency |
//!
//! Calls naming an unknown tool are reported as `NotInvocable` and answered
//! with the neutral envelope, the same as schema-only descriptors.

pub mod manifest;

pub use manifest::{ToolDeclaration, ToolManifest};

use crate::codec::{encode_tool_definition, encode_tool_result, tool_definition};
use crate::config::ToolsConfig;
use crate::dispatch::{self, neutral_envelope, ErrorSink, TracingErrorSink};
use crate::error::{ErrorContext, ToolError, ToolErrorKind};
use crate::function::{FunctionBuilder, FunctionDescriptor};
use crate::types::{ToolCallMessage, ToolDefinition, ToolResultMessage};
use crate::{Error, Result};
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct Toolset {
    tools: Vec<Arc<FunctionDescriptor>>,
    index: HashMap<String, usize>,
    config: ToolsConfig,
    sink: Arc<dyn ErrorSink>,
}

impl Toolset {
    pub fn new() -> Self {
        Self::with_config(ToolsConfig::default())
    }

    /// Errors go to a [`TracingErrorSink`] until [`Toolset::with_sink`] is used.
    pub fn with_config(config: ToolsConfig) -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
            config,
            sink: Arc::new(TracingErrorSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ToolsConfig {
        &self.config
    }

    /// Start a native descriptor that synthesizes with this toolset's
    /// schema config. Register the result with [`Toolset::register`].
    pub fn builder(&self, name: impl Into<String>) -> FunctionBuilder {
        FunctionDescriptor::builder(name).schema_config(self.config.schema.clone())
    }

    pub fn register(&mut self, descriptor: FunctionDescriptor) -> Result<&mut Self> {
        let name = descriptor.name().to_string();
        if self.index.contains_key(&name) {
            return Err(Error::validation_with_context(
                format!("tool '{}' is already registered", name),
                ErrorContext::new().with_source(name),
            ));
        }
        tracing::debug!(tool = %name, invocable = descriptor.is_invocable(), "registered tool");
        self.index.insert(name, self.tools.len());
        self.tools.push(Arc::new(descriptor));
        Ok(self)
    }

    pub fn with_tool(mut self, descriptor: FunctionDescriptor) -> Result<Self> {
        self.register(descriptor)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<FunctionDescriptor>> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FunctionDescriptor>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| tool_definition(t)).collect()
    }

    /// The request's `tools` array.
    pub fn definitions_json(&self) -> Value {
        Value::Array(self.tools.iter().map(|t| encode_tool_definition(t)).collect())
    }

    /// Dispatch one tool call and wrap the outcome as a tool result.
    pub async fn handle_call(
        &self,
        call: &ToolCallMessage,
        cancellation: CancellationToken,
    ) -> ToolResultMessage {
        let content = match self.get(call.name()) {
            Some(descriptor) => {
                dispatch::dispatch(
                    descriptor,
                    Some(call.arguments()),
                    self.sink.as_ref(),
                    cancellation,
                )
                .await
            }
            None => {
                let error = ToolError::new(
                    ToolErrorKind::NotInvocable,
                    format!("no tool named '{}' is registered", call.name()),
                )
                .with_context(ErrorContext::new().with_source(call.name()));
                tracing::warn!(tool = call.name(), "tool call for unknown tool");
                self.sink.report(error);
                neutral_envelope()
            }
        };
        encode_tool_result(call.id.clone(), call.name(), &content)
    }

    /// Dispatch a turn's tool calls with at most `max_concurrency` in flight.
    /// Results are returned in call order.
    pub async fn handle_calls(
        &self,
        calls: &[ToolCallMessage],
        cancellation: CancellationToken,
    ) -> Vec<ToolResultMessage> {
        let limit = self.config.max_concurrency.max(1);
        tracing::debug!(calls = calls.len(), limit, "dispatching tool calls");
        stream::iter(calls)
            .map(|call| self.handle_call(call, cancellation.clone()))
            .buffered(limit)
            .collect::<Vec<_>>()
            .await
    }
}

impl Default for Toolset {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Toolset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolset")
            .field("tools", &self.names())
            .field("config", &self.config)
            .finish()
    }
}
