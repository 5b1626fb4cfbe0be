//! Out-of-band error channel for dispatch failures.

use crate::error::ToolError;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc::UnboundedSender;

/// Receives tool errors reported during dispatch.
///
/// Reporting is synchronous and must not block; forward to a channel when the
/// consumer is async.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: ToolError);
}

impl<F> ErrorSink for F
where
    F: Fn(ToolError) + Send + Sync,
{
    fn report(&self, error: ToolError) {
        self(error)
    }
}

impl ErrorSink for UnboundedSender<ToolError> {
    fn report(&self, error: ToolError) {
        // A closed receiver means nobody is listening anymore.
        let _ = self.send(error);
    }
}

/// Discards every error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopErrorSink;

impl ErrorSink for NoopErrorSink {
    fn report(&self, _error: ToolError) {}
}

pub fn noop_sink() -> Arc<dyn ErrorSink> {
    Arc::new(NoopErrorSink)
}

/// Logs every error at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, error: ToolError) {
        tracing::warn!(
            kind = %error.kind,
            tool = error.tool().unwrap_or_default(),
            parameter = error.parameter().unwrap_or_default(),
            "{}",
            error.message
        );
    }
}

/// In-memory sink for testing. Keeps the most recent `max_errors`.
#[derive(Debug, Clone)]
pub struct InMemoryErrorSink {
    errors: Arc<RwLock<Vec<ToolError>>>,
    max_errors: usize,
}

impl InMemoryErrorSink {
    pub fn new(max: usize) -> Self {
        Self {
            errors: Arc::new(RwLock::new(Vec::new())),
            max_errors: max,
        }
    }

    pub fn errors(&self) -> Vec<ToolError> {
        self.errors
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn errors_for_tool(&self, tool: &str) -> Vec<ToolError> {
        self.errors()
            .into_iter()
            .filter(|e| e.tool() == Some(tool))
            .collect()
    }

    pub fn clear(&self) {
        self.errors
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.errors.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryErrorSink {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl ErrorSink for InMemoryErrorSink {
    fn report(&self, error: ToolError) {
        let mut errors = self.errors.write().unwrap_or_else(|e| e.into_inner());
        errors.push(error);
        if errors.len() > self.max_errors {
            errors.remove(0);
        }
    }
}

/// Fans each error out to several sinks.
#[derive(Default)]
pub struct CompositeErrorSink {
    sinks: Vec<Arc<dyn ErrorSink>>,
}

impl CompositeErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl ErrorSink for CompositeErrorSink {
    fn report(&self, error: ToolError) {
        for sink in &self.sinks {
            sink.report(error.clone());
        }
    }
}
