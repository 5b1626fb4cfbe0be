//! Schema synthesis errors.

/// Failures raised synchronously while synthesizing a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("cyclic type reference: {}", .path.join(" -> "))]
    CyclicType { path: Vec<String> },

    #[error("schema nesting exceeds max depth {max_depth} at '{path}'")]
    DepthExceeded { max_depth: usize, path: String },
}
