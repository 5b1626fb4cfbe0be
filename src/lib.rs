//! # ai-lib-tools
//!
//! 这是 AI-Protocol 的工具调用桥接库：从原生类型描述合成 JSON Schema，编解码工具信封，并把模型发出的工具调用分派到原生函数。
//!
//! Tool calling bridge for AI-Protocol: exposes native functions to a large
//! language model and routes the model's tool calls back to them.
//!
//! ## Overview
//!
//! A native function is described once, at registration time, by an ordered
//! list of typed parameters. From that description the library synthesizes the
//! JSON-Schema the model sees, and builds a call adapter that binds decoded
//! arguments positionally when the model asks for the tool.
//!
//! ## Key Features
//!
//! - **Schema Synthesis**: [`schema::SchemaSynthesizer`] maps [`schema::ParameterType`]s to JSON-Schema fragments
//! - **Function Descriptors**: [`FunctionDescriptor`] with a bound callable or a pass-through schema
//! - **Envelope Codec**: [`codec`] encodes tool definitions and decodes tool calls
//! - **Dispatch**: [`dispatch()`] decodes, coerces, invokes and encodes, never failing the caller
//! - **Toolsets**: [`Toolset`] routes a model turn's tool calls with bounded concurrency
//!
//! ## Quick Start
//!
//! ```rust
//! use ai_lib_tools::{codec, CallError, FunctionDescriptor, ParameterSpec, Toolset};
//! use ai_lib_tools::schema::ParameterType;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let to_f = FunctionDescriptor::builder("to_fahrenheit")
//!     .description("Convert Celsius to Fahrenheit")
//!     .param(ParameterSpec::required("celsius", ParameterType::float()))
//!     .bind_fn(|args| Ok::<_, CallError>(args.get::<f64>(0)? * 9.0 / 5.0 + 32.0))
//!     .unwrap();
//!
//! let tools = Toolset::new().with_tool(to_f).unwrap();
//! let request_tools = tools.definitions_json();
//! assert_eq!(request_tools[0]["function"]["name"], "to_fahrenheit");
//!
//! // Later, the assistant message asks for the tool.
//! let reply = serde_json::json!({
//!     "role": "assistant",
//!     "tool_calls": [{
//!         "id": "call_1",
//!         "type": "function",
//!         "function": {"name": "to_fahrenheit", "arguments": "{\"celsius\": 20}"}
//!     }]
//! });
//! let calls = codec::decode_tool_calls(&reply);
//! let results = tools.handle_calls(&calls, CancellationToken::new()).await;
//! assert_eq!(results[0].content, "68.0");
//! # });
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`schema`] | Native type descriptions and JSON-Schema synthesis |
//! | [`function`] | Function descriptors and call adapters |
//! | [`codec`] | Tool definition / tool call / tool result codec |
//! | [`dispatch`] | Argument decoding, coercion and invocation |
//! | [`toolset`] | Tool registry, manifests and batch dispatch |
//! | [`types`] | Wire records of the tool calling protocol |
//! | [`config`] | Runtime configuration |

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod function;
pub mod schema;
pub mod toolset;
pub mod types;

// Re-export main types for convenience
pub use config::{SchemaConfig, ToolsConfig};
pub use dispatch::{dispatch, ErrorSink, InvocationOutcome};
pub use function::{CallArgs, CallError, Callable, FunctionDescriptor, ParameterSpec};
pub use toolset::Toolset;
pub use types::{ToolCallMessage, ToolChoice, ToolDefinition, ToolResultMessage};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ToolError, ToolErrorKind};
