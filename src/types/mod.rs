//! 类型系统模块：定义工具调用协议的线上数据结构。
//!
//! # Types Module
//!
//! Wire-level records of the tool calling protocol. Field names are the wire
//! contract and are reproduced exactly.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ToolDefinition`] | `{type:"function", function:{name, description, parameters}}` |
//! | [`ToolCallMessage`] | `{id, type:"function", function:{name, arguments}}` |
//! | [`ToolResultMessage`] | `{role:"tool", tool_call_id, name, content}` |
//! | [`ToolChoice`] | `tool_choice` request field |
//! | [`ChatMessage`] | Chat record carrying tool calls and results |

pub mod message;
pub mod tool;

pub use message::{ChatMessage, MessageRole};
pub use tool::{
    FunctionCall, FunctionDefinition, ToolCallMessage, ToolChoice, ToolDefinition,
    ToolResultMessage,
};
