//! 工具信封编解码模块：工具定义、工具调用与工具结果的 JSON 编解码。
//!
//! # Tool Envelope Codec
//!
//! Converts [`FunctionDescriptor`]s to the protocol's tool-definition JSON and
//! parses inbound tool-call messages. Decoding from a [`serde_json::Value`] is
//! total: absent textual fields become empty strings. Decoding from text
//! reports malformed JSON as [`Error::Serialization`](crate::Error).
//!
//! ```rust
//! use ai_lib_tools::codec::{decode_tool_definition, encode_tool_definition};
//! use ai_lib_tools::function::FunctionDescriptor;
//! use serde_json::json;
//!
//! let d = FunctionDescriptor::pass_through("ping", "Ping a host", json!({"type": "object"}));
//! let wire = encode_tool_definition(&d);
//! assert_eq!(wire["function"]["name"], "ping");
//!
//! let back = decode_tool_definition(&wire);
//! assert_eq!(back.description(), "Ping a host");
//! assert!(!back.is_invocable());
//! ```

pub mod validator;

pub use validator::{validate_arguments, ArgumentValidator};

use crate::function::FunctionDescriptor;
use crate::types::tool::FUNCTION_TYPE;
use crate::types::{
    FunctionDefinition, ToolCallMessage, ToolChoice, ToolDefinition, ToolResultMessage,
};
use crate::Result;
use serde_json::{json, Value};

/// Tool definition record for a descriptor.
pub fn tool_definition(descriptor: &FunctionDescriptor) -> ToolDefinition {
    ToolDefinition {
        tool_type: FUNCTION_TYPE.to_string(),
        function: FunctionDefinition {
            name: descriptor.name().to_string(),
            description: descriptor.description().to_string(),
            parameters: descriptor.parameters_schema().clone(),
        },
    }
}

/// `{"type":"function","function":{name, description, parameters}}`.
pub fn encode_tool_definition(descriptor: &FunctionDescriptor) -> Value {
    json!({
        "type": FUNCTION_TYPE,
        "function": {
            "name": descriptor.name(),
            "description": descriptor.description(),
            "parameters": descriptor.parameters_schema(),
        }
    })
}

/// Recover a schema-only descriptor from a tool definition.
pub fn decode_tool_definition(value: &Value) -> FunctionDescriptor {
    let function = value.get("function");
    let field = |key: &str| text(function.and_then(|f| f.get(key)));
    let parameters = function
        .and_then(|f| f.get("parameters"))
        .cloned()
        .unwrap_or(Value::Null);
    FunctionDescriptor::pass_through(field("name"), field("description"), parameters)
}

pub fn decode_tool_definition_str(text: &str) -> Result<FunctionDescriptor> {
    let value: Value = serde_json::from_str(text)?;
    Ok(decode_tool_definition(&value))
}

/// Build the tool call the model would issue for `descriptor`.
pub fn encode_tool_call(
    id: impl Into<String>,
    descriptor: &FunctionDescriptor,
    arguments: &Value,
) -> ToolCallMessage {
    ToolCallMessage::new(id, descriptor.name(), arguments.to_string())
}

/// Decode `{id, type, function:{name, arguments}}`.
///
/// `arguments` is normally a JSON-encoded string; an embedded object is
/// re-encoded as text.
pub fn decode_tool_call(value: &Value) -> ToolCallMessage {
    let function = value.get("function");
    let call_type = match value.get("type").and_then(Value::as_str) {
        Some(t) => t.to_string(),
        None => FUNCTION_TYPE.to_string(),
    };
    ToolCallMessage {
        id: text(value.get("id")),
        call_type,
        ..ToolCallMessage::new(
            "",
            text(function.and_then(|f| f.get("name"))),
            text(function.and_then(|f| f.get("arguments"))),
        )
    }
}

pub fn decode_tool_call_str(text: &str) -> Result<ToolCallMessage> {
    let value: Value = serde_json::from_str(text)?;
    Ok(decode_tool_call(&value))
}

/// Decode the `tool_calls` array of an assistant message. Accepts either the
/// message itself or a chat completion response (first choice).
pub fn decode_tool_calls(value: &Value) -> Vec<ToolCallMessage> {
    let message = value
        .pointer("/choices/0/message")
        .unwrap_or(value);
    message
        .get("tool_calls")
        .and_then(Value::as_array)
        .map(|calls| calls.iter().map(decode_tool_call).collect())
        .unwrap_or_default()
}

/// Correlate a result with the call that produced it.
pub fn encode_tool_result(
    call_id: impl Into<String>,
    name: impl Into<String>,
    result: &Value,
) -> ToolResultMessage {
    ToolResultMessage::new(call_id, name, result.to_string())
}

pub fn encode_tool_choice(choice: &ToolChoice) -> Value {
    match choice {
        ToolChoice::None => json!("none"),
        ToolChoice::Auto => json!("auto"),
        ToolChoice::Required => json!("required"),
        ToolChoice::Function(name) => json!({"type": FUNCTION_TYPE, "function": {"name": name}}),
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tool_call_is_total() {
        let call = decode_tool_call(&json!({}));
        assert_eq!(call.id, "");
        assert_eq!(call.name(), "");
        assert_eq!(call.arguments(), "");
        assert_eq!(call.call_type, "function");
    }

    #[test]
    fn test_decode_tool_call_reencodes_embedded_arguments() {
        let call = decode_tool_call(&json!({
            "id": "call_1",
            "type": "function",
            "function": {"name": "add", "arguments": {"a": 1}}
        }));
        assert_eq!(call.arguments(), r#"{"a":1}"#);
    }

    #[test]
    fn test_decode_tool_definition_defaults() {
        let d = decode_tool_definition(&json!({"type": "function"}));
        assert_eq!(d.name(), "");
        assert_eq!(d.description(), "");
        assert_eq!(d.parameters_schema(), &Value::Null);
        assert!(d.is_pass_through());
    }

    #[test]
    fn test_decode_tool_calls_from_response() {
        let response = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {"id": "a", "type": "function", "function": {"name": "f", "arguments": "{}"}},
                        {"id": "b", "type": "function", "function": {"name": "g", "arguments": "{\"x\":1}"}}
                    ]
                }
            }]
        });
        let calls = decode_tool_calls(&response);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].name(), "g");
        assert!(decode_tool_calls(&json!({"role": "assistant"})).is_empty());
    }

    #[test]
    fn test_tool_choice_matches_serde_form() {
        for choice in [
            ToolChoice::None,
            ToolChoice::Auto,
            ToolChoice::Required,
            ToolChoice::Function("f".into()),
        ] {
            assert_eq!(
                encode_tool_choice(&choice),
                serde_json::to_value(&choice).unwrap()
            );
        }
    }

    #[test]
    fn test_malformed_text_is_reported() {
        assert!(decode_tool_call_str("{").is_err());
        assert!(decode_tool_definition_str("[1,").is_err());
    }
}
