//! Minimal chat message record carrying tool calls and tool results

use super::tool::{ToolCallMessage, ToolResultMessage};
use serde::{Deserialize, Serialize};

/// Chat message as exchanged with the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageRole::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }

    /// Assistant turn that requests tool calls.
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCallMessage>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: None,
            tool_calls,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

impl ToolResultMessage {
    /// Role-`"tool"` chat message for the next request.
    pub fn into_chat_message(self) -> ChatMessage {
        self.into()
    }
}

impl From<ToolResultMessage> for ChatMessage {
    fn from(result: ToolResultMessage) -> Self {
        Self {
            role: MessageRole::Tool,
            content: Some(result.content),
            tool_calls: Vec::new(),
            tool_call_id: Some(result.tool_call_id),
            name: Some(result.name),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_result_becomes_tool_role_message() {
        let msg: ChatMessage = ToolResultMessage::new("call_9", "lookup", "42").into();
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"role": "tool", "content": "42", "tool_call_id": "call_9", "name": "lookup"})
        );
    }

    #[test]
    fn assistant_tool_calls_omit_content() {
        let msg = ChatMessage::assistant_tool_calls(vec![ToolCallMessage::new("c1", "f", "{}")]);
        let v = serde_json::to_value(&msg).unwrap();
        assert!(v.get("content").is_none());
        assert_eq!(v["tool_calls"][0]["function"]["name"], "f");
        assert!(msg.has_tool_calls());
    }
}
