//! Canonical chat message shapes.
//!
//! Every provider speaks the same wire dialect for responses: a message with
//! a role, optional text content, and optional tool-call directives. The
//! types here are the typed form of that shape; stored conversations stay
//! soft-typed JSON (see [`crate::normalize`]) because the storage layer may
//! attach extra keys the canonical shape does not know about.

use serde::{Deserialize, Serialize};

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// End-user turn
    User,
    /// Model turn (text and/or tool calls)
    Assistant,
    /// Tool-result turn, correlated by `tool_call_id`
    Tool,
}

/// The function half of a tool call: name plus JSON-encoded arguments.
///
/// Arguments stay a raw JSON string because that is how every
/// OpenAI-compatible API transmits them; decoding is the consumer's choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the tool being invoked
    pub name: String,
    /// JSON-encoded argument object
    pub arguments: String,
}

/// A structured directive from the assistant requesting a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier correlating this call with a later tool-result turn
    pub id: String,
    /// Call kind; always `"function"` for the providers we target
    #[serde(rename = "type", default = "default_tool_call_kind")]
    pub kind: String,
    /// The function being called
    pub function: FunctionCall,
}

fn default_tool_call_kind() -> String {
    "function".to_string()
}

/// A single turn in canonical form.
///
/// `None` fields are omitted on serialization so round-tripped messages
/// never grow explicit nulls (some providers reject them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who produced this turn
    pub role: Role,

    /// Text content, absent on tool-call-only assistant turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tool invocations requested by an assistant turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// For tool turns: the id of the call this turn answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Create a plain text message.
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Whether this message carries any tool-call directives.
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }
}
