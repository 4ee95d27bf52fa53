//! Shared fixtures for integration tests.

#![allow(dead_code)]

use browserbench_eval::ConversationRecord;
use serde_json::{json, Value};

/// A user turn.
pub fn user_turn(content: &str) -> Value {
    json!({"role": "user", "content": content})
}

/// An assistant turn calling `get_page_contents`.
pub fn page_call_turn(call_id: &str, url: &str) -> Value {
    json!({
        "role": "assistant",
        "tool_calls": [{
            "id": call_id,
            "type": "function",
            "function": {
                "name": "get_page_contents",
                "arguments": format!("{{\"url\": \"{url}\"}}")
            }
        }]
    })
}

/// A tool-result turn answering `call_id`.
pub fn tool_turn(call_id: &str, content: &str) -> Value {
    json!({"role": "tool", "tool_call_id": call_id, "content": content})
}

/// A conversation record ending in a user question.
pub fn question_record(id: &str, question: &str) -> ConversationRecord {
    ConversationRecord {
        id: id.to_string(),
        conversation: vec![
            user_turn("hello"),
            json!({"role": "assistant", "content": "Hi! How can I help?"}),
            user_turn(question),
        ],
    }
}

/// A well-formed judge verdict payload with the given uniform score.
pub fn verdict_json(score: i64, explanation: &str) -> Value {
    json!({
        "tool_call_accuracy": score,
        "browser_context_awareness": score,
        "assistant_usefulness": score,
        "preference_adherence": score,
        "response_conciseness": score,
        "knowledge": score,
        "explanation": explanation,
        "issues": []
    })
}
