//! Conversation normalization.
//!
//! Stored conversations arrive as soft-typed JSON turns, and the storage
//! layer pads every turn with the union of all keys it has ever seen,
//! filling the gaps with explicit nulls. Some providers reject request
//! payloads containing null fields, so normalization strips null-valued
//! keys from each turn before anything else touches the conversation.
//!
//! Normalization is pure and total: it never fails, never reorders, and
//! never touches non-null values.

use serde_json::Value;

/// Remove null-valued keys from a single turn.
///
/// Only top-level keys are considered; nested objects (tool-call entries,
/// argument payloads) are provider-produced and never carry storage nulls.
/// Non-object turns pass through unchanged.
///
/// # Examples
///
/// ```
/// use browserbench_core::normalize_turn;
/// use serde_json::json;
///
/// let turn = json!({"role": "user", "content": "hi", "tool_calls": null});
/// assert_eq!(normalize_turn(&turn), json!({"role": "user", "content": "hi"}));
/// ```
pub fn normalize_turn(turn: &Value) -> Value {
    match turn {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Normalize every turn of a conversation, preserving order and length.
pub fn normalize_conversation(turns: &[Value]) -> Vec<Value> {
    turns.iter().map(normalize_turn).collect()
}
