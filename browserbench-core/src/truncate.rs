//! Page-content truncation for judge-bound conversations.
//!
//! Tool results from `get_page_contents` can be arbitrarily large (whole web
//! pages). Before a conversation is embedded in the judge prompt, those
//! results are replaced with a head+tail excerpt so the prompt stays bounded
//! while the judge can still sanity-check that the call was relevant. All
//! other turns pass through byte-identical.

use crate::catalog::GET_PAGE_CONTENTS;
use serde_json::Value;

/// Literal marker spliced between the head and tail of an excerpt.
pub const OMISSION_MARKER: &str = " ... [TRUNCATED] ... ";

/// How much of a page-content result to keep on each side of the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncateConfig {
    /// Characters kept from the start of the content (default: 50)
    pub keep_head: usize,

    /// Characters kept from the end of the content (default: 50)
    pub keep_tail: usize,
}

impl Default for TruncateConfig {
    fn default() -> Self {
        Self {
            keep_head: 50,
            keep_tail: 50,
        }
    }
}

impl TruncateConfig {
    /// Create a config with explicit head and tail lengths.
    pub fn new(keep_head: usize, keep_tail: usize) -> Self {
        Self {
            keep_head,
            keep_tail,
        }
    }

    /// Set the number of characters kept from the start.
    #[must_use]
    pub fn with_keep_head(mut self, keep_head: usize) -> Self {
        self.keep_head = keep_head;
        self
    }

    /// Set the number of characters kept from the end.
    #[must_use]
    pub fn with_keep_tail(mut self, keep_tail: usize) -> Self {
        self.keep_tail = keep_tail;
        self
    }

    /// Combined threshold below which content is never touched.
    pub fn threshold(&self) -> usize {
        self.keep_head + self.keep_tail
    }
}

/// Excerpt oversized `get_page_contents` results in a conversation.
///
/// A tool turn is excerpted only when its `tool_call_id` matches a
/// `get_page_contents` call in the immediately preceding assistant turn and
/// its string content is longer than `keep_head + keep_tail` characters.
/// Unmatched ids are silently skipped, not treated as errors. Character
/// counting is Unicode-aware.
pub fn truncate_page_contents(turns: &[Value], config: &TruncateConfig) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(turns.len());
    for turn in turns {
        let mut turn = turn.clone();
        if is_page_contents_result(&turn, out.last()) {
            if let Some(content) = turn.get("content").and_then(Value::as_str) {
                if let Some(excerpted) = excerpt(content, config) {
                    turn["content"] = Value::String(excerpted);
                }
            }
        }
        out.push(turn);
    }
    out
}

/// Whether `turn` is a tool result answering a `get_page_contents` call
/// from the immediately preceding turn.
fn is_page_contents_result(turn: &Value, previous: Option<&Value>) -> bool {
    if turn.get("role").and_then(Value::as_str) != Some("tool") {
        return false;
    }
    let Some(call_id) = turn.get("tool_call_id").and_then(Value::as_str) else {
        return false;
    };
    let Some(previous) = previous else {
        return false;
    };
    if previous.get("role").and_then(Value::as_str) != Some("assistant") {
        return false;
    }
    let Some(calls) = previous.get("tool_calls").and_then(Value::as_array) else {
        return false;
    };
    calls.iter().any(|call| {
        call.get("id").and_then(Value::as_str) == Some(call_id)
            && call.pointer("/function/name").and_then(Value::as_str) == Some(GET_PAGE_CONTENTS)
    })
}

/// Build the head+marker+tail excerpt, or `None` when content is at or
/// under the threshold.
fn excerpt(content: &str, config: &TruncateConfig) -> Option<String> {
    let total = content.chars().count();
    if total <= config.threshold() {
        return None;
    }
    let head: String = content.chars().take(config.keep_head).collect();
    let tail: String = content.chars().skip(total - config.keep_tail).collect();
    Some(format!("{head}{OMISSION_MARKER}{tail}"))
}

/// Clip text to a maximum character count for log and error previews.
///
/// # Examples
///
/// ```
/// use browserbench_core::clip;
///
/// assert_eq!(clip("hello world", 8), "hello...");
/// assert_eq!(clip("short", 10), "short");
/// ```
pub fn clip(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", clipped.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page_call_turn(call_id: &str) -> Value {
        json!({
            "role": "assistant",
            "tool_calls": [{
                "id": call_id,
                "type": "function",
                "function": {"name": "get_page_contents", "arguments": "{\"url\": \"https://example.com\"}"}
            }]
        })
    }

    fn tool_turn(call_id: &str, content: &str) -> Value {
        json!({"role": "tool", "tool_call_id": call_id, "content": content})
    }

    #[test]
    fn test_oversized_page_content_is_excerpted() {
        let content = "a".repeat(40) + &"b".repeat(40) + &"c".repeat(40);
        let turns = vec![page_call_turn("call_1"), tool_turn("call_1", &content)];
        let config = TruncateConfig::default();

        let out = truncate_page_contents(&turns, &config);
        let excerpted = out[1]["content"].as_str().unwrap();

        assert_eq!(
            excerpted.chars().count(),
            config.keep_head + OMISSION_MARKER.chars().count() + config.keep_tail
        );
        assert!(excerpted.starts_with(&content[..50]));
        assert!(excerpted.ends_with(&content[content.len() - 50..]));
        assert!(excerpted.contains(OMISSION_MARKER));
    }

    #[test]
    fn test_content_at_threshold_untouched() {
        let content = "x".repeat(100);
        let turns = vec![page_call_turn("call_1"), tool_turn("call_1", &content)];

        let out = truncate_page_contents(&turns, &TruncateConfig::default());
        assert_eq!(out[1]["content"].as_str().unwrap(), content);
    }

    #[test]
    fn test_content_one_over_threshold_is_excerpted() {
        let content = "x".repeat(101);
        let turns = vec![page_call_turn("call_1"), tool_turn("call_1", &content)];

        let out = truncate_page_contents(&turns, &TruncateConfig::default());
        assert_ne!(out[1]["content"].as_str().unwrap(), content);
    }

    #[test]
    fn test_other_tools_untouched() {
        let content = "h".repeat(500);
        let turns = vec![
            json!({
                "role": "assistant",
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "search_history", "arguments": "{\"search_term\": \"rust\"}"}
                }]
            }),
            tool_turn("call_1", &content),
        ];

        let out = truncate_page_contents(&turns, &TruncateConfig::default());
        assert_eq!(out[1]["content"].as_str().unwrap(), content);
    }

    #[test]
    fn test_unmatched_call_id_is_skipped() {
        let content = "y".repeat(500);
        let turns = vec![page_call_turn("call_1"), tool_turn("call_other", &content)];

        let out = truncate_page_contents(&turns, &TruncateConfig::default());
        assert_eq!(out[1]["content"].as_str().unwrap(), content);
    }

    #[test]
    fn test_tool_turn_without_preceding_assistant_is_skipped() {
        let content = "z".repeat(500);
        let turns = vec![
            json!({"role": "user", "content": "read this page"}),
            tool_turn("call_1", &content),
        ];

        let out = truncate_page_contents(&turns, &TruncateConfig::default());
        assert_eq!(out[1]["content"].as_str().unwrap(), content);
    }

    #[test]
    fn test_leading_tool_turn_is_skipped() {
        let content = "z".repeat(500);
        let turns = vec![tool_turn("call_1", &content)];

        let out = truncate_page_contents(&turns, &TruncateConfig::default());
        assert_eq!(out[0]["content"].as_str().unwrap(), content);
    }

    #[test]
    fn test_non_string_content_is_skipped() {
        let turns = vec![
            page_call_turn("call_1"),
            json!({"role": "tool", "tool_call_id": "call_1", "content": 12345}),
        ];

        let out = truncate_page_contents(&turns, &TruncateConfig::default());
        assert_eq!(out[1]["content"], 12345);
    }

    #[test]
    fn test_order_and_length_preserved() {
        let content = "p".repeat(500);
        let turns = vec![
            json!({"role": "user", "content": "open the page"}),
            page_call_turn("call_1"),
            tool_turn("call_1", &content),
            json!({"role": "assistant", "content": "done"}),
            json!({"role": "user", "content": "thanks"}),
        ];

        let out = truncate_page_contents(&turns, &TruncateConfig::default());
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], turns[0]);
        assert_eq!(out[1], turns[1]);
        assert_eq!(out[3], turns[3]);
        assert_eq!(out[4], turns[4]);
    }

    #[test]
    fn test_multiple_calls_in_one_assistant_turn() {
        let content = "q".repeat(500);
        let turns = vec![
            json!({
                "role": "assistant",
                "tool_calls": [
                    {"id": "call_a", "type": "function", "function": {"name": "get_tabs", "arguments": "{}"}},
                    {"id": "call_b", "type": "function", "function": {"name": "get_page_contents", "arguments": "{\"url\": \"https://example.com\"}"}}
                ]
            }),
            tool_turn("call_b", &content),
        ];

        let out = truncate_page_contents(&turns, &TruncateConfig::default());
        assert!(out[1]["content"].as_str().unwrap().contains(OMISSION_MARKER));
    }

    #[test]
    fn test_unicode_content_counts_characters() {
        let content = "😀".repeat(120);
        let turns = vec![page_call_turn("call_1"), tool_turn("call_1", &content)];
        let config = TruncateConfig::default();

        let out = truncate_page_contents(&turns, &config);
        let excerpted = out[1]["content"].as_str().unwrap();
        assert_eq!(
            excerpted.chars().count(),
            config.keep_head + OMISSION_MARKER.chars().count() + config.keep_tail
        );
    }

    #[test]
    fn test_custom_config_lengths() {
        let content: String = ('a'..='z').cycle().take(60).collect();
        let config = TruncateConfig::new(10, 5);
        let turns = vec![page_call_turn("call_1"), tool_turn("call_1", &content)];

        let out = truncate_page_contents(&turns, &config);
        let excerpted = out[1]["content"].as_str().unwrap();
        assert!(excerpted.starts_with(&content[..10]));
        assert!(excerpted.ends_with(&content[55..]));
    }

    #[test]
    fn test_clip_short_string() {
        assert_eq!(clip("hello", 10), "hello");
    }

    #[test]
    fn test_clip_long_string() {
        assert_eq!(clip("hello world", 8), "hello...");
    }

    #[test]
    fn test_config_builders() {
        let config = TruncateConfig::default()
            .with_keep_head(20)
            .with_keep_tail(30);
        assert_eq!(config.keep_head, 20);
        assert_eq!(config.keep_tail, 30);
        assert_eq!(config.threshold(), 50);
    }
}
