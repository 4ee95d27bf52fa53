//! Judge invocation.
//!
//! One structured-output request per (conversation, prediction) pair: the
//! conversation is excerpted first so oversized page contents never reach
//! the prompt, then the rubric template is rendered and sent to the judge
//! model with a fixed response schema.

use crate::prompts::JUDGE_PROMPT;
use crate::results::{Prediction, Verdict};
use browserbench_core::{
    clip, truncate_page_contents, ChatBackend, ChatRequest, ProviderError, TruncateConfig,
};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

/// Errors from judging a single pair.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JudgeError {
    /// The judge request itself failed
    #[error("Judge request failed: {0}")]
    Provider(#[from] ProviderError),

    /// The judge returned a message without content
    #[error("Judge response contained no content")]
    NoContent,

    /// The judge content did not parse into a verdict
    #[error("Failed to parse judge verdict: {0}")]
    Parse(String),
}

/// Scores a candidate response against the rubric using a judge model.
///
/// # Example
///
/// ```no_run
/// use browserbench_core::{ChatClient, ChatConfig, Provider};
/// use browserbench_eval::{Judge, Prediction};
/// use browserbench_core::{Message, Role};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = Arc::new(ChatClient::for_provider(Provider::OpenAi, ChatConfig::default())?);
/// let judge = Judge::new(backend, "gpt-5");
///
/// let conversation = vec![json!({"role": "user", "content": "What time is it in Tokyo?"})];
/// let prediction = Prediction::success(Message::text(Role::Assistant, "It's 9pm in Tokyo."));
///
/// let verdict = judge.judge_one(&conversation, &prediction).await?;
/// println!("{}", verdict.explanation);
/// # Ok(())
/// # }
/// ```
pub struct Judge {
    backend: Arc<dyn ChatBackend>,
    model: String,
    truncate: TruncateConfig,
}

impl Judge {
    /// Create a judge using the given backend and model.
    pub fn new(backend: Arc<dyn ChatBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            truncate: TruncateConfig::default(),
        }
    }

    /// Override the page-content excerpt lengths.
    #[must_use]
    pub fn with_truncate(mut self, truncate: TruncateConfig) -> Self {
        self.truncate = truncate;
        self
    }

    /// Score one (conversation, prediction) pair.
    ///
    /// Failures here are per-pair: the caller decides whether to propagate
    /// or record them as error markers.
    pub async fn judge_one(
        &self,
        conversation: &[Value],
        prediction: &Prediction,
    ) -> Result<Verdict, JudgeError> {
        let truncated = truncate_page_contents(conversation, &self.truncate);
        let prompt = render_judge_prompt(&truncated, prediction)?;

        let request = ChatRequest::new(
            &self.model,
            vec![json!({"role": "system", "content": prompt})],
        )
        .with_response_format(verdict_response_format());

        let message = self.backend.chat(request).await?;
        let content = message
            .content
            .as_deref()
            .filter(|content| !content.trim().is_empty())
            .ok_or(JudgeError::NoContent)?;

        serde_json::from_str(content).map_err(|e| {
            JudgeError::Parse(format!("{} (content: {})", e, clip(content, 200)))
        })
    }
}

/// Render the rubric template for one pair.
pub fn render_judge_prompt(
    conversation: &[Value],
    prediction: &Prediction,
) -> Result<String, JudgeError> {
    let conversation_json = serde_json::to_string_pretty(conversation)
        .map_err(|e| JudgeError::Parse(e.to_string()))?;
    let response_json = render_response(prediction)?;
    Ok(JUDGE_PROMPT
        .replace("{conversation}", &conversation_json)
        .replace("{response}", &response_json))
}

/// The response half of the template: the predicted message, or the error
/// marker verbatim when generation failed. The judge scores whatever the
/// prediction stage produced.
fn render_response(prediction: &Prediction) -> Result<String, JudgeError> {
    let value = match (&prediction.message, &prediction.error) {
        (Some(message), _) => {
            serde_json::to_value(message).map_err(|e| JudgeError::Parse(e.to_string()))?
        }
        (None, Some(error)) => json!({"error": error}),
        (None, None) => Value::Null,
    };
    serde_json::to_string_pretty(&value).map_err(|e| JudgeError::Parse(e.to_string()))
}

/// The fixed structured-output schema demanded from the judge.
///
/// Six integer rubric fields (the template instructs 1-5; the range is not
/// re-validated here), one explanation, one issue-tag list.
pub fn verdict_response_format() -> Value {
    let score = |description: &str| {
        json!({
            "type": "integer",
            "minimum": 1,
            "maximum": 5,
            "description": description
        })
    };
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "rubric_verdict",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "tool_call_accuracy": score("Appropriateness and precision of tool calls"),
                    "browser_context_awareness": score("Tracking of tabs, history, and tool outputs"),
                    "assistant_usefulness": score("How well the response achieves the user's goal"),
                    "preference_adherence": score("Faithful use of retrieved preferences"),
                    "response_conciseness": score("Concise, non-repetitive language"),
                    "knowledge": score("Accurate answers without unnecessary tool use"),
                    "explanation": {
                        "type": "string",
                        "description": "Brief rationale for each score referencing specific turns/tool calls"
                    },
                    "issues": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Optional short issue tags"
                    }
                },
                "required": [
                    "tool_call_accuracy",
                    "browser_context_awareness",
                    "assistant_usefulness",
                    "preference_adherence",
                    "response_conciseness",
                    "knowledge",
                    "explanation",
                    "issues"
                ],
                "additionalProperties": false
            }
        }
    })
}
