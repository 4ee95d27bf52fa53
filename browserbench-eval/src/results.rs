//! Pipeline output types: predictions, verdicts, and the rubric summary.
//!
//! Every stage hands its output fully formed to the next; nothing here is
//! mutated after creation. Failed items are represented as explicit error
//! markers so a completed run always yields full-length collections.

use browserbench_core::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The candidate model's answer for one conversation, or an error marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// The assistant message (absent when generation failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// Error marker when generation failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Prediction {
    /// Create a successful prediction.
    pub fn success(message: Message) -> Self {
        Self {
            message: Some(message),
            error: None,
        }
    }

    /// Create an error-marker prediction.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            message: None,
            error: Some(error.into()),
        }
    }

    /// Whether this prediction carries a message.
    pub fn is_success(&self) -> bool {
        self.message.is_some() && self.error.is_none()
    }
}

/// One persisted prediction row: the conversation it answers plus the
/// prediction itself, keyed by conversation id.
///
/// The stored conversation is the normalized one, so a reloaded artifact is
/// sufficient to run the evaluation stage on its own (`--skip-inference`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Conversation identifier
    pub id: String,
    /// Normalized conversation turns
    pub conversation: Vec<Value>,
    /// The prediction or its error marker
    pub prediction: Prediction,
}

/// The six rubric dimensions, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    BrowserContextAwareness,
    AssistantUsefulness,
    PreferenceAdherence,
    ResponseConciseness,
    ToolCallAccuracy,
    Knowledge,
}

impl Dimension {
    /// All dimensions, in reporting order.
    pub const ALL: [Dimension; 6] = [
        Dimension::BrowserContextAwareness,
        Dimension::AssistantUsefulness,
        Dimension::PreferenceAdherence,
        Dimension::ResponseConciseness,
        Dimension::ToolCallAccuracy,
        Dimension::Knowledge,
    ];

    /// The field name used in judge output and artifacts.
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::BrowserContextAwareness => "browser_context_awareness",
            Dimension::AssistantUsefulness => "assistant_usefulness",
            Dimension::PreferenceAdherence => "preference_adherence",
            Dimension::ResponseConciseness => "response_conciseness",
            Dimension::ToolCallAccuracy => "tool_call_accuracy",
            Dimension::Knowledge => "knowledge",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured judge output for one (conversation, prediction) pair.
///
/// Score fields stay raw JSON values: the judge is instructed to emit
/// integers 1-5, but out-of-range or non-numeric values are tolerated here
/// and resolved at aggregation time, never clamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub tool_call_accuracy: Value,
    pub browser_context_awareness: Value,
    pub assistant_usefulness: Value,
    pub preference_adherence: Value,
    pub response_conciseness: Value,
    pub knowledge: Value,

    /// Free-text rationale referencing specific turns
    pub explanation: String,

    /// Optional short issue tags (e.g. `redundant_call`, `wrong_tab`)
    #[serde(default)]
    pub issues: Vec<String>,
}

impl Verdict {
    /// The raw score value for one dimension.
    pub fn score(&self, dimension: Dimension) -> &Value {
        match dimension {
            Dimension::ToolCallAccuracy => &self.tool_call_accuracy,
            Dimension::BrowserContextAwareness => &self.browser_context_awareness,
            Dimension::AssistantUsefulness => &self.assistant_usefulness,
            Dimension::PreferenceAdherence => &self.preference_adherence,
            Dimension::ResponseConciseness => &self.response_conciseness,
            Dimension::Knowledge => &self.knowledge,
        }
    }
}

/// One row of the verdicts artifact: a verdict or its error marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictRecord {
    /// Conversation identifier
    pub id: String,

    /// The judge's verdict (absent when judging failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,

    /// Error marker when judging failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerdictRecord {
    /// Create a successful record.
    pub fn success(id: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            id: id.into(),
            verdict: Some(verdict),
            error: None,
        }
    }

    /// Create an error-marker record.
    pub fn failure(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            verdict: None,
            error: Some(error.into()),
        }
    }

    /// Whether this record carries a verdict.
    pub fn is_success(&self) -> bool {
        self.verdict.is_some() && self.error.is_none()
    }
}

/// Coerce a raw score value to a number.
///
/// JSON numbers pass through; strings are parsed (`"4"` coerces, `"n/a"`
/// does not). Anything non-coercible yields `None` and is excluded from the
/// mean rather than counted as zero.
pub fn coerce_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Mean of one rubric dimension across a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionMean {
    /// Dimension field name
    pub dimension: String,
    /// Mean over coercible values, or `None` when nothing coerced
    pub mean: Option<f64>,
    /// Number of verdicts that contributed to the mean
    pub samples: usize,
}

/// Aggregated rubric for an entire run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricSummary {
    /// Total number of verdict records
    pub total: usize,
    /// Records carrying a verdict
    pub scored: usize,
    /// Error-marker records
    pub failed: usize,
    /// Per-dimension means, in reporting order
    pub means: Vec<DimensionMean>,
}

impl RubricSummary {
    /// Aggregate a run's verdict records.
    pub fn from_verdicts(records: &[VerdictRecord]) -> Self {
        let total = records.len();
        let scored = records.iter().filter(|r| r.is_success()).count();
        let failed = total - scored;

        let means = Dimension::ALL
            .iter()
            .map(|&dimension| {
                let values: Vec<f64> = records
                    .iter()
                    .filter_map(|record| record.verdict.as_ref())
                    .filter_map(|verdict| coerce_score(verdict.score(dimension)))
                    .collect();
                let samples = values.len();
                let mean = if samples > 0 {
                    Some(values.iter().sum::<f64>() / samples as f64)
                } else {
                    None
                };
                DimensionMean {
                    dimension: dimension.as_str().to_string(),
                    mean,
                    samples,
                }
            })
            .collect();

        Self {
            total,
            scored,
            failed,
            means,
        }
    }

    /// The mean for one dimension, if any value coerced.
    pub fn mean(&self, dimension: Dimension) -> Option<f64> {
        self.means
            .iter()
            .find(|m| m.dimension == dimension.as_str())
            .and_then(|m| m.mean)
    }

    /// Print the summary to stdout.
    pub fn print_summary(&self) {
        println!();
        println!("=== Rubric Summary ===");
        println!(
            "Pairs: {} total, {} scored, {} failed",
            self.total, self.scored, self.failed
        );
        println!();
        println!("Mean scores:");
        for entry in &self.means {
            match entry.mean {
                Some(mean) => println!(
                    "  {}: {:.3} (n={})",
                    entry.dimension, mean, entry.samples
                ),
                None => println!("  {}: n/a", entry.dimension),
            }
        }
    }

    /// Write the summary to a JSON file.
    pub fn write_json(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}
