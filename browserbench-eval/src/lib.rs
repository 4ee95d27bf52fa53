//! # Browserbench Eval
//!
//! Offline evaluation pipeline for a browser-assistant model: replay stored
//! conversations, ask a candidate model for the next assistant turn, score
//! each turn with a judge model against a six-dimension rubric, and report
//! per-dimension means.
//!
//! ## Architecture
//!
//! ```text
//! browserbench-core (messages, normalize/truncate, provider dispatch)
//!     ↓
//! browserbench-eval (datasets, predictor, judge, evaluator, aggregation)  ← this crate
//! ```
//!
//! Data flows one way: dataset → [`Predictor`] → predictions artifact →
//! [`Evaluator`] (via [`Judge`]) → verdicts artifact → [`RubricSummary`].
//! Both concurrent stages preserve input order and contain per-item
//! failures as explicit error markers.
//!
//! ## Quick start
//!
//! ```no_run
//! use browserbench_core::{ChatClient, ChatConfig, Provider, ToolCatalog};
//! use browserbench_eval::{
//!     Dataset, Evaluator, Judge, JsonlDataset, Predictor, RubricSummary,
//! };
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conversations = JsonlDataset::new(PathBuf::from("conversations.jsonl"))
//!     .load(None)
//!     .await?;
//!
//! let candidate = Arc::new(ChatClient::for_provider(Provider::TogetherAi, ChatConfig::default())?);
//! let predictor = Predictor::new(candidate, "Qwen/Qwen3-Next-80B-A3B-Thinking", ToolCatalog::builtin());
//! let predictions = predictor.predict_all(&conversations).await;
//!
//! let judge_backend = Arc::new(ChatClient::for_provider(Provider::OpenAi, ChatConfig::default())?);
//! let evaluator = Evaluator::new(Judge::new(judge_backend, "gpt-5"));
//! let verdicts = evaluator.evaluate_all(&predictions).await;
//!
//! RubricSummary::from_verdicts(&verdicts).print_summary();
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod dataset;
pub mod evaluate;
pub mod judge;
pub mod predict;
pub mod prompts;
pub mod results;

// Re-export public API
pub use artifacts::{predictions_path, read_jsonl, verdicts_path, write_jsonl, ArtifactError};
pub use dataset::{ConversationRecord, Dataset, DatasetError, JsonlDataset};
pub use evaluate::Evaluator;
pub use judge::{render_judge_prompt, verdict_response_format, Judge, JudgeError};
pub use predict::{Predictor, StageProgress};
pub use prompts::JUDGE_PROMPT;
pub use results::{
    coerce_score, Dimension, DimensionMean, Prediction, PredictionRecord, RubricSummary, Verdict,
    VerdictRecord,
};
