//! Dataset loading.
//!
//! The dataset source proper (a table of recorded conversations) is an
//! external collaborator; the pipeline only needs an ordered sequence of
//! conversation records. [`JsonlDataset`] reads them from a local
//! line-oriented JSON file.

use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

/// Errors that can occur when loading datasets.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    /// Failed to read dataset file
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// A line did not parse as a conversation record
    #[error("Failed to parse dataset line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },
}

/// One recorded conversation, keyed by id.
#[derive(Debug, Clone)]
pub struct ConversationRecord {
    /// Identifier used to key predictions and verdicts
    pub id: String,
    /// Soft-typed conversation turns, ending in a user turn
    pub conversation: Vec<Value>,
}

/// Trait for conversation datasets.
pub trait Dataset: Send + Sync {
    /// The name of this dataset (used in reports).
    fn name(&self) -> &str;

    /// Load conversations from the dataset.
    ///
    /// If `sample_size` is specified, return at most that many records,
    /// taken from the front.
    fn load(
        &self,
        sample_size: Option<usize>,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationRecord>, DatasetError>> + Send;
}

/// A dataset stored as one JSON object per line:
/// `{"id"?: "...", "conversation": [turn, ...]}`.
///
/// Missing ids become `conv-<line index>`.
///
/// # Example
///
/// ```no_run
/// use browserbench_eval::{Dataset, JsonlDataset};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dataset = JsonlDataset::new(PathBuf::from("conversations.jsonl"));
/// let records = dataset.load(Some(100)).await?;
/// println!("Loaded {} conversations", records.len());
/// # Ok(())
/// # }
/// ```
pub struct JsonlDataset {
    path: PathBuf,
}

impl JsonlDataset {
    /// Create a loader for the given file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// On-disk line shape.
#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Option<String>,
    conversation: Vec<Value>,
}

impl Dataset for JsonlDataset {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn load(
        &self,
        sample_size: Option<usize>,
    ) -> Result<Vec<ConversationRecord>, DatasetError> {
        let content = fs::read_to_string(&self.path).await?;

        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let raw: RawRecord = serde_json::from_str(line).map_err(|source| {
                DatasetError::Parse {
                    line: index + 1,
                    source,
                }
            })?;
            records.push(ConversationRecord {
                id: raw.id.unwrap_or_else(|| format!("conv-{index}")),
                conversation: raw.conversation,
            });
        }

        if let Some(size) = sample_size {
            records.truncate(size);
        }

        log::debug!("Loaded {} conversations from {:?}", records.len(), self.path);
        Ok(records)
    }
}
