//! Persisted run artifacts.
//!
//! Predictions and verdicts are written as line-oriented JSON records so a
//! run's outputs can be grepped, streamed, and partially reloaded. File
//! names are derived from the final path segment of the evaluated model's
//! id, so runs against different models coexist in one output directory.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or writing artifact files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArtifactError {
    /// Filesystem failure
    #[error("Failed to access artifact: {0}")]
    Io(#[from] std::io::Error),

    /// A record failed to encode
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    /// A line failed to parse
    #[error("Failed to parse artifact line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },
}

/// Path of the predictions artifact for a model.
pub fn predictions_path(output_dir: &Path, model_short: &str) -> PathBuf {
    output_dir.join(format!("{model_short}_predictions.jsonl"))
}

/// Path of the verdicts artifact for a model.
pub fn verdicts_path(output_dir: &Path, model_short: &str) -> PathBuf {
    output_dir.join(format!("{model_short}_verdicts.jsonl"))
}

/// Write records as one JSON object per line, creating parent directories.
pub fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    std::fs::write(path, out)?;
    Ok(())
}

/// Read one JSON record per line, skipping blank lines.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ArtifactError> {
    let content = std::fs::read_to_string(path)?;
    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|source| ArtifactError::Parse {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
