//! Bounded concurrent prediction.
//!
//! Fans the candidate model out across every conversation with a fixed
//! concurrency ceiling. Two properties matter more than anything else here:
//!
//! - **Order preservation**: results are correlated back to their
//!   originating index, so the output always lines up with the input no
//!   matter what order completions arrive in.
//! - **Failure isolation**: a single conversation's error is caught at its
//!   own boundary and recorded as an error marker; it never cancels or
//!   fails sibling requests.

use crate::dataset::ConversationRecord;
use crate::results::{Prediction, PredictionRecord};
use browserbench_core::{normalize_conversation, ChatBackend, ChatRequest, ToolCatalog};
use futures_util::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Progress events emitted by the concurrent stages.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum StageProgress {
    /// Stage starting.
    Started {
        /// Total number of items in this stage.
        total: usize,
    },
    /// One item finished (success or error marker).
    ItemCompleted {
        /// Items completed so far.
        completed: usize,
        /// Total number of items.
        total: usize,
        /// Whether this item produced a well-formed result.
        success: bool,
    },
}

/// Drives the candidate model across a dataset of conversations.
pub struct Predictor {
    backend: Arc<dyn ChatBackend>,
    model: String,
    catalog: ToolCatalog,
    concurrency: usize,
}

impl Predictor {
    /// Default number of in-flight prediction requests.
    pub const DEFAULT_CONCURRENCY: usize = 10;

    /// Create a predictor for the given backend and model.
    pub fn new(backend: Arc<dyn ChatBackend>, model: impl Into<String>, catalog: ToolCatalog) -> Self {
        Self {
            backend,
            model: model.into(),
            catalog,
            concurrency: Self::DEFAULT_CONCURRENCY,
        }
    }

    /// Set the concurrency ceiling (minimum 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Predict the next assistant turn for every conversation.
    ///
    /// Always returns one record per input conversation, in input order,
    /// with error markers in place of failed items.
    pub async fn predict_all(&self, conversations: &[ConversationRecord]) -> Vec<PredictionRecord> {
        self.predict_all_with_progress(conversations, |_| {}).await
    }

    /// Same as [`predict_all`](Self::predict_all), with progress callbacks.
    pub async fn predict_all_with_progress<F>(
        &self,
        conversations: &[ConversationRecord],
        on_progress: F,
    ) -> Vec<PredictionRecord>
    where
        F: Fn(StageProgress) + Send + Sync,
    {
        let total = conversations.len();
        on_progress(StageProgress::Started { total });
        if total == 0 {
            return Vec::new();
        }

        log::info!(
            "Predicting {} conversations with concurrency {}",
            total,
            self.concurrency
        );

        let completed = AtomicUsize::new(0);
        let completed = &completed;
        let on_progress = &on_progress;

        let mut indexed: Vec<(usize, PredictionRecord)> =
            stream::iter(conversations.iter().enumerate())
                .map(|(index, record)| async move {
                    let record = self.predict_one(record).await;
                    let count = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    on_progress(StageProgress::ItemCompleted {
                        completed: count,
                        total,
                        success: record.prediction.is_success(),
                    });
                    (index, record)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        // Completion order is unconstrained; restore input order by index.
        indexed.sort_unstable_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, record)| record).collect()
    }

    /// Predict one conversation, containing any failure as an error marker.
    async fn predict_one(&self, record: &ConversationRecord) -> PredictionRecord {
        let normalized = normalize_conversation(&record.conversation);
        let request = ChatRequest::new(&self.model, normalized.clone())
            .with_tools(self.catalog.definitions().to_vec());

        let prediction = match self.backend.chat(request).await {
            Ok(message) => Prediction::success(message),
            Err(e) => {
                log::warn!("Prediction for {} failed: {}", record.id, e);
                Prediction::failure(e.to_string())
            }
        };

        PredictionRecord {
            id: record.id.clone(),
            conversation: normalized,
            prediction,
        }
    }
}
