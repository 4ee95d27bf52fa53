//! Bounded concurrent evaluation.
//!
//! Symmetric to [`crate::predict`]: drives the judge across every
//! (conversation, prediction) pair under its own concurrency ceiling,
//! independent of the prediction stage's (the two stages target different
//! backends with different rate limits). Judge failures are contained at
//! the item boundary and recorded as error-marker verdicts.

use crate::judge::Judge;
use crate::predict::StageProgress;
use crate::results::{PredictionRecord, VerdictRecord};
use futures_util::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Drives the judge across a run's prediction records.
pub struct Evaluator {
    judge: Judge,
    concurrency: usize,
}

impl Evaluator {
    /// Default number of in-flight judge requests.
    pub const DEFAULT_CONCURRENCY: usize = 10;

    /// Create an evaluator around a judge.
    pub fn new(judge: Judge) -> Self {
        Self {
            judge,
            concurrency: Self::DEFAULT_CONCURRENCY,
        }
    }

    /// Set the concurrency ceiling (minimum 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Judge every prediction record.
    ///
    /// Always returns one verdict record per input, in input order, with
    /// error markers in place of failed judgments.
    pub async fn evaluate_all(&self, records: &[PredictionRecord]) -> Vec<VerdictRecord> {
        self.evaluate_all_with_progress(records, |_| {}).await
    }

    /// Same as [`evaluate_all`](Self::evaluate_all), with progress callbacks.
    pub async fn evaluate_all_with_progress<F>(
        &self,
        records: &[PredictionRecord],
        on_progress: F,
    ) -> Vec<VerdictRecord>
    where
        F: Fn(StageProgress) + Send + Sync,
    {
        let total = records.len();
        on_progress(StageProgress::Started { total });
        if total == 0 {
            return Vec::new();
        }

        log::info!(
            "Judging {} prediction(s) with concurrency {}",
            total,
            self.concurrency
        );

        let completed = AtomicUsize::new(0);
        let completed = &completed;
        let on_progress = &on_progress;

        let mut indexed: Vec<(usize, VerdictRecord)> = stream::iter(records.iter().enumerate())
            .map(|(index, record)| async move {
                let verdict = self.evaluate_one(record).await;
                let count = completed.fetch_add(1, Ordering::SeqCst) + 1;
                on_progress(StageProgress::ItemCompleted {
                    completed: count,
                    total,
                    success: verdict.is_success(),
                });
                (index, verdict)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        indexed.sort_unstable_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, verdict)| verdict).collect()
    }

    /// Judge one pair, containing any failure as an error marker.
    async fn evaluate_one(&self, record: &PredictionRecord) -> VerdictRecord {
        match self
            .judge
            .judge_one(&record.conversation, &record.prediction)
            .await
        {
            Ok(verdict) => VerdictRecord::success(record.id.clone(), verdict),
            Err(e) => {
                log::warn!("Judging {} failed: {}", record.id, e);
                VerdictRecord::failure(record.id.clone(), e.to_string())
            }
        }
    }
}
