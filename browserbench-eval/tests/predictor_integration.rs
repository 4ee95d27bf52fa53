//! Integration tests for the bounded concurrent predictor.
//!
//! These use the scripted mock backend to verify the two load-bearing
//! properties (order preservation under completion jitter, and per-item
//! failure isolation) without any network calls.

mod common;

use browserbench_core::{MockChatBackend, MockReply, ToolCatalog};
use browserbench_eval::Predictor;
use common::question_record;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_order_preserved_under_completion_jitter() {
    // Replies complete in scrambled order; the output must still line up
    // with the input by index.
    let delays_ms = [80u64, 20, 60, 10, 30, 0];
    let replies: Vec<MockReply> = delays_ms
        .iter()
        .enumerate()
        .map(|(i, &ms)| MockReply::text(format!("reply {i}")).with_delay(Duration::from_millis(ms)))
        .collect();
    let backend = Arc::new(MockChatBackend::new(replies));

    let records: Vec<_> = (0..delays_ms.len())
        .map(|i| question_record(&format!("conv-{i}"), &format!("question {i}")))
        .collect();

    let predictor =
        Predictor::new(backend, "test-model", ToolCatalog::builtin()).with_concurrency(3);
    let out = predictor.predict_all(&records).await;

    assert_eq!(out.len(), records.len());
    for (i, record) in out.iter().enumerate() {
        assert_eq!(
            record.id,
            format!("conv-{i}"),
            "record at index {i} belongs to a different conversation"
        );
        assert_eq!(record.conversation[2]["content"], format!("question {i}"));
        assert!(record.prediction.is_success());
    }
}

#[tokio::test]
async fn test_single_failure_is_isolated() {
    let backend = Arc::new(MockChatBackend::new([
        MockReply::text("reply 0"),
        MockReply::text("reply 1"),
        MockReply::failure("simulated provider outage"),
        MockReply::text("reply 3"),
        MockReply::text("reply 4"),
    ]));

    let records: Vec<_> = (0..5)
        .map(|i| question_record(&format!("conv-{i}"), "q"))
        .collect();

    let predictor =
        Predictor::new(backend, "test-model", ToolCatalog::builtin()).with_concurrency(2);
    let out = predictor.predict_all(&records).await;

    assert_eq!(out.len(), 5);
    for (i, record) in out.iter().enumerate() {
        if i == 2 {
            assert!(!record.prediction.is_success());
            assert!(record
                .prediction
                .error
                .as_deref()
                .unwrap()
                .contains("simulated provider outage"));
        } else {
            assert!(record.prediction.is_success(), "sibling {i} was affected");
        }
    }
}

#[tokio::test]
async fn test_all_failures_still_yield_full_length_output() {
    let backend = Arc::new(MockChatBackend::new([
        MockReply::failure("down"),
        MockReply::failure("down"),
        MockReply::failure("down"),
    ]));

    let records: Vec<_> = (0..3)
        .map(|i| question_record(&format!("conv-{i}"), "q"))
        .collect();

    let predictor = Predictor::new(backend, "test-model", ToolCatalog::builtin());
    let out = predictor.predict_all(&records).await;

    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|r| !r.prediction.is_success()));
}

#[tokio::test]
async fn test_batch_larger_than_concurrency_completes() {
    let replies: Vec<MockReply> = (0..20).map(|i| MockReply::text(format!("r{i}"))).collect();
    let backend = Arc::new(MockChatBackend::new(replies));

    let records: Vec<_> = (0..20)
        .map(|i| question_record(&format!("conv-{i}"), "q"))
        .collect();

    let predictor =
        Predictor::new(backend.clone(), "test-model", ToolCatalog::builtin()).with_concurrency(4);
    let out = predictor.predict_all(&records).await;

    assert_eq!(out.len(), 20);
    assert_eq!(backend.remaining(), 0);
    assert!(out.iter().all(|r| r.prediction.is_success()));
}
