//! Integration tests for conversation-state invariants
//!
//! Tests cover:
//! - Order preservation across N submissions
//! - Full-context delivery on every generation request
//! - Failure policy: history preserved, no assistant turn appended
//! - Snapshot isolation from later appends
//! - The single in-flight submission guard

use std::sync::Arc;
use std::time::Duration;

use palaver::backends::{GenerationOptions, ScriptedBackend};
use palaver::error::PalaverError;
use palaver::runner::ConversationRunner;
use palaver::store::Role;

fn runner_over(backend: Arc<ScriptedBackend>) -> ConversationRunner {
    ConversationRunner::new(backend, "scripted", GenerationOptions::new())
}

#[tokio::test]
async fn test_order_preservation_across_turns() {
    let backend = Arc::new(ScriptedBackend::from_texts(vec![
        "reply 1".to_string(),
        "reply 2".to_string(),
        "reply 3".to_string(),
    ]));
    let runner = runner_over(Arc::clone(&backend));

    for i in 1..=3 {
        runner
            .submit_user_turn(format!("prompt {}", i))
            .await
            .unwrap();
    }

    // History is exactly [user_1, assistant_1, user_2, assistant_2, ...]
    let history = runner.history().unwrap();
    assert_eq!(history.len(), 6);
    for (i, pair) in history.chunks(2).enumerate() {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[0].content, format!("prompt {}", i + 1));
        assert_eq!(pair[1].role, Role::Assistant);
        assert_eq!(pair[1].content, format!("reply {}", i + 1));
    }
}

#[tokio::test]
async fn test_full_context_delivery() {
    let backend = Arc::new(ScriptedBackend::from_texts(vec![
        "reply 1".to_string(),
        "reply 2".to_string(),
        "reply 3".to_string(),
    ]));
    let runner = runner_over(Arc::clone(&backend));

    for i in 1..=3 {
        runner
            .submit_user_turn(format!("prompt {}", i))
            .await
            .unwrap();
    }

    // Request K carries exactly the 2(K-1) prior turns plus the new user turn
    let requests = backend.requests();
    assert_eq!(requests.len(), 3);
    for (k, request) in requests.iter().enumerate() {
        let expected_len = 2 * k + 1;
        assert_eq!(
            request.turns.len(),
            expected_len,
            "request {} should carry {} turns",
            k + 1,
            expected_len
        );
        assert_eq!(request.turns.last().unwrap().content, format!("prompt {}", k + 1));
        // Prior turns arrive in commit order, none dropped, none reordered
        for (i, turn) in request.turns[..expected_len - 1].iter().enumerate() {
            let pair = i / 2 + 1;
            if i % 2 == 0 {
                assert_eq!(turn.role, Role::User);
                assert_eq!(turn.content, format!("prompt {}", pair));
            } else {
                assert_eq!(turn.role, Role::Assistant);
                assert_eq!(turn.content, format!("reply {}", pair));
            }
        }
    }
}

#[tokio::test]
async fn test_failure_preserves_history_and_skips_assistant_turn() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_text("reply 1")
            .with_failure("quota exhausted"),
    );
    let runner = runner_over(Arc::clone(&backend));

    runner.submit_user_turn("prompt 1").await.unwrap();
    let err = runner.submit_user_turn("prompt 2").await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PalaverError>(),
        Some(PalaverError::Backend(_))
    ));
    assert!(err.to_string().contains("quota exhausted"));

    // 2(K-1)+1 turns: the prior pair plus the failed call's user turn
    let history = runner.history().unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].role, Role::User);
    assert_eq!(history[2].content, "prompt 2");
}

#[tokio::test]
async fn test_retry_after_failure_reuses_history() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_failure("transient outage")
            .with_text("recovered reply"),
    );
    let runner = runner_over(Arc::clone(&backend));

    assert!(runner.submit_user_turn("remember me").await.is_err());
    runner.submit_user_turn("retry").await.unwrap();

    // The retry's request still contains the turn whose generation failed
    let requests = backend.requests();
    assert_eq!(requests[1].turns.len(), 2);
    assert_eq!(requests[1].turns[0].content, "remember me");
    assert_eq!(requests[1].turns[1].content, "retry");
}

#[tokio::test]
async fn test_snapshot_unaffected_by_later_appends() {
    let backend = Arc::new(ScriptedBackend::from_texts(vec![
        "reply 1".to_string(),
        "reply 2".to_string(),
    ]));
    let runner = runner_over(Arc::clone(&backend));

    runner.submit_user_turn("prompt 1").await.unwrap();
    let before = runner.history().unwrap();

    runner.submit_user_turn("prompt 2").await.unwrap();

    assert_eq!(before.len(), 2);
    assert_eq!(runner.history().unwrap().len(), 4);
}

#[tokio::test]
async fn test_concurrency_guard_rejects_overlap() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_text("slow reply")
            .with_latency(Duration::from_millis(200)),
    );
    let runner = Arc::new(runner_over(Arc::clone(&backend)));

    let in_flight = {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move { runner.submit_user_turn("first").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = runner.submit_user_turn("second").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PalaverError>(),
        Some(PalaverError::ConcurrentSubmission(_))
    ));

    in_flight.await.unwrap().unwrap();

    // Only the first submission reached the backend or the store
    assert_eq!(backend.requests().len(), 1);
    let history = runner.history().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "first");
    assert_eq!(history[1].content, "slow reply");
}

#[tokio::test]
async fn test_invalid_user_turn_leaves_store_untouched() {
    let backend = Arc::new(ScriptedBackend::new().with_text("unused"));
    let runner = runner_over(Arc::clone(&backend));

    let err = runner.submit_user_turn("\n\t ").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PalaverError>(),
        Some(PalaverError::InvalidTurn(_))
    ));

    assert!(runner.history().unwrap().is_empty());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_system_turn_is_delivered_with_context() {
    let backend = Arc::new(ScriptedBackend::new().with_text("done"));
    let runner = runner_over(Arc::clone(&backend));

    runner.push_system_turn("You are terse").unwrap();
    runner.submit_user_turn("hello").await.unwrap();

    let requests = backend.requests();
    assert_eq!(requests[0].turns.len(), 2);
    assert_eq!(requests[0].turns[0].role, Role::System);
    assert_eq!(requests[0].turns[1].role, Role::User);
}
