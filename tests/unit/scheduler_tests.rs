/*!
 * Tests for concurrent session scheduling and result merging
 */

use std::sync::{Arc, Mutex};

use anytrans::translation::scheduler::{run_sessions, TranslationUnit};

use crate::common::mock_provider::{MockBehavior, MockChatProvider};
use crate::common::{init_test_logging, test_settings};

fn units(count: usize) -> Vec<TranslationUnit> {
    (1..=count)
        .map(|i| TranslationUnit::new(i, format!("line {}", i)))
        .collect()
}

#[tokio::test]
async fn test_results_come_back_in_global_order() {
    init_test_logging();
    let provider = Arc::new(MockChatProvider::new());
    let settings = test_settings(&["m1"]);

    let results = run_sessions(provider, &settings, units(10), 3, |_, _| {})
        .await
        .unwrap();

    assert_eq!(results.len(), 10);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.global_index, i + 1);
        assert_eq!(result.text, format!("line {} [translated]", i + 1));
        assert!(result.translated);
        assert_eq!(result.source_lang.as_deref(), Some("EN"));
    }
}

#[tokio::test]
async fn test_permanent_failure_keeps_original_text_and_continues() {
    init_test_logging();
    let provider = Arc::new(
        MockChatProvider::new().with_model("m1", MockBehavior::MalformedJson),
    );
    let settings = test_settings(&["m1"]);

    let results = run_sessions(provider, &settings, units(3), 1, |_, _| {})
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.text, format!("line {}", i + 1));
        assert!(!result.translated);
        assert!(result.source_lang.is_none());
    }
}

#[tokio::test]
async fn test_failing_model_falls_back_to_next_candidate() {
    init_test_logging();
    let provider = Arc::new(
        MockChatProvider::new().with_model("m1", MockBehavior::FailTransient),
    );
    let settings = test_settings(&["m1", "m2"]);

    let results = run_sessions(provider.clone(), &settings, units(2), 1, |_, _| {})
        .await
        .unwrap();

    assert!(results.iter().all(|r| r.translated));
    // Every unit first hits the failing model, then succeeds on the next one
    assert_eq!(provider.calls(), vec!["m1", "m2", "m1", "m2"]);
}

#[tokio::test]
async fn test_unresponsive_model_times_out_and_falls_back() {
    init_test_logging();
    let provider = Arc::new(
        MockChatProvider::new().with_model("m1", MockBehavior::NeverResponds),
    );
    let settings = test_settings(&["m1", "m2"]);

    let results = run_sessions(provider.clone(), &settings, units(2), 1, |_, _| {})
        .await
        .unwrap();

    assert!(results.iter().all(|r| r.translated));
    // The unresponsive model is still attempted first for every unit
    assert_eq!(provider.calls(), vec!["m1", "m2", "m1", "m2"]);
}

#[tokio::test]
async fn test_progress_callback_reaches_total() {
    init_test_logging();
    let provider = Arc::new(MockChatProvider::new());
    let settings = test_settings(&["m1"]);

    let seen: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let results = run_sessions(provider, &settings, units(5), 2, move |done, total| {
        sink.lock().unwrap().push((done, total));
    })
    .await
    .unwrap();

    assert_eq!(results.len(), 5);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 5);
    assert!(seen.iter().all(|&(_, total)| total == 5));
    assert!(seen.iter().any(|&(done, _)| done == 5));
}

#[tokio::test]
async fn test_more_sessions_than_units() {
    init_test_logging();
    let provider = Arc::new(MockChatProvider::new());
    let settings = test_settings(&["m1"]);

    let results = run_sessions(provider, &settings, units(2), 8, |_, _| {})
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.translated));
}
