/*!
 * End-to-end workflow tests: parse a file, translate it through the session
 * scheduler and write the output, using the mock provider in place of a
 * remote endpoint.
 */

use std::path::PathBuf;
use std::sync::Arc;

use anytrans::subtitle_processor::SubtitleCollection;
use anytrans::translation::scheduler::{run_sessions, TranslationUnit};

use crate::common::mock_provider::{MockBehavior, MockChatProvider};
use crate::common::{create_temp_dir, create_test_file, create_test_subtitle, init_test_logging, test_settings};

#[tokio::test]
async fn test_srt_workflow_translates_text_and_preserves_timing() {
    init_test_logging();
    let temp_dir = create_temp_dir().unwrap();
    let input = create_test_subtitle(&temp_dir.path().to_path_buf(), "input.srt").unwrap();
    let output = temp_dir.path().join("output.srt");

    let collection = SubtitleCollection::parse_srt_file(&input).unwrap();
    let units: Vec<TranslationUnit> = collection
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| TranslationUnit::new(i + 1, entry.text.clone()))
        .collect();

    let provider = Arc::new(MockChatProvider::new());
    let results = run_sessions(provider, &test_settings(&["m1"]), units, 2, |_, _| {})
        .await
        .unwrap();

    let entries = collection
        .entries
        .iter()
        .zip(results.iter())
        .map(|(entry, result)| entry.with_text(result.text.clone()))
        .collect();
    let translated = SubtitleCollection::new(output.clone(), entries);
    translated.write_to_srt(&output).unwrap();

    let reparsed = SubtitleCollection::parse_srt_file(&output).unwrap();
    assert_eq!(reparsed.entries.len(), collection.entries.len());
    for (original, translated) in collection.entries.iter().zip(reparsed.entries.iter()) {
        assert_eq!(translated.text, format!("{} [translated]", original.text));
        assert_eq!(translated.start_time_ms, original.start_time_ms);
        assert_eq!(translated.end_time_ms, original.end_time_ms);
        assert_eq!(translated.seq_num, original.seq_num);
    }
}

#[tokio::test]
async fn test_text_workflow_translates_one_unit_per_line() {
    init_test_logging();
    let temp_dir = create_temp_dir().unwrap();
    let content = "First line.\n\nSecond line.\nThird line.\n";
    let input = create_test_file(&temp_dir.path().to_path_buf(), "notes.txt", content).unwrap();

    let raw = std::fs::read_to_string(&input).unwrap();
    let units: Vec<TranslationUnit> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| TranslationUnit::new(i + 1, line))
        .collect();
    assert_eq!(units.len(), 3);

    let provider = Arc::new(MockChatProvider::new());
    let results = run_sessions(provider, &test_settings(&["m1"]), units, 3, |_, _| {})
        .await
        .unwrap();

    let lines: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(
        lines,
        vec![
            "First line. [translated]",
            "Second line. [translated]",
            "Third line. [translated]",
        ]
    );
}

#[tokio::test]
async fn test_broken_model_still_produces_a_complete_output_file() {
    init_test_logging();
    let temp_dir = create_temp_dir().unwrap();
    let input = create_test_subtitle(&temp_dir.path().to_path_buf(), "input.srt").unwrap();
    let output: PathBuf = temp_dir.path().join("output.srt");

    let collection = SubtitleCollection::parse_srt_file(&input).unwrap();
    let units: Vec<TranslationUnit> = collection
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| TranslationUnit::new(i + 1, entry.text.clone()))
        .collect();

    let provider = Arc::new(
        MockChatProvider::new().with_model("m1", MockBehavior::ExtraField),
    );
    let results = run_sessions(provider, &test_settings(&["m1"]), units, 1, |_, _| {})
        .await
        .unwrap();

    // Every unit fell back to its original text
    assert!(results.iter().all(|r| !r.translated));

    let entries = collection
        .entries
        .iter()
        .zip(results.iter())
        .map(|(entry, result)| entry.with_text(result.text.clone()))
        .collect();
    SubtitleCollection::new(output.clone(), entries)
        .write_to_srt(&output)
        .unwrap();

    let reparsed = SubtitleCollection::parse_srt_file(&output).unwrap();
    assert_eq!(reparsed.entries, collection.entries);
}
