/*!
 * Common test utilities for the anytrans test suite
 */

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tempfile::TempDir;

use anytrans::translation::service::ServiceSettings;

// Re-export the mock provider module
pub mod mock_provider;

/// Initialize logging for a test, safe to call more than once
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
"#;
    create_test_file(dir, filename, content)
}

/// Service settings tuned for tests: short deadlines, no backoff
pub fn test_settings(models: &[&str]) -> ServiceSettings {
    ServiceSettings {
        models: models.iter().map(|m| m.to_string()).collect(),
        system_prompt: "You are a translation assistant.".to_string(),
        target_language: "ko".to_string(),
        additional_prompt: None,
        max_context_tokens: 4096,
        timeout: Duration::from_millis(100),
        retry_attempts: 5,
        retry_backoff: Duration::ZERO,
    }
}
