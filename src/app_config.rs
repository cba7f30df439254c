use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and merging configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

/// Translation pipeline configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Candidate model names, tried in priority order per translation attempt
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Number of concurrent sessions the unit sequence is partitioned into
    #[serde(default = "default_sessions")]
    pub sessions: usize,

    /// Token budget for system prompt + conversation history + pending query
    #[serde(default = "default_max_context_tokens")]
    pub max_context_tokens: usize,

    /// Wall-clock deadline for a single chat completion call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum attempts for the unit-level retry policy
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Delay between retry attempts in milliseconds (0 = fail fast)
    #[serde(default)]
    pub retry_backoff_ms: u64,

    /// API key for the chat completion endpoint
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Optional base URL override for the chat completion endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            models: default_models(),
            sessions: default_sessions(),
            max_context_tokens: default_max_context_tokens(),
            timeout_secs: default_timeout_secs(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: 0,
            api_key: String::new(),
            endpoint: None,
        }
    }
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl LogLevel {
    /// Convert to a log crate level filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "ko".to_string()
}

fn default_models() -> Vec<String> {
    vec!["gpt-4o-mini".to_string()]
}

fn default_sessions() -> usize {
    1
}

fn default_max_context_tokens() -> usize {
    1024
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_retry_attempts() -> u32 {
    5
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language cannot be empty"));
        }

        if self.translation.sessions == 0 {
            return Err(anyhow!("Session count must be at least 1"));
        }

        if self.translation.models.is_empty()
            || self.translation.models.iter().any(|m| m.trim().is_empty())
        {
            return Err(anyhow!("At least one non-empty model name is required"));
        }

        if self.translation.max_context_tokens == 0 {
            return Err(anyhow!("Max context tokens must be greater than 0"));
        }

        if self.translation.retry_attempts == 0 {
            return Err(anyhow!("Retry attempts must be at least 1"));
        }

        Ok(())
    }
}
