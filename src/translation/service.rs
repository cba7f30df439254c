/*!
 * Remote translation with model fallback and bounded retry.
 *
 * One TranslationService per session. Each call assembles the outbound
 * message sequence from the session's context window, walks the candidate
 * model list in rank order, validates the structured response against the
 * fixed two-field schema and, on success, extends the conversation history
 * for the next unit in the same session.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::app_config::Config;
use crate::errors::TranslationError;
use crate::prompts;
use crate::providers::{ChatProvider, ChatRequest};
use crate::timeout::with_timeout;
use crate::tokens::TokenCounter;
use crate::translation::context::{ChatMessage, ContextWindow};

/// Validated result of one successful translation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationOutcome {
    /// Source language the model detected
    pub source_lang: String,
    /// Translated text in the target language
    pub translated_text: String,
}

/// Per-session translation settings
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Candidate model names in rank order
    pub models: Vec<String>,
    /// Fixed system prompt for the run
    pub system_prompt: String,
    /// Target language code
    pub target_language: String,
    /// Optional free-text addendum repeated in each query
    pub additional_prompt: Option<String>,
    /// Token budget for system prompt + history + query
    pub max_context_tokens: usize,
    /// Wall-clock deadline per chat completion call
    pub timeout: Duration,
    /// Maximum attempts of the unit-level retry policy
    pub retry_attempts: u32,
    /// Delay between retry attempts (zero = fail fast)
    pub retry_backoff: Duration,
}

impl ServiceSettings {
    /// Build settings from the application config and a resolved system prompt
    pub fn from_config(
        config: &Config,
        system_prompt: String,
        additional_prompt: Option<String>,
    ) -> Self {
        ServiceSettings {
            models: config.translation.models.clone(),
            system_prompt,
            target_language: config.target_language.clone(),
            additional_prompt,
            max_context_tokens: config.translation.max_context_tokens,
            timeout: Duration::from_secs(config.translation.timeout_secs),
            retry_attempts: config.translation.retry_attempts.max(1),
            retry_backoff: Duration::from_millis(config.translation.retry_backoff_ms),
        }
    }
}

/// Translates single units against a remote chat endpoint, maintaining the
/// conversation history of one session.
pub struct TranslationService {
    provider: Arc<dyn ChatProvider>,
    settings: ServiceSettings,
    system_prompt: ChatMessage,
    window: ContextWindow,
    counter: TokenCounter,
}

impl TranslationService {
    /// Create a new translation service with an empty context window
    pub fn new(provider: Arc<dyn ChatProvider>, settings: ServiceSettings) -> Self {
        let system_prompt = ChatMessage::system(settings.system_prompt.clone());
        let window = ContextWindow::new(settings.max_context_tokens);

        TranslationService {
            provider,
            settings,
            system_prompt,
            window,
            counter: TokenCounter::new(),
        }
    }

    /// The session's conversation history, for inspection
    pub fn context(&self) -> &ContextWindow {
        &self.window
    }

    /// Translate one unit of text.
    ///
    /// The whole attempt (model fallback included) is wrapped in the outer
    /// retry policy: up to `retry_attempts` tries for prompt-adherence
    /// failures and timeouts, with the final error returned unmodified.
    pub async fn translate(&mut self, text: &str) -> Result<TranslationOutcome, TranslationError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.translate_once(text).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_retryable() && attempt < self.settings.retry_attempts => {
                    warn!(
                        "Translation attempt {}/{} failed: {}",
                        attempt, self.settings.retry_attempts, e
                    );
                    if !self.settings.retry_backoff.is_zero() {
                        tokio::time::sleep(self.settings.retry_backoff).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One full attempt: trim the window, then try each candidate model in
    /// rank order until one produces a schema-valid response.
    async fn translate_once(&mut self, text: &str) -> Result<TranslationOutcome, TranslationError> {
        let query = ChatMessage::user(prompts::translate_query(
            &self.settings.target_language,
            self.settings.additional_prompt.as_deref(),
            text,
        ));
        let messages = self
            .window
            .build_messages(&self.system_prompt, &query, &self.counter);

        let mut last_error: Option<TranslationError> = None;
        for model in &self.settings.models {
            let request = ChatRequest::new(model.clone(), messages.clone());
            let response =
                match with_timeout(self.settings.timeout, self.provider.complete_chat(request))
                    .await
                {
                    Ok(Ok(response)) => response,
                    Ok(Err(e)) => {
                        // Transient failure, fall through to the next model
                        warn!("Model {} failed with {}, trying next...", model, e);
                        last_error = Some(e.into());
                        continue;
                    }
                    Err(timeout) => {
                        warn!(
                            "Model {} timed out after {:?}, trying next...",
                            model, self.settings.timeout
                        );
                        last_error = Some(timeout);
                        continue;
                    }
                };

            match validate_response(&response) {
                Ok(outcome) => {
                    debug!("Model {} produced a valid translation", model);
                    // Extend the session history with the accepted exchange
                    self.window.push(query.clone());
                    let canonical = serde_json::to_string(&outcome)
                        .unwrap_or_else(|_| response.clone());
                    self.window.push(ChatMessage::assistant(canonical));
                    return Ok(outcome);
                }
                Err(e) => {
                    // A non-conforming response is a prompt-adherence problem,
                    // not a model outage: inform the next attempt through the
                    // history and escalate instead of trying the next model.
                    self.window.push(ChatMessage::assistant(response));
                    self.window.push(ChatMessage::user(prompts::CORRECTIVE_USER));
                    self.window
                        .push(ChatMessage::assistant(prompts::CORRECTIVE_ASSISTANT));
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or(TranslationError::NoModelsConfigured))
    }
}

/// Parse and validate a model response against the fixed two-field schema
fn validate_response(response: &str) -> Result<TranslationOutcome, TranslationError> {
    let value: serde_json::Value = serde_json::from_str(response)
        .map_err(|e| TranslationError::MalformedResponse(e.to_string()))?;
    serde_json::from_value(value).map_err(|e| TranslationError::SchemaViolation(e.to_string()))
}
