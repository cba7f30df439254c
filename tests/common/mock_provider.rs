/*!
 * Mock provider implementation for testing
 *
 * Implements the chat provider trait with configurable per-model behavior so
 * tests can exercise model fallback, timeouts and response validation without
 * external API calls.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use anytrans::errors::ProviderError;
use anytrans::providers::{ChatProvider, ChatRequest};
use anytrans::translation::context::MessageRole;

/// How a mocked model responds to a completion request
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return a valid translation echoing the original text
    Echo,
    /// Never respond, forcing the caller's deadline to elapse
    NeverResponds,
    /// Fail with a connection error
    FailTransient,
    /// Return text that is not JSON
    MalformedJson,
    /// Return JSON missing a required field
    MissingField,
    /// Return JSON with an unexpected extra field
    ExtraField,
}

/// Chat provider whose models each follow a scripted behavior
#[derive(Debug)]
pub struct MockChatProvider {
    behaviors: HashMap<String, MockBehavior>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockChatProvider {
    /// Create a provider where every unknown model echoes a valid translation
    pub fn new() -> Self {
        MockChatProvider {
            behaviors: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Assign a behavior to a model name
    pub fn with_model(mut self, model: &str, behavior: MockBehavior) -> Self {
        self.behaviors.insert(model.to_string(), behavior);
        self
    }

    /// Model names in the order they were called
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockChatProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the original text back out of the translation query
fn extract_original(request: &ChatRequest) -> String {
    let query = request
        .messages
        .iter()
        .rev()
        .find(|message| message.role == MessageRole::User)
        .map(|message| message.content.as_str())
        .unwrap_or_default();

    query
        .split("Original:\n")
        .nth(1)
        .and_then(|rest| rest.split("\n\nMAKE SURE").next())
        .unwrap_or(query)
        .to_string()
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete_chat(&self, request: ChatRequest) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(request.model.clone());

        let behavior = self
            .behaviors
            .get(&request.model)
            .cloned()
            .unwrap_or(MockBehavior::Echo);

        match behavior {
            MockBehavior::Echo => {
                let original = extract_original(&request);
                Ok(json!({
                    "source_lang": "EN",
                    "translated_text": format!("{} [translated]", original),
                })
                .to_string())
            }
            MockBehavior::NeverResponds => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ProviderError::RequestFailed("unreachable".to_string()))
            }
            MockBehavior::FailTransient => {
                Err(ProviderError::ConnectionError("connection refused".to_string()))
            }
            MockBehavior::MalformedJson => Ok("Sure! Here is the translation:".to_string()),
            MockBehavior::MissingField => Ok(r#"{"translated_text": "partial"}"#.to_string()),
            MockBehavior::ExtraField => Ok(json!({
                "source_lang": "EN",
                "translated_text": "extra",
                "confidence": 0.9,
            })
            .to_string()),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
