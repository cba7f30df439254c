/*!
 * Provider implementations for chat completion endpoints.
 *
 * This module defines the interface the translation service uses to talk to
 * a remote model and the OpenAI-compatible client implementation.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::translation::context::ChatMessage;

/// A single chat completion request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model name to use for the completion
    pub model: String,
    /// Full outbound message sequence (system + history + query)
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        ChatRequest {
            model: model.into(),
            messages,
        }
    }
}

/// Common trait for chat completion providers
///
/// The translation service only needs one logical operation: send a message
/// sequence to a named model and get back the accumulated response text.
/// Implementations stream the response internally and return the full text
/// once the stream ends.
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug {
    /// Complete a chat request, accumulating the streamed response
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The full response text or an error
    async fn complete_chat(&self, request: ChatRequest) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is usable
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod openai;
