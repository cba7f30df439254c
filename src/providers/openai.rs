use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use futures_util::StreamExt;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::ProviderError;
use crate::providers::{ChatProvider, ChatRequest};
use crate::translation::context::ChatMessage;

/// Default API endpoint when no base URL override is configured
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for OpenAI-compatible chat completion APIs
#[derive(Debug)]
pub struct OpenAI {
    /// API key sent as a bearer token
    api_key: String,
    /// Base URL of the API, without a trailing slash
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    /// Model name to use for the completion
    model: &'a str,
    /// Messages of the conversation
    messages: &'a [ChatMessage],
    /// Whether to stream the response
    stream: bool,
    /// Structured output constraint
    response_format: ResponseFormat,
}

/// Structured output constraint for the completion
#[derive(Debug, Serialize)]
struct ResponseFormat {
    /// Constraint kind, always "json_schema"
    #[serde(rename = "type")]
    kind: &'static str,
    /// The schema the response must conform to
    json_schema: JsonSchemaFormat,
}

/// Named JSON schema wrapper
#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    /// Schema name
    name: &'static str,
    /// The schema itself
    schema: serde_json::Value,
    /// Whether the endpoint should enforce the schema strictly
    strict: bool,
}

/// The fixed two-field schema every translation response must satisfy
fn translation_response_format() -> ResponseFormat {
    ResponseFormat {
        kind: "json_schema",
        json_schema: JsonSchemaFormat {
            name: "translation_schema",
            schema: json!({
                "type": "object",
                "properties": {
                    "source_lang": {
                        "type": "string",
                        "description": "The source language of the text."
                    },
                    "translated_text": {
                        "type": "string",
                        "description": "The text after being translated."
                    }
                },
                "required": ["source_lang", "translated_text"],
                "additionalProperties": false
            }),
            strict: true,
        },
    }
}

/// One server-sent event chunk of a streamed completion
#[derive(Debug, Deserialize)]
struct StreamChunk {
    /// Completion choices, we only ever request one
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

/// One choice inside a stream chunk
#[derive(Debug, Deserialize)]
struct StreamChoice {
    /// Incremental content delta
    delta: StreamDelta,
}

/// Incremental message content
#[derive(Debug, Deserialize)]
struct StreamDelta {
    /// Content fragment, absent in role-only and final chunks
    #[serde(default)]
    content: Option<String>,
}

impl OpenAI {
    /// Create a new client with an API key and optional base URL override
    ///
    /// The client carries no overall request timeout; the caller enforces
    /// the per-call wall-clock deadline. Connection pooling is enabled for
    /// concurrent sessions sharing one client.
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        OpenAI {
            api_key: api_key.into(),
            base_url,
            client: Client::builder()
                .connect_timeout(Duration::from_secs(30))
                .pool_idle_timeout(Duration::from_secs(90))
                .pool_max_idle_per_host(20)
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Map a non-success HTTP status to a provider error
    fn error_for_status(status: u16, message: String) -> ProviderError {
        match status {
            401 | 403 => ProviderError::AuthenticationError(message),
            429 => ProviderError::RateLimitExceeded(message),
            code => ProviderError::ApiError {
                status_code: code,
                message,
            },
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAI {
    async fn complete_chat(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            stream: true,
            response_format: translation_response_format(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response body".to_string());
            return Err(Self::error_for_status(status.as_u16(), message));
        }

        // Accumulate the SSE stream. Network chunks can split events at any
        // byte, so buffer raw bytes and only parse complete lines.
        let mut stream = response.bytes_stream();
        let mut buffer = BytesMut::new();
        let mut content = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| ProviderError::ConnectionError(format!("Stream error: {}", e)))?;
            buffer.extend_from_slice(&chunk);

            while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
                let line = buffer.split_to(newline + 1);
                let line = String::from_utf8_lossy(&line);
                let line = line.trim();

                let Some(data) = line.strip_prefix("data:") else {
                    continue;
                };
                let data = data.trim();

                if data == "[DONE]" {
                    debug!("Stream finished for model {}", request.model);
                    return Ok(content);
                }

                match serde_json::from_str::<StreamChunk>(data) {
                    Ok(chunk) => {
                        if let Some(delta) = chunk
                            .choices
                            .first()
                            .and_then(|choice| choice.delta.content.as_deref())
                        {
                            content.push_str(delta);
                        }
                    }
                    Err(e) => {
                        debug!("Skipping unparseable stream event: {} ({})", data, e);
                    }
                }
            }
        }

        // Stream ended without a [DONE] marker, return what we accumulated
        Ok(content)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response body".to_string());
            Err(Self::error_for_status(status.as_u16(), message))
        }
    }
}
