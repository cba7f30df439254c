/*!
 * Error types for the anytrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to a chat completion API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while translating a single unit
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The model response was not valid JSON
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// The model response was valid JSON but did not match the
    /// two-field translation schema
    #[error("Response violates translation schema: {0}")]
    SchemaViolation(String),

    /// The call exceeded its wall-clock deadline
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The candidate model list was empty
    #[error("No candidate models configured")]
    NoModelsConfigured,

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl TranslationError {
    /// Whether the outer retry policy should re-attempt the whole
    /// translation after seeing this error.
    ///
    /// Only prompt-adherence failures and timeouts are retried; transient
    /// provider failures are handled by model fallback instead.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::MalformedResponse(_) | Self::SchemaViolation(_) | Self::Timeout(_)
        )
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the run configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_error_retryable_for_prompt_adherence_failures() {
        assert!(TranslationError::MalformedResponse("not json".to_string()).is_retryable());
        assert!(TranslationError::SchemaViolation("missing field".to_string()).is_retryable());
        assert!(TranslationError::Timeout(Duration::from_secs(120)).is_retryable());
    }

    #[test]
    fn test_translation_error_not_retryable_for_transient_or_config() {
        let provider = TranslationError::Provider(ProviderError::RateLimitExceeded(
            "slow down".to_string(),
        ));
        assert!(!provider.is_retryable());
        assert!(!TranslationError::NoModelsConfigured.is_retryable());
    }

    #[test]
    fn test_app_error_from_io_error_maps_to_file() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let app_error = AppError::from(io_error);
        assert!(matches!(app_error, AppError::File(_)));
    }
}
