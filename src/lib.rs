/*!
 * # anytrans - AI-powered file translation
 *
 * A Rust library for translating subtitle and plain text files with
 * OpenAI-compatible chat completion endpoints.
 *
 * ## Features
 *
 * - SRT subtitle parsing and serialization with timing preserved
 * - Plain text translation, one line per unit
 * - Concurrent translation sessions with deterministic output order
 * - Per-session conversation history under a token budget
 * - Ranked model fallback and bounded retry on malformed responses
 * - ISO 639-1 and ISO 639-3 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT file handling and processing
 * - `translation`: The translation pipeline:
 *   - `translation::context`: Token-bounded conversation history
 *   - `translation::service`: Per-session remote translation
 *   - `translation::scheduler`: Session partitioning and merging
 * - `prompts`: System prompt, query and corrective templates
 * - `tokens`: Token counting for the context budget
 * - `timeout`: Wall-clock deadlines for async and blocking work
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Chat completion client implementations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language_utils;
pub mod prompts;
pub mod providers;
pub mod subtitle_processor;
pub mod timeout;
pub mod tokens;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ProviderError, TranslationError};
pub use language_utils::{describe_language, get_language_name, validate_language_code};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use translation::{TranslationOutcome, TranslationService, TranslationUnit, UnitResult};
