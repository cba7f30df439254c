/*!
 * Translation pipeline core.
 *
 * `context` keeps per-session conversation history inside a token budget,
 * `service` drives a single session against the remote provider, and
 * `scheduler` partitions the unit sequence, runs the sessions concurrently
 * and merges the results back into global order.
 */

pub mod context;
pub mod scheduler;
pub mod service;

pub use context::{ChatMessage, ContextWindow, MessageRole};
pub use scheduler::{partition_units, run_sessions, SessionPartition, TranslationUnit, UnitResult};
pub use service::{ServiceSettings, TranslationOutcome, TranslationService};
