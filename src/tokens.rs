/*!
 * Token counting for context budget enforcement.
 *
 * Message sizes are measured with the cl100k_base BPE vocabulary so that the
 * context window budget lines up with what OpenAI-compatible endpoints count.
 */

use once_cell::sync::Lazy;
use tiktoken_rs::{cl100k_base, CoreBPE};

use crate::translation::context::ChatMessage;

// The vocabulary is embedded in the binary, loading it cannot fail at runtime
static ENCODER: Lazy<CoreBPE> = Lazy::new(|| {
    cl100k_base().expect("cl100k_base vocabulary failed to load")
});

/// Estimates the size of messages in model-token units using a fixed
/// tokenizer vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCounter;

impl TokenCounter {
    /// Create a new token counter
    pub fn new() -> Self {
        TokenCounter
    }

    /// Count the tokens in a single piece of text
    pub fn count_text(&self, text: &str) -> usize {
        ENCODER.encode_with_special_tokens(text).len()
    }

    /// Count the combined tokens of a message sequence
    pub fn count_messages<'a, I>(&self, messages: I) -> usize
    where
        I: IntoIterator<Item = &'a ChatMessage>,
    {
        messages
            .into_iter()
            .map(|message| self.count_text(&message.content))
            .sum()
    }
}
