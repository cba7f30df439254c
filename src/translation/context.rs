/*!
 * Conversation context for translation sessions.
 *
 * Each session owns one ContextWindow: an ordered log of prior
 * request/response turns (excluding the fixed system prompt) that is trimmed
 * from the oldest end whenever the combined token cost of system prompt,
 * retained turns and pending query would exceed the configured budget.
 */

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::tokens::TokenCounter;

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Fixed instruction message
    System,
    /// Request message
    User,
    /// Response message
    Assistant,
}

/// One conversation turn, either a request or a response message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Bounded, per-session ordered log of prior exchanges.
///
/// Owned by exactly one session worker and never shared across sessions.
#[derive(Debug)]
pub struct ContextWindow {
    /// Retained turns, oldest first
    turns: VecDeque<ChatMessage>,

    /// Token budget for system prompt + turns + pending query
    max_tokens: usize,
}

impl ContextWindow {
    /// Create an empty context window with the given token budget
    pub fn new(max_tokens: usize) -> Self {
        ContextWindow {
            turns: VecDeque::new(),
            max_tokens,
        }
    }

    /// Number of retained turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the window holds no turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Iterate over the retained turns, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.turns.iter()
    }

    /// Append a turn to the newest end of the window
    pub fn push(&mut self, message: ChatMessage) {
        self.turns.push_back(message);
    }

    /// Combined token cost of system prompt, retained turns and pending query
    fn cost(&self, system: &ChatMessage, query: &ChatMessage, counter: &TokenCounter) -> usize {
        counter.count_text(&system.content)
            + counter.count_messages(self.turns.iter())
            + counter.count_text(&query.content)
    }

    /// Assemble the outbound message sequence for one call, trimming first.
    ///
    /// While the combined cost exceeds the budget and more than one turn is
    /// retained, the oldest turn is dropped. The window never shrinks below
    /// one retained turn, so a single oversized query can still exceed the
    /// budget; the call then proceeds with the oversized payload.
    pub fn build_messages(
        &mut self,
        system: &ChatMessage,
        query: &ChatMessage,
        counter: &TokenCounter,
    ) -> Vec<ChatMessage> {
        while self.cost(system, query, counter) > self.max_tokens && self.turns.len() > 1 {
            self.turns.pop_front();
        }

        let mut messages = Vec::with_capacity(self.turns.len() + 2);
        messages.push(system.clone());
        messages.extend(self.turns.iter().cloned());
        messages.push(query.clone());
        messages
    }
}
