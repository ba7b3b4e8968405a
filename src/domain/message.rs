//! Chat messages and conversation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Greeting seeded into every new conversation.
pub const GREETING: &str =
    "Hi there! I'm your StackIT Assistant. How can I help you with your IT concerns today?";

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single chat message. Immutable once appended to the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a new message stamped with the current time.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    /// Creates a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Creates a bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }
}

/// Ordered chat transcript for one conversation.
///
/// Order is significant: it is both the display order and the context sent
/// to the remote assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    messages: Vec<Message>,
}

impl ChatHistory {
    /// Creates a history seeded with the bot greeting.
    pub fn seeded() -> Self {
        Self {
            messages: vec![Message::bot(GREETING)],
        }
    }

    /// Appends a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages in chronological order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The last `n` messages, used as transcript context for the remote
    /// assistant so outbound payloads stay bounded as conversations grow.
    pub fn context_window(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Discards everything and reseeds the greeting.
    pub fn reset(&mut self) {
        *self = Self::seeded();
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::seeded()
    }
}
