//! Application layer - the conversation orchestrator.

mod engine;

pub use engine::{ConversationEngine, ConversationSnapshot, HISTORY_CONTEXT_LEN};
