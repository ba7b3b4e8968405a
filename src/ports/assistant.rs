//! Remote assistant port.
//!
//! Abstracts the conversational AI endpoint. The engine treats every
//! failure the same way - fall back to the local keyword classifier - so
//! the error taxonomy here mostly feeds logging.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::domain::Message;

/// Port for the external conversational assistant.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Sends one user message with bounded transcript context.
    ///
    /// `context` carries the recent history; callers are responsible for
    /// truncating it. `token` enables authenticated mode when present.
    async fn send(
        &self,
        message: &str,
        context: &[Message],
        token: Option<&SecretString>,
    ) -> Result<AssistantReply, AssistantError>;
}

/// A successful assistant response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    /// Text to show the user.
    pub message: String,
    /// True when the assistant wants the structured intake flow to start,
    /// equivalent to the classifier's start-intake signal.
    #[serde(default, rename = "createTicket")]
    pub create_ticket: bool,
}

/// Assistant transport and protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// Endpoint unreachable or returned a server error.
    #[error("assistant unavailable: {0}")]
    Unavailable(String),

    /// Request exceeded the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Network-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint rejected the auth token.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Non-success response carrying a server-provided message.
    #[error("assistant error: {0}")]
    Remote(String),

    /// Response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl AssistantError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// True for failures worth retrying against the same endpoint.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AssistantError::Unavailable(_)
                | AssistantError::Network(_)
                | AssistantError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_deserializes_wire_format() {
        let reply: AssistantReply =
            serde_json::from_str(r#"{"message":"Hello","createTicket":true}"#).unwrap();
        assert_eq!(reply.message, "Hello");
        assert!(reply.create_ticket);
    }

    #[test]
    fn create_ticket_defaults_to_false() {
        let reply: AssistantReply = serde_json::from_str(r#"{"message":"Hi"}"#).unwrap();
        assert!(!reply.create_ticket);
    }

    #[test]
    fn retryable_classification() {
        assert!(AssistantError::unavailable("down").is_retryable());
        assert!(AssistantError::network("refused").is_retryable());
        assert!(AssistantError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!AssistantError::AuthenticationFailed.is_retryable());
        assert!(!AssistantError::remote("bad request").is_retryable());
        assert!(!AssistantError::parse("garbage").is_retryable());
    }
}
