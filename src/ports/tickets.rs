//! Ticket backend port.
//!
//! Covers ticket creation at the end of the intake dialogue and status
//! lookups for existing references. Implementations must fail fast with
//! [`TicketError::MissingToken`] when no auth token is supplied - this
//! port performs no login flow.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::domain::IntakeRecord;

/// Port for the external ticket-creation backend.
#[async_trait]
pub trait TicketGateway: Send + Sync {
    /// Submits a completed intake record.
    async fn submit(
        &self,
        record: &IntakeRecord,
        token: Option<&SecretString>,
    ) -> Result<TicketReceipt, TicketError>;

    /// Looks up the status of an existing ticket by reference.
    async fn fetch_status(
        &self,
        reference: &str,
        token: Option<&SecretString>,
    ) -> Result<TicketStatus, TicketError>;
}

/// Result of a successful ticket submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketReceipt {
    /// Server-assigned reference. Absent or empty when the backend did
    /// not return one; the caller then falls back to a local reference.
    #[serde(default, rename = "ticketNumber")]
    pub ticket_number: Option<String>,
}

/// Status of an existing ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStatus {
    #[serde(rename = "ticketNumber")]
    pub reference: String,
    pub status: String,
}

/// Ticket backend errors.
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    /// No auth token supplied; reported before any network call.
    #[error("authentication required")]
    MissingToken,

    /// Backend unreachable or returned a server error.
    #[error("ticket service unavailable: {0}")]
    Unavailable(String),

    /// Request exceeded the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Network-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// No ticket exists for the given reference.
    #[error("ticket {0} not found")]
    NotFound(String),

    /// Non-success response carrying a server-provided message.
    #[error("ticket service error: {0}")]
    Remote(String),

    /// Response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl TicketError {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_deserializes_wire_format() {
        let receipt: TicketReceipt =
            serde_json::from_str(r#"{"ticketNumber":"INC445566","status":"open"}"#).unwrap();
        assert_eq!(receipt.ticket_number.as_deref(), Some("INC445566"));
    }

    #[test]
    fn receipt_tolerates_missing_number() {
        let receipt: TicketReceipt = serde_json::from_str(r#"{}"#).unwrap();
        assert!(receipt.ticket_number.is_none());
    }

    #[test]
    fn status_deserializes_wire_format() {
        let status: TicketStatus =
            serde_json::from_str(r#"{"ticketNumber":"INC445566","status":"In Progress"}"#)
                .unwrap();
        assert_eq!(status.reference, "INC445566");
        assert_eq!(status.status, "In Progress");
    }
}
