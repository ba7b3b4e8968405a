//! Mock port implementations for testing.
//!
//! Configurable scripted responses, error injection, and call recording
//! so the engine can be exercised without a reachable backend.
//!
//! # Example
//!
//! ```ignore
//! let assistant = MockAssistantClient::new()
//!     .with_reply("Hello, how can I help?")
//!     .with_error(MockAssistantError::Unavailable);
//! ```

use async_trait::async_trait;
use secrecy::SecretString;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::{IntakeRecord, Message};
use crate::ports::{
    AssistantClient, AssistantError, AssistantReply, TicketError, TicketGateway, TicketReceipt,
    TicketStatus,
};

/// Error kinds the mock assistant can inject.
#[derive(Debug, Clone)]
pub enum MockAssistantError {
    Unavailable,
    Timeout,
    Network,
    AuthenticationFailed,
    Remote(String),
}

impl From<MockAssistantError> for AssistantError {
    fn from(err: MockAssistantError) -> Self {
        match err {
            MockAssistantError::Unavailable => AssistantError::unavailable("mock unavailable"),
            MockAssistantError::Timeout => AssistantError::Timeout { timeout_secs: 30 },
            MockAssistantError::Network => AssistantError::network("mock network failure"),
            MockAssistantError::AuthenticationFailed => AssistantError::AuthenticationFailed,
            MockAssistantError::Remote(message) => AssistantError::remote(message),
        }
    }
}

/// One recorded call to the mock assistant.
#[derive(Debug, Clone)]
pub struct RecordedSend {
    pub message: String,
    pub context: Vec<Message>,
    pub authenticated: bool,
}

#[derive(Debug, Clone)]
enum ScriptedReply {
    Reply(AssistantReply),
    Error(MockAssistantError),
}

/// Scripted [`AssistantClient`] (replies consumed in order).
#[derive(Debug, Clone, Default)]
pub struct MockAssistantClient {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    calls: Arc<Mutex<Vec<RecordedSend>>>,
    fail_when_empty: Arc<Mutex<bool>>,
    latency: Arc<Mutex<Option<Duration>>>,
}

impl MockAssistantClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a plain reply.
    pub fn with_reply(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Reply(AssistantReply {
                message: message.into(),
                create_ticket: false,
            }));
        self
    }

    /// Queues a reply that signals the intake flow to start.
    pub fn with_ticket_reply(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Reply(AssistantReply {
                message: message.into(),
                create_ticket: true,
            }));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: MockAssistantError) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Error(error));
        self
    }

    /// Delays every call, so a turn stays in flight long enough for
    /// another task to observe it.
    pub fn with_latency(self, delay: Duration) -> Self {
        *self.latency.lock().unwrap() = Some(delay);
        self
    }

    /// Makes every call fail (convenience for unreachable-endpoint tests).
    pub fn always_unavailable() -> Self {
        // An empty queue with the failure default below would answer with
        // a canned reply, so mark the client as persistently failing.
        let client = Self::new();
        *client.fail_when_empty.lock().unwrap() = true;
        client
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedSend> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssistantClient for MockAssistantClient {
    async fn send(
        &self,
        message: &str,
        context: &[Message],
        token: Option<&SecretString>,
    ) -> Result<AssistantReply, AssistantError> {
        self.calls.lock().unwrap().push(RecordedSend {
            message: message.to_string(),
            context: context.to_vec(),
            authenticated: token.is_some(),
        });

        let latency = *self.latency.lock().unwrap();
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }

        if *self.fail_when_empty.lock().unwrap() && self.replies.lock().unwrap().is_empty() {
            return Err(AssistantError::unavailable("mock unavailable"));
        }

        match self.replies.lock().unwrap().pop_front() {
            Some(ScriptedReply::Reply(reply)) => Ok(reply),
            Some(ScriptedReply::Error(err)) => Err(err.into()),
            None => Ok(AssistantReply {
                message: "Mock assistant reply".to_string(),
                create_ticket: false,
            }),
        }
    }
}

/// Error kinds the mock gateway can inject.
#[derive(Debug, Clone)]
pub enum MockTicketError {
    Unavailable,
    Timeout,
    Network,
    NotFound(String),
    Remote(String),
}

impl From<MockTicketError> for TicketError {
    fn from(err: MockTicketError) -> Self {
        match err {
            MockTicketError::Unavailable => TicketError::unavailable("mock unavailable"),
            MockTicketError::Timeout => TicketError::Timeout { timeout_secs: 30 },
            MockTicketError::Network => TicketError::network("mock network failure"),
            MockTicketError::NotFound(reference) => TicketError::NotFound(reference),
            MockTicketError::Remote(message) => TicketError::remote(message),
        }
    }
}

/// Scripted [`TicketGateway`].
///
/// Mirrors the real gateway's fail-fast contract: calls without a token
/// return [`TicketError::MissingToken`] before consulting the script.
#[derive(Debug, Clone, Default)]
pub struct MockTicketGateway {
    receipts: Arc<Mutex<VecDeque<Result<TicketReceipt, MockTicketError>>>>,
    statuses: Arc<Mutex<VecDeque<Result<TicketStatus, MockTicketError>>>>,
    submissions: Arc<Mutex<Vec<IntakeRecord>>>,
    status_queries: Arc<Mutex<Vec<String>>>,
}

impl MockTicketGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful submission receipt.
    pub fn with_receipt(self, ticket_number: impl Into<String>) -> Self {
        self.receipts.lock().unwrap().push_back(Ok(TicketReceipt {
            ticket_number: Some(ticket_number.into()),
        }));
        self
    }

    /// Queues a receipt without a server-assigned number.
    pub fn with_empty_receipt(self) -> Self {
        self.receipts.lock().unwrap().push_back(Ok(TicketReceipt {
            ticket_number: None,
        }));
        self
    }

    /// Queues a submission error.
    pub fn with_submit_error(self, error: MockTicketError) -> Self {
        self.receipts.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queues a status lookup result.
    pub fn with_status(self, reference: impl Into<String>, status: impl Into<String>) -> Self {
        self.statuses.lock().unwrap().push_back(Ok(TicketStatus {
            reference: reference.into(),
            status: status.into(),
        }));
        self
    }

    /// Queues a status lookup error.
    pub fn with_status_error(self, error: MockTicketError) -> Self {
        self.statuses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn submissions(&self) -> Vec<IntakeRecord> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn status_queries(&self) -> Vec<String> {
        self.status_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl TicketGateway for MockTicketGateway {
    async fn submit(
        &self,
        record: &IntakeRecord,
        token: Option<&SecretString>,
    ) -> Result<TicketReceipt, TicketError> {
        if token.is_none() {
            return Err(TicketError::MissingToken);
        }
        self.submissions.lock().unwrap().push(record.clone());

        match self.receipts.lock().unwrap().pop_front() {
            Some(Ok(receipt)) => Ok(receipt),
            Some(Err(err)) => Err(err.into()),
            None => Err(TicketError::unavailable("mock unavailable")),
        }
    }

    async fn fetch_status(
        &self,
        reference: &str,
        token: Option<&SecretString>,
    ) -> Result<TicketStatus, TicketError> {
        if token.is_none() {
            return Err(TicketError::MissingToken);
        }
        self.status_queries.lock().unwrap().push(reference.to_string());

        match self.statuses.lock().unwrap().pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(err)) => Err(err.into()),
            None => Err(TicketError::NotFound(reference.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;

    fn token() -> SecretString {
        SecretString::new("test-token".to_string())
    }

    fn record() -> IntakeRecord {
        IntakeRecord {
            description: "d".to_string(),
            department: "Engineering".to_string(),
            priority: Priority::Medium,
            scope: "team".to_string(),
        }
    }

    #[tokio::test]
    async fn assistant_replies_consumed_in_order() {
        let client = MockAssistantClient::new()
            .with_reply("first")
            .with_ticket_reply("second");

        let a = client.send("hi", &[], None).await.unwrap();
        let b = client.send("hi again", &[], None).await.unwrap();

        assert_eq!(a.message, "first");
        assert!(!a.create_ticket);
        assert_eq!(b.message, "second");
        assert!(b.create_ticket);
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn assistant_records_context_and_auth() {
        let client = MockAssistantClient::new().with_reply("ok");
        let context = vec![Message::user("earlier")];

        client
            .send("now", &context, Some(&token()))
            .await
            .unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].message, "now");
        assert_eq!(calls[0].context.len(), 1);
        assert!(calls[0].authenticated);
    }

    #[tokio::test]
    async fn always_unavailable_keeps_failing() {
        let client = MockAssistantClient::always_unavailable();
        assert!(client.send("a", &[], None).await.is_err());
        assert!(client.send("b", &[], None).await.is_err());
    }

    #[tokio::test]
    async fn gateway_requires_token() {
        let gateway = MockTicketGateway::new().with_receipt("INC100200");
        let result = gateway.submit(&record(), None).await;
        assert!(matches!(result, Err(TicketError::MissingToken)));
        assert!(gateway.submissions().is_empty());
    }

    #[tokio::test]
    async fn gateway_records_submissions() {
        let gateway = MockTicketGateway::new().with_receipt("INC100200");
        let receipt = gateway.submit(&record(), Some(&token())).await.unwrap();

        assert_eq!(receipt.ticket_number.as_deref(), Some("INC100200"));
        assert_eq!(gateway.submissions().len(), 1);
        assert_eq!(gateway.submissions()[0].department, "Engineering");
    }

    #[tokio::test]
    async fn gateway_defaults_to_unavailable_when_script_is_empty() {
        let gateway = MockTicketGateway::new();
        let result = gateway.submit(&record(), Some(&token())).await;
        assert!(matches!(result, Err(TicketError::Unavailable(_))));
    }

    #[tokio::test]
    async fn status_lookup_scripts_work() {
        let gateway = MockTicketGateway::new().with_status("INC123456", "In Progress");
        let status = gateway
            .fetch_status("INC123456", Some(&token()))
            .await
            .unwrap();

        assert_eq!(status.status, "In Progress");
        assert_eq!(gateway.status_queries(), vec!["INC123456".to_string()]);
    }
}
