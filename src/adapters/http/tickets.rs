//! HTTP gateway for the ticket backend.
//!
//! Posts completed intake records to `<base_url>/tickets` and fetches
//! status from `<base_url>/tickets/<reference>`. Bearer auth is
//! mandatory: requests without a token fail fast with
//! [`TicketError::MissingToken`] and never reach the network.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::config::TicketsConfig;
use crate::domain::IntakeRecord;
use crate::ports::{TicketError, TicketGateway, TicketReceipt, TicketStatus};

/// reqwest-backed [`TicketGateway`].
pub struct HttpTicketGateway {
    config: TicketsConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpTicketGateway {
    /// Creates a new gateway with the given configuration.
    pub fn new(config: TicketsConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn tickets_url(&self) -> String {
        format!("{}/tickets", self.config.base_url)
    }

    fn ticket_url(&self, reference: &str) -> String {
        format!("{}/tickets/{reference}", self.config.base_url)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> TicketError {
        if err.is_timeout() {
            TicketError::Timeout {
                timeout_secs: self.config.timeout_secs as u32,
            }
        } else if err.is_connect() {
            TicketError::network(format!("Connection failed: {err}"))
        } else {
            TicketError::network(err.to_string())
        }
    }
}

/// Maps a non-success status plus response body to an error.
fn status_error(status: StatusCode, body: &str, reference: Option<&str>) -> TicketError {
    let server_message = serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| "Error communicating with the ticket service".to_string());

    match (status.as_u16(), reference) {
        (404, Some(reference)) => TicketError::NotFound(reference.to_string()),
        (500..=599, _) => {
            TicketError::unavailable(format!("Server error {status}: {server_message}"))
        }
        _ => TicketError::remote(server_message),
    }
}

#[async_trait]
impl TicketGateway for HttpTicketGateway {
    async fn submit(
        &self,
        record: &IntakeRecord,
        token: Option<&SecretString>,
    ) -> Result<TicketReceipt, TicketError> {
        let token = token.ok_or(TicketError::MissingToken)?;

        debug!(
            department = %record.department,
            priority = %record.priority,
            "submitting support ticket"
        );

        let response = self
            .client
            .post(self.tickets_url())
            .bearer_auth(token.expose_secret())
            .json(record)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, None));
        }

        response
            .json::<TicketReceipt>()
            .await
            .map_err(|e| TicketError::parse(e.to_string()))
    }

    async fn fetch_status(
        &self,
        reference: &str,
        token: Option<&SecretString>,
    ) -> Result<TicketStatus, TicketError> {
        let token = token.ok_or(TicketError::MissingToken)?;

        debug!(%reference, "fetching ticket status");

        let response = self
            .client
            .get(self.ticket_url(reference))
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, Some(reference)));
        }

        response
            .json::<TicketStatus>()
            .await
            .map_err(|e| TicketError::parse(e.to_string()))
    }
}
