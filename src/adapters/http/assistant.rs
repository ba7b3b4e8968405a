//! HTTP client for the remote assistant endpoint.
//!
//! Posts `{ message, history }` to `<base_url>/chatbot` with optional
//! bearer auth. Non-2xx responses carry `{ "message": ... }` as the error
//! description; timeouts and connection failures map to retryable
//! variants so the engine falls back to the local classifier.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AssistantConfig;
use crate::domain::Message;
use crate::ports::{AssistantClient, AssistantError, AssistantReply};

/// reqwest-backed [`AssistantClient`].
pub struct HttpAssistantClient {
    config: AssistantConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    history: &'a [Message],
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpAssistantClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: AssistantConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn chat_url(&self) -> String {
        format!("{}/chatbot", self.config.base_url)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> AssistantError {
        if err.is_timeout() {
            AssistantError::Timeout {
                timeout_secs: self.config.timeout_secs as u32,
            }
        } else if err.is_connect() {
            AssistantError::network(format!("Connection failed: {err}"))
        } else {
            AssistantError::network(err.to_string())
        }
    }
}

/// Maps a non-success status plus response body to an error.
fn status_error(status: StatusCode, body: &str) -> AssistantError {
    let server_message = serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| "Error communicating with the assistant service".to_string());

    match status.as_u16() {
        401 | 403 => AssistantError::AuthenticationFailed,
        500..=599 => AssistantError::unavailable(format!("Server error {status}: {server_message}")),
        _ => AssistantError::remote(server_message),
    }
}

#[async_trait]
impl AssistantClient for HttpAssistantClient {
    async fn send(
        &self,
        message: &str,
        context: &[Message],
        token: Option<&SecretString>,
    ) -> Result<AssistantReply, AssistantError> {
        debug!(
            context_len = context.len(),
            authenticated = token.is_some(),
            "sending message to remote assistant"
        );

        let mut request = self.client.post(self.chat_url()).json(&ChatRequest {
            message,
            history: context,
        });

        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        response
            .json::<AssistantReply>()
            .await
            .map_err(|e| AssistantError::parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_appends_endpoint() {
        let client = HttpAssistantClient::new(AssistantConfig {
            base_url: "http://localhost:5000/api".to_string(),
            ..Default::default()
        });
        assert_eq!(client.chat_url(), "http://localhost:5000/api/chatbot");
    }

    #[test]
    fn status_error_uses_server_message() {
        let err = status_error(StatusCode::BAD_REQUEST, r#"{"message":"bad history"}"#);
        assert!(matches!(err, AssistantError::Remote(m) if m == "bad history"));
    }

    #[test]
    fn status_error_falls_back_on_unparseable_body() {
        let err = status_error(StatusCode::BAD_REQUEST, "<html>oops</html>");
        assert!(matches!(err, AssistantError::Remote(m) if m.contains("assistant service")));
    }

    #[test]
    fn unauthorized_maps_to_authentication_failed() {
        let err = status_error(StatusCode::UNAUTHORIZED, "{}");
        assert!(matches!(err, AssistantError::AuthenticationFailed));
    }

    #[test]
    fn server_errors_map_to_unavailable() {
        let err = status_error(StatusCode::BAD_GATEWAY, r#"{"message":"upstream down"}"#);
        assert!(matches!(err, AssistantError::Unavailable(m) if m.contains("upstream down")));
    }

    #[test]
    fn request_payload_shape() {
        let history = vec![Message::user("hello")];
        let payload = serde_json::to_value(&ChatRequest {
            message: "anyone there?",
            history: &history,
        })
        .unwrap();

        assert_eq!(payload["message"], "anyone there?");
        assert_eq!(payload["history"][0]["text"], "hello");
        assert_eq!(payload["history"][0]["sender"], "user");
    }
}
