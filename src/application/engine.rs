//! Conversation engine.
//!
//! One engine instance owns one conversation: the chat history, the
//! intake flow, and the loading/visibility flags. Each inbound user
//! message is routed to the intake flow if one is in progress, to a
//! ticket status lookup when the message carries a reference, or to the
//! remote assistant with the keyword classifier as fallback.
//!
//! Nothing here propagates failures to the caller: every error path
//! degrades to a bot message, and the conversation stays usable.

use secrecy::SecretString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::{
    classify, extract_ticket_reference, fallback_ticket_reference, ChatHistory, IntakeAdvance,
    IntakeFlow, IntakeRecord, Message, STATUS_KEYWORDS,
};
use crate::ports::{AssistantClient, TicketError, TicketGateway, TicketStatus};

/// Maximum history entries sent to the remote assistant as context.
pub const HISTORY_CONTEXT_LEN: usize = 10;

const AUTH_APOLOGY: &str = "Sorry, I couldn't create your ticket because you're not signed in. \
     Please log in and try again.";

fn confirmation(ticket_number: &str) -> String {
    format!(
        "Your support ticket {ticket_number} has been created. Our IT team will be in touch \
         shortly. Is there anything else I can help you with?"
    )
}

fn status_reply(status: &TicketStatus) -> String {
    format!(
        "Ticket {} is currently: {}. Anything else I can help with?",
        status.reference, status.status
    )
}

/// Mutable conversation state, serialized behind one lock.
#[derive(Debug, Default)]
struct ConversationState {
    history: ChatHistory,
    intake: IntakeFlow,
}

/// Read-only view of the conversation for the hosting UI.
#[derive(Debug, Clone)]
pub struct ConversationSnapshot {
    pub history: Vec<Message>,
    pub is_loading: bool,
    pub is_open: bool,
    pub intake_in_progress: bool,
}

/// Clears the loading flag on every exit path, including early returns.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Orchestrator for one chat conversation.
///
/// Constructed with its collaborators injected; the host holds one
/// instance per active session. Inbound messages are processed strictly
/// sequentially: the state lock is held for the whole turn, so a second
/// `send_message` waits rather than interleaving intake transitions.
pub struct ConversationEngine {
    assistant: Arc<dyn AssistantClient>,
    tickets: Arc<dyn TicketGateway>,
    auth_token: Option<SecretString>,
    state: Mutex<ConversationState>,
    is_loading: AtomicBool,
    is_open: AtomicBool,
}

impl ConversationEngine {
    /// Creates an engine with a seeded greeting and no auth token.
    pub fn new(assistant: Arc<dyn AssistantClient>, tickets: Arc<dyn TicketGateway>) -> Self {
        Self {
            assistant,
            tickets,
            auth_token: None,
            state: Mutex::new(ConversationState::default()),
            is_loading: AtomicBool::new(false),
            is_open: AtomicBool::new(false),
        }
    }

    /// Attaches the session's bearer token.
    pub fn with_auth_token(mut self, token: SecretString) -> Self {
        self.auth_token = Some(token);
        self
    }

    /// Handles one inbound user message and returns the bot replies
    /// emitted this turn (already appended to the history).
    pub async fn send_message(&self, text: &str) -> Vec<Message> {
        let mut state = self.state.lock().await;
        let _loading = LoadingGuard::engage(&self.is_loading);

        // Context for the remote assistant is the transcript before this
        // message; the message itself travels in its own field.
        let context: Vec<Message> = state.history.context_window(HISTORY_CONTEXT_LEN).to_vec();
        state.history.push(Message::user(text));

        let replies = if state.intake.in_progress() {
            self.drive_intake(&mut state.intake, text).await
        } else if let Some(reference) = status_lookup_reference(text) {
            self.lookup_status(&reference, text).await
        } else {
            self.converse(&mut state.intake, text, &context).await
        };

        for reply in &replies {
            state.history.push(reply.clone());
        }
        replies
    }

    /// Remote assistant with classifier fallback.
    async fn converse(
        &self,
        intake: &mut IntakeFlow,
        text: &str,
        context: &[Message],
    ) -> Vec<Message> {
        let mut replies = Vec::new();

        match self
            .assistant
            .send(text, context, self.auth_token.as_ref())
            .await
        {
            Ok(reply) => {
                replies.push(Message::bot(reply.message));
                if reply.create_ticket {
                    replies.push(Message::bot(intake.begin(text)));
                }
            }
            Err(err) => {
                warn!(error = %err, retryable = err.is_retryable(), "assistant unreachable, using keyword fallback");
                let classification = classify(text);
                replies.push(Message::bot(classification.reply));
                if classification.starts_intake {
                    replies.push(Message::bot(intake.begin(text)));
                }
            }
        }

        replies
    }

    /// Advances the intake dialogue and submits on completion.
    async fn drive_intake(&self, intake: &mut IntakeFlow, text: &str) -> Vec<Message> {
        match intake.advance(text) {
            IntakeAdvance::Prompt(prompt) => vec![Message::bot(prompt)],
            IntakeAdvance::InvalidState(apology) => vec![Message::bot(apology)],
            IntakeAdvance::Complete(record) => vec![self.submit_ticket(record).await],
        }
    }

    /// Best-effort submission: the user always receives a reference, even
    /// when the backend is unreachable.
    async fn submit_ticket(&self, record: IntakeRecord) -> Message {
        let fallback = fallback_ticket_reference();

        match self.tickets.submit(&record, self.auth_token.as_ref()).await {
            Ok(receipt) => {
                let number = receipt
                    .ticket_number
                    .filter(|n| !n.is_empty())
                    .unwrap_or(fallback);
                Message::bot(confirmation(&number))
            }
            Err(TicketError::MissingToken) => {
                warn!("ticket submission attempted without an auth token");
                Message::bot(AUTH_APOLOGY)
            }
            Err(err) => {
                warn!(error = %err, "ticket submission failed, confirming with local reference");
                Message::bot(confirmation(&fallback))
            }
        }
    }

    /// Status lookup for an existing reference; degrades to the canned
    /// status guidance when the lookup fails.
    async fn lookup_status(&self, reference: &str, text: &str) -> Vec<Message> {
        match self
            .tickets
            .fetch_status(reference, self.auth_token.as_ref())
            .await
        {
            Ok(status) => vec![Message::bot(status_reply(&status))],
            Err(err) => {
                warn!(error = %err, %reference, "status lookup failed, using keyword fallback");
                vec![Message::bot(classify(text).reply)]
            }
        }
    }

    /// Replaces the history with the seeded greeting and clears intake.
    pub async fn reset_conversation(&self) {
        let mut state = self.state.lock().await;
        state.history.reset();
        state.intake.reset();
    }

    /// Flips the UI visibility flag.
    pub fn toggle_open(&self) {
        self.is_open.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn set_open(&self, open: bool) {
        self.is_open.store(open, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.is_open.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.load(Ordering::SeqCst)
    }

    pub async fn history(&self) -> Vec<Message> {
        self.state.lock().await.history.messages().to_vec()
    }

    pub async fn intake_in_progress(&self) -> bool {
        self.state.lock().await.intake.in_progress()
    }

    /// Consistent read of everything the hosting UI displays.
    ///
    /// The loading flag is sampled before waiting on the state lock:
    /// the lock is held for the whole of an in-flight turn, so sampling
    /// it afterwards could never observe a turn in progress.
    pub async fn snapshot(&self) -> ConversationSnapshot {
        let is_loading = self.is_loading();
        let state = self.state.lock().await;
        ConversationSnapshot {
            history: state.history.messages().to_vec(),
            is_loading,
            is_open: self.is_open(),
            intake_in_progress: state.intake.in_progress(),
        }
    }
}

/// A status lookup needs both a status-style question and a reference.
fn status_lookup_reference(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let asks_status = STATUS_KEYWORDS.iter().any(|k| lower.contains(k));

    if asks_status {
        extract_ticket_reference(text)
    } else {
        None
    }
}
