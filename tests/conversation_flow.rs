//! End-to-end conversation scenarios over the engine with mocked ports.

use std::sync::{Arc, Once};

use secrecy::SecretString;
use stackit_assist::adapters::mock::{MockAssistantClient, MockTicketGateway};
use stackit_assist::application::ConversationEngine;
use stackit_assist::domain::{extract_ticket_reference, Priority, Sender, GREETING};

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "stackit_assist=debug".into()),
            )
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn token() -> SecretString {
    SecretString::new("session-token".to_string())
}

/// The worst-case intake walk: assistant offline, ticket backend unreachable.
/// The user must still end up with exactly one confirmation carrying an
/// `INC######` reference.
#[tokio::test]
async fn offline_intake_flow_confirms_with_local_reference() {
    init_tracing();

    let tickets = MockTicketGateway::new(); // empty script = unavailable
    let engine = ConversationEngine::new(
        Arc::new(MockAssistantClient::always_unavailable()),
        Arc::new(tickets.clone()),
    )
    .with_auth_token(token());

    assert!(!engine.intake_in_progress().await);

    engine.send_message("create ticket please").await;
    assert!(engine.intake_in_progress().await);

    engine.send_message("Engineering").await;
    assert!(engine.intake_in_progress().await);

    engine.send_message("high").await;
    assert!(engine.intake_in_progress().await);

    let replies = engine.send_message("just me").await;
    assert!(!engine.intake_in_progress().await);

    // Exactly one confirmation with a well-formed local reference.
    let confirmations: Vec<_> = engine
        .history()
        .await
        .into_iter()
        .filter(|m| m.sender == Sender::Bot && m.text.contains("has been created"))
        .collect();
    assert_eq!(confirmations.len(), 1);
    assert_eq!(replies.last().unwrap().text, confirmations[0].text);

    let reference = extract_ticket_reference(&confirmations[0].text)
        .expect("confirmation carries an INC reference");
    assert!(reference.starts_with("INC"));
    assert_eq!(reference.len(), 9);

    // The record reached the gateway with the derived priority.
    let submissions = tickets.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].description, "create ticket please");
    assert_eq!(submissions[0].department, "Engineering");
    assert_eq!(submissions[0].priority, Priority::High);
    assert_eq!(submissions[0].scope, "just me");

    assert!(!engine.is_loading());
}

/// A longer mixed conversation: chit-chat via the assistant, an intake
/// started by the remote create-ticket signal, and a reset at the end.
#[tokio::test]
async fn mixed_conversation_with_remote_assistant() {
    init_tracing();

    let assistant = MockAssistantClient::new()
        .with_reply("Hi! What seems to be the problem?")
        .with_ticket_reply("That sounds frustrating. Let me open a ticket.");
    let tickets = MockTicketGateway::new().with_receipt("INC314159");
    let engine = ConversationEngine::new(Arc::new(assistant.clone()), Arc::new(tickets.clone()))
        .with_auth_token(token());

    engine.send_message("hello").await;

    engine
        .send_message("my laptop reboots every hour, please help")
        .await;
    assert!(engine.intake_in_progress().await);

    engine.send_message("Marketing").await;
    engine.send_message("2").await;
    let replies = engine.send_message("the whole office").await;

    assert!(replies[0].text.contains("INC314159"));
    assert!(!engine.intake_in_progress().await);

    // Intake turns never reached the remote assistant.
    assert_eq!(assistant.call_count(), 2);

    let submissions = tickets.submissions();
    assert_eq!(submissions[0].priority, Priority::Medium);
    assert_eq!(
        submissions[0].description,
        "my laptop reboots every hour, please help"
    );

    engine.reset_conversation().await;
    let history = engine.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text, GREETING);
}

/// Blank intake replies re-prompt instead of storing empty fields.
#[tokio::test]
async fn blank_replies_reprompt_the_same_step() {
    init_tracing();

    let tickets = MockTicketGateway::new().with_receipt("INC200300");
    let engine = ConversationEngine::new(
        Arc::new(MockAssistantClient::always_unavailable()),
        Arc::new(tickets.clone()),
    )
    .with_auth_token(token());

    engine.send_message("I want to open a ticket").await;

    let replies = engine.send_message("   ").await;
    assert!(replies[0].text.contains("Which department"));
    assert!(engine.intake_in_progress().await);

    engine.send_message("Support").await;
    engine.send_message("1").await;
    engine.send_message("me only").await;

    let submissions = tickets.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].department, "Support");
    assert_eq!(submissions[0].priority, Priority::Low);
}

/// Unauthenticated sessions get an apology instead of a dead end, and the
/// conversation remains usable afterwards.
#[tokio::test]
async fn unauthenticated_submission_apologizes_and_recovers() {
    init_tracing();

    let engine = ConversationEngine::new(
        Arc::new(MockAssistantClient::always_unavailable()),
        Arc::new(MockTicketGateway::new()),
    );

    engine.send_message("raise a support request").await;
    engine.send_message("HR").await;
    engine.send_message("3").await;
    let replies = engine.send_message("everyone").await;

    assert!(replies[0].text.contains("not signed in"));
    assert!(!engine.intake_in_progress().await);
    assert!(!engine.is_loading());

    // Conversation continues normally after the apology.
    let replies = engine.send_message("thanks anyway").await;
    assert!(replies[0].text.contains("You're welcome"));
}
