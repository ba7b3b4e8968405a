//! Adapters - concrete implementations of the ports.

pub mod http;
pub mod mock;

pub use http::{HttpAssistantClient, HttpTicketGateway};
pub use mock::{MockAssistantClient, MockTicketGateway};
