//! Ports - interfaces to external collaborators.
//!
//! The engine talks to the remote assistant and the ticket backend only
//! through these traits, so transports can be swapped and tests can run
//! against scripted mocks.

mod assistant;
mod tickets;

pub use assistant::{AssistantClient, AssistantError, AssistantReply};
pub use tickets::{TicketError, TicketGateway, TicketReceipt, TicketStatus};
