//! HTTP implementations of the assistant and ticket ports.

mod assistant;
mod tickets;

pub use assistant::HttpAssistantClient;
pub use tickets::HttpTicketGateway;
