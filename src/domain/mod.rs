//! Domain logic for the intake assistant.
//!
//! Everything in this module is pure: no I/O, no clocks beyond message
//! timestamping, no dependence on the transport adapters.

pub mod classifier;
pub mod intake;
pub mod message;

pub use classifier::{classify, Classification, STATUS_KEYWORDS};
pub use intake::{
    extract_ticket_reference, fallback_ticket_reference, IntakeAdvance, IntakeFlow, IntakeRecord,
    IntakeStep, Priority,
};
pub use message::{ChatHistory, Message, Sender, GREETING};
