//! StackIT Assist - Conversational Ticket-Intake Engine
//!
//! This crate implements the chat-driven intake assistant of the StackIT
//! help desk: keyword intent classification, a structured four-step ticket
//! dialogue, and best-effort ticket submission with local fallbacks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
