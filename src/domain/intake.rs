//! Structured ticket-intake dialogue.
//!
//! A four-step state machine that collects description, department,
//! priority, and scope. There is no error state: invalid situations are
//! absorbed into an apology plus a reset to idle so the conversation
//! never dead-ends.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prompt emitted when intake begins.
pub const DEPARTMENT_PROMPT: &str =
    "Let's create a support ticket. Which department are you in?";

/// Prompt emitted after the department is stored.
pub const PRIORITY_PROMPT: &str =
    "What priority would you assign to this issue? (1 - Low, 2 - Medium, 3 - High)";

/// Prompt emitted after the priority is stored.
pub const SCOPE_PROMPT: &str =
    "Does this issue affect just you, your team, or the whole office?";

/// Emitted when the flow is advanced from an unexpected state.
pub const INVALID_STATE_APOLOGY: &str =
    "Sorry, something went wrong while creating your ticket. Let's start over - \
     how can I help you?";

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Derives a priority from a free-text reply.
    ///
    /// "2"/"medium" wins over "3"/"high" when both appear, matching the
    /// order of the prompt; anything unrecognized defaults to Low.
    pub fn from_reply(reply: &str) -> Self {
        let lower = reply.to_lowercase();
        if lower.contains('2') || lower.contains("medium") {
            Priority::Medium
        } else if lower.contains('3') || lower.contains("high") {
            Priority::High
        } else {
            Priority::Low
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
        }
    }
}

/// A completed intake record, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub description: String,
    pub department: String,
    pub priority: Priority,
    pub scope: String,
}

/// Current step of the intake dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IntakeStep {
    /// No structured intake is active.
    #[default]
    Idle,
    AwaitDepartment,
    AwaitPriority,
    AwaitScope,
}

/// Result of advancing the intake flow by one user reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeAdvance {
    /// Ask the next question (or re-ask the current one on blank input).
    Prompt(&'static str),
    /// All fields collected; the flow has returned to idle.
    Complete(IntakeRecord),
    /// Advanced from an unexpected state; the flow has been reset.
    InvalidState(&'static str),
}

/// Partially built record while the dialogue is running.
#[derive(Debug, Clone, Default)]
struct Draft {
    description: String,
    department: String,
    priority: Priority,
}

/// The intake dialogue state machine.
#[derive(Debug, Clone, Default)]
pub struct IntakeFlow {
    step: IntakeStep,
    draft: Draft,
}

impl IntakeFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> IntakeStep {
        self.step
    }

    /// True iff the dialogue is past the idle step.
    pub fn in_progress(&self) -> bool {
        self.step != IntakeStep::Idle
    }

    /// Starts the dialogue. The triggering message becomes the ticket
    /// description; returns the first prompt.
    pub fn begin(&mut self, description: impl Into<String>) -> &'static str {
        self.draft = Draft {
            description: description.into(),
            ..Draft::default()
        };
        self.step = IntakeStep::AwaitDepartment;
        DEPARTMENT_PROMPT
    }

    /// Feeds one user reply into the dialogue.
    ///
    /// Blank replies re-prompt the current step instead of storing empty
    /// fields. Advancing from idle is treated as an invalid state.
    pub fn advance(&mut self, reply: &str) -> IntakeAdvance {
        let reply = reply.trim();

        match self.step {
            IntakeStep::AwaitDepartment => {
                if reply.is_empty() {
                    return IntakeAdvance::Prompt(DEPARTMENT_PROMPT);
                }
                self.draft.department = reply.to_string();
                self.step = IntakeStep::AwaitPriority;
                IntakeAdvance::Prompt(PRIORITY_PROMPT)
            }
            IntakeStep::AwaitPriority => {
                if reply.is_empty() {
                    return IntakeAdvance::Prompt(PRIORITY_PROMPT);
                }
                self.draft.priority = Priority::from_reply(reply);
                self.step = IntakeStep::AwaitScope;
                IntakeAdvance::Prompt(SCOPE_PROMPT)
            }
            IntakeStep::AwaitScope => {
                if reply.is_empty() {
                    return IntakeAdvance::Prompt(SCOPE_PROMPT);
                }
                let draft = std::mem::take(&mut self.draft);
                self.step = IntakeStep::Idle;
                IntakeAdvance::Complete(IntakeRecord {
                    description: draft.description,
                    department: draft.department,
                    priority: draft.priority,
                    scope: reply.to_string(),
                })
            }
            IntakeStep::Idle => {
                self.reset();
                IntakeAdvance::InvalidState(INVALID_STATE_APOLOGY)
            }
        }
    }

    /// Returns the flow to idle and clears the draft.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Generates a local ticket reference: `INC` plus six random digits.
///
/// Used when the ticket backend is unreachable or returns no number, so
/// the user always receives a reference.
pub fn fallback_ticket_reference() -> String {
    let n: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    format!("INC{n}")
}

/// Finds an `INC######` ticket reference in free text, if present.
pub fn extract_ticket_reference(text: &str) -> Option<String> {
    let upper = text.to_uppercase();
    let bytes = upper.as_bytes();

    for start in upper.match_indices("INC").map(|(i, _)| i) {
        let digits = &bytes[start + 3..];
        if digits.len() >= 6 && digits[..6].iter().all(u8::is_ascii_digit) {
            // Reject longer digit runs, which are not valid references.
            if digits.len() == 6 || !digits[6].is_ascii_digit() {
                return Some(upper[start..start + 9].to_string());
            }
        }
    }
    None
}
