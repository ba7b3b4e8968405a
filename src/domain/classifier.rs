//! Keyword-based intent classification.
//!
//! Used whenever the remote assistant is unreachable: the message is
//! lower-cased and tested against an ordered table of keyword groups.
//! The first matching group wins, so groups are ordered from most
//! specific to most generic with the catch-alls last. Only the explicit
//! ticket/support-request group starts the structured intake flow.

/// Messages shorter than this that match no keyword group are treated as
/// greetings rather than falling through to the default reply.
const SHORT_MESSAGE_LEN: usize = 10;

/// Outcome of classifying one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Canned guidance reply for the matched group.
    pub reply: &'static str,
    /// True only for the explicit ticket/support-request group.
    pub starts_intake: bool,
}

/// One keyword group: any keyword contained in the lower-cased message
/// selects this group's reply.
struct Rule {
    keywords: &'static [&'static str],
    reply: &'static str,
    starts_intake: bool,
}

const DEFAULT_REPLY: &str = "I'm here to help with your IT support needs. \
    Could you provide more details about your issue?";

const GREETING_REPLY: &str = "Hello! I'm the StackIT Assistant. \
    Tell me about the IT issue you're running into and I'll do my best to help.";

/// Keywords that mark a message as asking about an existing ticket.
///
/// Shared with the engine's status-lookup routing so the router and the
/// canned status guidance always recognize the same phrasing.
pub const STATUS_KEYWORDS: &[&str] = &["status", "any update", "follow up", "progress"];

/// Evaluation order is significant: first match wins.
const RULES: &[Rule] = &[
    Rule {
        keywords: &["network", "internet", "wifi", "wi-fi", "connection"],
        reply: "I see you're having network issues. Have you tried restarting your router \
            or checking your network cables? If the problem persists, I can create a \
            network support ticket for you.",
        starts_intake: false,
    },
    Rule {
        keywords: &["password", "reset", "login", "locked out", "account"],
        reply: "For password resets, I'll need to verify your identity. Please provide \
            your employee ID or the email address associated with your account.",
        starts_intake: false,
    },
    Rule {
        keywords: &["software", "install", "application", "program"],
        reply: "For software installation issues, please let me know which application \
            you're trying to install and any error messages you're seeing. Our IT team \
            can help with approved software deployments.",
        starts_intake: false,
    },
    Rule {
        keywords: &["hardware", "device", "printer", "monitor", "keyboard", "mouse"],
        reply: "I can help with hardware issues. Please provide details about the device \
            (model, asset tag if available) and describe the problem you're experiencing.",
        starts_intake: false,
    },
    Rule {
        keywords: &["email", "outlook", "mailbox", "inbox"],
        reply: "For email issues, please check whether you can sign in via webmail first. \
            If that also fails, let me know the exact error message and I can route this \
            to the email team.",
        starts_intake: false,
    },
    Rule {
        keywords: &["vpn", "remote access", "work from home"],
        reply: "VPN trouble is usually fixed by disconnecting, restarting the VPN client, \
            and reconnecting. If you still can't connect, tell me the error code shown \
            by the client.",
        starts_intake: false,
    },
    Rule {
        keywords: &["virus", "malware", "phishing", "suspicious", "hacked"],
        reply: "Thanks for flagging a possible security issue. Please don't click any \
            further links or open attachments. Disconnect from the network if you \
            suspect an infection, and the security team will be alerted.",
        starts_intake: false,
    },
    Rule {
        keywords: &["phone", "mobile", "tablet", "ipad", "android", "iphone"],
        reply: "For mobile device issues, please confirm whether the device is company \
            issued and describe what's happening. Enrollment and email setup guides are \
            on the intranet under IT > Mobile.",
        starts_intake: false,
    },
    Rule {
        keywords: &["new laptop", "new computer", "new equipment", "equipment request"],
        reply: "New equipment requests need manager approval. Once you have it, I can \
            raise a procurement ticket with the hardware specs you need.",
        starts_intake: false,
    },
    Rule {
        keywords: &["training", "how do i use", "tutorial", "documentation"],
        reply: "Training materials and how-to guides live on the intranet under \
            IT > Self Service. If you tell me which system you need help with, \
            I can point you at the right guide.",
        starts_intake: false,
    },
    // The only group that starts the structured intake dialogue.
    Rule {
        keywords: &["ticket", "support request", "help desk", "helpdesk", "create a ticket"],
        reply: "I can create a support ticket for you. To get started, I'll collect a few \
            details about your issue.",
        starts_intake: true,
    },
    Rule {
        keywords: &["urgent", "asap", "emergency", "after hours", "right now"],
        reply: "For urgent issues outside business hours, call the on-call line at \
            extension 1200. During business hours I can raise a High priority ticket \
            for you - just ask me to create a ticket.",
        starts_intake: false,
    },
    Rule {
        keywords: STATUS_KEYWORDS,
        reply: "To check on an existing ticket, give me its reference number \
            (it looks like INC123456) and I'll look it up for you.",
        starts_intake: false,
    },
    Rule {
        keywords: &["error", "problem", "issue", "broken", "not working", "crash"],
        reply: "Sorry you're hitting a problem. Could you describe what you were doing \
            when it happened and any error message you saw? If you'd like, I can also \
            create a support ticket for you.",
        starts_intake: false,
    },
    Rule {
        keywords: &["thank", "thanks", "appreciate"],
        reply: "You're welcome! Let me know if there's anything else I can help with.",
        starts_intake: false,
    },
    Rule {
        keywords: &["hello", "hey", "good morning", "good afternoon", "greetings"],
        reply: GREETING_REPLY,
        starts_intake: false,
    },
];

/// Classifies a user message against the keyword table.
///
/// Deterministic and side-effect-free: the same message always yields the
/// same classification.
pub fn classify(message: &str) -> Classification {
    let lower = message.to_lowercase();

    for rule in RULES {
        if rule.keywords.iter().any(|k| lower.contains(k)) {
            return Classification {
                reply: rule.reply,
                starts_intake: rule.starts_intake,
            };
        }
    }

    // Short unmatched messages read like greetings, not issue reports.
    if message.trim().len() < SHORT_MESSAGE_LEN {
        return Classification {
            reply: GREETING_REPLY,
            starts_intake: false,
        };
    }

    Classification {
        reply: DEFAULT_REPLY,
        starts_intake: false,
    }
}
