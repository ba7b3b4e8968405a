//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `STACKIT` prefix and nested values use `__` as separators.
//!
//! # Example
//!
//! ```no_run
//! use stackit_assist::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod assistant;
mod error;
mod tickets;

pub use assistant::AssistantConfig;
pub use error::{ConfigError, ValidationError};
pub use tickets::TicketsConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Remote assistant endpoint (conversational AI)
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Ticket backend endpoint
    #[serde(default)]
    pub tickets: TicketsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads environment variables
    /// with the `STACKIT` prefix:
    ///
    /// - `STACKIT__ASSISTANT__BASE_URL=...` -> `assistant.base_url`
    /// - `STACKIT__TICKETS__TIMEOUT_SECS=10` -> `tickets.timeout_secs`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STACKIT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.assistant.validate()?;
        self.tickets.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_surfaces_section_errors() {
        let config = AppConfig {
            assistant: AssistantConfig {
                base_url: "not-a-url".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidAssistantUrl)
        ));
    }
}
