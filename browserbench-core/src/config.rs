//! Client configuration.

use std::time::Duration;

/// Configuration for chat-completion clients.
///
/// There is no retry or per-stage timeout layer in the pipeline; the only
/// timeout is the one the HTTP client enforces, taken from here.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Whole-request timeout enforced by the HTTP client
    ///
    /// Default: 120 seconds
    pub timeout: Duration,

    /// Maximum tokens per response; provider default when `None`
    pub max_tokens: Option<u32>,

    /// Sampling temperature; provider default when `None`
    pub temperature: Option<f32>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            max_tokens: None,
            temperature: None,
        }
    }
}

impl ChatConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the whole-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum tokens per response.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}
