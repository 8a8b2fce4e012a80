use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while delivering through a single channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The channel did not complete within the allowed duration.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// A network or transport-level error occurred before the provider
    /// could pass judgment on the message.
    #[error("connection error: {0}")]
    Connection(String),

    /// The provider rejected the supplied credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The message was rejected by the provider or failed addressing checks.
    #[error("delivery rejected: {reason}")]
    Rejected {
        /// Provider-assigned error or status code, when one was returned.
        code: Option<String>,
        /// Human-readable rejection reason.
        reason: String,
    },

    /// The channel was given invalid configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl ChannelError {
    /// Returns `true` if the failure is connection-level and delivery may
    /// succeed through another channel.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connection(_))
    }
}
