use mailover_core::{ChannelError, ChannelKind, MessageError};
use thiserror::Error;

/// Failure modes of a [`MailSender::send`](crate::MailSender::send) call.
#[derive(Debug, Error)]
pub enum SendError {
    /// The message failed validation; no channel was attempted.
    #[error("invalid message: {0}")]
    InvalidMessage(#[from] MessageError),

    /// The sender has neither a primary nor a secondary channel.
    #[error("no delivery channel configured")]
    NoChannelConfigured,

    /// The sender was assembled with an invalid combination of settings.
    #[error("invalid sender configuration: {0}")]
    Configuration(String),

    /// A channel failed and no fallback applied.
    ///
    /// Raised when the primary fails with a terminal error, when the primary
    /// fails transiently but no secondary is configured, or when a
    /// secondary-only sender fails.
    #[error("{channel} channel failed: {source}")]
    Channel {
        channel: ChannelKind,
        #[source]
        source: ChannelError,
    },

    /// The primary failed transiently and the fallback attempt failed too.
    #[error("all channels failed: primary: {primary}; secondary: {secondary}")]
    AllChannelsFailed {
        primary: ChannelError,
        secondary: ChannelError,
    },
}
