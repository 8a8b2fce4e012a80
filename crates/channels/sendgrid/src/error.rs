use mailover_core::ChannelError;
use thiserror::Error;

/// Errors specific to the SendGrid channel.
///
/// These are internal errors that get converted into [`ChannelError`] at the
/// public API boundary.
#[derive(Debug, Error)]
pub enum SendGridError {
    /// An HTTP-level transport error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the supplied key.
    #[error("authentication rejected (HTTP {status}): {message}")]
    Auth {
        /// HTTP status code (401 or 403).
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },

    /// The API returned a non-success response.
    #[error("SendGrid API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },
}

impl From<SendGridError> for ChannelError {
    fn from(err: SendGridError) -> Self {
        match err {
            SendGridError::Http(e) => ChannelError::Connection(e.to_string()),
            SendGridError::Auth { status, message } => {
                ChannelError::Auth(format!("HTTP {status}: {message}"))
            }
            SendGridError::Api { status, message } => ChannelError::Rejected {
                code: Some(status.to_string()),
                reason: message,
            },
        }
    }
}
