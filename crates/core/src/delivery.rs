use std::fmt;

use serde::{Deserialize, Serialize};

/// Which configured channel handled a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// The session-oriented channel, attempted first.
    Primary,
    /// The request/response channel, attempted on fallback.
    Secondary,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// What a channel reports after a provider accepts a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Provider-assigned status (e.g. `"250 2.0.0 OK"`, `"202"`).
    pub status: String,
    /// Provider-assigned message identifier, when one was returned.
    pub message_id: Option<String>,
    /// Raw provider response body.
    pub body: serde_json::Value,
}

impl Receipt {
    /// Create a receipt with the given status and no body.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message_id: None,
            body: serde_json::Value::Null,
        }
    }

    /// Attach a provider-assigned message identifier.
    #[must_use]
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Attach the raw provider response body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = body;
        self
    }
}

/// Outcome of a successful send: the channel that delivered plus its receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    /// Channel that ultimately delivered the message.
    pub channel: ChannelKind,
    /// Provider-assigned status.
    pub status: String,
    /// Provider-assigned message identifier, when one was returned.
    pub message_id: Option<String>,
    /// Raw provider response body.
    pub body: serde_json::Value,
}

impl Delivery {
    /// Tag a receipt with the channel that produced it.
    #[must_use]
    pub fn from_receipt(channel: ChannelKind, receipt: Receipt) -> Self {
        Self {
            channel,
            status: receipt.status,
            message_id: receipt.message_id,
            body: receipt.body,
        }
    }
}
