use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A mail message consumed by a single send.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    /// Recipient addresses. Must be non-empty.
    pub to: Vec<String>,

    /// Sender address. Falls back to the sender's configured default
    /// identity when absent.
    pub from: Option<String>,

    /// Subject line.
    pub subject: Option<String>,

    /// Plain-text body.
    pub text: Option<String>,

    /// HTML body.
    pub html: Option<String>,

    /// Optional reply-to address.
    pub reply_to: Option<String>,
}

/// Rejection produced by [`Message::validate`] before any channel attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The recipient list is empty.
    #[error("message has no recipients")]
    NoRecipients,

    /// Neither a text nor an HTML body is present.
    #[error("message has no text or html body")]
    NoBody,
}

impl Message {
    /// Create a message addressed to a single recipient.
    #[must_use]
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: vec![to.into()],
            ..Self::default()
        }
    }

    /// Add a recipient.
    #[must_use]
    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to.push(to.into());
        self
    }

    /// Set the sender address.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set the subject line.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the plain-text body.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the HTML body.
    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Set the reply-to address.
    #[must_use]
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// Check the message invariants: at least one recipient and at least
    /// one of text/HTML body.
    pub fn validate(&self) -> Result<(), MessageError> {
        if self.to.is_empty() {
            return Err(MessageError::NoRecipients);
        }
        if self.text.is_none() && self.html.is_none() {
            return Err(MessageError::NoBody);
        }
        Ok(())
    }
}
