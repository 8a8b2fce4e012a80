use serde::{Deserialize, Serialize};

/// An email address as the v3 API expects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendGridAddress {
    /// The address itself.
    pub email: String,
}

/// One set of recipients for the message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendGridPersonalization {
    /// Recipient addresses.
    pub to: Vec<SendGridAddress>,
}

/// One body part: MIME type plus value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendGridContent {
    /// MIME type (`text/plain` or `text/html`).
    #[serde(rename = "type")]
    pub content_type: String,

    /// The body text.
    pub value: String,
}

/// Request body for `POST /v3/mail/send`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendGridMailRequest {
    /// Recipient groupings. This channel always sends exactly one.
    pub personalizations: Vec<SendGridPersonalization>,

    /// Sender address.
    pub from: SendGridAddress,

    /// Subject line. The API requires one, so the channel substitutes a
    /// placeholder when the message has none.
    pub subject: String,

    /// Body parts, plain text before HTML as the API requires.
    pub content: Vec<SendGridContent>,

    /// Optional reply-to address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<SendGridAddress>,
}

/// Error body returned by the v3 API on a non-success status.
#[derive(Debug, Clone, Deserialize)]
pub struct SendGridErrorResponse {
    /// Individual error entries.
    pub errors: Vec<SendGridApiError>,
}

/// A single entry in a [`SendGridErrorResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct SendGridApiError {
    /// Human-readable error message.
    pub message: String,

    /// Offending request field, when the API names one.
    pub field: Option<String>,

    /// Link to relevant documentation, when provided.
    pub help: Option<String>,
}
