//! SendGrid delivery channel for mailover.
//!
//! Submits mail through the SendGrid v3 HTTP API. A `202 Accepted` response
//! means SendGrid queued the message for delivery; the queued message id is
//! surfaced on the [`Receipt`](mailover_core::Receipt).
//!
//! # Quick start
//!
//! ```rust,no_run
//! use mailover_core::{Channel, Message};
//! use mailover_sendgrid::{SendGridChannel, SendGridConfig};
//!
//! # async fn example() -> Result<(), mailover_core::ChannelError> {
//! let channel = SendGridChannel::new(SendGridConfig::new("SG.my-api-key"));
//!
//! let message = Message::new("someone@example.com")
//!     .with_from("noreply@example.com")
//!     .with_subject("Hello")
//!     .with_text("Hello from mailover!");
//!
//! let receipt = channel.deliver(&message).await?;
//! println!("accepted with status {}", receipt.status);
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod types;

pub use channel::SendGridChannel;
pub use config::SendGridConfig;
pub use error::SendGridError;
pub use types::{
    SendGridAddress, SendGridApiError, SendGridContent, SendGridErrorResponse,
    SendGridMailRequest, SendGridPersonalization,
};
