//! Failover mail delivery.
//!
//! A [`MailSender`] holds up to two delivery channels: a primary (typically
//! an SMTP submission session) and a secondary (typically an HTTP mail API).
//! A send attempts the primary first; if it fails at the connection level
//! the secondary is attempted exactly once. Provider verdicts such as bad
//! credentials or a rejected message are terminal and never trigger the
//! fallback, and there is no retry within a channel.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use mailover::MailSender;
//! use mailover_core::Message;
//! use mailover_sendgrid::{SendGridChannel, SendGridConfig};
//! use mailover_smtp::{SmtpChannel, SmtpConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let smtp = SmtpChannel::new(
//!     SmtpConfig::new("smtp.example.com").with_credentials("user", "app-password"),
//! )?;
//! let sendgrid = SendGridChannel::new(SendGridConfig::new("SG.my-api-key"));
//!
//! let sender = MailSender::builder()
//!     .primary(Box::new(smtp))
//!     .secondary(Box::new(sendgrid))
//!     .default_from("noreply@example.com")
//!     .build()?;
//!
//! let message = Message::new("someone@example.com")
//!     .with_subject("Hello")
//!     .with_text("Hello from mailover!");
//!
//! let delivery = sender.send(message).await?;
//! println!("delivered via {} ({})", delivery.channel, delivery.status);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod sender;

pub use builder::MailSenderBuilder;
pub use error::SendError;
pub use sender::MailSender;
