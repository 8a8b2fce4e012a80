//! SMTP delivery channel for mailover.
//!
//! Implements the [`Channel`](mailover_core::Channel) trait over `lettre`'s
//! async SMTP transport, so a mail-submission session can serve as the
//! primary delivery channel.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use mailover_smtp::{SmtpChannel, SmtpConfig};
//!
//! let config = SmtpConfig::new("smtp.example.com")
//!     .with_port(587)
//!     .with_credentials("user", "app-password");
//! let channel = SmtpChannel::new(config)?;
//! # Ok::<(), mailover_core::ChannelError>(())
//! ```

pub mod channel;
pub mod config;

pub use channel::SmtpChannel;
pub use config::{SmtpConfig, TlsMode};
