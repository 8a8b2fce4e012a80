use async_trait::async_trait;

use crate::delivery::Receipt;
use crate::error::ChannelError;
use crate::message::Message;

/// Trait for pluggable mail delivery channels.
///
/// Implementations handle one transport (an SMTP session, an HTTP API call)
/// while the sender decides which channel to attempt and when to fall back
/// to another.
#[async_trait]
pub trait Channel: Send + Sync + std::fmt::Debug {
    /// Deliver a message through this channel.
    async fn deliver(&self, message: &Message) -> Result<Receipt, ChannelError>;

    /// Verify the channel is reachable and its credentials are accepted,
    /// without sending mail.
    async fn verify(&self) -> Result<(), ChannelError>;

    /// Return the channel name (e.g. `"smtp"`, `"sendgrid"`).
    fn name(&self) -> &'static str;
}
