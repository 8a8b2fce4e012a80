use std::time::Duration;

use mailover_core::{Channel, ChannelError, ChannelKind, Delivery, Message, Receipt};
use tracing::{debug, info, warn};

use crate::builder::MailSenderBuilder;
use crate::error::SendError;

/// Mail sender that attempts a primary channel and falls back at most once.
///
/// The fallback fires only for transient, connection-level failures of the
/// primary (timeouts, refused or dropped connections, DNS errors). Terminal
/// failures such as rejected credentials or a provider turning the message
/// down are surfaced to the caller immediately.
#[derive(Debug)]
pub struct MailSender {
    pub(crate) primary: Option<Box<dyn Channel>>,
    pub(crate) secondary: Option<Box<dyn Channel>>,
    pub(crate) default_from: String,
    pub(crate) timeout: Duration,
}

impl MailSender {
    /// Start building a sender.
    #[must_use]
    pub fn builder() -> MailSenderBuilder {
        MailSenderBuilder::new()
    }

    /// Deliver `message` through the configured channels.
    ///
    /// The message is validated up front and its sender address is filled
    /// from the configured default when absent. Each channel attempt runs
    /// under the configured timeout; an elapsed timeout counts as a
    /// transient failure.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::InvalidMessage`] before any channel is attempted
    /// when the message has no recipients or no body,
    /// [`SendError::NoChannelConfigured`] when the sender holds no channels,
    /// [`SendError::Channel`] when a single attempt fails with no fallback
    /// applying, and [`SendError::AllChannelsFailed`] when the fallback
    /// attempt fails as well.
    pub async fn send(&self, mut message: Message) -> Result<Delivery, SendError> {
        message.validate()?;
        if message.from.is_none() {
            message.from = Some(self.default_from.clone());
        }

        match (&self.primary, &self.secondary) {
            (None, None) => Err(SendError::NoChannelConfigured),
            (Some(primary), secondary) => {
                debug!(channel = primary.name(), "attempting primary channel");
                match self.attempt(primary.as_ref(), &message).await {
                    Ok(receipt) => {
                        info!(
                            channel = primary.name(),
                            status = %receipt.status,
                            "message delivered via primary channel"
                        );
                        Ok(Delivery::from_receipt(ChannelKind::Primary, receipt))
                    }
                    Err(primary_err) if primary_err.is_transient() => {
                        let Some(secondary) = secondary else {
                            return Err(SendError::Channel {
                                channel: ChannelKind::Primary,
                                source: primary_err,
                            });
                        };
                        warn!(
                            channel = secondary.name(),
                            error = %primary_err,
                            "primary channel failed with a transient error, falling back"
                        );
                        match self.attempt(secondary.as_ref(), &message).await {
                            Ok(receipt) => {
                                info!(
                                    channel = secondary.name(),
                                    status = %receipt.status,
                                    "message delivered via secondary channel"
                                );
                                Ok(Delivery::from_receipt(ChannelKind::Secondary, receipt))
                            }
                            Err(secondary_err) => Err(SendError::AllChannelsFailed {
                                primary: primary_err,
                                secondary: secondary_err,
                            }),
                        }
                    }
                    Err(primary_err) => Err(SendError::Channel {
                        channel: ChannelKind::Primary,
                        source: primary_err,
                    }),
                }
            }
            (None, Some(secondary)) => {
                debug!(channel = secondary.name(), "attempting secondary channel");
                match self.attempt(secondary.as_ref(), &message).await {
                    Ok(receipt) => {
                        info!(
                            channel = secondary.name(),
                            status = %receipt.status,
                            "message delivered via secondary channel"
                        );
                        Ok(Delivery::from_receipt(ChannelKind::Secondary, receipt))
                    }
                    Err(err) => Err(SendError::Channel {
                        channel: ChannelKind::Secondary,
                        source: err,
                    }),
                }
            }
        }
    }

    /// Run one channel attempt under the configured timeout.
    async fn attempt(
        &self,
        channel: &dyn Channel,
        message: &Message,
    ) -> Result<Receipt, ChannelError> {
        match tokio::time::timeout(self.timeout, channel.deliver(message)).await {
            Ok(result) => result,
            Err(_) => Err(ChannelError::Timeout(self.timeout)),
        }
    }
}
