use std::time::Duration;

use mailover_core::Channel;

use crate::error::SendError;
use crate::sender::MailSender;

/// Default upper bound on a single channel attempt.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Builder for [`MailSender`].
///
/// At least one channel should be attached before the sender is used;
/// a sender without channels fails every send with
/// [`SendError::NoChannelConfigured`].
#[derive(Debug, Default)]
pub struct MailSenderBuilder {
    primary: Option<Box<dyn Channel>>,
    secondary: Option<Box<dyn Channel>>,
    default_from: Option<String>,
    timeout: Option<Duration>,
}

impl MailSenderBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the primary delivery channel.
    #[must_use]
    pub fn primary(mut self, channel: Box<dyn Channel>) -> Self {
        self.primary = Some(channel);
        self
    }

    /// Attach the secondary delivery channel used for fallback.
    #[must_use]
    pub fn secondary(mut self, channel: Box<dyn Channel>) -> Self {
        self.secondary = Some(channel);
        self
    }

    /// Set the sender address applied to messages that carry none.
    #[must_use]
    pub fn default_from(mut self, from: impl Into<String>) -> Self {
        self.default_from = Some(from.into());
        self
    }

    /// Override the per-attempt timeout. Defaults to 15 seconds.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Assemble the sender.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Configuration`] when no default sender address
    /// was provided.
    pub fn build(self) -> Result<MailSender, SendError> {
        let default_from = self
            .default_from
            .ok_or_else(|| SendError::Configuration("default_from is required".into()))?;

        Ok(MailSender {
            primary: self.primary,
            secondary: self.secondary,
            default_from,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}
