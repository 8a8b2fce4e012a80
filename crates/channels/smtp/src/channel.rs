use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use mailover_core::{Channel, ChannelError, Message, Receipt};
use tracing::{debug, error, info};

use crate::config::{SmtpConfig, TlsMode};

/// Session-oriented SMTP delivery channel using `lettre`.
pub struct SmtpChannel {
    config: SmtpConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for SmtpChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpChannel")
            .field("config", &self.config)
            .field("transport", &"<AsyncSmtpTransport>")
            .finish()
    }
}

impl SmtpChannel {
    /// Create a new `SmtpChannel` from the given configuration.
    pub fn new(config: SmtpConfig) -> Result<Self, ChannelError> {
        let transport = build_transport(&config)?;
        Ok(Self { config, transport })
    }

    /// Create a `SmtpChannel` with a pre-built transport (for testing).
    pub fn with_transport(
        config: SmtpConfig,
        transport: AsyncSmtpTransport<Tokio1Executor>,
    ) -> Self {
        Self { config, transport }
    }
}

#[async_trait]
impl Channel for SmtpChannel {
    async fn deliver(&self, message: &Message) -> Result<Receipt, ChannelError> {
        debug!(to = ?message.to, "building SMTP message");
        let email = build_email(message)?;

        info!(to = ?message.to, host = %self.config.host, "sending mail via SMTP");
        let response = self.transport.send(email).await.map_err(|e| {
            error!(error = %e, "SMTP send failed");
            map_smtp_error(&e)
        })?;

        let code = response.code();
        let status = match response.first_line() {
            Some(line) => format!("{code} {line}"),
            None => code.to_string(),
        };
        info!(status = %status, "mail accepted by SMTP server");

        let body = serde_json::json!({
            "code": code.to_string(),
            "message": response.first_line().unwrap_or_default(),
        });
        Ok(Receipt::new(status).with_body(body))
    }

    async fn verify(&self) -> Result<(), ChannelError> {
        debug!(host = %self.config.host, "verifying SMTP connection");
        self.transport.test_connection().await.map_err(|e| {
            error!(error = %e, "SMTP verification failed");
            map_smtp_error(&e)
        })?;
        info!(host = %self.config.host, "SMTP connection verified");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

/// Build a `lettre::Message` from the unified [`Message`].
fn build_email(msg: &Message) -> Result<lettre::Message, ChannelError> {
    let from = msg
        .from
        .as_deref()
        .ok_or_else(|| ChannelError::Configuration("message has no sender address".into()))?;
    let from_mailbox: Mailbox = from
        .parse()
        .map_err(|e| ChannelError::Configuration(format!("invalid from address: {e}")))?;

    let mut builder = lettre::Message::builder().from(from_mailbox);

    for to in &msg.to {
        let to_mailbox: Mailbox = to.parse().map_err(|e| ChannelError::Rejected {
            code: None,
            reason: format!("invalid recipient address: {e}"),
        })?;
        builder = builder.to(to_mailbox);
    }

    if let Some(ref subject) = msg.subject {
        builder = builder.subject(subject);
    }

    if let Some(ref reply_to) = msg.reply_to {
        let reply_mailbox: Mailbox = reply_to.parse().map_err(|e| ChannelError::Rejected {
            code: None,
            reason: format!("invalid reply-to address: {e}"),
        })?;
        builder = builder.reply_to(reply_mailbox);
    }

    let email = match (&msg.text, &msg.html) {
        (Some(text), Some(html)) => builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(lettre::message::header::ContentType::TEXT_PLAIN)
                            .body(text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(lettre::message::header::ContentType::TEXT_HTML)
                            .body(html.clone()),
                    ),
            )
            .map_err(|e| ChannelError::Rejected {
                code: None,
                reason: format!("failed to build email: {e}"),
            })?,
        (Some(text), None) => builder.body(text.clone()).map_err(|e| ChannelError::Rejected {
            code: None,
            reason: format!("failed to build email: {e}"),
        })?,
        (None, Some(html)) => builder
            .singlepart(
                SinglePart::builder()
                    .header(lettre::message::header::ContentType::TEXT_HTML)
                    .body(html.clone()),
            )
            .map_err(|e| ChannelError::Rejected {
                code: None,
                reason: format!("failed to build email: {e}"),
            })?,
        (None, None) => {
            builder
                .body(String::new())
                .map_err(|e| ChannelError::Rejected {
                    code: None,
                    reason: format!("failed to build email: {e}"),
                })?
        }
    };

    Ok(email)
}

/// Build an async SMTP transport from the given configuration.
fn build_transport(
    config: &SmtpConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, ChannelError> {
    let builder = match config.effective_security() {
        TlsMode::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| ChannelError::Configuration(format!("SMTP TLS relay error: {e}")))?,
        TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| ChannelError::Configuration(format!("SMTP TLS relay error: {e}")))?,
        TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
    };

    let builder = builder.port(config.port);

    let builder = if let (Some(user), Some(pass)) = (&config.username, &config.password) {
        builder.credentials(Credentials::new(user.clone(), pass.clone()))
    } else {
        builder
    };

    Ok(builder.build())
}

/// Map a lettre SMTP error to the appropriate `ChannelError` variant.
///
/// Connection-level failures are transient and qualify for fallback; SMTP
/// replies are provider verdicts on the session or message and do not.
fn map_smtp_error(error: &lettre::transport::smtp::Error) -> ChannelError {
    let message = error.to_string();

    if error.is_permanent() {
        // 53x replies are authentication verdicts (530 auth required,
        // 534 mechanism too weak, 535 bad credentials).
        if ["(530)", "(534)", "(535)"]
            .iter()
            .any(|code| message.contains(code))
        {
            ChannelError::Auth(message)
        } else {
            ChannelError::Rejected {
                code: None,
                reason: format!("permanent SMTP error: {message}"),
            }
        }
    } else if error.is_transient() {
        // A 4xx reply arrived over a working connection, so the failure is
        // a provider verdict rather than a network condition.
        ChannelError::Rejected {
            code: None,
            reason: format!("transient SMTP error: {message}"),
        }
    } else {
        ChannelError::Connection(format!("SMTP error: {message}"))
    }
}

#[cfg(test)]
mod tests {
    use lettre::{AsyncSmtpTransport, Tokio1Executor};

    use super::*;

    fn test_smtp_config() -> SmtpConfig {
        SmtpConfig::new("127.0.0.1")
            .with_port(2525)
            .with_security(TlsMode::None)
    }

    fn test_message() -> Message {
        Message::new("recipient@example.com")
            .with_from("sender@example.com")
            .with_subject("Test Subject")
            .with_text("Hello, world!")
    }

    #[test]
    fn build_email_plain_text() {
        let msg = test_message();
        assert!(build_email(&msg).is_ok());
    }

    #[test]
    fn build_email_html_only() {
        let mut msg = test_message();
        msg.text = None;
        msg.html = Some("<h1>Hello</h1>".to_owned());
        assert!(build_email(&msg).is_ok());
    }

    #[test]
    fn build_email_multipart() {
        let msg = test_message().with_html("<p>Hello</p>");
        assert!(build_email(&msg).is_ok());
    }

    #[test]
    fn build_email_multiple_recipients() {
        let msg = test_message()
            .with_to("second@example.com")
            .with_reply_to("reply@example.com");
        assert!(build_email(&msg).is_ok());
    }

    #[test]
    fn build_email_without_subject() {
        let mut msg = test_message();
        msg.subject = None;
        assert!(build_email(&msg).is_ok());
    }

    #[test]
    fn build_email_missing_from() {
        let mut msg = test_message();
        msg.from = None;
        let err = build_email(&msg).unwrap_err();
        assert!(matches!(err, ChannelError::Configuration(_)));
    }

    #[test]
    fn build_email_invalid_from() {
        let mut msg = test_message();
        msg.from = Some("not-valid".to_owned());
        let err = build_email(&msg).unwrap_err();
        assert!(matches!(err, ChannelError::Configuration(_)));
    }

    #[test]
    fn build_email_invalid_to() {
        let mut msg = test_message();
        msg.to = vec!["not-valid".to_owned()];
        let err = build_email(&msg).unwrap_err();
        assert!(matches!(err, ChannelError::Rejected { .. }));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn build_transport_no_tls() {
        let config = test_smtp_config();
        assert!(build_transport(&config).is_ok());
    }

    #[tokio::test]
    async fn build_transport_starttls() {
        let config = SmtpConfig::new("smtp.example.com");
        assert!(build_transport(&config).is_ok());
    }

    #[tokio::test]
    async fn build_transport_implicit_tls() {
        let config = SmtpConfig::new("smtp.example.com").with_port(465);
        assert!(build_transport(&config).is_ok());
    }

    #[tokio::test]
    async fn build_transport_with_credentials() {
        let config = test_smtp_config().with_credentials("user", "pass");
        assert!(build_transport(&config).is_ok());
    }

    #[tokio::test]
    async fn channel_new() {
        let channel = SmtpChannel::new(test_smtp_config());
        assert!(channel.is_ok());
    }

    #[tokio::test]
    async fn channel_name() {
        let channel = SmtpChannel::new(test_smtp_config()).unwrap();
        assert_eq!(channel.name(), "smtp");
    }

    #[tokio::test]
    async fn channel_debug() {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous("127.0.0.1")
            .port(2525)
            .build();
        let channel = SmtpChannel::with_transport(test_smtp_config(), transport);
        let debug = format!("{channel:?}");
        assert!(debug.contains("SmtpChannel"));
    }

    #[tokio::test]
    async fn deliver_connection_refused_is_transient() {
        // Nothing listens on port 1; the failure is connection-level.
        let config = SmtpConfig::new("127.0.0.1")
            .with_port(1)
            .with_security(TlsMode::None);
        let channel = SmtpChannel::new(config).unwrap();

        let err = channel.deliver(&test_message()).await.unwrap_err();
        assert!(matches!(err, ChannelError::Connection(_)));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn verify_connection_refused_is_transient() {
        let config = SmtpConfig::new("127.0.0.1")
            .with_port(1)
            .with_security(TlsMode::None);
        let channel = SmtpChannel::new(config).unwrap();

        let err = channel.verify().await.unwrap_err();
        assert!(err.is_transient());
    }
}
