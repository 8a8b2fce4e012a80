use async_trait::async_trait;
use mailover_core::{Channel, ChannelError, Message, Receipt};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::config::SendGridConfig;
use crate::error::SendGridError;
use crate::types::{
    SendGridAddress, SendGridContent, SendGridErrorResponse, SendGridMailRequest,
    SendGridPersonalization,
};

/// Request/response delivery channel using the SendGrid v3 mail API.
#[derive(Debug)]
pub struct SendGridChannel {
    config: SendGridConfig,
    client: Client,
}

impl SendGridChannel {
    /// Create a new `SendGridChannel` with the given configuration.
    ///
    /// Uses a default `reqwest::Client` with a bounded request timeout.
    pub fn new(config: SendGridConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("failed to build HTTP client");
        Self { config, client }
    }

    /// Create a new `SendGridChannel` with a custom HTTP client.
    ///
    /// Useful for testing or for sharing a connection pool across channels.
    pub fn with_client(config: SendGridConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Build the full URL for the v3 mail send endpoint.
    fn mail_send_url(&self) -> String {
        format!("{}/v3/mail/send", self.config.api_base_url)
    }

    /// Build the full URL for the v3 scopes endpoint used by key
    /// verification.
    fn scopes_url(&self) -> String {
        format!("{}/v3/scopes", self.config.api_base_url)
    }

    /// POST the mail request and interpret the response.
    async fn send_mail(&self, request: &SendGridMailRequest) -> Result<Receipt, SendGridError> {
        let url = self.mail_send_url();
        debug!(url = %url, "submitting mail to SendGrid");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = error_message(response).await;
            return Err(SendGridError::Auth {
                status: status.as_u16(),
                message,
            });
        }

        if !status.is_success() {
            warn!(status = %status, "SendGrid rejected the mail");
            let message = error_message(response).await;
            return Err(SendGridError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // The live API answers 202 with an empty body; the queued message id
        // travels in a response header.
        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let text = response.text().await.unwrap_or_default();
        let body = if text.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        let mut receipt = Receipt::new(status.as_u16().to_string()).with_body(body);
        if let Some(id) = message_id {
            receipt = receipt.with_message_id(id);
        }
        Ok(receipt)
    }
}

#[async_trait]
impl Channel for SendGridChannel {
    async fn deliver(&self, message: &Message) -> Result<Receipt, ChannelError> {
        let request = build_request(message)?;
        let receipt = self.send_mail(&request).await?;
        debug!(status = %receipt.status, "SendGrid accepted the mail");
        Ok(receipt)
    }

    async fn verify(&self) -> Result<(), ChannelError> {
        let url = self.scopes_url();
        debug!(url = %url, "verifying SendGrid API key");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| ChannelError::Connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = error_message(response).await;
            return Err(ChannelError::Auth(format!("HTTP {status}: {message}")));
        }
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(ChannelError::Rejected {
                code: Some(status.as_u16().to_string()),
                reason: message,
            });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sendgrid"
    }
}

/// Build a [`SendGridMailRequest`] from the unified [`Message`].
fn build_request(msg: &Message) -> Result<SendGridMailRequest, ChannelError> {
    let from = msg
        .from
        .as_deref()
        .ok_or_else(|| ChannelError::Configuration("message has no sender address".into()))?;

    let to = msg
        .to
        .iter()
        .map(|email| SendGridAddress {
            email: email.clone(),
        })
        .collect::<Vec<_>>();

    let mut content = Vec::new();
    if let Some(ref text) = msg.text {
        content.push(SendGridContent {
            content_type: "text/plain".to_owned(),
            value: text.clone(),
        });
    }
    if let Some(ref html) = msg.html {
        content.push(SendGridContent {
            content_type: "text/html".to_owned(),
            value: html.clone(),
        });
    }

    Ok(SendGridMailRequest {
        personalizations: vec![SendGridPersonalization { to }],
        from: SendGridAddress {
            email: from.to_owned(),
        },
        subject: msg
            .subject
            .clone()
            .unwrap_or_else(|| "(no subject)".to_owned()),
        content,
        reply_to: msg.reply_to.as_ref().map(|email| SendGridAddress {
            email: email.clone(),
        }),
    })
}

/// Extract a readable message from an error response body.
async fn error_message(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<SendGridErrorResponse>(&body)
        .ok()
        .and_then(|parsed| parsed.errors.into_iter().next())
        .map_or(body, |entry| entry.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal mock HTTP server built on tokio that returns canned responses.
    struct MockSendGridServer {
        listener: tokio::net::TcpListener,
        base_url: String,
    }

    impl MockSendGridServer {
        async fn start() -> Self {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("failed to bind mock server");
            let port = listener.local_addr().unwrap().port();
            let base_url = format!("http://127.0.0.1:{port}");
            Self { listener, base_url }
        }

        /// Accept one connection and respond with the given status code and
        /// JSON body, then shut down.
        async fn respond_once(self, status_code: u16, body: &str) {
            self.respond_with_headers(status_code, body, "").await;
        }

        /// Accept one connection and respond with HTTP 202 plus the
        /// X-Message-Id header the live API attaches on acceptance.
        async fn respond_accepted(self, message_id: &str) {
            let header = format!("X-Message-Id: {message_id}\r\n");
            self.respond_with_headers(202, "", &header).await;
        }

        async fn respond_with_headers(self, status_code: u16, body: &str, extra_headers: &str) {
            let (mut stream, _) = self.listener.accept().await.unwrap();

            use tokio::io::{AsyncReadExt, AsyncWriteExt};

            // Read the full request (we don't parse it -- just drain it).
            let mut buf = vec![0u8; 8192];
            let _ = stream.read(&mut buf).await.unwrap();

            let response = format!(
                "HTTP/1.1 {status_code} OK\r\n\
                 Content-Type: application/json\r\n\
                 {extra_headers}Content-Length: {}\r\n\
                 Connection: close\r\n\
                 \r\n\
                 {body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
    }

    fn make_channel(base_url: &str) -> SendGridChannel {
        let config = SendGridConfig::new("SG.test-key").with_api_base_url(base_url);
        SendGridChannel::new(config)
    }

    fn test_message() -> Message {
        Message::new("a@example.com")
            .with_from("sender@example.com")
            .with_subject("Hi")
            .with_text("Hello")
    }

    #[test]
    fn channel_name() {
        let channel = make_channel("http://localhost:1");
        assert_eq!(channel.name(), "sendgrid");
    }

    #[test]
    fn build_request_shapes_payload() {
        let request = build_request(&test_message().with_html("<p>Hello</p>")).unwrap();
        assert_eq!(request.personalizations.len(), 1);
        assert_eq!(request.personalizations[0].to[0].email, "a@example.com");
        assert_eq!(request.from.email, "sender@example.com");
        assert_eq!(request.subject, "Hi");
        assert_eq!(request.content[0].content_type, "text/plain");
        assert_eq!(request.content[1].content_type, "text/html");
    }

    #[test]
    fn build_request_substitutes_subject_placeholder() {
        let mut msg = test_message();
        msg.subject = None;
        let request = build_request(&msg).unwrap();
        assert_eq!(request.subject, "(no subject)");
    }

    #[test]
    fn build_request_missing_from() {
        let mut msg = test_message();
        msg.from = None;
        let err = build_request(&msg).unwrap_err();
        assert!(matches!(err, ChannelError::Configuration(_)));
    }

    #[test]
    fn build_request_maps_reply_to() {
        let request = build_request(&test_message().with_reply_to("reply@example.com")).unwrap();
        assert_eq!(
            request.reply_to.map(|address| address.email).as_deref(),
            Some("reply@example.com")
        );
    }

    #[tokio::test]
    async fn deliver_success_returns_receipt() {
        let server = MockSendGridServer::start().await;
        let channel = make_channel(&server.base_url);

        let server_handle = tokio::spawn(async move {
            server.respond_accepted("E5tcUso_RZ-HBNqqnBn1Yw").await;
        });

        let receipt = channel.deliver(&test_message()).await.unwrap();
        server_handle.await.unwrap();

        assert_eq!(receipt.status, "202");
        assert_eq!(receipt.message_id.as_deref(), Some("E5tcUso_RZ-HBNqqnBn1Yw"));
        assert!(receipt.body.is_null());
    }

    #[tokio::test]
    async fn deliver_auth_failure_is_terminal() {
        let server = MockSendGridServer::start().await;
        let channel = make_channel(&server.base_url);

        let body = r#"{"errors":[{"message":"authorization required","field":null,"help":null}]}"#;
        let server_handle = tokio::spawn(async move {
            server.respond_once(401, body).await;
        });

        let err = channel.deliver(&test_message()).await.unwrap_err();
        server_handle.await.unwrap();

        assert!(matches!(err, ChannelError::Auth(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn deliver_api_error_carries_status_code() {
        let server = MockSendGridServer::start().await;
        let channel = make_channel(&server.base_url);

        let body = r#"{"errors":[{"message":"The from address does not match a verified Sender Identity","field":"from","help":null}]}"#;
        let server_handle = tokio::spawn(async move {
            server.respond_once(400, body).await;
        });

        let err = channel.deliver(&test_message()).await.unwrap_err();
        server_handle.await.unwrap();

        match err {
            ChannelError::Rejected { code, reason } => {
                assert_eq!(code.as_deref(), Some("400"));
                assert!(reason.contains("verified Sender Identity"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn deliver_rate_limited_is_terminal() {
        let server = MockSendGridServer::start().await;
        let channel = make_channel(&server.base_url);

        let body = r#"{"errors":[{"message":"too many requests","field":null,"help":null}]}"#;
        let server_handle = tokio::spawn(async move {
            server.respond_once(429, body).await;
        });

        let err = channel.deliver(&test_message()).await.unwrap_err();
        server_handle.await.unwrap();

        assert!(matches!(err, ChannelError::Rejected { .. }));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn deliver_connection_refused_is_transient() {
        // Nothing listens on port 1; the failure is connection-level.
        let channel = make_channel("http://127.0.0.1:1");

        let err = channel.deliver(&test_message()).await.unwrap_err();
        assert!(matches!(err, ChannelError::Connection(_)));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn verify_success() {
        let server = MockSendGridServer::start().await;
        let channel = make_channel(&server.base_url);

        let body = r#"{"scopes":["mail.send"]}"#;
        let server_handle = tokio::spawn(async move {
            server.respond_once(200, body).await;
        });

        let result = channel.verify().await;
        server_handle.await.unwrap();

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn verify_rejects_bad_key() {
        let server = MockSendGridServer::start().await;
        let channel = make_channel(&server.base_url);

        let body = r#"{"errors":[{"message":"authorization required","field":null,"help":null}]}"#;
        let server_handle = tokio::spawn(async move {
            server.respond_once(401, body).await;
        });

        let err = channel.verify().await.unwrap_err();
        server_handle.await.unwrap();

        assert!(matches!(err, ChannelError::Auth(_)));
    }

    #[tokio::test]
    async fn verify_connection_failure_is_transient() {
        let channel = make_channel("http://127.0.0.1:1");

        let err = channel.verify().await.unwrap_err();
        assert!(matches!(err, ChannelError::Connection(_)));
        assert!(err.is_transient());
    }
}
