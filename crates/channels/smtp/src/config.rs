use serde::{Deserialize, Serialize};

/// Transport-security mode for the SMTP session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain connection, no encryption.
    None,
    /// Plain connection upgraded via STARTTLS.
    StartTls,
    /// TLS from the first byte (implicit TLS).
    Implicit,
}

/// Configuration for the SMTP channel.
///
/// Holds all settings needed to establish a connection to an SMTP server.
#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub host: String,

    /// SMTP server port. Defaults to 587 (STARTTLS submission port).
    pub port: u16,

    /// Optional username for authentication.
    pub username: Option<String>,

    /// Optional password for authentication.
    pub password: Option<String>,

    /// Transport-security mode. When unset it is keyed off the port:
    /// 465 selects implicit TLS, anything else STARTTLS.
    pub security: Option<TlsMode>,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("security", &self.security)
            .finish()
    }
}

impl SmtpConfig {
    /// Create a configuration for the given host on the default submission
    /// port.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 587,
            username: None,
            password: None,
            security: None,
        }
    }

    /// Override the default port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Pin the transport-security mode instead of deriving it from the port.
    #[must_use]
    pub fn with_security(mut self, security: TlsMode) -> Self {
        self.security = Some(security);
        self
    }

    /// The effective transport-security mode: the pinned mode when set,
    /// otherwise derived from the port.
    pub fn effective_security(&self) -> TlsMode {
        match self.security {
            Some(mode) => mode,
            None if self.port == 465 => TlsMode::Implicit,
            None => TlsMode::StartTls,
        }
    }
}
