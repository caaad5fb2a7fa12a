//! SMTP transport backed by lettre.

use std::time::Duration;

use async_trait::async_trait;
use herald_common::Message;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    message::{Mailbox, SinglePart},
    transport::smtp::authentication::Credentials,
};
use serde::Deserialize;

use crate::{error::TransportError, types::DeliveryReceipt, r#trait::Transport};

/// How the SMTP connection is secured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plaintext connection upgraded via STARTTLS
    #[default]
    Starttls,
    /// Implicit TLS from the first byte (typically port 465)
    Tls,
    /// No TLS at all; only for local test servers
    None,
}

/// Configuration for the SMTP transport.
#[derive(Clone, Debug, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server hostname
    pub host: String,

    /// SMTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Username for authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for authentication
    #[serde(default)]
    pub password: Option<String>,

    /// Connection security mode
    #[serde(default)]
    pub tls: TlsMode,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

const fn default_port() -> u16 {
    587
}

const fn default_timeout() -> u64 {
    10
}

/// SMTP submission transport.
pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    /// Build a transport from configuration.
    ///
    /// # Errors
    /// If the relay hostname is rejected by lettre
    pub fn from_config(config: &SmtpConfig) -> Result<Self, TransportError> {
        let mut builder = match config.tls {
            TlsMode::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| TransportError::Configuration(e.to_string()))?,
            TlsMode::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| TransportError::Configuration(e.to_string()))?
            }
        };

        builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    fn build_mime(message: &Message) -> Result<lettre::Message, TransportError> {
        let from: Mailbox = message
            .from
            .parse()
            .map_err(|_| TransportError::InvalidAddress(message.from.clone()))?;
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|_| TransportError::InvalidAddress(message.to.clone()))?;

        lettre::Message::builder()
            .from(from)
            .to(to)
            .subject(&message.subject)
            .singlepart(SinglePart::html(message.html_body.clone()))
            .map_err(|e| TransportError::Build(e.to_string()))
    }
}

#[async_trait]
impl Transport for SmtpTransport {
    async fn send(&self, message: &Message) -> Result<DeliveryReceipt, TransportError> {
        let mime = Self::build_mime(message)?;

        let response = self
            .transport
            .send(mime)
            .await
            .map_err(|e| TransportError::Smtp(e.to_string()))?;

        Ok(DeliveryReceipt::new(
            response.message().collect::<Vec<_>>().join(" "),
        ))
    }

    async fn verify(&self) -> Result<(), TransportError> {
        let usable = self
            .transport
            .test_connection()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        if usable {
            Ok(())
        } else {
            Err(TransportError::Connection(
                "SMTP connection test failed".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SmtpConfig {
        SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            username: None,
            password: None,
            tls: TlsMode::None,
            timeout_secs: 1,
        }
    }

    #[test]
    fn test_config_defaults() {
        let config: SmtpConfig =
            serde_json::from_str(r#"{ "host": "mail.example.com" }"#).expect("valid config");
        assert_eq!(config.port, 587);
        assert_eq!(config.tls, TlsMode::Starttls);
        assert_eq!(config.timeout_secs, 10);
        assert!(config.username.is_none());
    }

    #[test]
    fn test_build_mime_rejects_invalid_addresses() {
        let message = Message {
            from: "not an address".to_string(),
            to: "ada@example.com".to_string(),
            subject: "hi".to_string(),
            html_body: "<p>hi</p>".to_string(),
        };
        assert!(matches!(
            SmtpTransport::build_mime(&message),
            Err(TransportError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_from_config_plaintext() {
        assert!(SmtpTransport::from_config(&test_config()).is_ok());
    }
}
