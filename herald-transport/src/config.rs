use std::sync::Arc;

use serde::Deserialize;

use crate::{
    api::{ApiConfig, ApiTransport},
    error::TransportError,
    smtp::{SmtpConfig, SmtpTransport},
    r#trait::Transport,
};

/// Runtime selection of the mail provider.
///
/// The two backends are interchangeable; which one backs a deployment is a
/// construction-time decision made in the configuration file.
///
/// SMTP provider in RON config:
/// ```ron
/// transport: Smtp((
///     host: "mail.example.com",
///     port: 465,
///     username: Some("outreach@example.com"),
///     password: Some("hunter2"),
///     tls: tls,
/// )),
/// ```
///
/// HTTP provider:
/// ```ron
/// transport: Api((
///     endpoint: "https://api.example.com/v1/send",
///     api_key: "secret",
/// )),
/// ```
#[derive(Clone, Debug, Deserialize)]
pub enum TransportConfig {
    /// Direct SMTP submission
    Smtp(SmtpConfig),
    /// JSON submission to an HTTP mail provider
    Api(ApiConfig),
}

impl TransportConfig {
    /// Convert the configuration into a concrete transport.
    ///
    /// # Errors
    /// If the selected backend cannot be constructed from its configuration
    pub fn into_transport(self) -> Result<Arc<dyn Transport>, TransportError> {
        match self {
            Self::Smtp(config) => Ok(Arc::new(SmtpTransport::from_config(&config)?)),
            Self::Api(config) => Ok(Arc::new(ApiTransport::from_config(config)?)),
        }
    }
}
