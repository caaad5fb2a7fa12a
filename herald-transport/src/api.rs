//! HTTP mail-provider transport backed by reqwest.
//!
//! Speaks the common provider shape: a JSON `POST` of the message to a
//! single endpoint with bearer authentication, answered with the provider's
//! message id.

use std::time::Duration;

use async_trait::async_trait;
use herald_common::Message;
use serde::Deserialize;
use serde_json::json;

use crate::{error::TransportError, types::DeliveryReceipt, r#trait::Transport};

/// Configuration for the HTTP mail-provider transport.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    /// Fully qualified send endpoint, e.g. `https://api.example.com/v1/send`
    pub endpoint: String,

    /// Bearer token presented on every request
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

const fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// JSON-over-HTTP submission transport.
pub struct ApiTransport {
    client: reqwest::Client,
    config: ApiConfig,
}

impl ApiTransport {
    /// Build a transport from configuration.
    ///
    /// # Errors
    /// If the HTTP client cannot be constructed
    pub fn from_config(config: ApiConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Transport for ApiTransport {
    async fn send(&self, message: &Message) -> Result<DeliveryReceipt, TransportError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "from": message.from,
                "to": message.to,
                "subject": message.subject,
                "html": message.html_body,
            }))
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SendResponse = response.json().await.map_err(|e| TransportError::Api {
            status: status.as_u16(),
            message: format!("Malformed provider response: {e}"),
        })?;

        Ok(DeliveryReceipt::new(body.id))
    }

    async fn verify(&self) -> Result<(), TransportError> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(TransportError::Configuration(
                "API credentials rejected by provider".to_string(),
            ));
        }

        // Any other answer proves the endpoint is reachable; most providers
        // reject GET on the send route with 405.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: ApiConfig = serde_json::from_str(
            r#"{ "endpoint": "https://api.example.com/v1/send", "api_key": "secret" }"#,
        )
        .expect("valid config");
        assert_eq!(config.timeout_secs, 30);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = ApiConfig {
            endpoint: "https://api.example.com/v1/send".to_string(),
            api_key: "secret".to_string(),
            timeout_secs: 5,
        };
        assert!(ApiTransport::from_config(config).is_ok());
    }
}
