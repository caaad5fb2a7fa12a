//! Mail transport backends for Herald
//!
//! This crate provides the capability the campaign pacer drains recipients
//! through:
//! - A [`Transport`] trait abstracting over interchangeable providers
//! - [`SmtpTransport`]: direct SMTP submission via lettre
//! - [`ApiTransport`]: JSON submission to an HTTP mail provider
//! - [`TestTransport`]: an in-memory recorder with synchronization helpers

pub mod api;
pub mod config;
pub mod error;
pub mod smtp;
pub mod r#trait;
pub mod types;

pub use api::{ApiConfig, ApiTransport};
pub use config::TransportConfig;
pub use error::TransportError;
pub use smtp::{SmtpConfig, SmtpTransport, TlsMode};
pub use test::{SentMessage, TestTransport};
pub use r#trait::Transport;
pub use types::DeliveryReceipt;
