use async_trait::async_trait;
use herald_common::Message;

use crate::{error::TransportError, types::DeliveryReceipt};

/// The mail-sending capability used to deliver one message.
///
/// The campaign core is agnostic to which concrete provider backs this;
/// implementations are selected at construction time through
/// [`crate::TransportConfig`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one rendered message.
    ///
    /// # Errors
    /// If the provider rejects or fails to accept the message
    async fn send(&self, message: &Message) -> Result<DeliveryReceipt, TransportError>;

    /// Check that the transport is usable with its current configuration.
    ///
    /// # Errors
    /// If the provider is unreachable or the credentials are rejected
    async fn verify(&self) -> Result<(), TransportError>;
}
