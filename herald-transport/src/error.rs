//! Typed error handling for transport operations.

use thiserror::Error;

/// Errors raised by a mail transport.
///
/// Individual send failures are recorded per recipient by the campaign pacer
/// and are never fatal to a run; verification failures surface to the caller
/// of the configuration test.
#[derive(Debug, Error)]
pub enum TransportError {
    /// An address could not be parsed into a mailbox.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The message could not be assembled.
    #[error("Failed to build message: {0}")]
    Build(String),

    /// The SMTP server rejected the transaction.
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// The HTTP mail provider returned a non-success response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The transport was constructed from unusable configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}
