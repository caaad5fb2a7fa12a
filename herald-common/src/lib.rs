pub mod logging;
pub mod message;
pub mod recipient;

pub use message::{Message, MessageTemplate};
pub use recipient::Recipient;
pub use tracing;

/// Signals broadcast across the process to coordinate shutdown.
#[derive(Debug, Clone, Copy)]
pub enum Signal {
    Shutdown,
    Finalised,
}
