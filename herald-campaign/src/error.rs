//! Typed error handling for campaign operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::job::CampaignId;

/// Errors surfaced synchronously by the dispatcher.
///
/// Per-recipient transport failures are not part of this taxonomy: they are
/// recorded in the job's result sequence by the pacer and never abort a run.
#[derive(Debug, Error)]
pub enum CampaignError {
    /// The requested schedule instant is not strictly in the future.
    #[error("Schedule instant must be in the future (got {0})")]
    InvalidSchedule(DateTime<Utc>),

    /// No valid recipients remained after validation.
    #[error("No valid recipients in submission")]
    EmptyRecipientSet,

    /// No job with the given id is registered.
    #[error("No campaign found with id {0}")]
    NotFound(CampaignId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CampaignError::EmptyRecipientSet;
        assert_eq!(error.to_string(), "No valid recipients in submission");

        let id = CampaignId::generate();
        let error = CampaignError::NotFound(id.clone());
        assert_eq!(error.to_string(), format!("No campaign found with id {id}"));
    }
}
