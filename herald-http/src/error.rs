//! API error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use herald_campaign::CampaignError;
use herald_transport::TransportError;
use serde_json::json;
use thiserror::Error;

/// Errors a route handler can answer with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Campaign(#[from] CampaignError),

    #[error("Transport verification failed: {0}")]
    Transport(#[from] TransportError),

    /// The path parameter was not a valid campaign id.
    #[error("Invalid campaign id: {0}")]
    InvalidId(String),
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Campaign(
                CampaignError::InvalidSchedule(_) | CampaignError::EmptyRecipientSet,
            ) => StatusCode::BAD_REQUEST,
            Self::Campaign(CampaignError::NotFound(_)) | Self::InvalidId(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
