//! API route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use herald_campaign::{CampaignError, CampaignId, CampaignJob, JobSummary, Pacing, SubmitOutcome};
use herald_common::Recipient;
use serde::Deserialize;
use serde_json::json;

use crate::{error::ApiError, server::AppState};

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "herald",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SingleRequest {
    pub email: String,
    pub company: String,
    #[serde(default)]
    pub schedule_at: Option<DateTime<Utc>>,
}

/// Submit a single-recipient campaign.
pub async fn submit_single(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SingleRequest>,
) -> Result<Json<SubmitOutcome>, ApiError> {
    let outcome = state
        .dispatcher
        .submit_single(
            Recipient::new(request.email, request.company),
            request.schedule_at,
        )
        .await?;

    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub recipients: Vec<Recipient>,
    #[serde(default)]
    pub schedule_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pacing: Option<Pacing>,
}

/// Submit a bulk campaign.
///
/// Immediate submissions answer with the full per-recipient results once the
/// run completes; deferred submissions answer right away with the job id and
/// schedule instant.
pub async fn submit_bulk(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BulkRequest>,
) -> Result<Json<SubmitOutcome>, ApiError> {
    let outcome = state
        .dispatcher
        .submit_bulk(request.recipients, request.schedule_at, request.pacing)
        .await?;

    Ok(Json(outcome))
}

/// List all registered campaigns.
pub async fn list_campaigns(State(state): State<Arc<AppState>>) -> Json<Vec<JobSummary>> {
    Json(state.dispatcher.list())
}

/// Snapshot of one campaign, including any partial results.
pub async fn campaign_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CampaignJob>, ApiError> {
    let id = parse_id(&id)?;

    state
        .dispatcher
        .status(&id)
        .map(Json)
        .ok_or(ApiError::Campaign(CampaignError::NotFound(id)))
}

/// Cancel a campaign by id.
pub async fn cancel_campaign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id)?;

    if state.dispatcher.cancel(&id) {
        Ok(Json(json!({ "cancelled": true })))
    } else {
        Err(ApiError::Campaign(CampaignError::NotFound(id)))
    }
}

/// Test the configured mail transport.
pub async fn test_transport(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.dispatcher.verify_transport().await?;
    Ok(Json(json!({ "status": "ok" })))
}

fn parse_id(raw: &str) -> Result<CampaignId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::InvalidId(raw.to_string()))
}
