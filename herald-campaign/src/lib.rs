//! Scheduled, paced, cancellable send campaigns
//!
//! This crate is the core of Herald:
//! - Track campaign jobs in an in-memory registry
//! - Defer a job's activation to a future instant with a one-shot timer
//! - Drain a job's recipients through a mail transport under pacing
//!   constraints (per-message interval, per-batch cooldown)
//! - Expose submission, cancellation, and status queries through a
//!   dispatcher façade

mod dispatcher;
mod error;
mod job;
mod pacer;
mod registry;
mod timer;

pub use dispatcher::{CampaignDispatcher, SubmitOutcome};
pub use error::CampaignError;
pub use job::{
    CampaignId, CampaignJob, DeliveryRecord, JobKind, JobState, JobSummary, Pacing, RunSummary,
    SendOutcome,
};
pub use pacer::BatchPacer;
pub use registry::JobRegistry;
pub use timer::DeferralTimer;
