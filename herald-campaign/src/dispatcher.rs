//! Campaign dispatcher façade.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use herald_common::{MessageTemplate, Recipient, internal};
use herald_transport::{Transport, TransportError};
use serde::Serialize;

use crate::{
    error::CampaignError,
    job::{CampaignId, CampaignJob, JobKind, JobSummary, Pacing, RunSummary},
    pacer::BatchPacer,
    registry::JobRegistry,
    timer::DeferralTimer,
};

/// What a submission produced.
#[derive(Debug, Serialize)]
#[serde(tag = "disposition", rename_all = "lowercase")]
pub enum SubmitOutcome {
    /// The job was armed for deferred activation; outcomes are retrievable
    /// via status while the job runs
    Scheduled {
        id: CampaignId,
        scheduled_at: DateTime<Utc>,
    },
    /// The job ran immediately and to completion
    Completed { id: CampaignId, summary: RunSummary },
}

/// The composition root of the campaign core.
///
/// Accepts new jobs, registers them, arms the deferral timer or runs the
/// pacer immediately, and exposes cancellation and status queries. All
/// methods take `&self`; callers on separate tasks submit, cancel, and query
/// concurrently while runs are in flight.
pub struct CampaignDispatcher {
    registry: JobRegistry,
    timer: DeferralTimer,
    pacer: BatchPacer,
    transport: Arc<dyn Transport>,
}

impl CampaignDispatcher {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, template: MessageTemplate) -> Self {
        let registry = JobRegistry::new();
        let pacer = BatchPacer::new(registry.clone(), Arc::clone(&transport), template);

        Self {
            registry,
            timer: DeferralTimer::new(),
            pacer,
            transport,
        }
    }

    /// Submit a single-recipient campaign.
    ///
    /// # Errors
    /// `EmptyRecipientSet` if the recipient is blank, `InvalidSchedule` if
    /// the schedule instant is not strictly in the future
    pub async fn submit_single(
        &self,
        recipient: Recipient,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Result<SubmitOutcome, CampaignError> {
        self.submit(JobKind::Single, vec![recipient], scheduled_at, None)
            .await
    }

    /// Submit a bulk campaign.
    ///
    /// Invalid recipients are dropped; at least one valid recipient must
    /// remain.
    ///
    /// # Errors
    /// `EmptyRecipientSet` if no valid recipients remain, `InvalidSchedule`
    /// if the schedule instant is not strictly in the future
    pub async fn submit_bulk(
        &self,
        recipients: Vec<Recipient>,
        scheduled_at: Option<DateTime<Utc>>,
        pacing: Option<Pacing>,
    ) -> Result<SubmitOutcome, CampaignError> {
        self.submit(JobKind::Bulk, recipients, scheduled_at, pacing)
            .await
    }

    async fn submit(
        &self,
        kind: JobKind,
        recipients: Vec<Recipient>,
        scheduled_at: Option<DateTime<Utc>>,
        pacing: Option<Pacing>,
    ) -> Result<SubmitOutcome, CampaignError> {
        let valid: Vec<Recipient> = recipients.iter().filter_map(Recipient::normalized).collect();
        if valid.is_empty() {
            return Err(CampaignError::EmptyRecipientSet);
        }

        let now = Utc::now();
        if let Some(at) = scheduled_at
            && at <= now
        {
            return Err(CampaignError::InvalidSchedule(at));
        }

        let job = CampaignJob::new(kind, valid, scheduled_at, pacing.unwrap_or_default());
        let id = job.id.clone();
        self.registry.insert(job);

        match scheduled_at {
            Some(at) => {
                let delay = (at - now).to_std().unwrap_or(Duration::ZERO);
                self.registry.mark_armed(&id);

                let pacer = self.pacer.clone();
                let fire_id = id.clone();
                self.timer.arm(id.clone(), delay, move || async move {
                    let _ = pacer.run(&fire_id).await;
                });

                internal!(
                    level = INFO,
                    "Campaign {id} armed for {at} ({}s from now)",
                    delay.as_secs()
                );

                Ok(SubmitOutcome::Scheduled {
                    id,
                    scheduled_at: at,
                })
            }
            None => {
                let summary = self
                    .pacer
                    .run(&id)
                    .await
                    .ok_or_else(|| CampaignError::NotFound(id.clone()))?;

                Ok(SubmitOutcome::Completed { id, summary })
            }
        }
    }

    /// Cancel a job: disarm its timer and remove it if it has not started.
    ///
    /// Returns whether a job was found. A `Running` job is left to finish:
    /// cancellation guarantees no future activation but never interrupts an
    /// issued send.
    pub fn cancel(&self, id: &CampaignId) -> bool {
        let disarmed = self.timer.disarm(id);

        if self.registry.cancel_if_inactive(id).is_some() {
            internal!(level = INFO, "Campaign {id} cancelled");
            return true;
        }

        // Running jobs are found but not interrupted
        disarmed || self.registry.contains(id)
    }

    /// Read-only snapshot of one job
    #[must_use]
    pub fn status(&self, id: &CampaignId) -> Option<CampaignJob> {
        self.registry.get(id)
    }

    /// Read-only snapshot of all registered jobs
    #[must_use]
    pub fn list(&self) -> Vec<JobSummary> {
        self.registry.list()
    }

    /// Check the configured transport end to end.
    ///
    /// # Errors
    /// If the provider is unreachable or rejects the credentials
    pub async fn verify_transport(&self) -> Result<(), TransportError> {
        self.transport.verify().await
    }
}
