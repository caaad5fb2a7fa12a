//! Paced, sequential delivery of a job's recipient list.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use herald_common::{MessageTemplate, internal};
use herald_transport::Transport;
use tracing::{info, warn};

use crate::{
    job::{CampaignId, DeliveryRecord, RunSummary, SendOutcome},
    registry::JobRegistry,
};

/// Drains a job's recipients through the mail transport, in order, under the
/// job's pacing constraints.
///
/// The loop is strictly sequential: the pacing contract depends on
/// wall-clock ordering between consecutive sends, so there is no concurrent
/// dispatch within one job. A transport failure is recorded and the run
/// advances to the next recipient with pacing intact; the pacer has no fatal
/// error path and always reaches completion.
///
/// No timeout is imposed on an individual transport call; a hung call stalls
/// this job's run indefinitely (known limitation).
#[derive(Clone)]
pub struct BatchPacer {
    registry: JobRegistry,
    transport: Arc<dyn Transport>,
    template: MessageTemplate,
}

impl BatchPacer {
    #[must_use]
    pub fn new(
        registry: JobRegistry,
        transport: Arc<dyn Transport>,
        template: MessageTemplate,
    ) -> Self {
        Self {
            registry,
            transport,
            template,
        }
    }

    /// Run a registered job to completion.
    ///
    /// Activation goes through the registry's `begin_run` guard; `None`
    /// means the job was cancelled or already activated, and nothing is
    /// sent. On completion the job is removed from the registry and the
    /// outcome tally returned.
    pub async fn run(&self, id: &CampaignId) -> Option<RunSummary> {
        let job = self.registry.begin_run(id)?;

        let pacing = job.pacing.normalized();
        let interval = Duration::from_millis(pacing.interval_ms);
        let batch_delay = Duration::from_millis(pacing.batch_delay_ms());
        let total = job.recipients.len();

        internal!(
            level = INFO,
            "Starting campaign {id}: {total} recipients, interval {}ms, batch size {}, batch delay {}ms",
            pacing.interval_ms,
            pacing.batch_size,
            pacing.batch_delay_ms()
        );

        let mut records = Vec::with_capacity(total);

        for (index, recipient) in job.recipients.iter().enumerate() {
            let sequence = u32::try_from(index + 1).unwrap_or(u32::MAX);
            let message = self.template.render(recipient);

            let outcome = match self.transport.send(&message).await {
                Ok(receipt) => {
                    info!(
                        campaign = %id,
                        recipient = %recipient.email,
                        "Sent {sequence}/{total}"
                    );
                    SendOutcome::Sent {
                        receipt: receipt.id,
                    }
                }
                Err(error) => {
                    warn!(
                        campaign = %id,
                        recipient = %recipient.email,
                        error = %error,
                        "Failed {sequence}/{total}, continuing"
                    );
                    SendOutcome::Failed {
                        error: error.to_string(),
                    }
                }
            };

            let record = DeliveryRecord {
                email: recipient.email.clone(),
                company: recipient.company.clone(),
                outcome,
                timestamp: Utc::now(),
                sequence,
            };
            self.registry.push_record(id, record.clone());
            records.push(record);

            // Pacing applies uniformly to sent and failed outcomes, and
            // never after the last recipient overall.
            if index + 1 < total {
                tokio::time::sleep(interval).await;

                if sequence % pacing.batch_size == 0 {
                    internal!(
                        level = DEBUG,
                        "Batch of {} complete, cooling down {}ms",
                        pacing.batch_size,
                        pacing.batch_delay_ms()
                    );
                    tokio::time::sleep(batch_delay).await;
                }
            }
        }

        self.registry.complete(id);

        let summary = RunSummary::from_records(records);
        internal!(
            level = INFO,
            "Campaign {id} completed: sent {}, failed {}",
            summary.sent,
            summary.failed
        );

        Some(summary)
    }
}
