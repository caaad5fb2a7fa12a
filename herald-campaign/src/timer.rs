//! One-shot deferral timers.

use std::{future::Future, sync::Arc, time::Duration};

use dashmap::{DashMap, mapref::entry::Entry};
use herald_common::internal;
use tokio::task::JoinHandle;

use crate::job::CampaignId;

/// Schedules a job's activation at a future instant.
///
/// One timer task per job id, keyed on an absolute duration from "now":
/// a true one-shot deadline, not a calendar expression, so a fired or
/// disarmed timer can never recur. Arming is idempotent per id.
///
/// Disarming aborts the sleeping task, but the deterministic activation
/// guard is the registry's `begin_run` transition: a cancelled job has
/// already been removed by the time its timer could fire, so the callback
/// finds nothing to run.
#[derive(Clone, Default)]
pub struct DeferralTimer {
    tasks: Arc<DashMap<CampaignId, JoinHandle<()>>>,
}

impl DeferralTimer {
    /// Create a new timer with no armed tasks
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(DashMap::new()),
        }
    }

    /// Arm a one-shot timer for a job.
    ///
    /// After `delay`, the timer destroys its own entry and awaits `fire`.
    /// If a timer is already armed for this id, the call is a no-op.
    pub fn arm<F, Fut>(&self, id: CampaignId, delay: Duration, fire: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        match self.tasks.entry(id.clone()) {
            Entry::Occupied(_) => {
                internal!(level = DEBUG, "Timer already armed for campaign {id}");
            }
            Entry::Vacant(slot) => {
                let tasks = Arc::clone(&self.tasks);
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    tasks.remove(&id);
                    fire().await;
                });
                slot.insert(handle);
            }
        }
    }

    /// Disarm a job's timer, if one is armed.
    ///
    /// Returns whether a timer was found.
    pub fn disarm(&self, id: &CampaignId) -> bool {
        self.tasks.remove(id).is_some_and(|(_, handle)| {
            handle.abort();
            true
        })
    }

    /// Number of currently armed timers
    #[must_use]
    pub fn armed(&self) -> usize {
        self.tasks.len()
    }
}
