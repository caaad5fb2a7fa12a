//! Campaign job registry.

use std::sync::Arc;

use dashmap::DashMap;

use crate::job::{CampaignId, CampaignJob, DeliveryRecord, JobState, JobSummary};

/// The only shared mutable state in the campaign core: a mapping from job id
/// to job, with per-entry mutual exclusion (lock-free concurrent access).
///
/// The registry exclusively owns all job records. The timer and pacer mutate
/// jobs through it, never through retained references, so cancellation,
/// timer firing, and run completion serialize on the entry locks.
#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<DashMap<CampaignId, CampaignJob>>,
}

impl JobRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(DashMap::new()),
        }
    }

    /// Register a job under its id
    pub fn insert(&self, job: CampaignJob) {
        self.jobs.insert(job.id.clone(), job);
    }

    /// Snapshot of a job, if registered
    #[must_use]
    pub fn get(&self, id: &CampaignId) -> Option<CampaignJob> {
        self.jobs.get(id).map(|entry| entry.value().clone())
    }

    /// Whether a job is registered
    #[must_use]
    pub fn contains(&self, id: &CampaignId) -> bool {
        self.jobs.contains_key(id)
    }

    /// Remove a job; a no-op on an absent id
    pub fn remove(&self, id: &CampaignId) -> Option<CampaignJob> {
        self.jobs.remove(id).map(|(_, job)| job)
    }

    /// Snapshot of all job summaries, sorted by id (submission order)
    ///
    /// This is a copy, never a live view.
    #[must_use]
    pub fn list(&self) -> Vec<JobSummary> {
        let mut summaries: Vec<_> = self
            .jobs
            .iter()
            .map(|entry| entry.value().summary())
            .collect();

        // ULIDs are lexicographically sortable by creation time
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    /// Number of registered jobs
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Mark a pending job as armed for deferred activation
    pub fn mark_armed(&self, id: &CampaignId) {
        if let Some(mut entry) = self.jobs.get_mut(id)
            && entry.value().state == JobState::Pending
        {
            entry.value_mut().state = JobState::Armed;
        }
    }

    /// Atomically transition a job to `Running` and hand out a snapshot.
    ///
    /// Succeeds exactly once per job, and only from `Pending` or `Armed`.
    /// Returns `None` when the job was cancelled (removed) or is already
    /// running; this is the activation guard that makes cancellation before
    /// fire deterministic.
    #[must_use]
    pub fn begin_run(&self, id: &CampaignId) -> Option<CampaignJob> {
        let mut entry = self.jobs.get_mut(id)?;

        match entry.value().state {
            JobState::Pending | JobState::Armed => {
                entry.value_mut().state = JobState::Running;
                Some(entry.value().clone())
            }
            JobState::Running | JobState::Completed | JobState::Cancelled => None,
        }
    }

    /// Append a per-recipient outcome to a running job
    pub fn push_record(&self, id: &CampaignId, record: DeliveryRecord) {
        if let Some(mut entry) = self.jobs.get_mut(id) {
            entry.value_mut().results.push(record);
        }
    }

    /// Transition a running job to `Completed` and remove it.
    ///
    /// Completed jobs are not retained for audit; the outcome summary is the
    /// caller's to keep.
    pub fn complete(&self, id: &CampaignId) -> Option<CampaignJob> {
        self.jobs.remove(id).map(|(_, mut job)| {
            job.state = JobState::Completed;
            job
        })
    }

    /// Remove a job only if it has not started running.
    ///
    /// Returns the cancelled job, or `None` if the id is unknown or the job
    /// is already `Running`.
    pub fn cancel_if_inactive(&self, id: &CampaignId) -> Option<CampaignJob> {
        self.jobs
            .remove_if(id, |_, job| {
                matches!(job.state, JobState::Pending | JobState::Armed)
            })
            .map(|(_, mut job)| {
                job.state = JobState::Cancelled;
                job
            })
    }
}

#[cfg(test)]
mod tests {
    use herald_common::Recipient;

    use super::*;
    use crate::job::{JobKind, Pacing};

    fn test_job() -> CampaignJob {
        CampaignJob::new(
            JobKind::Single,
            vec![Recipient::new("ada@example.com", "Acme")],
            None,
            Pacing::default(),
        )
    }

    #[test]
    fn test_insert_get_remove() {
        let registry = JobRegistry::new();
        let job = test_job();
        let id = job.id.clone();

        registry.insert(job);
        assert!(registry.contains(&id));
        assert_eq!(registry.get(&id).map(|j| j.id), Some(id.clone()));

        registry.remove(&id);
        assert!(registry.get(&id).is_none());

        // Removing an absent id is a no-op
        assert!(registry.remove(&id).is_none());
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let registry = JobRegistry::new();
        registry.insert(test_job());

        let listed = registry.list();
        assert_eq!(listed.len(), 1);

        registry.insert(test_job());
        // The earlier snapshot is unaffected by later mutation
        assert_eq!(listed.len(), 1);
        assert_eq!(registry.list().len(), 2);
    }

    #[test]
    fn test_begin_run_happens_exactly_once() {
        let registry = JobRegistry::new();
        let job = test_job();
        let id = job.id.clone();
        registry.insert(job);

        assert!(registry.begin_run(&id).is_some());
        // A second activation attempt is refused
        assert!(registry.begin_run(&id).is_none());
        assert_eq!(registry.get(&id).map(|j| j.state), Some(JobState::Running));
    }

    #[test]
    fn test_begin_run_on_cancelled_job_is_refused() {
        let registry = JobRegistry::new();
        let job = test_job();
        let id = job.id.clone();
        registry.insert(job);
        registry.mark_armed(&id);

        assert!(registry.cancel_if_inactive(&id).is_some());
        assert!(registry.begin_run(&id).is_none());
    }

    #[test]
    fn test_cancel_spares_running_jobs() {
        let registry = JobRegistry::new();
        let job = test_job();
        let id = job.id.clone();
        registry.insert(job);

        let _ = registry.begin_run(&id);
        assert!(registry.cancel_if_inactive(&id).is_none());
        assert!(registry.contains(&id));
    }

    #[test]
    fn test_complete_removes_entry() {
        let registry = JobRegistry::new();
        let job = test_job();
        let id = job.id.clone();
        registry.insert(job);
        let _ = registry.begin_run(&id);

        let completed = registry.complete(&id).expect("job should be registered");
        assert_eq!(completed.state, JobState::Completed);
        assert!(registry.is_empty());
    }
}
