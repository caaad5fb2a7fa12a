//! Campaign job model.

use chrono::{DateTime, Utc};
use herald_common::Recipient;
use serde::{Deserialize, Serialize};

/// Identifier for a campaign job
///
/// A globally unique ULID, generated at submission time and used for lookup
/// and cancellation. ULIDs are lexicographically sortable by creation time
/// and collision-resistant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CampaignId {
    id: ulid::Ulid,
}

impl CampaignId {
    /// Generate a new unique campaign id
    #[must_use]
    pub fn generate() -> Self {
        Self {
            id: ulid::Ulid::new(),
        }
    }

    /// Get the underlying ULID
    #[must_use]
    pub const fn ulid(&self) -> ulid::Ulid {
        self.id
    }
}

impl std::fmt::Display for CampaignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl std::str::FromStr for CampaignId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            id: ulid::Ulid::from_string(s)?,
        })
    }
}

impl Serialize for CampaignId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.id.to_string())
    }
}

impl<'de> Deserialize<'de> for CampaignId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let id = ulid::Ulid::from_string(&s).map_err(serde::de::Error::custom)?;
        Ok(Self { id })
    }
}

/// Whether a job targets one recipient or a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Single,
    Bulk,
}

/// Lifecycle state of a campaign job.
///
/// Transitions: `Pending` → `Armed` (scheduled) or `Pending` → `Running`
/// (immediate), each exactly once; `Armed` → `Running` at the fire instant;
/// `Running` → `Completed` after the last recipient. `Pending` and `Armed`
/// jobs can be cancelled; a `Running` job is not cancellable mid-flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Armed,
    Running,
    Completed,
    Cancelled,
}

/// Delivery pacing for bulk jobs.
///
/// A delay of `interval_ms` applies after every send except the last
/// recipient overall, and an additional cooldown of five intervals applies
/// after every `batch_size`-th send (1-based), again except after the last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    /// Delay between consecutive sends, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Number of sends per batch before the longer cooldown applies
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

const fn default_interval_ms() -> u64 {
    5000
}

const fn default_batch_size() -> u32 {
    10
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            batch_size: default_batch_size(),
        }
    }
}

impl Pacing {
    /// Cooldown applied after each full batch: five send intervals.
    #[must_use]
    pub const fn batch_delay_ms(&self) -> u64 {
        self.interval_ms.saturating_mul(5)
    }

    /// Copy of this pacing with `batch_size` clamped to at least 1.
    #[must_use]
    pub const fn normalized(self) -> Self {
        Self {
            interval_ms: self.interval_ms,
            batch_size: if self.batch_size == 0 {
                1
            } else {
                self.batch_size
            },
        }
    }
}

/// What happened to one recipient's send.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SendOutcome {
    /// The transport accepted the message
    Sent { receipt: String },
    /// The transport reported a failure; the run continued regardless
    Failed { error: String },
}

/// Per-recipient outcome, appended by the pacer in submission order.
///
/// Records are append-only and never mutated after being written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub email: String,
    pub company: String,
    #[serde(flatten)]
    pub outcome: SendOutcome,
    pub timestamp: DateTime<Utc>,
    /// 1-based position within the recipient sequence
    pub sequence: u32,
}

impl DeliveryRecord {
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self.outcome, SendOutcome::Sent { .. })
    }
}

/// One send request, single or bulk, with its own schedule, pacing, and
/// results. Owned exclusively by the [`crate::JobRegistry`].
#[derive(Clone, Debug, Serialize)]
pub struct CampaignJob {
    pub id: CampaignId,
    pub kind: JobKind,
    pub recipients: Vec<Recipient>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub pacing: Pacing,
    pub state: JobState,
    pub results: Vec<DeliveryRecord>,
    pub submitted_at: DateTime<Utc>,
}

impl CampaignJob {
    #[must_use]
    pub fn new(
        kind: JobKind,
        recipients: Vec<Recipient>,
        scheduled_at: Option<DateTime<Utc>>,
        pacing: Pacing,
    ) -> Self {
        Self {
            id: CampaignId::generate(),
            kind,
            recipients,
            scheduled_at,
            pacing: pacing.normalized(),
            state: JobState::Pending,
            results: Vec::new(),
            submitted_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> JobSummary {
        JobSummary {
            id: self.id.clone(),
            kind: self.kind,
            scheduled_at: self.scheduled_at,
            state: self.state,
            recipient_count: self.recipients.len(),
            submitted_at: self.submitted_at,
        }
    }
}

/// Condensed view of a job for listings.
#[derive(Clone, Debug, Serialize)]
pub struct JobSummary {
    pub id: CampaignId,
    pub kind: JobKind,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub state: JobState,
    pub recipient_count: usize,
    pub submitted_at: DateTime<Utc>,
}

/// Tally of a completed run, derived from the result records.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub sent: usize,
    pub failed: usize,
    pub records: Vec<DeliveryRecord>,
}

impl RunSummary {
    #[must_use]
    pub fn from_records(records: Vec<DeliveryRecord>) -> Self {
        let sent = records.iter().filter(|r| r.is_sent()).count();
        Self {
            sent,
            failed: records.len() - sent,
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_id_roundtrip() {
        let id = CampaignId::generate();
        let parsed: CampaignId = id.to_string().parse().expect("valid ulid");
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_campaign_id_rejects_garbage() {
        assert!("not-a-ulid".parse::<CampaignId>().is_err());
    }

    #[test]
    fn test_pacing_defaults() {
        let pacing: Pacing = serde_json::from_str("{}").expect("empty pacing deserializes");
        assert_eq!(pacing.interval_ms, 5000);
        assert_eq!(pacing.batch_size, 10);
        assert_eq!(pacing.batch_delay_ms(), 25_000);
    }

    #[test]
    fn test_pacing_normalization_clamps_batch_size() {
        let pacing = Pacing {
            interval_ms: 1000,
            batch_size: 0,
        };
        assert_eq!(pacing.normalized().batch_size, 1);
        assert_eq!(pacing.normalized().interval_ms, 1000);
    }

    #[test]
    fn test_new_job_is_pending() {
        let job = CampaignJob::new(
            JobKind::Single,
            vec![Recipient::new("ada@example.com", "Acme")],
            None,
            Pacing::default(),
        );
        assert_eq!(job.state, JobState::Pending);
        assert!(job.results.is_empty());
        assert_eq!(job.summary().recipient_count, 1);
    }

    #[test]
    fn test_run_summary_tally() {
        let records = vec![
            DeliveryRecord {
                email: "a@example.com".to_string(),
                company: "A".to_string(),
                outcome: SendOutcome::Sent {
                    receipt: "r1".to_string(),
                },
                timestamp: Utc::now(),
                sequence: 1,
            },
            DeliveryRecord {
                email: "b@example.com".to_string(),
                company: "B".to_string(),
                outcome: SendOutcome::Failed {
                    error: "mailbox unavailable".to_string(),
                },
                timestamp: Utc::now(),
                sequence: 2,
            },
        ];

        let summary = RunSummary::from_records(records);
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.records.len(), 2);
    }

    #[test]
    fn test_delivery_record_serialization_flattens_outcome() {
        let record = DeliveryRecord {
            email: "a@example.com".to_string(),
            company: "A".to_string(),
            outcome: SendOutcome::Sent {
                receipt: "r1".to_string(),
            },
            timestamp: Utc::now(),
            sequence: 1,
        };

        let json = serde_json::to_value(&record).expect("record serializes");
        assert_eq!(json["status"], "sent");
        assert_eq!(json["receipt"], "r1");
        assert_eq!(json["sequence"], 1);
    }
}
