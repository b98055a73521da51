//! Per-record enrichment outcomes and their per-window partition.

use serde::{Deserialize, Serialize};

use crate::record::RecordId;

/// A record whose enrichment call succeeded and parsed cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub id: RecordId,
    /// Generated themes in model output order.
    pub themes: Vec<String>,
}

/// A record whose enrichment failed, with a human-readable cause.
///
/// `id` is `None` for records whose source row had no usable id; they are
/// still accounted for here so no fetched record goes missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRecord {
    pub id: Option<RecordId>,
    pub cause: String,
}

/// Tagged result of enriching one record. Exactly one variant holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EnrichmentOutcome {
    Success(EnrichedRecord),
    Failure(FailedRecord),
}

impl EnrichmentOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The record id this outcome belongs to, if one exists.
    #[must_use]
    pub fn id(&self) -> Option<&RecordId> {
        match self {
            Self::Success(s) => Some(&s.id),
            Self::Failure(f) => f.id.as_ref(),
        }
    }
}

/// All outcomes of one window, partitioned by tag.
///
/// `successes.len() + failures.len()` always equals the number of records
/// fetched for the window; encounter order is preserved in each partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowResult {
    pub successes: Vec<EnrichedRecord>,
    pub failures: Vec<FailedRecord>,
}

impl WindowResult {
    /// Total number of outcomes in both partitions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }
}
