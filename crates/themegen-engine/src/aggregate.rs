//! Partitioning of a window's outcomes.

use themegen_types::{EnrichmentOutcome, WindowResult};

/// Partition outcomes into successes and failures.
///
/// Pure by-tag split; encounter order is preserved within each partition
/// so logs and tests are deterministic. The partition sizes always sum to
/// the input length.
#[must_use]
pub fn partition(outcomes: Vec<EnrichmentOutcome>) -> WindowResult {
    let mut result = WindowResult::default();
    for outcome in outcomes {
        match outcome {
            EnrichmentOutcome::Success(s) => result.successes.push(s),
            EnrichmentOutcome::Failure(f) => result.failures.push(f),
        }
    }
    result
}
