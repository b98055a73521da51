//! Transactional commit of a window's successes.

use themegen_types::{CommitRecord, DestinationError, EnrichedRecord};

use crate::destination::ThemeSink;

/// Commit a window's successful records as one atomic batch.
///
/// Builds one [`CommitRecord`] per success and performs a single
/// `batch_write` call; the destination's transaction boundary is the unit
/// of atomicity. An empty success set is a no-op: no transaction is
/// opened and 0 is returned.
///
/// # Errors
///
/// Returns [`DestinationError::WriteFailed`] when the destination rejects
/// the batch; none of the window's rows are visible in that case.
pub async fn commit_window(
    sink: &dyn ThemeSink,
    table: &str,
    successes: &[EnrichedRecord],
) -> Result<u64, DestinationError> {
    if successes.is_empty() {
        tracing::debug!(table, "No successes to commit, skipping write");
        return Ok(0);
    }

    let rows: Vec<CommitRecord> = successes
        .iter()
        .map(|s| CommitRecord::new(s.id.clone(), &s.themes))
        .collect();

    sink.batch_write(table, &rows).await?;

    tracing::debug!(table, committed = rows.len(), "Window batch committed");
    Ok(rows.len() as u64)
}
