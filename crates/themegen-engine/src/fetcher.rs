//! Window fetching against the source collaborator.

use themegen_types::{SourceError, SourceRecord, Window};

use crate::source::RecordSource;

/// Fetch the records belonging to one window.
///
/// A fetch failure is fatal to the window (no partial recovery) and is
/// surfaced to the orchestrator, which marks the window `FailedFetch`
/// without invoking enrichment.
///
/// # Errors
///
/// Returns [`SourceError`] when the page query cannot be executed.
pub async fn fetch_window(
    source: &dyn RecordSource,
    window: Window,
) -> Result<Vec<SourceRecord>, SourceError> {
    tracing::debug!(offset = window.offset, limit = window.limit, "Fetching window");

    let mut records = source.fetch_page(window).await?;

    if records.len() as u64 > window.limit {
        tracing::warn!(
            offset = window.offset,
            limit = window.limit,
            fetched = records.len(),
            "Source returned more rows than the window limit; truncating"
        );
        records.truncate(window.limit as usize);
    }

    tracing::debug!(
        offset = window.offset,
        fetched = records.len(),
        "Window fetched"
    );
    Ok(records)
}
