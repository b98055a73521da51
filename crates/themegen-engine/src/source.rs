//! Source collaborator contract.

use async_trait::async_trait;
use themegen_types::{SourceError, SourceRecord, Window};

/// Read access to the source dataset.
///
/// Both operations are fallible, network-latent calls. Implementations
/// must be `Send + Sync` for use behind `Arc<dyn RecordSource>`.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Total number of rows visible to the pipeline.
    ///
    /// Read exactly once, at plan time; rows arriving later are outside
    /// the run.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the count query cannot be executed.
    async fn count(&self) -> Result<u64, SourceError>;

    /// One page of rows in the source's natural order.
    ///
    /// Yields at most `window.limit` records; fewer when the window
    /// overhangs the end of the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the page query cannot be executed.
    async fn fetch_page(&self, window: Window) -> Result<Vec<SourceRecord>, SourceError>;
}
