//! Destination collaborator contract.

use async_trait::async_trait;
use themegen_types::{CommitRecord, DestinationError};

/// Write access to the destination store.
///
/// Implementations must be `Send + Sync` for use behind
/// `Arc<dyn ThemeSink>`.
#[async_trait]
pub trait ThemeSink: Send + Sync {
    /// Write every row as one atomic batch.
    ///
    /// Either all rows become durably visible or none do; implementations
    /// must not split the batch across transactions.
    ///
    /// # Errors
    ///
    /// Returns [`DestinationError::WriteFailed`] when the batch is
    /// rejected (constraint violation, unavailability); no rows are
    /// visible in that case.
    async fn batch_write(&self, table: &str, rows: &[CommitRecord]) -> Result<(), DestinationError>;
}
