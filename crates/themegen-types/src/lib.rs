//! Shared themegen model and error types.
//!
//! Pure data types used by the engine and CLI crates. Kept in their own
//! crate so collaborator implementations can depend on them without
//! pulling in the orchestration machinery.

pub mod error;
pub mod outcome;
pub mod record;
pub mod summary;
pub mod window;

pub use error::{DestinationError, ModelError, PayloadError, SourceError};
pub use outcome::{EnrichedRecord, EnrichmentOutcome, FailedRecord, WindowResult};
pub use record::{CommitRecord, RecordId, SourceRecord};
pub use summary::{RunSummary, WindowReport, WindowStatus};
pub use window::Window;
