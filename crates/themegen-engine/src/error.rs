//! Pipeline error model.

use themegen_types::{DestinationError, SourceError};

/// Categorized pipeline error.
///
/// `InvalidConfiguration` is the only variant that aborts a run before any
/// window starts. `Source` and `Write` are window-scoped when they occur
/// inside window processing; they reach this type only at the run boundary
/// (the initial count query, collaborator wiring).
///
/// `Infrastructure` wraps opaque host-side failures (task panics, closed
/// channels) that are outside the pipeline's error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Rejected configuration; fatal to the whole run.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The source collaborator failed outside any window (count query).
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The destination collaborator failed outside any window (wiring).
    #[error(transparent)]
    Write(#[from] DestinationError),

    /// Host-side failure (task panic, runtime shutdown).
    #[error("infrastructure error: {0}")]
    Infrastructure(anyhow::Error),
}

impl From<anyhow::Error> for PipelineError {
    fn from(e: anyhow::Error) -> Self {
        Self::Infrastructure(e)
    }
}
