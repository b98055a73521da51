//! Collaborator error types.
//!
//! Each collaborator boundary has its own error enum; record-level
//! enrichment failures never travel as errors at all — they are folded
//! into [`FailedRecord`](crate::outcome::FailedRecord) outcomes by the
//! engine and propagated by value.

use thiserror::Error;

/// The source collaborator could not execute a count or page query.
///
/// Window-fatal: the affected window is marked failed without enrichment,
/// but sibling windows are unaffected.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing store could not be reached or rejected the query.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// File-system failure opening the source (e.g. a local database file).
    #[error("source i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// The destination collaborator rejected or could not perform a write.
#[derive(Debug, Error)]
pub enum DestinationError {
    /// The atomic batch write was rejected; none of its rows are visible.
    #[error("batch write failed: {0}")]
    WriteFailed(String),

    /// The destination could not be reached or opened.
    #[error("destination unavailable: {0}")]
    Unavailable(String),

    /// File-system failure opening the destination.
    #[error("destination i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// The enrichment model call failed before producing usable text.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Transport-level failure (connect, send, read).
    #[error("model request failed: {0}")]
    Request(String),

    /// The model endpoint answered with a non-success status.
    #[error("model returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response decoded but carried no candidate text.
    #[error("model response contained no candidate text")]
    EmptyResponse,
}

/// The model's text output could not be parsed into the expected shape.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The (de-fenced) text is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON object has no `themes` field.
    #[error("payload has no \"themes\" field")]
    MissingThemes,

    /// `themes` exists but is not an array of strings.
    #[error("\"themes\" is not an array of strings")]
    ThemesNotStrings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_display() {
        let err = SourceError::Unavailable("connection refused".into());
        assert_eq!(err.to_string(), "source unavailable: connection refused");
    }

    #[test]
    fn write_failed_display() {
        let err = DestinationError::WriteFailed("UNIQUE constraint failed".into());
        assert!(err.to_string().contains("batch write failed"));
    }

    #[test]
    fn model_status_display() {
        let err = ModelError::Status {
            status: 429,
            message: "quota exceeded".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("quota exceeded"));
    }

    #[test]
    fn payload_json_error_from() {
        let inner = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = PayloadError::from(inner);
        assert!(err.to_string().contains("not valid JSON"));
    }
}
