//! Enrichment model collaborator contract.

use async_trait::async_trait;
use themegen_types::{ModelError, SourceRecord};

/// A generative model that produces raw theme text for one record.
///
/// The returned text is *unparsed* model output; extracting and
/// validating the JSON payload is the engine's job, not the model's.
/// Implementations must be `Send + Sync` for use behind
/// `Arc<dyn ThemeModel>`.
#[async_trait]
pub trait ThemeModel: Send + Sync {
    /// Generate theme text for one record.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] on transport failure, a non-success HTTP
    /// status, or an empty response.
    async fn generate(&self, record: &SourceRecord) -> Result<String, ModelError>;
}
