//! Semantic validation for parsed pipeline configuration values.

use crate::config::types::PipelineConfig;
use crate::error::PipelineError;

/// Validate a parsed pipeline configuration.
///
/// Collects every violation before failing so a bad file is fixed in one
/// pass.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfiguration`] listing all validation
/// failures found in the pipeline config.
pub fn validate_pipeline(config: &PipelineConfig) -> Result<(), PipelineError> {
    let mut errors = Vec::new();

    if config.version != "1.0" {
        errors.push(format!(
            "Unsupported pipeline version '{}', expected '1.0'",
            config.version
        ));
    }

    if config.pipeline.trim().is_empty() {
        errors.push("Pipeline name must not be empty".to_string());
    }

    if config.source.connection.trim().is_empty() {
        errors.push("Source connection must not be empty".to_string());
    }
    if config.source.table.trim().is_empty() {
        errors.push("Source table must not be empty".to_string());
    }
    if config.source.id_column.trim().is_empty() {
        errors.push("Source id_column must not be empty".to_string());
    }

    if config.enrichment.model.trim().is_empty() {
        errors.push("Enrichment model must not be empty".to_string());
    }
    if config.enrichment.api_key.trim().is_empty() {
        errors.push("Enrichment api_key must not be empty".to_string());
    }
    if config.enrichment.theme_count == 0 {
        errors.push("theme_count must be at least 1".to_string());
    }

    if config.destination.connection.trim().is_empty() {
        errors.push("Destination connection must not be empty".to_string());
    }
    if config.destination.table.trim().is_empty() {
        errors.push("Destination table must not be empty".to_string());
    }

    if config.resources.batch_size == 0 {
        errors.push("batch_size must be at least 1".to_string());
    }
    if config.resources.max_parallelism == 0 {
        errors.push("max_parallelism must be at least 1".to_string());
    }
    if config.resources.max_inflight_requests == 0 {
        errors.push("max_inflight_requests must be at least 1".to_string());
    }
    if config.resources.request_timeout_secs == 0 {
        errors.push("request_timeout_secs must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::InvalidConfiguration(format!(
            "Pipeline validation failed:\n  - {}",
            errors.join("\n  - ")
        )))
    }
}
