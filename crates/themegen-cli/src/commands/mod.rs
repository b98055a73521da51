pub mod check;
pub mod plan;
pub mod run;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use themegen_engine::config::types::PipelineConfig;
use themegen_engine::config::{parser, validator};
use themegen_engine::gemini::{GeminiClient, GeminiConfig};
use themegen_engine::sqlite::{SqliteSink, SqliteSource};
use themegen_engine::Collaborators;

/// Parse and validate a pipeline file.
pub fn load_pipeline(pipeline_path: &Path) -> Result<PipelineConfig> {
    let config = parser::parse_pipeline(pipeline_path)
        .with_context(|| format!("Failed to parse pipeline: {}", pipeline_path.display()))?;
    validator::validate_pipeline(&config)?;
    Ok(config)
}

/// Wire the SQLite adapters and the Gemini client from a validated config.
pub fn wire_collaborators(config: &PipelineConfig) -> Result<Collaborators> {
    let source = SqliteSource::open(
        Path::new(&config.source.connection),
        config.source.table.clone(),
        config.source.id_column.clone(),
    )
    .context("Failed to open source database")?
    .with_filter(config.source.filter.clone());

    let sink = SqliteSink::open(
        Path::new(&config.destination.connection),
        &config.destination.table,
    )
    .context("Failed to open destination database")?;

    let model = GeminiClient::new(GeminiConfig {
        model: config.enrichment.model.clone(),
        location: config.enrichment.location.clone(),
        api_key: config.enrichment.api_key.clone(),
        endpoint: config.enrichment.endpoint.clone(),
        theme_count: config.enrichment.theme_count,
        temperature: config.enrichment.temperature,
        max_output_tokens: config.enrichment.max_output_tokens,
        timeout: Duration::from_secs(config.resources.request_timeout_secs),
    })
    .context("Failed to build Gemini client")?;

    Ok(Collaborators {
        source: Arc::new(source),
        model: Arc::new(model),
        sink: Arc::new(sink),
    })
}
