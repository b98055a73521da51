//! Serde model for the pipeline YAML file.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_version")]
    pub version: String,
    pub pipeline: String,
    pub source: SourceConfig,
    pub enrichment: EnrichmentConfig,
    pub destination: DestinationConfig,
    #[serde(default)]
    pub resources: ResourceConfig,
}

/// Identity of the source table to paginate over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path or DSN of the source database.
    pub connection: String,
    pub table: String,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// Optional SQL predicate restricting which rows the run sees.
    /// Applied identically to the count and page queries.
    #[serde(default)]
    pub filter: Option<String>,
}

/// Identity and tuning of the enrichment model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_location")]
    pub location: String,
    /// API key; usually `${GEMINI_API_KEY}` substituted at parse time.
    pub api_key: String,
    /// Explicit endpoint override (tests, proxies). Derived from
    /// `location` when absent.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Number of themes the prompt asks for per record.
    #[serde(default = "default_theme_count")]
    pub theme_count: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

/// Identity of the destination table for committed themes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Path or DSN of the destination database.
    pub connection: String,
    pub table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Records per window.
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,
    /// Maximum concurrently processed windows.
    #[serde(default = "default_max_parallelism")]
    pub max_parallelism: u32,
    /// Maximum concurrent model calls within one window.
    #[serde(default = "default_max_inflight_requests")]
    pub max_inflight_requests: u32,
    /// Per-record model call timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_version() -> String {
    "1.0".to_string()
}
fn default_id_column() -> String {
    "id".to_string()
}
fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_location() -> String {
    "asia-northeast1".to_string()
}
fn default_theme_count() -> u32 {
    6
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_output_tokens() -> u32 {
    1024
}
fn default_batch_size() -> u64 {
    100
}
fn default_max_parallelism() -> u32 {
    50
}
fn default_max_inflight_requests() -> u32 {
    16
}
fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_parallelism: default_max_parallelism(),
            max_inflight_requests: default_max_inflight_requests(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_minimal_pipeline() {
        let yaml = r#"
pipeline: article_themes

source:
  connection: ./data/articles.db
  table: articles

enrichment:
  api_key: test-key

destination:
  connection: ./data/themes.db
  table: article_themes
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.pipeline, "article_themes");
        assert_eq!(config.version, "1.0");
        assert_eq!(config.source.table, "articles");
        assert_eq!(config.source.id_column, "id");
        // Defaults applied
        assert_eq!(config.enrichment.model, "gemini-1.5-flash");
        assert_eq!(config.enrichment.location, "asia-northeast1");
        assert_eq!(config.enrichment.theme_count, 6);
        assert_eq!(config.resources.batch_size, 100);
        assert_eq!(config.resources.max_parallelism, 50);
        assert_eq!(config.resources.max_inflight_requests, 16);
        assert_eq!(config.resources.request_timeout_secs, 30);
    }

    #[test]
    fn deserialize_full_pipeline() {
        let yaml = r#"
version: "1.0"
pipeline: backfill

source:
  connection: src.db
  table: articles
  id_column: article_id

enrichment:
  model: gemini-1.5-pro
  location: us-central1
  api_key: k
  theme_count: 4
  temperature: 0.2
  max_output_tokens: 512

destination:
  connection: dst.db
  table: themes

resources:
  batch_size: 250
  max_parallelism: 8
  max_inflight_requests: 32
  request_timeout_secs: 10
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.source.id_column, "article_id");
        assert_eq!(config.enrichment.model, "gemini-1.5-pro");
        assert_eq!(config.enrichment.theme_count, 4);
        assert_eq!(config.resources.batch_size, 250);
        assert_eq!(config.resources.max_parallelism, 8);
        assert_eq!(config.resources.max_inflight_requests, 32);
        assert_eq!(config.resources.request_timeout_secs, 10);
    }

    #[test]
    fn missing_required_section_fails() {
        let yaml = r#"
pipeline: nope
source:
  connection: a.db
  table: t
enrichment:
  api_key: k
"#;
        let result: Result<PipelineConfig, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }
}
