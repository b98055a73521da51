//! Gemini HTTP client for theme generation.
//!
//! Talks to the `generateContent` endpoint with API-key auth. Prompt
//! construction lives here too: the engine hands over a raw record and
//! receives raw model text back; payload parsing stays in the engine.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use themegen_types::{ModelError, SourceRecord};

use crate::model::ThemeModel;

/// Connection settings for the Gemini endpoint.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub model: String,
    pub location: String,
    pub api_key: String,
    /// Full base URL override (tests, proxies). Derived from `location`
    /// when `None`.
    pub endpoint: Option<String>,
    pub theme_count: u32,
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            location: "asia-northeast1".to_string(),
            api_key: String::new(),
            endpoint: None,
            theme_count: 6,
            temperature: 0.7,
            max_output_tokens: 1024,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// [`ThemeModel`] implementation backed by the Gemini API.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
    url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .field("location", &self.config.location)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client with a request timeout baked into the HTTP pool.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Request`] if the HTTP client can't be
    /// constructed.
    pub fn new(config: GeminiConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::Request(format!("failed to build HTTP client: {e}")))?;
        let url = request_url(&config);
        Ok(Self {
            client,
            config,
            url,
        })
    }

    /// The resolved `generateContent` URL (without the API key).
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn request_url(config: &GeminiConfig) -> String {
    let base = config.endpoint.clone().unwrap_or_else(|| {
        format!(
            "https://{}-aiplatform.googleapis.com/v1",
            config.location
        )
    });
    format!(
        "{}/publishers/google/models/{}:generateContent",
        base.trim_end_matches('/'),
        config.model
    )
}

/// Render the per-record prompt.
///
/// Asks for exactly `theme_count` theme names as a bare JSON object so
/// the response parser has a fighting chance.
fn build_prompt(record: &SourceRecord, theme_count: u32) -> String {
    let data = serde_json::Value::Object(record.fields.clone());
    format!(
        "Generate {theme_count} theme names for the following data.\n\
         Respond with JSON only, in this exact shape:\n\
         {{\"themes\": [\"theme 1\", \"theme 2\", ...]}}\n\n\
         Data: {data}"
    )
}

#[async_trait]
impl ThemeModel for GeminiClient {
    async fn generate(&self, record: &SourceRecord) -> Result<String, ModelError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(record, self.config.theme_count),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&self.url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Request(format!("failed to decode response: {e}")))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(ModelError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SourceRecord {
        let mut fields = serde_json::Map::new();
        fields.insert("id".into(), serde_json::json!(1));
        fields.insert("title".into(), serde_json::json!("winter gardening"));
        SourceRecord::new("1", fields)
    }

    #[test]
    fn url_derived_from_location_and_model() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: "k".into(),
            ..GeminiConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.url(),
            "https://asia-northeast1-aiplatform.googleapis.com/v1\
             /publishers/google/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn endpoint_override_wins() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: "k".into(),
            endpoint: Some("http://localhost:9999/v1/".into()),
            ..GeminiConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.url(),
            "http://localhost:9999/v1/publishers/google/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn prompt_includes_record_fields_and_count() {
        let prompt = build_prompt(&record(), 6);
        assert!(prompt.contains("Generate 6 theme names"));
        assert!(prompt.contains("winter gardening"));
        assert!(prompt.contains(r#"{"themes""#));
    }

    #[test]
    fn request_serializes_to_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi".into() }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 1024,
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"maxOutputTokens\":1024"));
    }

    #[test]
    fn response_decodes_candidate_text() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"themes\": []}"}]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.candidates.len(), 1);
        assert_eq!(
            response.candidates[0].content.parts[0].text,
            "{\"themes\": []}"
        );
    }

    #[test]
    fn empty_candidates_decode_to_empty_vec() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
    }
}
