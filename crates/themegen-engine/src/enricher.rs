//! Concurrent per-record enrichment within one window.
//!
//! Every record of a window is dispatched through the model with bounded
//! concurrency and an optional per-record timeout. Failures are folded
//! into tagged outcomes by value — nothing here unwinds across the join,
//! and one record's failure never touches another's call.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use themegen_types::{EnrichedRecord, EnrichmentOutcome, FailedRecord, SourceRecord};

use crate::model::ThemeModel;
use crate::payload;

/// Per-window enrichment tuning.
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Maximum concurrent model calls within the window.
    pub max_inflight: usize,
    /// Per-record call timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            max_inflight: 16,
            timeout: None,
        }
    }
}

/// Enrich every record of one window.
///
/// Returns exactly one outcome per input record, in input order — no
/// early exit on failure, no silent drops. Records without an id fail
/// immediately, before any model call.
pub async fn enrich_window(
    records: Vec<SourceRecord>,
    model: Arc<dyn ThemeModel>,
    options: &EnrichOptions,
) -> Vec<EnrichmentOutcome> {
    let timeout = options.timeout;
    stream::iter(records)
        .map(|record| {
            let model = Arc::clone(&model);
            async move { enrich_one(record, model, timeout).await }
        })
        .buffered(options.max_inflight.max(1))
        .collect()
        .await
}

async fn enrich_one(
    record: SourceRecord,
    model: Arc<dyn ThemeModel>,
    timeout: Option<Duration>,
) -> EnrichmentOutcome {
    let Some(id) = record.id.clone() else {
        tracing::warn!("Skipping enrichment for record without id");
        return EnrichmentOutcome::Failure(FailedRecord {
            id: None,
            cause: "record has no id".to_string(),
        });
    };

    let call = model.generate(&record);
    let raw = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(id = %id, timeout_secs = limit.as_secs_f64(), "Model call timed out");
                return EnrichmentOutcome::Failure(FailedRecord {
                    id: Some(id),
                    cause: format!("model call timed out after {}s", limit.as_secs()),
                });
            }
        },
        None => call.await,
    };

    match raw {
        Ok(text) => match payload::parse_themes(&text) {
            Ok(themes) => EnrichmentOutcome::Success(EnrichedRecord { id, themes }),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Model output failed shape validation");
                EnrichmentOutcome::Failure(FailedRecord {
                    id: Some(id),
                    cause: format!("malformed payload: {e}"),
                })
            }
        },
        Err(e) => {
            tracing::warn!(id = %id, error = %e, "Enrichment call failed");
            EnrichmentOutcome::Failure(FailedRecord {
                id: Some(id),
                cause: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use themegen_types::ModelError;

    /// Succeeds with a fixed payload except for configured ids.
    struct ScriptedModel {
        fail_ids: HashSet<String>,
        delay: Option<Duration>,
    }

    impl ScriptedModel {
        fn ok() -> Self {
            Self {
                fail_ids: HashSet::new(),
                delay: None,
            }
        }

        fn failing(ids: &[&str]) -> Self {
            Self {
                fail_ids: ids.iter().map(|s| (*s).to_string()).collect(),
                delay: None,
            }
        }
    }

    #[async_trait]
    impl ThemeModel for ScriptedModel {
        async fn generate(&self, record: &SourceRecord) -> Result<String, ModelError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let id = record.id.as_ref().expect("scripted records carry ids");
            if self.fail_ids.contains(id.as_str()) {
                return Err(ModelError::Request("injected failure".into()));
            }
            Ok(format!(r#"{{"themes": ["theme-for-{id}"]}}"#))
        }
    }

    fn record(id: &str) -> SourceRecord {
        let mut fields = serde_json::Map::new();
        fields.insert("title".into(), serde_json::json!("t"));
        SourceRecord::new(id, fields)
    }

    fn idless_record() -> SourceRecord {
        SourceRecord::without_id(serde_json::Map::new())
    }

    #[tokio::test]
    async fn every_record_gets_exactly_one_outcome() {
        let records: Vec<_> = (1..=10).map(|i| record(&i.to_string())).collect();
        let outcomes = enrich_window(
            records,
            Arc::new(ScriptedModel::ok()),
            &EnrichOptions::default(),
        )
        .await;
        assert_eq!(outcomes.len(), 10);
        assert!(outcomes.iter().all(EnrichmentOutcome::is_success));
    }

    #[tokio::test]
    async fn outcomes_preserve_input_order() {
        let records: Vec<_> = (1..=20).map(|i| record(&i.to_string())).collect();
        let outcomes = enrich_window(
            records,
            Arc::new(ScriptedModel::ok()),
            &EnrichOptions {
                max_inflight: 4,
                timeout: None,
            },
        )
        .await;
        let ids: Vec<_> = outcomes
            .iter()
            .map(|o| o.id().unwrap().as_str().to_string())
            .collect();
        let expected: Vec<_> = (1..=20).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn one_failure_never_affects_siblings() {
        let records: Vec<_> = (1..=5).map(|i| record(&i.to_string())).collect();
        let outcomes = enrich_window(
            records,
            Arc::new(ScriptedModel::failing(&["3"])),
            &EnrichOptions::default(),
        )
        .await;
        assert_eq!(outcomes.len(), 5);
        for outcome in &outcomes {
            let id = outcome.id().unwrap().as_str();
            if id == "3" {
                assert!(!outcome.is_success());
            } else {
                assert!(outcome.is_success(), "record {id} should be unaffected");
            }
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_a_failure_not_a_success() {
        struct ProseModel;

        #[async_trait]
        impl ThemeModel for ProseModel {
            async fn generate(&self, _record: &SourceRecord) -> Result<String, ModelError> {
                Ok("I'd be happy to help with themes!".to_string())
            }
        }

        let outcomes = enrich_window(
            vec![record("1")],
            Arc::new(ProseModel),
            &EnrichOptions::default(),
        )
        .await;
        match &outcomes[0] {
            EnrichmentOutcome::Failure(f) => {
                assert!(f.cause.contains("malformed payload"), "got: {}", f.cause);
            }
            EnrichmentOutcome::Success(_) => panic!("prose must not count as success"),
        }
    }

    #[tokio::test]
    async fn record_without_id_fails_before_the_model_is_called() {
        struct PanickingModel;

        #[async_trait]
        impl ThemeModel for PanickingModel {
            async fn generate(&self, _record: &SourceRecord) -> Result<String, ModelError> {
                panic!("model must not be called for id-less records");
            }
        }

        let outcomes = enrich_window(
            vec![idless_record()],
            Arc::new(PanickingModel),
            &EnrichOptions::default(),
        )
        .await;
        match &outcomes[0] {
            EnrichmentOutcome::Failure(f) => {
                assert!(f.id.is_none());
                assert_eq!(f.cause, "record has no id");
            }
            EnrichmentOutcome::Success(_) => panic!("id-less record must fail"),
        }
    }

    #[tokio::test]
    async fn slow_call_times_out_as_failure() {
        let model = ScriptedModel {
            fail_ids: HashSet::new(),
            delay: Some(Duration::from_secs(30)),
        };
        let outcomes = enrich_window(
            vec![record("1")],
            Arc::new(model),
            &EnrichOptions {
                max_inflight: 1,
                timeout: Some(Duration::from_millis(20)),
            },
        )
        .await;
        match &outcomes[0] {
            EnrichmentOutcome::Failure(f) => assert!(f.cause.contains("timed out")),
            EnrichmentOutcome::Success(_) => panic!("slow call must time out"),
        }
    }

    #[tokio::test]
    async fn zero_max_inflight_is_clamped() {
        let outcomes = enrich_window(
            vec![record("1")],
            Arc::new(ScriptedModel::ok()),
            &EnrichOptions {
                max_inflight: 0,
                timeout: None,
            },
        )
        .await;
        assert_eq!(outcomes.len(), 1);
    }
}
