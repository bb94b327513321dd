//! Bounded-concurrency batch translation.
//!
//! A batch is split into fixed-size chunks. Every item in a chunk is
//! dispatched at once and the chunk is awaited as a barrier before the next
//! one starts, so at most `chunk_size` provider calls are in flight. Items
//! carry their original index through completion and the final list is
//! sorted by it. A failing item is recorded in its own result and never
//! aborts its siblings.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    dialect::Dialect,
    error::ProviderError,
    language::Direction,
    translation::Translator,
    validation::BatchJob,
};

/// Provider calls in flight per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 5;
/// Pause between consecutive chunks.
pub const DEFAULT_CHUNK_PAUSE: Duration = Duration::from_millis(100);
/// Ceiling on a single item's provider call.
pub const DEFAULT_ITEM_TIMEOUT: Duration = Duration::from_secs(30);

/// Tuning for [`BatchOrchestrator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettings {
    /// Upper bound on concurrently in-flight provider calls.
    pub chunk_size: usize,
    /// Pause between chunks; not applied after the last one.
    pub chunk_pause: Duration,
    /// Per-item ceiling; a hung provider call fails only its own item.
    pub item_timeout: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_pause: DEFAULT_CHUNK_PAUSE,
            item_timeout: DEFAULT_ITEM_TIMEOUT,
        }
    }
}

/// Outcome of one batch item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItemResult {
    /// Position in the submitted `texts` array.
    pub index: usize,
    /// Input after trimming.
    pub original_text: String,
    /// Present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    /// Whether the item translated.
    pub success: bool,
    /// Provider failure, present when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItemResult {
    fn succeeded(index: usize, original_text: &str, translated: String) -> Self {
        Self {
            index,
            original_text: original_text.to_string(),
            translated_text: Some(translated),
            success: true,
            error: None,
        }
    }

    fn failed(index: usize, original_text: &str, error: &ProviderError) -> Self {
        Self {
            index,
            original_text: original_text.to_string(),
            translated_text: None,
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Aggregate result of [`BatchOrchestrator::run`].
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Ordered by `index`, ascending.
    pub results: Vec<BatchItemResult>,
    /// Items submitted.
    pub total_count: usize,
    /// Items that translated.
    pub success_count: usize,
    /// Items that failed.
    pub error_count: usize,
    /// Wall-clock time across all chunks.
    pub elapsed: Duration,
}

/// Runs a [`BatchJob`] in chunks against a [`Translator`].
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    translator: Arc<dyn Translator>,
    settings: BatchSettings,
}

impl BatchOrchestrator {
    /// Orchestrator over `translator` with `settings`.
    pub fn new(translator: Arc<dyn Translator>, settings: BatchSettings) -> Self {
        Self {
            translator,
            settings,
        }
    }

    /// Settings in effect.
    pub fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    /// Translate every item. Never fails as a whole; failures are per item.
    pub async fn run(&self, job: &BatchJob) -> BatchOutcome {
        let started = Instant::now();
        let chunk_size = self.settings.chunk_size.max(1);
        let total_count = job.texts.len();
        let chunk_count = total_count.div_ceil(chunk_size);
        let mut results = Vec::with_capacity(total_count);

        for (chunk_index, chunk) in job.texts.chunks(chunk_size).enumerate() {
            let offset = chunk_index * chunk_size;
            debug!(
                chunk = chunk_index + 1,
                chunks = chunk_count,
                items = chunk.len(),
                "dispatching batch chunk"
            );

            let calls = chunk.iter().enumerate().map(|(position, text)| {
                self.translate_item(
                    offset + position,
                    text,
                    job.direction,
                    job.dialect,
                )
            });
            results.extend(join_all(calls).await);

            if chunk_index + 1 < chunk_count {
                tokio::time::sleep(self.settings.chunk_pause).await;
            }
        }

        // Completion order inside and across chunks is not submission order.
        results.sort_by_key(|result| result.index);

        let success_count = results.iter().filter(|result| result.success).count();
        let outcome = BatchOutcome {
            total_count,
            success_count,
            error_count: total_count - success_count,
            elapsed: started.elapsed(),
            results,
        };

        info!(
            dialect = job.dialect.code,
            total = outcome.total_count,
            succeeded = outcome.success_count,
            failed = outcome.error_count,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "batch translation finished"
        );
        outcome
    }

    async fn translate_item(
        &self,
        index: usize,
        text: &str,
        direction: Direction,
        dialect: &'static Dialect,
    ) -> BatchItemResult {
        let call = self.translator.translate(text, direction, dialect);
        let outcome = match tokio::time::timeout(self.settings.item_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.settings.item_timeout)),
        };

        match outcome {
            Ok(translated) => BatchItemResult::succeeded(index, text, translated),
            Err(err) => {
                warn!(index, dialect = dialect.code, error = %err, "batch item failed");
                BatchItemResult::failed(index, text, &err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dialect::DialectCatalog, translation::UnconfiguredTranslator};

    #[test]
    fn item_results_serialize_without_absent_fields() {
        let ok = BatchItemResult::succeeded(0, "a", "b".into());
        let value = serde_json::to_value(&ok).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "index": 0,
                "original_text": "a",
                "translated_text": "b",
                "success": true,
            })
        );

        let failed = BatchItemResult::failed(1, "c", &ProviderError::NotConfigured);
        let value = serde_json::to_value(&failed).expect("serialize");
        assert!(value.get("translated_text").is_none());
        assert_eq!(value["error"], "translation provider is not configured");
    }

    #[tokio::test]
    async fn unconfigured_provider_fails_every_item_without_aborting() {
        let orchestrator = BatchOrchestrator::new(
            Arc::new(UnconfiguredTranslator),
            BatchSettings {
                chunk_pause: Duration::ZERO,
                ..BatchSettings::default()
            },
        );
        let job = BatchJob {
            texts: vec!["a".into(), "b".into(), "c".into()],
            direction: Direction::TO_DIALECT,
            dialect: DialectCatalog::standard().get("osaka").expect("osaka"),
        };

        let outcome = orchestrator.run(&job).await;
        assert_eq!(outcome.total_count, 3);
        assert_eq!(outcome.error_count, 3);
        assert!(outcome.results.iter().all(|result| !result.success));
    }
}
