//! Cache reconciliation: embed the items the cache is missing.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::cache::VectorCache;
use crate::error::{EmbeddingError, Result};
use crate::provider::EmbeddingProvider;

/// One unit of indexable text, flattened by the caller.
///
/// The indexer does not know where the text came from; building the input
/// string out of source fields is the caller's job.
#[derive(Debug, Clone)]
pub struct IndexDocument {
    /// Unique item id, the cache key.
    pub id: String,

    /// Text to embed.
    pub text: String,
}

/// Outcome of a reconcile pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Items in the source dataset.
    pub total: usize,

    /// Items that had no cached vector and were embedded this run.
    pub missing: usize,

    /// Provider calls made.
    pub batches: usize,
}

/// Brings a [`VectorCache`] up to date with a source dataset.
///
/// Missing items are embedded in consecutive batches of at most
/// `batch_size`, preserving input order. The cache is flushed after every
/// batch, so an interrupted run loses at most the in-flight batch. A
/// minimum interval between the starts of consecutive provider calls
/// throttles request rate against the provider quota — a floor on
/// spacing, not a token bucket.
pub struct BatchIndexer {
    batch_size: usize,
    min_interval: Duration,
    task_type: String,
}

impl BatchIndexer {
    /// Create an indexer. A `batch_size` of 0 is treated as 1.
    pub fn new(batch_size: usize, min_interval: Duration, task_type: impl Into<String>) -> Self {
        Self {
            batch_size: batch_size.max(1),
            min_interval,
            task_type: task_type.into(),
        }
    }

    /// Embed every document missing from `cache`, mutating and persisting
    /// the cache as batches complete.
    ///
    /// Provider failures — including a response whose vector count does
    /// not match the batch size — abort the run; whatever batches already
    /// flushed stay cached, so the next run resumes where this one died.
    pub async fn reconcile(
        &self,
        docs: &[IndexDocument],
        cache: &mut VectorCache,
        provider: &dyn EmbeddingProvider,
    ) -> Result<ReconcileReport> {
        let missing: Vec<&IndexDocument> = docs.iter().filter(|d| !cache.contains(&d.id)).collect();

        if missing.is_empty() {
            info!("all {} items already embedded, nothing to do", docs.len());
            return Ok(ReconcileReport {
                total: docs.len(),
                missing: 0,
                batches: 0,
            });
        }

        let missing_count = missing.len();
        let batch_count = missing_count.div_ceil(self.batch_size);
        info!(
            "{missing_count} of {} items missing embeddings, embedding in {batch_count} batches",
            docs.len()
        );

        for (index, batch) in missing.chunks(self.batch_size).enumerate() {
            let started = Instant::now();

            let texts: Vec<String> = batch.iter().map(|d| d.text.clone()).collect();
            let vectors = provider.embed_batch(&texts, &self.task_type).await?;

            if vectors.len() != batch.len() {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "batch {index}: expected {} embeddings, got {}",
                    batch.len(),
                    vectors.len()
                )));
            }

            for (doc, vector) in batch.iter().zip(vectors) {
                cache.insert(doc.id.clone(), vector)?;
            }
            cache.flush().await?;

            let remaining = missing_count.saturating_sub((index + 1) * self.batch_size);
            info!(
                "embedded batch {index} ({} items), {remaining} items remaining",
                batch.len()
            );

            let elapsed = started.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("throttling {}ms before next request", wait.as_millis());
                sleep(wait).await;
            }
        }

        Ok(ReconcileReport {
            total: docs.len(),
            missing: missing_count,
            batches: batch_count,
        })
    }
}
