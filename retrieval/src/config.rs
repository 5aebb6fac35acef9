//! Configuration for the search engine.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a search run.
///
/// Everything the original deployment hard-coded lives here, so one value
/// fully describes a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Path to the product dataset CSV.
    pub dataset_path: PathBuf,

    /// Path to the persisted vector cache.
    pub cache_path: PathBuf,

    /// Embedding model name.
    pub model: String,

    /// Output dimensionality of the embedding model.
    pub dimensions: usize,

    /// Maximum number of texts per provider call.
    pub batch_size: usize,

    /// Provider request quota; 0 disables throttling.
    pub requests_per_minute: u64,

    /// Task type tag for indexing-time documents.
    pub task_type_document: String,

    /// Task type tag for query-time lookups.
    pub task_type_query: String,

    /// Maximum number of results per query.
    pub top_k: usize,

    /// Minimum cosine similarity for a result to qualify.
    pub min_similarity: f32,
}

impl SearchConfig {
    /// Create a configuration for the given dataset and cache paths.
    pub fn new(dataset_path: impl Into<PathBuf>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            cache_path: cache_path.into(),
            ..Self::default()
        }
    }

    /// Set the embedding model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the output dimensionality.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the provider request quota.
    pub fn with_requests_per_minute(mut self, requests_per_minute: u64) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }

    /// Set the maximum result count.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the similarity threshold.
    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    /// Floor on spacing between the starts of consecutive provider calls.
    pub fn min_request_interval(&self) -> Duration {
        if self.requests_per_minute == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(60_000 / self.requests_per_minute)
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/product_data.csv"),
            cache_path: PathBuf::from("data/product_embeddings.json"),
            model: "gemini-embedding-001".to_string(),
            dimensions: 1536,
            batch_size: 10,
            requests_per_minute: 100,
            task_type_document: "RETRIEVAL_DOCUMENT".to_string(),
            task_type_query: "RETRIEVAL_QUERY".to_string(),
            top_k: 5,
            min_similarity: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quota_maps_to_interval_floor() {
        let config = SearchConfig::default().with_requests_per_minute(100);
        assert_eq!(config.min_request_interval(), Duration::from_millis(600));

        let config = config.with_requests_per_minute(60);
        assert_eq!(config.min_request_interval(), Duration::from_secs(1));
    }

    #[test]
    fn zero_quota_disables_throttling() {
        let config = SearchConfig::default().with_requests_per_minute(0);
        assert_eq!(config.min_request_interval(), Duration::ZERO);
    }

    #[test]
    fn builders_override_defaults() {
        let config = SearchConfig::new("products.csv", "cache.json")
            .with_model("other-model")
            .with_dimensions(768)
            .with_batch_size(25)
            .with_top_k(3)
            .with_min_similarity(0.4);

        assert_eq!(config.dataset_path, PathBuf::from("products.csv"));
        assert_eq!(config.model, "other-model");
        assert_eq!(config.dimensions, 768);
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.top_k, 3);
        assert_eq!(config.min_similarity, 0.4);
        // Untouched fields keep their defaults.
        assert_eq!(config.task_type_document, "RETRIEVAL_DOCUMENT");
        assert_eq!(config.task_type_query, "RETRIEVAL_QUERY");
    }
}
