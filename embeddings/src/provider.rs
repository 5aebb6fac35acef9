//! Embedding providers.
//!
//! The rest of the crate only sees [`EmbeddingProvider`]: a batch of input
//! strings goes in, one plain `Vec<f32>` per input comes out, in input
//! order. Provider wire types (the Gemini API wraps each vector in a
//! `values` object) are normalized away at this boundary and never reach
//! the cache or the ranker.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Trait for batch text-embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Output dimensionality of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// Generate one embedding per input text, in input order.
    ///
    /// `task_type` is an opaque hint the provider may use to tune
    /// retrieval behavior (document-side vs query-side embeddings).
    async fn embed_batch(&self, texts: &[String], task_type: &str) -> Result<Vec<Embedding>>;
}

/// Gemini embedding provider.
pub struct GeminiProvider {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Model name.
    model: String,

    /// Requested output dimensionality.
    dimension: usize,
}

impl GeminiProvider {
    /// Create a new Gemini provider, reading the key from `GEMINI_API_KEY`.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            client: reqwest::Client::new(),
            model: "gemini-embedding-001".to_string(),
            dimension: crate::DEFAULT_DIMENSION,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the output dimensionality.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Check if the provider is usable (API key present).
    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String], task_type: &str) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let api_key = self
            .api_key
            .as_ref()
            .ok_or(EmbeddingError::ProviderNotConfigured)?;

        debug!(
            "embedding {} texts with model {} ({task_type})",
            texts.len(),
            self.model
        );

        let model_path = format!("models/{}", self.model);
        let requests: Vec<EmbedContentRequest> = texts
            .iter()
            .map(|text| EmbedContentRequest {
                model: model_path.clone(),
                content: Content {
                    parts: vec![Part { text: text.clone() }],
                },
                task_type: task_type.to_string(),
                output_dimensionality: self.dimension,
            })
            .collect();

        let response = self
            .client
            .post(format!(
                "{}/{model_path}:batchEmbedContents",
                self.base_url
            ))
            .header("x-goog-api-key", api_key)
            .json(&BatchEmbedRequest { requests })
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(EmbeddingError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiRequest(format!("{status}: {error_text}")));
        }

        let result: BatchEmbedResponse = response.json().await?;

        if result.embeddings.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                result.embeddings.len()
            )));
        }

        let mut vectors = Vec::with_capacity(result.embeddings.len());
        for item in result.embeddings {
            if item.values.len() != self.dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimension,
                    actual: item.values.len(),
                });
            }
            vectors.push(item.values);
        }

        info!("generated {} embeddings", vectors.len());
        Ok(vectors)
    }
}

/// Gemini batch request format.
#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest {
    model: String,
    content: Content,
    task_type: String,
    output_dimensionality: usize,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

/// Gemini batch response format.
#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}
