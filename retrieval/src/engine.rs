//! Search engine implementation.

use tracing::{debug, info, warn};

use semsearch_catalog::{Product, ProductCatalog};
use semsearch_embeddings::{
    BatchIndexer, EmbeddingError, EmbeddingProvider, IndexDocument, ReconcileReport, VectorCache,
    similarity,
};

use crate::config::SearchConfig;
use crate::error::Result;

/// A ranked product joined back to its dataset record.
#[derive(Debug, Clone)]
pub struct ProductMatch {
    /// The matched product.
    pub product: Product,

    /// Cosine similarity against the query.
    pub score: f32,
}

/// Composes the catalog, the vector cache, and the embedding provider.
///
/// The engine owns the cache exclusively for the duration of a run: one
/// writer, one reader, one process.
#[derive(Debug)]
pub struct SearchEngine<P> {
    config: SearchConfig,
    catalog: ProductCatalog,
    cache: VectorCache,
    provider: P,
}

impl<P: EmbeddingProvider> SearchEngine<P> {
    /// Load the dataset and the persisted cache.
    ///
    /// Fails if the dataset is missing, the cache file is corrupt or
    /// incompatible, or the provider's output dimensionality does not
    /// match the configured one.
    pub async fn new(config: SearchConfig, provider: P) -> Result<Self> {
        if provider.dimension() != config.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: config.dimensions,
                actual: provider.dimension(),
            }
            .into());
        }

        let catalog = ProductCatalog::load(&config.dataset_path)?;
        let cache = VectorCache::load(&config.cache_path, &config.model, config.dimensions).await?;

        info!(
            "engine ready: {} products, {} cached embeddings",
            catalog.len(),
            cache.len()
        );

        Ok(Self {
            config,
            catalog,
            cache,
            provider,
        })
    }

    /// Bring the cache up to date with the dataset.
    ///
    /// Only products without a cached vector are embedded; a fully
    /// populated cache makes this a no-op with zero provider calls.
    pub async fn reconcile(&mut self) -> Result<ReconcileReport> {
        let docs: Vec<IndexDocument> = self
            .catalog
            .products()
            .iter()
            .map(|p| IndexDocument {
                id: p.asin.clone(),
                text: p.embedding_text(),
            })
            .collect();

        let indexer = BatchIndexer::new(
            self.config.batch_size,
            self.config.min_request_interval(),
            &self.config.task_type_document,
        );
        let report = indexer
            .reconcile(&docs, &mut self.cache, &self.provider)
            .await?;
        Ok(report)
    }

    /// Embed `query_text` and return the top matches from the cache.
    ///
    /// Ranked ids without a dataset record are logged and skipped; a
    /// stale cache entry must not kill the whole query.
    pub async fn search(&self, query_text: &str) -> Result<Vec<ProductMatch>> {
        // A single query call needs no inter-request throttling.
        let query_texts = [query_text.to_string()];
        let mut vectors = self
            .provider
            .embed_batch(&query_texts, &self.config.task_type_query)
            .await?;
        if vectors.len() != 1 {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected 1 query embedding, got {}",
                vectors.len()
            ))
            .into());
        }
        let query = vectors.remove(0);

        let results = similarity::rank(
            &query,
            &self.cache,
            self.config.top_k,
            self.config.min_similarity,
        )?;
        debug!("{} results above threshold", results.len());

        let mut matches = Vec::with_capacity(results.len());
        for result in results {
            match self.catalog.get(&result.id) {
                Some(product) => matches.push(ProductMatch {
                    product: product.clone(),
                    score: result.score,
                }),
                None => warn!(
                    "cached embedding {} has no dataset record, skipping",
                    result.id
                ),
            }
        }
        Ok(matches)
    }

    /// The active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The loaded catalog.
    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// The vector cache.
    pub fn cache(&self) -> &VectorCache {
        &self.cache
    }
}
