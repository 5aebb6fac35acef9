//! # Embeddings
//!
//! This crate is the core of the semantic product search system: it turns
//! text into dense vectors, keeps those vectors in a persistent cache, and
//! ranks cached vectors against a query by cosine similarity.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Embedding Subsystem                     │
//! ├────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► BatchIndexer ──► VectorCache        │
//! │       │                                     │              │
//! │       ▼                                     ▼              │
//! │  Gemini API                         similarity::rank       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `BatchIndexer` reconciles the cache against a source dataset: items
//! without a cached vector are embedded in fixed-size batches under a
//! minimum inter-request interval, and each batch is flushed to disk before
//! the next provider call so a crash loses at most the in-flight batch.

pub mod cache;
pub mod error;
pub mod indexer;
pub mod provider;
pub mod similarity;

pub use cache::VectorCache;
pub use error::{EmbeddingError, Result};
pub use indexer::{BatchIndexer, IndexDocument, ReconcileReport};
pub use provider::{EmbeddingProvider, GeminiProvider};
pub use similarity::{SimilarityResult, cosine_similarity, rank};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Default output dimensionality (gemini-embedding-001, truncated output).
pub const DEFAULT_DIMENSION: usize = 1536;
