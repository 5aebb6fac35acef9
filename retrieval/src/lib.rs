//! # Retrieval
//!
//! The orchestration layer of the semantic product search system:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       SearchEngine                         │
//! ├────────────────────────────────────────────────────────────┤
//! │  ProductCatalog ──► BatchIndexer ──► VectorCache           │
//! │        │                                  │                │
//! │        │          query embedding         ▼                │
//! │        └───────────── join ◄─────── similarity::rank       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! A run reconciles the cache against the dataset, embeds one free-text
//! query, ranks every cached vector against it, and joins the surviving
//! ids back to their dataset records for display.

pub mod config;
pub mod engine;
pub mod error;

pub use config::SearchConfig;
pub use engine::{ProductMatch, SearchEngine};
pub use error::{Result, SearchError};

// Re-export from dependencies for convenience
pub use semsearch_catalog::{Product, ProductCatalog};
pub use semsearch_embeddings::{EmbeddingProvider, GeminiProvider, ReconcileReport};
