//! Persistent vector cache keyed by item id.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// On-disk representation of the cache.
///
/// The header records which model produced the vectors and at what
/// dimensionality, so a load against a different configuration fails
/// instead of silently mixing incompatible vector spaces.
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    model: String,
    dimension: usize,
    vectors: HashMap<String, Embedding>,
}

#[derive(Serialize)]
struct CacheFileRef<'a> {
    model: &'a str,
    dimension: usize,
    vectors: &'a HashMap<String, Embedding>,
}

/// Persistent mapping from item id to embedding vector.
///
/// The whole map lives in memory for the life of a run. `insert` is
/// memory-only; `flush` writes the complete map back atomically. Callers
/// that need a durable point update use `put`, callers doing batch work
/// insert per item and flush once per batch. Every flush rewrites the
/// whole file, which is O(cache size) per write — fine for the dataset
/// sizes this system targets (thousands of items, not millions).
#[derive(Debug)]
pub struct VectorCache {
    path: PathBuf,
    model: String,
    dimension: usize,
    vectors: HashMap<String, Embedding>,
}

impl VectorCache {
    /// Load the cache at `path`, or start empty if no file exists yet.
    ///
    /// A missing file is the cold-start state, not an error. An unreadable
    /// or malformed file, or one written for a different model or
    /// dimension, fails with [`EmbeddingError::CacheCorrupt`]: a corrupt
    /// cache is something the operator must see, not something to repair
    /// or silently replace.
    pub async fn load(
        path: impl AsRef<Path>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let model = model.into();

        if !fs::try_exists(&path).await? {
            info!("no vector cache at {}, starting cold", path.display());
            return Ok(Self {
                path,
                model,
                dimension,
                vectors: HashMap::new(),
            });
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| EmbeddingError::CacheCorrupt(format!("{}: {e}", path.display())))?;

        let file: CacheFile = serde_json::from_str(&content)
            .map_err(|e| EmbeddingError::CacheCorrupt(format!("{}: {e}", path.display())))?;

        if file.model != model || file.dimension != dimension {
            return Err(EmbeddingError::CacheCorrupt(format!(
                "{} was written for model {} ({} dims), configured for {model} ({dimension} dims); \
                 delete the cache file to re-embed",
                path.display(),
                file.model,
                file.dimension,
            )));
        }

        for (id, vector) in &file.vectors {
            if vector.len() != dimension {
                return Err(EmbeddingError::CacheCorrupt(format!(
                    "{}: entry {id} has {} dims, expected {dimension}",
                    path.display(),
                    vector.len(),
                )));
            }
        }

        info!(
            "loaded {} cached embeddings from {}",
            file.vectors.len(),
            path.display()
        );

        Ok(Self {
            path,
            model,
            dimension,
            vectors: file.vectors,
        })
    }

    /// Insert or overwrite an entry in memory. Not durable until `flush`.
    pub fn insert(&mut self, id: impl Into<String>, vector: Embedding) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        self.vectors.insert(id.into(), vector);
        Ok(())
    }

    /// Write the complete map back to disk atomically.
    ///
    /// The file is written to a temp path and renamed into place, so a
    /// flush either fully succeeds or leaves the previous file intact —
    /// never a partial overwrite.
    pub async fn flush(&self) -> Result<()> {
        let content = serde_json::to_string(&CacheFileRef {
            model: &self.model,
            dimension: self.dimension,
            vectors: &self.vectors,
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!(
            "flushed {} embeddings to {}",
            self.vectors.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Durable point update: insert and immediately persist.
    pub async fn put(&mut self, id: impl Into<String>, vector: Embedding) -> Result<()> {
        self.insert(id, vector)?;
        self.flush().await
    }

    /// Check whether an id has a cached vector.
    pub fn contains(&self, id: &str) -> bool {
        self.vectors.contains_key(id)
    }

    /// Get the cached vector for an id.
    pub fn get(&self, id: &str) -> Option<&Embedding> {
        self.vectors.get(id)
    }

    /// Iterate over all cached entries. No ordering guarantee.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Embedding)> {
        self.vectors.iter()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimensionality every cached vector must have.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Model the cache was built for.
    pub fn model(&self) -> &str {
        &self.model
    }
}
