//! Similarity computation and top-K ranking.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::cache::VectorCache;
use crate::error::{EmbeddingError, Result};

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors
/// - -1.0 means opposite direction
///
/// A zero vector is defined as maximally dissimilar to everything,
/// including another zero vector: whenever either norm is exactly zero
/// the result is 0.0, never a division by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (magnitude_a * magnitude_b))
}

/// A similarity search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// ID of the matched item.
    pub id: String,

    /// Cosine similarity against the query.
    pub score: f32,
}

impl SimilarityResult {
    /// Create a new similarity result.
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Rank every cached vector against `query` and return the top `top_k`.
///
/// Entries scoring below `min_similarity` are dropped. Results are sorted
/// by score descending; exact ties are broken by ascending id, so the
/// ordering is stable across runs regardless of cache iteration order.
///
/// This is an O(N·D) brute-force scan per query. At the corpus sizes this
/// system targets that beats maintaining an index.
pub fn rank(
    query: &[f32],
    cache: &VectorCache,
    top_k: usize,
    min_similarity: f32,
) -> Result<Vec<SimilarityResult>> {
    let mut scored: Vec<(OrderedFloat<f32>, &str)> = Vec::with_capacity(cache.len());

    for (id, vector) in cache.iter() {
        let score = cosine_similarity(query, vector)?;
        if score >= min_similarity {
            scored.push((OrderedFloat(score), id.as_str()));
        }
    }

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

    Ok(scored
        .into_iter()
        .take(top_k)
        .map(|(score, id)| SimilarityResult::new(id, score.0))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn cache_with(entries: &[(&str, Vec<f32>)], dimension: usize) -> VectorCache {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = VectorCache::load(dir.path().join("c.json"), "test-model", dimension)
            .await
            .unwrap();
        for (id, vector) in entries {
            cache.insert(*id, vector.clone()).unwrap();
        }
        cache
    }

    #[test]
    fn cosine_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &a).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_is_symmetric_and_bounded() {
        let a = vec![0.3, -0.8, 0.5];
        let b = vec![-0.1, 0.9, 0.4];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert_eq!(ab, ba);
        assert!((-1.0..=1.0).contains(&ab));
    }

    #[test]
    fn zero_vector_scores_zero() {
        let zero = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &b).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&b, &zero).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero).unwrap(), 0.0);
    }

    #[test]
    fn cosine_dimension_mismatch() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!(cosine_similarity(&a, &b).is_err());
    }

    #[tokio::test]
    async fn rank_orders_by_score_descending() {
        let cache = cache_with(
            &[
                ("far", vec![0.0, 1.0]),
                ("near", vec![1.0, 0.0]),
                ("mid", vec![0.7, 0.7]),
            ],
            2,
        )
        .await;

        let results = rank(&[1.0, 0.0], &cache, 3, -1.0).unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn rank_filters_below_threshold() {
        let cache = cache_with(&[("near", vec![1.0, 0.0]), ("far", vec![-1.0, 0.0])], 2).await;

        let results = rank(&[1.0, 0.0], &cache, 10, 0.5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "near");
        assert!(results.iter().all(|r| r.score >= 0.5));
    }

    #[tokio::test]
    async fn rank_respects_top_k() {
        let cache = cache_with(
            &[
                ("a", vec![1.0, 0.0]),
                ("b", vec![0.9, 0.1]),
                ("c", vec![0.8, 0.2]),
            ],
            2,
        )
        .await;

        let results = rank(&[1.0, 0.0], &cache, 2, 0.0).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn rank_breaks_ties_by_ascending_id() {
        // A and C are identical to the query; B is orthogonal.
        let cache = cache_with(
            &[
                ("C", vec![1.0, 0.0]),
                ("A", vec![1.0, 0.0]),
                ("B", vec![0.0, 1.0]),
            ],
            2,
        )
        .await;

        let results = rank(&[1.0, 0.0], &cache, 3, 0.0).unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C", "B"]);
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert!((results[1].score - 1.0).abs() < 1e-6);
        assert!(results[2].score.abs() < 1e-6);
    }

    #[tokio::test]
    async fn rank_on_empty_cache_is_empty() {
        let cache = cache_with(&[], 2).await;
        let results = rank(&[1.0, 0.0], &cache, 5, 0.0).unwrap();
        assert!(results.is_empty());
    }
}
