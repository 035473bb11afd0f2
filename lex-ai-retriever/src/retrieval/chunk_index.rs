//! The immutable chunk index: ordered chunk texts, their embedding matrix,
//! and ranked nearest-neighbor search under cosine distance.

use crate::error::{Result, RetrievalError};
use half::f16;
use lex_ai_embed::EmbeddingProvider;
use std::sync::Arc;
use tracing::{debug, info};

/// Default neighbor count when the caller does not request a specific `k`.
pub const DEFAULT_K: usize = 3;

/// One ranked search hit.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// Position of the chunk in the original corpus order
    pub index: usize,
    /// Cosine distance (1 − cosine similarity) to the query; smaller is closer
    pub distance: f32,
    /// The chunk text, verbatim
    pub text: String,
}

impl ScoredChunk {
    /// Cosine similarity to the query (1 − distance), for display.
    pub fn similarity(&self) -> f32 {
        1.0 - self.distance
    }
}

/// A built, read-only retrieval index over a chunked corpus.
///
/// The index owns the ordered chunk texts, the parallel embedding matrix
/// (`embeddings[i]` is the vector of `chunks[i]` — positional correspondence
/// is the core correctness invariant), and the embedding provider that
/// produced the matrix. Binding the provider into the index guarantees
/// queries are embedded in the same semantic space as the corpus.
///
/// Once built the index is never mutated, so it is safe to share behind an
/// `Arc` and search from any number of tasks concurrently.
pub struct ChunkIndex {
    chunks: Vec<String>,
    embeddings: Vec<Vec<f16>>,
    provider: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for ChunkIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkIndex")
            .field("chunks", &self.chunks.len())
            .field("dimension", &self.dimension())
            .field("provider", &self.provider.provider_name())
            .finish()
    }
}

impl ChunkIndex {
    /// Embed every chunk and build the searchable index.
    ///
    /// Fails with [`RetrievalError::IndexBuildFailed`] when given zero
    /// chunks (a neighbor search over an empty matrix has no defined
    /// behavior) or when the provider does not return exactly one vector
    /// per chunk.
    pub async fn build(
        chunks: Vec<String>,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        if chunks.is_empty() {
            return Err(RetrievalError::IndexBuildFailed {
                reason: "cannot build an index over zero chunks".to_string(),
            });
        }

        info!("Embedding {} chunks for the index", chunks.len());
        let result = provider
            .embed_texts(&chunks)
            .await
            .map_err(|source| RetrievalError::Embedding { source })?;

        if result.len() != chunks.len() {
            return Err(RetrievalError::IndexBuildFailed {
                reason: format!(
                    "provider returned {} vectors for {} chunks",
                    result.len(),
                    chunks.len()
                ),
            });
        }

        info!(
            "Index built: {} chunks, dimension {}",
            chunks.len(),
            result.dimension
        );

        Ok(Self {
            chunks,
            embeddings: result.embeddings,
            provider,
        })
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Always false for a successfully built index; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Dimension of the embedding vectors.
    pub fn dimension(&self) -> usize {
        self.embeddings.first().map(|e| e.len()).unwrap_or(0)
    }

    /// Name of the embedding provider bound to this index.
    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Return the `k` chunk texts nearest to `query`, most similar first.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<String>> {
        Ok(self
            .search_scored(query, k)
            .await?
            .into_iter()
            .map(|hit| hit.text)
            .collect())
    }

    /// Ranked nearest-neighbor search with distances.
    ///
    /// Embeds the query with the provider bound at build time, scores every
    /// chunk by cosine distance, and returns the `k` closest in ascending
    /// distance order. Ties keep original corpus order (the sort is stable
    /// and compares distance only). `k` larger than the corpus is clamped to
    /// the chunk count ("return everything, ranked"); `k == 0` is rejected
    /// with [`RetrievalError::InvalidK`].
    pub async fn search_scored(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(RetrievalError::InvalidK { k });
        }

        let query_vec = self
            .provider
            .embed_text(query)
            .await
            .map_err(|source| RetrievalError::Embedding { source })?;

        let mut scored: Vec<(f32, usize)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(index, embedding)| (cosine_distance(&query_vec, embedding), index))
            .collect();

        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k.min(self.chunks.len()));

        debug!(
            "Query scored against {} chunks, returning {}",
            self.chunks.len(),
            scored.len()
        );

        Ok(scored
            .into_iter()
            .map(|(distance, index)| ScoredChunk {
                index,
                distance,
                text: self.chunks[index].clone(),
            })
            .collect())
    }
}

/// Cosine similarity between two f16 embedding vectors, in f32 arithmetic.
fn cosine_similarity(a: &[f16], b: &[f16]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot_product = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        let a_f32 = a[i].to_f32();
        let b_f32 = b[i].to_f32();
        dot_product += a_f32 * b_f32;
        norm_a += a_f32 * a_f32;
        norm_b += b_f32 * b_f32;
    }

    let norm_a = norm_a.sqrt();
    let norm_b = norm_b.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// Cosine distance: 1 − cosine similarity. Magnitude carries no meaning for
/// these models; only direction does.
fn cosine_distance(a: &[f16], b: &[f16]) -> f32 {
    1.0 - cosine_similarity(a, b)
}
