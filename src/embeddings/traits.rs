// Embedding space trait — the capability the neighborhood analysis consumes.
//
// Training and alignment of the spaces happen elsewhere. The analysis only
// needs vector lookup and nearest-neighbor queries, so an in-memory space
// with a handful of vectors is enough to test it.

use thiserror::Error;

/// A neighbor and its similarity (or distance) to the query.
pub type Neighbor = (String, f64);

#[derive(Debug, Error, PartialEq)]
pub enum EmbeddingError {
    /// The word has no vector in this space.
    #[error("'{0}' not found in the embedding space vocabulary")]
    NotFound(String),
    /// A query vector of the wrong length.
    #[error("vector has {got} dimensions, space has {expected}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Read-only word vector space.
pub trait EmbeddingSpace: Send + Sync {
    /// Vector dimensionality.
    fn dim(&self) -> usize;

    /// The word's vector.
    fn vector_of(&self, word: &str) -> Result<Vec<f64>, EmbeddingError>;

    /// The `k` words most cosine-similar to `vector`, most similar first.
    fn neighbors_by_vector(&self, vector: &[f64], k: usize) -> Result<Vec<Neighbor>, EmbeddingError>;

    /// The `k` words most cosine-similar to `word`, excluding `word` itself.
    fn neighbors_by_word(&self, word: &str, k: usize) -> Result<Vec<Neighbor>, EmbeddingError> {
        let vector = self.vector_of(word)?;
        let mut neighbors = self.neighbors_by_vector(&vector, k.saturating_add(1))?;
        neighbors.retain(|(w, _)| w != word);
        neighbors.truncate(k);
        Ok(neighbors)
    }

    /// Euclidean distance from `vector` to every word in the space, in the
    /// space's own word order.
    fn distances_from(&self, vector: &[f64]) -> Result<Vec<Neighbor>, EmbeddingError>;
}
