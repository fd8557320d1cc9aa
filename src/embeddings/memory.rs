// In-memory embedding space with exhaustive nearest-neighbor search.
//
// Vectors are stored unit-normalized next to the raw ones, so cosine
// similarity is a dot product. Exhaustive search is fine at vocabulary scale
// (a few hundred thousand words) for a batch job.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use super::traits::{EmbeddingError, EmbeddingSpace, Neighbor};

pub struct InMemorySpace {
    dim: usize,
    words: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<Vec<f64>>,
    normalized: Vec<Vec<f64>>,
}

impl InMemorySpace {
    /// Build a space from (word, vector) pairs. All vectors must share one
    /// dimensionality; a repeated word keeps its first vector.
    pub fn from_vectors<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut space = Self {
            dim: 0,
            words: Vec::new(),
            index: HashMap::new(),
            vectors: Vec::new(),
            normalized: Vec::new(),
        };
        for (word, vector) in entries {
            space.insert(word.into(), vector)?;
        }
        Ok(space)
    }

    fn insert(&mut self, word: String, vector: Vec<f64>) -> Result<()> {
        if self.words.is_empty() {
            self.dim = vector.len();
        } else if vector.len() != self.dim {
            anyhow::bail!(
                "Vector for '{}' has {} dimensions, expected {}",
                word,
                vector.len(),
                self.dim
            );
        }
        if self.index.contains_key(&word) {
            return Ok(());
        }
        self.index.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.normalized.push(unit(&vector));
        self.vectors.push(vector);
        Ok(())
    }

    /// Load a model in word2vec text format: a `<count> <dim>` header line,
    /// then one `word v1 ... vd` line per word.
    pub fn load_word2vec_text(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open embedding model {}", path.display()))?;
        let mut lines = BufReader::new(file).lines();

        let header = lines
            .next()
            .context("Embedding model is empty")?
            .context("Failed to read embedding model header")?;
        let mut fields = header.split_whitespace();
        let count: usize = fields
            .next()
            .and_then(|f| f.parse().ok())
            .context("Malformed embedding model header: missing word count")?;
        let dim: usize = fields
            .next()
            .and_then(|f| f.parse().ok())
            .context("Malformed embedding model header: missing dimension")?;

        let mut space = Self::from_vectors(Vec::<(String, Vec<f64>)>::new())?;
        space.dim = dim;

        for (line_no, line) in lines.enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_no + 2))?;
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let vector = fields
                .map(str::parse::<f64>)
                .collect::<std::result::Result<Vec<f64>, _>>()
                .with_context(|| format!("Malformed vector on line {}", line_no + 2))?;
            if vector.len() != dim {
                anyhow::bail!(
                    "Line {} has {} dimensions, header says {}",
                    line_no + 2,
                    vector.len(),
                    dim
                );
            }
            space.insert(word.to_string(), vector)?;
        }

        if space.len() != count {
            debug!(
                header = count,
                loaded = space.len(),
                "Embedding model word count differs from header"
            );
        }
        debug!(words = space.len(), dim, path = %path.display(), "Loaded embedding model");
        Ok(space)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Consume the space, yielding (word, raw vector) in word order.
    pub fn into_entries(self) -> impl Iterator<Item = (String, Vec<f64>)> {
        self.words.into_iter().zip(self.vectors)
    }

    fn check_dim(&self, vector: &[f64]) -> Result<(), EmbeddingError> {
        if vector.len() != self.dim {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dim,
                got: vector.len(),
            });
        }
        Ok(())
    }
}

impl EmbeddingSpace for InMemorySpace {
    fn dim(&self) -> usize {
        self.dim
    }

    fn vector_of(&self, word: &str) -> Result<Vec<f64>, EmbeddingError> {
        self.index
            .get(word)
            .map(|&i| self.vectors[i].clone())
            .ok_or_else(|| EmbeddingError::NotFound(word.to_string()))
    }

    fn neighbors_by_vector(&self, vector: &[f64], k: usize) -> Result<Vec<Neighbor>, EmbeddingError> {
        self.check_dim(vector)?;
        let query = unit(vector);

        let mut scored: Vec<(usize, f64)> = self
            .normalized
            .iter()
            .enumerate()
            .map(|(i, v)| (i, dot(&query, v)))
            .collect();

        // Descending similarity, ties by word position
        let by_similarity = |a: &(usize, f64), b: &(usize, f64)| -> Ordering {
            b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
        };
        if k < scored.len() {
            scored.select_nth_unstable_by(k, by_similarity);
            scored.truncate(k);
        }
        scored.sort_by(by_similarity);

        Ok(scored
            .into_iter()
            .map(|(i, sim)| (self.words[i].clone(), sim))
            .collect())
    }

    fn distances_from(&self, vector: &[f64]) -> Result<Vec<Neighbor>, EmbeddingError> {
        self.check_dim(vector)?;
        Ok(self
            .words
            .iter()
            .zip(&self.vectors)
            .map(|(word, v)| {
                let dist = v
                    .iter()
                    .zip(vector)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
                    .sqrt();
                (word.clone(), dist)
            })
            .collect())
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Scale to unit length. The zero vector stays zero.
fn unit(v: &[f64]) -> Vec<f64> {
    let norm = dot(v, v).sqrt();
    if norm < f64::EPSILON {
        vec![0.0; v.len()]
    } else {
        v.iter().map(|x| x / norm).collect()
    }
}
