// Alignment of the modern space into historical coordinates.
//
// The orthogonal transform is fit outside this crate (Procrustes over the
// shared vocabulary) and handed over as a d x d matrix. Projection applies it
// to every modern vector once, up front.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use super::memory::InMemorySpace;
use super::traits::{EmbeddingError, EmbeddingSpace};

/// A linear map applied as a row vector times the matrix: `v · W`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthogonalMap {
    /// Row-major, `rows.len() == dim`, every row of length `dim`.
    rows: Vec<Vec<f64>>,
}

impl OrthogonalMap {
    pub fn identity(dim: usize) -> Self {
        let rows = (0..dim)
            .map(|i| (0..dim).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();
        Self { rows }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let dim = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != dim) {
            anyhow::bail!(
                "Alignment matrix row {} has {} columns, expected {}",
                i,
                row.len(),
                dim
            );
        }
        Ok(Self { rows })
    }

    /// Load a matrix written as whitespace-separated rows, one per line.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read alignment matrix {}", path.display()))?;
        let rows = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .enumerate()
            .map(|(i, line)| {
                line.split_whitespace()
                    .map(str::parse::<f64>)
                    .collect::<std::result::Result<Vec<f64>, _>>()
                    .with_context(|| format!("Malformed alignment matrix row {}", i))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(rows)
    }

    pub fn dim(&self) -> usize {
        self.rows.len()
    }

    pub fn apply(&self, v: &[f64]) -> Result<Vec<f64>, EmbeddingError> {
        if v.len() != self.dim() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dim(),
                got: v.len(),
            });
        }
        let mut out = vec![0.0; self.dim()];
        for (x, row) in v.iter().zip(&self.rows) {
            for (o, w) in out.iter_mut().zip(row) {
                *o += x * w;
            }
        }
        Ok(out)
    }
}

/// Map every vector of `space` through `transform`, producing the projected
/// space that shares the reference space's coordinate system.
pub fn project(space: InMemorySpace, transform: &OrthogonalMap) -> Result<InMemorySpace> {
    if space.dim() != transform.dim() {
        anyhow::bail!(
            "Alignment matrix is {0}x{0} but the embedding space has {1} dimensions",
            transform.dim(),
            space.dim()
        );
    }
    let projected = space
        .into_entries()
        .map(|(word, v)| Ok((word, transform.apply(&v)?)))
        .collect::<Result<Vec<_>>>()?;
    let space = InMemorySpace::from_vectors(projected)?;
    debug!(words = space.len(), dim = space.dim(), "Projected embedding space");
    Ok(space)
}
