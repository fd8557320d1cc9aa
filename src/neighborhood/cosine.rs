// Cosine-similarity neighborhoods over the historical lexicon.
//
// Neologisms are located by their projected modern vector, controls by their
// historical vector, and in both cases the neighbors come from the historical
// space. Keeping one fixed candidate lexicon is what makes the two kinds of
// neighborhood comparable.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use super::{Metric, NeighborhoodSummary, PairStats, RadiusSweep, SweepAccumulator, WordStats};
use crate::corpus::vocabulary::Vocabulary;
use crate::embeddings::traits::{EmbeddingError, EmbeddingSpace, Neighbor};
use crate::output::tables::StatsWriter;
use crate::stats::controls::PairAssignment;
use crate::stats::growth::GrowthTable;

/// Neighbors fetched per word before thresholding.
pub const NEIGHBORHOOD_SIZE: usize = 5000;

/// Lower bound on raw candidates retrieved per query.
const MIN_CANDIDATES: usize = 5000;

/// Raw candidates retrieved per requested neighbor.
const OVERSAMPLE: usize = 20;

pub struct NeighborhoodAnalyzer<'a> {
    historical: &'a dyn EmbeddingSpace,
    projected: &'a dyn EmbeddingSpace,
    vocabulary: &'a Vocabulary,
    growth: &'a GrowthTable,
}

impl<'a> NeighborhoodAnalyzer<'a> {
    pub fn new(
        historical: &'a dyn EmbeddingSpace,
        projected: &'a dyn EmbeddingSpace,
        vocabulary: &'a Vocabulary,
        growth: &'a GrowthTable,
    ) -> Self {
        Self {
            historical,
            projected,
            vocabulary,
            growth,
        }
    }

    /// Up to `n` nearest historical neighbors of `word`, most similar first,
    /// restricted to vocabulary words other than `word` itself.
    ///
    /// With `use_projected` the query is the word's projected modern vector;
    /// otherwise it is the word's own historical vector. Fails with
    /// `NotFound` if the word is missing from the queried space.
    pub fn fetch_neighbors(
        &self,
        word: &str,
        n: usize,
        use_projected: bool,
    ) -> Result<Vec<Neighbor>, EmbeddingError> {
        let candidates = MIN_CANDIDATES.max(n.saturating_mul(OVERSAMPLE));
        let raw = if use_projected {
            let vector = self.projected.vector_of(word)?;
            self.historical.neighbors_by_vector(&vector, candidates)?
        } else {
            self.historical.neighbors_by_word(word, candidates)?
        };

        let neighbors: Vec<Neighbor> = raw
            .into_iter()
            .filter(|(w, _)| w != word && self.vocabulary.contains(w))
            .take(n)
            .collect();

        if neighbors.len() < n {
            warn!(
                word,
                found = neighbors.len(),
                requested = n,
                "Could only find {} neighbors out of {}",
                neighbors.len(),
                n
            );
        }
        Ok(neighbors)
    }

    /// Sweep one pair. `Ok(None)` means one of the words is missing from its
    /// embedding space and the pair is skipped.
    pub fn analyze_pair(
        &self,
        neologism: &str,
        control: &str,
        sweep: &RadiusSweep,
    ) -> Result<Option<PairStats>, EmbeddingError> {
        let neologism_neighbors = match self.fetch_neighbors(neologism, NEIGHBORHOOD_SIZE, true) {
            Ok(n) => n,
            Err(EmbeddingError::NotFound(_)) => {
                warn!(word = neologism, "Neologism not found in the modern embedding space vocabulary, skipping pair");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let control_neighbors = match self.fetch_neighbors(control, NEIGHBORHOOD_SIZE, false) {
            Ok(n) => n,
            Err(EmbeddingError::NotFound(_)) => {
                warn!(word = control, "Control not found in the historical embedding space vocabulary, skipping pair");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        Ok(Some(PairStats {
            neologism: WordStats::from_neighbors(
                neologism,
                &neologism_neighbors,
                sweep,
                Metric::Cosine,
                self.growth,
            ),
            control: WordStats::from_neighbors(
                control,
                &control_neighbors,
                sweep,
                Metric::Cosine,
                self.growth,
            ),
        }))
    }

    /// Sweep every pair and fold the results into corpus-wide means.
    ///
    /// Pairs are analyzed in parallel; rows reach `writer` in pair order.
    pub fn compute_neighborhood_stats(
        &self,
        pairs: &PairAssignment,
        sweep: &RadiusSweep,
        mut writer: Option<&mut StatsWriter>,
    ) -> anyhow::Result<NeighborhoodSummary> {
        let pb = ProgressBar::new(pairs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Neighborhoods [{bar:30}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let results: Vec<Result<Option<PairStats>, EmbeddingError>> = pairs
            .pairs()
            .par_iter()
            .map(|(neologism, control)| {
                let result = self.analyze_pair(neologism, control, sweep);
                pb.inc(1);
                result
            })
            .collect();
        pb.finish_and_clear();

        let mut neologism_acc = SweepAccumulator::new(sweep.len());
        let mut control_acc = SweepAccumulator::new(sweep.len());
        let mut skipped = 0;

        for result in results {
            match result? {
                Some(stats) => {
                    if let Some(w) = writer.as_deref_mut() {
                        w.write_pair(&stats)?;
                    }
                    neologism_acc.add(&stats.neologism);
                    control_acc.add(&stats.control);
                }
                None => skipped += 1,
            }
        }

        info!(pairs = pairs.len(), skipped, "Computed neighborhood statistics");

        Ok(NeighborhoodSummary {
            metric: "cosine".to_string(),
            thresholds: sweep.thresholds().to_vec(),
            neologisms: neologism_acc.finish(pairs.len()),
            controls: control_acc.finish(pairs.len()),
            pairs_total: pairs.len(),
            pairs_skipped: skipped,
        })
    }
}
