// Euclidean-distance neighborhoods.
//
// Instead of a fixed-size neighbor list, every historical word is a
// candidate and radius r admits words strictly closer than r. The query word
// itself is removed; the vocabulary filter of the cosine sweep does not
// apply. Only corpus-wide means are produced.

use rayon::prelude::*;
use tracing::{info, warn};

use super::{Metric, NeighborhoodSummary, PairStats, RadiusSweep, SweepAccumulator, WordStats};
use crate::embeddings::traits::{EmbeddingError, EmbeddingSpace, Neighbor};
use crate::stats::controls::PairAssignment;
use crate::stats::growth::GrowthTable;

/// Distances from `word`'s vector (taken from `source`) to every word of
/// `historical`, without `word` itself.
fn distances(
    historical: &dyn EmbeddingSpace,
    source: &dyn EmbeddingSpace,
    word: &str,
) -> Result<Vec<Neighbor>, EmbeddingError> {
    let vector = source.vector_of(word)?;
    let mut all = historical.distances_from(&vector)?;
    all.retain(|(w, _)| w != word);
    Ok(all)
}

fn analyze_pair(
    historical: &dyn EmbeddingSpace,
    projected: &dyn EmbeddingSpace,
    growth: &GrowthTable,
    neologism: &str,
    control: &str,
    sweep: &RadiusSweep,
) -> Result<Option<PairStats>, EmbeddingError> {
    let lookups = distances(historical, projected, neologism)
        .and_then(|n| Ok((n, distances(historical, historical, control)?)));
    let (neologism_dist, control_dist) = match lookups {
        Ok(found) => found,
        Err(EmbeddingError::NotFound(word)) => {
            warn!(word = %word, "Not found in embeddings, skipping pair");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    Ok(Some(PairStats {
        neologism: WordStats::from_neighbors(neologism, &neologism_dist, sweep, Metric::Euclidean, growth),
        control: WordStats::from_neighbors(control, &control_dist, sweep, Metric::Euclidean, growth),
    }))
}

/// Mean density and growth per Euclidean radius across all pairs.
pub fn compute_neighborhood_stats(
    historical: &dyn EmbeddingSpace,
    projected: &dyn EmbeddingSpace,
    growth: &GrowthTable,
    pairs: &PairAssignment,
    sweep: &RadiusSweep,
) -> anyhow::Result<NeighborhoodSummary> {
    let results: Vec<_> = pairs
        .pairs()
        .par_iter()
        .map(|(neologism, control)| analyze_pair(historical, projected, growth, neologism, control, sweep))
        .collect();

    let mut neologism_acc = SweepAccumulator::new(sweep.len());
    let mut control_acc = SweepAccumulator::new(sweep.len());
    let mut skipped = 0;
    for result in results {
        match result? {
            Some(stats) => {
                neologism_acc.add(&stats.neologism);
                control_acc.add(&stats.control);
            }
            None => skipped += 1,
        }
    }

    info!(pairs = pairs.len(), skipped, "Computed Euclidean neighborhood statistics");

    Ok(NeighborhoodSummary {
        metric: "euclidean".to_string(),
        thresholds: sweep.thresholds().to_vec(),
        neologisms: neologism_acc.finish(pairs.len()),
        controls: control_acc.finish(pairs.len()),
        pairs_total: pairs.len(),
        pairs_skipped: skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::memory::InMemorySpace;

    #[test]
    fn test_radius_is_strict_and_self_excluded() {
        let historical = InMemorySpace::from_vectors([
            ("widget", vec![0.0, 0.0]),
            ("device", vec![2.0, 0.0]),
            ("apparatus", vec![0.0, 3.0]),
        ])
        .unwrap();
        let modern = InMemorySpace::from_vectors([("gadget", vec![0.0, 0.0])]).unwrap();
        let growth = GrowthTable::from_scores([("device", 0.4), ("apparatus", -0.2)]);
        let pairs = PairAssignment::from_pairs([("gadget", "widget")]);
        let sweep = RadiusSweep::euclidean();

        let summary = compute_neighborhood_stats(&historical, &modern, &growth, &pairs, &sweep).unwrap();

        // gadget sees widget at 0, device at 2, apparatus at 3
        assert_eq!(summary.neologisms.density, vec![1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 3.0]);
        // widget excludes itself: device at exactly 2 is outside radius 2
        assert_eq!(summary.controls.density, vec![0.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0]);
        assert_eq!(summary.controls.growth[0], None);
        assert!((summary.controls.growth[1].unwrap() - 0.4).abs() < 1e-12);
        assert!((summary.controls.growth[3].unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_missing_word_skipped() {
        let historical = InMemorySpace::from_vectors([("widget", vec![0.0, 0.0])]).unwrap();
        let modern = InMemorySpace::from_vectors([("gadget", vec![0.0, 0.0])]).unwrap();
        let pairs = PairAssignment::from_pairs([("blog", "widget")]);
        let summary = compute_neighborhood_stats(
            &historical,
            &modern,
            &GrowthTable::default(),
            &pairs,
            &RadiusSweep::euclidean(),
        )
        .unwrap();
        assert_eq!(summary.pairs_skipped, 1);
        assert!(summary.neologisms.growth.iter().all(Option::is_none));
    }
}
