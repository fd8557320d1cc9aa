// Neighborhood statistics — density and mean growth rate of semantic
// neighbors, swept over a range of radii.
//
// For every neologism/control pair, the neighbors of each word are fetched
// once and then thresholded at every radius. Per radius, density is the
// number of neighbors inside it and growth is the mean growth score of the
// inside neighbors that have one.

pub mod cosine;
pub mod euclidean;

use serde::Serialize;

use crate::embeddings::traits::Neighbor;
use crate::stats::growth::GrowthTable;

/// Distance notion used for the radius sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Metric {
    /// Cosine similarity; a neighbor is inside radius r when similarity >= r.
    Cosine,
    /// Euclidean distance; a neighbor is inside radius r when distance < r.
    Euclidean,
}

impl Metric {
    pub fn sweep(self) -> RadiusSweep {
        match self {
            Metric::Cosine => RadiusSweep::cosine(),
            Metric::Euclidean => RadiusSweep::euclidean(),
        }
    }

    /// Whether a neighbor at `value` falls inside `radius`.
    pub fn within(self, value: f64, radius: f64) -> bool {
        match self {
            Metric::Cosine => value >= radius,
            Metric::Euclidean => value < radius,
        }
    }
}

/// The fixed sequence of radii a statistic is evaluated at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadiusSweep {
    thresholds: Vec<f64>,
}

impl RadiusSweep {
    pub fn new(thresholds: Vec<f64>) -> Self {
        Self { thresholds }
    }

    /// Similarity thresholds 0.55, 0.525, ..., 0.375, each the nearest
    /// double to its decimal value.
    pub fn cosine() -> Self {
        Self::new((0..8).map(|i| (550 - 25 * i) as f64 / 1000.0).collect())
    }

    /// Distance radii 2.0, 2.5, ..., 5.0.
    pub fn euclidean() -> Self {
        Self::new((0..7).map(|i| 2.0 + 0.5 * i as f64).collect())
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Thresholds formatted for column names.
    pub fn labels(&self) -> Vec<String> {
        self.thresholds.iter().map(|r| format!("{r:.3}")).collect()
    }
}

/// Per-radius statistics for one word.
#[derive(Debug, Clone, PartialEq)]
pub struct WordStats {
    pub word: String,
    /// Neighbors inside each radius.
    pub density: Vec<usize>,
    /// Mean growth score of scored neighbors inside each radius; None when
    /// no neighbor inside has a score.
    pub growth: Vec<Option<f64>>,
}

impl WordStats {
    /// Threshold an already fetched neighbor list at every radius.
    pub fn from_neighbors(
        word: &str,
        neighbors: &[Neighbor],
        sweep: &RadiusSweep,
        metric: Metric,
        growth: &GrowthTable,
    ) -> Self {
        let mut density = Vec::with_capacity(sweep.len());
        let mut mean_growth = Vec::with_capacity(sweep.len());

        for &radius in sweep.thresholds() {
            let inside: Vec<&str> = neighbors
                .iter()
                .filter(|(_, value)| metric.within(*value, radius))
                .map(|(w, _)| w.as_str())
                .collect();
            density.push(inside.len());

            let scores: Vec<f64> = inside.iter().filter_map(|w| growth.get(w)).collect();
            mean_growth.push(if scores.is_empty() {
                None
            } else {
                Some(scores.iter().sum::<f64>() / scores.len() as f64)
            });
        }

        Self {
            word: word.to_string(),
            density,
            growth: mean_growth,
        }
    }
}

/// Statistics for one neologism and its control.
#[derive(Debug, Clone, PartialEq)]
pub struct PairStats {
    pub neologism: WordStats,
    pub control: WordStats,
}

/// Corpus-wide means per radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanStats {
    pub density: Vec<f64>,
    /// None where no word contributed a defined growth value.
    pub growth: Vec<Option<f64>>,
}

/// Running sums behind `MeanStats`.
#[derive(Debug, Clone)]
pub struct SweepAccumulator {
    density_sum: Vec<f64>,
    growth_sum: Vec<f64>,
    growth_count: Vec<usize>,
}

impl SweepAccumulator {
    pub fn new(radii: usize) -> Self {
        Self {
            density_sum: vec![0.0; radii],
            growth_sum: vec![0.0; radii],
            growth_count: vec![0; radii],
        }
    }

    pub fn add(&mut self, stats: &WordStats) {
        for (i, &d) in stats.density.iter().enumerate() {
            self.density_sum[i] += d as f64;
        }
        for (i, g) in stats.growth.iter().enumerate() {
            if let Some(g) = g {
                self.growth_sum[i] += g;
                self.growth_count[i] += 1;
            }
        }
    }

    /// Density is averaged over `total_pairs` (skipped pairs included);
    /// growth over the words that had a defined value at each radius.
    pub fn finish(&self, total_pairs: usize) -> MeanStats {
        let density = self
            .density_sum
            .iter()
            .map(|s| if total_pairs == 0 { 0.0 } else { s / total_pairs as f64 })
            .collect();
        let growth = self
            .growth_sum
            .iter()
            .zip(&self.growth_count)
            .map(|(s, &n)| if n == 0 { None } else { Some(s / n as f64) })
            .collect();
        MeanStats { density, growth }
    }
}

/// Result of a full sweep over all pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborhoodSummary {
    pub metric: String,
    pub thresholds: Vec<f64>,
    pub neologisms: MeanStats,
    pub controls: MeanStats,
    pub pairs_total: usize,
    pub pairs_skipped: usize,
}

impl NeighborhoodSummary {
    pub fn write_json(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbors(list: &[(&str, f64)]) -> Vec<Neighbor> {
        list.iter().map(|(w, s)| (w.to_string(), *s)).collect()
    }

    #[test]
    fn test_cosine_sweep_values() {
        let sweep = RadiusSweep::cosine();
        assert_eq!(sweep.len(), 8);
        assert!((sweep.thresholds()[0] - 0.55).abs() < 1e-12);
        assert!((sweep.thresholds()[7] - 0.375).abs() < 1e-12);
        assert_eq!(sweep.labels()[1], "0.525");
    }

    #[test]
    fn test_cosine_thresholds_hit_decimal_values() {
        let sweep = RadiusSweep::cosine();
        assert_eq!(
            sweep.thresholds(),
            &[0.55, 0.525, 0.5, 0.475, 0.45, 0.425, 0.4, 0.375]
        );
        // A neighbor at exactly 0.475 is inside the 0.475 radius
        let stats = WordStats::from_neighbors(
            "gadget",
            &neighbors(&[("device", 0.475), ("apparatus", 0.45)]),
            &sweep,
            Metric::Cosine,
            &GrowthTable::default(),
        );
        assert_eq!(stats.density, vec![0, 0, 0, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn test_euclidean_sweep_values() {
        let sweep = RadiusSweep::euclidean();
        assert_eq!(sweep.thresholds(), &[2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0]);
    }

    #[test]
    fn test_cosine_threshold_is_inclusive() {
        let growth = GrowthTable::default();
        let sweep = RadiusSweep::new(vec![0.5]);
        let stats = WordStats::from_neighbors(
            "gadget",
            &neighbors(&[("device", 0.5), ("apparatus", 0.49)]),
            &sweep,
            Metric::Cosine,
            &growth,
        );
        assert_eq!(stats.density, vec![1]);
        assert_eq!(stats.growth, vec![None]);
    }

    #[test]
    fn test_density_non_increasing_in_radius() {
        let growth = GrowthTable::from_scores([("a", 0.2), ("c", -0.4)]);
        let sweep = RadiusSweep::cosine();
        let stats = WordStats::from_neighbors(
            "w",
            &neighbors(&[("a", 0.6), ("b", 0.52), ("c", 0.46), ("d", 0.38)]),
            &sweep,
            Metric::Cosine,
            &growth,
        );
        // Thresholds descend, so density must not decrease along the sweep
        assert!(stats.density.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(stats.density, vec![1, 1, 2, 2, 3, 3, 3, 4]);
        assert!((stats.growth[0].unwrap() - 0.2).abs() < 1e-12);
        assert!((stats.growth[4].unwrap() - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_accumulator_growth_undefined_when_no_contribution() {
        let mut acc = SweepAccumulator::new(2);
        acc.add(&WordStats {
            word: "a".into(),
            density: vec![2, 4],
            growth: vec![None, Some(0.5)],
        });
        acc.add(&WordStats {
            word: "b".into(),
            density: vec![0, 2],
            growth: vec![None, Some(0.1)],
        });
        let means = acc.finish(4);
        assert_eq!(means.density, vec![0.5, 1.5]);
        assert_eq!(means.growth[0], None);
        assert!((means.growth[1].unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_summary_serializes_undefined_as_null() {
        let summary = NeighborhoodSummary {
            metric: "cosine".into(),
            thresholds: vec![0.5],
            neologisms: MeanStats {
                density: vec![1.0],
                growth: vec![None],
            },
            controls: MeanStats {
                density: vec![0.0],
                growth: vec![Some(0.25)],
            },
            pairs_total: 1,
            pairs_skipped: 0,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["neologisms"]["growth"][0].is_null());
        assert_eq!(json["controls"]["growth"][0], 0.25);
    }
}
