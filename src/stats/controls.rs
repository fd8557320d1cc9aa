// Control word matching — pair each neologism with a length- and
// frequency-matched baseline word.
//
// Matching is greedy first-fit: neologisms are taken in list order, the
// candidate pool is scanned in its current order, and the first qualifying
// control is assigned and removed from the pool. The result depends on both
// orders; with a fixed seed the pool order (and so the pairing) is
// reproducible.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::config::Hyperparameters;
use crate::corpus::frequency::FrequencyIndex;
use crate::output::tables;
use crate::stats::growth::GrowthTable;

/// Injective neologism -> control mapping, in neologism-list order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairAssignment {
    pairs: Vec<(String, String)>,
    unmatched: Vec<String>,
}

impl PairAssignment {
    /// Build an assignment from explicit pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(n, c)| (n.to_string(), c.to_string()))
                .collect(),
            unmatched: Vec::new(),
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Neologisms for which no control qualified.
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    pub fn control_for(&self, neologism: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == neologism)
            .map(|(_, c)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Persist as `neologism<TAB>control` rows.
    pub fn write_tsv(&self, path: &Path) -> Result<()> {
        let mut writer = tables::tsv_writer(path)?;
        for (neologism, control) in &self.pairs {
            writer.write_record([neologism, control])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Pairs neologisms with control words.
pub struct ControlMatcher<'a> {
    index: &'a FrequencyIndex,
    growth: &'a GrowthTable,
    params: &'a Hyperparameters,
    /// Restrict candidates to words with near-zero growth.
    pub stability_constraint: bool,
    /// Shuffle the candidate pool with this seed before matching.
    pub seed: Option<u64>,
}

impl<'a> ControlMatcher<'a> {
    pub fn new(index: &'a FrequencyIndex, growth: &'a GrowthTable, params: &'a Hyperparameters) -> Self {
        Self {
            index,
            growth,
            params,
            stability_constraint: false,
            seed: None,
        }
    }

    pub fn with_stability_constraint(mut self, stable: bool) -> Self {
        self.stability_constraint = stable;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Every scored word that is not a neologism, filtered by growth when
    /// the stability constraint is on, in growth-table order (or shuffled).
    pub fn candidate_pool(&self, neologisms: &[String]) -> Vec<String> {
        let excluded: HashSet<&str> = neologisms.iter().map(String::as_str).collect();

        let mut pool: Vec<String> = self
            .growth
            .iter()
            .filter(|e| !excluded.contains(e.word.as_str()))
            .filter(|e| {
                !self.stability_constraint
                    || e.coefficient.abs() < self.params.max_spearman_correlation
            })
            .map(|e| e.word.clone())
            .collect();

        if let Some(seed) = self.seed {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            pool.shuffle(&mut rng);
        }

        info!(
            candidates = pool.len(),
            stable = self.stability_constraint,
            seed = ?self.seed,
            "Built control candidate pool"
        );
        pool
    }

    /// Whether `control` may be paired with a neologism of the given length
    /// and modern frequency.
    pub fn qualifies(&self, neologism_len: usize, neologism_freq: f64, control: &str) -> bool {
        let control_freq = self.index.historical_total.get(control);
        if control_freq == 0.0 {
            return false;
        }
        let ratio = neologism_freq / control_freq;
        let (low, high) = self.params.control_ratio_window;
        neologism_len.abs_diff(control.chars().count()) < self.params.max_length_difference
            && low < ratio
            && ratio < high
    }

    /// Greedy first-fit matching over the candidate pool.
    pub fn pair(&self, neologisms: &[String]) -> PairAssignment {
        let mut pool = self.candidate_pool(neologisms);
        let mut assignment = PairAssignment::default();

        for neologism in neologisms {
            let neologism_len = neologism.chars().count();
            let neologism_freq = self.index.modern_total.get(neologism);

            let found = pool
                .iter()
                .position(|control| self.qualifies(neologism_len, neologism_freq, control));

            match found {
                Some(pos) => {
                    let control = pool.remove(pos);
                    assignment.pairs.push((neologism.clone(), control));
                }
                None => {
                    warn!(neologism = %neologism, "Failed to pair with a control");
                    assignment.unmatched.push(neologism.clone());
                }
            }
        }

        info!(
            pairs = assignment.len(),
            unmatched = assignment.unmatched.len(),
            "Created neologism-control pairs"
        );
        assignment
    }
}
