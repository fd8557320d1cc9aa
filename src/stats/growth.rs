// Frequency growth rate — Spearman correlation of a word's frequency with time.
//
// A word's growth score is the rank correlation between the period index
// (1, 2, ..., k) and its frequency in each of the first k historical periods.
// Ties are given average ranks, and the p-value comes from the usual
// t-approximation with k - 2 degrees of freedom.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::Result;
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::{debug, info, warn};

use crate::corpus::frequency::FrequencyTable;
use crate::corpus::vocabulary::Vocabulary;
use crate::output::tables;

/// A Spearman rank correlation and its two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpearmanResult {
    pub coefficient: f64,
    pub p_value: f64,
}

/// Spearman rank correlation between two equally long series.
///
/// Returns None when the series differ in length, have fewer than two
/// points, or either side is constant (the coefficient is undefined).
pub fn spearman(x: &[f64], y: &[f64]) -> Option<SpearmanResult> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let coefficient = pearson(&average_ranks(x), &average_ranks(y))?;
    Some(SpearmanResult {
        coefficient,
        p_value: p_value(coefficient, x.len()),
    })
}

/// 1-based ranks, with tied values sharing the mean of their positions.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // Positions i..j (0-based) share ranks i+1..=j
        let rank = (i + j + 1) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = rank;
        }
        i = j;
    }
    ranks
}

fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }
    Some((cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0))
}

fn p_value(r: f64, n: usize) -> f64 {
    if n < 3 {
        return f64::NAN;
    }
    if r.abs() >= 1.0 {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t = r * (df / ((1.0 - r) * (1.0 + r))).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}

/// One scored word.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthEntry {
    pub word: String,
    pub coefficient: f64,
    pub p_value: f64,
}

/// Word -> growth score, in vocabulary order.
///
/// Words with no historical occurrences, or whose frequency never changes,
/// have no entry.
#[derive(Debug, Clone, Default)]
pub struct GrowthTable {
    entries: Vec<GrowthEntry>,
    index: HashMap<String, usize>,
}

impl GrowthTable {
    /// Build a table directly from (word, coefficient) pairs. The p-value is
    /// left undefined.
    pub fn from_scores<'a, I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut table = Self::default();
        for (word, coefficient) in scores {
            table.push(GrowthEntry {
                word: word.to_string(),
                coefficient,
                p_value: f64::NAN,
            });
        }
        table
    }

    fn push(&mut self, entry: GrowthEntry) {
        if let Some(&i) = self.index.get(&entry.word) {
            self.entries[i] = entry;
        } else {
            self.index.insert(entry.word.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.index.get(word).map(|&i| self.entries[i].coefficient)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GrowthEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist as `word<TAB>coefficient<TAB>p-value` rows.
    pub fn write_tsv(&self, path: &Path) -> Result<()> {
        let mut writer = tables::tsv_writer(path)?;
        for entry in &self.entries {
            writer.write_record([
                entry.word.clone(),
                entry.coefficient.to_string(),
                entry.p_value.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Score every vocabulary word against the first `max_periods` historical
/// periods, taken in sorted label order.
pub fn estimate(
    vocabulary: &Vocabulary,
    periods: &BTreeMap<String, FrequencyTable>,
    max_periods: usize,
) -> GrowthTable {
    let ordered: Vec<&FrequencyTable> = periods.values().take(max_periods).collect();
    if ordered.len() < max_periods {
        warn!(
            found = ordered.len(),
            expected = max_periods,
            "Fewer historical periods than expected for growth estimation"
        );
    }

    let time_steps: Vec<f64> = (1..=ordered.len()).map(|t| t as f64).collect();
    let mut table = GrowthTable::default();
    let mut constant = 0usize;

    for word in vocabulary.iter() {
        let series: Vec<f64> = ordered.iter().map(|t| t.get(word)).collect();
        if series.iter().sum::<f64>() <= 0.0 {
            continue;
        }
        match spearman(&time_steps, &series) {
            Some(result) => table.push(GrowthEntry {
                word: word.to_string(),
                coefficient: result.coefficient,
                p_value: result.p_value,
            }),
            None => {
                constant += 1;
                debug!(word, "Constant frequency series, no growth score");
            }
        }
    }

    info!(scored = table.len(), constant, "Estimated frequency growth");
    table
}
