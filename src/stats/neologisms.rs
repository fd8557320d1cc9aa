// Neologism detection — words that surged in modern relative to historical text.
//
// A word qualifies when it is mostly written in lowercase in the modern
// corpus (filters out names and acronyms), occurs in the modern corpus, and
// is either absent from the historical corpus or at least
// `min_frequency_ratio` times more frequent in modern text.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::config::Hyperparameters;
use crate::corpus::frequency::FrequencyIndex;
use crate::output::tables;

/// Rank neologism candidates by descending modern frequency.
///
/// Equal frequencies keep the order in which words were first counted in
/// the modern corpus. Words shorter than `min_word_len` characters are
/// dropped before the list is capped at `max_neologisms`.
pub fn detect(index: &FrequencyIndex, params: &Hyperparameters) -> Vec<String> {
    let mut candidates: Vec<(&str, f64)> = Vec::new();

    for (word, freq_mod) in index.modern_total.iter() {
        if index.capitalization.dominant_form(word) != Some(word) {
            continue;
        }
        let freq_hist = index.historical_total.get(word);
        if freq_mod > 0.0 && (freq_hist == 0.0 || freq_mod / freq_hist > params.min_frequency_ratio) {
            candidates.push((word, freq_mod));
        }
    }

    // Stable sort: ties stay in first-counted order
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

    let neologisms: Vec<String> = candidates
        .into_iter()
        .filter(|(word, _)| word.chars().count() >= params.min_word_len)
        .take(params.max_neologisms)
        .map(|(word, _)| word.to_string())
        .collect();

    info!(count = neologisms.len(), "Extracted neologisms");
    neologisms
}

/// Persist the neologism list, one word per line.
pub fn write_list(neologisms: &[String], path: &Path) -> Result<()> {
    tables::write_lines(path, neologisms.iter().map(String::as_str))
}
