// Frequency tables built in a single streaming pass over each corpus split.
//
// Counting preserves first-encounter order. The neologism ranking breaks
// frequency ties by that order, and the dominant capitalization form breaks
// count ties by it, so iteration order is observable in the outputs.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use super::reader::{self, CorpusReader};
use super::vocabulary::Vocabulary;
use super::Split;

/// Insertion-ordered word counter.
#[derive(Debug, Clone, Default)]
pub struct TokenCounts {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl TokenCounts {
    pub fn add(&mut self, word: &str, n: u64) {
        match self.counts.get_mut(word) {
            Some(count) => *count += n,
            None => {
                self.order.push(word.to_string());
                self.counts.insert(word.to_string(), n);
            }
        }
    }

    /// Add every count of `other`, appending its unseen words in its order.
    pub fn merge(&mut self, other: &TokenCounts) {
        for word in &other.order {
            self.add(word, other.counts[word]);
        }
    }

    pub fn get(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Divide every count by `total` tokens.
    pub fn normalize(&self, total: u64) -> FrequencyTable {
        let mut table = FrequencyTable::default();
        for word in &self.order {
            table.insert(word, self.counts[word] as f64 / total as f64);
        }
        table
    }
}

/// Mapping word -> normalized frequency for one period (or an aggregate).
///
/// Iteration follows the order in which words were first counted.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    words: Vec<String>,
    freqs: HashMap<String, f64>,
}

impl FrequencyTable {
    /// Build a table from explicit (word, frequency) pairs. Later duplicates
    /// overwrite earlier values but keep the original position.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut table = Self::default();
        for (word, freq) in pairs {
            table.insert(word, freq);
        }
        table
    }

    fn insert(&mut self, word: &str, freq: f64) {
        if self.freqs.insert(word.to_string(), freq).is_none() {
            self.words.push(word.to_string());
        }
    }

    /// Frequency of `word`, or 0.0 if it was never counted.
    pub fn get(&self, word: &str) -> f64 {
        self.freqs.get(word).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.freqs.contains_key(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.words.iter().map(|w| (w.as_str(), self.freqs[w]))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Per-word surface-form counts, accumulated over the modern corpus only.
#[derive(Debug, Clone, Default)]
pub struct CapitalizationProfile {
    forms: HashMap<String, Vec<(String, u64)>>,
}

impl CapitalizationProfile {
    pub fn record(&mut self, word: &str, form: &str) {
        let forms = self.forms.entry(word.to_string()).or_default();
        match forms.iter_mut().find(|(f, _)| f == form) {
            Some((_, count)) => *count += 1,
            None => forms.push((form.to_string(), 1)),
        }
    }

    /// The most frequent surface form of `word`.
    ///
    /// Ties go to the form that was seen first. That tie-break depends on
    /// corpus reading order and is not stable across differently ordered
    /// inputs.
    pub fn dominant_form(&self, word: &str) -> Option<&str> {
        let forms = self.forms.get(word)?;
        let (first, rest) = forms.split_first()?;
        let mut best = first;
        for entry in rest {
            if entry.1 > best.1 {
                best = entry;
            }
        }
        Some(best.0.as_str())
    }

    pub fn count(&self, word: &str, form: &str) -> u64 {
        self.forms
            .get(word)
            .and_then(|forms| forms.iter().find(|(f, _)| f == form))
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }
}

/// Raw counts for a single period, before normalization.
#[derive(Debug, Default)]
pub struct PeriodCounts {
    pub counts: TokenCounts,
    /// All whitespace-separated tokens seen, in or out of vocabulary.
    pub tokens: u64,
}

impl PeriodCounts {
    /// Tokenize one line on whitespace and count vocabulary hits.
    ///
    /// When a capitalization profile is supplied, the original-case token is
    /// recorded against its lowercase word.
    pub fn count_line(
        &mut self,
        line: &str,
        vocabulary: &Vocabulary,
        mut capitalization: Option<&mut CapitalizationProfile>,
    ) {
        for token in line.split_whitespace() {
            self.tokens += 1;
            let word = token.to_lowercase();
            if vocabulary.contains(&word) {
                self.counts.add(&word, 1);
                if let Some(profile) = capitalization.as_deref_mut() {
                    profile.record(&word, token);
                }
            }
        }
    }
}

/// All frequency tables of a run.
#[derive(Debug, Default)]
pub struct FrequencyIndex {
    /// Historical per-period tables keyed by period label.
    pub historical_periods: BTreeMap<String, FrequencyTable>,
    pub historical_total: FrequencyTable,
    pub modern_total: FrequencyTable,
    pub capitalization: CapitalizationProfile,
}

impl FrequencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count vocabulary words over every period directory of a split.
    ///
    /// A missing root directory is fatal; a missing period directory or an
    /// unreadable file is logged and skipped.
    pub fn extract_split(&mut self, vocabulary: &Vocabulary, split: Split, root: &Path) -> Result<()> {
        if !root.is_dir() {
            anyhow::bail!("Corpus directory not found: {}", root.display());
        }

        let mut periods = Vec::new();
        for &period in split.periods() {
            let dir = root.join(period);
            if !dir.is_dir() {
                warn!(split = %split, period, "Missing subdirectory, skipping");
                continue;
            }

            info!(split = %split, dir = %dir.display(), "Processing period");
            let files = reader::period_files(&dir)?;
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  {msg} [{bar:30}] {pos}/{len} ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb.set_message(period.to_string());

            let mut counts = PeriodCounts::default();
            for file in &files {
                match CorpusReader::AllLines.texts(file) {
                    Ok(lines) => {
                        for line in &lines {
                            self.count_into(&mut counts, line, vocabulary, split);
                        }
                    }
                    Err(e) => {
                        warn!(file = %file.display(), error = %e, "Failed to read corpus file, treating as empty");
                    }
                }
                pb.inc(1);
            }
            pb.finish_and_clear();
            periods.push((period.to_string(), counts));
        }

        self.finish_split(split, periods);
        Ok(())
    }

    /// Count in-memory texts as if they were the period directories of a
    /// split. Each entry is (period label, lines).
    pub fn ingest_texts<S: AsRef<str>>(
        &mut self,
        vocabulary: &Vocabulary,
        split: Split,
        periods: &[(&str, Vec<S>)],
    ) {
        let mut counted = Vec::with_capacity(periods.len());
        for (label, lines) in periods {
            let mut counts = PeriodCounts::default();
            for line in lines {
                self.count_into(&mut counts, line.as_ref(), vocabulary, split);
            }
            counted.push((label.to_string(), counts));
        }
        self.finish_split(split, counted);
    }

    fn count_into(&mut self, counts: &mut PeriodCounts, line: &str, vocabulary: &Vocabulary, split: Split) {
        let capitalization = match split {
            Split::Modern => Some(&mut self.capitalization),
            Split::Historical => None,
        };
        counts.count_line(line, vocabulary, capitalization);
    }

    fn finish_split(&mut self, split: Split, periods: Vec<(String, PeriodCounts)>) {
        let mut total_counts = TokenCounts::default();
        let mut total_tokens = 0u64;

        for (label, period) in &periods {
            if split == Split::Historical {
                self.historical_periods
                    .insert(label.clone(), period.counts.normalize(period.tokens));
            }
            total_counts.merge(&period.counts);
            total_tokens += period.tokens;
        }

        let total = total_counts.normalize(total_tokens);
        info!(
            split = %split,
            periods = periods.len(),
            tokens = total_tokens,
            words = total.len(),
            "Extracted frequencies"
        );
        match split {
            Split::Historical => self.historical_total = total,
            Split::Modern => self.modern_total = total,
        }
    }
}
