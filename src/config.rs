use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;

/// Fixed hyperparameters of the analysis.
///
/// These are the values the published results were produced with; they are
/// grouped here so tests can tighten or loosen them without touching the
/// algorithms.
#[derive(Debug, Clone)]
pub struct Hyperparameters {
    /// A neologism must be at least this many times more frequent in the
    /// modern corpus than in the historical one.
    pub min_frequency_ratio: f64,
    /// Neologisms shorter than this (in characters) are dropped.
    pub min_word_len: usize,
    /// Cap on the neologism list length.
    pub max_neologisms: usize,
    /// Stable controls must have |growth| strictly below this.
    pub max_spearman_correlation: f64,
    /// Number of leading historical periods used for growth estimation.
    pub historical_periods: usize,
    /// Neologism and control lengths must differ by strictly less than this.
    pub max_length_difference: usize,
    /// Exclusive bounds on freq_mod(neologism) / freq_hist(control).
    pub control_ratio_window: (f64, f64),
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            min_frequency_ratio: 20.0,
            min_word_len: 3,
            max_neologisms: 1000,
            max_spearman_correlation: 0.1,
            historical_periods: 18,
            max_length_difference: 2,
            // (0.75, 1.33) rather than (0.75, 1.25) reproduces the published pairs
            control_ratio_window: (0.75, 1.33),
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// Every value has a default so a checkout with the conventional
/// `files/` and `models/` layout runs without any `.env` file.
pub struct Config {
    /// Noun vocabulary, one word per line.
    pub vocabulary_path: PathBuf,
    /// Directory all generated tables are written to.
    pub output_dir: PathBuf,
    /// Historical embedding model (word2vec text format).
    pub historical_model: PathBuf,
    /// Modern embedding model (word2vec text format).
    pub modern_model: PathBuf,
    /// Matrix mapping modern vectors into historical coordinates. When unset
    /// the modern model is taken to be aligned already.
    pub alignment_path: Option<PathBuf>,
    pub hyperparameters: Hyperparameters,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Ok(Self {
            vocabulary_path: env_path("NEOLOGIC_VOCABULARY", "files/vocabulary.txt"),
            output_dir: env_path("NEOLOGIC_OUTPUT_DIR", "files"),
            historical_model: env_path("NEOLOGIC_HISTORICAL_MODEL", "models/historical.w2v.txt"),
            modern_model: env_path("NEOLOGIC_MODERN_MODEL", "models/modern.w2v.txt"),
            alignment_path: env::var("NEOLOGIC_ALIGNMENT")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            hyperparameters: Hyperparameters::default(),
        })
    }

    /// Check that the vocabulary file exists.
    /// Call this before any corpus pass.
    pub fn require_vocabulary(&self) -> Result<()> {
        if !self.vocabulary_path.exists() {
            anyhow::bail!(
                "Vocabulary not found: {}\n\
                 Set NEOLOGIC_VOCABULARY to a file with one noun per line.",
                self.vocabulary_path.display()
            );
        }
        Ok(())
    }

    /// Check that both embedding models (and the alignment matrix, if one is
    /// configured) are present. Call this before loading embeddings.
    pub fn require_models(&self) -> Result<()> {
        for (label, path) in [
            ("Historical", &self.historical_model),
            ("Modern", &self.modern_model),
        ] {
            if !path.exists() {
                anyhow::bail!(
                    "{label} embedding model not found: {}\n\
                     Train it externally on the output of `neologic prepare-training`.",
                    path.display()
                );
            }
        }
        if let Some(path) = &self.alignment_path {
            if !path.exists() {
                anyhow::bail!("Alignment matrix not found: {}", path.display());
            }
        }
        Ok(())
    }

    /// Path of a generated file inside the output directory.
    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(default).to_path_buf())
}
