// Full analysis pipeline: corpora -> word statistics -> pairs -> neighborhoods.
//
// Each stage persists its output under the configured output directory
// before the next one starts, so a failed embedding load still leaves the
// neologism list, growth table, and pairs on disk.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{info, warn};

use crate::config::Config;
use crate::corpus::frequency::FrequencyIndex;
use crate::corpus::vocabulary::Vocabulary;
use crate::corpus::Split;
use crate::embeddings::alignment::{self, OrthogonalMap};
use crate::embeddings::memory::InMemorySpace;
use crate::embeddings::traits::EmbeddingSpace;
use crate::neighborhood::cosine::NeighborhoodAnalyzer;
use crate::neighborhood::{euclidean, Metric, NeighborhoodSummary};
use crate::output::tables::{self, StatsWriter};
use crate::output::tagged_file_name;
use crate::stats::controls::{ControlMatcher, PairAssignment};
use crate::stats::growth::{self, GrowthTable};
use crate::stats::neologisms;

/// Options that select the control set and sweep.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub seed: Option<u64>,
    pub stable: bool,
    pub metric: Metric,
}

/// Word-level results of the corpus passes.
pub struct WordStatistics {
    pub vocabulary: Vocabulary,
    pub index: FrequencyIndex,
    pub neologisms: Vec<String>,
    pub growth: GrowthTable,
    pub pairs: PairAssignment,
}

/// Count both corpora, then detect neologisms, estimate growth, and pair
/// controls. Writes `neologisms.txt`, `freq_growth.tsv`, and the pair table.
pub fn extract_word_statistics(
    config: &Config,
    historical_dir: &Path,
    modern_dir: &Path,
    options: &RunOptions,
) -> Result<WordStatistics> {
    config.require_vocabulary()?;
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let vocabulary = Vocabulary::load(&config.vocabulary_path)?;
    println!("Loaded vocabulary with {} nouns", vocabulary.len());

    println!("Extracting historical and modern word frequencies...");
    let mut index = FrequencyIndex::new();
    index.extract_split(&vocabulary, Split::Historical, historical_dir)?;
    index.extract_split(&vocabulary, Split::Modern, modern_dir)?;

    let params = &config.hyperparameters;

    println!("Extracting a list of neologisms...");
    let neologisms = neologisms::detect(&index, params);
    neologisms::write_list(&neologisms, &config.output_file("neologisms.txt"))?;
    println!("  {} neologisms", neologisms.len());

    println!("Estimating word frequency growth trends...");
    let growth = growth::estimate(&vocabulary, &index.historical_periods, params.historical_periods);
    growth.write_tsv(&config.output_file("freq_growth.tsv"))?;
    println!("  {} words scored", growth.len());

    let kind = if options.stable { "stable" } else { "relaxed" };
    println!("Pairing neologisms with {kind} control words...");
    let pairs = ControlMatcher::new(&index, &growth, params)
        .with_stability_constraint(options.stable)
        .with_seed(options.seed)
        .pair(&neologisms);
    pairs.write_tsv(&config.output_file(&tagged_file_name("pairs", options.stable, options.seed, "tsv")))?;
    println!(
        "  {} pairs, {} neologisms without a control",
        pairs.len(),
        pairs.unmatched().len()
    );

    Ok(WordStatistics {
        vocabulary,
        index,
        neologisms,
        growth,
        pairs,
    })
}

/// Load the historical space and the modern space projected into it.
pub fn load_spaces(config: &Config) -> Result<(InMemorySpace, InMemorySpace)> {
    config.require_models()?;

    println!("Loading and aligning embedding models...");
    let historical = InMemorySpace::load_word2vec_text(&config.historical_model)?;
    let modern = InMemorySpace::load_word2vec_text(&config.modern_model)?;

    let transform = match &config.alignment_path {
        Some(path) => OrthogonalMap::load(path)?,
        None => {
            warn!("No alignment matrix configured, treating the modern model as pre-aligned");
            OrthogonalMap::identity(modern.dim())
        }
    };
    let projected = alignment::project(modern, &transform)?;
    if projected.dim() != historical.dim() {
        anyhow::bail!(
            "Projected modern space has {} dimensions but the historical space has {}",
            projected.dim(),
            historical.dim()
        );
    }

    info!(
        historical = historical.len(),
        modern = projected.len(),
        dim = historical.dim(),
        "Embedding spaces ready"
    );
    Ok((historical, projected))
}

/// Run the neighborhood sweep for the chosen metric and persist its outputs.
///
/// The cosine sweep writes per-pair density and growth tables plus the
/// feature table; both metrics write a JSON summary of the means.
pub fn run_neighborhoods(
    config: &Config,
    stats: &WordStatistics,
    historical: &dyn EmbeddingSpace,
    projected: &dyn EmbeddingSpace,
    options: &RunOptions,
) -> Result<NeighborhoodSummary> {
    let sweep = options.metric.sweep();
    let name = |kind: &str, ext: &str| {
        config.output_file(&tagged_file_name(kind, options.stable, options.seed, ext))
    };

    println!("Estimating neighborhood density and average frequency growth rates...");
    let summary = match options.metric {
        Metric::Cosine => {
            let density_path = name("density", "tsv");
            let growth_path = name("growth", "tsv");
            let mut writer = StatsWriter::create(&density_path, &growth_path)?;
            let analyzer =
                NeighborhoodAnalyzer::new(historical, projected, &stats.vocabulary, &stats.growth);
            let summary = analyzer.compute_neighborhood_stats(&stats.pairs, &sweep, Some(&mut writer))?;
            drop(writer);

            println!("Reformatting feature files for the regression...");
            let rows = tables::build_feature_table(&density_path, &growth_path, &sweep, &name("glm", "csv"))?;
            info!(rows, "Wrote feature table");
            summary
        }
        Metric::Euclidean => {
            euclidean::compute_neighborhood_stats(historical, projected, &stats.growth, &stats.pairs, &sweep)?
        }
    };

    summary.write_json(&name(&format!("summary.{}", summary.metric), "json"))?;
    Ok(summary)
}

/// The whole pipeline, corpora to summary.
pub fn run(
    config: &Config,
    historical_dir: &Path,
    modern_dir: &Path,
    options: &RunOptions,
) -> Result<NeighborhoodSummary> {
    let stats = extract_word_statistics(config, historical_dir, modern_dir, options)?;
    let (historical, projected) = load_spaces(config)?;
    let summary = run_neighborhoods(config, &stats, &historical, &projected, options)?;
    println!("{}", "Done.".bold());
    Ok(summary)
}
