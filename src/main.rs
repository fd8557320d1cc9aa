use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use neologic::config::Config;
use neologic::corpus::vocabulary::Vocabulary;
use neologic::corpus::Split;
use neologic::neighborhood::cosine::NeighborhoodAnalyzer;
use neologic::neighborhood::Metric;
use neologic::output::terminal;
use neologic::pipeline::{analysis, training};
use neologic::stats::growth::GrowthTable;

/// Neologic: do new words emerge in sparse semantic neighborhoods?
///
/// Finds nouns that are far more frequent in a modern corpus than in a
/// historical one, pairs each with a frequency-matched control, and compares
/// the density and frequency growth of their historical neighborhoods.
#[derive(Parser)]
#[command(name = "neologic", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis over a historical and a modern corpus
    Run {
        /// Root of the historical corpus (one subdirectory per decade)
        historical: PathBuf,

        /// Root of the modern corpus (one subdirectory per genre)
        modern: PathBuf,

        /// Shuffle control candidates with this seed
        #[arg(long)]
        seed: Option<u64>,

        /// Only accept controls whose frequency did not trend historically
        #[arg(long)]
        stable: bool,

        /// Neighborhood metric (default: cosine)
        #[arg(long, value_enum, default_value = "cosine")]
        metric: Metric,
    },

    /// Show the nearest historical neighbors of some words
    Neighbors {
        /// Words to look up
        #[arg(required = true)]
        words: Vec<String>,

        /// Neighbors to show per word (default: 10)
        #[arg(long, default_value = "10")]
        count: usize,

        /// Query with the words' historical vectors instead of their
        /// projected modern ones
        #[arg(long)]
        historical: bool,
    },

    /// Write a split's sentences, one per line, for embedding training
    PrepareTraining {
        /// Root of the corpus
        data_dir: PathBuf,

        /// Which corpus layout to read
        #[arg(value_enum)]
        split: Split,

        /// Output text file
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("neologic=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            historical,
            modern,
            seed,
            stable,
            metric,
        } => {
            let config = Config::load()?;
            for (label, dir) in [("Historical", &historical), ("Modern", &modern)] {
                if !dir.is_dir() {
                    anyhow::bail!("{label} corpus directory not found: {}", dir.display());
                }
            }

            info!(stable, ?seed, ?metric, "Starting analysis");
            let options = analysis::RunOptions { seed, stable, metric };
            let summary = analysis::run(&config, &historical, &modern, &options)?;
            terminal::display_summary(&summary);
            println!("Outputs written to: {}", config.output_dir.display());
        }

        Commands::Neighbors {
            words,
            count,
            historical,
        } => {
            let config = Config::load()?;
            config.require_vocabulary()?;
            let vocabulary = Vocabulary::load(&config.vocabulary_path)?;
            let (historical_space, projected_space) = analysis::load_spaces(&config)?;
            let growth = GrowthTable::default();
            let analyzer =
                NeighborhoodAnalyzer::new(&historical_space, &projected_space, &vocabulary, &growth);

            println!();
            for word in &words {
                match analyzer.fetch_neighbors(word, count, !historical) {
                    Ok(neighbors) => terminal::display_neighbors(word, &neighbors),
                    Err(e) => println!("  {:<20} {}", word.bold(), e.to_string().yellow()),
                }
            }
            println!();
        }

        Commands::PrepareTraining {
            data_dir,
            split,
            output,
        } => {
            println!("Preparing {split} training sentences from {}...", data_dir.display());
            let written = training::prepare(&data_dir, split, &output)?;
            println!("\n{}", "Training corpus ready.".bold());
            println!("  Sentences: {written}");
            println!("  Output: {}", output.display());
        }
    }

    Ok(())
}
