// Colored terminal output for neighborhood summaries and neighbor lists.
//
// main.rs delegates all display formatting here.

use colored::Colorize;

use crate::embeddings::traits::Neighbor;
use crate::neighborhood::{MeanStats, NeighborhoodSummary};

/// Display the corpus-wide means as a table, one column per radius.
pub fn display_summary(summary: &NeighborhoodSummary) {
    println!(
        "\n{}",
        format!(
            "=== Neighborhood statistics ({}, {} pairs, {} skipped) ===",
            summary.metric, summary.pairs_total, summary.pairs_skipped
        )
        .bold()
    );
    println!();

    let header: Vec<String> = summary
        .thresholds
        .iter()
        .map(|r| format!("{r:>9.3}"))
        .collect();
    println!("  {:<22}{}", "Radius".dimmed(), header.join("").dimmed());
    println!("  {}", "-".repeat(22 + 9 * summary.thresholds.len()).dimmed());

    print_row("Neologism density", &summary.neologisms.density.iter().map(|d| Some(*d)).collect::<Vec<_>>());
    print_row("Control density", &summary.controls.density.iter().map(|d| Some(*d)).collect::<Vec<_>>());
    print_row("Neologism growth", &summary.neologisms.growth);
    print_row("Control growth", &summary.controls.growth);
    println!();

    warn_undefined("neologism", &summary.neologisms);
    warn_undefined("control", &summary.controls);
}

fn print_row(label: &str, values: &[Option<f64>]) {
    let cells: String = values.iter().map(|v| format!("{:>9}", format_mean(*v))).collect();
    println!("  {:<22}{}", label, cells);
}

fn warn_undefined(kind: &str, means: &MeanStats) {
    let undefined = means.growth.iter().filter(|g| g.is_none()).count();
    if undefined > 0 {
        println!(
            "  {} mean {} growth is undefined at {} radii (no neighbor had a growth score)",
            "!".yellow(),
            kind,
            undefined
        );
    }
}

/// Three decimals, or "undefined".
pub fn format_mean(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "undefined".to_string(),
    }
}

/// Display a word's nearest neighbors with their similarities.
pub fn display_neighbors(word: &str, neighbors: &[Neighbor]) {
    let cells: Vec<String> = neighbors
        .iter()
        .map(|(w, sim)| format!("{} {}", w, format!("({sim:.3})").dimmed()))
        .collect();
    println!("  {:<20} {}", word.bold(), cells.join("  "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mean() {
        assert_eq!(format_mean(Some(0.12345)), "0.123");
        assert_eq!(format_mean(None), "undefined");
    }
}
