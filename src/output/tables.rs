// Tabular output — TSV tables for pairs and per-pair statistics, and the
// CSV feature table consumed by the downstream regression.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Writer, WriterBuilder};

use crate::neighborhood::{PairStats, RadiusSweep, WordStats};

/// Placeholder written where a growth mean is undefined.
pub const UNDEFINED: &str = "NaN";

/// Headerless tab-separated writer.
pub fn tsv_writer(path: &Path) -> Result<Writer<File>> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))
}

/// Write one item per line.
pub fn write_lines<'a, I>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    file.flush()?;
    Ok(())
}

/// Parallel density and growth tables, one flushed row per pair.
///
/// Row layout: `word, v_1..v_k, paired_word, v_1..v_k`.
pub struct StatsWriter {
    density: Writer<File>,
    growth: Writer<File>,
}

impl StatsWriter {
    pub fn create(density_path: &Path, growth_path: &Path) -> Result<Self> {
        Ok(Self {
            density: tsv_writer(density_path)?,
            growth: tsv_writer(growth_path)?,
        })
    }

    pub fn write_pair(&mut self, stats: &PairStats) -> Result<()> {
        let mut density_row = density_cells(&stats.neologism);
        density_row.extend(density_cells(&stats.control));
        self.density.write_record(&density_row)?;
        self.density.flush()?;

        let mut growth_row = growth_cells(&stats.neologism);
        growth_row.extend(growth_cells(&stats.control));
        self.growth.write_record(&growth_row)?;
        self.growth.flush()?;
        Ok(())
    }
}

fn density_cells(stats: &WordStats) -> Vec<String> {
    std::iter::once(stats.word.clone())
        .chain(stats.density.iter().map(|d| d.to_string()))
        .collect()
}

fn growth_cells(stats: &WordStats) -> Vec<String> {
    std::iter::once(stats.word.clone())
        .chain(stats.growth.iter().map(|g| match g {
            Some(v) => v.to_string(),
            None => UNDEFINED.to_string(),
        }))
        .collect()
}

/// Rows of a density or growth table, split into the two halves.
struct PairRow {
    neologism: (String, Vec<String>),
    control: (String, Vec<String>),
}

fn read_pair_table(path: &Path, radii: usize) -> Result<Vec<PairRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {} of {}", i + 1, path.display()))?;
        if record.len() != 2 * (radii + 1) {
            anyhow::bail!(
                "Row {} of {} has {} columns, expected {}",
                i + 1,
                path.display(),
                record.len(),
                2 * (radii + 1)
            );
        }
        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        rows.push(PairRow {
            neologism: (cells[0].clone(), cells[1..=radii].to_vec()),
            control: (cells[radii + 1].clone(), cells[radii + 2..].to_vec()),
        });
    }
    Ok(rows)
}

/// Join the density and growth tables into the regression feature table.
///
/// Header: `Word, DensityAtRadius<r>..., SpearmanAtRadius<r>..., IsNeologism`.
/// Neologism rows come first (IsNeologism = 1), then control rows (0), each
/// word once, in table order.
pub fn build_feature_table(
    density_path: &Path,
    growth_path: &Path,
    sweep: &RadiusSweep,
    out: &Path,
) -> Result<usize> {
    let radii = sweep.len();
    let density_rows = read_pair_table(density_path, radii)?;
    let growth_rows = read_pair_table(growth_path, radii)?;

    let mut neologisms: Vec<String> = Vec::new();
    let mut controls: Vec<String> = Vec::new();
    let mut density: HashMap<String, Vec<String>> = HashMap::new();
    let mut growth: HashMap<String, Vec<String>> = HashMap::new();

    for row in density_rows {
        push_unique(&mut neologisms, &row.neologism.0);
        push_unique(&mut controls, &row.control.0);
        density.insert(row.neologism.0, row.neologism.1);
        density.insert(row.control.0, row.control.1);
    }
    for row in growth_rows {
        growth.insert(row.neologism.0, row.neologism.1);
        growth.insert(row.control.0, row.control.1);
    }

    let mut writer = WriterBuilder::new()
        .from_path(out)
        .with_context(|| format!("Failed to create {}", out.display()))?;

    let labels = sweep.labels();
    let header: Vec<String> = std::iter::once("Word".to_string())
        .chain(labels.iter().map(|r| format!("DensityAtRadius{r}")))
        .chain(labels.iter().map(|r| format!("SpearmanAtRadius{r}")))
        .chain(std::iter::once("IsNeologism".to_string()))
        .collect();
    writer.write_record(&header)?;

    let mut written = 0;
    for (words, flag) in [(&neologisms, "1"), (&controls, "0")] {
        for word in words {
            let Some(g) = growth.get(word) else {
                anyhow::bail!("'{}' is in {} but not in {}", word, density_path.display(), growth_path.display());
            };
            let row: Vec<&str> = std::iter::once(word.as_str())
                .chain(density[word].iter().map(String::as_str))
                .chain(g.iter().map(String::as_str))
                .chain(std::iter::once(flag))
                .collect();
            writer.write_record(&row)?;
            writer.flush()?;
            written += 1;
        }
    }
    Ok(written)
}

fn push_unique(list: &mut Vec<String>, word: &str) {
    if !list.iter().any(|w| w == word) {
        list.push(word.to_string());
    }
}
