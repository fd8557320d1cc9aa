// Training-corpus preparation for the external embedding trainer.
//
// Reads a split with its own file layout, breaks each text into sentences at
// terminal punctuation tokens, lowercases, drops the corpus's `@` redaction
// marks and `<p>` paragraph markers, and writes one sentence per line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::corpus::reader;
use crate::corpus::Split;

const SENTENCE_END: [&str; 3] = [".", "!", "?"];

/// Split a text line into lowercased sentences.
pub fn sentences(text: &str) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for token in text.split_whitespace() {
        let lower = token.to_lowercase();
        if token == "@" || lower == "<p>" {
            continue;
        }
        let ends = SENTENCE_END.contains(&token);
        current.push(lower);
        if ends {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Write the sentences of every file in a split to `output`. Returns the
/// number of sentences written.
pub fn prepare(data_dir: &Path, split: Split, output: &Path) -> Result<usize> {
    if !data_dir.is_dir() {
        anyhow::bail!("Corpus directory not found: {}", data_dir.display());
    }

    let file = File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let mut out = BufWriter::new(file);
    let corpus_reader = split.training_reader();
    let mut written = 0usize;

    for &period in split.periods() {
        let dir = data_dir.join(period);
        if !dir.is_dir() {
            warn!(split = %split, period, "Missing subdirectory, skipping");
            continue;
        }
        info!(dir = %dir.display(), "Reading directory");

        for path in reader::period_files(&dir)? {
            let texts = match corpus_reader.texts(&path) {
                Ok(texts) => texts,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Failed to read corpus file, treating as empty");
                    continue;
                }
            };
            for text in &texts {
                for sentence in sentences(text) {
                    writeln!(out, "{}", sentence.join(" "))?;
                    written += 1;
                }
            }
        }
    }

    out.flush()?;
    info!(split = %split, sentences = written, output = %output.display(), "Prepared training corpus");
    Ok(written)
}
