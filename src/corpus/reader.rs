// Corpus file readers.
//
// The two corpora ship differently shaped files. Historical files carry
// metadata on the first two lines and the whole text on the third; modern
// files carry a one-line header followed by the body. Frequency counting
// ignores the layout and reads every line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

/// How the text of a single corpus file is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusReader {
    /// Every line of the file.
    AllLines,
    /// Exactly `expected` lines, of which only `line` (0-based) is text.
    /// Files with any other line count are skipped.
    FixedLine { line: usize, expected: usize },
    /// Drop the first `skip` lines, keep the rest.
    SkipHeader { skip: usize },
}

impl CorpusReader {
    /// Read a file and return its text lines.
    ///
    /// Fails if the file can't be read or isn't valid UTF-8; callers treat a
    /// failure as an empty contribution.
    pub fn texts(&self, path: &Path) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus file {}", path.display()))?;
        Ok(self.extract(&content, path))
    }

    fn extract(&self, content: &str, path: &Path) -> Vec<String> {
        let lines = content.lines().map(str::to_string);
        match *self {
            CorpusReader::AllLines => lines.collect(),
            CorpusReader::FixedLine { line, expected } => {
                let all: Vec<String> = lines.collect();
                if all.len() != expected {
                    warn!(
                        file = %path.display(),
                        lines = all.len(),
                        expected,
                        "Unexpected line count, skipping file"
                    );
                    return Vec::new();
                }
                all.into_iter().nth(line).into_iter().collect()
            }
            CorpusReader::SkipHeader { skip } => lines.skip(skip).collect(),
        }
    }
}

/// List the `*.txt` files of a period directory in sorted order.
pub fn period_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(reader: CorpusReader, content: &str) -> Vec<String> {
        reader.extract(content, Path::new("test.txt"))
    }

    #[test]
    fn test_all_lines() {
        assert_eq!(extract(CorpusReader::AllLines, "a b\nc\n"), vec!["a b", "c"]);
    }

    #[test]
    fn test_fixed_line_takes_third_line() {
        let reader = CorpusReader::FixedLine {
            line: 2,
            expected: 3,
        };
        assert_eq!(extract(reader, "id\n\nthe text\n"), vec!["the text"]);
    }

    #[test]
    fn test_fixed_line_skips_wrong_shape() {
        let reader = CorpusReader::FixedLine {
            line: 2,
            expected: 3,
        };
        assert!(extract(reader, "only\ntwo\n").is_empty());
    }

    #[test]
    fn test_skip_header() {
        let reader = CorpusReader::SkipHeader { skip: 1 };
        assert_eq!(extract(reader, "##header\nbody one\nbody two"), vec!["body one", "body two"]);
    }

    #[test]
    fn test_period_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "x").unwrap();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        std::fs::write(dir.path().join("notes.md"), "x").unwrap();
        let files = period_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }
}
