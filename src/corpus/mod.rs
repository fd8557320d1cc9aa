// Corpus access — vocabulary, file readers, and frequency tables.

pub mod frequency;
pub mod reader;
pub mod vocabulary;

use std::fmt;
use std::str::FromStr;

/// Which of the two time-separated corpora a pass reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Split {
    /// Decade-binned historical text (1810s through 1980s).
    Historical,
    /// Genre-binned modern text.
    Modern,
}

const HISTORICAL_PERIODS: [&str; 18] = [
    "1810s", "1820s", "1830s", "1840s", "1850s", "1860s", "1870s", "1880s", "1890s", "1900s",
    "1910s", "1920s", "1930s", "1940s", "1950s", "1960s", "1970s", "1980s",
];

const MODERN_PERIODS: [&str; 5] = [
    "text_academic_rpe",
    "text_fiction_awq",
    "text_magazine_qch",
    "text_newspaper_lsp",
    "text_spoken_kde",
];

impl Split {
    /// Period subdirectory names, in processing order.
    pub fn periods(self) -> &'static [&'static str] {
        match self {
            Split::Historical => &HISTORICAL_PERIODS,
            Split::Modern => &MODERN_PERIODS,
        }
    }

    /// Reader for the embedding-training format of this split's files.
    pub fn training_reader(self) -> reader::CorpusReader {
        match self {
            Split::Historical => reader::CorpusReader::FixedLine {
                line: 2,
                expected: 3,
            },
            Split::Modern => reader::CorpusReader::SkipHeader { skip: 1 },
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Historical => write!(f, "historical"),
            Split::Modern => write!(f, "modern"),
        }
    }
}

impl FromStr for Split {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "historical" => Ok(Split::Historical),
            "modern" => Ok(Split::Modern),
            other => anyhow::bail!("Invalid data split '{other}' (expected 'historical' or 'modern')"),
        }
    }
}
