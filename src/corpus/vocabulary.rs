// Vocabulary of candidate nouns, fixed for the whole run.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Ordered, duplicate-free set of analysis words.
///
/// Order is the order of first appearance in the source file. Several later
/// stages (growth table, control candidate pool) iterate in this order, so it
/// is part of the reproducibility contract.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashSet<String>,
}

impl Vocabulary {
    /// Load a vocabulary file, one word per line.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary {}", path.display()))?;
        let vocab = Self::from_words(text.lines().map(str::trim));
        debug!(words = vocab.len(), path = %path.display(), "Loaded vocabulary");
        Ok(vocab)
    }

    /// Build a vocabulary from arbitrary strings, keeping only acceptable
    /// words and dropping repeats.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::default();
        for word in words {
            let word = word.as_ref();
            if is_vocabulary_word(word) && vocab.index.insert(word.to_string()) {
                vocab.words.push(word.to_string());
            }
        }
        vocab
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Lowercase alphabetic, with hyphens permitted anywhere.
fn is_vocabulary_word(word: &str) -> bool {
    let mut letters = word.chars().filter(|&c| c != '-').peekable();
    letters.peek().is_some() && letters.all(|c| c.is_alphabetic() && !c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_lowercase_and_hyphens() {
        let vocab = Vocabulary::from_words(["gadget", "e-mail", "café"]);
        assert_eq!(vocab.len(), 3);
        assert!(vocab.contains("e-mail"));
    }

    #[test]
    fn test_rejects_non_words() {
        let vocab = Vocabulary::from_words(["", "-", "mp3", "Paris", "two words", "ok"]);
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["ok"]);
    }

    #[test]
    fn test_keeps_first_occurrence_order() {
        let vocab = Vocabulary::from_words(["widget", "gadget", "widget", "device"]);
        assert_eq!(
            vocab.iter().collect::<Vec<_>>(),
            vec!["widget", "gadget", "device"]
        );
    }
}
