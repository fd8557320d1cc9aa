// Unit tests for corpus counting and neologism detection.
//
// Tests vocabulary filtering, per-period normalization, capitalization
// tracking, and the ordering and filtering rules of the neologism list.

use neologic::config::Hyperparameters;
use neologic::corpus::frequency::{CapitalizationProfile, FrequencyIndex, FrequencyTable};
use neologic::corpus::vocabulary::Vocabulary;
use neologic::corpus::Split;
use neologic::stats::neologisms::detect;

// ============================================================
// Vocabulary
// ============================================================

#[test]
fn hyphenated_lowercase_words_are_vocabulary() {
    let vocabulary = Vocabulary::from_words(["e-mail", "gadget"]);
    assert!(vocabulary.contains("e-mail"));
    assert!(vocabulary.contains("gadget"));
}

#[test]
fn digits_and_capitals_are_not_vocabulary() {
    let vocabulary = Vocabulary::from_words(["mp3", "Paris", "--"]);
    assert!(vocabulary.is_empty());
}

#[test]
fn vocabulary_load_filters_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nouns.txt");
    std::fs::write(&path, "gadget\nUSA\nmp3\n\nweb-site\ngadget\n").unwrap();

    let vocabulary = Vocabulary::load(&path).unwrap();
    assert!(vocabulary.contains("gadget"));
    assert!(vocabulary.contains("web-site"));
    assert!(!vocabulary.contains("usa"));
    assert_eq!(vocabulary.len(), 2);
}

// ============================================================
// Frequency extraction
// ============================================================

#[test]
fn historical_periods_normalize_by_all_tokens() {
    let vocabulary = Vocabulary::from_words(["widget", "device"]);
    let mut index = FrequencyIndex::new();
    index.ingest_texts(
        &vocabulary,
        Split::Historical,
        &[
            ("1810s", vec!["the widget and the device"]),
            ("1820s", vec!["widget widget", "of the"]),
        ],
    );

    let first = &index.historical_periods["1810s"];
    assert_eq!(first.get("widget"), 0.2);
    assert_eq!(first.get("device"), 0.2);
    assert_eq!(index.historical_periods["1820s"].get("widget"), 0.5);
    // 3 widgets over 9 tokens
    assert!((index.historical_total.get("widget") - 3.0 / 9.0).abs() < 1e-12);
}

#[test]
fn absent_word_has_zero_frequency() {
    let table = FrequencyTable::from_pairs([("widget", 0.5)]);
    assert_eq!(table.get("gadget"), 0.0);
    assert!(!table.contains("gadget"));
}

#[test]
fn capitalization_only_tracked_for_modern() {
    let vocabulary = Vocabulary::from_words(["gadget"]);
    let mut index = FrequencyIndex::new();
    index.ingest_texts(&vocabulary, Split::Historical, &[("1810s", vec!["Gadget Gadget"])]);
    assert_eq!(index.capitalization.dominant_form("gadget"), None);

    index.ingest_texts(
        &vocabulary,
        Split::Modern,
        &[("text_academic_rpe", vec!["gadget Gadget gadget"])],
    );
    assert_eq!(index.capitalization.dominant_form("gadget"), Some("gadget"));
    assert_eq!(index.capitalization.count("gadget", "Gadget"), 1);
}

#[test]
fn capitalization_tie_keeps_first_form() {
    let mut profile = CapitalizationProfile::default();
    profile.record("blog", "Blog");
    profile.record("blog", "blog");
    assert_eq!(profile.dominant_form("blog"), Some("Blog"));
}

// ============================================================
// Neologism detection
// ============================================================

fn index_from(modern: &str, historical: &str, vocabulary: &Vocabulary) -> FrequencyIndex {
    let mut index = FrequencyIndex::new();
    index.ingest_texts(vocabulary, Split::Historical, &[("1810s", vec![historical])]);
    index.ingest_texts(vocabulary, Split::Modern, &[("text_academic_rpe", vec![modern])]);
    index
}

#[test]
fn word_missing_from_historical_is_neologism() {
    let vocabulary = Vocabulary::from_words(["blog", "widget"]);
    let index = index_from("blog blog widget the", "widget the the the", &vocabulary);
    assert_eq!(detect(&index, &Hyperparameters::default()), vec!["blog"]);
}

#[test]
fn mostly_capitalized_word_is_not_neologism() {
    let vocabulary = Vocabulary::from_words(["blog"]);
    let index = index_from("Blog Blog blog", "the", &vocabulary);
    assert!(detect(&index, &Hyperparameters::default()).is_empty());
}

#[test]
fn short_words_dropped_before_cap() {
    let vocabulary = Vocabulary::from_words(["ux", "blog", "vlog"]);
    let index = index_from("ux ux ux blog blog vlog", "the", &vocabulary);
    let params = Hyperparameters {
        max_neologisms: 1,
        ..Hyperparameters::default()
    };
    assert_eq!(detect(&index, &params), vec!["blog"]);
}

#[test]
fn equal_frequencies_keep_first_seen_order() {
    let vocabulary = Vocabulary::from_words(["vlog", "blog"]);
    let index = index_from("vlog blog", "the", &vocabulary);
    assert_eq!(detect(&index, &Hyperparameters::default()), vec!["vlog", "blog"]);
}

#[test]
fn modest_growth_is_not_neologism() {
    let vocabulary = Vocabulary::from_words(["widget"]);
    // modern 0.5 vs historical 0.125: ratio 4, far below 20
    let index = index_from("widget the", "widget the the the the the the the", &vocabulary);
    assert!(detect(&index, &Hyperparameters::default()).is_empty());
}
