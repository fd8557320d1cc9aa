// Composition tests — the whole pipeline over a miniature corpus.
//
// These tests chain every stage:
//   corpus files -> frequencies -> neologisms -> growth -> pairs -> neighborhoods
// against a three-decade historical corpus, a one-genre modern corpus, and
// two tiny embedding models, all written into a temp directory.

use std::path::{Path, PathBuf};

use neologic::config::{Config, Hyperparameters};
use neologic::neighborhood::Metric;
use neologic::pipeline::analysis::{self, RunOptions};

struct Fixture {
    _dir: tempfile::TempDir,
    config: Config,
    historical: PathBuf,
    modern: PathBuf,
}

fn write(path: &Path, text: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, text).unwrap();
}

/// gadget never occurs historically and takes 2 of 16 modern tokens.
/// widget falls (2, 1, 0 of 8 tokens), device rises (1, 2, 3), apparatus is
/// flat. In the embedding space gadget sits near device (cosine 0.6), a bit
/// further from apparatus (about 0.46), and opposite widget.
fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let historical = root.join("coha");
    write(&historical.join("1810s/a.txt"), "widget widget device apparatus the the the the\n");
    write(&historical.join("1820s/a.txt"), "widget the device device apparatus the the the\n");
    write(&historical.join("1830s/a.txt"), "the the device device device apparatus the the\n");

    let modern = root.join("coca");
    write(
        &modern.join("text_academic_rpe/a.txt"),
        "gadget gadget the the the the the the\nthe the the the the the the the\n",
    );

    write(&root.join("vocabulary.txt"), "gadget\nwidget\ndevice\napparatus\n");
    write(
        &root.join("historical.w2v.txt"),
        "3 3\nwidget -1 0 0\ndevice 0.6 0.8 0\napparatus 0.46 0 0.888\n",
    );
    write(
        &root.join("modern.w2v.txt"),
        "3 3\ngadget 1 0 0\nwidget -1 0 0\ndevice 0.6 0.8 0\n",
    );

    let config = Config {
        vocabulary_path: root.join("vocabulary.txt"),
        output_dir: root.join("out"),
        historical_model: root.join("historical.w2v.txt"),
        modern_model: root.join("modern.w2v.txt"),
        alignment_path: None,
        hyperparameters: Hyperparameters::default(),
    };

    Fixture {
        _dir: dir,
        config,
        historical,
        modern,
    }
}

fn read(config: &Config, name: &str) -> String {
    std::fs::read_to_string(config.output_file(name)).unwrap()
}

// ============================================================
// Chain: corpora -> neologisms -> pairs -> cosine neighborhoods
// ============================================================

#[test]
fn cosine_run_produces_every_table() {
    let f = fixture();
    let options = RunOptions {
        seed: None,
        stable: false,
        metric: Metric::Cosine,
    };
    let summary = analysis::run(&f.config, &f.historical, &f.modern, &options).unwrap();

    assert_eq!(read(&f.config, "neologisms.txt"), "gadget\n");
    assert_eq!(read(&f.config, "pairs.relaxed.tsv"), "gadget\twidget\n");

    let growth = read(&f.config, "freq_growth.tsv");
    let scored: Vec<&str> = growth.lines().map(|l| l.split('\t').next().unwrap()).collect();
    assert_eq!(scored, vec!["widget", "device"]);

    assert_eq!(
        read(&f.config, "density.relaxed.tsv"),
        "gadget\t1\t1\t1\t1\t2\t2\t2\t2\twidget\t0\t0\t0\t0\t0\t0\t0\t0\n"
    );

    let glm = read(&f.config, "glm.relaxed.csv");
    let rows: Vec<&str> = glm.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].starts_with("Word,DensityAtRadius0.550,"));
    assert!(rows[1].starts_with("gadget,1,1,1,1,2,2,2,2,"));
    assert!(rows[1].ends_with(",1"));
    assert!(rows[2].starts_with("widget,0,"));
    assert!(rows[2].ends_with("NaN,0"));

    assert_eq!(summary.pairs_total, 1);
    assert_eq!(summary.pairs_skipped, 0);
    assert_eq!(summary.neologisms.density, vec![1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0]);
    // device is the only scored neighbor of gadget and it rises perfectly
    assert!(summary
        .neologisms
        .growth
        .iter()
        .all(|g| (g.unwrap() - 1.0).abs() < 1e-12));
    assert!(summary.controls.density.iter().all(|&d| d == 0.0));
    assert!(summary.controls.growth.iter().all(Option::is_none));

    let json: serde_json::Value =
        serde_json::from_str(&read(&f.config, "summary.cosine.relaxed.json")).unwrap();
    assert_eq!(json["metric"], "cosine");
    assert!(json["controls"]["growth"][0].is_null());
}

#[test]
fn stable_run_leaves_neologism_unpaired() {
    let f = fixture();
    let options = RunOptions {
        seed: None,
        stable: true,
        metric: Metric::Cosine,
    };
    let summary = analysis::run(&f.config, &f.historical, &f.modern, &options).unwrap();

    // Both scored words trend, so no stable control exists
    assert_eq!(read(&f.config, "pairs.stable.tsv"), "");
    assert_eq!(summary.pairs_total, 0);
    assert_eq!(summary.neologisms.density, vec![0.0; 8]);
    assert!(summary.neologisms.growth.iter().all(Option::is_none));
}

// ============================================================
// Chain: corpora -> pairs -> Euclidean neighborhoods
// ============================================================

#[test]
fn euclidean_run_uses_strict_radii_over_all_words() {
    let f = fixture();
    let options = RunOptions {
        seed: Some(3),
        stable: false,
        metric: Metric::Euclidean,
    };
    let summary = analysis::run(&f.config, &f.historical, &f.modern, &options).unwrap();

    // widget is the only control in the frequency window, whatever the shuffle
    assert_eq!(read(&f.config, "pairs.relaxed.seed3.tsv"), "gadget\twidget\n");
    assert!(f.config.output_file("summary.euclidean.relaxed.seed3.json").exists());
    assert!(!f.config.output_file("density.relaxed.seed3.tsv").exists());

    // widget sits at exactly 2.0 from gadget
    assert_eq!(summary.neologisms.density, vec![2.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0]);
    assert!((summary.neologisms.growth[0].unwrap() - 1.0).abs() < 1e-12);
    assert!(summary.neologisms.growth[1].unwrap().abs() < 1e-12);
    // widget's own vector is excluded from its neighborhood
    assert_eq!(summary.controls.density, vec![2.0; 7]);
}

// ============================================================
// Failure modes
// ============================================================

#[test]
fn missing_vocabulary_is_fatal() {
    let mut f = fixture();
    f.config.vocabulary_path = f.config.output_dir.join("nope.txt");
    let options = RunOptions {
        seed: None,
        stable: false,
        metric: Metric::Cosine,
    };
    assert!(analysis::run(&f.config, &f.historical, &f.modern, &options).is_err());
}

#[test]
fn mismatched_model_dimensions_fail_before_any_sweep_output() {
    let f = fixture();
    std::fs::write(&f.config.modern_model, "2 2\ngadget 1 0\nwidget -1 0\n").unwrap();
    let options = RunOptions {
        seed: None,
        stable: false,
        metric: Metric::Cosine,
    };
    let err = analysis::run(&f.config, &f.historical, &f.modern, &options).unwrap_err();
    assert!(err.to_string().contains("dimensions"));
    assert_eq!(read(&f.config, "pairs.relaxed.tsv"), "gadget\twidget\n");
    assert!(!f.config.output_file("density.relaxed.tsv").exists());
    assert!(!f.config.output_file("growth.relaxed.tsv").exists());
}

#[test]
fn word_statistics_survive_a_missing_model() {
    let mut f = fixture();
    f.config.modern_model = f.config.output_dir.join("missing.w2v.txt");
    let options = RunOptions {
        seed: None,
        stable: false,
        metric: Metric::Cosine,
    };
    assert!(analysis::run(&f.config, &f.historical, &f.modern, &options).is_err());
    assert_eq!(read(&f.config, "neologisms.txt"), "gadget\n");
    assert_eq!(read(&f.config, "pairs.relaxed.tsv"), "gadget\twidget\n");
}
