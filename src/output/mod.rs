// Output formatting — persisted tables and terminal display.

pub mod tables;
pub mod terminal;

/// Build the `<stable|relaxed>[.seed<N>]` tag that distinguishes the outputs
/// of different control-set configurations.
pub fn config_tag(stable: bool, seed: Option<u64>) -> String {
    let base = if stable { "stable" } else { "relaxed" };
    match seed {
        Some(seed) => format!("{base}.seed{seed}"),
        None => base.to_string(),
    }
}

/// File name for a configuration-dependent output, e.g. `pairs.stable.seed3.tsv`.
pub fn tagged_file_name(kind: &str, stable: bool, seed: Option<u64>, ext: &str) -> String {
    format!("{kind}.{}.{ext}", config_tag(stable, seed))
}
