// Neologic: neighborhood statistics of emerging words
//
// This is the library root. Each module corresponds to a stage of the
// analysis: corpus counting, word-level statistics, embedding spaces,
// neighborhood sweeps, and persisted or displayed output.

pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod neighborhood;
pub mod output;
pub mod pipeline;
pub mod stats;
