// Pipelines — the batch analysis run and training-corpus preparation.

pub mod analysis;
pub mod training;
