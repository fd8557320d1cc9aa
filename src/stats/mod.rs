// Word-level statistics — neologism detection, growth rates, control matching.

pub mod controls;
pub mod growth;
pub mod neologisms;
