// Embedding spaces — lookup and nearest-neighbor queries over trained vectors.

pub mod alignment;
pub mod memory;
pub mod traits;
