//! Fixed-width bit vectors and contiguous signature arenas used by the LSH
//! engine and the SimilarPairs index.

mod arena;
mod bitset;

pub use arena::SignatureArena;
pub use bitset::{words_for_bits, BitSet};
