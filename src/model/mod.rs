//! Hash values and the hashing collaborators used by the tree

mod hash;
mod traits;

pub use hash::Hash;
pub use traits::{Blake3, HashCombiner, HashValue, Hashable};
