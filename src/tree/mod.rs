//! Binary merkle tree over ordered items
//!
//! - Leaves hold the input items, in input order
//! - Each internal node's hash is combined from its children's hashes
//! - Trees are immutable once built

mod merkle;
mod node;
mod print;

pub use merkle::MerkleTree;
pub use node::{Leaf, Node, NodeId, NodeRef, Side};
pub use print::{HexPrinter, Printer};
