//! # merkle_diff
//!
//! Binary merkle trees over ordered data, and a leaf diff that tolerates
//! trees of different depths.
//!
//! Two replicas of a dataset each build a tree over their items in the same
//! order. Comparing the trees top-down, and only descending where hashes
//! disagree, finds the items of one replica that are missing from or differ
//! in the other without comparing every item.
//!
//! ## Core Concepts
//!
//! - **Leaves**: input items, hashed by [`Hashable`] or a closure
//! - **Internal nodes**: one or two children combined by a [`HashCombiner`]
//! - **Levels**: 0 at the leaves, growing towards the root
//! - **Diff**: the reference tree's leaves that the other tree lacks
//!
//! ## Example
//!
//! ```
//! use merkle_diff::{Blake3, MerkleTree};
//!
//! let ours = MerkleTree::build(["A", "B", "C", "D"], &Blake3);
//! let theirs = MerkleTree::build(["A", "B", "Z", "D"], &Blake3);
//!
//! let missing: Vec<&str> = ours.diff(&theirs).iter().map(|leaf| *leaf.data()).collect();
//! assert_eq!(missing, vec!["C"]);
//! ```

pub mod config;
pub mod model;
pub mod ops;
pub mod tree;

mod error;

pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use model::{Blake3, Hash, HashCombiner, HashValue, Hashable};
pub use ops::diff;
pub use tree::{HexPrinter, Leaf, MerkleTree, Node, NodeId, NodeRef, Printer, Side};
