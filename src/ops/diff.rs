//! Leaf diff between two merkle trees
//!
//! The walk descends both trees in lock-step and skips every pair of
//! subtrees whose hashes agree. Trees built from different numbers of items
//! have different depths, so the same item can sit one level deeper on one
//! side than on the other. A hash-keyed seen-set reconciles those cases: a
//! leaf met on the other side while the reference side is still an internal
//! node is remembered, and cancels a reported leaf with the same hash.

use crate::model::HashValue;
use crate::tree::{Leaf, MerkleTree, NodeRef};
use std::collections::HashSet;
use tracing::{debug, trace};

/// A pending pair of positions; `None` where a tree has no node
type Pair<'a, 'b, T, U, H> = (Option<NodeRef<'a, T, H>>, Option<NodeRef<'b, U, H>>);

/// Compute the leaves of `reference` that are missing from or differ in `other`
///
/// `reference` is authoritative: items only present in `other` are never
/// reported. Leaves come back in left-to-right order.
///
/// An empty `reference` yields nothing; against an empty `other` every
/// leaf of `reference` is reported. Leaves are matched by hash: an item
/// repeated within `reference` cancels its own earlier report, so it is
/// not reported at all.
pub fn diff<'a, T, U, H>(
    reference: &'a MerkleTree<T, H>,
    other: &MerkleTree<U, H>,
) -> Vec<Leaf<'a, T, H>>
where
    H: HashValue,
{
    let Some(local_root) = reference.root() else {
        debug!("reference tree is empty, nothing to report");
        return Vec::new();
    };

    let other_root = other.root();
    if let Some(other_root) = other_root {
        if local_root.hash() == other_root.hash() {
            trace!("root hashes match");
            return Vec::new();
        }
    }

    let mut walk = DiffWalk {
        seen: HashSet::new(),
        found: Vec::new(),
    };
    let mut stack = vec![(Some(local_root), other_root)];
    while let Some((local, other)) = stack.pop() {
        walk.visit(local, other, &mut stack);
    }

    debug!(
        reference_leaves = reference.len(),
        other_leaves = other.len(),
        differences = walk.found.len(),
        "diffed merkle trees"
    );
    walk.found
}

impl<T, H: HashValue> MerkleTree<T, H> {
    /// Diff this tree against `other`, using this tree as the reference
    ///
    /// See [`diff`].
    pub fn diff<'a, U>(&'a self, other: &MerkleTree<U, H>) -> Vec<Leaf<'a, T, H>> {
        diff(self, other)
    }
}

struct DiffWalk<'a, T, H> {
    /// Hashes of leaves met so far on either side
    seen: HashSet<H>,
    found: Vec<Leaf<'a, T, H>>,
}

impl<'a, T, H: HashValue> DiffWalk<'a, T, H> {
    /// Process one pair and schedule its children
    ///
    /// Children are pushed right first so the left subtree is finished
    /// before the right one starts, keeping results in pre-order.
    fn visit<'b, U>(
        &mut self,
        local: Option<NodeRef<'a, T, H>>,
        other: Option<NodeRef<'b, U, H>>,
        stack: &mut Vec<Pair<'a, 'b, T, U, H>>,
    ) {
        if let (Some(local), Some(other)) = (local, other) {
            if !local.is_leaf() && other.is_leaf() {
                let hash = other.hash();
                if self.seen.contains(hash) {
                    self.cancel(hash);
                } else {
                    self.seen.insert(hash.clone());
                }
            }
        }

        let Some(local) = local else {
            return;
        };

        let Some(other) = other else {
            // Nothing on the other side: everything below is a difference
            match local.as_leaf() {
                Some(leaf) => self.collect(leaf),
                None => {
                    stack.push((local.right(), None));
                    stack.push((local.left(), None));
                }
            }
            return;
        };

        if local.hash() == other.hash() {
            return;
        }

        match local.as_leaf() {
            Some(leaf) => {
                if !self.seen.contains(leaf.hash()) {
                    self.record(leaf);
                }
            }
            None => {
                stack.push((local.right(), other.right()));
                stack.push((local.left(), other.left()));
            }
        }
    }

    fn collect(&mut self, leaf: Leaf<'a, T, H>) {
        if self.seen.contains(leaf.hash()) {
            self.cancel(leaf.hash());
        } else {
            self.record(leaf);
        }
    }

    fn record(&mut self, leaf: Leaf<'a, T, H>) {
        self.seen.insert(leaf.hash().clone());
        self.found.push(leaf);
    }

    /// Withdraw an already reported leaf whose hash turned up elsewhere
    fn cancel(&mut self, hash: &H) {
        if let Some(pos) = self.found.iter().position(|leaf| leaf.hash() == hash) {
            let leaf = self.found.remove(pos);
            trace!(index = leaf.index(), "cancelled depth mismatch");
        }
    }
}
