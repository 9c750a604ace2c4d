//! Merkle tree construction and level queries

use super::{Leaf, Node, NodeId, NodeRef, Printer};
use crate::model::{HashCombiner, HashValue, Hashable};
use crate::{Error, Result};
use std::collections::VecDeque;
use tracing::debug;

/// A binary merkle tree over an ordered sequence of items
///
/// The tree is immutable once built. Leaves keep the input order, and every
/// node's hash is computed exactly once during [`MerkleTree::build`].
///
/// Construction pairs nodes left to right, one level per round. As soon as a
/// round yields one or two nodes, those become the children of the root,
/// one level above the round. A single item therefore produces a tree of
/// depth 2, and in general `n` items produce depth `max(2, ceil(log2(n)))`.
#[derive(Clone, Debug)]
pub struct MerkleTree<T, H> {
    /// Arena: leaves first, in input order, then internal nodes round by round
    nodes: Vec<Node<T>>,
    /// Hash of `nodes[i]` at index `i`
    hashes: Vec<H>,
    root: Option<NodeId>,
    leaf_count: usize,
}

impl<T, H: HashValue> MerkleTree<T, H> {
    /// Build a tree from items that hash themselves
    ///
    /// Items must already be in the desired leaf order; nothing is sorted.
    pub fn build<I, C>(items: I, combiner: &C) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Hashable<H>,
        C: HashCombiner<H> + ?Sized,
    {
        Self::build_with(items, |item: &T| Hashable::hash(item), combiner)
    }

    /// Build a tree, hashing each item with `hash_item`
    pub fn build_with<I, F, C>(items: I, hash_item: F, combiner: &C) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> H,
        C: HashCombiner<H> + ?Sized,
    {
        let mut tree = MerkleTree {
            nodes: Vec::new(),
            hashes: Vec::new(),
            root: None,
            leaf_count: 0,
        };

        for data in items {
            tree.hashes.push(hash_item(&data));
            tree.nodes.push(Node::Leaf { data });
        }
        tree.leaf_count = tree.nodes.len();

        if tree.leaf_count == 0 {
            debug!("built empty merkle tree");
            return tree;
        }

        let mut round: Vec<NodeId> = (0..tree.leaf_count).map(NodeId).collect();
        let mut level = 1;
        loop {
            let condensed: Vec<NodeId> = round
                .chunks(2)
                .map(|pair| tree.push_internal(level, pair[0], pair.get(1).copied(), combiner))
                .collect();

            // Terminal wrap: the last one or two nodes hang directly off the root
            if condensed.len() <= 2 {
                let root = tree.push_internal(
                    level + 1,
                    condensed[0],
                    condensed.get(1).copied(),
                    combiner,
                );
                tree.root = Some(root);
                break;
            }

            round = condensed;
            level += 1;
        }

        debug!(
            leaves = tree.leaf_count,
            nodes = tree.nodes.len(),
            depth = level + 1,
            "built merkle tree"
        );
        tree
    }

    fn push_internal<C>(
        &mut self,
        level: u32,
        left: NodeId,
        right: Option<NodeId>,
        combiner: &C,
    ) -> NodeId
    where
        C: HashCombiner<H> + ?Sized,
    {
        let hash = match right {
            Some(right) => combiner.combine(&[
                self.hashes[left.0].clone(),
                self.hashes[right.0].clone(),
            ]),
            None => combiner.combine(std::slice::from_ref(&self.hashes[left.0])),
        };

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Internal { level, left, right });
        self.hashes.push(hash);
        id
    }
}

impl<T, H> MerkleTree<T, H> {
    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    pub(crate) fn hash_of(&self, id: NodeId) -> &H {
        &self.hashes[id.0]
    }

    /// The root node, or `None` for a tree built from no items
    pub fn root(&self) -> Option<NodeRef<'_, T, H>> {
        self.root.map(|id| NodeRef::new(self, id, None))
    }

    pub fn root_hash(&self) -> Option<&H> {
        self.root.map(|id| self.hash_of(id))
    }

    /// Level of the root, or `None` when the tree is empty
    pub fn depth(&self) -> Option<u32> {
        self.root.map(|id| self.node(id).level())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of leaves
    pub fn len(&self) -> usize {
        self.leaf_count
    }

    /// All leaves, left to right
    ///
    /// Same nodes, in the same order, as `nodes_at_level(0)`.
    pub fn leaves(&self) -> Vec<Leaf<'_, T, H>> {
        (0..self.leaf_count)
            .filter_map(|i| NodeRef::new(self, NodeId(i), None).as_leaf())
            .collect()
    }

    /// All nodes at `level`, left to right
    ///
    /// An empty tree has no nodes at any level. On a non-empty tree, a level
    /// above the root's is rejected with [`Error::InvalidLevel`].
    pub fn nodes_at_level(&self, level: u32) -> Result<Vec<NodeRef<'_, T, H>>> {
        let Some(root) = self.root() else {
            return Ok(Vec::new());
        };

        let max = root.level();
        if level > max {
            return Err(Error::InvalidLevel { level, max });
        }

        let mut found = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.level() == level {
                found.push(node);
                continue;
            }
            if node.level() < level {
                continue;
            }
            if let Some(right) = node.right() {
                stack.push(right);
            }
            if let Some(left) = node.left() {
                stack.push(left);
            }
        }
        Ok(found)
    }

    /// Nodes grouped by level, breadth first from the root down
    pub fn levels(&self) -> Vec<Vec<NodeRef<'_, T, H>>> {
        let mut levels: Vec<Vec<NodeRef<'_, T, H>>> = Vec::new();
        let Some(root) = self.root() else {
            return levels;
        };

        let mut queue = VecDeque::from([root]);
        let mut current = root.level();
        let mut row = Vec::new();
        while let Some(node) = queue.pop_front() {
            if node.level() != current {
                levels.push(std::mem::take(&mut row));
                current = node.level();
            }
            if let Some(left) = node.left() {
                queue.push_back(left);
            }
            if let Some(right) = node.right() {
                queue.push_back(right);
            }
            row.push(node);
        }
        levels.push(row);
        levels
    }

    /// Walk the tree level by level, emitting every node hash
    ///
    /// `new_line` is called between levels, never before the first or after
    /// the last. An empty tree emits nothing.
    pub fn print_to<P>(&self, printer: &mut P)
    where
        P: Printer<H> + ?Sized,
    {
        for (i, level) in self.levels().iter().enumerate() {
            if i > 0 {
                printer.new_line();
            }
            for node in level {
                printer.emit(node.hash());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Blake3, Hash};

    fn numbers(n: u64) -> MerkleTree<u64, Hash> {
        MerkleTree::build(0..n, &Blake3)
    }

    #[test]
    fn test_depth_follows_condensation_rule() {
        let expected = [
            (1, 2),
            (2, 2),
            (3, 2),
            (4, 2),
            (5, 3),
            (8, 3),
            (9, 4),
            (33, 6),
            (64, 6),
            (65, 7),
        ];
        for (n, depth) in expected {
            assert_eq!(numbers(n).depth(), Some(depth), "depth for {} leaves", n);
        }
    }

    #[test]
    fn test_empty_tree() {
        let tree = numbers(0);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), None);
        assert!(tree.root().is_none());
        assert!(tree.root_hash().is_none());
        assert!(tree.leaves().is_empty());
        assert!(tree.nodes_at_level(0).unwrap().is_empty());
        assert!(tree.nodes_at_level(9).unwrap().is_empty());
        assert!(tree.levels().is_empty());
    }

    #[test]
    fn test_single_item_is_wrapped_twice() {
        let tree = MerkleTree::build(["solo"], &Blake3);
        let root = tree.root().unwrap();
        assert_eq!(root.level(), 2);
        assert!(root.right().is_none());

        let wrapper = root.left().unwrap();
        assert_eq!(wrapper.level(), 1);
        assert!(wrapper.right().is_none());
        assert_eq!(wrapper.hash(), &Hash::digest_many(&["solo".hash()]));
        assert_eq!(root.hash(), &Hash::digest_many(&[*wrapper.hash()]));
    }

    #[test]
    fn test_leaves_keep_input_order() {
        let tree = numbers(8);
        let leaves = tree.leaves();
        assert_eq!(leaves.len(), 8);
        for (i, leaf) in leaves.iter().enumerate() {
            assert_eq!(*leaf.data(), i as u64);
            assert_eq!(leaf.index(), i);
        }
    }

    #[test]
    fn test_leaves_match_level_zero() {
        let tree = numbers(11);
        let by_level: Vec<_> = tree
            .nodes_at_level(0)
            .unwrap()
            .iter()
            .map(|node| *node.data().unwrap())
            .collect();
        let by_arena: Vec<_> = tree.leaves().iter().map(|leaf| *leaf.data()).collect();
        assert_eq!(by_level, by_arena);
    }

    #[test]
    fn test_correct_hashes() {
        let tree = numbers(2);
        let leaves = tree.leaves();
        assert_eq!(leaves[0].hash(), &0u64.hash());
        assert_eq!(leaves[1].hash(), &1u64.hash());

        let root = tree.root().unwrap();
        let pair = root.left().unwrap();
        assert_eq!(pair.hash(), &Hash::digest_many(&[0u64.hash(), 1u64.hash()]));
        assert!(root.right().is_none());
    }

    #[test]
    fn test_odd_counts_carry_the_last_node_alone() {
        // 5 leaves: (0 1) (2 3) (4) -> (01 23) (4) -> root
        let tree = numbers(5);
        let level_one = tree.nodes_at_level(1).unwrap();
        assert_eq!(level_one.len(), 3);
        assert!(level_one[2].right().is_none());

        let level_two = tree.nodes_at_level(2).unwrap();
        assert_eq!(level_two.len(), 2);
        assert_eq!(level_two[1].left().unwrap().id(), level_one[2].id());

        let root = tree.root().unwrap();
        assert_eq!(root.level(), 3);
        assert_eq!(root.right().unwrap().id(), level_two[1].id());
    }

    #[test]
    fn test_nodes_at_level_rejects_levels_above_root() {
        let tree = numbers(4);
        assert_eq!(tree.nodes_at_level(2).unwrap().len(), 1);
        assert!(matches!(
            tree.nodes_at_level(3),
            Err(Error::InvalidLevel { level: 3, max: 2 })
        ));
    }

    #[test]
    fn test_same_items_same_root() {
        assert_eq!(numbers(37).root_hash(), numbers(37).root_hash());
        assert_ne!(numbers(37).root_hash(), numbers(36).root_hash());
    }

    #[test]
    fn test_build_with_closure_hasher() {
        let tree = MerkleTree::build_with(
            vec![3u8, 5, 6],
            |item: &u8| u64::from(*item),
            &|hashes: &[u64]| hashes.iter().fold(17u64, |acc, h| acc * 31 + h),
        );
        let leaves: Vec<u64> = tree.leaves().iter().map(|leaf| *leaf.hash()).collect();
        assert_eq!(leaves, vec![3, 5, 6]);
        assert_eq!(tree.depth(), Some(2));
    }

    #[test]
    fn test_levels_group_breadth_first() {
        let tree = numbers(5);
        let levels = tree.levels();
        let widths: Vec<usize> = levels.iter().map(Vec::len).collect();
        assert_eq!(widths, vec![1, 2, 3, 5]);
        for (row, expected) in levels.iter().zip([3u32, 2, 1, 0]) {
            assert!(row.iter().all(|node| node.level() == expected));
        }
    }
}
