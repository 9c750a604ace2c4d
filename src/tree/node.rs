//! Tree node types
//!
//! Nodes live in a flat arena owned by [`MerkleTree`]; children are
//! referenced by [`NodeId`]. Read access goes through [`NodeRef`], a
//! borrowed handle that also knows which side of its parent it hangs on.

use super::MerkleTree;
use std::fmt;

/// Index of a node inside its tree's arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena. Leaves occupy `0..len`, in input order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A node in the merkle tree
#[derive(Clone, Debug)]
pub enum Node<T> {
    /// A level-0 node holding one input item
    Leaf { data: T },
    /// A node above the leaves with a left child and an optional right child
    Internal {
        level: u32,
        left: NodeId,
        right: Option<NodeId>,
    },
}

impl<T> Node<T> {
    pub fn level(&self) -> u32 {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { level, .. } => *level,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn left(&self) -> Option<NodeId> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, .. } => Some(*left),
        }
    }

    pub fn right(&self) -> Option<NodeId> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { right, .. } => *right,
        }
    }
}

/// Which child of its parent a node is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A borrowed view of one node
///
/// Handles reached from [`MerkleTree::root`] carry no side; every handle
/// obtained through [`NodeRef::left`] or [`NodeRef::right`] records the
/// side it was reached from.
pub struct NodeRef<'a, T, H> {
    tree: &'a MerkleTree<T, H>,
    id: NodeId,
    side: Option<Side>,
}

impl<'a, T, H> NodeRef<'a, T, H> {
    pub(crate) fn new(tree: &'a MerkleTree<T, H>, id: NodeId, side: Option<Side>) -> Self {
        NodeRef { tree, id, side }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The underlying arena node
    pub fn node(&self) -> &'a Node<T> {
        self.tree.node(self.id)
    }

    /// The node's hash, computed once at build time
    pub fn hash(&self) -> &'a H {
        self.tree.hash_of(self.id)
    }

    pub fn level(&self) -> u32 {
        self.node().level()
    }

    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// The item held by a leaf; `None` for internal nodes
    pub fn data(&self) -> Option<&'a T> {
        match self.node() {
            Node::Leaf { data } => Some(data),
            Node::Internal { .. } => None,
        }
    }

    pub fn left(&self) -> Option<NodeRef<'a, T, H>> {
        self.node()
            .left()
            .map(|id| NodeRef::new(self.tree, id, Some(Side::Left)))
    }

    pub fn right(&self) -> Option<NodeRef<'a, T, H>> {
        self.node()
            .right()
            .map(|id| NodeRef::new(self.tree, id, Some(Side::Right)))
    }

    /// Side of the parent this handle was reached from; `None` at the root
    pub fn side(&self) -> Option<Side> {
        self.side
    }

    pub fn is_root(&self) -> bool {
        self.side.is_none()
    }

    pub fn is_left(&self) -> bool {
        self.side == Some(Side::Left)
    }

    pub fn is_right(&self) -> bool {
        self.side == Some(Side::Right)
    }

    /// Narrow to a leaf handle
    pub fn as_leaf(&self) -> Option<Leaf<'a, T, H>> {
        self.data().map(|data| Leaf {
            data,
            hash: self.hash(),
            index: self.id.0,
        })
    }
}

impl<T, H> Clone for NodeRef<'_, T, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, H> Copy for NodeRef<'_, T, H> {}

impl<T, H: fmt::Debug> fmt::Debug for NodeRef<'_, T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("level", &self.level())
            .field("side", &self.side)
            .field("hash", self.hash())
            .finish()
    }
}

/// A leaf of a tree: the item, its hash and its position in the input
///
/// Two leaves are equal when their hashes are equal, regardless of the
/// tree they come from or where they sit in it.
#[derive(Debug)]
pub struct Leaf<'a, T, H> {
    data: &'a T,
    hash: &'a H,
    index: usize,
}

impl<'a, T, H> Leaf<'a, T, H> {
    pub fn data(&self) -> &'a T {
        self.data
    }

    pub fn hash(&self) -> &'a H {
        self.hash
    }

    /// Position of the leaf in the input sequence
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T, H> Clone for Leaf<'_, T, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, H> Copy for Leaf<'_, T, H> {}

impl<T, H: PartialEq> PartialEq for Leaf<'_, T, H> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl<T, H: Eq> Eq for Leaf<'_, T, H> {}
