// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlap queries against single boxes and whole trees.
//!
//! Every query walks pairs of nodes, one from the queried tree and one from the
//! query, pruning a pair as soon as the two boxes do not overlap. A single box
//! is treated as a tree holding one leaf, so box and tree queries share the same
//! traversal.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;

use crate::aabb::Aabb;
use crate::error::Error;
use crate::options::{QueryFlags, Traversal};
use crate::tree::{AabbTree, Kind, Node, NodeIdx};
use crate::types::Scalar;

/// What an overlap query runs against.
///
/// Usually built implicitly from `&Aabb<T>` or `&AabbTree<T, W>`.
pub enum Query<'a, T> {
    /// A single box.
    Aabb(&'a Aabb<T>),
    /// The structure of another tree; its values are not consulted.
    Tree(TreeView<'a, T>),
}

impl<T> Clone for Query<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Query<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Query<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aabb(aabb) => f.debug_tuple("Aabb").field(aabb).finish(),
            Self::Tree(view) => f.debug_tuple("Tree").field(view).finish(),
        }
    }
}

impl<'a, T> From<&'a Aabb<T>> for Query<'a, T> {
    fn from(aabb: &'a Aabb<T>) -> Self {
        Self::Aabb(aabb)
    }
}

impl<'a, T, W> From<&'a AabbTree<T, W>> for Query<'a, T> {
    fn from(tree: &'a AabbTree<T, W>) -> Self {
        Self::Tree(TreeView {
            nodes: &tree.nodes,
            root: tree.root,
        })
    }
}

impl<'a, T> From<TreeView<'a, T>> for Query<'a, T> {
    fn from(view: TreeView<'a, T>) -> Self {
        Self::Tree(view)
    }
}

/// Value-independent view of a tree's boxes and structure.
pub struct TreeView<'a, T> {
    nodes: &'a [Node<T>],
    root: Option<NodeIdx>,
}

impl<T> Clone for TreeView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TreeView<'_, T> {}

impl<'a, T> TreeView<'a, T> {
    /// The root box, or `None` for an empty tree.
    pub fn aabb(&self) -> Option<&'a Aabb<T>> {
        self.root.map(|r| &self.nodes[r.get()].aabb)
    }

    /// True if the viewed tree is empty.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

impl<T: fmt::Debug> fmt::Debug for TreeView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeView")
            .field("aabb", &self.aabb())
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

/// A leaf of the queried tree that overlaps the query.
#[derive(Copy, Clone, Debug)]
struct Hit {
    node: NodeIdx,
    slot: usize,
}

impl<T: Scalar, V> AabbTree<T, V> {
    /// Value-independent view of this tree, usable as a [`Query`] for other trees.
    pub fn view(&self) -> TreeView<'_, T> {
        TreeView {
            nodes: &self.nodes,
            root: self.root,
        }
    }

    /// Whether any leaf overlaps the query. Stops at the first hit.
    ///
    /// Only [`QueryFlags::CLOSED`] is consulted.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if the tree and query boxes differ in dimensionality.
    pub fn does_overlap<'q>(
        &self,
        query: impl Into<Query<'q, T>>,
        traversal: Traversal,
        flags: QueryFlags,
    ) -> Result<bool, Error>
    where
        T: 'q,
    {
        let hits = self.overlap_hits(query.into(), traversal, flags.closed(), true)?;
        Ok(!hits.is_empty())
    }

    /// Box and value of every leaf overlapping the query, in traversal order.
    ///
    /// With [`QueryFlags::UNIQUE`], each distinct leaf box is reported once, at
    /// its first occurrence. Leaves are compared by box only, so two leaves with
    /// equal boxes and different values collapse into the first one found.
    /// Without it, a leaf is reported once for every query leaf it overlaps.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if the tree and query boxes differ in dimensionality.
    pub fn overlap_pairs<'q>(
        &self,
        query: impl Into<Query<'q, T>>,
        traversal: Traversal,
        flags: QueryFlags,
    ) -> Result<Vec<(&Aabb<T>, &V)>, Error>
    where
        T: 'q,
    {
        let mut hits = self.overlap_hits(query.into(), traversal, flags.closed(), false)?;
        if flags.unique() && hits.len() > 1 {
            hits = self.unique_by_box(hits);
        }
        Ok(hits
            .into_iter()
            .map(|hit| (&self.nodes[hit.node.get()].aabb, &self.values[hit.slot]))
            .collect())
    }

    /// Boxes of the leaves overlapping the query; see [`overlap_pairs`](Self::overlap_pairs).
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if the tree and query boxes differ in dimensionality.
    pub fn overlap_aabbs<'q>(
        &self,
        query: impl Into<Query<'q, T>>,
        traversal: Traversal,
        flags: QueryFlags,
    ) -> Result<Vec<&Aabb<T>>, Error>
    where
        T: 'q,
    {
        let pairs = self.overlap_pairs(query, traversal, flags)?;
        Ok(pairs.into_iter().map(|(aabb, _)| aabb).collect())
    }

    /// Values of the leaves overlapping the query; see [`overlap_pairs`](Self::overlap_pairs).
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if the tree and query boxes differ in dimensionality.
    pub fn overlap_values<'q>(
        &self,
        query: impl Into<Query<'q, T>>,
        traversal: Traversal,
        flags: QueryFlags,
    ) -> Result<Vec<&V>, Error>
    where
        T: 'q,
    {
        let pairs = self.overlap_pairs(query, traversal, flags)?;
        Ok(pairs.into_iter().map(|(_, value)| value).collect())
    }

    fn overlap_hits(
        &self,
        query: Query<'_, T>,
        traversal: Traversal,
        closed: bool,
        halt: bool,
    ) -> Result<Vec<Hit>, Error> {
        let single;
        let other = match query {
            Query::Aabb(aabb) => {
                single = [Node::leaf(aabb.clone(), 0)];
                TreeView {
                    nodes: &single,
                    root: Some(NodeIdx::new(0)),
                }
            }
            Query::Tree(view) => view,
        };
        let (Some(a), Some(b)) = (self.root, other.root) else {
            return Ok(Vec::new());
        };
        self.nodes[a.get()]
            .aabb
            .check_dims(&other.nodes[b.get()].aabb)?;

        let mut hits = Vec::new();
        let mut pending = VecDeque::from([(a, b)]);
        loop {
            let next = match traversal {
                Traversal::DepthFirst => pending.pop_back(),
                Traversal::BreadthFirst => pending.pop_front(),
            };
            let Some((a, b)) = next else {
                break;
            };
            let na = &self.nodes[a.get()];
            let nb = &other.nodes[b.get()];
            if !na.aabb.overlaps_unchecked(&nb.aabb, closed) {
                continue;
            }
            if let (Kind::Leaf(slot), Kind::Leaf(_)) = (na.kind, nb.kind) {
                hits.push(Hit { node: a, slot });
                if halt {
                    break;
                }
                continue;
            }
            let (a_branches, a_len) = branches(na, a);
            let (b_branches, b_len) = branches(nb, b);
            let a_branches = &a_branches[..a_len];
            let b_branches = &b_branches[..b_len];
            match traversal {
                // Reverse pushes so pairs pop in (left, left), (left, right), ... order.
                Traversal::DepthFirst => {
                    for &x in a_branches.iter().rev() {
                        for &y in b_branches.iter().rev() {
                            pending.push_back((x, y));
                        }
                    }
                }
                Traversal::BreadthFirst => {
                    for &x in a_branches {
                        for &y in b_branches {
                            pending.push_back((x, y));
                        }
                    }
                }
            }
        }
        tracing::debug!(?traversal, closed, halt, hits = hits.len(), "overlap traversal");
        Ok(hits)
    }

    fn unique_by_box(&self, hits: Vec<Hit>) -> Vec<Hit> {
        let mut kept: Vec<Hit> = Vec::with_capacity(hits.len());
        for hit in hits {
            let aabb = &self.nodes[hit.node.get()].aabb;
            if kept
                .iter()
                .all(|k| self.nodes[k.node.get()].aabb != *aabb)
            {
                kept.push(hit);
            }
        }
        kept
    }
}

/// The nodes a pair expands into on one side: the children of an internal
/// node, or the leaf itself.
fn branches<T>(node: &Node<T>, idx: NodeIdx) -> ([NodeIdx; 2], usize) {
    match node.kind {
        Kind::Leaf(_) => ([idx, idx], 1),
        Kind::Internal { left, right } => ([left, right], 2),
    }
}
