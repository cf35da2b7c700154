// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The incrementally built AABB tree: arena, insertion and structural inspection.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::aabb::Aabb;
use crate::error::Error;
use crate::options::InsertMethod;
use crate::types::{Scalar, lt};

/// Binary tree of axis-aligned boxes with a value attached to every leaf.
///
/// Boxes are inserted one at a time with [`AabbTree::add`]; each insertion
/// walks down from the root, greedily choosing at every internal node whether
/// to descend left, descend right, or wrap the current subtree in a new parent.
/// Every internal node's box is the merge of its children's boxes. The tree is
/// never rebalanced, so its shape depends on insertion order.
///
/// Nodes live in an arena and leaf values in a parallel slot vector, so pushing
/// a subtree down a level moves a single node instead of copying the subtree.
///
/// ```rust
/// use understory_aabb_tree::{Aabb, AabbTree, QueryFlags, Traversal};
///
/// let mut tree = AabbTree::new();
/// tree.add(Aabb::new([(0.0, 1.0), (0.0, 1.0)]).unwrap(), "a").unwrap();
/// tree.add(Aabb::new([(3.0, 4.0), (0.0, 1.0)]).unwrap(), "b").unwrap();
/// tree.add(Aabb::new([(5.0, 6.0), (5.0, 6.0)]).unwrap(), "c").unwrap();
///
/// let probe = Aabb::new([(-1.0, 3.5), (-1.0, 0.5)]).unwrap();
/// let mut hits = tree
///     .overlap_values(&probe, Traversal::DepthFirst, QueryFlags::default())
///     .unwrap();
/// hits.sort();
/// assert_eq!(hits, [&"a", &"b"]);
/// ```
#[derive(Clone)]
pub struct AabbTree<T, V> {
    pub(crate) nodes: Vec<Node<T>>,
    pub(crate) values: Vec<V>,
    pub(crate) root: Option<NodeIdx>,
    method: InsertMethod,
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) aabb: Aabb<T>,
    pub(crate) kind: Kind,
}

#[derive(Copy, Clone, Debug)]
pub(crate) enum Kind {
    /// Index into the value slots.
    Leaf(usize),
    Internal { left: NodeIdx, right: NodeIdx },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    pub(crate) const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

impl<T> Node<T> {
    pub(crate) const fn leaf(aabb: Aabb<T>, slot: usize) -> Self {
        Self {
            aabb,
            kind: Kind::Leaf(slot),
        }
    }

    pub(crate) const fn children(&self) -> Option<(NodeIdx, NodeIdx)> {
        match self.kind {
            Kind::Leaf(_) => None,
            Kind::Internal { left, right } => Some((left, right)),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Placement {
    NewParent,
    Left,
    Right,
}

impl<T: Scalar, V> Default for AabbTree<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, V> AabbTree<T, V> {
    /// Create an empty tree using [`InsertMethod::Volume`].
    pub fn new() -> Self {
        Self::with_method(InsertMethod::default())
    }

    /// Create an empty tree whose [`add`](Self::add) uses `method`.
    pub fn with_method(method: InsertMethod) -> Self {
        Self {
            nodes: Vec::new(),
            values: Vec::new(),
            root: None,
            method,
        }
    }

    /// The insertion method used by [`add`](Self::add).
    pub fn method(&self) -> InsertMethod {
        self.method
    }

    /// Insert `aabb` with its `value` using the tree's insertion method.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `aabb` and the tree are both non-empty with
    /// different dimensionality. The tree is left untouched.
    pub fn add(&mut self, aabb: Aabb<T>, value: V) -> Result<(), Error> {
        self.add_with_method(aabb, value, self.method)
    }

    /// Insert `aabb` with its `value`, choosing placements with `method`.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `aabb` and the tree are both non-empty with
    /// different dimensionality. The tree is left untouched.
    pub fn add_with_method(
        &mut self,
        aabb: Aabb<T>,
        value: V,
        method: InsertMethod,
    ) -> Result<(), Error> {
        let Some(root) = self.root else {
            let slot = self.push_value(value);
            self.root = Some(self.push_node(Node::leaf(aabb, slot)));
            return Ok(());
        };
        self.nodes[root.get()].aabb.check_dims(&aabb)?;
        let slot = self.push_value(value);

        let mut path = Vec::new();
        let mut at = root;
        while let Some((left, right)) = self.nodes[at.get()].children() {
            match self.placement(at, left, right, &aabb, method) {
                Placement::NewParent => break,
                Placement::Left => {
                    path.push(at);
                    at = left;
                }
                Placement::Right => {
                    path.push(at);
                    at = right;
                }
            }
        }
        self.push_down(at, aabb, slot);
        for idx in path.into_iter().rev() {
            self.refit(idx);
        }
        Ok(())
    }

    /// Number of leaves, i.e. the number of successful insertions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing was inserted yet.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// True for an empty tree or a tree holding a single leaf.
    pub fn is_leaf(&self) -> bool {
        self.root
            .is_none_or(|r| self.nodes[r.get()].children().is_none())
    }

    /// Number of edges on the longest root-to-leaf path (0 for empty and single-leaf trees).
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut deepest = 0;
        let mut stack = vec![(root, 0_usize)];
        while let Some((idx, depth)) = stack.pop() {
            match self.nodes[idx.get()].children() {
                Some((left, right)) => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
                None => deepest = deepest.max(depth),
            }
        }
        deepest
    }

    /// The box bounding every leaf, or `None` for an empty tree.
    pub fn aabb(&self) -> Option<&Aabb<T>> {
        self.root.map(|r| &self.nodes[r.get()].aabb)
    }

    /// Borrowing view of the root node.
    pub fn root(&self) -> Option<NodeRef<'_, T, V>> {
        self.root.map(|idx| NodeRef { tree: self, idx })
    }

    /// Iterate `(aabb, value)` for every leaf, left to right.
    pub fn leaves(&self) -> Leaves<'_, T, V> {
        Leaves {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    /// Structural equality that ignores leaf values.
    ///
    /// Two trees have the same shape when their roots hold equal boxes, are
    /// both leaves or both internal, and their children have the same shape.
    pub fn same_shape<W>(&self, other: &AabbTree<T, W>) -> bool {
        self.zip_nodes(other, |_, _| true)
    }

    /// Walk both trees in lockstep; `leaf_eq` compares value slots of matching leaves.
    pub(crate) fn zip_nodes<W>(
        &self,
        other: &AabbTree<T, W>,
        mut leaf_eq: impl FnMut(usize, usize) -> bool,
    ) -> bool {
        let (a, b) = match (self.root, other.root) {
            (None, None) => return true,
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };
        let mut stack = vec![(a, b)];
        while let Some((a, b)) = stack.pop() {
            let na = &self.nodes[a.get()];
            let nb = &other.nodes[b.get()];
            if na.aabb != nb.aabb {
                return false;
            }
            match (na.kind, nb.kind) {
                (Kind::Leaf(sa), Kind::Leaf(sb)) => {
                    if !leaf_eq(sa, sb) {
                        return false;
                    }
                }
                (
                    Kind::Internal {
                        left: la,
                        right: ra,
                    },
                    Kind::Internal {
                        left: lb,
                        right: rb,
                    },
                ) => {
                    stack.push((ra, rb));
                    stack.push((la, lb));
                }
                _ => return false,
            }
        }
        true
    }

    fn push_value(&mut self, value: V) -> usize {
        self.values.push(value);
        self.values.len() - 1
    }

    fn push_node(&mut self, node: Node<T>) -> NodeIdx {
        self.nodes.push(node);
        NodeIdx::new(self.nodes.len() - 1)
    }

    /// Turn `at` into an internal node whose left child is the old `at` and
    /// whose right child is a new leaf.
    fn push_down(&mut self, at: NodeIdx, aabb: Aabb<T>, slot: usize) {
        let merged = self.nodes[at.get()].aabb.merge_unchecked(&aabb);
        let left = NodeIdx::new(self.nodes.len());
        let right = NodeIdx::new(left.get() + 1);
        let parent = Node {
            aabb: merged,
            kind: Kind::Internal { left, right },
        };
        let demoted = core::mem::replace(&mut self.nodes[at.get()], parent);
        self.nodes.push(demoted);
        self.nodes.push(Node::leaf(aabb, slot));
    }

    fn refit(&mut self, idx: NodeIdx) {
        if let Some((left, right)) = self.nodes[idx.get()].children() {
            let merged = self.nodes[left.get()]
                .aabb
                .merge_unchecked(&self.nodes[right.get()].aabb);
            self.nodes[idx.get()].aabb = merged;
        }
    }

    fn placement(
        &self,
        at: NodeIdx,
        left: NodeIdx,
        right: NodeIdx,
        aabb: &Aabb<T>,
        method: InsertMethod,
    ) -> Placement {
        let node = &self.nodes[at.get()].aabb;
        let l = &self.nodes[left.get()];
        let r = &self.nodes[right.get()];
        let (branch, cost_l, cost_r) = match method {
            InsertMethod::Volume => {
                let merged = node.merge_unchecked(aabb).volume();
                let left_merge = l.aabb.merge_unchecked(aabb);
                let right_merge = r.aabb.merge_unchecked(aabb);
                let growth = T::acc_sub(merged, node.volume());
                let branch = T::acc_add(merged, node.overlap_volume_unchecked(aabb));
                let descend = |merge: &Aabb<T>, child: &Aabb<T>, sibling: &Aabb<T>| {
                    let grown = T::acc_sub(merge.volume(), child.volume());
                    T::acc_add(
                        T::acc_add(growth, grown),
                        merge.overlap_volume_unchecked(sibling),
                    )
                };
                (
                    branch,
                    descend(&left_merge, &l.aabb, &r.aabb),
                    descend(&right_merge, &r.aabb, &l.aabb),
                )
            }
            InsertMethod::Perimeter => {
                let two = T::acc_from_usize(2);
                let merged = node.merge_unchecked(aabb).perimeter();
                let pushdown = T::acc_mul(two, T::acc_sub(merged, node.perimeter()));
                let descend = |child: &Node<T>| {
                    let cost = T::acc_add(child.aabb.merge_unchecked(aabb).perimeter(), pushdown);
                    match child.kind {
                        Kind::Leaf(_) => cost,
                        Kind::Internal { .. } => T::acc_sub(cost, child.aabb.perimeter()),
                    }
                };
                (T::acc_mul(two, merged), descend(l), descend(r))
            }
        };
        let placement = if lt(branch, cost_l) && lt(branch, cost_r) {
            Placement::NewParent
        } else if lt(cost_l, cost_r) {
            Placement::Left
        } else {
            Placement::Right
        };
        tracing::trace!(
            ?method,
            ?branch,
            left = ?cost_l,
            right = ?cost_r,
            ?placement,
            "insertion costs"
        );
        placement
    }
}

impl<T: Scalar, V: PartialEq> PartialEq for AabbTree<T, V> {
    /// Same shape, equal boxes and equal leaf values.
    fn eq(&self, other: &Self) -> bool {
        self.zip_nodes(other, |a, b| self.values[a] == other.values[b])
    }
}

/// Borrowing view of a single node of an [`AabbTree`].
pub struct NodeRef<'a, T, V> {
    tree: &'a AabbTree<T, V>,
    idx: NodeIdx,
}

impl<T, V> Clone for NodeRef<'_, T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for NodeRef<'_, T, V> {}

impl<'a, T, V> NodeRef<'a, T, V> {
    fn node(&self) -> &'a Node<T> {
        &self.tree.nodes[self.idx.get()]
    }

    /// This node's box. For internal nodes it bounds both children.
    pub fn aabb(&self) -> &'a Aabb<T> {
        &self.node().aabb
    }

    /// The value of a leaf; `None` for internal nodes.
    pub fn value(&self) -> Option<&'a V> {
        match self.node().kind {
            Kind::Leaf(slot) => Some(&self.tree.values[slot]),
            Kind::Internal { .. } => None,
        }
    }

    /// True if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.node().children().is_none()
    }

    /// The `(left, right)` children of an internal node.
    pub fn children(&self) -> Option<(Self, Self)> {
        let (left, right) = self.node().children()?;
        Some((
            Self {
                tree: self.tree,
                idx: left,
            },
            Self {
                tree: self.tree,
                idx: right,
            },
        ))
    }

    /// Left child of an internal node.
    pub fn left(&self) -> Option<Self> {
        self.children().map(|(l, _)| l)
    }

    /// Right child of an internal node.
    pub fn right(&self) -> Option<Self> {
        self.children().map(|(_, r)| r)
    }
}

impl<T: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node().kind {
            Kind::Leaf(slot) => f
                .debug_struct("Leaf")
                .field("aabb", &self.node().aabb)
                .field("value", &self.tree.values[slot])
                .finish(),
            Kind::Internal { left, right } => f
                .debug_struct("Branch")
                .field("aabb", &self.node().aabb)
                .field(
                    "left",
                    &Self {
                        tree: self.tree,
                        idx: left,
                    },
                )
                .field(
                    "right",
                    &Self {
                        tree: self.tree,
                        idx: right,
                    },
                )
                .finish(),
        }
    }
}

/// Iterator over the leaves of an [`AabbTree`], see [`AabbTree::leaves`].
pub struct Leaves<'a, T, V> {
    tree: &'a AabbTree<T, V>,
    stack: Vec<NodeIdx>,
}

impl<'a, T, V> Iterator for Leaves<'a, T, V> {
    type Item = (&'a Aabb<T>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.stack.pop() {
            let node = &self.tree.nodes[idx.get()];
            match node.kind {
                Kind::Leaf(slot) => return Some((&node.aabb, &self.tree.values[slot])),
                Kind::Internal { left, right } => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
            }
        }
        None
    }
}

impl<T, V> fmt::Debug for Leaves<'_, T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaves")
            .field("pending", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<T: fmt::Debug, V: fmt::Debug> fmt::Debug for AabbTree<T, V> {
    /// Prints the same literal as the [`Debug`](fmt::Debug) output of
    /// [`AabbTree::to_nested`](crate::AabbTree::to_nested), wrapped in `AabbTree(..)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.root.map(|idx| NodeRef { tree: self, idx });
        f.debug_tuple("AabbTree").field(&root).finish()
    }
}

struct DumpWriter<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    first: bool,
}

impl DumpWriter<'_, '_> {
    fn line(&mut self, level: usize, args: fmt::Arguments<'_>) -> fmt::Result {
        if !self.first {
            self.f.write_str("\n")?;
        }
        self.first = false;
        for _ in 0..level {
            self.f.write_str("  ")?;
        }
        self.f.write_fmt(args)
    }
}

enum DumpStep {
    Node(NodeIdx, usize),
    Label(&'static str, usize),
}

impl<T: fmt::Display, V: fmt::Display> fmt::Display for AabbTree<T, V> {
    /// Indented dump: each node prints its box, value, and children, with
    /// two spaces of indentation per level.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return f.write_str("AABB: None\nValue: None\nLeft: None\nRight: None");
        };
        let mut out = DumpWriter { f, first: true };
        let mut stack = vec![DumpStep::Node(root, 0)];
        while let Some(step) = stack.pop() {
            match step {
                DumpStep::Label(label, level) => out.line(level, format_args!("{label}"))?,
                DumpStep::Node(idx, level) => {
                    let node = &self.nodes[idx.get()];
                    out.line(level, format_args!("AABB: {}", node.aabb))?;
                    match node.kind {
                        Kind::Leaf(slot) => {
                            out.line(level, format_args!("Value: {}", self.values[slot]))?;
                            out.line(level, format_args!("Left: None"))?;
                            out.line(level, format_args!("Right: None"))?;
                        }
                        Kind::Internal { left, right } => {
                            out.line(level, format_args!("Value: None"))?;
                            stack.push(DumpStep::Node(right, level + 1));
                            stack.push(DumpStep::Label("Right:", level));
                            stack.push(DumpStep::Node(left, level + 1));
                            stack.push(DumpStep::Label("Left:", level));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
