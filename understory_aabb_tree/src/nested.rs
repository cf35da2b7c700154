// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned recursive form of a tree.
//!
//! [`Nested`] spells a tree out literally, which makes it convenient for
//! assertions, fixtures and for rebuilding a tree with a known shape.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use crate::aabb::Aabb;
use crate::error::Error;
use crate::tree::{AabbTree, Kind, Node, NodeIdx};
use crate::types::Scalar;

/// A tree written out as nested nodes.
///
/// Its [`Debug`](core::fmt::Debug) output is the one [`AabbTree`] uses for
/// itself, wrapped in `AabbTree(Some(..))`.
#[derive(Clone, Debug, PartialEq)]
pub enum Nested<T, V> {
    /// A leaf with its box and value.
    Leaf {
        /// Leaf box.
        aabb: Aabb<T>,
        /// Leaf value.
        value: V,
    },
    /// An internal node. Its box must be the merge of both children's boxes.
    Branch {
        /// Box bounding both children.
        aabb: Aabb<T>,
        /// Left subtree.
        left: Box<Self>,
        /// Right subtree.
        right: Box<Self>,
    },
}

impl<T, V> Nested<T, V> {
    /// Box of this node.
    pub fn aabb(&self) -> &Aabb<T> {
        match self {
            Self::Leaf { aabb, .. } | Self::Branch { aabb, .. } => aabb,
        }
    }

    /// Build a branch over two subtrees, computing its box.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if the subtrees' boxes differ in dimensionality.
    pub fn branch(left: Self, right: Self) -> Result<Self, Error>
    where
        T: Scalar,
    {
        let aabb = left.aabb().merge(right.aabb())?;
        Ok(Self::Branch {
            aabb,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

enum Step {
    Enter(NodeIdx),
    Join(NodeIdx),
}

/// Post-order rebuild of the subtree at `root`; `value` yields each leaf's value once.
fn nest<T: Clone, U>(
    nodes: &[Node<T>],
    root: NodeIdx,
    mut value: impl FnMut(usize) -> Option<U>,
) -> Option<Nested<T, U>> {
    let mut steps = vec![Step::Enter(root)];
    let mut built: Vec<Nested<T, U>> = Vec::new();
    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(idx) => {
                let node = &nodes[idx.get()];
                match node.kind {
                    Kind::Leaf(slot) => built.push(Nested::Leaf {
                        aabb: node.aabb.clone(),
                        value: value(slot)?,
                    }),
                    Kind::Internal { left, right } => {
                        steps.push(Step::Join(idx));
                        steps.push(Step::Enter(right));
                        steps.push(Step::Enter(left));
                    }
                }
            }
            Step::Join(idx) => {
                let right = built.pop()?;
                let left = built.pop()?;
                built.push(Nested::Branch {
                    aabb: nodes[idx.get()].aabb.clone(),
                    left: Box::new(left),
                    right: Box::new(right),
                });
            }
        }
    }
    built.pop()
}

impl<T: Scalar, V> AabbTree<T, V> {
    /// Copy the tree into its nested form; `None` for an empty tree.
    pub fn to_nested(&self) -> Option<Nested<T, V>>
    where
        V: Clone,
    {
        let root = self.root?;
        nest(&self.nodes, root, |slot| self.values.get(slot).cloned())
    }

    /// Convert the tree into its nested form; `None` for an empty tree.
    pub fn into_nested(self) -> Option<Nested<T, V>> {
        let root = self.root?;
        let mut slots: Vec<Option<V>> = self.values.into_iter().map(Some).collect();
        nest(&self.nodes, root, |slot| slots.get_mut(slot)?.take())
    }

    /// Rebuild a tree from its nested form, using [`InsertMethod::Volume`](crate::InsertMethod::Volume)
    /// for later insertions.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if two sibling boxes differ in dimensionality.
    /// - [`Error::InconsistentBranch`] if a branch box is not exactly the merge of
    ///   its children's boxes.
    pub fn from_nested(nested: Option<Nested<T, V>>) -> Result<Self, Error> {
        let mut tree = Self::new();
        let Some(nested) = nested else {
            return Ok(tree);
        };
        let root = NodeIdx::new(0);
        tree.nodes.push(Node::leaf(Aabb::empty(), 0));
        tree.root = Some(root);

        let mut pending = vec![(nested, root, 0_usize)];
        while let Some((nested, idx, depth)) = pending.pop() {
            let node = match nested {
                Nested::Leaf { aabb, value } => {
                    tree.values.push(value);
                    Node::leaf(aabb, tree.values.len() - 1)
                }
                Nested::Branch { aabb, left, right } => {
                    if left.aabb().merge(right.aabb())? != aabb {
                        return Err(Error::InconsistentBranch { depth });
                    }
                    let l = NodeIdx::new(tree.nodes.len());
                    let r = NodeIdx::new(l.get() + 1);
                    tree.nodes.push(Node::leaf(Aabb::empty(), 0));
                    tree.nodes.push(Node::leaf(Aabb::empty(), 0));
                    pending.push((*right, r, depth + 1));
                    pending.push((*left, l, depth + 1));
                    Node {
                        aabb,
                        kind: Kind::Internal { left: l, right: r },
                    }
                }
            };
            tree.nodes[idx.get()] = node;
        }
        Ok(tree)
    }
}
