// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory AABB Tree: an incrementally built bounding volume tree over
//! d-dimensional axis-aligned boxes.
//!
//! - [`Aabb`] is a box with any number of dimensions, built from `(lower, upper)`
//!   pairs. It merges, measures volume and perimeter, lists corners, and tests
//!   overlap with open or closed boundaries.
//! - [`AabbTree`] stores boxes with a value per leaf. Boxes are inserted one at
//!   a time; each insertion descends greedily using an [`InsertMethod`] cost.
//! - Overlap queries take a single box or another tree, walk node pairs
//!   depth-first or breadth-first ([`Traversal`]), and are tuned with
//!   [`QueryFlags`] (closed boundaries, duplicate removal).
//!
//! The crate is `no_std` with `alloc` and generic over the scalar type: `f32`,
//! `f64` and `i64` are supported, with volumes and costs computed in a widened
//! accumulator (see [`Scalar`]).
//!
//! # Example
//!
//! ```rust
//! use understory_aabb_tree::{Aabb, AabbTree, QueryFlags, Traversal};
//!
//! let mut tree = AabbTree::new();
//! tree.add(Aabb::new([(0.0, 1.0), (0.0, 1.0)]).unwrap(), "v1").unwrap();
//! tree.add(Aabb::new([(3.0, 4.0), (0.0, 1.0)]).unwrap(), "v2").unwrap();
//! tree.add(Aabb::new([(5.0, 6.0), (5.0, 6.0)]).unwrap(), "v3").unwrap();
//!
//! let probe = Aabb::new([(-3.0, 3.0), (-3.0, 3.0)]).unwrap();
//! assert!(tree.does_overlap(&probe, Traversal::DepthFirst, QueryFlags::default()).unwrap());
//!
//! // Touching boundaries only count when the query is closed.
//! let edge = Aabb::new([(1.0, 3.0), (0.0, 1.0)]).unwrap();
//! let open = tree.overlap_values(&edge, Traversal::BreadthFirst, QueryFlags::default()).unwrap();
//! assert!(open.is_empty());
//! let closed = tree
//!     .overlap_values(&edge, Traversal::BreadthFirst, QueryFlags::CLOSED | QueryFlags::UNIQUE)
//!     .unwrap();
//! assert_eq!(closed.len(), 2);
//! ```
//!
//! Trees can be queried against each other; only the query tree's boxes matter:
//!
//! ```rust
//! use understory_aabb_tree::{Aabb, AabbTree, QueryFlags, Traversal};
//!
//! let mut walls = AabbTree::new();
//! walls.add(Aabb::new([(0_i64, 10), (0, 1)]).unwrap(), "floor").unwrap();
//! walls.add(Aabb::new([(0_i64, 1), (0, 10)]).unwrap(), "wall").unwrap();
//!
//! let mut bodies = AabbTree::new();
//! bodies.add(Aabb::new([(4_i64, 5), (0, 2)]).unwrap(), 1_u32).unwrap();
//! bodies.add(Aabb::new([(6_i64, 7), (0, 2)]).unwrap(), 2_u32).unwrap();
//!
//! let touched = walls.overlap_values(&bodies, Traversal::DepthFirst, QueryFlags::empty()).unwrap();
//! assert_eq!(touched, [&"floor", &"floor"]);
//! let touched = walls.overlap_values(&bodies, Traversal::DepthFirst, QueryFlags::UNIQUE).unwrap();
//! assert_eq!(touched, [&"floor"]);
//! ```
//!
//! ## Features
//!
//! - `kurbo`: conversions between [`Aabb<f64>`] and `kurbo::Rect` / `kurbo::Point`.
//! - `std`: forwards to Kurbo's `std` feature when `kurbo` is enabled.
//!
//! ### Float semantics
//!
//! Construction rejects NaN bounds. Comparisons elsewhere treat unordered
//! values as "not less", so NaN costs never win a placement.

#![no_std]

extern crate alloc;

mod aabb;
mod error;
mod nested;
mod options;
mod query;
mod tree;
mod types;

#[cfg(feature = "kurbo")]
mod kurbo_interop;

pub use aabb::Aabb;
pub use error::Error;
pub use nested::Nested;
pub use options::{InsertMethod, QueryFlags, Traversal};
pub use query::{Query, TreeView};
pub use tree::{AabbTree, Leaves, NodeRef};
pub use types::{Scalar, ScalarAcc};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn parsed_options_drive_queries() {
        let method: InsertMethod = "perimeter".parse().unwrap();
        let traversal: Traversal = "BFS".parse().unwrap();
        let mut tree = AabbTree::with_method(method);
        for i in 0..16_i64 {
            let lo = i * 3;
            tree.add(Aabb::new([(lo, lo + 2), (0, 2)]).unwrap(), i).unwrap();
        }
        assert_eq!(tree.method(), InsertMethod::Perimeter);
        assert_eq!(tree.len(), 16);
        let probe = Aabb::new([(4_i64, 10), (1, 1)]).unwrap();
        let mut hits: Vec<i64> = tree
            .overlap_values(&probe, traversal, QueryFlags::default())
            .unwrap()
            .into_iter()
            .copied()
            .collect();
        hits.sort_unstable();
        assert_eq!(hits, [1, 2, 3]);
    }

    #[test]
    fn per_call_method_overrides_tree_default() {
        let mut by_volume = AabbTree::new();
        let mut mixed = AabbTree::new();
        for (i, lo) in [0.0, 10.0, 4.0, 30.0, 12.0].into_iter().enumerate() {
            let aabb = Aabb::new([(lo, lo + 1.0), (0.0, 1.0)]).unwrap();
            by_volume.add(aabb.clone(), i).unwrap();
            mixed
                .add_with_method(aabb, i, InsertMethod::Perimeter)
                .unwrap();
        }
        assert_eq!(mixed.method(), InsertMethod::Volume);
        assert_eq!(by_volume.aabb(), mixed.aabb());
        assert_eq!(by_volume.len(), mixed.len());
    }
}
