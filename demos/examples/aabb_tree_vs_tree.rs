// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree-vs-tree overlap.
//!
//! Query a tree of static obstacles with a tree of moving bodies, with and
//! without duplicate removal.
//!
//! Run:
//! - `cargo run -p understory_aabb_tree_demos --example aabb_tree_vs_tree`

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_aabb_tree::{Aabb, AabbTree, QueryFlags, Traversal};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut obstacles = AabbTree::new();
    for (name, r) in [
        ("floor", Rect::new(0.0, 0.0, 100.0, 2.0)),
        ("left wall", Rect::new(0.0, 0.0, 2.0, 50.0)),
        ("right wall", Rect::new(98.0, 0.0, 100.0, 50.0)),
        ("ledge", Rect::new(40.0, 20.0, 60.0, 22.0)),
    ] {
        obstacles.add(Aabb::try_from(r).unwrap(), name).unwrap();
    }

    let mut bodies = AabbTree::new();
    for (id, r) in [
        (1_u32, Rect::new(10.0, 1.0, 14.0, 5.0)),
        (2, Rect::new(20.0, 1.5, 24.0, 5.5)),
        (3, Rect::new(45.0, 21.0, 49.0, 25.0)),
        (4, Rect::new(70.0, 30.0, 74.0, 34.0)),
    ] {
        bodies.add(Aabb::try_from(r).unwrap(), id).unwrap();
    }

    for traversal in [Traversal::DepthFirst, Traversal::BreadthFirst] {
        let all = obstacles
            .overlap_values(&bodies, traversal, QueryFlags::empty())
            .unwrap();
        let unique = obstacles
            .overlap_values(&bodies, traversal, QueryFlags::UNIQUE)
            .unwrap();
        println!("{traversal:?}: every pair {all:?}");
        println!("{traversal:?}: unique {unique:?}");
    }

    // The relation is symmetric at the box level: ask the bodies which of them touch.
    let touching = bodies
        .overlap_values(&obstacles, Traversal::DepthFirst, QueryFlags::UNIQUE)
        .unwrap();
    println!("bodies touching an obstacle: {touching:?}");
    assert!(!touching.contains(&&4), "body 4 is in free space");
}
