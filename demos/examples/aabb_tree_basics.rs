// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! AABB tree basics.
//!
//! Compare open and closed overlap, build a small tree, and query it.
//!
//! Run:
//! - `cargo run -p understory_aabb_tree_demos --example aabb_tree_basics`
//! - `RUST_LOG=understory_aabb_tree=trace cargo run -p understory_aabb_tree_demos --example aabb_tree_basics`

use tracing_subscriber::EnvFilter;
use understory_aabb_tree::{Aabb, AabbTree, QueryFlags, Traversal};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Boxes that share only a boundary.
    let a = Aabb::new([(0.0, 0.0)]).unwrap();
    let b = Aabb::new([(-1.0, 0.0)]).unwrap();
    println!(
        "{a} vs {b}: open={}, closed={}",
        a.overlaps(&b, false).unwrap(),
        a.overlaps(&b, true).unwrap()
    );

    let unit = Aabb::new([(0.0, 1.0), (0.0, 1.0), (0.0, 1.0)]).unwrap();
    println!("{unit}: volume={}, perimeter={}", unit.volume(), unit.perimeter());
    println!("corners: {:?}", unit.corners());

    let mut tree = AabbTree::new();
    tree.add(Aabb::new([(0.0, 1.0), (0.0, 1.0)]).unwrap(), "v1").unwrap();
    tree.add(Aabb::new([(3.0, 4.0), (0.0, 1.0)]).unwrap(), "v2").unwrap();
    tree.add(Aabb::new([(5.0, 6.0), (5.0, 6.0)]).unwrap(), "v3").unwrap();
    tree.add(Aabb::new([(7.0, 8.0), (5.0, 6.0)]).unwrap(), "v4").unwrap();
    println!("tree: {} leaves, depth {}", tree.len(), tree.depth());
    println!("{tree}");

    let probe = Aabb::new([(-3.0, 3.1), (-3.0, 3.0)]).unwrap();
    for traversal in [Traversal::DepthFirst, Traversal::BreadthFirst] {
        let hits = tree
            .overlap_pairs(&probe, traversal, QueryFlags::default())
            .unwrap();
        println!("{traversal:?} hits for {probe}: {hits:?}");
    }

    let miss = Aabb::new([(0.0, 1.0), (5.0, 6.0)]).unwrap();
    let overlaps = tree
        .does_overlap(&miss, Traversal::DepthFirst, QueryFlags::default())
        .unwrap();
    println!("{miss} overlaps the tree: {overlaps}");
    assert!(!overlaps, "the gap between the rows is empty");

    // Mismatched dimensionality is reported, not ignored.
    let err = tree
        .does_overlap(&unit, Traversal::DepthFirst, QueryFlags::default())
        .unwrap_err();
    println!("3D probe: {err}");
}
