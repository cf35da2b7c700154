// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental construction.
//!
//! Insert a small 2D scene one box at a time and print, after each step, the
//! tree dump and the bounding rectangle of every node grouped by depth.
//!
//! Run:
//! - `cargo run -p understory_aabb_tree_demos --example aabb_tree_incremental`
//! - `cargo run -p understory_aabb_tree_demos --example aabb_tree_incremental -- perimeter`

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_aabb_tree::{Aabb, AabbTree, InsertMethod, NodeRef};

fn scene() -> Vec<(&'static str, Aabb<f64>)> {
    let b = |x: (f64, f64), y: (f64, f64)| Aabb::new([x, y]).unwrap();
    vec![
        ("box 3", b((-16.0, -13.0), (-16.0, -13.0))),
        ("cross, vertical right", b((3.0, 5.0), (-15.0, 5.0))),
        ("box 1", b((-21.0, -18.0), (-21.0, -18.0))),
        ("cross, horizontal left", b((-6.0, 1.0), (-1.0, 2.0))),
        ("box 4", b((-12.0, -9.0), (-16.0, -13.0))),
        ("random", b((-15.0, -13.0), (-2.0, 2.0))),
        ("cross, vertical left", b((-1.0, 1.0), (-15.0, 5.0))),
        ("box 2", b((-17.0, -14.0), (-21.0, -18.0))),
        ("cross, horizontal right", b((3.0, 10.0), (-2.0, 1.0))),
    ]
}

/// Bounding rectangles of all nodes, one row per depth.
fn levels<V>(tree: &AabbTree<f64, V>) -> Vec<Vec<Rect>> {
    let mut rows = Vec::new();
    let mut row: Vec<NodeRef<'_, f64, V>> = tree.root().into_iter().collect();
    while !row.is_empty() {
        rows.push(
            row.iter()
                .filter_map(|n| Rect::try_from(n.aabb()).ok())
                .collect(),
        );
        row = row
            .iter()
            .filter_map(|n| n.children())
            .flat_map(|(l, r)| [l, r])
            .collect();
    }
    rows
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let method: InsertMethod = match std::env::args().nth(1) {
        Some(name) => match name.parse() {
            Ok(method) => method,
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(2);
            }
        },
        None => InsertMethod::default(),
    };

    let mut tree = AabbTree::with_method(method);
    for (i, (name, aabb)) in scene().into_iter().enumerate() {
        // Values are the insertion step, starting at 1.
        let step = i + 1;
        tree.add(aabb, step).unwrap();
        println!("== step {step} ({method:?}): added {name} ==");
        println!("{tree}");
        for (depth, rects) in levels(&tree).iter().enumerate() {
            println!("depth {depth}: {rects:?}");
        }
        println!();
    }
    println!("{} leaves, depth {}", tree.len(), tree.depth());
}
