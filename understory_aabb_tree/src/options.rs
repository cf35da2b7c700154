// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion and query options.

use alloc::string::ToString;
use core::str::FromStr;

use crate::error::Error;

/// Cost function used by [`AabbTree::add`](crate::AabbTree::add) to place a new box.
///
/// At every internal node the tree compares three placements: wrap the whole
/// subtree in a new parent next to the new leaf, descend left, or descend right.
/// A new parent is chosen only when strictly cheaper than both descents; ties
/// between left and right go right.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InsertMethod {
    /// Growth in bounding volume plus resulting sibling overlap volume.
    ///
    /// With `p` the node, `l`/`r` its children, `x` the new box and `V` volume:
    ///
    /// - new parent: `V(p ∪ x) + V(p ∩ x)`
    /// - left: `V(p ∪ x) - V(p) + V(l ∪ x) - V(l) + V((l ∪ x) ∩ r)`
    /// - right: `V(p ∪ x) - V(p) + V(r ∪ x) - V(r) + V((r ∪ x) ∩ l)`
    #[default]
    Volume,
    /// Surface-area style heuristic on generalized perimeters `P`.
    ///
    /// - new parent: `2 P(p ∪ x)`
    /// - left: `P(l ∪ x) + 2 (P(p ∪ x) - P(p)) - P(l)`, where `P(l)` is only
    ///   subtracted when `l` is an internal node
    /// - right: symmetric
    ///
    /// One-dimensional boxes have zero perimeter, so every placement costs the
    /// same and insertion always descends right.
    Perimeter,
}

impl FromStr for InsertMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "volume" => Ok(Self::Volume),
            "perimeter" => Ok(Self::Perimeter),
            _ => Err(Error::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Order in which overlap queries visit node pairs.
///
/// Both strategies visit every pair that survives pruning and therefore find the
/// same set of overlaps; only the output order differs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Depth-first: each pair's children are fully explored before its siblings.
    #[default]
    DepthFirst,
    /// Breadth-first: pairs are processed in arrival order from a FIFO queue.
    BreadthFirst,
}

impl FromStr for Traversal {
    type Err = Error;

    /// Accepts `"DFS"` and `"BFS"`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("dfs") {
            Ok(Self::DepthFirst)
        } else if s.eq_ignore_ascii_case("bfs") {
            Ok(Self::BreadthFirst)
        } else {
            Err(Error::UnsupportedStrategy(s.to_string()))
        }
    }
}

bitflags::bitflags! {
    /// Flags controlling overlap queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct QueryFlags: u8 {
        /// Touching boundaries count as overlap (closed boxes).
        const CLOSED = 0b0000_0001;
        /// Report each distinct leaf box at most once (first occurrence wins).
        const UNIQUE = 0b0000_0010;
    }
}

impl Default for QueryFlags {
    /// Open overlap with duplicates removed.
    fn default() -> Self {
        Self::UNIQUE
    }
}

impl QueryFlags {
    /// Whether [`QueryFlags::CLOSED`] is set.
    pub fn closed(self) -> bool {
        self.contains(Self::CLOSED)
    }

    /// Whether [`QueryFlags::UNIQUE`] is set.
    pub fn unique(self) -> bool {
        self.contains(Self::UNIQUE)
    }
}
