// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by boxes, trees and option parsing.

use alloc::string::String;

/// Errors reported by box construction, tree insertion and queries.
///
/// Every error is raised at the call that violates the contract; nothing is
/// retried or partially applied.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A dimension's bounds are not a `(lower, upper)` pair with `lower <= upper`.
    #[error("invalid bounds in dimension {dim}: {reason}")]
    InvalidBounds {
        /// Index of the offending dimension.
        dim: usize,
        /// What is wrong with the pair.
        reason: &'static str,
    },

    /// Two non-empty boxes (or a box and a tree) have different dimensionality.
    #[error("dimension mismatch: expected {expected} dimensions, found {found}")]
    DimensionMismatch {
        /// Dimensionality of the receiver.
        expected: usize,
        /// Dimensionality of the argument.
        found: usize,
    },

    /// Unknown insertion cost method name.
    #[error("unrecognized insertion method: {0:?}")]
    UnsupportedMethod(String),

    /// Unknown traversal strategy name.
    #[error("traversal strategy should be \"DFS\" or \"BFS\", not {0:?}")]
    UnsupportedStrategy(String),

    /// A literal branch's box is not the merge of its children's boxes.
    #[error("branch at depth {depth} does not bound exactly its children")]
    InconsistentBranch {
        /// Depth of the offending branch (root is 0).
        depth: usize,
    },
}
