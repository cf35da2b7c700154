// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions between two-dimensional boxes and [`kurbo`] geometry.

use kurbo::{Point, Rect};

use crate::aabb::Aabb;
use crate::error::Error;

impl TryFrom<Rect> for Aabb<f64> {
    type Error = Error;

    /// Dimension 0 is `x`, dimension 1 is `y`. Each axis is normalized first,
    /// so flipped rectangles produce the same box.
    ///
    /// Fails with [`Error::InvalidBounds`] for NaN coordinates.
    fn try_from(rect: Rect) -> Result<Self, Self::Error> {
        Self::new([ordered(rect.x0, rect.x1), ordered(rect.y0, rect.y1)])
    }
}

/// Swaps a flipped pair. NaN is left in place for validation to reject.
fn ordered(a: f64, b: f64) -> (f64, f64) {
    if b < a { (b, a) } else { (a, b) }
}

impl TryFrom<Point> for Aabb<f64> {
    type Error = Error;

    /// A degenerate box covering the point.
    ///
    /// Fails with [`Error::InvalidBounds`] for NaN coordinates.
    fn try_from(p: Point) -> Result<Self, Self::Error> {
        Self::new([(p.x, p.x), (p.y, p.y)])
    }
}

impl TryFrom<&Aabb<f64>> for Rect {
    type Error = Error;

    fn try_from(aabb: &Aabb<f64>) -> Result<Self, Self::Error> {
        match *aabb.limits() {
            [(x0, x1), (y0, y1)] => Ok(Self::new(x0, y0, x1, y1)),
            _ => Err(Error::DimensionMismatch {
                expected: 2,
                found: aabb.dims(),
            }),
        }
    }
}
