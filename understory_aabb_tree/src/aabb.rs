// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The d-dimensional axis-aligned bounding box.

use alloc::vec::Vec;
use core::fmt;

use crate::error::Error;
use crate::types::{Scalar, le, lt, max_t, min_t};

/// Axis-aligned bounding box over any number of dimensions.
///
/// A box is a sequence of `(lower, upper)` pairs, one per dimension, or the
/// empty box which has no dimensions at all. Boxes are values: every
/// operation that combines boxes returns a new one.
///
/// ```rust
/// use understory_aabb_tree::Aabb;
///
/// let a = Aabb::new([(0.0, 1.0), (0.0, 1.0)]).unwrap();
/// let b = Aabb::new([(3.0, 4.0), (0.0, 1.0)]).unwrap();
/// let m = a.merge(&b).unwrap();
/// assert_eq!(m, Aabb::new([(0.0, 4.0), (0.0, 1.0)]).unwrap());
/// assert_eq!(m.volume(), 4.0);
/// assert!(!a.overlaps(&b, false).unwrap());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Aabb<T> {
    limits: Vec<(T, T)>,
}

impl<T> Aabb<T> {
    /// The empty box. It has no dimensions and overlaps nothing.
    pub const fn empty() -> Self {
        Self { limits: Vec::new() }
    }

    /// True for the empty box.
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Number of dimensions (zero for the empty box).
    pub fn dims(&self) -> usize {
        self.limits.len()
    }

    /// The `(lower, upper)` pairs, one per dimension.
    pub fn limits(&self) -> &[(T, T)] {
        &self.limits
    }

    /// Iterate the `(lower, upper)` pairs.
    pub fn iter(&self) -> core::slice::Iter<'_, (T, T)> {
        self.limits.iter()
    }
}

impl<T: Scalar> Aabb<T> {
    /// Create a box from `(lower, upper)` pairs.
    ///
    /// An empty sequence produces the empty box.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBounds`] if any pair has `lower > upper` or is unordered (NaN).
    pub fn new<I>(limits: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (T, T)>,
    {
        let limits: Vec<(T, T)> = limits.into_iter().collect();
        for (dim, &(lower, upper)) in limits.iter().enumerate() {
            if !le(lower, upper) {
                return Err(Error::InvalidBounds {
                    dim,
                    reason: "lower bound exceeds upper bound",
                });
            }
        }
        Ok(Self { limits })
    }

    /// Create a box from rows of endpoints, each of which must hold exactly two values.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBounds`] if a row does not have two endpoints or is out of order.
    pub fn from_rows<I, R>(rows: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[T]>,
    {
        let mut limits = Vec::new();
        for (dim, row) in rows.into_iter().enumerate() {
            match *row.as_ref() {
                [lower, upper] => limits.push((lower, upper)),
                _ => {
                    return Err(Error::InvalidBounds {
                        dim,
                        reason: "expected exactly two endpoints",
                    });
                }
            }
        }
        Self::new(limits)
    }

    /// Lower bound of dimension `dim`, if present.
    pub fn lower(&self, dim: usize) -> Option<T> {
        self.limits.get(dim).map(|l| l.0)
    }

    /// Upper bound of dimension `dim`, if present.
    pub fn upper(&self, dim: usize) -> Option<T> {
        self.limits.get(dim).map(|l| l.1)
    }

    /// The smallest box containing both `self` and `other`.
    ///
    /// Merging with the empty box returns the other box unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if both boxes are non-empty with different dimensionality.
    pub fn merge(&self, other: &Self) -> Result<Self, Error> {
        self.check_dims(other)?;
        Ok(self.merge_unchecked(other))
    }

    /// Product of the side lengths. The empty box has zero volume.
    pub fn volume(&self) -> T::Acc {
        let mut sides = self.side_lengths();
        let Some(first) = sides.next() else {
            return T::acc_from_usize(0);
        };
        sides.fold(first, T::acc_mul)
    }

    /// Generalized perimeter: `2 * Σ_i Π_{j≠i} length_j`.
    ///
    /// This is the perimeter in two dimensions and the surface area in three.
    /// Boxes with fewer than two dimensions have zero perimeter.
    pub fn perimeter(&self) -> T::Acc {
        let n = self.dims();
        let mut total = T::acc_from_usize(0);
        if n < 2 {
            return total;
        }
        let sides: Vec<T::Acc> = self.side_lengths().collect();
        for skip in 0..n {
            let mut face: Option<T::Acc> = None;
            for (j, &l) in sides.iter().enumerate() {
                if j != skip {
                    face = Some(face.map_or(l, |f| T::acc_mul(f, l)));
                }
            }
            if let Some(face) = face {
                total = T::acc_add(total, face);
            }
        }
        T::acc_mul(T::acc_from_usize(2), total)
    }

    /// All `2^d` corner points.
    ///
    /// Corner `i` takes the upper bound in dimension `d` when bit `dims - 1 - d`
    /// of `i` is set, so the first dimension varies slowest.
    ///
    /// The empty box has no corners. Neither does a box with `usize::BITS` or
    /// more dimensions, whose corner count is not representable.
    pub fn corners(&self) -> Vec<Vec<T>> {
        let n = self.dims();
        let Some(count) = u32::try_from(n)
            .ok()
            .and_then(|shift| 1_usize.checked_shl(shift))
        else {
            return Vec::new();
        };
        if n == 0 {
            return Vec::new();
        }
        (0..count)
            .map(|i| {
                self.limits
                    .iter()
                    .enumerate()
                    .map(|(d, &(lower, upper))| {
                        if (i >> (n - 1 - d)) & 1 == 1 {
                            upper
                        } else {
                            lower
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Whether the two boxes intersect.
    ///
    /// With `closed` set, touching boundaries count as an intersection; otherwise
    /// a positive-measure overlap is required in every dimension. The empty box
    /// never overlaps anything.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if both boxes are non-empty with different dimensionality.
    pub fn overlaps(&self, other: &Self, closed: bool) -> Result<bool, Error> {
        self.check_dims(other)?;
        Ok(self.overlaps_unchecked(other, closed))
    }

    /// Volume of the intersection of the two boxes (zero when disjoint or empty).
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if both boxes are non-empty with different dimensionality.
    pub fn overlap_volume(&self, other: &Self) -> Result<T::Acc, Error> {
        self.check_dims(other)?;
        Ok(self.overlap_volume_unchecked(other))
    }

    /// Ok when either box is empty or both have the same dimensionality.
    pub(crate) fn check_dims(&self, other: &Self) -> Result<(), Error> {
        if self.is_empty() || other.is_empty() || self.dims() == other.dims() {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.dims(),
                found: other.dims(),
            })
        }
    }

    pub(crate) fn merge_unchecked(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let limits = self
            .limits
            .iter()
            .zip(&other.limits)
            .map(|(&(l1, u1), &(l2, u2))| (min_t(l1, l2), max_t(u1, u2)))
            .collect();
        Self { limits }
    }

    pub(crate) fn overlaps_unchecked(&self, other: &Self, closed: bool) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.limits
            .iter()
            .zip(&other.limits)
            .all(|(&(min1, max1), &(min2, max2))| {
                if closed {
                    le(min1, max2) && le(min2, max1)
                } else {
                    lt(min1, max2) && lt(min2, max1)
                }
            })
    }

    pub(crate) fn overlap_volume_unchecked(&self, other: &Self) -> T::Acc {
        let zero = T::acc_from_usize(0);
        if self.is_empty() || other.is_empty() {
            return zero;
        }
        let mut volume: Option<T::Acc> = None;
        for (&(min1, max1), &(min2, max2)) in self.limits.iter().zip(&other.limits) {
            let lo = max_t(min1, min2);
            let hi = min_t(max1, max2);
            if !lt(lo, hi) {
                return zero;
            }
            let side = T::acc_sub(T::widen(hi), T::widen(lo));
            volume = Some(volume.map_or(side, |v| T::acc_mul(v, side)));
        }
        volume.unwrap_or(zero)
    }

    fn side_lengths(&self) -> impl Iterator<Item = T::Acc> + '_ {
        self.limits
            .iter()
            .map(|&(lower, upper)| T::acc_sub(T::widen(upper), T::widen(lower)))
    }
}

impl<T> Default for Aabb<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> core::ops::Index<usize> for Aabb<T> {
    type Output = (T, T);

    fn index(&self, dim: usize) -> &Self::Output {
        &self.limits[dim]
    }
}

impl<'a, T> IntoIterator for &'a Aabb<T> {
    type Item = &'a (T, T);
    type IntoIter = core::slice::Iter<'a, (T, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.limits.iter()
    }
}

impl<T: fmt::Display> fmt::Display for Aabb<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.limits.is_empty() {
            return f.write_str("None");
        }
        f.write_str("[")?;
        for (i, (lower, upper)) in self.limits.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({lower}, {upper})")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn b2(x: (f64, f64), y: (f64, f64)) -> Aabb<f64> {
        Aabb::new([x, y]).unwrap()
    }

    #[test]
    fn construction_validates_pairs() {
        let a = Aabb::new([(0_i64, 1), (0, 1)]).unwrap();
        assert_eq!(a.dims(), 2);
        assert_eq!(a[1], (0, 1));
        assert_eq!(
            Aabb::new([(0_i64, 1), (3, 2)]),
            Err(Error::InvalidBounds {
                dim: 1,
                reason: "lower bound exceeds upper bound"
            })
        );
        assert!(
            Aabb::new([(f64::NAN, 1.0)]).is_err(),
            "NaN endpoints are rejected"
        );
        assert!(Aabb::<i64>::new([]).unwrap().is_empty());
    }

    #[test]
    fn rows_must_be_pairs() {
        let ok = Aabb::from_rows([[0.0, 1.0], [2.0, 3.0]]).unwrap();
        assert_eq!(ok, b2((0.0, 1.0), (2.0, 3.0)));
        let err = Aabb::from_rows([vec![0.0, 1.0], vec![1.0, 2.0, 3.0]]).unwrap_err();
        assert!(
            matches!(err, Error::InvalidBounds { dim: 1, .. }),
            "three endpoints are malformed: {err:?}"
        );
    }

    #[test]
    fn equality_rules() {
        assert_eq!(Aabb::<f64>::empty(), Aabb::empty());
        assert_ne!(Aabb::empty(), b2((0.0, 1.0), (0.0, 1.0)));
        assert_ne!(
            Aabb::new([(0.0, 1.0)]).unwrap(),
            b2((0.0, 1.0), (0.0, 1.0)),
            "different dimensionality is never equal"
        );
    }

    #[test]
    fn merge_properties() {
        let a = b2((0.0, 1.0), (0.0, 1.0));
        let b = b2((3.0, 4.0), (-2.0, 0.5));
        let m = a.merge(&b).unwrap();
        assert_eq!(m, b2((0.0, 4.0), (-2.0, 1.0)));
        assert_eq!(m, b.merge(&a).unwrap(), "merge is commutative");
        assert!(m.volume() >= a.volume() && m.volume() >= b.volume());
        assert_eq!(a.merge(&Aabb::empty()).unwrap(), a);
        assert_eq!(Aabb::empty().merge(&a).unwrap(), a);
        assert!(Aabb::<f64>::empty().merge(&Aabb::empty()).unwrap().is_empty());
        assert_eq!(
            a.merge(&Aabb::new([(0.0, 1.0)]).unwrap()),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn volume_and_perimeter() {
        let cube = Aabb::new([(0_i64, 2), (0, 3), (0, 4)]).unwrap();
        assert_eq!(cube.volume(), 24);
        assert_eq!(cube.perimeter(), 2 * (3 * 4 + 2 * 4 + 2 * 3));
        let rect = b2((0.0, 2.0), (1.0, 4.0));
        assert_eq!(rect.perimeter(), 10.0);
        assert_eq!(Aabb::new([(1.0, 5.0)]).unwrap().perimeter(), 0.0);
        assert_eq!(Aabb::new([(1.0, 5.0)]).unwrap().volume(), 4.0);
        assert_eq!(b2((0.0, 0.0), (0.0, 5.0)).volume(), 0.0, "degenerate side");
        assert_eq!(Aabb::<f32>::empty().volume(), 0.0);
    }

    #[test]
    fn corners_follow_binary_enumeration() {
        let a = Aabb::new([(0_i64, 1), (10, 11)]).unwrap();
        assert_eq!(
            a.corners(),
            vec![vec![0, 10], vec![0, 11], vec![1, 10], vec![1, 11]]
        );
        let cube = Aabb::new([(0_i64, 1), (0, 1), (0, 1)]).unwrap();
        assert_eq!(cube.corners().len(), 8);
        assert_eq!(cube.corners()[1], vec![0, 0, 1]);
        assert!(Aabb::<i64>::empty().corners().is_empty());
        let too_many = Aabb::new((0..usize::BITS).map(|_| (0_i64, 1))).unwrap();
        assert!(too_many.corners().is_empty(), "unaddressable corner count");
    }

    #[test]
    fn open_and_closed_overlap() {
        let a = Aabb::new([(0.0, 0.0)]).unwrap();
        let b = Aabb::new([(-1.0, 0.0)]).unwrap();
        assert!(!a.overlaps(&b, false).unwrap(), "touching is not open overlap");
        assert!(a.overlaps(&b, true).unwrap(), "touching is closed overlap");
        assert_eq!(a.overlaps(&b, true), b.overlaps(&a, true));

        let c = b2((0.0, 1.0), (0.0, 1.0));
        let d = b2((0.5, 2.0), (0.5, 2.0));
        assert!(c.overlaps(&d, false).unwrap());
        assert!(d.overlaps(&c, false).unwrap());
        assert!(!Aabb::<f64>::empty().overlaps(&Aabb::empty(), true).unwrap());
        assert!(!c.overlaps(&Aabb::empty(), true).unwrap());
        assert!(c.overlaps(&Aabb::new([(0.0, 1.0)]).unwrap(), true).is_err());
    }

    #[test]
    fn overlap_volume_clips_to_zero() {
        let a = b2((0.0, 2.0), (0.0, 2.0));
        let b = b2((1.0, 3.0), (1.5, 4.0));
        assert_eq!(a.overlap_volume(&b).unwrap(), 0.5);
        let far = b2((5.0, 6.0), (0.0, 2.0));
        assert_eq!(a.overlap_volume(&far).unwrap(), 0.0);
        let touching = b2((2.0, 3.0), (0.0, 2.0));
        assert_eq!(a.overlap_volume(&touching).unwrap(), 0.0);
        assert_eq!(a.overlap_volume(&Aabb::empty()).unwrap(), 0.0);
    }

    /// Boxes on a small integer grid, so degenerate and touching pairs are common.
    fn grid_box<T: Scalar>(rng: &mut StdRng, dims: usize, conv: impl Fn(i32) -> T) -> Aabb<T> {
        Aabb::new((0..dims).map(|_| {
            let lo = rng.random_range(-4..=4);
            let width = rng.random_range(0..=3);
            (conv(lo), conv(lo + width))
        }))
        .unwrap()
    }

    fn check_pair_properties<T: Scalar + fmt::Display>(a: &Aabb<T>, b: &Aabb<T>) {
        let ab = a.merge(b).unwrap();
        assert_eq!(ab, b.merge(a).unwrap(), "merge commutes: {a} {b}");
        assert_eq!(a.merge(&Aabb::empty()).unwrap(), *a, "empty is the identity: {a}");
        assert_eq!(Aabb::empty().merge(a).unwrap(), *a, "empty is the identity: {a}");
        assert!(
            ab.volume() >= a.volume() && ab.volume() >= b.volume(),
            "merged volume bounds both inputs: {a} {b}"
        );
        for closed in [false, true] {
            assert_eq!(
                a.overlaps(b, closed).unwrap(),
                b.overlaps(a, closed).unwrap(),
                "overlap is symmetric (closed={closed}): {a} {b}"
            );
        }
        if a.overlaps(b, false).unwrap() {
            assert!(a.overlaps(b, true).unwrap(), "open overlap implies closed: {a} {b}");
        }
    }

    #[test]
    fn random_pair_properties() {
        let mut rng = StdRng::seed_from_u64(0x5EED_AABB);
        let mut touching = 0;
        let mut degenerate = 0;
        for _ in 0..500 {
            let dims = rng.random_range(1..=3);
            let a = grid_box(&mut rng, dims, f64::from);
            let b = grid_box(&mut rng, dims, f64::from);
            if a.overlaps(&b, true).unwrap() && !a.overlaps(&b, false).unwrap() {
                touching += 1;
            }
            if a.volume() == 0.0 {
                degenerate += 1;
            }
            check_pair_properties(&a, &b);

            let a = grid_box(&mut rng, dims, i64::from);
            let b = grid_box(&mut rng, dims, i64::from);
            check_pair_properties(&a, &b);
        }
        assert!(touching > 0, "the grid produces touching pairs");
        assert!(degenerate > 0, "the grid produces zero-width boxes");
    }

    #[test]
    fn display_matches_limits() {
        assert_eq!(Aabb::new([(0_i64, 1), (2, 3)]).unwrap().to_string(), "[(0, 1), (2, 3)]");
        assert_eq!(Aabb::<i64>::empty().to_string(), "None");
    }
}
