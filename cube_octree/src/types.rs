// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display};

/// Axis-aligned bounding box in 3D.
///
/// Edges are inclusive: a box contains points on its boundary, and two boxes
/// that share a face overlap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb3D<T> {
    /// Minimum x
    pub min_x: T,
    /// Minimum y
    pub min_y: T,
    /// Minimum z
    pub min_z: T,
    /// Maximum x
    pub max_x: T,
    /// Maximum y
    pub max_y: T,
    /// Maximum z
    pub max_z: T,
}

impl<T> Aabb3D<T> {
    /// Create a new AABB from min/max coordinates.
    #[inline(always)]
    pub const fn new(min_x: T, min_y: T, min_z: T, max_x: T, max_y: T, max_z: T) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Create a new AABB from its minimum and maximum corners.
    #[inline]
    pub fn from_corners(min: [T; 3], max: [T; 3]) -> Self {
        let [min_x, min_y, min_z] = min;
        let [max_x, max_y, max_z] = max;
        Self::new(min_x, min_y, min_z, max_x, max_y, max_z)
    }
}

impl<T: Copy> Aabb3D<T> {
    /// Minimum corner as `[x, y, z]`.
    #[inline]
    pub fn min(&self) -> [T; 3] {
        [self.min_x, self.min_y, self.min_z]
    }

    /// Maximum corner as `[x, y, z]`.
    #[inline]
    pub fn max(&self) -> [T; 3] {
        [self.max_x, self.max_y, self.max_z]
    }
}

impl<T: Copy + PartialOrd> Aabb3D<T> {
    /// Whether this AABB contains the point.
    #[inline]
    pub fn contains_point(&self, x: T, y: T, z: T) -> bool {
        self.min_x <= x
            && self.min_y <= y
            && self.min_z <= z
            && x <= self.max_x
            && y <= self.max_y
            && z <= self.max_z
    }

    /// Whether `other` lies entirely inside this AABB (faces may touch).
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.min_z <= other.min_z
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
            && other.max_z <= self.max_z
    }

    /// Determines whether this AABB overlaps with another in any way.
    ///
    /// Faces are part of the box, so two AABBs that share a face overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_octree::Aabb3D;
    ///
    /// let a = Aabb3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
    /// let b = Aabb3D::new(1.0, 0.0, 0.0, 2.0, 1.0, 1.0);
    /// assert!(a.overlaps(&b));
    ///
    /// let c = Aabb3D::new(1.5, 0.0, 0.0, 2.0, 1.0, 1.0);
    /// assert!(!a.overlaps(&c));
    /// ```
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
            && self.min_z <= other.max_z
            && self.max_z >= other.min_z
    }

    /// The smallest AABB enclosing two AABBs.
    #[inline]
    pub fn union(&self, other: Self) -> Self {
        Self {
            min_x: min_t(self.min_x, other.min_x),
            min_y: min_t(self.min_y, other.min_y),
            min_z: min_t(self.min_z, other.min_z),
            max_x: max_t(self.max_x, other.max_x),
            max_y: max_t(self.max_y, other.max_y),
            max_z: max_t(self.max_z, other.max_z),
        }
    }

    /// Return true if the AABB has no volume (flat or inverted on some axis). Assumes no NaN.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y || self.max_z <= self.min_z
    }
}

impl<T: Scalar> Aabb3D<T> {
    /// Create an AABB from an origin and a size per axis.
    #[inline]
    pub fn from_origin_size(origin: [T; 3], size: [T; 3]) -> Self {
        Self::new(
            origin[0],
            origin[1],
            origin[2],
            T::add(origin[0], size[0]),
            T::add(origin[1], size[1]),
            T::add(origin[2], size[2]),
        )
    }

    /// A box with every coordinate at zero.
    #[inline]
    pub fn zero() -> Self {
        let z = T::zero();
        Self::new(z, z, z, z, z, z)
    }

    /// Center point as `[x, y, z]`.
    #[inline]
    pub fn center(&self) -> [T; 3] {
        [
            T::mid(self.min_x, self.max_x),
            T::mid(self.min_y, self.max_y),
            T::mid(self.min_z, self.max_z),
        ]
    }

    /// Side lengths as `[x, y, z]`, clamped at zero.
    #[inline]
    pub fn extent(&self) -> [T; 3] {
        [
            T::max(T::sub(self.max_x, self.min_x), T::zero()),
            T::max(T::sub(self.max_y, self.min_y), T::zero()),
            T::max(T::sub(self.max_z, self.min_z), T::zero()),
        ]
    }

    /// The sub-region for an octant code in `0..8`, split at the center.
    ///
    /// Bit 0 selects the upper half along x, bit 1 along y, bit 2 along z.
    #[inline]
    pub fn octant(&self, code: u8) -> Self {
        debug_assert!(code < 8, "octant code out of range: {code}");
        let [cx, cy, cz] = self.center();
        let (min_x, max_x) = if code & 0b001 != 0 {
            (cx, self.max_x)
        } else {
            (self.min_x, cx)
        };
        let (min_y, max_y) = if code & 0b010 != 0 {
            (cy, self.max_y)
        } else {
            (self.min_y, cy)
        };
        let (min_z, max_z) = if code & 0b100 != 0 {
            (cz, self.max_z)
        } else {
            (self.min_z, cz)
        };
        Self::new(min_x, min_y, min_z, max_x, max_y, max_z)
    }

    /// The smallest cube anchored at this box's minimum corner whose side is a
    /// power of two and covers the longest extent.
    pub fn enclosing_cube(&self) -> Self {
        let [ex, ey, ez] = self.extent();
        let side = T::pow2_ceil(T::max(ex, T::max(ey, ez)));
        Self::from_origin_size(self.min(), [side, side, side])
    }
}

impl<T: Display> Display for Aabb3D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({}, {}, {}) - ({}, {}, {})]",
            self.min_x, self.min_y, self.min_z, self.max_x, self.max_y, self.max_z
        )
    }
}

/// Numeric scalar abstraction for 3D AABBs used by the octree.
///
/// This trait provides the small set of operations needed for centers,
/// subdivision, and the enclosing cube of an inferred root region.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// One unit (a single grid cell).
    fn one() -> Self;

    /// Max of the two scalar values.
    fn max(a: Self, b: Self) -> Self;

    /// Min of the two scalar values.
    fn min(a: Self, b: Self) -> Self;

    /// Midpoint between a and b (used for centers and split planes).
    fn mid(a: Self, b: Self) -> Self;

    /// Smallest power of two that is `>= v`; values up to one map to one.
    fn pow2_ceil(v: Self) -> Self;

    /// Convert a grid coordinate.
    fn from_u32(v: u32) -> Self;
}

macro_rules! float_scalar {
    ($t:ty) => {
        impl Scalar for $t {
            #[inline]
            fn add(a: Self, b: Self) -> Self {
                a + b
            }

            #[inline]
            fn sub(a: Self, b: Self) -> Self {
                a - b
            }

            #[inline(always)]
            fn zero() -> Self {
                0.0
            }

            #[inline(always)]
            fn one() -> Self {
                1.0
            }

            #[inline]
            fn max(a: Self, b: Self) -> Self {
                Self::max(a, b)
            }

            #[inline]
            fn min(a: Self, b: Self) -> Self {
                Self::min(a, b)
            }

            #[inline]
            fn mid(a: Self, b: Self) -> Self {
                0.5 * (a + b)
            }

            fn pow2_ceil(v: Self) -> Self {
                let mut side = 1.0;
                // Terminates for infinities too: doubling saturates at +inf.
                while side < v {
                    side *= 2.0;
                }
                side
            }

            #[inline]
            fn from_u32(v: u32) -> Self {
                v as Self
            }
        }
    };
}

float_scalar!(f32);
float_scalar!(f64);

impl Scalar for i64 {
    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline(always)]
    fn zero() -> Self {
        0
    }

    #[inline(always)]
    fn one() -> Self {
        1
    }

    #[inline]
    fn max(a: Self, b: Self) -> Self {
        core::cmp::max(a, b)
    }

    #[inline]
    fn min(a: Self, b: Self) -> Self {
        core::cmp::min(a, b)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Floor average without overflow.
        (a & b) + ((a ^ b) >> 1)
    }

    fn pow2_ceil(v: Self) -> Self {
        if v <= 1 {
            return 1;
        }
        u64::try_from(v)
            .ok()
            .and_then(u64::checked_next_power_of_two)
            .and_then(|p| Self::try_from(p).ok())
            .unwrap_or(Self::MAX)
    }

    #[inline]
    fn from_u32(v: u32) -> Self {
        Self::from(v)
    }
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}
