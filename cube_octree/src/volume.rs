// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded volumes: the unit of storage in the octree.

use core::fmt::{self, Debug, Display};

use crate::types::{Aabb3D, Scalar};

/// An axis-aligned box with an opaque payload.
///
/// Volumes are immutable once created. After insertion the octree node that
/// stores a volume is its only owner.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundedVolume<T, P> {
    aabb: Aabb3D<T>,
    payload: P,
}

impl<T, P> BoundedVolume<T, P> {
    /// Create a volume from a box and a payload.
    #[inline]
    pub const fn new(aabb: Aabb3D<T>, payload: P) -> Self {
        Self { aabb, payload }
    }

    /// The bounding box.
    #[inline]
    pub const fn aabb(&self) -> &Aabb3D<T> {
        &self.aabb
    }

    /// The payload.
    #[inline]
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    /// Consume the volume and return its payload.
    #[inline]
    pub fn into_payload(self) -> P {
        self.payload
    }
}

impl<T: Copy, P> BoundedVolume<T, P> {
    /// Minimum corner.
    #[inline]
    pub fn min(&self) -> [T; 3] {
        self.aabb.min()
    }

    /// Maximum corner.
    #[inline]
    pub fn max(&self) -> [T; 3] {
        self.aabb.max()
    }
}

impl<T: Scalar, P> BoundedVolume<T, P> {
    /// Center of the bounding box.
    #[inline]
    pub fn centroid(&self) -> [T; 3] {
        self.aabb.center()
    }
}

impl<T: Display, P: Debug> Display for BoundedVolume<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.aabb, self.payload)
    }
}
