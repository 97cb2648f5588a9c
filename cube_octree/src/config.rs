// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subdivision policy for [`Octree::build`](crate::Octree::build).

use crate::types::Scalar;

/// Limits that stop the build pass from subdividing a node.
///
/// A node is split only when it holds at least `split_threshold` volumes,
/// its depth is below `max_depth`, and at least one side of its region is
/// longer than `min_size`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctreeConfig<T> {
    /// Minimum number of volumes a node must hold before it is split.
    pub split_threshold: usize,
    /// Regions whose sides are all at most this long are never split.
    pub min_size: T,
    /// Maximum depth below the root.
    pub max_depth: usize,
}

impl<T: Scalar> Default for OctreeConfig<T> {
    fn default() -> Self {
        Self {
            split_threshold: 2,
            min_size: T::one(),
            max_depth: 16,
        }
    }
}

impl<T: Scalar> OctreeConfig<T> {
    /// Set the minimum number of volumes required to split a node.
    pub fn with_split_threshold(mut self, threshold: usize) -> Self {
        self.split_threshold = threshold;
        self
    }

    /// Set the smallest region side that may still be split.
    pub fn with_min_size(mut self, min_size: T) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the maximum depth below the root.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub(crate) fn should_split(&self, extent: [T; 3], depth: usize, volumes: usize) -> bool {
        volumes >= self.split_threshold.max(1)
            && depth < self.max_depth
            && extent.iter().any(|&side| side > self.min_size)
    }
}
