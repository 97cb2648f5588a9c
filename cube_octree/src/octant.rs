// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octant codes and the child presence mask.

use crate::types::Scalar;

bitflags::bitflags! {
    /// Presence flags for the eight children of an octree node.
    ///
    /// Bit `i` is set exactly when child octant `i` exists.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OctantMask: u8 {
        /// Low x, low y, low z.
        const OCTANT_0 = 0b0000_0001;
        /// High x, low y, low z.
        const OCTANT_1 = 0b0000_0010;
        /// Low x, high y, low z.
        const OCTANT_2 = 0b0000_0100;
        /// High x, high y, low z.
        const OCTANT_3 = 0b0000_1000;
        /// Low x, low y, high z.
        const OCTANT_4 = 0b0001_0000;
        /// High x, low y, high z.
        const OCTANT_5 = 0b0010_0000;
        /// Low x, high y, high z.
        const OCTANT_6 = 0b0100_0000;
        /// High x, high y, high z.
        const OCTANT_7 = 0b1000_0000;
    }
}

impl OctantMask {
    /// The flag for a single octant code in `0..8`.
    #[inline]
    pub const fn octant(code: u8) -> Self {
        debug_assert!(code < 8, "octant code out of range");
        Self::from_bits_retain(1 << code)
    }

    /// Whether the octant `code` is present.
    #[inline]
    pub const fn has(self, code: u8) -> bool {
        code < 8 && (self.bits() >> code) & 1 == 1
    }

    /// Present octant codes in ascending bit order.
    pub fn codes(self) -> impl Iterator<Item = u8> {
        (0..8_u8).filter(move |&code| self.has(code))
    }
}

/// Octant code of `point` relative to `center`.
///
/// Bit 0 is set when `x >= center.x`, bit 1 for y, bit 2 for z.
#[inline]
pub(crate) fn octant_code<T: Scalar>(point: [T; 3], center: [T; 3]) -> u8 {
    let mut code = 0;
    if point[0] >= center[0] {
        code |= 0b001;
    }
    if point[1] >= center[1] {
        code |= 0b010;
    }
    if point[2] >= center[2] {
        code |= 0b100;
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn code_bits_follow_axes() {
        let c = [1.0_f32, 1.0, 1.0];
        assert_eq!(octant_code([0.5, 0.5, 0.5], c), 0);
        assert_eq!(octant_code([1.5, 0.5, 0.5], c), 1);
        assert_eq!(octant_code([0.5, 1.5, 0.5], c), 2);
        assert_eq!(octant_code([0.5, 0.5, 1.5], c), 4);
        // On the plane counts as the upper half.
        assert_eq!(octant_code([1.0, 1.0, 1.0], c), 7);
    }

    #[test]
    fn mask_codes_in_bit_order() {
        let mask = OctantMask::octant(5) | OctantMask::octant(0) | OctantMask::OCTANT_7;
        assert!(mask.has(0));
        assert!(!mask.has(1));
        assert!(!mask.has(9));
        assert_eq!(mask.codes().collect::<Vec<_>>(), [0, 5, 7]);
        assert_eq!(OctantMask::empty().codes().count(), 0);
    }
}
