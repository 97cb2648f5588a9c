// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-level occupancy grids and their world-space extents.

use glam::{UVec3, Vec3};

use crate::document::LevelDocument;
use crate::error::LevelError;

/// World-space extents reported by a level document.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extents {
    /// Minimum world corner.
    pub min: Vec3,
    /// Maximum world corner.
    pub max: Vec3,
    /// World size of the whole grid.
    pub size: Vec3,
}

impl Extents {
    /// World size of one cell for a grid of `dims` cells.
    ///
    /// Axes with zero cells report zero.
    pub fn cell_size(&self, dims: UVec3) -> Vec3 {
        let dims = dims.as_vec3();
        Vec3::select(dims.cmpgt(Vec3::ZERO), self.size / dims, Vec3::ZERO)
    }
}

/// Occupancy of one level's cube grid.
///
/// Scratch data: the level loader turns occupied cells into volumes and keeps
/// only the dimensions and extents.
#[derive(Clone, Debug, PartialEq)]
pub struct GridOccupancy {
    dims: UVec3,
    cells: Vec<bool>,
    extents: Extents,
}

impl GridOccupancy {
    /// Largest number of cells a grid may declare.
    pub const MAX_CELLS: usize = 1 << 24;

    /// Create an empty grid of `dims` cells.
    ///
    /// Fails with [`LevelError::InvalidGridSize`] when the grid would have
    /// more than [`MAX_CELLS`](Self::MAX_CELLS) cells.
    pub fn new(dims: UVec3, extents: Extents) -> Result<Self, LevelError> {
        let len = (dims.x as usize)
            .checked_mul(dims.y as usize)
            .and_then(|n| n.checked_mul(dims.z as usize))
            .filter(|&n| n <= Self::MAX_CELLS)
            .ok_or(LevelError::InvalidGridSize {
                x: dims.x,
                y: dims.y,
                z: dims.z,
                max: Self::MAX_CELLS,
            })?;
        Ok(Self {
            dims,
            cells: vec![false; len],
            extents,
        })
    }

    pub(crate) fn from_document(doc: &LevelDocument) -> Result<Self, LevelError> {
        let size = doc.grid_size;
        let e = doc.extents;
        let extents = Extents {
            min: Vec3::new(e.x_min, e.y_min, e.z_min),
            max: Vec3::new(e.x_max, e.y_max, e.z_max),
            size: Vec3::new(e.x_size, e.y_size, e.z_size),
        };
        let mut grid = Self::new(UVec3::new(size.x, size.y, size.z), extents)?;
        // Missing entries stay unoccupied; entries beyond the grid are ignored.
        for (x, plane) in doc.cube_exists.iter().take(size.x as usize).enumerate() {
            for (y, row) in plane.iter().take(size.y as usize).enumerate() {
                for (z, &occupied) in row.iter().take(size.z as usize).enumerate() {
                    if occupied {
                        let i = grid.index(x, y, z);
                        grid.cells[i] = true;
                    }
                }
            }
        }
        Ok(grid)
    }

    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.dims.y as usize + y) * self.dims.z as usize + z
    }

    fn offset(&self, x: u32, y: u32, z: u32) -> Option<usize> {
        (x < self.dims.x && y < self.dims.y && z < self.dims.z)
            .then(|| self.index(x as usize, y as usize, z as usize))
    }

    /// Mark a cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, z: u32, occupied: bool) {
        if let Some(i) = self.offset(x, y, z) {
            self.cells[i] = occupied;
        }
    }

    /// Whether the cell is occupied. Out-of-range cells are not.
    pub fn is_occupied(&self, x: u32, y: u32, z: u32) -> bool {
        self.offset(x, y, z).is_some_and(|i| self.cells[i])
    }

    /// Grid dimensions in cells.
    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    /// World-space extents.
    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Occupied cells in `x`, then `y`, then `z` order.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Cell coordinates are below the u32 grid dimensions."
    )]
    pub fn occupied(&self) -> impl Iterator<Item = UVec3> + '_ {
        let (dy, dz) = (self.dims.y as usize, self.dims.z as usize);
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c)
            .map(move |(i, _)| {
                let (xy, z) = (i / dz, i % dz);
                UVec3::new((xy / dy) as u32, (xy % dy) as u32, z as u32)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupied_cells_in_axis_order() {
        let mut grid = GridOccupancy::new(UVec3::new(2, 2, 2), Extents::default()).unwrap();
        grid.set(1, 0, 1, true);
        grid.set(0, 1, 0, true);
        grid.set(9, 0, 0, true);
        assert_eq!(grid.occupied_count(), 2);
        let cells: Vec<_> = grid.occupied().collect();
        assert_eq!(cells, [UVec3::new(0, 1, 0), UVec3::new(1, 0, 1)]);
        assert!(!grid.is_occupied(2, 0, 0));
    }

    #[test]
    fn oversized_grids_are_rejected() {
        for n in [u32::MAX, 2_097_152, 257] {
            let err = GridOccupancy::new(UVec3::splat(n), Extents::default()).unwrap_err();
            assert!(
                matches!(err, LevelError::InvalidGridSize { x, max, .. } if x == n && max == GridOccupancy::MAX_CELLS),
                "{err}"
            );
        }
        let edge = GridOccupancy::new(UVec3::splat(256), Extents::default()).unwrap();
        assert_eq!(edge.occupied_count(), 0);
        assert!(GridOccupancy::new(UVec3::new(u32::MAX, 0, u32::MAX), Extents::default()).is_ok());
    }

    #[test]
    fn ragged_document_cells() {
        let doc = LevelDocument::from_json(
            r#"{
                "GridSize": {"X": 3, "Y": 1, "Z": 2},
                "CubeExists": [[[true, false, true]], [[true]]]
            }"#,
        )
        .unwrap();
        let grid = GridOccupancy::from_document(&doc).unwrap();
        let cells: Vec<_> = grid.occupied().collect();
        assert_eq!(cells, [UVec3::new(0, 0, 0), UVec3::new(1, 0, 0)]);
    }

    #[test]
    fn cell_size_divides_world_size() {
        let extents = Extents {
            min: Vec3::ZERO,
            max: Vec3::new(8.0, 2.0, 4.0),
            size: Vec3::new(8.0, 2.0, 4.0),
        };
        assert_eq!(extents.cell_size(UVec3::new(4, 1, 2)), Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(extents.cell_size(UVec3::new(4, 0, 2)), Vec3::new(2.0, 0.0, 2.0));
    }

    #[test]
    fn from_document_copies_cells_and_extents() {
        let doc = LevelDocument::from_json(
            r#"{
                "GridSize": {"X": 2, "Y": 1, "Z": 2},
                "CubeExists": [[[true, false]], [[false, true]]],
                "Extents": {"XMax": 2, "YMax": 1, "ZMax": 2, "XSize": 2, "YSize": 1, "ZSize": 2}
            }"#,
        )
        .unwrap();
        let grid = GridOccupancy::from_document(&doc).unwrap();
        assert_eq!(grid.dims(), UVec3::new(2, 1, 2));
        assert!(grid.is_occupied(0, 0, 0));
        assert!(grid.is_occupied(1, 0, 1));
        assert_eq!(grid.occupied_count(), 2);
        assert_eq!(grid.extents().max, Vec3::new(2.0, 1.0, 2.0));
    }
}
