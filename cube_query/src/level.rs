// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading one resolution level into the spatial index.

use std::fmt;

use cube_octree::{Aabb3D, BoundedVolume, Octree, OctreeConfig};
use glam::{UVec3, Vec3};
use tracing::{debug, info, warn};

use crate::document::LevelDocument;
use crate::error::LevelError;
use crate::grid::{Extents, GridOccupancy};
use crate::source::DocumentSource;

/// Identity of one occupied cube: its level and grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubeId {
    /// Level the cube belongs to.
    pub level: u32,
    /// Cell column.
    pub x: u32,
    /// Cell row.
    pub y: u32,
    /// Cell layer.
    pub z: u32,
}

impl CubeId {
    /// Create a cube id.
    pub const fn new(level: u32, x: u32, y: u32, z: u32) -> Self {
        Self { level, x, y, z }
    }
}

impl fmt::Display for CubeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}/{}_{}_{}", self.level, self.x, self.y, self.z)
    }
}

/// Volumes stored in cube indices.
pub type CubeVolume = BoundedVolume<f32, CubeId>;

/// Index over cube volumes, in grid-cell units.
pub type CubeIndex = Octree<f32, CubeId>;

/// Grid dimensions of the previously loaded level.
///
/// Only `x` and `z` feed the scale factors. `(0, 0)` means there is no
/// previous level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreviousDims {
    /// Previous `x` dimension.
    pub x: u32,
    /// Previous `z` dimension.
    pub z: u32,
}

impl PreviousDims {
    /// No previous level.
    pub const NONE: Self = Self { x: 0, z: 0 };
}

impl From<UVec3> for PreviousDims {
    fn from(dims: UVec3) -> Self {
        Self {
            x: dims.x,
            z: dims.z,
        }
    }
}

/// Cell extents of this level's volumes, relative to the previous level.
///
/// `xy` scales both the `x` and the `y` extent; `z` scales the `z` extent.
/// Each factor is the integer quotient of the previous dimension by the
/// current one, so a finer level following a coarser one yields zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleFactors {
    /// Factor applied to `x` and `y`.
    pub xy: u32,
    /// Factor applied to `z`.
    pub z: u32,
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self::UNIT
    }
}

impl ScaleFactors {
    /// Unit cells, used for the first level.
    pub const UNIT: Self = Self { xy: 1, z: 1 };

    /// Factors for a level of `dims` following a level of `previous`.
    ///
    /// A missing previous dimension, or a current dimension of zero, gives 1.
    pub fn between(previous: PreviousDims, dims: UVec3) -> Self {
        Self {
            xy: factor(previous.x, dims.x),
            z: factor(previous.z, dims.z),
        }
    }

    /// Whether a previous dimension is not an exact multiple of the current one.
    pub fn is_uneven(previous: PreviousDims, dims: UVec3) -> bool {
        let uneven = |prev: u32, cur: u32| prev != 0 && cur != 0 && prev % cur != 0;
        uneven(previous.x, dims.x) || uneven(previous.z, dims.z)
    }
}

fn factor(previous: u32, current: u32) -> u32 {
    if previous == 0 {
        return 1;
    }
    previous.checked_div(current).unwrap_or(1)
}

/// Outcome of loading one level.
#[derive(Debug)]
pub enum LevelStatus {
    /// The document was read and its occupied cells indexed.
    Loaded,
    /// The level contributed no volumes.
    Empty(LevelError),
}

impl LevelStatus {
    /// Whether the level was loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}

/// What one level contributed to the scene.
#[derive(Debug)]
pub struct LevelResult {
    level: u32,
    dims: Option<UVec3>,
    scale: ScaleFactors,
    extents: Extents,
    volume_count: usize,
    status: LevelStatus,
    local: CubeIndex,
}

impl LevelResult {
    /// Level number.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Grid dimensions, if the document was read.
    pub fn dims(&self) -> Option<UVec3> {
        self.dims
    }

    /// Scale factors used for this level's volumes.
    pub fn scale(&self) -> ScaleFactors {
        self.scale
    }

    /// World-space extents from the document.
    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    /// World size of one cell, or zero when the document was not read.
    pub fn cell_size(&self) -> Vec3 {
        self.dims
            .map_or(Vec3::ZERO, |dims| self.extents.cell_size(dims))
    }

    /// Number of volumes added by this level.
    pub fn volume_count(&self) -> usize {
        self.volume_count
    }

    /// Load outcome.
    pub fn status(&self) -> &LevelStatus {
        &self.status
    }

    /// Index over this level's volumes only, already built.
    pub fn local_index(&self) -> &CubeIndex {
        &self.local
    }

    /// Take the level-local index.
    pub fn into_local_index(self) -> CubeIndex {
        self.local
    }
}

/// Turns one level document into cube volumes.
///
/// Each occupied cell `(x, y, z)` becomes the box `(x, y, z)` to
/// `(x + xy, y + xy, z + z)` for the level's [`ScaleFactors`], added to both a
/// level-local index and the caller's global index. The global index is never
/// built here.
#[derive(Clone, Debug)]
pub struct LevelLoader {
    level: u32,
    previous: PreviousDims,
    octree: OctreeConfig<f32>,
}

impl LevelLoader {
    /// Create a loader for `level`, following a level with `previous` dimensions.
    pub fn new(level: u32, previous: PreviousDims) -> Self {
        Self {
            level,
            previous,
            octree: OctreeConfig::default(),
        }
    }

    /// Configure the level-local index.
    pub fn with_octree_config(mut self, config: OctreeConfig<f32>) -> Self {
        self.octree = config;
        self
    }

    /// Level this loader reads.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Fetch the level document at `path` and index it.
    ///
    /// A missing or malformed document, or one declaring more than
    /// [`GridOccupancy::MAX_CELLS`] cells, gives an empty level, never an error.
    pub async fn load<S: DocumentSource>(
        &self,
        source: &S,
        path: &str,
        global: &mut CubeIndex,
    ) -> LevelResult {
        match source.fetch(path).await {
            Ok(text) => self.ingest_text(&text, global),
            Err(err) => {
                warn!(level = self.level, path, error = %err, "level document unavailable");
                self.empty(err.into())
            }
        }
    }

    /// Index an already fetched level document.
    pub fn ingest_text(&self, text: &str, global: &mut CubeIndex) -> LevelResult {
        let grid = LevelDocument::from_json(text)
            .map_err(LevelError::from)
            .and_then(|doc| GridOccupancy::from_document(&doc));
        match grid {
            Ok(grid) => self.ingest_grid(&grid, global),
            Err(err) => {
                warn!(level = self.level, error = %err, "level document is malformed");
                self.empty(err)
            }
        }
    }

    /// Index an occupancy grid.
    pub fn ingest_grid(&self, grid: &GridOccupancy, global: &mut CubeIndex) -> LevelResult {
        let dims = grid.dims();
        let scale = ScaleFactors::between(self.previous, dims);
        if ScaleFactors::is_uneven(self.previous, dims) {
            warn!(
                level = self.level,
                previous_x = self.previous.x,
                previous_z = self.previous.z,
                x = dims.x,
                z = dims.z,
                "resolution is not an exact multiple of the previous level; factors truncate"
            );
        }
        debug!(level = self.level, xy = scale.xy, z = scale.z, "scale factors");

        let mut local = CubeIndex::with_config(self.octree);
        let count = grid.occupied_count();
        local.reserve(count);
        global.reserve(count);
        for cell in grid.occupied() {
            let volume = self.volume(cell, scale);
            global.add(volume.clone());
            local.add(volume);
        }
        local.build();

        let extents = *grid.extents();
        let cell_size = extents.cell_size(dims);
        debug!(
            level = self.level,
            x = cell_size.x,
            y = cell_size.y,
            z = cell_size.z,
            "cell size"
        );
        info!(
            level = self.level,
            x = dims.x,
            y = dims.y,
            z = dims.z,
            volumes = count,
            "level loaded"
        );

        LevelResult {
            level: self.level,
            dims: Some(dims),
            scale,
            extents,
            volume_count: count,
            status: LevelStatus::Loaded,
            local,
        }
    }

    /// A result recording that this level contributed nothing.
    pub fn empty(&self, reason: LevelError) -> LevelResult {
        LevelResult {
            level: self.level,
            dims: None,
            scale: ScaleFactors::UNIT,
            extents: Extents::default(),
            volume_count: 0,
            status: LevelStatus::Empty(reason),
            local: CubeIndex::with_config(self.octree),
        }
    }

    fn volume(&self, cell: UVec3, scale: ScaleFactors) -> CubeVolume {
        let min = cell.as_vec3();
        let max = (cell + UVec3::new(scale.xy, scale.xy, scale.z)).as_vec3();
        BoundedVolume::new(
            Aabb3D::new(min.x, min.y, min.z, max.x, max.y, max.z),
            CubeId::new(self.level, cell.x, cell.y, cell.z),
        )
    }
}
