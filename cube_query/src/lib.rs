// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cube Query: streams a multi-resolution voxel scene into a spatial index.
//!
//! A scene is a manifest naming a range of levels, coarsest first, and one
//! metadata document per level describing which cells of that level's grid
//! hold a cube. Loading walks the levels in order:
//!
//! - [`SceneLoader`] fetches the manifest through a [`DocumentSource`] and
//!   drives a [`LoadSession`] over every level.
//! - [`LevelLoader`] turns each occupied cell into a box sized by the level's
//!   [`ScaleFactors`] and adds it to a level-local index and to the global one.
//! - The global [`CubeIndex`] is built once, after the last level.
//!
//! Level documents that are missing or malformed leave their level empty and
//! loading continues. Only manifest problems are [`SceneError`]s.
//!
//! # Example
//!
//! ```rust
//! use cube_query::{CubeId, MemorySource, SceneLoader};
//!
//! let source = MemorySource::new()
//!     .with(
//!         "scene.json",
//!         r#"{"MinimumViewport": 0, "MaximumViewport": 0, "MetadataTemplate": "levels/{v}.json"}"#,
//!     )
//!     .with(
//!         "levels/0.json",
//!         r#"{
//!             "GridSize": {"X": 2, "Y": 1, "Z": 1},
//!             "CubeExists": [[[true]], [[false]]],
//!             "Extents": {"XMax": 20, "YMax": 10, "ZMax": 10, "XSize": 20, "YSize": 10, "ZSize": 10}
//!         }"#,
//!     );
//!
//! let scene = pollster::block_on(SceneLoader::new("scene.json").load(&source)).unwrap();
//! let hits: Vec<CubeId> = scene.index().query_point(0.5, 0.5, 0.5).map(|v| *v.payload()).collect();
//! assert_eq!(hits, [CubeId::new(0, 0, 0, 0)]);
//! assert_eq!(scene.level(0).unwrap().cell_size(), glam::Vec3::splat(10.0));
//! ```
//!
//! ## Logging
//!
//! Progress is reported through [`tracing`]: one `info` event per level,
//! `debug` events for scale factors and cell sizes, `warn` events for empty
//! levels and uneven resolutions, and a `trace` dump of the built index. No
//! subscriber is installed.

mod config;
mod document;
mod error;
mod grid;
mod level;
mod scene;
mod source;

pub use config::LoaderConfig;
pub use document::Manifest;
pub use error::{FetchError, LevelError, SceneError};
pub use grid::{Extents, GridOccupancy};
pub use level::{
    CubeId, CubeIndex, CubeVolume, LevelLoader, LevelResult, LevelStatus, PreviousDims,
    ScaleFactors,
};
pub use scene::{LoadSession, Scene, SceneLoader};
pub use source::{DirectorySource, DocumentSource, MemorySource};
