// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON documents: the scene manifest and per-level metadata.

use std::ops::RangeInclusive;

use serde::Deserialize;

/// Scene-wide parameters, fetched once before any level.
///
/// Only the level range and [`metadata_template`](Self::metadata_template)
/// drive loading. The other templates describe per-cube assets and are
/// passed through unchanged for consumers.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Manifest {
    /// First (coarsest) level to load.
    pub minimum_viewport: u32,
    /// Last (finest) level to load, inclusive.
    pub maximum_viewport: u32,
    /// Path of each level document, with a placeholder for the level number.
    pub metadata_template: String,
    /// Path template of cube meshes.
    #[serde(default)]
    pub cube_template: Option<String>,
    /// Path template of cube materials.
    #[serde(default)]
    pub mtl_template: Option<String>,
    /// Path template of cube textures.
    #[serde(default)]
    pub jpg_template: Option<String>,
    /// Texture subdivision factor.
    #[serde(default)]
    pub texture_subdivide: Option<u32>,
    /// Root path of textures.
    #[serde(default)]
    pub texture_path: Option<String>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Levels to load, in loading order.
    pub fn levels(&self) -> RangeInclusive<u32> {
        self.minimum_viewport..=self.maximum_viewport
    }

    /// Path of the level document for `level`.
    ///
    /// An empty `placeholder` substitutes nothing and returns the template as is.
    pub fn metadata_path(&self, level: u32, placeholder: &str) -> String {
        if placeholder.is_empty() {
            return self.metadata_template.clone();
        }
        self.metadata_template
            .replace(placeholder, &level.to_string())
    }
}

/// Grid dimensions as stored in a level document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GridSize {
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) z: u32,
}

/// World-space extents as stored in a level document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct ExtentsDocument {
    pub(crate) x_min: f32,
    pub(crate) y_min: f32,
    pub(crate) z_min: f32,
    pub(crate) x_max: f32,
    pub(crate) y_max: f32,
    pub(crate) z_max: f32,
    pub(crate) x_size: f32,
    pub(crate) y_size: f32,
    pub(crate) z_size: f32,
}

/// Raw per-level metadata.
///
/// `CubeExists` may be ragged or short; missing entries read as unoccupied.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LevelDocument {
    pub(crate) grid_size: GridSize,
    #[serde(default)]
    pub(crate) cube_exists: Vec<Vec<Vec<bool>>>,
    #[serde(default)]
    pub(crate) extents: ExtentsDocument,
}

impl LevelDocument {
    pub(crate) fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "MinimumViewport": 1,
        "MaximumViewport": 3,
        "MetadataTemplate": "meta/v{v}.json",
        "CubeTemplate": "cubes/{v}/{x}_{y}_{z}.obj",
        "TextureSubdivide": 4
    }"#;

    #[test]
    fn manifest_fields_and_paths() {
        let m = Manifest::from_json(MANIFEST).unwrap();
        assert_eq!(m.levels(), 1..=3);
        assert_eq!(m.metadata_path(2, "{v}"), "meta/v2.json");
        assert_eq!(m.metadata_path(2, ""), "meta/v{v}.json");
        assert_eq!(m.cube_template.as_deref(), Some("cubes/{v}/{x}_{y}_{z}.obj"));
        assert_eq!(m.texture_subdivide, Some(4));
        assert_eq!(m.mtl_template, None);
    }

    #[test]
    fn manifest_requires_metadata_template() {
        let err = Manifest::from_json(r#"{"MinimumViewport": 1, "MaximumViewport": 1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("MetadataTemplate"), "{err}");
    }

    #[test]
    fn level_document_defaults_and_ragged_cells() {
        let doc = LevelDocument::from_json(
            r#"{
                "GridSize": {"X": 2, "Y": 1, "Z": 2},
                "CubeExists": [[[true, false]], [[true]]]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.grid_size, GridSize { x: 2, y: 1, z: 2 });
        assert_eq!(doc.extents, ExtentsDocument::default());
        assert_eq!(doc.cube_exists, [vec![vec![true, false]], vec![vec![true]]]);
    }

    #[test]
    fn level_document_extents() {
        let doc = LevelDocument::from_json(
            r#"{
                "GridSize": {"X": 1, "Y": 1, "Z": 1},
                "Extents": {"XMin": -1.5, "YMin": 0, "ZMin": 2, "XMax": 1.5, "YMax": 4,
                            "ZMax": 6, "XSize": 3, "YSize": 4, "ZSize": 4}
            }"#,
        )
        .unwrap();
        assert_eq!(doc.extents.x_min, -1.5);
        assert_eq!(doc.extents.z_max, 6.0);
        assert_eq!(doc.extents.y_size, 4.0);
    }

    #[test]
    fn level_document_requires_grid_size() {
        assert!(LevelDocument::from_json(r#"{"CubeExists": []}"#).is_err());
    }
}
