// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene loader settings.

use cube_octree::OctreeConfig;

/// Settings for [`SceneLoader`](crate::SceneLoader) and [`LoadSession`](crate::LoadSession).
#[derive(Clone, Debug, PartialEq)]
pub struct LoaderConfig {
    /// Subdivision policy for the global index and every level-local index.
    pub octree: OctreeConfig<f32>,
    /// Text in `MetadataTemplate` replaced by the level number.
    ///
    /// When empty, every level reads the template path unchanged.
    pub level_placeholder: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            octree: OctreeConfig::default(),
            level_placeholder: "{v}".to_owned(),
        }
    }
}

impl LoaderConfig {
    /// Set the subdivision policy.
    pub fn with_octree(mut self, octree: OctreeConfig<f32>) -> Self {
        self.octree = octree;
        self
    }

    /// Set the level placeholder. See [`level_placeholder`](Self::level_placeholder).
    pub fn with_level_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.level_placeholder = placeholder.into();
        self
    }
}
