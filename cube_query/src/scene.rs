// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading every level of a scene into one global index.

use std::collections::BTreeMap;

use cube_octree::dump_to_string;
use tracing::{Level, debug, info, trace};

use crate::config::LoaderConfig;
use crate::document::Manifest;
use crate::error::SceneError;
use crate::level::{CubeIndex, LevelLoader, LevelResult, PreviousDims};
use crate::source::DocumentSource;

/// A fully loaded scene.
#[derive(Debug)]
pub struct Scene {
    manifest: Manifest,
    levels: BTreeMap<u32, LevelResult>,
    global: CubeIndex,
}

impl Scene {
    /// The manifest the scene was loaded from.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Per-level results, keyed by level number.
    pub fn levels(&self) -> &BTreeMap<u32, LevelResult> {
        &self.levels
    }

    /// Result for one level.
    pub fn level(&self, level: u32) -> Option<&LevelResult> {
        self.levels.get(&level)
    }

    /// The global index over every level's volumes, built.
    pub fn index(&self) -> &CubeIndex {
        &self.global
    }

    /// Take the global index.
    pub fn into_index(self) -> CubeIndex {
        self.global
    }
}

/// A scene load in progress, advanced one level at a time.
///
/// Levels load strictly in order from `MinimumViewport` to `MaximumViewport`;
/// each level's scale factors depend on the dimensions of the last level that
/// was read. Dropping a session abandons the load. Its global index is valid
/// up to the last completed level but unbuilt.
#[derive(Debug)]
pub struct LoadSession {
    manifest: Manifest,
    config: LoaderConfig,
    next: Option<u32>,
    previous: PreviousDims,
    levels: BTreeMap<u32, LevelResult>,
    global: CubeIndex,
}

impl LoadSession {
    /// Start loading the levels named by `manifest`.
    pub fn new(manifest: Manifest, config: LoaderConfig) -> Result<Self, SceneError> {
        let (min, max) = (manifest.minimum_viewport, manifest.maximum_viewport);
        if min > max {
            return Err(SceneError::InvalidLevelRange { min, max });
        }
        info!(min, max, template = %manifest.metadata_template, "scene load started");
        Ok(Self {
            global: CubeIndex::with_config(config.octree),
            manifest,
            config,
            next: Some(min),
            previous: PreviousDims::NONE,
            levels: BTreeMap::new(),
        })
    }

    /// The manifest being loaded.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Level the next call to [`load_next`](Self::load_next) reads, if any.
    pub fn next_level(&self) -> Option<u32> {
        self.next
    }

    /// Whether every level has been loaded.
    pub fn is_complete(&self) -> bool {
        self.next.is_none()
    }

    /// Load the next level, returning its result, or `None` once every level
    /// has been loaded.
    pub async fn load_next<S: DocumentSource>(&mut self, source: &S) -> Option<&LevelResult> {
        let level = self.next?;
        let path = self
            .manifest
            .metadata_path(level, &self.config.level_placeholder);
        debug!(level, %path, "fetching level document");

        let loader = LevelLoader::new(level, self.previous).with_octree_config(self.config.octree);
        let result = loader.load(source, &path, &mut self.global).await;
        // Empty levels keep the dimensions of the last level that was read.
        if let Some(dims) = result.dims() {
            self.previous = dims.into();
        }
        self.next = level
            .checked_add(1)
            .filter(|&n| n <= self.manifest.maximum_viewport);

        let stored: &LevelResult = self.levels.entry(level).or_insert(result);
        Some(stored)
    }

    /// Per-level results so far.
    pub fn levels(&self) -> &BTreeMap<u32, LevelResult> {
        &self.levels
    }

    /// The global index so far. Unbuilt until [`finish`](Self::finish).
    pub fn global(&self) -> &CubeIndex {
        &self.global
    }

    /// Build the global index over every level loaded so far.
    ///
    /// Levels not yet loaded are skipped.
    pub fn finish(mut self) -> Scene {
        if let Some(level) = self.next {
            debug!(level, "finishing before the last level");
        }
        self.global.build();
        info!(
            levels = self.levels.len(),
            volumes = self.global.len(),
            nodes = self.global.node_count(),
            "scene index built"
        );
        if tracing::enabled!(Level::TRACE) {
            trace!("global index:\n{}", dump_to_string(&self.global));
        }
        Scene {
            manifest: self.manifest,
            levels: self.levels,
            global: self.global,
        }
    }
}

/// Loads a scene from its manifest.
///
/// ```rust
/// use cube_query::{MemorySource, SceneLoader};
///
/// let source = MemorySource::new()
///     .with(
///         "scene.json",
///         r#"{"MinimumViewport": 1, "MaximumViewport": 1, "MetadataTemplate": "v{v}.json"}"#,
///     )
///     .with(
///         "v1.json",
///         r#"{"GridSize": {"X": 1, "Y": 1, "Z": 1}, "CubeExists": [[[true]]]}"#,
///     );
///
/// let scene = pollster::block_on(SceneLoader::new("scene.json").load(&source)).unwrap();
/// assert_eq!(scene.index().len(), 1);
/// assert_eq!(scene.level(1).unwrap().volume_count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct SceneLoader {
    manifest_path: String,
    config: LoaderConfig,
}

impl SceneLoader {
    /// Create a loader for the manifest at `manifest_path`.
    pub fn new(manifest_path: impl Into<String>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            config: LoaderConfig::default(),
        }
    }

    /// Replace the loader settings.
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Fetch and parse the manifest, then start a session.
    pub async fn start<S: DocumentSource>(&self, source: &S) -> Result<LoadSession, SceneError> {
        let text = source
            .fetch(&self.manifest_path)
            .await
            .map_err(SceneError::FetchManifest)?;
        let manifest = Manifest::from_json(&text)?;
        LoadSession::new(manifest, self.config.clone())
    }

    /// Load every level in order and build the global index once.
    ///
    /// Only manifest problems are errors. Levels that cannot be read are
    /// recorded as empty.
    pub async fn load<S: DocumentSource>(&self, source: &S) -> Result<Scene, SceneError> {
        let mut session = self.start(source).await?;
        while session.load_next(source).await.is_some() {}
        Ok(session.finish())
    }
}
