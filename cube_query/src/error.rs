// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for fetching and loading scenes.

use thiserror::Error;

/// A document could not be fetched from a [`DocumentSource`](crate::DocumentSource).
#[derive(Error, Debug)]
pub enum FetchError {
    /// The source has no document at this path.
    #[error("document not found: {path}")]
    NotFound {
        /// Requested path.
        path: String,
    },

    /// The path is absolute or climbs out of the source's root.
    #[error("path leaves the source root: {path}")]
    OutsideRoot {
        /// Requested path.
        path: String,
    },

    /// Reading the document failed.
    #[error("failed to read {path}")]
    Io {
        /// Requested path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Why a level contributed no volumes.
///
/// Level failures never abort a scene load; they are recorded in
/// [`LevelStatus::Empty`](crate::LevelStatus::Empty) and logged.
#[derive(Error, Debug)]
pub enum LevelError {
    /// The level document could not be fetched.
    #[error("level document unavailable")]
    Fetch(#[from] FetchError),

    /// The level document is not valid level metadata.
    #[error("level document is malformed")]
    Parse(#[from] serde_json::Error),

    /// The declared grid has more cells than a level may hold.
    #[error("grid size {x}x{y}x{z} exceeds {max} cells")]
    InvalidGridSize {
        /// Declared `x` dimension.
        x: u32,
        /// Declared `y` dimension.
        y: u32,
        /// Declared `z` dimension.
        z: u32,
        /// Cell limit, [`GridOccupancy::MAX_CELLS`](crate::GridOccupancy::MAX_CELLS).
        max: usize,
    },
}

/// Errors that abort a whole scene load. No index is built.
#[derive(Error, Debug)]
pub enum SceneError {
    /// The manifest could not be fetched.
    #[error("scene manifest unavailable")]
    FetchManifest(#[source] FetchError),

    /// The manifest is not valid JSON or lacks a required field.
    #[error("scene manifest is malformed")]
    Manifest(#[from] serde_json::Error),

    /// The manifest's minimum level is above its maximum level.
    #[error("invalid level range: minimum {min} is greater than maximum {max}")]
    InvalidLevelRange {
        /// `MinimumViewport` from the manifest.
        min: u32,
        /// `MaximumViewport` from the manifest.
        max: u32,
    },
}
