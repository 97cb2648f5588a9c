// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cube Octree: a write-once 3D octree over axis-aligned boxes.
//!
//! Cube Octree is the spatial index behind streaming voxel scenes.
//!
//! - Queue axis-aligned bounding boxes with user payloads via [`Octree::add`].
//! - Place them all at once with [`Octree::build`], a bulk subdivision pass.
//! - Walk the result node by node ([`Octree::root`], [`Octree::breadth_first`]) or query
//!   by region and point ([`Octree::query_region`], [`Octree::query_point`]).
//!
//! It is generic over the scalar type `T` (`f32`, `f64`, `i64`) and does not depend on any
//! geometry crate. Higher layers convert their own vector types into [`Aabb3D`].
//!
//! # Example
//!
//! ```rust
//! use cube_octree::{Aabb3D, Octree, OctantMask};
//!
//! let mut tree: Octree<i64, &str> = Octree::new();
//! tree.insert(Aabb3D::new(0, 0, 0, 1, 1, 1), "near");
//! tree.insert(Aabb3D::new(3, 3, 3, 4, 4, 4), "far");
//! tree.build();
//!
//! let root = tree.root();
//! assert_eq!(root.child_mask(), OctantMask::OCTANT_0 | OctantMask::OCTANT_7);
//!
//! let hits: Vec<_> = tree.query_point(3, 3, 3).map(|v| *v.payload()).collect();
//! assert_eq!(hits, ["far"]);
//! ```
//!
//! ## Build policy
//!
//! A node splits at its center when it holds at least
//! [`OctreeConfig::split_threshold`] volumes, sits above [`OctreeConfig::max_depth`],
//! and has a side longer than [`OctreeConfig::min_size`]. A volume moves to the child
//! selected by its centroid only when it fits entirely inside that child; boxes crossing a
//! split plane stay on the parent. Unless a region is given with [`Octree::with_region`],
//! the root covers the power-of-two cube enclosing every volume.
//!
//! ## Debugging
//!
//! [`dump`] and [`dump_to_string`] print the tree breadth-first with per-depth indentation.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod dump;
mod octant;
mod octree;
mod traverse;
mod types;
mod volume;

pub use config::OctreeConfig;
pub use dump::{dump, dump_to_string};
pub use octant::OctantMask;
pub use octree::{NodeId, Octree};
pub use traverse::{BreadthFirst, NodeRef};
pub use types::{Aabb3D, Scalar};
pub use volume::BoundedVolume;
