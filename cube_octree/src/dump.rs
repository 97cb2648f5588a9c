// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text dump of an octree's shape, for debugging.

use alloc::string::String;
use core::fmt::{self, Debug, Display, Write};

use crate::octree::Octree;
use crate::types::Scalar;

/// Write the tree breadth-first, one line per node and per stored volume.
///
/// Lines are indented by two spaces per depth level; volume lines get one
/// extra space. Children are listed in ascending octant order.
pub fn dump<T, P, W>(tree: &Octree<T, P>, out: &mut W) -> fmt::Result
where
    T: Scalar + Display,
    P: Debug,
    W: Write,
{
    for (depth, node) in tree.breadth_first() {
        let indent = depth * 2;
        writeln!(out, "{:indent$}{node}", "")?;
        for volume in node.volumes() {
            writeln!(out, "{:indent$} {volume}", "")?;
        }
    }
    Ok(())
}

/// [`dump`] into a fresh `String`.
pub fn dump_to_string<T, P>(tree: &Octree<T, P>) -> String
where
    T: Scalar + Display,
    P: Debug,
{
    let mut out = String::new();
    let _ = dump(tree, &mut out);
    out
}
