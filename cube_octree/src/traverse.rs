// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only traversal: node views and breadth-first iteration.

use alloc::collections::VecDeque;
use core::fmt::{self, Debug, Display};

use crate::octant::OctantMask;
use crate::octree::{Node, NodeId, Octree};
use crate::types::{Aabb3D, Scalar};
use crate::volume::BoundedVolume;

/// Borrowed view of one octree node.
pub struct NodeRef<'a, T, P> {
    tree: &'a Octree<T, P>,
    id: NodeId,
}

impl<T, P> Clone for NodeRef<'_, T, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, P> Copy for NodeRef<'_, T, P> {}

impl<'a, T, P> NodeRef<'a, T, P> {
    pub(crate) fn new(tree: &'a Octree<T, P>, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn node(&self) -> &'a Node<T, P> {
        &self.tree.nodes[self.id.idx()]
    }

    /// Handle of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Volumes stored directly at this node, not in descendants.
    pub fn volumes(&self) -> &'a [BoundedVolume<T, P>] {
        &self.node().volumes
    }

    /// Presence flags of the children.
    pub fn child_mask(&self) -> OctantMask {
        self.node().child_mask
    }

    /// Whether any child exists.
    pub fn has_children(&self) -> bool {
        !self.node().child_mask.is_empty()
    }

    /// Child in octant `code`, if present.
    pub fn child(&self, code: u8) -> Option<Self> {
        let id = (*self.node().children.get(usize::from(code))?)?;
        Some(Self::new(self.tree, id))
    }

    /// Present children with their octant codes, in ascending bit order.
    pub fn children(&self) -> impl Iterator<Item = (u8, Self)> + use<'a, T, P> {
        let tree = self.tree;
        let node = self.node();
        node.child_mask.codes().filter_map(move |code| {
            node.children[usize::from(code)].map(|id| (code, Self::new(tree, id)))
        })
    }
}

impl<T: Copy, P> NodeRef<'_, T, P> {
    /// Region covered by this node.
    pub fn region(&self) -> Aabb3D<T> {
        self.node().region
    }
}

impl<T: Scalar, P> Debug for NodeRef<'_, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("region", &self.region())
            .field("volumes", &self.volumes().len())
            .field("child_mask", &self.child_mask())
            .finish()
    }
}

impl<T: Display + Copy, P> Display for NodeRef<'_, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node {} {} volumes={} children={:08b}",
            self.id.idx(),
            self.region(),
            self.volumes().len(),
            self.child_mask().bits()
        )
    }
}

/// Breadth-first iterator over `(depth, node)` pairs.
///
/// Created by [`Octree::breadth_first`].
pub struct BreadthFirst<'a, T, P> {
    tree: &'a Octree<T, P>,
    queue: VecDeque<(NodeId, usize)>,
}

impl<'a, T, P> BreadthFirst<'a, T, P> {
    pub(crate) fn new(tree: &'a Octree<T, P>) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back((NodeId::ROOT, 0));
        Self { tree, queue }
    }
}

impl<T, P> Debug for BreadthFirst<'_, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreadthFirst")
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl<'a, T, P> Iterator for BreadthFirst<'a, T, P> {
    type Item = (usize, NodeRef<'a, T, P>);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.queue.pop_front()?;
        let node = NodeRef::new(self.tree, id);
        for (_, child) in node.children() {
            self.queue.push_back((child.id(), depth + 1));
        }
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Aabb3D, Octree};
    use alloc::vec::Vec;

    fn sample() -> Octree<i64, u8> {
        let mut tree = Octree::with_region(Aabb3D::new(0, 0, 0, 4, 4, 4));
        tree.insert(Aabb3D::new(0, 0, 0, 1, 1, 1), 0);
        tree.insert(Aabb3D::new(1, 1, 1, 2, 2, 2), 1);
        tree.insert(Aabb3D::new(3, 3, 3, 4, 4, 4), 2);
        tree.insert(Aabb3D::new(1, 1, 1, 3, 3, 3), 3);
        tree.build();
        tree
    }

    #[test]
    fn breadth_first_depths_and_order() {
        let tree = sample();
        let visited: Vec<_> = tree
            .breadth_first()
            .map(|(depth, node)| (depth, node.region()))
            .collect();
        assert_eq!(
            visited,
            [
                (0, Aabb3D::new(0, 0, 0, 4, 4, 4)),
                (1, Aabb3D::new(0, 0, 0, 2, 2, 2)),
                (1, Aabb3D::new(2, 2, 2, 4, 4, 4)),
                (2, Aabb3D::new(0, 0, 0, 1, 1, 1)),
                (2, Aabb3D::new(1, 1, 1, 2, 2, 2)),
            ]
        );
        assert_eq!(tree.node_count(), visited.len());
    }

    #[test]
    fn node_views() {
        let tree = sample();
        let root = tree.root();
        assert_eq!(root.volumes().len(), 1, "spanning box stays at the root");
        assert_eq!(*root.volumes()[0].payload(), 3);
        assert!(root.child(1).is_none());
        assert!(root.child(8).is_none());

        let low = root.child(0).expect("low octant exists");
        assert!(low.has_children());
        assert!(low.volumes().is_empty());
        let codes: Vec<_> = low.children().map(|(code, _)| code).collect();
        assert_eq!(codes, [0, 7]);

        let leaf = low.child(7).expect("leaf exists");
        assert_eq!(*leaf.volumes()[0].payload(), 1);
        assert_eq!(tree.node(leaf.id()).map(|n| n.region()), Some(leaf.region()));
    }
}
