// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The octree: deferred insertion, the build pass, and region queries.

use alloc::vec::Vec;
use core::fmt::{self, Debug};

use smallvec::SmallVec;

use crate::config::OctreeConfig;
use crate::octant::{OctantMask, octant_code};
use crate::traverse::{BreadthFirst, NodeRef};
use crate::types::{Aabb3D, Scalar};
use crate::volume::BoundedVolume;

/// Handle of a node inside one [`Octree`].
///
/// Handles are only meaningful for the tree that produced them and are
/// invalidated by the next [`Octree::build`] that has work to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node. Every tree has one, even when empty.
    pub const ROOT: Self = Self(0);

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Node handles are intentionally 32-bit."
    )]
    const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

pub(crate) type Volumes<T, P> = SmallVec<[BoundedVolume<T, P>; 4]>;

#[derive(Clone, Debug)]
pub(crate) struct Node<T, P> {
    pub(crate) region: Aabb3D<T>,
    pub(crate) volumes: Volumes<T, P>,
    pub(crate) children: [Option<NodeId>; 8],
    pub(crate) child_mask: OctantMask,
}

impl<T, P> Node<T, P> {
    fn new(region: Aabb3D<T>) -> Self {
        Self {
            region,
            volumes: SmallVec::new(),
            children: [None; 8],
            child_mask: OctantMask::empty(),
        }
    }

    fn attach(&mut self, code: u8, child: NodeId) {
        self.children[usize::from(code)] = Some(child);
        self.child_mask |= OctantMask::octant(code);
    }
}

/// A write-once octree over [`BoundedVolume`]s.
///
/// Insertion is two-phase. [`add`](Self::add) only queues a volume; nothing
/// is placed in the tree until [`build`](Self::build) runs a full
/// subdivision pass over everything queued so far. This keeps streaming
/// ingestion of thousands of volumes cheap and leaves the tree read-only
/// between builds.
///
/// ## Example
///
/// ```rust
/// use cube_octree::{Aabb3D, Octree};
///
/// let mut tree: Octree<f32, u32> = Octree::new();
/// tree.insert(Aabb3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0), 1);
/// tree.insert(Aabb3D::new(1.0, 0.0, 1.0, 2.0, 1.0, 2.0), 2);
/// assert_eq!(tree.node_count(), 1);
///
/// tree.build();
/// assert!(tree.root().has_children());
///
/// let hits: Vec<_> = tree
///     .query_region(&Aabb3D::new(1.5, 0.5, 1.5, 3.0, 3.0, 3.0))
///     .map(|v| *v.payload())
///     .collect();
/// assert_eq!(hits, [2]);
/// ```
pub struct Octree<T, P> {
    pub(crate) nodes: Vec<Node<T, P>>,
    pending: Vec<BoundedVolume<T, P>>,
    fixed_region: Option<Aabb3D<T>>,
    config: OctreeConfig<T>,
}

impl<T: Scalar, P> Debug for Octree<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Octree")
            .field("region", &self.nodes[0].region)
            .field("nodes", &self.nodes.len())
            .field("stored", &self.stored_len())
            .field("pending", &self.pending.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, P> Default for Octree<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, P> Octree<T, P> {
    /// Create an empty tree whose root region is inferred at build time.
    ///
    /// The inferred region is the bounding box of every volume, grown to the
    /// enclosing power-of-two cube (see [`Aabb3D::enclosing_cube`]).
    pub fn new() -> Self {
        Self::with_config(OctreeConfig::default())
    }

    /// Create an empty tree with an explicit subdivision policy.
    pub fn with_config(config: OctreeConfig<T>) -> Self {
        Self {
            nodes: alloc::vec![Node::new(Aabb3D::zero())],
            pending: Vec::new(),
            fixed_region: None,
            config,
        }
    }

    /// Create an empty tree with a root region fixed up front.
    ///
    /// Volumes that do not fit inside the region are kept at the root.
    pub fn with_region(region: Aabb3D<T>) -> Self {
        let mut tree = Self::new();
        tree.fixed_region = Some(region);
        tree.nodes[0].region = region;
        tree
    }

    /// Replace the subdivision policy used by subsequent builds.
    pub fn set_config(&mut self, config: OctreeConfig<T>) {
        self.config = config;
    }

    /// The subdivision policy.
    pub fn config(&self) -> &OctreeConfig<T> {
        &self.config
    }

    /// Queue a volume for the next build.
    ///
    /// Does not allocate nodes or touch any child mask.
    #[inline]
    pub fn add(&mut self, volume: BoundedVolume<T, P>) {
        self.pending.push(volume);
    }

    /// Queue a box with a payload for the next build.
    #[inline]
    pub fn insert(&mut self, aabb: Aabb3D<T>, payload: P) {
        self.add(BoundedVolume::new(aabb, payload));
    }

    /// Reserve space for at least `n` more queued volumes.
    pub fn reserve(&mut self, n: usize) {
        self.pending.reserve(n);
    }

    /// Place every queued volume into the tree.
    ///
    /// Each node whose policy allows it is split at its center: a volume
    /// moves into the octant selected by its centroid when it fits entirely
    /// inside that octant's region, and stays on the node otherwise. Children
    /// are created lazily and recorded in the node's [`OctantMask`].
    ///
    /// With nothing queued this is a no-op, so repeated builds neither change
    /// the shape nor duplicate volumes. Queued volumes that arrive after an
    /// earlier build cause a rebuild over the union of old and new volumes.
    pub fn build(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let mut all = Vec::with_capacity(self.stored_len() + self.pending.len());
        for node in self.nodes.drain(..) {
            all.extend(node.volumes);
        }
        all.append(&mut self.pending);

        let region = match self.fixed_region {
            Some(region) => region,
            None => bounds_of(&all).enclosing_cube(),
        };
        self.nodes.push(Node::new(region));
        self.subdivide(NodeId::ROOT, all, 0);
    }

    fn subdivide(&mut self, id: NodeId, volumes: Vec<BoundedVolume<T, P>>, depth: usize) {
        let region = self.nodes[id.idx()].region;
        if !self.config.should_split(region.extent(), depth, volumes.len()) {
            self.nodes[id.idx()].volumes.extend(volumes);
            return;
        }

        let center = region.center();
        let mut retained = Volumes::new();
        let mut buckets: [Vec<BoundedVolume<T, P>>; 8] = Default::default();
        for volume in volumes {
            let code = octant_code(volume.centroid(), center);
            if region.octant(code).contains(volume.aabb()) {
                buckets[usize::from(code)].push(volume);
            } else {
                retained.push(volume);
            }
        }
        self.nodes[id.idx()].volumes = retained;

        for (code, bucket) in (0..8_u8).zip(buckets) {
            if bucket.is_empty() {
                continue;
            }
            let child = NodeId::new(self.nodes.len());
            self.nodes.push(Node::new(region.octant(code)));
            self.nodes[id.idx()].attach(code, child);
            self.subdivide(child, bucket, depth + 1);
        }
    }

    /// Whether every added volume has been placed by a build.
    pub fn is_built(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of volumes waiting for the next build.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of volumes placed in the tree.
    pub fn stored_len(&self) -> usize {
        self.nodes.iter().map(|n| n.volumes.len()).sum()
    }

    /// Total number of volumes, placed or pending.
    pub fn len(&self) -> usize {
        self.stored_len() + self.pending.len()
    }

    /// Whether the tree holds no volumes at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The root node.
    pub fn root(&self) -> NodeRef<'_, T, P> {
        NodeRef::new(self, NodeId::ROOT)
    }

    /// Look up a node by handle.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, T, P>> {
        (id.idx() < self.nodes.len()).then(|| NodeRef::new(self, id))
    }

    /// Breadth-first walk from the root, yielding `(depth, node)`.
    ///
    /// Children are visited in ascending octant order.
    pub fn breadth_first(&self) -> BreadthFirst<'_, T, P> {
        BreadthFirst::new(self)
    }

    /// Visit placed volumes whose box overlaps `region` (faces included).
    ///
    /// Subtrees whose region does not overlap are skipped. Volumes still
    /// waiting for a build are not visited.
    pub fn visit_region<'a, F: FnMut(&'a BoundedVolume<T, P>)>(&'a self, region: &Aabb3D<T>, mut f: F) {
        let mut stack: SmallVec<[NodeId; 32]> = SmallVec::new();
        stack.push(NodeId::ROOT);
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.idx()];
            for volume in &node.volumes {
                if volume.aabb().overlaps(region) {
                    f(volume);
                }
            }
            // Reverse so that children pop in ascending octant order.
            for child in node.children.iter().rev().flatten() {
                if self.nodes[child.idx()].region.overlaps(region) {
                    stack.push(*child);
                }
            }
        }
    }

    /// Query placed volumes whose box overlaps `region`.
    pub fn query_region<'a>(
        &'a self,
        region: &Aabb3D<T>,
    ) -> impl Iterator<Item = &'a BoundedVolume<T, P>> + use<'a, T, P> {
        let mut out = Vec::new();
        self.visit_region(region, |v| out.push(v));
        out.into_iter()
    }

    /// Visit placed volumes whose box contains the point.
    pub fn visit_point<'a, F: FnMut(&'a BoundedVolume<T, P>)>(&'a self, x: T, y: T, z: T, f: F) {
        self.visit_region(&Aabb3D::new(x, y, z, x, y, z), f);
    }

    /// Query placed volumes whose box contains the point.
    pub fn query_point<'a>(
        &'a self,
        x: T,
        y: T,
        z: T,
    ) -> impl Iterator<Item = &'a BoundedVolume<T, P>> + use<'a, T, P> {
        let mut out = Vec::new();
        self.visit_point(x, y, z, |v| out.push(v));
        out.into_iter()
    }
}

fn bounds_of<T: Scalar, P>(volumes: &[BoundedVolume<T, P>]) -> Aabb3D<T> {
    let mut it = volumes.iter().map(|v| *v.aabb());
    match it.next() {
        Some(first) => it.fold(first, |acc, b| acc.union(b)),
        None => Aabb3D::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn unit(x: i64, y: i64, z: i64) -> Aabb3D<i64> {
        Aabb3D::new(x, y, z, x + 1, y + 1, z + 1)
    }

    /// Every node's mask matches its children, child volumes fit their child
    /// region, and retained volumes of inner nodes cannot be pushed down.
    fn assert_invariants<T: Scalar, P>(tree: &Octree<T, P>) {
        for (_, node) in tree.breadth_first() {
            for code in 0..8_u8 {
                assert_eq!(
                    node.child_mask().has(code),
                    node.child(code).is_some(),
                    "mask bit {code} out of sync"
                );
            }
            for (code, child) in node.children() {
                assert_eq!(child.region(), node.region().octant(code), "child region");
                for v in child.volumes() {
                    assert!(child.region().contains(v.aabb()), "volume escapes child");
                }
            }
            if node.has_children() {
                let center = node.region().center();
                for v in node.volumes() {
                    let code = octant_code(v.centroid(), center);
                    assert!(
                        !node.region().octant(code).contains(v.aabb()),
                        "retained volume fits a child"
                    );
                }
            }
        }
    }

    fn payloads<T: Scalar>(tree: &Octree<T, u32>) -> Vec<u32> {
        let mut out: Vec<u32> = tree
            .breadth_first()
            .flat_map(|(_, n)| n.volumes().iter().map(|v| *v.payload()))
            .collect();
        out.sort_unstable();
        out
    }

    fn shape<T: Scalar, P>(tree: &Octree<T, P>) -> Vec<(usize, Aabb3D<T>, usize, OctantMask)> {
        tree.breadth_first()
            .map(|(d, n)| (d, n.region(), n.volumes().len(), n.child_mask()))
            .collect()
    }

    #[test]
    fn add_defers_until_build() {
        let mut tree: Octree<i64, u32> = Octree::new();
        for (i, x) in (0..4).enumerate() {
            tree.insert(unit(x, 0, 0), i as u32);
        }
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.pending_len(), 4);
        assert!(tree.root().volumes().is_empty());
        assert!(!tree.root().has_children());
        assert_eq!(tree.query_region(&unit(0, 0, 0)).count(), 0);
        assert!(!tree.is_built());

        tree.build();
        assert!(tree.is_built());
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.query_region(&unit(0, 0, 0)).count(), 2, "touching face counts");
        assert_invariants(&tree);
    }

    #[test]
    fn build_empty_is_noop() {
        let mut tree: Octree<f32, ()> = Octree::new();
        tree.build();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.root().volumes().is_empty());
        assert!(!tree.root().has_children());
        assert!(tree.is_empty());
    }

    #[test]
    fn flat_grid_splits_into_four_leaves() {
        let mut tree: Octree<f32, u32> = Octree::new();
        let mut n = 0;
        for x in 0..2 {
            for z in 0..2 {
                let (x, z) = (x as f32, z as f32);
                tree.insert(Aabb3D::new(x, 0.0, z, x + 1.0, 1.0, z + 1.0), n);
                n += 1;
            }
        }
        tree.build();

        let root = tree.root();
        assert_eq!(root.region(), Aabb3D::new(0.0, 0.0, 0.0, 2.0, 2.0, 2.0));
        assert!(root.volumes().is_empty());
        assert_eq!(
            root.child_mask(),
            OctantMask::OCTANT_0 | OctantMask::OCTANT_1 | OctantMask::OCTANT_4 | OctantMask::OCTANT_5
        );
        for (_, child) in root.children() {
            assert_eq!(child.volumes().len(), 1);
            assert!(!child.has_children());
        }
        assert_eq!(tree.node_count(), 5);
        assert_invariants(&tree);
    }

    #[test]
    fn straddling_volume_stays_at_parent() {
        let mut tree: Octree<i64, u32> = Octree::with_region(Aabb3D::new(0, 0, 0, 8, 8, 8));
        tree.insert(Aabb3D::new(3, 3, 3, 5, 5, 5), 0);
        tree.insert(unit(0, 0, 0), 1);
        tree.insert(unit(7, 7, 7), 2);
        tree.build();

        let root = tree.root();
        assert_eq!(root.volumes().len(), 1);
        assert_eq!(*root.volumes()[0].payload(), 0);
        assert_eq!(root.child_mask(), OctantMask::OCTANT_0 | OctantMask::OCTANT_7);
        assert_invariants(&tree);
    }

    #[test]
    fn volume_outside_fixed_region_stays_at_root() {
        let mut tree: Octree<i64, u32> = Octree::with_region(Aabb3D::new(0, 0, 0, 4, 4, 4));
        tree.insert(unit(10, 10, 10), 0);
        tree.insert(unit(0, 0, 0), 1);
        tree.build();

        assert_eq!(tree.root().volumes().len(), 1);
        assert_eq!(tree.query_point(10, 10, 10).count(), 1);
        assert_eq!(payloads(&tree), [0, 1]);
    }

    #[test]
    fn no_loss_no_duplication() {
        let mut tree: Octree<i64, u32> = Octree::new();
        let mut id = 0;
        for x in 0..9 {
            for y in 0..3 {
                for z in 0..5 {
                    tree.insert(unit(x, y, z), id);
                    id += 1;
                }
            }
        }
        // A few boxes spanning split planes.
        tree.insert(Aabb3D::new(0, 0, 0, 9, 3, 5), id);
        tree.insert(Aabb3D::new(3, 0, 3, 5, 2, 5), id + 1);
        tree.build();

        assert_eq!(payloads(&tree), (0..id + 2).collect::<Vec<_>>());
        assert_invariants(&tree);
    }

    #[test]
    fn rebuild_without_add_is_idempotent() {
        let mut tree: Octree<f64, u32> = Octree::new();
        for i in 0..20_u32 {
            let f = f64::from(i);
            tree.insert(Aabb3D::new(f, f * 0.5, 0.0, f + 1.0, f * 0.5 + 1.0, 1.0), i);
        }
        tree.build();
        let before = shape(&tree);
        let stored = payloads(&tree);

        tree.build();
        assert_eq!(shape(&tree), before);
        assert_eq!(payloads(&tree), stored);
    }

    #[test]
    fn late_adds_rebuild_over_the_union() {
        let volumes: Vec<_> = (0..12_i64).map(|i| (unit(i, i % 3, i % 5), i as u32)).collect();

        let mut once: Octree<i64, u32> = Octree::new();
        for (aabb, p) in &volumes {
            once.insert(*aabb, *p);
        }
        once.build();

        let mut twice: Octree<i64, u32> = Octree::new();
        for (aabb, p) in &volumes[..5] {
            twice.insert(*aabb, *p);
        }
        twice.build();
        for (aabb, p) in &volumes[5..] {
            twice.insert(*aabb, *p);
        }
        twice.build();

        assert_eq!(shape(&twice), shape(&once));
        assert_eq!(payloads(&twice), payloads(&once));
    }

    #[test]
    fn coincident_points_terminate() {
        let mut tree: Octree<f32, u32> = Octree::new();
        for i in 0..16 {
            tree.insert(Aabb3D::new(3.0, 0.0, 3.0, 3.0, 0.0, 3.0), i);
        }
        tree.build();
        assert_eq!(tree.stored_len(), 16);
        assert!(tree.breadth_first().all(|(depth, _)| depth <= 16));
        assert_invariants(&tree);
    }

    #[test]
    fn zero_min_size_is_bounded_by_depth() {
        let cfg = OctreeConfig::default().with_min_size(0).with_max_depth(4);
        let mut tree: Octree<i64, u32> = Octree::with_config(cfg);
        tree.insert(unit(0, 0, 0), 0);
        tree.insert(unit(0, 0, 0), 1);
        tree.build();
        assert!(tree.breadth_first().all(|(depth, _)| depth <= 4));
        assert_eq!(tree.stored_len(), 2);
    }

    #[test]
    fn region_query_prunes_but_finds_everything() {
        let mut tree: Octree<i64, u32> = Octree::new();
        let mut id = 0;
        for x in 0..8 {
            for z in 0..8 {
                tree.insert(unit(x, 0, z), id);
                id += 1;
            }
        }
        tree.build();

        let query = Aabb3D::new(2, 0, 2, 3, 0, 3);
        let mut hits: Vec<_> = tree.query_region(&query).map(|v| *v.payload()).collect();
        hits.sort_unstable();
        // Cells 1..=3 on x and z touch the query box.
        let mut expected = Vec::new();
        for x in 1..4 {
            for z in 1..4 {
                expected.push(x * 8 + z);
            }
        }
        assert_eq!(hits, expected);

        let mut visits = 0;
        tree.visit_region(&query, |_| visits += 1);
        assert_eq!(visits, hits.len());
        assert_eq!(tree.query_point(100, 0, 0).count(), 0);
    }
}
