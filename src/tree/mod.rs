/// Box primitive and octant subdivision.
pub mod partition;

pub use partition::*;

use crate::query::{Closest, ClosestSurface, QueryOptions, RegionQuery};
use glam::DVec3;

/// Depth below the initial root past which nodes stop splitting.
///
/// Leaves at this depth may hold more entries than the tree capacity. This bounds the
/// subdivision of many coincident zero-extent boxes, which would otherwise never separate.
pub const MAX_DEPTH: i32 = 64;

/// A stored box and the payload it was inserted with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry<T> {
    /// The stored box.
    pub aabb: Aabb,
    /// User data attached to the box.
    pub data: T,
}

impl<T> Entry<T> {
    /// Creates a new [`Entry`].
    #[inline]
    pub const fn new(aabb: Aabb, data: T) -> Self {
        Self { aabb, data }
    }
}

/// A node of an octree over axis-aligned boxes.
///
/// A node covers a fixed region and either holds a flat list of entries or owns exactly 8
/// children, one per octant of its region. Entries that fully contain the region of a split node
/// are kept at that node instead of being pushed into every descendant.
#[derive(Clone, Debug)]
pub struct OctreeNode<T> {
    region: Aabb,
    capacity: usize,
    depth: i32,
    items: Vec<Entry<T>>,
    children: Option<Box<[OctreeNode<T>; OCTANTS]>>,
    contains_oversized: bool,
}

impl<T> OctreeNode<T> {
    /// Creates a new empty root [`OctreeNode`] covering `region` that splits once it holds more
    /// than `capacity` entries.
    #[inline]
    pub fn new(region: Aabb, capacity: usize) -> Self {
        Self::with_depth(region, capacity, 0)
    }

    #[inline]
    pub(crate) fn with_depth(region: Aabb, capacity: usize, depth: i32) -> Self {
        Self {
            region,
            capacity,
            depth,
            items: Vec::new(),
            children: None,
            contains_oversized: false,
        }
    }

    /// Turns this node into a split node covering the region in which it was the octant at
    /// `index`. The previous node moves into that octant with its contents untouched.
    pub(crate) fn wrap(&mut self, index: usize) {
        let region = self.region.enclosing(index);
        let capacity = self.capacity;
        let depth = self.depth - 1;

        let mut children: [Self; OCTANTS] =
            std::array::from_fn(|i| Self::with_depth(region.octant(i), capacity, depth + 1));
        children[index] = std::mem::replace(self, Self::with_depth(region, capacity, depth));
        self.children = Some(Box::new(children));
    }

    /// Returns the region covered by this node.
    #[inline]
    pub const fn region(&self) -> &Aabb {
        &self.region
    }

    /// Returns the split threshold of this node.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the depth of this node relative to the initial root of its tree.
    ///
    /// Shells added when a tree grows have negative depths.
    #[inline]
    pub const fn depth(&self) -> i32 {
        self.depth
    }

    /// Returns the entries held directly by this node.
    ///
    /// For a split node these are only the entries that fully contain its region.
    #[inline]
    pub fn items(&self) -> &[Entry<T>] {
        &self.items
    }

    /// Returns the children of this node if it is split.
    #[inline]
    pub fn children(&self) -> Option<&[OctreeNode<T>; OCTANTS]> {
        self.children.as_deref()
    }

    /// Returns true if this node owns 8 children.
    #[inline]
    pub fn is_split(&self) -> bool {
        self.children.is_some()
    }

    /// Returns true once an entry fully containing the region of this node has been kept here.
    #[inline]
    pub const fn contains_oversized(&self) -> bool {
        self.contains_oversized
    }

    /// Returns the number of entries held in this subtree, counting straddling boxes once per
    /// holding node.
    pub fn stored_len(&self) -> usize {
        self.items.len()
            + self
                .children()
                .map_or(0, |children| children.iter().map(Self::stored_len).sum())
    }

    /// Returns the stored box strictly closer than `bound` to `point`.
    ///
    /// Subtrees whose region is farther than the best distance found so far are skipped, and
    /// children are visited nearest first.
    pub fn closest_within(&self, point: DVec3, bound: f64) -> Option<Closest<'_, T>> {
        if self.region.distance_to(point) > bound {
            return None;
        }

        let mut best = self.items.iter().fold(None::<Closest<'_, T>>, |best, entry| {
            let distance = entry.aabb.distance_to(point);
            let bound = best.map_or(bound, |best| best.distance);
            if distance < bound {
                Some(Closest::new(entry, distance))
            } else {
                best
            }
        });

        if let Some(children) = self.children() {
            let mut order = [(0.0, 0); OCTANTS];
            for (i, child) in children.iter().enumerate() {
                order[i] = (child.region.distance_squared_to(point), i);
            }
            order.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

            for (_, i) in order {
                let bound = best.map_or(bound, |best| best.distance);
                if let Some(found) = children[i].closest_within(point, bound) {
                    best = Some(found);
                }
            }
        }

        best
    }

    /// Returns the candidate entries of every node intersecting `region`.
    ///
    /// Entries held by an intersecting node are reported whether or not they intersect `region`
    /// themselves, and boxes straddling several nodes are reported once per node.
    #[inline]
    pub fn query(&self, region: &Aabb) -> Vec<&Entry<T>> {
        self.query_with(region, QueryOptions::default()).entries
    }

    /// Returns the candidate entries of every node intersecting `region`, along with the walk
    /// statistics described by [`RegionQuery`].
    #[inline]
    pub fn query_with(&self, region: &Aabb, options: QueryOptions) -> RegionQuery<'_, T> {
        let mut result = RegionQuery::default();
        self.query_into(region, options, &mut result);
        result
    }

    fn query_into<'a>(
        &'a self,
        region: &Aabb,
        options: QueryOptions,
        result: &mut RegionQuery<'a, T>,
    ) {
        if !self.region.intersects(region) {
            return;
        }

        result.min_node_width = result.min_node_width.min(self.region.extents().x);
        result.entries.extend(&self.items);

        if self.contains_oversized && options.stop_at_enclosing {
            result.finished = true;
            return;
        }

        for child in self.children().into_iter().flatten() {
            child.query_into(region, options, result);
            if result.finished {
                return;
            }
        }
    }
}

impl<T: Clone> OctreeNode<T> {
    /// Inserts `entry` into every node of this subtree whose region it intersects.
    ///
    /// Returns false without storing anything if the box does not lie within the region of this
    /// node. Searches prune on node regions, so a box sticking out of the root could be missed.
    #[inline]
    pub fn insert(&mut self, entry: Entry<T>) -> bool {
        if !self.region.contains(&entry.aabb) {
            return false;
        }

        self.insert_intersecting(entry)
    }

    fn insert_intersecting(&mut self, entry: Entry<T>) -> bool {
        if !self.region.intersects(&entry.aabb) {
            return false;
        }

        if !self.is_split() {
            self.items.push(entry);
            if self.items.len() > self.capacity && self.depth < MAX_DEPTH {
                self.split();
            }
            return true;
        }

        if entry.aabb.contains(&self.region) {
            self.contains_oversized = true;
            self.items.push(entry);
            return true;
        }

        let mut placed = false;
        if let Some(children) = self.children.as_deref_mut() {
            for child in children
                .iter_mut()
                .filter(|child| child.region.intersects(&entry.aabb))
            {
                child.insert_intersecting(entry.clone());
                placed = true;
            }
        }

        // Only reachable when rounding leaves a sliver of this region outside every octant.
        if !placed {
            self.items.push(entry);
        }

        true
    }

    fn split(&mut self) {
        let depth = self.depth + 1;
        let capacity = self.capacity;
        let children = self
            .region
            .subdivide()
            .map(|region| Self::with_depth(region, capacity, depth));
        self.children = Some(Box::new(children));

        let count = self.items.len();
        let items = std::mem::take(&mut self.items);
        for entry in items {
            if entry.aabb.contains(&self.region) {
                self.contains_oversized = true;
                self.items.push(entry);
            } else {
                self.insert_intersecting(entry);
            }
        }

        tracing::trace!(
            depth = self.depth,
            count,
            retained = self.items.len(),
            "split octree node"
        );
    }
}

impl<T> ClosestSurface<T> for OctreeNode<T> {
    #[inline]
    fn closest_within(&self, point: DVec3, max_distance: f64) -> Option<Closest<'_, T>> {
        OctreeNode::closest_within(self, point, max_distance)
    }
}
