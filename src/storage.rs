use crate::{
    query::{Closest, ClosestSurface, QueryOptions, RegionQuery},
    tree::{octant_index, Aabb, Entry, OctreeNode},
    Error, OctreeConfig,
};
use glam::DVec3;

/// Octree over axis-aligned boxes without a fixed domain.
///
/// Boxes falling outside the current domain make the tree grow: the domain doubles towards the
/// box and the previous root becomes one of the octants of the new, larger root. Existing
/// subtrees are moved, never rebuilt, so growing costs one node allocation per doubling no matter
/// how many boxes are stored.
#[derive(Clone, Debug)]
pub struct GrowableOctree<T = ()> {
    root: OctreeNode<T>,
    domain: Aabb,
    len: usize,
    growth_steps: usize,
}

impl<T> Default for GrowableOctree<T> {
    #[inline]
    fn default() -> Self {
        Self::from_root(OctreeNode::new(
            OctreeConfig::default().domain,
            OctreeConfig::default().capacity,
        ))
    }
}

impl<T> GrowableOctree<T> {
    /// Creates a new empty [`GrowableOctree`] with the default configuration.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty [`GrowableOctree`] from the given configuration.
    #[inline]
    pub fn with_config(config: OctreeConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::from_root(OctreeNode::new(config.domain, config.capacity)))
    }

    #[inline]
    fn from_root(root: OctreeNode<T>) -> Self {
        Self {
            domain: *root.region(),
            root,
            len: 0,
            growth_steps: 0,
        }
    }

    /// Returns the region currently covered by the tree. It contains every inserted box.
    #[inline]
    pub const fn domain(&self) -> &Aabb {
        &self.domain
    }

    /// Returns a reference to the root [`OctreeNode`].
    #[inline]
    pub const fn root(&self) -> &OctreeNode<T> {
        &self.root
    }

    /// Returns the split threshold of the tree.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.root.capacity()
    }

    /// Returns the number of boxes inserted so far.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no box was inserted.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of times the domain has doubled.
    #[inline]
    pub const fn growth_steps(&self) -> usize {
        self.growth_steps
    }

    /// Returns the candidate entries of every node intersecting `region`.
    ///
    /// See [`OctreeNode::query`].
    #[inline]
    pub fn query(&self, region: &Aabb) -> Vec<&Entry<T>> {
        self.root.query(region)
    }

    /// Returns the candidate entries of every node intersecting `region` and walk statistics.
    ///
    /// See [`OctreeNode::query_with`].
    #[inline]
    pub fn query_with(&self, region: &Aabb, options: QueryOptions) -> RegionQuery<'_, T> {
        self.root.query_with(region, options)
    }

    /// Doubles the domain until it contains `aabb`.
    ///
    /// Terminates because configured domains have positive extents and box corners are bounded by
    /// [`MAX_COORDINATE`](crate::tree::MAX_COORDINATE).
    fn grow_to(&mut self, aabb: &Aabb) {
        while !self.domain.contains(aabb) {
            let below = aabb.min().cmplt(self.domain.min());

            // The previous root keeps the upper half along the first axis that overflows below the
            // domain, or the lower corner when nothing does and the domain must grow upwards.
            let index = if below.x {
                octant_index(true, false, false)
            } else if below.y {
                octant_index(false, true, false)
            } else if below.z {
                octant_index(false, false, true)
            } else {
                octant_index(false, false, false)
            };

            self.root.wrap(index);

            tracing::debug!(
                from = ?self.domain,
                to = ?self.root.region(),
                octant = index,
                "grew octree domain"
            );

            self.domain = *self.root.region();
            self.growth_steps += 1;
        }
    }
}

impl<T: Clone> GrowableOctree<T> {
    /// Inserts a box and its payload, growing the domain first if it does not contain the box.
    #[inline]
    pub fn insert(&mut self, aabb: Aabb, data: T) {
        self.grow_to(&aabb);
        self.root.insert(Entry::new(aabb, data));
        self.len += 1;
    }
}

impl<T: Clone> Extend<(Aabb, T)> for GrowableOctree<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = (Aabb, T)>>(&mut self, iter: I) {
        for (aabb, data) in iter {
            self.insert(aabb, data);
        }
    }
}

impl<T: Clone> FromIterator<(Aabb, T)> for GrowableOctree<T> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = (Aabb, T)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T> ClosestSurface<T> for GrowableOctree<T> {
    #[inline]
    fn closest_within(&self, point: DVec3, max_distance: f64) -> Option<Closest<'_, T>> {
        self.root.closest_within(point, max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequential::BruteForce;
    use rand::prelude::*;

    fn aabb(x: f64, y: f64, z: f64, w: f64, h: f64, l: f64) -> Aabb {
        Aabb::new(x, y, z, w, h, l).unwrap()
    }

    fn tree(capacity: usize, domain: Aabb) -> GrowableOctree<()> {
        let config = OctreeConfig::default()
            .with_capacity(capacity)
            .with_domain(domain);
        GrowableOctree::with_config(config).unwrap()
    }

    fn wide_domain() -> Aabb {
        aabb(-10000.0, -10000.0, -10000.0, 20000.0, 20000.0, 20000.0)
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = OctreeConfig::default().with_capacity(0);
        assert!(matches!(
            GrowableOctree::<()>::with_config(config),
            Err(Error::InvalidCapacity)
        ));
    }

    #[test]
    fn closest_to_single_box() {
        let mut tree = tree(1, aabb(0.0, 0.0, 0.0, 10.0, 10.0, 10.0));
        let cube = aabb(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        tree.insert(cube, ());

        let closest = tree.find_closest([20.0, 0.0, 0.0], 1000.0).unwrap().unwrap();
        assert_eq!(closest.entry.aabb, cube);
        assert_eq!(closest.distance, 10.0);
        assert_eq!(tree.growth_steps(), 0);
    }

    #[test]
    fn contained_insert_does_not_grow() {
        let mut tree = tree(10, wide_domain());
        tree.insert(aabb(24.0, 24.0, 50.0, 20.0, 20.0, 20.0), ());

        assert_eq!(tree.growth_steps(), 0);
        assert_eq!(tree.domain(), &wide_domain());

        let closest = tree
            .find_closest(DVec3::ZERO, f64::INFINITY)
            .unwrap()
            .unwrap();
        let expected = (24.0f64 * 24.0 + 24.0 * 24.0 + 50.0 * 50.0).sqrt();
        assert_eq!(closest.distance, expected);
    }

    #[test]
    fn grows_towards_negative_x() {
        let mut tree = tree(10, wide_domain());
        tree.insert(aabb(1.0, 1.0, 1.0, 1.0, 1.0, 1.0), ());
        let far = aabb(-20000.0, 0.0, 0.0, 5.0, 5.0, 5.0);
        tree.insert(far, ());

        assert_eq!(tree.growth_steps(), 1);
        assert_eq!(
            tree.domain(),
            &aabb(-30000.0, -10000.0, -10000.0, 40000.0, 40000.0, 40000.0)
        );
        assert_eq!(tree.root().region(), tree.domain());
        assert!(tree.domain().contains(&far));

        // The previous root now sits in the +x octant with its contents untouched.
        let previous = &tree.root().children().unwrap()[octant_index(true, false, false)];
        assert_eq!(previous.region(), &wide_domain());
        assert_eq!(previous.stored_len(), 1);

        let closest = tree.find_closest(far.center(), 1.0).unwrap().unwrap();
        assert_eq!(closest.distance, 0.0);
        assert_eq!(closest.entry.aabb, far);
    }

    #[test]
    fn grows_upwards_when_nothing_is_below() {
        let mut tree = tree(2, aabb(0.0, 0.0, 0.0, 10.0, 10.0, 10.0));
        tree.insert(aabb(35.0, 5.0, 5.0, 1.0, 1.0, 1.0), ());

        assert_eq!(tree.growth_steps(), 2);
        assert_eq!(tree.domain(), &aabb(0.0, 0.0, 0.0, 40.0, 40.0, 40.0));
        assert_eq!(tree.root().depth(), -2);
    }

    #[test]
    fn grows_along_each_axis_in_priority_order() {
        let mut tree = tree(2, aabb(0.0, 0.0, 0.0, 10.0, 10.0, 10.0));
        tree.insert(aabb(-5.0, -5.0, -5.0, 1.0, 1.0, 1.0), ());

        // x first, then y, then z.
        assert_eq!(tree.growth_steps(), 3);
        assert_eq!(tree.domain(), &aabb(-10.0, -20.0, -40.0, 80.0, 80.0, 80.0));

        let z_shell = tree.root();
        assert!(z_shell.children().unwrap()[octant_index(false, false, true)].is_split());
    }

    #[test]
    fn query_finds_boxes_across_growth() {
        let mut tree = tree(2, aabb(0.0, 0.0, 0.0, 10.0, 10.0, 10.0));
        let near = aabb(1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
        let far = aabb(-100.0, 50.0, 200.0, 2.0, 2.0, 2.0);
        tree.insert(near, ());
        tree.insert(far, ());

        let found = tree.query(&aabb(-101.0, 49.0, 199.0, 1.0, 1.0, 1.0));
        assert!(found.iter().any(|entry| entry.aabb == far));
        assert_eq!(tree.query(&near).iter().filter(|e| e.aabb == near).count(), 1);
    }

    #[test]
    fn nothing_within_radius() {
        let mut tree = tree(10, wide_domain());
        tree.insert(aabb(100.0, 0.0, 0.0, 1.0, 1.0, 1.0), ());
        tree.insert(aabb(0.0, -200.0, 0.0, 1.0, 1.0, 1.0), ());

        assert_eq!(tree.find_closest(DVec3::ZERO, 0.01).unwrap(), None);
        assert_eq!(tree.find_closest(DVec3::ZERO, 0.0).unwrap(), None);
        assert!(tree.find_closest(DVec3::ZERO, 100.5).unwrap().is_some());
        assert!(matches!(
            tree.find_closest([f64::NAN, 0.0, 0.0], 1.0),
            Err(Error::InvalidQuery { .. })
        ));
    }

    #[test]
    fn rejects_flat_domain() {
        let flat = aabb(0.0, 0.0, 0.0, 10.0, 10.0, 0.0);
        let config = OctreeConfig::default().with_domain(flat);
        assert!(matches!(
            GrowableOctree::<()>::with_config(config),
            Err(Error::InvalidDomain { .. })
        ));
    }

    #[test]
    fn grows_towards_zero_extent_boxes() {
        let mut tree = tree(2, aabb(0.0, 0.0, 0.0, 10.0, 10.0, 10.0));
        let below = aabb(-3.0, 4.0, 4.0, 0.0, 0.0, 0.0);
        let above = aabb(1.0, 2.0, 75.0, 0.0, 0.0, 0.0);
        tree.insert(below, ());
        tree.insert(above, ());

        assert!(tree.domain().contains(&below));
        assert!(tree.domain().contains(&above));
        assert_eq!(tree.find_closest(above.min(), 1.0).unwrap().unwrap().distance, 0.0);
    }

    #[test]
    fn grows_to_the_edge_of_the_coordinate_range() {
        use crate::tree::MAX_COORDINATE;

        let mut tree = GrowableOctree::new();
        let low = aabb(-MAX_COORDINATE, 0.0, 0.0, 1.0, 1.0, 1.0);
        let high = aabb(0.0, 0.0, 0.5 * MAX_COORDINATE, 0.0, 0.0, 1e149);
        tree.insert(low, "low");
        tree.insert(high, "high");

        let domain = *tree.domain();
        assert!(domain.min().is_finite() && domain.max().is_finite());
        assert!(domain.contains(&low) && domain.contains(&high));

        let closest = tree.find_closest(high.center(), 1.0).unwrap().unwrap();
        assert_eq!(closest.entry.data, "high");
        let closest = tree
            .find_closest(DVec3::new(-MAX_COORDINATE, -1.0, 0.0), 2.0)
            .unwrap()
            .unwrap();
        assert_eq!(closest.entry.data, "low");
    }

    #[test]
    fn keeps_boxes_sticking_out_of_the_initial_domain() {
        let mut tree = tree(10, aabb(0.0, 0.0, 0.0, 10.0, 10.0, 10.0));
        tree.insert(aabb(8.0, 0.0, 0.0, 10.0, 1.0, 1.0), ());

        assert_eq!(tree.growth_steps(), 1);
        let closest = tree.find_closest([20.0, 0.5, 0.5], 5.0).unwrap().unwrap();
        assert_eq!(closest.distance, 2.0);
    }

    #[test]
    fn collects_from_iterator() {
        let tree: GrowableOctree<usize> = (0..50)
            .map(|i| (aabb(i as f64 * 3.0, 0.0, 0.0, 1.0, 1.0, 1.0), i))
            .collect();

        assert_eq!(tree.len(), 50);
        assert!(tree.domain().contains(&aabb(147.0, 0.0, 0.0, 1.0, 1.0, 1.0)));

        let closest = tree.find_closest([30.5, 0.5, 0.5], 2.0).unwrap().unwrap();
        assert_eq!(closest.entry.data, 10);
    }

    #[test]
    fn random_inserts_stay_contained_and_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut tree = GrowableOctree::new();
        let mut entries = Vec::new();

        for i in 0..1000usize {
            let size = rng.gen_range(0.0..20.0);
            let b = aabb(
                rng.gen_range(-2000.0..2000.0),
                rng.gen_range(-2000.0..2000.0),
                rng.gen_range(-2000.0..2000.0),
                size,
                rng.gen_range(0.0..20.0),
                size,
            );
            tree.insert(b, i);
            entries.push(Entry::new(b, i));
        }

        assert_eq!(tree.len(), entries.len());
        assert!(entries.iter().all(|e| tree.domain().contains(&e.aabb)));

        let brute_force = BruteForce(&entries);
        for _ in 0..300 {
            let point = DVec3::new(
                rng.gen_range(-2500.0..2500.0),
                rng.gen_range(-2500.0..2500.0),
                rng.gen_range(-2500.0..2500.0),
            );
            let radius = rng.gen_range(1.0..600.0);

            let pruned = tree.find_closest(point, radius).unwrap();
            let expected = brute_force.find_closest(point, radius).unwrap();
            assert_eq!(pruned.map(|c| c.distance), expected.map(|c| c.distance));
        }
    }
}
