use crate::{
    query::{Closest, ClosestSurface},
    tree::{Aabb, Entry, OctreeNode},
    Error, GrowableOctree,
};
use glam::DVec3;

/// Trait to answer nearest-surface queries for many points using one CPU thread.
pub trait SequentialClosest<T>: ClosestSurface<T> {
    /// Returns the closest stored box within `max_distance` of each point, in order.
    ///
    /// Fails on the first NaN point or radius.
    #[inline]
    fn closest_each(
        &self,
        points: &[DVec3],
        max_distance: f64,
    ) -> Result<Vec<Option<Closest<'_, T>>>, Error> {
        points
            .iter()
            .map(|&point| self.find_closest(point, max_distance))
            .collect()
    }
}

// Manual implementations for better linting.
impl<T> SequentialClosest<T> for GrowableOctree<T> {}
impl<T> SequentialClosest<T> for OctreeNode<T> {}
impl<T> SequentialClosest<T> for BruteForce<'_, T> {}

/// Linear scan over a slice of entries, without any spatial structure.
///
/// Returns exactly what a pruned search over the same entries returns, which makes it the
/// reference the tree is checked against, and a reasonable choice for a handful of boxes.
#[derive(Clone, Copy, Debug)]
pub struct BruteForce<'a, T>(pub &'a [Entry<T>]);

impl<'a, T> BruteForce<'a, T> {
    /// Returns every entry intersecting `region`.
    #[inline]
    pub fn query(&self, region: &Aabb) -> Vec<&'a Entry<T>> {
        self.0
            .iter()
            .filter(|entry| entry.aabb.intersects(region))
            .collect()
    }
}

impl<T> ClosestSurface<T> for BruteForce<'_, T> {
    #[inline]
    fn closest_within(&self, point: DVec3, max_distance: f64) -> Option<Closest<'_, T>> {
        self.0.iter().fold(None::<Closest<'_, T>>, |best, entry| {
            let candidate = Closest::new(entry, entry.aabb.distance_to(point));
            match best {
                Some(best) => Some(best.closer(Some(candidate))),
                None if candidate.distance < max_distance => Some(candidate),
                None => None,
            }
        })
    }
}
