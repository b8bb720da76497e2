use crate::{
    query::{Closest, ClosestSurface},
    sequential::BruteForce,
    tree::OctreeNode,
    Error, GrowableOctree,
};
use glam::DVec3;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

/// Trait to answer nearest-surface queries for many points using multiple CPU threads.
///
/// Queries only borrow the structure, so any number of them may run at once as long as nothing
/// is being inserted.
pub trait ParallelClosest<T>: ClosestSurface<T> + Sync {
    /// Returns the closest stored box within `max_distance` of each point, in order.
    ///
    /// Fails if any point or the radius is NaN.
    #[inline]
    fn par_closest_each(
        &self,
        points: &[DVec3],
        max_distance: f64,
    ) -> Result<Vec<Option<Closest<'_, T>>>, Error>
    where
        T: Sync,
    {
        points
            .par_iter()
            .map(|&point| self.find_closest(point, max_distance))
            .collect()
    }
}

// Manual implementations for better linting.
impl<T: Sync> ParallelClosest<T> for GrowableOctree<T> {}
impl<T: Sync> ParallelClosest<T> for OctreeNode<T> {}
impl<T: Sync> ParallelClosest<T> for BruteForce<'_, T> {}
