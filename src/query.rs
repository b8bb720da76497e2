use crate::{tree::Entry, Error};
use glam::DVec3;

/// The closest stored box found by a bounded nearest-surface search.
#[derive(Debug, PartialEq)]
pub struct Closest<'a, T> {
    /// The stored box and its payload.
    pub entry: &'a Entry<T>,
    /// Distance from the query point to the surface of the box, zero if the point is inside.
    pub distance: f64,
}

impl<T> Clone for Closest<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Closest<'_, T> {}

impl<'a, T> Closest<'a, T> {
    /// Creates a new [`Closest`] result.
    #[inline]
    pub const fn new(entry: &'a Entry<T>, distance: f64) -> Self {
        Self { entry, distance }
    }

    /// Keeps whichever of `self` and `candidate` is strictly closer, preferring `self` on ties.
    #[inline]
    pub fn closer(self, candidate: Option<Self>) -> Self {
        match candidate {
            Some(candidate) if candidate.distance < self.distance => candidate,
            _ => self,
        }
    }
}

/// Options for a region query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Stop walking the tree at the first visited node that is fully enclosed by a stored box.
    ///
    /// Such a node already guarantees the region is occupied, which is enough for callers that
    /// only need a conservative answer.
    pub stop_at_enclosing: bool,
}

/// Accumulated result of a region query.
#[derive(Debug)]
pub struct RegionQuery<'a, T> {
    /// Candidate entries held by every visited node that intersects the query region.
    ///
    /// Boxes straddling several nodes are reported once per holding node.
    pub entries: Vec<&'a Entry<T>>,
    /// Whether the walk was cut short at an enclosing node.
    pub finished: bool,
    /// Smallest width along x of all visited nodes, or infinity if no node was visited.
    pub min_node_width: f64,
}

impl<T> Default for RegionQuery<'_, T> {
    #[inline]
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            finished: false,
            min_node_width: f64::INFINITY,
        }
    }
}

/// Checks a nearest-surface query, returning whether it can match anything at all.
///
/// NaN anywhere is an error. A non-positive radius or a point at infinity can never find a box
/// and yields `Ok(false)`.
#[inline]
pub fn validate_query(point: DVec3, max_distance: f64) -> Result<bool, Error> {
    if point.is_nan() || max_distance.is_nan() {
        return Err(Error::InvalidQuery {
            point,
            max_distance,
        });
    }

    Ok(point.is_finite() && max_distance > 0.0)
}

/// Trait for structures that can answer bounded nearest-surface queries over stored boxes.
pub trait ClosestSurface<T> {
    /// Returns the stored box strictly closer than `max_distance` to `point`, if any.
    ///
    /// The inputs are expected to have gone through [`validate_query`].
    fn closest_within(&self, point: DVec3, max_distance: f64) -> Option<Closest<'_, T>>;

    /// Returns the stored box closest to `point` within `max_distance`.
    ///
    /// Finding nothing is routine and returns `Ok(None)`; only NaN inputs are rejected.
    #[inline]
    fn find_closest<P>(&self, point: P, max_distance: f64) -> Result<Option<Closest<'_, T>>, Error>
    where
        P: Into<DVec3>,
    {
        let point = point.into();
        if !validate_query(point, max_distance)? {
            return Ok(None);
        }

        Ok(self.closest_within(point, max_distance))
    }
}
