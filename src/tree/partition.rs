use crate::Error;
use glam::DVec3;

/// Number of octants a region divides into.
pub const OCTANTS: usize = 8;

/// Largest absolute coordinate a box corner may have.
///
/// Keeps growing domains and squared distances between stored boxes finite.
pub const MAX_COORDINATE: f64 = 1e150;

/// Returns the index of the octant on the given sides of a region's center.
///
/// Octants `0..4` form the bottom layer (lower y) and `4..8` the top layer. Within a layer the
/// quadrants are ordered `(-x, -z)`, `(+x, -z)`, `(-x, +z)`, `(+x, +z)`.
#[inline]
pub const fn octant_index(upper_x: bool, upper_y: bool, upper_z: bool) -> usize {
    (upper_x as usize) | (upper_z as usize) << 1 | (upper_y as usize) << 2
}

/// Returns, for each axis, `1.0` if the octant lies on the upper side of that axis, `0.0` otherwise.
#[inline]
fn octant_sides(index: usize) -> DVec3 {
    DVec3::new(
        (index & 1) as f64,
        ((index >> 2) & 1) as f64,
        ((index >> 1) & 1) as f64,
    )
}

/// An axis-aligned box described by its minimum corner and its non-negative extents.
///
/// Every predicate treats the box as the closed interval `[origin, origin + extents]` on each
/// axis, so boxes that merely touch intersect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "[f64; 6]", into = "[f64; 6]")
)]
pub struct Aabb {
    origin: DVec3,
    extents: DVec3,
}

impl Aabb {
    /// Creates a new [`Aabb`] from its minimum corner `(x, y, z)` and extents `(w, h, l)`.
    ///
    /// Fails with [`Error::InvalidBox`] if any component is not finite, any extent is negative or
    /// a corner lies farther than [`MAX_COORDINATE`] from the origin on some axis.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64, w: f64, h: f64, l: f64) -> Result<Self, Error> {
        Self::from_origin_extents(DVec3::new(x, y, z), DVec3::new(w, h, l))
    }

    /// Creates a new [`Aabb`] from its minimum corner and extents.
    #[inline]
    pub fn from_origin_extents(origin: DVec3, extents: DVec3) -> Result<Self, Error> {
        let in_range = |corner: DVec3| corner.abs().max_element() <= MAX_COORDINATE;
        if !origin.is_finite()
            || !extents.is_finite()
            || extents.min_element() < 0.0
            || !in_range(origin)
            || !in_range(origin + extents)
        {
            return Err(Error::InvalidBox { origin, extents });
        }

        Ok(Self::new_unchecked(origin, extents))
    }

    #[inline]
    pub(crate) const fn new_unchecked(origin: DVec3, extents: DVec3) -> Self {
        Self { origin, extents }
    }

    /// Creates a new [`Aabb`] spanning the two given corners, in any order.
    #[inline]
    pub fn from_corners(a: DVec3, b: DVec3) -> Result<Self, Error> {
        let origin = a.min(b);
        Self::from_origin_extents(origin, a.max(b) - origin)
    }

    /// Creates a new cube of side `size` centered on `center`.
    #[inline]
    pub fn cube(center: DVec3, size: f64) -> Result<Self, Error> {
        let extents = DVec3::splat(size);
        Self::from_origin_extents(center - extents * 0.5, extents)
    }

    /// Minimum corner of the box.
    #[inline]
    pub const fn min(&self) -> DVec3 {
        self.origin
    }

    /// Maximum corner of the box.
    #[inline]
    pub fn max(&self) -> DVec3 {
        self.origin + self.extents
    }

    /// Extents of the box along each axis.
    #[inline]
    pub const fn extents(&self) -> DVec3 {
        self.extents
    }

    /// Returns the center of the [`Aabb`].
    #[inline]
    pub fn center(&self) -> DVec3 {
        self.origin + self.extents * 0.5
    }

    /// Returns true unless the two boxes are separated along at least one axis.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min().cmple(other.max()).all() && other.min().cmple(self.max()).all()
    }

    /// Returns true if both corners of `inner` lie within this box.
    #[inline]
    pub fn contains(&self, inner: &Aabb) -> bool {
        self.contains_point(inner.min()) && self.contains_point(inner.max())
    }

    /// Returns true if the point lies within this box or on its surface.
    #[inline]
    pub fn contains_point(&self, point: DVec3) -> bool {
        self.min().cmple(point).all() && point.cmple(self.max()).all()
    }

    /// Returns the Euclidean distance from the point to the closest point of the box, zero when
    /// the point is inside.
    ///
    /// This never overestimates the distance to anything inside the box, which makes it a valid
    /// lower bound for pruning searches.
    #[inline]
    pub fn distance_to(&self, point: DVec3) -> f64 {
        self.distance_squared_to(point).sqrt()
    }

    /// Returns the squared distance from the point to the closest point of the box.
    #[inline]
    pub fn distance_squared_to(&self, point: DVec3) -> f64 {
        (self.min() - point)
            .max(DVec3::ZERO)
            .max(point - self.max())
            .length_squared()
    }

    /// Returns the octant at `index` (see [`octant_index`]), a box with half the extents of this
    /// one in every dimension.
    #[inline]
    pub fn octant(&self, index: usize) -> Self {
        let half = self.extents * 0.5;
        Self {
            origin: self.origin + half * octant_sides(index),
            extents: half,
        }
    }

    /// Subdivides this [`Aabb`] into its 8 octants, ordered by [`octant_index`].
    #[inline]
    pub fn subdivide(&self) -> [Self; OCTANTS] {
        std::array::from_fn(|i| self.octant(i))
    }

    /// Returns the box twice as large in every dimension in which this box is exactly the octant
    /// at `index`.
    #[inline]
    pub fn enclosing(&self, index: usize) -> Self {
        Self {
            origin: self.origin - self.extents * octant_sides(index),
            extents: self.extents * 2.0,
        }
    }
}

impl TryFrom<[f64; 6]> for Aabb {
    type Error = Error;

    #[inline]
    fn try_from([x, y, z, w, h, l]: [f64; 6]) -> Result<Self, Self::Error> {
        Self::new(x, y, z, w, h, l)
    }
}

impl From<Aabb> for [f64; 6] {
    #[inline]
    fn from(aabb: Aabb) -> Self {
        let [x, y, z] = aabb.origin.to_array();
        let [w, h, l] = aabb.extents.to_array();
        [x, y, z, w, h, l]
    }
}
