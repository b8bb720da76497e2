use crate::{Aabb, Error};
use glam::DVec3;

/// Split threshold used when none is given.
pub const DEFAULT_CAPACITY: usize = 10;

/// Construction parameters of a [`GrowableOctree`](crate::GrowableOctree).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OctreeConfig {
    /// Number of entries a leaf holds before splitting. Fixed for the lifetime of the tree.
    pub capacity: usize,
    /// Region covered by the tree before any growth.
    pub domain: Aabb,
}

impl Default for OctreeConfig {
    #[inline]
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            domain: default_domain(),
        }
    }
}

impl OctreeConfig {
    /// Returns this configuration with the given split threshold.
    #[inline]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Returns this configuration with the given initial domain.
    #[inline]
    pub fn with_domain(mut self, domain: Aabb) -> Self {
        self.domain = domain;
        self
    }

    /// Checks that the configuration can build a tree.
    ///
    /// The domain must span a positive width along every axis, since growth only ever doubles it.
    #[inline]
    pub fn validate(&self) -> Result<(), Error> {
        if self.capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        if !self.domain.min().cmplt(self.domain.max()).all() {
            return Err(Error::InvalidDomain {
                origin: self.domain.min(),
                extents: self.domain.extents(),
            });
        }

        Ok(())
    }
}

// A 10 unit cube at the origin.
#[inline]
const fn default_domain() -> Aabb {
    Aabb::new_unchecked(DVec3::ZERO, DVec3::splat(10.0))
}
