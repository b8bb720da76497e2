use glam::DVec3;
use thiserror::Error;

/// Errors that can occur when building boxes, configuring trees or issuing queries.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum Error {
    /// A box had a non-finite component, a negative extent or a corner out of range.
    #[error("invalid box at {origin} with extents {extents}: components must be finite, extents non-negative and corners within the coordinate range")]
    InvalidBox {
        /// Requested minimum corner.
        origin: DVec3,
        /// Requested extents.
        extents: DVec3,
    },

    /// A query point or search radius was NaN.
    #[error("invalid query at {point} within {max_distance}: NaN is not a position or radius")]
    InvalidQuery {
        /// Requested query point.
        point: DVec3,
        /// Requested search radius.
        max_distance: f64,
    },

    /// A tree was configured with an initial domain that is flat along some axis.
    #[error("invalid domain at {origin} with extents {extents}: every extent must be positive")]
    InvalidDomain {
        /// Minimum corner of the domain.
        origin: DVec3,
        /// Extents of the domain.
        extents: DVec3,
    },

    /// A tree was configured with a split threshold of zero.
    #[error("capacity must be at least 1")]
    InvalidCapacity,

    /// A ray direction could not be normalized.
    #[error("invalid ray direction {direction}: must be finite and non-zero")]
    InvalidRay {
        /// Requested direction.
        direction: DVec3,
    },
}
