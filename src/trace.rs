use crate::{
    query::{validate_query, ClosestSurface},
    tree::Entry,
    Error,
};
use glam::DVec3;

/// Marches rays through boxes stored in a [`ClosestSurface`], stepping each ray forward by the
/// distance to the closest surface until it gets close enough to count as a hit.
///
/// The search radius of each step is the travel budget left, so a ray never queries farther than
/// it is allowed to go.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereTracer {
    /// Maximum number of steps before giving up on a ray.
    pub max_steps: usize,
    /// Distance to a surface below which the ray counts as hitting it.
    pub hit_distance: f64,
    /// Maximum distance a ray may travel from its origin.
    pub max_distance: f64,
}

impl Default for SphereTracer {
    #[inline]
    fn default() -> Self {
        Self {
            max_steps: 120,
            hit_distance: 0.01,
            max_distance: 10_000.0,
        }
    }
}

/// Outcome of marching a single ray.
#[derive(Debug, PartialEq)]
pub enum Trace<'a, T> {
    /// The ray came within the hit distance of a stored box.
    Hit {
        /// The box that was hit.
        entry: &'a Entry<T>,
        /// Position of the ray when the hit was detected.
        position: DVec3,
        /// Distance travelled from the origin.
        travelled: f64,
        /// Number of steps taken.
        steps: usize,
    },
    /// Nothing lies within the remaining travel budget of the ray.
    Escaped {
        /// Distance travelled from the origin.
        travelled: f64,
        /// Number of steps taken.
        steps: usize,
    },
    /// The step limit was reached before the ray hit or escaped.
    Exhausted {
        /// Position of the ray after the last step.
        position: DVec3,
        /// Distance to the closest surface at that position.
        distance: f64,
    },
}

impl<T> Trace<'_, T> {
    /// Returns true if the ray hit a box.
    #[inline]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }
}

impl SphereTracer {
    /// Marches a ray from `origin` along `direction`, which does not need to be normalized.
    ///
    /// Fails with [`Error::InvalidRay`] if the direction cannot be normalized and with
    /// [`Error::InvalidQuery`] if the origin contains NaN.
    pub fn trace<'a, T, S>(
        &self,
        surface: &'a S,
        origin: DVec3,
        direction: DVec3,
    ) -> Result<Trace<'a, T>, Error>
    where
        S: ClosestSurface<T>,
    {
        let Some(direction) = direction.try_normalize() else {
            return Err(Error::InvalidRay { direction });
        };
        if !validate_query(origin, self.max_distance)? {
            return Ok(Trace::Escaped {
                travelled: 0.0,
                steps: 0,
            });
        }

        let mut position = origin;
        let mut travelled = 0.0;
        let mut distance = f64::INFINITY;

        for steps in 0..self.max_steps {
            let remaining = self.max_distance - travelled;
            let Some(closest) = surface.closest_within(position, remaining) else {
                return Ok(Trace::Escaped { travelled, steps });
            };

            if closest.distance < self.hit_distance {
                return Ok(Trace::Hit {
                    entry: closest.entry,
                    position,
                    travelled,
                    steps,
                });
            }

            distance = closest.distance;
            position += direction * distance;
            travelled += distance;
        }

        Ok(Trace::Exhausted { position, distance })
    }
}
