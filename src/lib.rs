#![warn(missing_docs)]
//! # Nearbox
//!
//! Nearbox is a crate providing an octree of axis-aligned boxes that grows to fit whatever is
//! inserted and answers bounded nearest-surface queries.
//!
//! ## Goals
//!
//! The main goal of this crate is to serve distance queries for sphere tracing: a renderer
//! repeatedly asks for the surface closest to a point and steps a ray forward by the returned
//! distance. This requires the distance to be exact (an overestimate makes rays overshoot) and the
//! query to be cheap enough to run many times per pixel. The crate does not render anything
//! itself, [`SphereTracer`](trace::SphereTracer) only marches rays and reports what they hit.
//!
//! ## Using Nearbox
//!
//! A [`GrowableOctree`] starts with a small domain and doubles it towards any box that does not
//! fit, wrapping the previous root into a larger one without rebuilding it. Each stored box
//! carries a payload of any [`Clone`] type.
//!
//! ```
//! use nearbox::prelude::*;
//! use glam::DVec3;
//!
//! let mut tree = GrowableOctree::new();
//! tree.insert(Aabb::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0)?, "crate");
//! tree.insert(Aabb::new(-500.0, 20.0, 0.0, 5.0, 5.0, 5.0)?, "barrel");
//!
//! let closest = tree.find_closest(DVec3::new(20.0, 0.0, 0.0), 1000.0)?.unwrap();
//! assert_eq!(closest.entry.data, "crate");
//! assert_eq!(closest.distance, 10.0);
//!
//! // Nothing within the radius is not an error.
//! assert!(tree.find_closest(DVec3::new(20.0, 0.0, 0.0), 1.0)?.is_none());
//! # Ok::<(), nearbox::Error>(())
//! ```
//!
//! ### Configuration
//!
//! The split threshold and the initial domain are set once through an [`OctreeConfig`]. Larger
//! capacities make shallower trees with longer leaf scans.
//!
//! ```
//! use nearbox::prelude::*;
//!
//! let config = OctreeConfig::default()
//!     .with_capacity(4)
//!     .with_domain(Aabb::new(-64.0, -64.0, -64.0, 128.0, 128.0, 128.0)?);
//! let mut tree = GrowableOctree::<u32>::with_config(config)?;
//!
//! tree.insert(Aabb::new(100.0, 0.0, 0.0, 1.0, 1.0, 1.0)?, 7);
//! assert_eq!(tree.growth_steps(), 1);
//! # Ok::<(), nearbox::Error>(())
//! ```
//!
//! ### Region queries
//!
//! [`GrowableOctree::query`] returns every entry held by the nodes intersecting a region. It is a
//! broad phase: callers filter the candidates with [`Aabb::intersects`] when they need exact
//! results.
//!
//! ```
//! use nearbox::prelude::*;
//!
//! let tree: GrowableOctree<char> = [('a', 0.0), ('b', 30.0)]
//!     .into_iter()
//!     .map(|(c, x)| Aabb::new(x, 0.0, 0.0, 1.0, 1.0, 1.0).map(|aabb| (aabb, c)))
//!     .collect::<Result<_, _>>()?;
//!
//! let region = Aabb::new(-1.0, -1.0, -1.0, 3.0, 3.0, 3.0)?;
//! let hits: Vec<_> = tree
//!     .query(&region)
//!     .into_iter()
//!     .filter(|entry| entry.aabb.intersects(&region))
//!     .map(|entry| entry.data)
//!     .collect();
//! assert_eq!(hits, ['a']);
//! # Ok::<(), nearbox::Error>(())
//! ```
//!
//! ### Threads
//!
//! Inserting needs `&mut` access, queries only `&`. Enable the `parallel` feature for
//! [`ParallelClosest`](parallel::ParallelClosest), which runs batches of queries with rayon.

/// Construction parameters.
pub mod config;
/// Error type shared by the crate.
pub mod error;
/// Algorithms that use multiple CPU threads.
#[cfg(feature = "parallel")]
pub mod parallel;
/// Query results and the trait implemented by searchable structures.
pub mod query;
/// Algorithms that use one CPU thread.
pub mod sequential;
/// Growable octree storing boxes without a fixed domain.
pub mod storage;
/// Sphere tracing on top of nearest-surface queries.
pub mod trace;
/// Octree nodes and the box primitive.
pub mod tree;

pub use config::OctreeConfig;
pub use error::Error;
pub use storage::GrowableOctree;
pub use tree::{Aabb, Entry};

/// Commonly used types, re-exported.
pub mod prelude {
    pub use crate::{
        config::OctreeConfig,
        error::Error,
        query::{Closest, ClosestSurface, QueryOptions, RegionQuery},
        sequential::{BruteForce, SequentialClosest},
        storage::GrowableOctree,
        trace::{SphereTracer, Trace},
        tree::{Aabb, Entry, OctreeNode},
    };

    #[cfg(feature = "parallel")]
    pub use crate::parallel::ParallelClosest;
}
