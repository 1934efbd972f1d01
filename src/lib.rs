//! Reproducible sampling of directions on the unit sphere for Monte Carlo
//! particle transport.
//!
//! A [`UnitSphereDistribution`] is built once, from configuration or
//! explicit parameters, and then sampled with an independent random stream
//! per request:
//!
//! ```
//! use angular_sampling::random_lcg::{ParticleSeeds, Stream, DEFAULT_SEED};
//! use angular_sampling::UnitSphereDistribution;
//!
//! let dist = UnitSphereDistribution::Isotropic;
//! let mut seeds = ParticleSeeds::new(1, DEFAULT_SEED);
//! let u = dist.sample(seeds.stream(Stream::Source));
//! assert!((u.norm() - 1.0).abs() < 1e-12);
//! ```

pub mod config;
pub mod direction;
pub mod error;
pub mod math;
pub mod random_lcg;
pub mod stats;

pub use direction::Direction;
pub use error::ConfigError;
pub use math::rotate_angle;
pub use random_lcg::{FastRng, ParticleSeeds, Stream};
pub use stats::{
    distribution_from_json, unit_sphere_from_json, Distribution, PolarAzimuthal,
    ScalarDistribution, UnitSphereDistribution,
};
