// Probability distributions used for sampling
pub mod univariate;
pub mod unit_sphere;

// Re-export main types for convenience
pub use univariate::{distribution_from_json, Distribution, Interpolation, ScalarDistribution};
pub use unit_sphere::{unit_sphere_from_json, PolarAzimuthal, UnitSphereDistribution};
