// Geometry helpers for angular sampling

use crate::direction::Direction;
use rand::{Rng, RngCore};
use std::f64::consts::PI;

/// Rotate `u` by a polar angle with cosine `mu` and azimuthal angle `phi`.
///
/// When `phi` is `None` it is sampled uniformly on [0, 2π) from `rng`; when
/// it is supplied no random number is drawn.
///
/// The azimuthal origin is taken relative to the `z` axis. When `u` lies on
/// the `z` axis that basis degenerates and the expansion is done about the
/// `y` component instead, so the routine never divides by zero for a unit
/// `u`.
pub fn rotate_angle(u: Direction, mu: f64, phi: Option<f64>, rng: &mut dyn RngCore) -> Direction {
    let phi = match phi {
        Some(phi) => phi,
        None => 2.0 * PI * rng.gen::<f64>(),
    };

    let (sinphi, cosphi) = phi.sin_cos();
    let a = (1.0 - mu * mu).max(0.0).sqrt();
    // hypot keeps b accurate when u is within a hair of the z axis, where
    // 1 - w^2 cancels
    let b = u.x.hypot(u.y);

    if b > 1e-10 {
        Direction::new(
            mu * u.x + a * (u.x * u.z * cosphi - u.y * sinphi) / b,
            mu * u.y + a * (u.y * u.z * cosphi + u.x * sinphi) / b,
            mu * u.z - a * b * cosphi,
        )
    } else {
        let b = (1.0 - u.y * u.y).sqrt();
        Direction::new(
            mu * u.x + a * (u.x * u.y * cosphi + u.z * sinphi) / b,
            mu * u.y - a * b * cosphi,
            mu * u.z + a * (u.y * u.z * cosphi - u.x * sinphi) / b,
        )
    }
}
