use serde::{Deserialize, Serialize};

/// Direction of flight as a Cartesian `(x, y, z)` triple.
///
/// The type performs no normalisation. Values produced by the samplers in
/// [`crate::stats::unit_sphere`] are unit length; anything else is the
/// caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Direction {
    /// Canonical polar axis, used whenever no reference direction is configured.
    pub const POLE: Direction = Direction {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Build from a slice, returning `None` unless it holds exactly three values.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [x, y, z] => Some(Self::new(*x, *y, *z)),
            _ => None,
        }
    }

    pub fn dot(&self, other: &Direction) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Direction {
    fn from(uvw: [f64; 3]) -> Self {
        Self::new(uvw[0], uvw[1], uvw[2])
    }
}

impl From<Direction> for [f64; 3] {
    fn from(d: Direction) -> Self {
        d.to_array()
    }
}
