// Angular distributions on the unit sphere
//
// Used to pick emission directions for source particles and outgoing
// directions after scattering.

use crate::config::{check_for_node, get_child, get_node_array, get_node_value};
use crate::direction::Direction;
use crate::error::ConfigError;
use crate::math::rotate_angle;
use crate::stats::univariate::{distribution_from_json, Distribution, ScalarDistribution};
use log::{debug, warn};
use rand::{Rng, RngCore};
use serde_json::Value;
use std::f64::consts::PI;

/// Read the optional `reference_uvw` attribute shared by every angular
/// distribution, falling back to the pole `(0, 0, 1)`.
///
/// Exactly three finite components are accepted as given; any other count
/// is an error rather than being truncated or padded.
pub fn read_reference_direction(node: &Value) -> Result<Direction, ConfigError> {
    if !check_for_node(node, "reference_uvw") {
        return Ok(Direction::POLE);
    }

    let uvw = get_node_array(node, "reference_uvw")?;
    let u_ref = Direction::from_slice(&uvw)
        .ok_or(ConfigError::ReferenceDirection { found: uvw.len() })?;
    if uvw.iter().any(|c| !c.is_finite()) {
        return Err(ConfigError::InvalidValue {
            name: "reference_uvw".to_string(),
            reason: format!("components must be finite, found {:?}", uvw),
        });
    }

    if !((u_ref.norm() - 1.0).abs() <= 1e-6) {
        warn!(
            "reference_uvw {:?} is not a unit vector (norm {}); using it as given",
            uvw,
            u_ref.norm()
        );
    }
    Ok(u_ref)
}

/// Distribution defined by independent polar-cosine and azimuthal-angle
/// distributions about a reference direction.
#[derive(Debug)]
pub struct PolarAzimuthal {
    u_ref: Direction,
    mu: Box<dyn ScalarDistribution>,
    phi: Box<dyn ScalarDistribution>,
}

impl PolarAzimuthal {
    pub fn new(
        u_ref: Direction,
        mu: Box<dyn ScalarDistribution>,
        phi: Box<dyn ScalarDistribution>,
    ) -> Self {
        Self { u_ref, mu, phi }
    }

    /// Build from a configuration node with optional `reference_uvw`, `mu`
    /// and `phi` children. A missing `mu` defaults to uniform on [-1, 1]
    /// and a missing `phi` to uniform on [0, 2π).
    pub fn from_json(node: &Value) -> Result<Self, ConfigError> {
        let u_ref = read_reference_direction(node)?;

        let mu: Box<dyn ScalarDistribution> = if check_for_node(node, "mu") {
            distribution_from_json(get_child(node, "mu")?)?
        } else {
            debug!("no polar cosine distribution given, using uniform on [-1, 1]");
            Box::new(Distribution::uniform(-1.0, 1.0)?)
        };

        let phi: Box<dyn ScalarDistribution> = if check_for_node(node, "phi") {
            distribution_from_json(get_child(node, "phi")?)?
        } else {
            debug!("no azimuthal distribution given, using uniform on [0, 2pi)");
            Box::new(Distribution::uniform(0.0, 2.0 * PI)?)
        };

        Ok(Self { u_ref, mu, phi })
    }

    pub fn reference_direction(&self) -> Direction {
        self.u_ref
    }

    pub fn mu(&self) -> &dyn ScalarDistribution {
        self.mu.as_ref()
    }

    pub fn phi(&self) -> &dyn ScalarDistribution {
        self.phi.as_ref()
    }

    pub fn sample(&self, rng: &mut dyn RngCore) -> Direction {
        let mu = self.mu.sample(rng);
        if mu == 1.0 {
            return self.u_ref;
        }

        let mut phi = self.phi.sample(rng);

        // With the reference on the polar axis, rotate_angle measures phi from
        // a different origin than spherical coordinates do; shift it back.
        // TODO: fold this shift into rotate_angle itself
        if self.u_ref.x == 0.0 && self.u_ref.y == 0.0 {
            phi += 0.5 * PI;
        }

        rotate_angle(self.u_ref, mu, Some(phi), rng)
    }
}

/// Distribution of directions on the unit sphere.
#[derive(Debug)]
pub enum UnitSphereDistribution {
    /// Uniform over the whole sphere
    Isotropic,
    /// Always the reference direction
    Monodirectional { u_ref: Direction },
    PolarAzimuthal(PolarAzimuthal),
}

impl UnitSphereDistribution {
    pub fn monodirectional(u_ref: Direction) -> Self {
        UnitSphereDistribution::Monodirectional { u_ref }
    }

    pub fn polar_azimuthal(
        u_ref: Direction,
        mu: Box<dyn ScalarDistribution>,
        phi: Box<dyn ScalarDistribution>,
    ) -> Self {
        UnitSphereDistribution::PolarAzimuthal(PolarAzimuthal::new(u_ref, mu, phi))
    }

    /// The axis polar angles are measured from. Isotropic sampling does not
    /// use one and reports the pole.
    pub fn reference_direction(&self) -> Direction {
        match self {
            UnitSphereDistribution::Isotropic => Direction::POLE,
            UnitSphereDistribution::Monodirectional { u_ref } => *u_ref,
            UnitSphereDistribution::PolarAzimuthal(pa) => pa.reference_direction(),
        }
    }

    /// Sample a direction, drawing only from the given stream.
    ///
    /// Isotropic draws two variates, monodirectional none, and
    /// polar-azimuthal whatever its component distributions need.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Direction {
        match self {
            UnitSphereDistribution::Isotropic => {
                let phi = 2.0 * PI * rng.gen::<f64>();
                let mu = 2.0 * rng.gen::<f64>() - 1.0;
                let sin_theta = (1.0 - mu * mu).sqrt();
                Direction::new(mu, sin_theta * phi.cos(), sin_theta * phi.sin())
            }
            UnitSphereDistribution::Monodirectional { u_ref } => *u_ref,
            UnitSphereDistribution::PolarAzimuthal(pa) => pa.sample(rng),
        }
    }
}

/// Build an angular distribution from a configuration node.
///
/// `type` selects `isotropic`, `monodirectional` or `mu-phi`
/// (`polar-azimuthal` is accepted as an alias). Every type validates
/// `reference_uvw` when present.
pub fn unit_sphere_from_json(node: &Value) -> Result<UnitSphereDistribution, ConfigError> {
    let kind = get_node_value(node, "type")?;
    debug!("building '{}' angular distribution", kind);

    match kind.as_str() {
        "isotropic" => {
            read_reference_direction(node)?;
            Ok(UnitSphereDistribution::Isotropic)
        }
        "monodirectional" => Ok(UnitSphereDistribution::monodirectional(
            read_reference_direction(node)?,
        )),
        "mu-phi" | "polar-azimuthal" => Ok(UnitSphereDistribution::PolarAzimuthal(
            PolarAzimuthal::from_json(node)?,
        )),
        other => Err(ConfigError::UnknownType {
            kind: "angular distribution",
            name: other.to_string(),
        }),
    }
}
