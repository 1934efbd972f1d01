// One-dimensional probability distributions
//
// These are the scalar building blocks of the angular distributions: a
// polar-azimuthal distribution owns one for the polar cosine and one for the
// azimuthal angle.

use crate::config::{check_for_node, get_node_array, get_node_value};
use crate::error::ConfigError;
use rand::{Rng, RngCore};
use rand_distr::Distribution as _;
use serde_json::Value;
use std::f64::consts::PI;
use std::fmt;

/// A univariate distribution that can be sampled from a random stream.
pub trait ScalarDistribution: fmt::Debug + Send + Sync {
    fn sample(&self, rng: &mut dyn RngCore) -> f64;
}

/// Interpolation law between tabulated points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Histogram,
    LinearLinear,
}

/// Discrete distribution over a finite set of values
#[derive(Debug, Clone, PartialEq)]
pub struct Discrete {
    x: Vec<f64>,
    /// Normalised probabilities
    p: Vec<f64>,
    /// Running sum of `p`
    cdf: Vec<f64>,
}

impl Discrete {
    pub fn new(x: Vec<f64>, p: Vec<f64>) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidParameters {
            distribution: "discrete",
            reason: reason.to_string(),
        };
        if x.is_empty() {
            return Err(invalid("at least one value is required"));
        }
        if x.len() != p.len() {
            return Err(invalid("values and probabilities differ in length"));
        }
        if x.iter().any(|xi| !xi.is_finite()) {
            return Err(invalid("values must be finite"));
        }
        if p.iter().any(|&pi| !(pi >= 0.0) || !pi.is_finite()) {
            return Err(invalid("probabilities must be finite and non-negative"));
        }
        let total: f64 = p.iter().sum();
        if total <= 0.0 {
            return Err(invalid("probabilities sum to zero"));
        }

        let p: Vec<f64> = p.iter().map(|pi| pi / total).collect();
        let cdf = p
            .iter()
            .scan(0.0, |acc, &pi| {
                *acc += pi;
                Some(*acc)
            })
            .collect();
        Ok(Self { x, p, cdf })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn p(&self) -> &[f64] {
        &self.p
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let xi: f64 = rng.gen();
        let idx = self.cdf.partition_point(|&c| c <= xi);
        self.x[idx.min(self.x.len() - 1)]
    }
}

/// Tabulated probability density
#[derive(Debug, Clone, PartialEq)]
pub struct Tabular {
    x: Vec<f64>,
    /// Density, normalised so the CDF ends at one
    p: Vec<f64>,
    cdf: Vec<f64>,
    interpolation: Interpolation,
}

impl Tabular {
    pub fn new(x: Vec<f64>, p: Vec<f64>, interpolation: Interpolation) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidParameters {
            distribution: "tabular",
            reason: reason.to_string(),
        };
        if x.len() < 2 {
            return Err(invalid("at least two tabulated points are required"));
        }
        if x.len() != p.len() {
            return Err(invalid("x and p differ in length"));
        }
        if x.iter().any(|xi| !xi.is_finite()) {
            return Err(invalid("x values must be finite"));
        }
        if x.windows(2).any(|w| !(w[1] >= w[0])) {
            return Err(invalid("x values must be non-decreasing"));
        }
        if p.iter().any(|&pi| !(pi >= 0.0) || !pi.is_finite()) {
            return Err(invalid("densities must be finite and non-negative"));
        }

        let mut cdf = Vec::with_capacity(x.len());
        cdf.push(0.0);
        for i in 1..x.len() {
            let dx = x[i] - x[i - 1];
            let area = match interpolation {
                Interpolation::Histogram => p[i - 1] * dx,
                Interpolation::LinearLinear => 0.5 * (p[i - 1] + p[i]) * dx,
            };
            cdf.push(cdf[i - 1] + area);
        }

        let total = cdf[cdf.len() - 1];
        if !(total > 0.0) {
            return Err(invalid("density integrates to zero"));
        }
        let p = p.iter().map(|pi| pi / total).collect();
        let cdf = cdf.iter().map(|c| c / total).collect();

        Ok(Self {
            x,
            p,
            cdf,
            interpolation,
        })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn p(&self) -> &[f64] {
        &self.p
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let c: f64 = rng.gen();

        // first bin whose upper CDF bound is at or above c
        let n = self.cdf.len();
        let mut i = 0;
        while i < n - 2 && c > self.cdf[i + 1] {
            i += 1;
        }
        let c_i = self.cdf[i];
        let x_i = self.x[i];
        let p_i = self.p[i];

        match self.interpolation {
            Interpolation::Histogram => {
                if p_i > 0.0 {
                    x_i + (c - c_i) / p_i
                } else {
                    x_i
                }
            }
            Interpolation::LinearLinear => {
                let x_i1 = self.x[i + 1];
                let p_i1 = self.p[i + 1];
                let m = (p_i1 - p_i) / (x_i1 - x_i);
                if m == 0.0 {
                    x_i + (c - c_i) / p_i
                } else {
                    x_i + ((p_i * p_i + 2.0 * m * (c - c_i)).max(0.0).sqrt() - p_i) / m
                }
            }
        }
    }
}

/// Scalar distributions that can be built from configuration.
#[derive(Debug, Clone)]
pub enum Distribution {
    Discrete(Discrete),
    /// Uniform on [a, b)
    Uniform { a: f64, b: f64 },
    /// Density proportional to x^n on [a, b]
    PowerLaw { a: f64, b: f64, n: f64 },
    /// Maxwellian spectrum with temperature `theta`
    Maxwell { theta: f64 },
    /// Watt fission spectrum
    Watt { a: f64, b: f64 },
    Normal {
        mean: f64,
        std_dev: f64,
        normal: rand_distr::Normal<f64>,
    },
    Tabular(Tabular),
}

impl Distribution {
    pub fn discrete(x: Vec<f64>, p: Vec<f64>) -> Result<Self, ConfigError> {
        Ok(Distribution::Discrete(Discrete::new(x, p)?))
    }

    pub fn uniform(a: f64, b: f64) -> Result<Self, ConfigError> {
        if !(a.is_finite() && b.is_finite()) || a > b {
            return Err(ConfigError::InvalidParameters {
                distribution: "uniform",
                reason: format!("require finite a <= b, got a = {}, b = {}", a, b),
            });
        }
        Ok(Distribution::Uniform { a, b })
    }

    pub fn power_law(a: f64, b: f64, n: f64) -> Result<Self, ConfigError> {
        if !(a >= 0.0 && a < b && b.is_finite()) || n == -1.0 || !n.is_finite() {
            return Err(ConfigError::InvalidParameters {
                distribution: "power law",
                reason: format!("require 0 <= a < b and n != -1, got a = {}, b = {}, n = {}", a, b, n),
            });
        }
        // x^n is not integrable at zero for n < -1
        if a == 0.0 && n < -1.0 {
            return Err(ConfigError::InvalidParameters {
                distribution: "power law",
                reason: format!("n = {} needs a lower bound a > 0", n),
            });
        }
        Ok(Distribution::PowerLaw { a, b, n })
    }

    pub fn maxwell(theta: f64) -> Result<Self, ConfigError> {
        if !(theta > 0.0 && theta.is_finite()) {
            return Err(ConfigError::InvalidParameters {
                distribution: "maxwell",
                reason: format!("theta must be positive, got {}", theta),
            });
        }
        Ok(Distribution::Maxwell { theta })
    }

    pub fn watt(a: f64, b: f64) -> Result<Self, ConfigError> {
        if !(a > 0.0 && a.is_finite() && b >= 0.0 && b.is_finite()) {
            return Err(ConfigError::InvalidParameters {
                distribution: "watt",
                reason: format!("require a > 0 and b >= 0, got a = {}, b = {}", a, b),
            });
        }
        Ok(Distribution::Watt { a, b })
    }

    pub fn normal(mean: f64, std_dev: f64) -> Result<Self, ConfigError> {
        let normal = rand_distr::Normal::new(mean, std_dev).map_err(|e| {
            ConfigError::InvalidParameters {
                distribution: "normal",
                reason: e.to_string(),
            }
        })?;
        if !mean.is_finite() {
            return Err(ConfigError::InvalidParameters {
                distribution: "normal",
                reason: format!("mean must be finite, got {}", mean),
            });
        }
        Ok(Distribution::Normal {
            mean,
            std_dev,
            normal,
        })
    }

    pub fn tabular(x: Vec<f64>, p: Vec<f64>, interpolation: Interpolation) -> Result<Self, ConfigError> {
        Ok(Distribution::Tabular(Tabular::new(x, p, interpolation)?))
    }
}

impl ScalarDistribution for Distribution {
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        match self {
            Distribution::Discrete(d) => d.sample(rng),
            Distribution::Uniform { a, b } => a + rng.gen::<f64>() * (b - a),
            Distribution::PowerLaw { a, b, n } => {
                let np1 = n + 1.0;
                let offset = a.powf(np1);
                let span = b.powf(np1) - offset;
                (offset + rng.gen::<f64>() * span).powf(1.0 / np1)
            }
            Distribution::Maxwell { theta } => maxwell_spectrum(*theta, rng),
            Distribution::Watt { a, b } => {
                let w = maxwell_spectrum(*a, rng);
                w + 0.25 * a * a * b + (2.0 * rng.gen::<f64>() - 1.0) * (a * a * b * w).sqrt()
            }
            Distribution::Normal { normal, .. } => normal.sample(rng),
            Distribution::Tabular(t) => t.sample(rng),
        }
    }
}

fn maxwell_spectrum(theta: f64, rng: &mut dyn RngCore) -> f64 {
    let r1: f64 = rng.gen();
    let r2: f64 = rng.gen();
    let r3: f64 = rng.gen();
    let c = (0.5 * PI * r3).cos();
    -theta * ((1.0 - r1).ln() + (1.0 - r2).ln() * c * c)
}

fn split_xp(distribution: &'static str, params: &[f64]) -> Result<(Vec<f64>, Vec<f64>), ConfigError> {
    if params.is_empty() || params.len() % 2 != 0 {
        return Err(ConfigError::InvalidParameters {
            distribution,
            reason: format!(
                "expected an even number of parameters (x values then p values), got {}",
                params.len()
            ),
        });
    }
    let (x, p) = params.split_at(params.len() / 2);
    Ok((x.to_vec(), p.to_vec()))
}

fn expect_count(distribution: &'static str, params: &[f64], n: usize) -> Result<(), ConfigError> {
    if params.len() != n {
        return Err(ConfigError::InvalidParameters {
            distribution,
            reason: format!("expected {} parameters, got {}", n, params.len()),
        });
    }
    Ok(())
}

/// Build a scalar distribution from a configuration node.
///
/// The node carries a `type` and a flat `parameters` array:
///
/// | type | parameters |
/// |---|---|
/// | `discrete` | x values followed by their probabilities |
/// | `uniform` | a, b |
/// | `powerlaw` | a, b, n |
/// | `maxwell` | theta |
/// | `watt` | a, b |
/// | `normal` | mean, standard deviation |
/// | `tabular` | x values followed by densities; optional `interpolation` |
pub fn distribution_from_json(node: &Value) -> Result<Box<dyn ScalarDistribution>, ConfigError> {
    let kind = get_node_value(node, "type")?;
    let params = get_node_array(node, "parameters")?;

    let dist = match kind.as_str() {
        "discrete" => {
            let (x, p) = split_xp("discrete", &params)?;
            Distribution::discrete(x, p)?
        }
        "uniform" => {
            expect_count("uniform", &params, 2)?;
            Distribution::uniform(params[0], params[1])?
        }
        "powerlaw" | "power_law" => {
            expect_count("power law", &params, 3)?;
            Distribution::power_law(params[0], params[1], params[2])?
        }
        "maxwell" => {
            expect_count("maxwell", &params, 1)?;
            Distribution::maxwell(params[0])?
        }
        "watt" => {
            expect_count("watt", &params, 2)?;
            Distribution::watt(params[0], params[1])?
        }
        "normal" => {
            expect_count("normal", &params, 2)?;
            Distribution::normal(params[0], params[1])?
        }
        "tabular" => {
            let interpolation = if check_for_node(node, "interpolation") {
                match get_node_value(node, "interpolation")?.as_str() {
                    "histogram" => Interpolation::Histogram,
                    "linear-linear" => Interpolation::LinearLinear,
                    other => {
                        return Err(ConfigError::UnknownType {
                            kind: "interpolation",
                            name: other.to_string(),
                        })
                    }
                }
            } else {
                Interpolation::Histogram
            };
            let (x, p) = split_xp("tabular", &params)?;
            Distribution::tabular(x, p, interpolation)?
        }
        other => {
            return Err(ConfigError::UnknownType {
                kind: "distribution",
                name: other.to_string(),
            })
        }
    };

    Ok(Box::new(dist))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random_lcg::FastRng;
    use approx::assert_abs_diff_eq;
    use serde_json::json;

    fn mean_of(dist: &dyn ScalarDistribution, n: usize, seed: u64) -> f64 {
        let mut rng = FastRng::new(seed);
        (0..n).map(|_| dist.sample(&mut rng)).sum::<f64>() / n as f64
    }

    #[test]
    fn test_uniform_support_and_mean() {
        let dist = Distribution::uniform(-1.0, 1.0).unwrap();
        let mut rng = FastRng::new(11);
        for _ in 0..10000 {
            let x = dist.sample(&mut rng);
            assert!((-1.0..1.0).contains(&x));
        }
        assert_abs_diff_eq!(mean_of(&dist, 100_000, 3), 0.0, epsilon = 0.01);
    }

    #[test]
    fn test_uniform_consumes_one_variate() {
        let dist = Distribution::uniform(0.0, 2.0 * PI).unwrap();
        let mut rng = FastRng::new(5);
        let mut reference = FastRng::new(5);
        let phi = dist.sample(&mut rng);
        assert_eq!(phi, 2.0 * PI * reference.gen::<f64>());
        assert_eq!(rng, reference);
    }

    #[test]
    fn test_uniform_rejects_reversed_bounds() {
        assert!(Distribution::uniform(1.0, -1.0).is_err());
        assert!(Distribution::uniform(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_discrete_single_point() {
        let dist = Distribution::discrete(vec![1.0], vec![3.0]).unwrap();
        let mut rng = FastRng::new(9);
        for _ in 0..100 {
            assert_eq!(dist.sample(&mut rng), 1.0);
        }
    }

    #[test]
    fn test_discrete_frequencies() {
        let dist = Distribution::discrete(vec![-1.0, 0.0, 1.0], vec![1.0, 2.0, 1.0]).unwrap();
        if let Distribution::Discrete(d) = &dist {
            assert_eq!(d.p(), &[0.25, 0.5, 0.25]);
        }
        let mut rng = FastRng::new(21);
        let n = 100_000;
        let zeros = (0..n).filter(|_| dist.sample(&mut rng) == 0.0).count();
        assert_abs_diff_eq!(zeros as f64 / n as f64, 0.5, epsilon = 0.01);
    }

    #[test]
    fn test_discrete_validation() {
        assert!(Distribution::discrete(vec![], vec![]).is_err());
        assert!(Distribution::discrete(vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(Distribution::discrete(vec![1.0], vec![-1.0]).is_err());
        assert!(Distribution::discrete(vec![1.0, 2.0], vec![0.0, 0.0]).is_err());
        assert!(Distribution::discrete(vec![f64::NAN], vec![1.0]).is_err());
        assert!(Distribution::discrete(vec![0.5, f64::INFINITY], vec![1.0, 1.0]).is_err());

        let nan_value = json!({"type": "discrete", "parameters": "nan 1"});
        assert!(matches!(
            distribution_from_json(&nan_value),
            Err(ConfigError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_power_law_support() {
        let dist = Distribution::power_law(0.0, 1.0, 2.0).unwrap();
        let mut rng = FastRng::new(4);
        for _ in 0..10000 {
            let x = dist.sample(&mut rng);
            assert!((0.0..=1.0).contains(&x));
        }
        // E[x] for pdf 3x^2 on [0, 1] is 3/4
        assert_abs_diff_eq!(mean_of(&dist, 100_000, 8), 0.75, epsilon = 0.01);
        assert!(Distribution::power_law(0.0, 1.0, -1.0).is_err());
        assert!(Distribution::power_law(1.0, 0.0, 2.0).is_err());
    }

    #[test]
    fn test_power_law_divergent_at_zero() {
        assert!(Distribution::power_law(0.0, 1.0, -2.0).is_err());
        assert!(Distribution::power_law(0.0, 1.0, -1.5).is_err());
        let node = json!({"type": "powerlaw", "parameters": [0.0, 1.0, -2.0]});
        assert!(matches!(
            distribution_from_json(&node),
            Err(ConfigError::InvalidParameters { .. })
        ));

        // integrable once the support is bounded away from zero
        let dist = Distribution::power_law(0.5, 1.0, -2.0).unwrap();
        let mut rng = FastRng::new(31);
        for _ in 0..10000 {
            let x = dist.sample(&mut rng);
            assert!(x.is_finite() && (0.5..=1.0).contains(&x), "{}", x);
        }
        // between -1 and 0 the density is integrable at zero
        let dist = Distribution::power_law(0.0, 1.0, -0.5).unwrap();
        for _ in 0..10000 {
            assert!(dist.sample(&mut rng).is_finite());
        }
    }

    #[test]
    fn test_maxwell_and_watt_positive() {
        let maxwell = Distribution::maxwell(1.2895e6).unwrap();
        let watt = Distribution::watt(0.988e6, 2.249e-6).unwrap();
        let mut rng = FastRng::new(17);
        for _ in 0..10000 {
            assert!(maxwell.sample(&mut rng) >= 0.0);
            assert!(watt.sample(&mut rng) > -1e-3);
        }
        // Maxwellian mean energy is 3/2 theta
        assert_abs_diff_eq!(mean_of(&maxwell, 200_000, 2) / 1.2895e6, 1.5, epsilon = 0.02);
        assert!(Distribution::maxwell(0.0).is_err());
    }

    #[test]
    fn test_normal() {
        let dist = Distribution::normal(0.5, 0.1).unwrap();
        assert_abs_diff_eq!(mean_of(&dist, 100_000, 6), 0.5, epsilon = 0.005);
        assert!(Distribution::normal(0.0, -1.0).is_err());
    }

    #[test]
    fn test_tabular_histogram_uniform() {
        let dist = Distribution::tabular(vec![-1.0, 0.0, 1.0], vec![1.0, 1.0, 0.0], Interpolation::Histogram)
            .unwrap();
        let mut rng = FastRng::new(12);
        for _ in 0..10000 {
            let x = dist.sample(&mut rng);
            assert!((-1.0..=1.0).contains(&x));
        }
        assert_abs_diff_eq!(mean_of(&dist, 100_000, 1), 0.0, epsilon = 0.01);
    }

    #[test]
    fn test_tabular_linear_linear_ramp() {
        // p(x) = x on [0, 1] -> mean 2/3
        let dist = Distribution::tabular(vec![0.0, 1.0], vec![0.0, 1.0], Interpolation::LinearLinear)
            .unwrap();
        if let Distribution::Tabular(t) = &dist {
            assert_eq!(t.p(), &[0.0, 2.0]);
            assert_eq!(t.interpolation(), Interpolation::LinearLinear);
        }
        let mut rng = FastRng::new(13);
        for _ in 0..10000 {
            let x = dist.sample(&mut rng);
            assert!((0.0..=1.0).contains(&x));
        }
        assert_abs_diff_eq!(mean_of(&dist, 100_000, 14), 2.0 / 3.0, epsilon = 0.01);
    }

    #[test]
    fn test_tabular_validation() {
        assert!(Distribution::tabular(vec![0.0], vec![1.0], Interpolation::Histogram).is_err());
        assert!(Distribution::tabular(vec![1.0, 0.0], vec![1.0, 1.0], Interpolation::Histogram).is_err());
        assert!(Distribution::tabular(vec![0.0, 1.0], vec![0.0, 0.0], Interpolation::LinearLinear).is_err());
        assert!(Distribution::tabular(vec![0.0, f64::INFINITY], vec![1.0, 1.0], Interpolation::Histogram).is_err());
    }

    #[test]
    fn test_from_json_uniform() {
        let node = json!({"type": "uniform", "parameters": [0.0, 6.283185307179586]});
        let dist = distribution_from_json(&node).unwrap();
        let mut rng = FastRng::new(1);
        let x = dist.sample(&mut rng);
        assert!((0.0..2.0 * PI).contains(&x));
    }

    #[test]
    fn test_from_json_discrete_and_tabular() {
        let discrete = json!({"type": "discrete", "parameters": [1.0, 1.0]});
        let dist = distribution_from_json(&discrete).unwrap();
        assert_eq!(dist.sample(&mut FastRng::new(1)), 1.0);

        let tabular = json!({
            "type": "tabular",
            "parameters": "0 1 0 1",
            "interpolation": "linear-linear"
        });
        assert!(distribution_from_json(&tabular).is_ok());
    }

    #[test]
    fn test_from_json_errors() {
        let unknown = json!({"type": "cauchy", "parameters": [0.0, 1.0]});
        assert!(matches!(
            distribution_from_json(&unknown),
            Err(ConfigError::UnknownType { .. })
        ));

        let bad_count = json!({"type": "uniform", "parameters": [0.0]});
        assert!(matches!(
            distribution_from_json(&bad_count),
            Err(ConfigError::InvalidParameters { .. })
        ));

        let odd = json!({"type": "discrete", "parameters": [0.0, 1.0, 0.5]});
        assert!(matches!(
            distribution_from_json(&odd),
            Err(ConfigError::InvalidParameters { .. })
        ));

        let bad_interp = json!({"type": "tabular", "parameters": [0.0, 1.0, 1.0, 1.0], "interpolation": "log-log"});
        assert!(matches!(
            distribution_from_json(&bad_interp),
            Err(ConfigError::UnknownType { .. })
        ));

        let missing = json!({"parameters": [0.0, 1.0]});
        assert!(matches!(
            distribution_from_json(&missing),
            Err(ConfigError::MissingNode(_))
        ));
    }
}
