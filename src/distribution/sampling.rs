// src/distribution/sampling.rs

use rand::prelude::*;
use rand_distr::{Distribution, LogNormal, Normal as RandNormal, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Attempts before a rejection-sampled draw gives up and clamps.
const REDRAW_ATTEMPTS: usize = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum DistributionType {
    Normal,
    Uniform,
    Triangular,
    LogNormal,
}

impl Default for DistributionType {
    fn default() -> Self {
        DistributionType::Normal // Most common distribution type as default
    }
}

/// How out-of-range draws are forced back inside the bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum BoundMethod {
    /// Clamp the draw to the nearest bound.
    Clip,
    /// Re-draw until the value falls inside the bounds (capped, then clamps).
    Redraw,
}

impl std::fmt::Display for BoundMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundMethod::Clip => write!(f, "clip"),
            BoundMethod::Redraw => write!(f, "redraw"),
        }
    }
}

/// Sampling specification for a distribution parameter: which family to
/// draw from, how many samples, optional bounds, and an optional seed for
/// reproducible runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleSpec {
    pub dist_type: DistributionType,
    pub mean: f64,
    pub std_dev: f64, // Used for Normal, LogNormal
    pub min: f64,     // Used for Uniform, Triangular
    pub max: f64,     // Used for Uniform, Triangular
    pub mode: Option<f64>, // Used for Triangular
    pub size: usize,
    pub bounds: Option<(f64, f64)>,
    pub bound_method: Option<BoundMethod>,
    pub seed: Option<u64>,
}

impl SampleSpec {
    pub fn new_normal(mean: f64, std_dev: f64, size: usize) -> Self {
        Self {
            dist_type: DistributionType::Normal,
            mean,
            std_dev,
            min: 0.0,
            max: 0.0,
            mode: None,
            size,
            bounds: None,
            bound_method: None,
            seed: None,
        }
    }

    pub fn new_uniform(min: f64, max: f64, size: usize) -> Self {
        Self {
            dist_type: DistributionType::Uniform,
            mean: 0.0,
            std_dev: 0.0,
            min,
            max,
            mode: None,
            size,
            bounds: None,
            bound_method: None,
            seed: None,
        }
    }

    pub fn new_triangular(min: f64, max: f64, mode: f64, size: usize) -> Self {
        Self {
            dist_type: DistributionType::Triangular,
            mean: 0.0,
            std_dev: 0.0,
            min,
            max,
            mode: Some(mode),
            size,
            bounds: None,
            bound_method: None,
            seed: None,
        }
    }

    pub fn new_lognormal(mean: f64, std_dev: f64, size: usize) -> Self {
        Self {
            dist_type: DistributionType::LogNormal,
            mean,
            std_dev,
            min: 0.0,
            max: 0.0,
            mode: None,
            size,
            bounds: None,
            bound_method: None,
            seed: None,
        }
    }

    pub fn with_bounds(mut self, min: f64, max: f64, method: BoundMethod) -> Self {
        self.bounds = Some((min, max));
        self.bound_method = Some(method);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Draw the full sample array this spec describes.
    pub fn draw_samples(&self) -> Result<Vec<f64>> {
        let mut rng = if let Some(seed) = self.seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        let mut samples = Vec::with_capacity(self.size);
        for _ in 0..self.size {
            samples.push(self.draw_bounded(&mut rng)?);
        }
        Ok(samples)
    }

    fn draw_bounded(&self, rng: &mut StdRng) -> Result<f64> {
        let value = self.sample_value(rng)?;
        let (lo, hi) = match self.bounds {
            Some(bounds) => bounds,
            None => return Ok(value),
        };

        match self.bound_method.unwrap_or(BoundMethod::Clip) {
            BoundMethod::Clip => Ok(value.clamp(lo, hi)),
            BoundMethod::Redraw => {
                let mut value = value;
                for _ in 0..REDRAW_ATTEMPTS {
                    if value >= lo && value <= hi {
                        return Ok(value);
                    }
                    value = self.sample_value(rng)?;
                }
                Ok(value.clamp(lo, hi))
            }
        }
    }

    fn sample_value(&self, rng: &mut StdRng) -> Result<f64> {
        match self.dist_type {
            DistributionType::Normal => {
                let normal = RandNormal::new(self.mean, self.std_dev)
                    .map_err(|e| Error::InvalidSpec { reason: e.to_string() })?;
                Ok(normal.sample(rng))
            }
            DistributionType::Uniform => {
                if !(self.min < self.max) {
                    return Err(Error::InvalidSpec {
                        reason: format!("uniform min ({}) must be below max ({})", self.min, self.max),
                    });
                }
                Ok(Uniform::new(self.min, self.max).sample(rng))
            }
            DistributionType::Triangular => Ok(Self::sample_triangular(
                self.min,
                self.max,
                self.mode.unwrap_or((self.min + self.max) / 2.0),
                rng,
            )),
            DistributionType::LogNormal => {
                if self.mean <= 0.0 {
                    return Err(Error::InvalidSpec {
                        reason: format!("lognormal mean ({}) must be positive", self.mean),
                    });
                }
                let lognormal = LogNormal::new(self.mean.ln(), self.std_dev)
                    .map_err(|e| Error::InvalidSpec { reason: e.to_string() })?;
                Ok(lognormal.sample(rng))
            }
        }
    }

    fn sample_triangular(min: f64, max: f64, mode: f64, rng: &mut StdRng) -> f64 {
        let u: f64 = rng.gen();

        // Ensure mode is between min and max
        let safe_mode = mode.max(min).min(max);

        // Cumulative probability at the mode
        let f_c = (safe_mode - min) / (max - min);

        if u < f_c {
            min + ((u * (safe_mode - min) * (max - min)).sqrt())
        } else {
            max - (((1.0 - u) * (max - safe_mode) * (max - min)).sqrt())
        }
    }
}

impl std::fmt::Display for SampleSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.dist_type {
            DistributionType::Normal => {
                write!(f, "normal(mean={}, std_dev={})", self.mean, self.std_dev)
            }
            DistributionType::Uniform => write!(f, "uniform(min={}, max={})", self.min, self.max),
            DistributionType::Triangular => write!(
                f,
                "triangular(min={}, max={}, mode={})",
                self.min,
                self.max,
                self.mode.unwrap_or((self.min + self.max) / 2.0)
            ),
            DistributionType::LogNormal => {
                write!(f, "lognormal(mean={}, std_dev={})", self.mean, self.std_dev)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_draws_are_reproducible() {
        let spec = SampleSpec::new_normal(10.0, 2.0, 500).with_seed(42);
        let a = spec.draw_samples().unwrap();
        let b = spec.draw_samples().unwrap();
        assert_eq!(a.len(), 500);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = SampleSpec::new_normal(10.0, 2.0, 100)
            .with_seed(1)
            .draw_samples()
            .unwrap();
        let b = SampleSpec::new_normal(10.0, 2.0, 100)
            .with_seed(2)
            .draw_samples()
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn clip_bounds_keep_draws_in_range() {
        let spec = SampleSpec::new_normal(0.0, 5.0, 1000)
            .with_bounds(-1.0, 1.0, BoundMethod::Clip)
            .with_seed(7);
        let samples = spec.draw_samples().unwrap();
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn redraw_bounds_keep_draws_in_range() {
        let spec = SampleSpec::new_uniform(0.0, 10.0, 1000)
            .with_bounds(2.0, 8.0, BoundMethod::Redraw)
            .with_seed(7);
        let samples = spec.draw_samples().unwrap();
        assert!(samples.iter().all(|s| (2.0..=8.0).contains(s)));
    }

    #[test]
    fn uniform_draws_stay_inside_support() {
        let spec = SampleSpec::new_uniform(3.0, 4.0, 200).with_seed(11);
        let samples = spec.draw_samples().unwrap();
        assert!(samples.iter().all(|s| *s >= 3.0 && *s < 4.0));
    }

    #[test]
    fn triangular_draws_stay_inside_support() {
        let spec = SampleSpec::new_triangular(0.0, 1.0, 0.25, 200).with_seed(11);
        let samples = spec.draw_samples().unwrap();
        assert!(samples.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn invalid_uniform_support_is_rejected() {
        let spec = SampleSpec::new_uniform(5.0, 5.0, 10);
        assert!(matches!(
            spec.draw_samples(),
            Err(Error::InvalidSpec { .. })
        ));
    }

    #[test]
    fn invalid_lognormal_mean_is_rejected() {
        let spec = SampleSpec::new_lognormal(-1.0, 0.5, 10);
        assert!(matches!(
            spec.draw_samples(),
            Err(Error::InvalidSpec { .. })
        ));
    }
}
