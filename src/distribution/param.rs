// src/distribution/param.rs

use serde::{Deserialize, Serialize};

use crate::distribution::sampling::SampleSpec;
use crate::error::{Error, Result};

/// Segment used when a distribution is not tied to a specific cohort.
pub const DEFAULT_SEGMENT: &str = "default segment";

/// Percentile levels reported alongside every sample array.
pub const PERCENTILE_LEVELS: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

/// A named, sampled random-variable specification plus its materialized
/// samples and summary statistics. Registered under a business lever and a
/// customer segment; composed element-wise with other parameters to derive
/// new quantities.
///
/// The four `samples_*` statistics always describe the current `samples`
/// array — every operation that replaces the samples calls
/// [`DistParam::update_diststats`] before the value is visible anywhere.
/// Once a parameter has been captured into a business case, its `spec` is
/// cleared: a derived distribution is a fixed realized outcome, not a
/// re-drawable generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistParam {
    pub name: String,
    pub lever: String,
    pub segment: String,
    pub spec: Option<SampleSpec>,
    pub samples: Vec<f64>,
    pub samples_mean: f64,
    pub samples_median: f64,
    pub samples_std: f64,
    pub samples_percentiles: Vec<f64>,
}

impl DistParam {
    /// Column order of [`DistParam::to_record`], one entry per attribute.
    pub const COLUMNS: [&'static str; 13] = [
        "name",
        "lever",
        "segment",
        "distribution",
        "size",
        "bounds",
        "bound_method",
        "seed",
        "samples",
        "samples_mean",
        "samples_median",
        "samples_std",
        "samples_percentiles",
    ];

    /// A parameter under the default segment. Samples are not drawn until
    /// [`DistParam::sample`] is called.
    pub fn new(name: impl Into<String>, lever: impl Into<String>, spec: SampleSpec) -> Self {
        Self {
            name: name.into(),
            lever: lever.into(),
            segment: DEFAULT_SEGMENT.to_string(),
            spec: Some(spec),
            samples: Vec::new(),
            samples_mean: 0.0,
            samples_median: 0.0,
            samples_std: 0.0,
            samples_percentiles: Vec::new(),
        }
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = segment.into();
        self
    }

    /// A parameter built directly from an already-materialized sample array.
    pub fn from_samples(
        name: impl Into<String>,
        lever: impl Into<String>,
        segment: impl Into<String>,
        samples: Vec<f64>,
    ) -> Self {
        let mut param = Self {
            name: name.into(),
            lever: lever.into(),
            segment: segment.into(),
            spec: None,
            samples,
            samples_mean: 0.0,
            samples_median: 0.0,
            samples_std: 0.0,
            samples_percentiles: Vec::new(),
        };
        param.update_diststats();
        param
    }

    /// A scalar wrapped in the parameter record, for the `*k` operator.
    /// Carries a single-element sample array holding the constant.
    pub fn constant(
        name: impl Into<String>,
        lever: impl Into<String>,
        segment: impl Into<String>,
        value: f64,
    ) -> Self {
        Self::from_samples(name, lever, segment, vec![value])
    }

    /// Materialize `samples` from the sampling spec and refresh statistics.
    pub fn sample(&mut self) -> Result<()> {
        let spec = self.spec.as_ref().ok_or_else(|| Error::InvalidSpec {
            reason: format!("distribution '{}' has no sampling spec to draw from", self.name),
        })?;
        self.samples = spec.draw_samples()?;
        self.update_diststats();
        Ok(())
    }

    /// Convenience: build and immediately materialize.
    pub fn sampled(
        name: impl Into<String>,
        lever: impl Into<String>,
        spec: SampleSpec,
    ) -> Result<Self> {
        let mut param = Self::new(name, lever, spec);
        param.sample()?;
        Ok(param)
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Drop the sampling-only metadata. Called once a parameter becomes a
    /// derived case entry.
    pub fn clear_spec(&mut self) {
        self.spec = None;
    }

    /// Recompute mean, median, std, and percentiles from the current
    /// sample array.
    pub fn update_diststats(&mut self) {
        let n = self.samples.len();
        if n == 0 {
            self.samples_mean = 0.0;
            self.samples_median = 0.0;
            self.samples_std = 0.0;
            self.samples_percentiles = Vec::new();
            return;
        }

        let mean = self.samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            self.samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        let percentiles = PERCENTILE_LEVELS
            .iter()
            .map(|p| {
                let index = ((p / 100.0) * (n - 1) as f64).round() as usize;
                sorted[index.min(n - 1)]
            })
            .collect();

        self.samples_mean = mean;
        self.samples_median = median;
        self.samples_std = variance.sqrt();
        self.samples_percentiles = percentiles;
    }

    /// Element-wise product of paired samples.
    pub fn chain_mult(&self, other: &DistParam) -> Result<DistParam> {
        self.chain_with(other, |a, b| a * b)
    }

    /// Element-wise quotient of paired samples.
    pub fn chain_divide(&self, other: &DistParam) -> Result<DistParam> {
        self.chain_with(other, |a, b| a / b)
    }

    /// Element-wise sum of paired samples.
    pub fn chain_add(&self, other: &DistParam) -> Result<DistParam> {
        self.chain_with(other, |a, b| a + b)
    }

    /// Element-wise difference of paired samples.
    pub fn chain_sub(&self, other: &DistParam) -> Result<DistParam> {
        self.chain_with(other, |a, b| a - b)
    }

    /// Multiply every sample by the scalar carried by a constant wrapper
    /// (see [`DistParam::constant`]). Unlike `chain_mult`, the other
    /// operand is a fixed constant, not a paired sample array.
    pub fn mult_const(&self, other: &DistParam) -> Result<DistParam> {
        let k = other.samples.first().copied().ok_or(Error::ShapeMismatch {
            left: self.samples.len(),
            right: 0,
        })?;
        let samples = self.samples.iter().map(|a| a * k).collect();
        Ok(DistParam::from_samples(
            self.name.clone(),
            self.lever.clone(),
            self.segment.clone(),
            samples,
        ))
    }

    fn chain_with(&self, other: &DistParam, op: impl Fn(f64, f64) -> f64) -> Result<DistParam> {
        if self.samples.len() != other.samples.len() {
            return Err(Error::ShapeMismatch {
                left: self.samples.len(),
                right: other.samples.len(),
            });
        }
        let samples = self
            .samples
            .iter()
            .zip(other.samples.iter())
            .map(|(a, b)| op(*a, *b))
            .collect();
        Ok(DistParam::from_samples(
            self.name.clone(),
            self.lever.clone(),
            self.segment.clone(),
            samples,
        ))
    }

    /// Flatten to the ordered field -> value row used by the assumption
    /// report. Cleared or absent fields render as empty cells; sample
    /// arrays render as JSON.
    pub fn to_record(&self) -> Vec<(&'static str, String)> {
        let (distribution, size, bounds, bound_method, seed) = match &self.spec {
            Some(spec) => (
                spec.to_string(),
                spec.size.to_string(),
                spec.bounds
                    .map(|(lo, hi)| format!("[{}, {}]", lo, hi))
                    .unwrap_or_default(),
                spec.bound_method.map(|m| m.to_string()).unwrap_or_default(),
                spec.seed.map(|s| s.to_string()).unwrap_or_default(),
            ),
            None => Default::default(),
        };

        vec![
            ("name", self.name.clone()),
            ("lever", self.lever.clone()),
            ("segment", self.segment.clone()),
            ("distribution", distribution),
            ("size", size),
            ("bounds", bounds),
            ("bound_method", bound_method),
            ("seed", seed),
            (
                "samples",
                serde_json::to_string(&self.samples).unwrap_or_default(),
            ),
            ("samples_mean", self.samples_mean.to_string()),
            ("samples_median", self.samples_median.to_string()),
            ("samples_std", self.samples_std.to_string()),
            (
                "samples_percentiles",
                serde_json::to_string(&self.samples_percentiles).unwrap_or_default(),
            ),
        ]
    }
}
