//! Recorded build-up pressure series

use super::{AnalysisError, Result};
use crate::types::Sample;

/// Minimum sample count: the centered derivative needs a 3-sample window.
pub const MIN_SAMPLES: usize = 3;

/// Ordered, immutable build-up samples
///
/// Sample order is taken as recorded. Time is expected to be ascending; that
/// is the caller's contract and is not corrected here.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureSeries {
    samples: Vec<Sample>,
}

impl PressureSeries {
    /// Validate and take ownership of the samples.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        if samples.len() < MIN_SAMPLES {
            return Err(AnalysisError::InvalidInput(format!(
                "need at least {MIN_SAMPLES} samples, got {}",
                samples.len()
            )));
        }

        for (i, s) in samples.iter().enumerate() {
            if !s.time.is_finite() || !s.pressure.is_finite() {
                return Err(AnalysisError::InvalidInput(format!(
                    "sample {i} is not finite (time={}, pressure={})",
                    s.time, s.pressure
                )));
            }
            if s.time < 0.0 {
                return Err(AnalysisError::InvalidInput(format!(
                    "sample {i} has negative time {}",
                    s.time
                )));
            }
        }

        Ok(Self { samples })
    }

    /// Build from `(time, pressure)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        Self::new(pairs.iter().copied().map(Sample::from).collect())
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; construction rejects short series.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    pub fn pressures(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.pressure)
    }

    /// `Ph0`: pressure of the first sample, the shut-in reference.
    pub fn initial_pressure(&self) -> f64 {
        self.samples[0].pressure
    }

    /// `pressure[i] - pressure[0]` for every sample.
    pub fn delta_pressure(&self) -> Vec<f64> {
        let p0 = self.initial_pressure();
        self.pressures().map(|p| p - p0).collect()
    }
}
