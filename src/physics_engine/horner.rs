//! Horner time transform
//!
//! Horner ratio: `(tp + Δt) / Δt`, where `tp` is the producing time before
//! shut-in. Undefined at `Δt = 0`, so the shut-in reference sample (index 0)
//! and any later zero-time sample are dropped.

use super::{AnalysisError, PressureSeries, Result};
use crate::types::HornerPoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HornerTransform {
    producing_time: f64,
}

impl HornerTransform {
    /// `producing_time` is `tp` in hours; must be finite and positive.
    pub fn new(producing_time: f64) -> Result<Self> {
        if !producing_time.is_finite() || producing_time <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "producing time tp must be positive, got {producing_time}"
            )));
        }
        Ok(Self { producing_time })
    }

    /// Horner ratio for a shut-in time; `None` at `Δt = 0`.
    pub fn ratio(&self, shut_in_time: f64) -> Option<f64> {
        (shut_in_time != 0.0).then(|| (self.producing_time + shut_in_time) / shut_in_time)
    }

    /// Horner points for every sample after the first with non-zero time.
    ///
    /// A shut-in time so small that the ratio overflows is `InvalidInput`.
    pub fn transform(&self, series: &PressureSeries) -> Result<Vec<HornerPoint>> {
        let mut points = Vec::with_capacity(series.len().saturating_sub(1));
        for (index, s) in series.samples().iter().enumerate().skip(1) {
            let Some(horner_ratio) = self.ratio(s.time) else {
                continue;
            };
            if !horner_ratio.is_finite() {
                return Err(AnalysisError::InvalidInput(format!(
                    "sample {index}: shut-in time {} is too small for a finite Horner ratio",
                    s.time
                )));
            }
            points.push(HornerPoint {
                index,
                horner_ratio,
                pressure: s.pressure,
            });
        }
        Ok(points)
    }
}
