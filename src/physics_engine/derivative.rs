//! Pressure-derivative diagnostic
//!
//! Centered semilog derivative over a three-sample window:
//!
//! ```text
//! d[i] = t[i+1] × (p[i+2] − p[i]) / (t[i+2] − t[i])      i = 0 .. n-3
//! ```
//!
//! The curve has `n − 2` points and is plotted against `t[0 .. n-3]`.

use super::{AnalysisError, PressureSeries, Result};
use crate::types::{DerivativePoint, PlotPoint};

/// Derivative calculator borrowing a pressure series
#[derive(Debug, Clone, Copy)]
pub struct DerivativeEngine<'a> {
    series: &'a PressureSeries,
}

impl<'a> DerivativeEngine<'a> {
    pub const fn new(series: &'a PressureSeries) -> Self {
        Self { series }
    }

    /// Derivative for the window starting at `i`.
    fn window(&self, i: usize) -> Result<f64> {
        let s = self.series.samples();
        let dt = s[i + 2].time - s[i].time;
        if dt == 0.0 {
            return Err(AnalysisError::DegenerateInput {
                index: i,
                reason: format!(
                    "samples {} and {} share timestamp {}",
                    i,
                    i + 2,
                    s[i].time
                ),
            });
        }
        Ok(s[i + 1].time * (s[i + 2].pressure - s[i].pressure) / dt)
    }

    /// Raw derivative values, index-aligned with the first `n − 2` samples.
    pub fn values(&self) -> Result<Vec<f64>> {
        (0..self.series.len() - 2).map(|i| self.window(i)).collect()
    }

    /// Full diagnostic curve.
    pub fn derivative(&self) -> Result<Vec<DerivativePoint>> {
        let values = self.values()?;
        Ok(self
            .series
            .times()
            .zip(values)
            .map(|(time, value)| DerivativePoint { time, value })
            .collect())
    }

    /// ΔP against time, the companion curve on the log-log plot.
    pub fn delta_pressure_curve(&self) -> Vec<PlotPoint> {
        self.series
            .times()
            .zip(self.series.delta_pressure())
            .map(|(t, dp)| PlotPoint::new(t, dp))
            .collect()
    }

    /// Derivative at sample `index`, or `None` for the last two samples.
    pub fn value_at(&self, index: usize) -> Result<Option<f64>> {
        if index + 2 >= self.series.len() {
            return Ok(None);
        }
        self.window(index).map(Some)
    }

    /// Derivative values at every sample whose pressure equals `y0` or `y1` exactly.
    ///
    /// Exact float equality: values taken straight from the series match,
    /// anything computed or typed in usually will not. Unmatched targets are
    /// absent from the result.
    #[allow(clippy::float_cmp)]
    pub fn matched_values(&self, y0: f64, y1: f64) -> Result<Vec<f64>> {
        let values = self.values()?;
        let mut matched = Vec::new();
        for (p, d) in self.series.pressures().zip(values) {
            if p == y0 {
                matched.push(d);
            }
            if p == y1 {
                matched.push(d);
            }
        }
        Ok(matched)
    }
}
