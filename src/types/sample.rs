//! Build-up samples and the plotting coordinates derived from them

use serde::{Deserialize, Serialize};

/// One bottom-hole pressure reading taken during shut-in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Shut-in time (hours), `>= 0`
    pub time: f64,
    /// Bottom-hole pressure (psi)
    pub pressure: f64,
}

impl Sample {
    pub const fn new(time: f64, pressure: f64) -> Self {
        Self { time, pressure }
    }
}

impl From<(f64, f64)> for Sample {
    fn from((time, pressure): (f64, f64)) -> Self {
        Self { time, pressure }
    }
}

/// A sample placed on the Horner plot
///
/// `index` is the position of the originating sample in the series, kept so
/// that per-sample quantities (e.g. the derivative) can be looked up without
/// re-matching on the pressure value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HornerPoint {
    /// Index of the originating sample in the pressure series
    pub index: usize,
    /// Horner time ratio `(tp + Δt) / Δt`, always `> 1`
    pub horner_ratio: f64,
    /// Shut-in pressure at that sample (psi)
    pub pressure: f64,
}

impl HornerPoint {
    /// Squared Euclidean distance to a clicked coordinate in (ratio, pressure) space.
    pub fn distance_squared(&self, x: f64, y: f64) -> f64 {
        let dx = self.horner_ratio - x;
        let dy = self.pressure - y;
        dx * dx + dy * dy
    }
}

/// One point of the `d(ΔP)/d(ln t)` diagnostic curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivativePoint {
    /// Time the value is plotted against (hours)
    pub time: f64,
    /// Derivative value (psi)
    pub value: f64,
}
