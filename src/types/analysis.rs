//! Fit and reservoir-parameter result types

use serde::{Deserialize, Serialize};

use super::HornerPoint;

/// Semilog straight line `pressure = slope * ln(ratio) + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// psi per natural-log cycle of Horner ratio
    pub slope: f64,
    /// Pressure at `ratio == 1` (psi)
    pub intercept: f64,
}

impl FitResult {
    /// Evaluate the fitted line at a Horner ratio.
    pub fn evaluate(&self, horner_ratio: f64) -> f64 {
        self.intercept + self.slope * horner_ratio.ln()
    }
}

/// Reservoir parameters derived from a Horner fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReservoirParameters {
    /// Permeability (mD)
    pub permeability: f64,
    /// Skin factor (dimensionless)
    pub skin: f64,
    /// Pressure extrapolated to one hour on the Horner scale (psi)
    pub p1hr: f64,
}

impl ReservoirParameters {
    /// Two-line summary shown next to the Horner plot.
    pub fn summary_text(&self) -> String {
        format!(
            "Permeability (k): {:.4} mD\nSkin factor (s): {:.4}",
            self.permeability, self.skin
        )
    }
}

/// Outcome of a completed two-point selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Picked points in click order
    pub picks: [HornerPoint; 2],
    pub fit: FitResult,
    pub parameters: ReservoirParameters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_at_unit_ratio_is_intercept() {
        let fit = FitResult { slope: -120.0, intercept: 4200.0 };
        assert!((fit.evaluate(1.0) - 4200.0).abs() < 1e-12);
        assert!((fit.evaluate(std::f64::consts::E) - 4080.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_text_format() {
        let params = ReservoirParameters { permeability: 12.345_67, skin: -1.5, p1hr: 0.0 };
        assert_eq!(
            params.summary_text(),
            "Permeability (k): 12.3457 mD\nSkin factor (s): -1.5000"
        );
    }
}
