//! Semilog straight-line fit on the Horner plot
//!
//! Ordinary least squares of pressure on `ln(horner_ratio)`. With the two
//! analyst-picked points this reduces to the line through both of them.

use statrs::statistics::Statistics;

use super::{AnalysisError, Result};
use crate::types::{FitResult, HornerPoint};

#[derive(Debug, Clone, Copy, Default)]
pub struct LineFitEstimator;

impl LineFitEstimator {
    pub const fn new() -> Self {
        Self
    }

    /// Fit `pressure = slope * ln(ratio) + intercept`.
    ///
    /// Needs at least two points; more are accepted and fitted by least
    /// squares. Points that all share one ratio cannot define a slope.
    pub fn fit(&self, points: &[HornerPoint]) -> Result<FitResult> {
        if points.len() < 2 {
            return Err(AnalysisError::InsufficientPoints { have: points.len() });
        }
        if let Some(bad) = points
            .iter()
            .find(|p| !(p.horner_ratio.is_finite() && p.horner_ratio > 0.0) || !p.pressure.is_finite())
        {
            return Err(AnalysisError::InvalidInput(format!(
                "point from sample {} cannot be placed on a semilog axis (ratio={}, pressure={})",
                bad.index, bad.horner_ratio, bad.pressure
            )));
        }

        let xs: Vec<f64> = points.iter().map(|p| p.horner_ratio.ln()).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.pressure).collect();
        let x_mean = xs.iter().mean();
        let y_mean = ys.iter().mean();

        let mut sum_xx = 0.0;
        let mut sum_xy = 0.0;
        for (x, y) in xs.iter().zip(&ys) {
            sum_xx += (x - x_mean) * (x - x_mean);
            sum_xy += (x - x_mean) * (y - y_mean);
        }

        if sum_xx == 0.0 {
            return Err(AnalysisError::DegenerateInput {
                index: points[points.len() - 1].index,
                reason: "picked points share the same Horner ratio".to_string(),
            });
        }

        let slope = sum_xy / sum_xx;
        let intercept = y_mean - slope * x_mean;
        Ok(FitResult { slope, intercept })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(index: usize, horner_ratio: f64, pressure: f64) -> HornerPoint {
        HornerPoint { index, horner_ratio, pressure }
    }

    #[test]
    fn test_insufficient_points() {
        let fitter = LineFitEstimator::new();
        assert_eq!(
            fitter.fit(&[]).unwrap_err(),
            AnalysisError::InsufficientPoints { have: 0 }
        );
        assert_eq!(
            fitter.fit(&[point(1, 51.0, 3800.0)]).unwrap_err(),
            AnalysisError::InsufficientPoints { have: 1 }
        );
    }

    #[test]
    fn test_two_points_interpolate_exactly() {
        let a = point(2, 51.0, 3800.0);
        let b = point(4, 13.5, 3650.0);
        let fit = LineFitEstimator::new().fit(&[a, b]).unwrap();

        assert!((fit.evaluate(51.0) - 3800.0).abs() < 1e-8);
        assert!((fit.evaluate(13.5) - 3650.0).abs() < 1e-8);

        let expected_slope = (3800.0 - 3650.0) / (51.0_f64.ln() - 13.5_f64.ln());
        assert!((fit.slope - expected_slope).abs() < 1e-9);
    }

    #[test]
    fn test_click_order_does_not_change_line() {
        let a = point(1, 101.0, 4000.0);
        let b = point(3, 26.0, 3700.0);
        let ab = LineFitEstimator::new().fit(&[a, b]).unwrap();
        let ba = LineFitEstimator::new().fit(&[b, a]).unwrap();
        assert!((ab.slope - ba.slope).abs() < 1e-9);
        assert!((ab.intercept - ba.intercept).abs() < 1e-6);
    }

    #[test]
    fn test_same_ratio_is_degenerate() {
        let a = point(2, 51.0, 3800.0);
        let err = LineFitEstimator::new().fit(&[a, a]).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateInput { index: 2, .. }));
    }

    #[test]
    fn test_flat_pair_gives_zero_slope() {
        let fit = LineFitEstimator::new()
            .fit(&[point(1, 40.0, 3000.0), point(2, 20.0, 3000.0)])
            .unwrap();
        assert_eq!(fit.slope, 0.0);
        assert!((fit.intercept - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_least_squares_on_collinear_points() {
        // p = -100 ln(r) + 5000
        let pts: Vec<HornerPoint> = [2.0_f64, 5.0, 10.0, 40.0]
            .iter()
            .enumerate()
            .map(|(i, &r)| point(i + 1, r, -100.0 * r.ln() + 5000.0))
            .collect();
        let fit = LineFitEstimator::new().fit(&pts).unwrap();
        assert!((fit.slope - -100.0).abs() < 1e-9);
        assert!((fit.intercept - 5000.0).abs() < 1e-7);
    }
}
