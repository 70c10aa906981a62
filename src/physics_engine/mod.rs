//! Physics Engine Module
//!
//! Deterministic pressure-transient calculations for a shut-in build-up test.
//! Everything here is a pure function of the recorded series and the fixed
//! well/fluid properties; no component keeps state between calls.
//!
//! ## Components
//! - [`PressureSeries`] - validated `(time, pressure)` samples and ΔP
//! - [`DerivativeEngine`] - centered `d(ΔP)/d(ln t)` diagnostic
//! - [`HornerTransform`] - Horner time ratios `(tp + Δt) / Δt`
//! - [`LineFitEstimator`] - semilog straight line through the picked points
//! - [`ReservoirParameterCalculator`] - permeability and skin from the fit

pub mod derivative;
pub mod horner;
pub mod line_fit;
pub mod reservoir;
pub mod series;

pub use derivative::DerivativeEngine;
pub use horner::HornerTransform;
pub use line_fit::LineFitEstimator;
pub use reservoir::{ReservoirParameterCalculator, ReservoirProperties};
pub use series::PressureSeries;

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Malformed or insufficient source data. Fatal to session construction.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Coincident abscissae break a finite-difference or fit window.
    #[error("Degenerate input at index {index}: {reason}")]
    DegenerateInput { index: usize, reason: String },

    /// Fewer points than a line needs. Expected while the analyst is still picking.
    #[error("Insufficient points for a line fit: have {have}, need 2")]
    InsufficientPoints { have: usize },

    /// Flat fitted line; no permeability can be identified.
    #[error("Cannot compute {0}: fitted slope is zero")]
    DivideByZero(&'static str),
}

impl AnalysisError {
    /// `true` for conditions the analyst can recover from by picking again or resetting.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_input_is_unrecoverable() {
        assert!(!AnalysisError::InvalidInput("NaN click".to_string()).is_recoverable());
        assert!(AnalysisError::InsufficientPoints { have: 1 }.is_recoverable());
        assert!(AnalysisError::DivideByZero("permeability").is_recoverable());
        assert!(AnalysisError::DegenerateInput {
            index: 3,
            reason: "same ratio".to_string(),
        }
        .is_recoverable());
    }
}
