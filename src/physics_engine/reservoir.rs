//! Permeability and skin from a Horner straight line
//!
//! Field units: q in STB/D, μ in cp, h and rw in ft, Ct in 1/psi, k in mD.
//!
//! Formulas:
//! - `k = |162.6 × q × B × μ / (m × h)|`
//! - `P1hr = b + m × ln(tp + 1)`
//! - `s = 1.151 × (P1hr − Ph0) / m − log₁₀(k / (φ × μ × Ct × rw²)) + 3.23`
//!
//! where `m`, `b` are the fitted slope and intercept and `Ph0` is the first
//! recorded shut-in pressure.

use super::{AnalysisError, Result};
use crate::types::{FitResult, ReservoirParameters};

/// Field-unit constant in the radial-flow permeability equation.
pub const PERMEABILITY_COEFFICIENT: f64 = 162.6;
/// Semilog skin equation multiplier.
pub const SKIN_MULTIPLIER: f64 = 1.151;
/// Semilog skin equation offset.
pub const SKIN_OFFSET: f64 = 3.23;

/// Fixed well / fluid constants for one build-up test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReservoirProperties {
    /// tp: producing time before shut-in (hours)
    pub producing_time: f64,
    /// Qo: oil flow rate (bbl/day)
    pub flow_rate: f64,
    /// Bo: formation volume factor (rb/STB)
    pub formation_volume_factor: f64,
    /// μo: oil viscosity (cp)
    pub viscosity: f64,
    /// φ: porosity (fraction)
    pub porosity: f64,
    /// Ct: total compressibility (1/psi)
    pub total_compressibility: f64,
    /// rw: wellbore radius (ft)
    pub wellbore_radius: f64,
    /// h: net formation thickness (ft)
    pub thickness: f64,
}

impl ReservoirProperties {
    /// Every property must be finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("producing_time", self.producing_time),
            ("flow_rate", self.flow_rate),
            ("formation_volume_factor", self.formation_volume_factor),
            ("viscosity", self.viscosity),
            ("porosity", self.porosity),
            ("total_compressibility", self.total_compressibility),
            ("wellbore_radius", self.wellbore_radius),
            ("thickness", self.thickness),
        ];
        let bad: Vec<String> = fields
            .iter()
            .filter(|(_, v)| !v.is_finite() || *v <= 0.0)
            .map(|(name, v)| format!("{name}={v}"))
            .collect();
        if bad.is_empty() {
            Ok(())
        } else {
            Err(AnalysisError::InvalidInput(format!(
                "reservoir properties must be positive: {}",
                bad.join(", ")
            )))
        }
    }
}

/// Stateless permeability / skin calculator for one test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReservoirParameterCalculator {
    initial_pressure: f64,
    properties: ReservoirProperties,
}

impl ReservoirParameterCalculator {
    /// `initial_pressure` is `Ph0`, the first shut-in reading.
    pub fn new(initial_pressure: f64, properties: ReservoirProperties) -> Result<Self> {
        properties.validate()?;
        if !initial_pressure.is_finite() {
            return Err(AnalysisError::InvalidInput(format!(
                "initial shut-in pressure is not finite: {initial_pressure}"
            )));
        }
        Ok(Self { initial_pressure, properties })
    }

    pub const fn properties(&self) -> &ReservoirProperties {
        &self.properties
    }

    pub const fn initial_pressure(&self) -> f64 {
        self.initial_pressure
    }

    /// Pressure on the fitted line one hour after shut-in.
    pub fn p1hr(&self, slope: f64, intercept: f64) -> f64 {
        intercept + slope * (self.properties.producing_time + 1.0).ln()
    }

    /// Permeability (mD). Sign of the slope is irrelevant.
    pub fn permeability(&self, slope: f64) -> Result<f64> {
        if slope == 0.0 {
            return Err(AnalysisError::DivideByZero("permeability"));
        }
        let p = &self.properties;
        Ok((PERMEABILITY_COEFFICIENT * p.flow_rate * p.formation_volume_factor * p.viscosity
            / (slope * p.thickness))
            .abs())
    }

    /// Skin factor. Pass the unsigned slope magnitude; `P1hr` is evaluated with it as well.
    pub fn skin(&self, intercept: f64, slope: f64, permeability: f64) -> Result<f64> {
        if slope == 0.0 {
            return Err(AnalysisError::DivideByZero("skin"));
        }
        let p = &self.properties;
        let p1hr = self.p1hr(slope, intercept);
        let diffusivity_group =
            p.porosity * p.viscosity * p.total_compressibility * p.wellbore_radius.powi(2);
        Ok(SKIN_MULTIPLIER * ((p1hr - self.initial_pressure) / slope)
            - (permeability / diffusivity_group).log10()
            + SKIN_OFFSET)
    }

    /// Permeability from the signed slope, skin from its magnitude.
    pub fn evaluate(&self, fit: &FitResult) -> Result<ReservoirParameters> {
        let permeability = self.permeability(fit.slope)?;
        let magnitude = fit.slope.abs();
        let skin = self.skin(fit.intercept, magnitude, permeability)?;
        Ok(ReservoirParameters {
            permeability,
            skin,
            p1hr: self.p1hr(magnitude, fit.intercept),
        })
    }
}
