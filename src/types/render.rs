//! Render requests emitted by the selection controller
//!
//! These are plain data payloads. Whatever draws the charts (a GUI, a web
//! dashboard, a JSON stream on stdout) implements [`crate::render::RenderSurface`]
//! and decides how to display them.

use serde::{Deserialize, Serialize};

use super::{DerivativePoint, HornerPoint};

/// An `(x, y)` pair on a chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

impl PlotPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A request for the rendering surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum RenderRequest {
    /// Semilog Horner scatter with no highlights
    DrawBasePlot { points: Vec<HornerPoint> },
    /// Mark a picked point
    HighlightPoint { point: HornerPoint },
    /// Fitted straight line evaluated at every Horner ratio
    DrawFittedLine {
        points: Vec<PlotPoint>,
        slope: f64,
        intercept: f64,
    },
    /// Permeability / skin annotation
    DrawSummaryText {
        permeability: f64,
        skin: f64,
        text: String,
    },
    /// Log-log ΔP and derivative plot with an optional horizontal reference
    DrawDiagnostic {
        delta_pressure: Vec<PlotPoint>,
        derivative: Vec<DerivativePoint>,
        reference_line: Option<f64>,
    },
    /// User-visible message for a recoverable failure
    Notice { message: String },
}

impl RenderRequest {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DrawBasePlot { .. } => "draw_base_plot",
            Self::HighlightPoint { .. } => "highlight_point",
            Self::DrawFittedLine { .. } => "draw_fitted_line",
            Self::DrawSummaryText { .. } => "draw_summary_text",
            Self::DrawDiagnostic { .. } => "draw_diagnostic",
            Self::Notice { .. } => "notice",
        }
    }
}
