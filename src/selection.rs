//! Selection Controller - two-click Horner straight-line selection
//!
//! ```text
//!   Empty ──pick──▶ OnePoint ──pick──▶ Fitted
//!     ▲                                  │
//!     └───────────────reset──────────────┘   (reset is accepted in any state)
//! ```
//!
//! - Every click snaps to the nearest Horner point (squared distance in
//!   ratio/pressure data space).
//! - The second click fits the line, derives permeability and skin, and asks
//!   for the fitted line, the summary text, and a separate derivative
//!   diagnostic plot.
//! - Clicks after a fit are ignored until `reset()`.
//! - A failed second click (flat line, same point twice) is reported as a
//!   notice; the first pick is kept so the analyst can try another point.

use tracing::{debug, info, warn};

use crate::physics_engine::{
    AnalysisError, DerivativeEngine, HornerTransform, LineFitEstimator, PressureSeries,
    ReservoirParameterCalculator, ReservoirProperties, Result,
};
use crate::render::RenderSurface;
use crate::types::{Analysis, DerivativePoint, HornerPoint, PlotPoint, RenderRequest, SessionEvent};

// ============================================================================
// State
// ============================================================================

/// Points picked so far and, once two are in, the resulting analysis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Empty,
    OnePoint(HornerPoint),
    Fitted(Analysis),
}

impl SelectionState {
    /// Picked points in click order (0, 1 or 2 of them).
    pub fn picks(&self) -> Vec<HornerPoint> {
        match self {
            Self::Empty => Vec::new(),
            Self::OnePoint(p) => vec![*p],
            Self::Fitted(a) => a.picks.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::OnePoint(_) => 1,
            Self::Fitted(_) => 2,
        }
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn analysis(&self) -> Option<&Analysis> {
        match self {
            Self::Fitted(a) => Some(a),
            _ => None,
        }
    }
}

impl std::fmt::Display for SelectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::OnePoint(_) => write!(f, "OnePoint"),
            Self::Fitted(_) => write!(f, "Fitted"),
        }
    }
}

/// What a single event did
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// First point stored
    Selected(HornerPoint),
    /// Second point stored, line fitted
    Fitted(Analysis),
    /// Click while already fitted
    Ignored,
    /// Click could not be used; state unchanged
    Rejected(AnalysisError),
    /// Selection cleared
    Reset,
}

// ============================================================================
// Controller
// ============================================================================

/// Owns the only mutable analysis state of a session.
pub struct SelectionController<'a, R: RenderSurface> {
    series: &'a PressureSeries,
    calculator: ReservoirParameterCalculator,
    fitter: LineFitEstimator,
    horner_points: Vec<HornerPoint>,
    state: SelectionState,
    surface: R,
}

impl<'a, R: RenderSurface> SelectionController<'a, R> {
    /// Build the Horner plot for `series` and draw it.
    pub fn new(
        series: &'a PressureSeries,
        properties: ReservoirProperties,
        surface: R,
    ) -> Result<Self> {
        let transform = HornerTransform::new(properties.producing_time)?;
        let calculator = ReservoirParameterCalculator::new(series.initial_pressure(), properties)?;
        let horner_points = transform.transform(series)?;

        info!(
            samples = series.len(),
            horner_points = horner_points.len(),
            tp = properties.producing_time,
            "Selection controller ready"
        );

        let mut controller = Self {
            series,
            calculator,
            fitter: LineFitEstimator::new(),
            horner_points,
            state: SelectionState::Empty,
            surface,
        };
        controller.draw_base_plot();
        Ok(controller)
    }

    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn horner_points(&self) -> &[HornerPoint] {
        &self.horner_points
    }

    pub const fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn into_surface(self) -> R {
        self.surface
    }

    /// Dispatch one interaction event.
    pub fn handle(&mut self, event: SessionEvent) -> SelectionOutcome {
        match event {
            SessionEvent::PointPicked { x, y } => self.pick(x, y),
            SessionEvent::ResetRequested => {
                self.reset();
                SelectionOutcome::Reset
            }
        }
    }

    /// Horner point closest to a click in (ratio, pressure) space.
    pub fn nearest_point(&self, x: f64, y: f64) -> Option<HornerPoint> {
        self.horner_points
            .iter()
            .min_by(|a, b| a.distance_squared(x, y).total_cmp(&b.distance_squared(x, y)))
            .copied()
    }

    /// Handle a click at data coordinates `(x, y)`.
    pub fn pick(&mut self, x: f64, y: f64) -> SelectionOutcome {
        if let SelectionState::Fitted(_) = self.state {
            debug!(x, y, "Pick ignored: selection already fitted, reset to start over");
            return SelectionOutcome::Ignored;
        }

        if !x.is_finite() || !y.is_finite() {
            return self.reject(AnalysisError::InvalidInput(format!(
                "click coordinates are not finite ({x}, {y})"
            )));
        }

        let Some(point) = self.nearest_point(x, y) else {
            return self.reject(AnalysisError::InvalidInput(
                "no Horner points to select: every sample after shut-in has zero time".to_string(),
            ));
        };
        debug!(
            x,
            y,
            index = point.index,
            ratio = point.horner_ratio,
            pressure = point.pressure,
            "Click snapped to Horner point"
        );

        match self.state {
            SelectionState::Empty => {
                self.state = SelectionState::OnePoint(point);
                self.surface.render(RenderRequest::HighlightPoint { point });
                SelectionOutcome::Selected(point)
            }
            SelectionState::OnePoint(first) => match self.complete(first, point) {
                Ok(analysis) => SelectionOutcome::Fitted(analysis),
                Err(e) => self.reject(e),
            },
            SelectionState::Fitted(_) => SelectionOutcome::Ignored,
        }
    }

    /// Clear the selection and redraw the bare Horner plot.
    pub fn reset(&mut self) {
        info!(previous = %self.state, "Selection reset");
        self.state = SelectionState::Empty;
        self.draw_base_plot();
    }

    fn draw_base_plot(&mut self) {
        self.surface.render(RenderRequest::DrawBasePlot {
            points: self.horner_points.clone(),
        });
    }

    fn reject(&mut self, error: AnalysisError) -> SelectionOutcome {
        warn!(state = %self.state, error = %error, "Pick rejected");
        self.surface.render(RenderRequest::Notice {
            message: notice_for(&error),
        });
        SelectionOutcome::Rejected(error)
    }

    /// Second pick: fit, derive parameters, render. State only advances on success.
    fn complete(&mut self, first: HornerPoint, second: HornerPoint) -> Result<Analysis> {
        let fit = self.fitter.fit(&[first, second])?;
        let parameters = self.calculator.evaluate(&fit)?;
        let analysis = Analysis {
            picks: [first, second],
            fit,
            parameters,
        };
        self.state = SelectionState::Fitted(analysis);

        info!(
            slope = fit.slope,
            intercept = fit.intercept,
            permeability_md = parameters.permeability,
            skin = parameters.skin,
            "Horner line fitted"
        );

        self.surface.render(RenderRequest::HighlightPoint { point: second });
        self.surface.render(RenderRequest::DrawFittedLine {
            points: self
                .horner_points
                .iter()
                .map(|p| PlotPoint::new(p.horner_ratio, fit.evaluate(p.horner_ratio)))
                .collect(),
            slope: fit.slope,
            intercept: fit.intercept,
        });
        self.surface.render(RenderRequest::DrawSummaryText {
            permeability: parameters.permeability,
            skin: parameters.skin,
            text: parameters.summary_text(),
        });
        self.draw_diagnostic(&analysis);

        Ok(analysis)
    }

    /// Log-log ΔP / derivative plot. A degenerate series loses only this plot.
    fn draw_diagnostic(&mut self, analysis: &Analysis) {
        let engine = DerivativeEngine::new(self.series);
        match engine.derivative() {
            Ok(derivative) => {
                let reference_line = reference_line(&derivative, &analysis.picks);
                if reference_line.is_none() {
                    debug!("No derivative at either picked sample, diagnostic drawn without reference line");
                }
                self.surface.render(RenderRequest::DrawDiagnostic {
                    delta_pressure: engine.delta_pressure_curve(),
                    derivative,
                    reference_line,
                });
            }
            Err(e) => {
                warn!(error = %e, "Derivative diagnostic unavailable");
                self.surface.render(RenderRequest::Notice {
                    message: format!("Derivative plot unavailable: {e}"),
                });
            }
        }
    }
}

/// Derivative at the lowest-index picked sample that has one.
///
/// Reads by the sample index carried on each pick rather than by matching
/// pressure values; the last two samples have no centered derivative.
fn reference_line(derivative: &[DerivativePoint], picks: &[HornerPoint]) -> Option<f64> {
    let mut indices: Vec<usize> = picks.iter().map(|p| p.index).collect();
    indices.sort_unstable();
    indices
        .into_iter()
        .find_map(|i| derivative.get(i).map(|d| d.value))
}

fn notice_for(error: &AnalysisError) -> String {
    match error {
        AnalysisError::DivideByZero(_) => {
            "Cannot compute permeability for this selection: the fitted line is flat. \
             Pick another point or reset."
                .to_string()
        }
        AnalysisError::DegenerateInput { .. } => {
            "Both clicks selected the same Horner time. Pick a different second point or reset."
                .to_string()
        }
        other => format!("Selection failed: {other}"),
    }
}
