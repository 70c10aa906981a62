//! WellTest: pressure build-up analysis
//!
//! Interactive Horner analysis of a shut-in pressure record.
//!
//! ## Architecture
//!
//! - **Physics Engine**: Horner transform, semilog line fit, permeability/skin,
//!   pressure derivative
//! - **Selection**: two-click state machine that drives the analysis
//! - **Acquisition**: CSV series loader and interaction event sources
//! - **Render**: render requests handed to an injected surface

pub mod acquisition;
pub mod config;
pub mod physics_engine;
pub mod render;
pub mod selection;
pub mod session;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, WellTestConfig};

// Re-export the analysis core
pub use physics_engine::{
    AnalysisError, DerivativeEngine, HornerTransform, LineFitEstimator,
    PressureSeries, ReservoirParameterCalculator, ReservoirProperties,
};

// Re-export commonly used types
pub use types::{
    Analysis, DerivativePoint, FitResult, HornerPoint, PlotPoint, RenderRequest,
    ReservoirParameters, Sample, SessionEvent,
};

pub use render::{JsonLinesSurface, RenderSurface};
pub use selection::{SelectionController, SelectionOutcome, SelectionState};
pub use session::{drive_events, run_events, SessionStats, WellTestSession};
