//! Data acquisition module
//!
//! Loads the recorded build-up from CSV and reads interaction events from the
//! rendering surface (JSON lines on stdin, or a scripted list).

pub mod csv_loader;
pub mod event_source;

pub use csv_loader::{load_series, load_series_from_reader};
pub use event_source::{EventSource, LineEventSource, ScriptedEventSource, SourceEvent};

use thiserror::Error;

use crate::physics_engine::AnalysisError;

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Content problems (missing column, bad cell, too few samples)
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Unrecognized event on line {line}: {message}")]
    Event { line: u64, message: String },
}

impl AcquisitionError {
    /// A malformed event line can be skipped; everything else ends the session.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Event { .. })
    }
}
