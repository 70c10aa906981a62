//! Build-up CSV loader
//!
//! Expects a header row with at least `time` (hours) and `pressure` (psi)
//! columns, in any position and any letter case. Other columns are ignored.
//!
//! ```text
//! time,pressure
//! 0,4500
//! 1,4000
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use super::AcquisitionError;
use crate::physics_engine::{AnalysisError, PressureSeries};
use crate::types::Sample;

const TIME_COLUMN: &str = "time";
const PRESSURE_COLUMN: &str = "pressure";

/// Load a pressure series from a CSV file.
pub fn load_series(path: &Path) -> Result<PressureSeries, AcquisitionError> {
    let file = File::open(path)?;
    let series = load_series_from_reader(file)?;
    info!(path = %path.display(), samples = series.len(), "Loaded build-up data");
    Ok(series)
}

/// Load a pressure series from any CSV reader.
pub fn load_series_from_reader<R: Read>(reader: R) -> Result<PressureSeries, AcquisitionError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (Some(time_idx), Some(pressure_idx)) = (position(TIME_COLUMN), position(PRESSURE_COLUMN))
    else {
        return Err(AnalysisError::InvalidInput(format!(
            "CSV file must contain 'pressure' and 'time' columns (found: {})",
            headers.iter().collect::<Vec<_>>().join(", ")
        ))
        .into());
    };

    let mut samples = Vec::new();
    for (i, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Header is line 1
        let line = i + 2;
        let time = parse_cell(&record, time_idx, TIME_COLUMN, line)?;
        let pressure = parse_cell(&record, pressure_idx, PRESSURE_COLUMN, line)?;
        samples.push(Sample { time, pressure });
    }

    Ok(PressureSeries::new(samples)?)
}

fn parse_cell(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    line: usize,
) -> Result<f64, AnalysisError> {
    match record.get(idx) {
        None | Some("") => Err(AnalysisError::InvalidInput(format!(
            "line {line}: missing '{column}' value"
        ))),
        Some(raw) => raw.parse::<f64>().map_err(|_| {
            AnalysisError::InvalidInput(format!(
                "line {line}: '{column}' value '{raw}' is not a number"
            ))
        }),
    }
}
