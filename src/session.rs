//! Build-up analysis session
//!
//! Ties the loaded series and well configuration to a [`SelectionController`]
//! and drives it from an [`EventSource`] until the source runs dry.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::acquisition::{self, AcquisitionError, EventSource, SourceEvent};
use crate::config::WellTestConfig;
use crate::physics_engine::{PressureSeries, ReservoirProperties, Result};
use crate::render::RenderSurface;
use crate::selection::{SelectionController, SelectionOutcome};
use crate::types::Analysis;

/// Loaded inputs for one build-up test
#[derive(Debug, Clone)]
pub struct WellTestSession {
    series: PressureSeries,
    properties: ReservoirProperties,
    data_path: Option<PathBuf>,
}

impl WellTestSession {
    /// Load the CSV at `data_path` and take the physical properties from `config`.
    pub fn load(data_path: &Path, config: &WellTestConfig) -> std::result::Result<Self, AcquisitionError> {
        let series = acquisition::load_series(data_path)?;
        let mut session = Self::new(series, config.properties())?;
        session.data_path = Some(data_path.to_path_buf());
        Ok(session)
    }

    pub fn new(series: PressureSeries, properties: ReservoirProperties) -> Result<Self> {
        properties.validate()?;
        Ok(Self {
            series,
            properties,
            data_path: None,
        })
    }

    pub const fn series(&self) -> &PressureSeries {
        &self.series
    }

    pub const fn properties(&self) -> &ReservoirProperties {
        &self.properties
    }

    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    /// Controller bound to this session's series. Draws the base plot.
    pub fn controller<R: RenderSurface>(&self, surface: R) -> Result<SelectionController<'_, R>> {
        SelectionController::new(&self.series, self.properties, surface)
    }
}

/// Counters for one event loop run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub events_handled: u64,
    /// Selections that failed but can be retried (flat line, same point twice)
    pub picks_rejected: u64,
    /// Clicks that could not be placed on the plot at all
    pub invalid_picks: u64,
    pub picks_ignored: u64,
    pub resets: u64,
    pub bad_events: u64,
    /// Analysis in place when the loop ended
    pub final_analysis: Option<Analysis>,
}

/// Feed events from `source` into `controller` until EOF.
///
/// Malformed event lines are logged and skipped. Any other source error ends
/// the loop and is returned.
pub async fn run_events<S, R>(
    controller: &mut SelectionController<'_, R>,
    source: &mut S,
) -> std::result::Result<SessionStats, AcquisitionError>
where
    S: EventSource + ?Sized,
    R: RenderSurface,
{
    let mut stats = SessionStats::default();
    drive_events(controller, source, &mut stats).await?;
    Ok(stats)
}

/// Same loop as [`run_events`], counting into caller-owned `stats`.
///
/// The counts stay valid if the future is dropped before EOF (Ctrl+C);
/// `final_analysis` is only filled in when the loop ends normally.
pub async fn drive_events<S, R>(
    controller: &mut SelectionController<'_, R>,
    source: &mut S,
    stats: &mut SessionStats,
) -> std::result::Result<(), AcquisitionError>
where
    S: EventSource + ?Sized,
    R: RenderSurface,
{
    info!(source = source.source_name(), "Waiting for interaction events");

    loop {
        let event = match source.next_event().await {
            Ok(SourceEvent::Event(event)) => event,
            Ok(SourceEvent::Eof) => {
                info!(events = stats.events_handled, "Event source reached end");
                break;
            }
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "Skipping event");
                stats.bad_events += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        stats.events_handled += 1;
        debug!(%event, state = %controller.state(), "Event received");

        match controller.handle(event) {
            SelectionOutcome::Rejected(e) if e.is_recoverable() => stats.picks_rejected += 1,
            SelectionOutcome::Rejected(_) => stats.invalid_picks += 1,
            SelectionOutcome::Ignored => stats.picks_ignored += 1,
            SelectionOutcome::Reset => stats.resets += 1,
            SelectionOutcome::Selected(_) | SelectionOutcome::Fitted(_) => {}
        }
    }

    stats.final_analysis = controller.state().analysis().copied();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::ScriptedEventSource;
    use crate::types::{RenderRequest, SessionEvent};

    fn properties() -> ReservoirProperties {
        ReservoirProperties {
            producing_time: 100.0,
            flow_rate: 542.0,
            formation_volume_factor: 2.5052,
            viscosity: 0.108,
            porosity: 0.031,
            total_compressibility: 3.91e-5,
            wellbore_radius: 0.245,
            thickness: 787.0,
        }
    }

    fn session() -> WellTestSession {
        let series = PressureSeries::from_pairs(&[
            (0.0, 4500.0),
            (1.0, 4000.0),
            (2.0, 3800.0),
            (4.0, 3700.0),
            (8.0, 3650.0),
        ])
        .unwrap();
        WellTestSession::new(series, properties()).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_properties() {
        let series = session().series().clone();
        let mut props = properties();
        props.thickness = 0.0;
        assert!(WellTestSession::new(series, props).is_err());
    }

    #[tokio::test]
    async fn test_run_events_counts_outcomes() {
        let session = session();
        let mut controller = session.controller(Vec::<RenderRequest>::new()).unwrap();
        let mut source = ScriptedEventSource::new(vec![
            SessionEvent::PointPicked { x: 51.0, y: 3800.0 },
            SessionEvent::PointPicked { x: 13.5, y: 3650.0 },
            SessionEvent::PointPicked { x: 26.0, y: 3700.0 },
        ]);

        let stats = run_events(&mut controller, &mut source).await.unwrap();
        assert_eq!(stats.events_handled, 3);
        assert_eq!(stats.picks_ignored, 1);
        assert_eq!(stats.picks_rejected, 0);
        let analysis = stats.final_analysis.unwrap();
        assert_eq!(analysis.picks[0].index, 2);
        assert_eq!(analysis.picks[1].index, 4);
    }

    #[tokio::test]
    async fn test_invalid_click_counted_apart_from_rejected_selection() {
        let session = session();
        let mut controller = session.controller(Vec::<RenderRequest>::new()).unwrap();
        let mut source = ScriptedEventSource::new(vec![
            SessionEvent::PointPicked { x: f64::NAN, y: 3800.0 },
            SessionEvent::PointPicked { x: 51.0, y: 3800.0 },
            SessionEvent::PointPicked { x: 51.0, y: 3800.0 },
        ]);

        let stats = run_events(&mut controller, &mut source).await.unwrap();
        assert_eq!(stats.invalid_picks, 1);
        assert_eq!(stats.picks_rejected, 1);
    }

    /// Yields one event, then never produces another.
    struct StallingSource {
        sent: bool,
    }

    #[async_trait::async_trait]
    impl EventSource for StallingSource {
        async fn next_event(&mut self) -> std::result::Result<SourceEvent, AcquisitionError> {
            if self.sent {
                std::future::pending::<()>().await;
            }
            self.sent = true;
            Ok(SourceEvent::Event(SessionEvent::PointPicked { x: 51.0, y: 3800.0 }))
        }

        fn source_name(&self) -> &str {
            "stalling"
        }
    }

    #[tokio::test]
    async fn test_stats_survive_an_interrupted_run() {
        let session = session();
        let mut controller = session.controller(Vec::<RenderRequest>::new()).unwrap();
        let mut source = StallingSource { sent: false };
        let mut stats = SessionStats::default();

        tokio::select! {
            biased;
            _ = drive_events(&mut controller, &mut source, &mut stats) => {
                panic!("source never reaches EOF");
            }
            () = async {
                for _ in 0..5 {
                    tokio::task::yield_now().await;
                }
            } => {}
        }

        assert_eq!(stats.events_handled, 1);
        assert_eq!(controller.state().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_clears_final_analysis() {
        let session = session();
        let mut controller = session.controller(Vec::<RenderRequest>::new()).unwrap();
        let mut source = ScriptedEventSource::new(vec![
            SessionEvent::PointPicked { x: 51.0, y: 3800.0 },
            SessionEvent::PointPicked { x: 13.5, y: 3650.0 },
            SessionEvent::ResetRequested,
        ]);

        let stats = run_events(&mut controller, &mut source).await.unwrap();
        assert_eq!(stats.resets, 1);
        assert!(stats.final_analysis.is_none());
        assert!(controller.state().is_empty());
    }
}
