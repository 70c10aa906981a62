//! WellTest - pressure build-up analysis
//!
//! Loads a shut-in pressure record and a well configuration, draws the Horner
//! plot, and turns two picked points into permeability and skin.
//!
//! # Usage
//!
//! ```bash
//! # Interactive: read pick/reset events from stdin as JSON lines
//! ./welltest --data buildup.csv --config well_test.toml
//!
//! # Scripted: two picks, results on stdout
//! ./welltest --data buildup.csv --pick 51,3800 --pick 13.5,3650
//!
//! # Show the effective configuration
//! ./welltest print-config --config well_test.toml
//! ```
//!
//! # Environment Variables
//!
//! - `WELLTEST_CONFIG`: config file used when `--config` is absent
//! - `RUST_LOG`: Logging level (default: info)

use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use welltest::acquisition::{EventSource, LineEventSource, ScriptedEventSource};
use welltest::config::WellTestConfig;
use welltest::{drive_events, JsonLinesSurface, SessionEvent, SessionStats, WellTestSession};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "welltest")]
#[command(about = "Horner pressure build-up analysis")]
#[command(version)]
struct CliArgs {
    /// CSV file with `time` (hours) and `pressure` (psi) columns
    #[arg(long, value_name = "CSV")]
    data: Option<PathBuf>,

    /// Well test configuration (TOML). Falls back to $WELLTEST_CONFIG, then ./well_test.toml
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Pick a point on the Horner plot at `RATIO,PRESSURE`. Repeatable.
    /// When given, stdin is not read.
    #[arg(long, value_name = "X,Y", value_parser = parse_pick)]
    pick: Vec<(f64, f64)>,

    /// Send a reset after the scripted picks
    #[arg(long, requires = "pick")]
    reset_after: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Print the effective configuration as TOML and exit
    PrintConfig,
}

fn parse_pick(raw: &str) -> Result<(f64, f64), String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{raw}'"))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad X '{x}': {e}"))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad Y '{y}': {e}"))?;
    Ok((x, y))
}

fn scripted_events(args: &CliArgs) -> Vec<SessionEvent> {
    let mut events: Vec<SessionEvent> = args
        .pick
        .iter()
        .map(|&(x, y)| SessionEvent::PointPicked { x, y })
        .collect();
    if args.reset_after {
        events.push(SessionEvent::ResetRequested);
    }
    events
}

// ============================================================================
// Session
// ============================================================================

async fn run_session(args: &CliArgs, config: &WellTestConfig) -> Result<SessionStats> {
    let data_path = args
        .data
        .as_deref()
        .context("--data <CSV> is required to run an analysis")?;

    let session = WellTestSession::load(data_path, config)
        .with_context(|| format!("Failed to load build-up data from {}", data_path.display()))?;

    let stdout = io::stdout();
    let mut controller = session
        .controller(JsonLinesSurface::new(BufWriter::new(stdout.lock())))
        .context("Failed to build the Horner plot")?;

    let mut source: Box<dyn EventSource> = if args.pick.is_empty() {
        Box::new(LineEventSource::stdin())
    } else {
        Box::new(ScriptedEventSource::new(scripted_events(args)))
    };

    let mut stats = SessionStats::default();
    tokio::select! {
        result = drive_events(&mut controller, source.as_mut(), &mut stats) => {
            result.with_context(|| format!("Event source '{}' failed", source.source_name()))?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, ending session");
        }
    }
    stats.final_analysis = controller.state().analysis().copied();

    if let Some(e) = controller.surface_mut().take_error() {
        return Err(e).context("Failed to write render requests to stdout");
    }

    Ok(stats)
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries render requests only
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();

    let config = WellTestConfig::load(args.config.as_deref())
        .context("Failed to load well test configuration")?;

    if let Some(SubCommand::PrintConfig) = &args.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    info!(
        "Well: {} | Field: {} | tp: {} h",
        config.well.name,
        if config.well.field.is_empty() {
            "unset"
        } else {
            &config.well.field
        },
        config.flow_period.producing_time_hours
    );

    let stats = run_session(&args, &config).await?;

    if stats.bad_events > 0 {
        warn!(count = stats.bad_events, "Some event lines were skipped");
    }
    if stats.invalid_picks > 0 {
        warn!(count = stats.invalid_picks, "Some clicks could not be placed on the plot");
    }

    match stats.final_analysis {
        Some(analysis) => info!(
            slope = analysis.fit.slope,
            intercept = analysis.fit.intercept,
            permeability_md = analysis.parameters.permeability,
            skin = analysis.parameters.skin,
            p1hr = analysis.parameters.p1hr,
            "Session finished with a fitted line"
        ),
        None => info!(events = stats.events_handled, "Session finished without a fit"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pick() {
        assert_eq!(parse_pick("51,3800").unwrap(), (51.0, 3800.0));
        assert_eq!(parse_pick(" 13.5 , 3650 ").unwrap(), (13.5, 3650.0));
        assert!(parse_pick("51").is_err());
        assert!(parse_pick("a,1").is_err());
    }

    #[test]
    fn test_scripted_events_with_reset() {
        let args = CliArgs::parse_from([
            "welltest", "--data", "x.csv", "--pick", "51,3800", "--reset-after",
        ]);
        assert_eq!(
            scripted_events(&args),
            vec![
                SessionEvent::PointPicked { x: 51.0, y: 3800.0 },
                SessionEvent::ResetRequested,
            ]
        );
    }
}
