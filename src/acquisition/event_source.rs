//! Interaction event sources
//!
//! The rendering surface delivers clicks and resets. Two sources are provided:
//! - [`LineEventSource`]: one event per line from any async reader (stdin in
//!   the binary). JSON objects or a short text form:
//!   `{"event":"point_picked","x":51,"y":3800}`, `pick 51 3800`, `reset`.
//! - [`ScriptedEventSource`]: a fixed list, for `--pick` arguments and tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

use super::AcquisitionError;
use crate::types::SessionEvent;

/// Events produced by an event source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceEvent {
    Event(SessionEvent),
    /// No more events (EOF, end of script).
    Eof,
}

/// Where interaction events come from.
#[async_trait]
pub trait EventSource: Send {
    /// Next event, or `SourceEvent::Eof`.
    ///
    /// An `Err` that [`AcquisitionError::is_recoverable`] is a single bad
    /// event; the source can still be read.
    async fn next_event(&mut self) -> Result<SourceEvent, AcquisitionError>;

    /// Human-readable name for logging.
    fn source_name(&self) -> &str;
}

// ============================================================================
// Line-oriented source
// ============================================================================

pub struct LineEventSource<R> {
    reader: R,
    line_buffer: String,
    line_no: u64,
    name: String,
}

impl LineEventSource<BufReader<Stdin>> {
    /// Events from the process's standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), "stdin")
    }
}

impl<R: AsyncBufRead + Unpin + Send> LineEventSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            line_buffer: String::with_capacity(128),
            line_no: 0,
            name: name.into(),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> EventSource for LineEventSource<R> {
    async fn next_event(&mut self) -> Result<SourceEvent, AcquisitionError> {
        loop {
            self.line_buffer.clear();
            if self.reader.read_line(&mut self.line_buffer).await? == 0 {
                return Ok(SourceEvent::Eof);
            }
            self.line_no += 1;

            match parse_event_line(&self.line_buffer) {
                Ok(Some(event)) => return Ok(SourceEvent::Event(event)),
                Ok(None) => continue,
                Err(message) => {
                    return Err(AcquisitionError::Event {
                        line: self.line_no,
                        message,
                    })
                }
            }
        }
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_event_line(line: &str) -> Result<Option<SessionEvent>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    if line.starts_with('{') {
        return serde_json::from_str(line)
            .map(Some)
            .map_err(|e| format!("JSON parse error: {e}"));
    }

    let mut words = line.split(|c: char| c.is_whitespace() || c == ',').filter(|w| !w.is_empty());
    match words.next().map(str::to_ascii_lowercase).as_deref() {
        Some("reset") => Ok(Some(SessionEvent::ResetRequested)),
        Some("pick") => {
            let coords: Vec<f64> = words
                .map(str::parse::<f64>)
                .collect::<Result<_, _>>()
                .map_err(|e| format!("bad pick coordinate: {e}"))?;
            match coords.as_slice() {
                [x, y] => Ok(Some(SessionEvent::PointPicked { x: *x, y: *y })),
                _ => Err(format!("pick needs exactly 2 coordinates, got {}", coords.len())),
            }
        }
        _ => Err(format!("unknown command '{line}'")),
    }
}

// ============================================================================
// Scripted source
// ============================================================================

/// Replays a fixed list of events, then reports EOF.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEventSource {
    events: VecDeque<SessionEvent>,
}

impl ScriptedEventSource {
    pub fn new(events: Vec<SessionEvent>) -> Self {
        Self { events: events.into() }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

#[async_trait]
impl EventSource for ScriptedEventSource {
    async fn next_event(&mut self) -> Result<SourceEvent, AcquisitionError> {
        Ok(self
            .events
            .pop_front()
            .map_or(SourceEvent::Eof, SourceEvent::Event))
    }

    fn source_name(&self) -> &str {
        "script"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_forms() {
        assert_eq!(
            parse_event_line("pick 51 3800").unwrap(),
            Some(SessionEvent::PointPicked { x: 51.0, y: 3800.0 })
        );
        assert_eq!(
            parse_event_line("PICK 13.5,3650\n").unwrap(),
            Some(SessionEvent::PointPicked { x: 13.5, y: 3650.0 })
        );
        assert_eq!(parse_event_line("reset").unwrap(), Some(SessionEvent::ResetRequested));
        assert_eq!(parse_event_line("   ").unwrap(), None);
        assert_eq!(parse_event_line("# comment").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_event_line("pick 1").is_err());
        assert!(parse_event_line("pick a b").is_err());
        assert!(parse_event_line("zoom 2").is_err());
        assert!(parse_event_line(r#"{"event":"zoom"}"#).is_err());
    }

    #[tokio::test]
    async fn test_line_source_skips_blank_and_reports_bad_lines() {
        let input = "\n{\"event\":\"point_picked\",\"x\":51.0,\"y\":3800.0}\nbogus\nreset\n";
        let mut source = LineEventSource::new(BufReader::new(input.as_bytes()), "test");

        assert_eq!(
            source.next_event().await.unwrap(),
            SourceEvent::Event(SessionEvent::PointPicked { x: 51.0, y: 3800.0 })
        );

        let err = source.next_event().await.unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, AcquisitionError::Event { line: 3, .. }));

        assert_eq!(
            source.next_event().await.unwrap(),
            SourceEvent::Event(SessionEvent::ResetRequested)
        );
        assert_eq!(source.next_event().await.unwrap(), SourceEvent::Eof);
        assert_eq!(source.source_name(), "test");
    }

    #[test]
    fn test_scripted_source_drains_then_eof() {
        let mut source = ScriptedEventSource::new(vec![SessionEvent::ResetRequested]);
        tokio_test::block_on(async {
            assert_eq!(
                source.next_event().await.unwrap(),
                SourceEvent::Event(SessionEvent::ResetRequested)
            );
            assert_eq!(source.next_event().await.unwrap(), SourceEvent::Eof);
            assert_eq!(source.next_event().await.unwrap(), SourceEvent::Eof);
        });
        assert_eq!(source.remaining(), 0);
    }
}
