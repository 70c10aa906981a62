//! Rendering surface abstraction
//!
//! The controller never draws. It hands [`RenderRequest`] values to whatever
//! implements [`RenderSurface`]: a chart widget, a web socket, the JSON-lines
//! writer below, or a plain `Vec` in tests.

use std::io::Write;

use tracing::{debug, error};

use crate::types::RenderRequest;

/// Receiver of render requests
pub trait RenderSurface {
    fn render(&mut self, request: RenderRequest);
}

/// Collects requests in order.
impl RenderSurface for Vec<RenderRequest> {
    fn render(&mut self, request: RenderRequest) {
        self.push(request);
    }
}

impl<T: RenderSurface + ?Sized> RenderSurface for &mut T {
    fn render(&mut self, request: RenderRequest) {
        (**self).render(request);
    }
}

/// Writes each request as one JSON object per line.
///
/// Rendering cannot fail from the controller's point of view. The first write
/// error is kept and later requests are dropped until it is taken with
/// [`Self::take_error`].
pub struct JsonLinesSurface<W: Write> {
    writer: W,
    written: u64,
    error: Option<std::io::Error>,
}

impl<W: Write> JsonLinesSurface<W> {
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            error: None,
        }
    }

    /// Number of requests written successfully.
    pub const fn written(&self) -> u64 {
        self.written
    }

    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, request: &RenderRequest) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, request)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl<W: Write> RenderSurface for JsonLinesSurface<W> {
    fn render(&mut self, request: RenderRequest) {
        if self.error.is_some() {
            return;
        }
        match self.write_line(&request) {
            Ok(()) => {
                self.written += 1;
                debug!(kind = request.kind(), "Render request written");
            }
            Err(e) => {
                error!(kind = request.kind(), error = %e, "Render output failed, dropping further requests");
                self.error = Some(e);
            }
        }
    }
}
