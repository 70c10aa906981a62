//! Interaction events delivered by the rendering surface

use serde::{Deserialize, Serialize};

/// A user interaction on the Horner plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Click at data coordinates `(x = Horner ratio, y = pressure)`
    PointPicked { x: f64, y: f64 },
    /// Reset button
    ResetRequested,
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PointPicked { x, y } => write!(f, "pick({x}, {y})"),
            Self::ResetRequested => write!(f, "reset"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let pick: SessionEvent =
            serde_json::from_str(r#"{"event":"point_picked","x":51.0,"y":3800.0}"#).unwrap();
        assert_eq!(pick, SessionEvent::PointPicked { x: 51.0, y: 3800.0 });

        let reset: SessionEvent = serde_json::from_str(r#"{"event":"reset_requested"}"#).unwrap();
        assert_eq!(reset, SessionEvent::ResetRequested);
    }
}
