//! Shared data structures for build-up analysis
//!
//! - Samples and Horner / derivative plotting points
//! - Fit and reservoir-parameter results
//! - Interaction events consumed from the rendering surface
//! - Render requests produced for it

mod analysis;
mod events;
mod render;
mod sample;

pub use analysis::*;
pub use events::*;
pub use render::*;
pub use sample::*;
