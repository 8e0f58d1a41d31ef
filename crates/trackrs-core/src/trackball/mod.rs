//! Trackball module
//!
//! Motion sampling, per-mode sensitivity and the mode engine that turns
//! motion into mouse reports or key taps.

pub mod engine;
mod mode;
pub mod sampler;
mod state;
mod thresholds;

pub use engine::{apply_motion, emit, MotionOutput};
pub use mode::TrackMode;
pub use sampler::sample;
pub use state::{Motion, TrackballState};
pub use thresholds::{ModeThresholds, SMOOTH_SCROLL_FACTOR};
