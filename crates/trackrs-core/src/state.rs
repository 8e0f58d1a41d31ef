// Trackrs Engine State
// Everything the engine mutates between callbacks, in one place

use crate::config::TrackConfig;
use crate::sticky::StickyKeyState;
use crate::tap_dance::GestureResults;
use crate::trackball::{ModeThresholds, TrackballState};

/// Mutable engine state, passed by `&mut` into every entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineState {
    pub trackball: TrackballState,
    pub thresholds: ModeThresholds,
    pub sticky: StickyKeyState,
    /// Tap-dance results waiting for their reset callback
    pub gestures: GestureResults,
}

impl EngineState {
    /// Startup state: cursor mode, no integration, empty accumulators
    pub fn new(config: &TrackConfig) -> Self {
        Self {
            trackball: TrackballState::new(),
            thresholds: ModeThresholds::new(config),
            sticky: StickyKeyState::new(),
            gestures: GestureResults::new(),
        }
    }
}
