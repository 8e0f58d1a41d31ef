// Trackrs Trackball State
// Mode, integration flag and the two motion accumulators

use std::fmt;

use super::TrackMode;

/// Signed relative motion pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Motion {
    pub x: i16,
    pub y: i16,
}

impl Motion {
    pub const ZERO: Motion = Motion { x: 0, y: 0 };

    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Component-wise addition that stops at the i16 bounds
    pub fn saturating_add(self, other: Motion) -> Motion {
        Motion {
            x: self.x.saturating_add(other.x),
            y: self.y.saturating_add(other.y),
        }
    }

    /// `|x| + |y|`, widened so it cannot overflow
    pub fn manhattan(self) -> i32 {
        i32::from(self.x).abs() + i32::from(self.y).abs()
    }

    pub fn is_zero(self) -> bool {
        self == Motion::ZERO
    }
}

impl From<(i16, i16)> for Motion {
    fn from((x, y): (i16, i16)) -> Self {
        Motion { x, y }
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Trackball state carried across ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackballState {
    /// Current output encoding
    pub mode: TrackMode,
    /// Sum samples across ticks instead of using the latest one
    pub integration: bool,
    /// Motion accumulated by the tap and scroll modes
    pub cumulative: Motion,
    /// Latest sample, or the running sum in integration mode
    pub instant: Motion,
}

impl TrackballState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the output encoding. Accumulators are left as they are.
    pub fn set_mode(&mut self, mode: TrackMode) {
        if self.mode != mode {
            log::debug!("track mode {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Zero both the instant sample and the accumulator
    pub fn clear_motion(&mut self) {
        self.instant = Motion::ZERO;
        self.cumulative = Motion::ZERO;
    }
}
