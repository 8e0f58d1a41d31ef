// Trackrs Tap-Dance Classifier
// Tap-vs-hold classification and the per-gesture result captured between callbacks

use strum::EnumCount;
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, EnumString};

use crate::sticky::StickyKey;

/// Tap-dance keys the engine reacts to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCountMacro, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Gesture {
    #[strum(to_string = "Alt", serialize = "ALT_TM")]
    Alt,
    #[strum(to_string = "Shift", serialize = "SFT_TM")]
    Shift,
    #[strum(to_string = "Ctrl", serialize = "CTL_TM")]
    Ctrl,
    #[strum(to_string = "Gui", serialize = "GUI_TM")]
    Gui,
    #[strum(to_string = "Lower", serialize = "LOW_TM")]
    Lower,
    #[strum(to_string = "Raise", serialize = "RAI_TM")]
    Raise,
    #[strum(to_string = "Escape", serialize = "Esc", serialize = "ESC_TM")]
    Escape,
}

impl Gesture {
    /// Sticky key driven by this gesture. Escape has no sticky state of its own.
    pub fn sticky_key(self) -> Option<StickyKey> {
        match self {
            Gesture::Alt => Some(StickyKey::Alt),
            Gesture::Shift => Some(StickyKey::Shift),
            Gesture::Ctrl => Some(StickyKey::Ctrl),
            Gesture::Gui => Some(StickyKey::Gui),
            Gesture::Lower => Some(StickyKey::Lower),
            Gesture::Raise => Some(StickyKey::Raise),
            Gesture::Escape => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Progress of a tap-dance as reported by the dispatch framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TapDanceState {
    /// Number of presses so far
    pub count: u8,
    /// Whether the key is still down
    pub pressed: bool,
}

impl TapDanceState {
    pub const fn tap() -> Self {
        Self {
            count: 1,
            pressed: false,
        }
    }

    pub const fn hold() -> Self {
        Self {
            count: 1,
            pressed: true,
        }
    }
}

/// Outcome of a resolved tap-dance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapDanceResult {
    SingleTap,
    SingleHold,
    /// Anything but a single press; carries the press count
    Other(u8),
}

/// Classify a tap-dance at resolution time
pub fn classify(state: &TapDanceState) -> TapDanceResult {
    match (state.count, state.pressed) {
        (1, false) => TapDanceResult::SingleTap,
        (1, true) => TapDanceResult::SingleHold,
        (count, _) => TapDanceResult::Other(count),
    }
}

/// Results captured at "finished", one slot per gesture, consumed at "reset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GestureResults {
    results: [Option<TapDanceResult>; Gesture::COUNT],
}

impl GestureResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, gesture: Gesture, result: TapDanceResult) {
        self.results[gesture.index()] = Some(result);
    }

    /// Result captured for `gesture`, if its finished callback has run
    pub fn get(&self, gesture: Gesture) -> Option<TapDanceResult> {
        self.results[gesture.index()]
    }

    /// Remove and return the captured result
    pub fn take(&mut self, gesture: Gesture) -> Option<TapDanceResult> {
        self.results[gesture.index()].take()
    }
}
