// Trackrs Mode Engine
// Converts trackball motion into cursor deltas, scroll deltas or key taps
//
// The engine is split in two: `apply_motion` is pure state arithmetic and
// returns a `MotionOutput`, `emit` pushes that output to the platform.

use smallvec::SmallVec;

use super::{ModeThresholds, Motion, TrackMode, TrackballState};
use crate::platform::{HostKeyboard, PointerReport};
use crate::report::clamp_hid;
use crate::Key;

/// Result of one engine step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotionOutput {
    /// Cursor deltas for the mouse report
    Pointer { x: i8, y: i8 },
    /// Scroll deltas for the mouse report (both zero below threshold)
    Scroll { h: i8, v: i8 },
    /// Discrete key taps, in emission order (possibly none)
    Taps(SmallVec<[Key; 8]>),
}

/// Keys tapped for each direction by the discretizing modes
#[derive(Debug, Clone, Copy)]
struct DirectionKeys {
    right: Key,
    left: Key,
    up: Key,
    down: Key,
}

const ARROW_KEYS: DirectionKeys = DirectionKeys {
    right: Key::RIGHT,
    left: Key::LEFT,
    up: Key::UP,
    down: Key::DOWN,
};

const MEDIA_KEYS: DirectionKeys = DirectionKeys {
    right: Key::BRIGHTNESS_UP,
    left: Key::BRIGHTNESS_DOWN,
    up: Key::VOLUME_UP,
    down: Key::VOLUME_DOWN,
};

/// Run one engine step for the current mode.
///
/// Cursor mode scales `instant` directly. Every other mode first adds
/// `instant` into `cumulative` and then consumes from it.
pub fn apply_motion(state: &mut TrackballState, thresholds: &ModeThresholds) -> MotionOutput {
    match state.mode {
        TrackMode::Cursor => {
            let multiplier = i32::from(thresholds.cursor_factor(state.integration));
            MotionOutput::Pointer {
                x: clamp_hid(i32::from(state.instant.x) * multiplier / 100),
                y: clamp_hid(-i32::from(state.instant.y) * multiplier / 100),
            }
        }
        TrackMode::Caret => {
            accumulate(state);
            let threshold = thresholds.caret_factor(state.integration);
            MotionOutput::Taps(discretize(&mut state.cumulative, threshold, &ARROW_KEYS))
        }
        TrackMode::Scroll => {
            accumulate(state);
            let threshold = thresholds.scroll_factor(state.integration);
            scroll(&mut state.cumulative, threshold)
        }
        TrackMode::Media => {
            accumulate(state);
            let threshold = thresholds.media_factor();
            MotionOutput::Taps(discretize(&mut state.cumulative, threshold, &MEDIA_KEYS))
        }
    }
}

/// Deliver an engine output.
///
/// Report outputs are a read-modify-write of the current report (buttons and
/// the untouched axes survive) and are always sent, even when zero. Tap
/// outputs send no report.
pub fn emit<P>(output: &MotionOutput, platform: &mut P)
where
    P: HostKeyboard + PointerReport + ?Sized,
{
    match output {
        MotionOutput::Pointer { x, y } => {
            let mut report = platform.get_report();
            report.x = *x;
            report.y = *y;
            platform.set_report(report);
            platform.send_report();
        }
        MotionOutput::Scroll { h, v } => {
            let mut report = platform.get_report();
            report.h = *h;
            report.v = *v;
            platform.set_report(report);
            platform.send_report();
        }
        MotionOutput::Taps(keys) => {
            if !keys.is_empty() {
                log::trace!("tapping {} key(s), first {}", keys.len(), keys[0]);
            }
            for key in keys {
                platform.tap_key(*key);
            }
        }
    }
}

fn accumulate(state: &mut TrackballState) {
    state.cumulative = state.cumulative.saturating_add(state.instant);
}

/// Move `value` one threshold toward zero without crossing it
fn step_toward_zero(value: i32, threshold: i32) -> i32 {
    if value > 0 {
        (value - threshold).max(0)
    } else {
        (value + threshold).min(0)
    }
}

/// Turn accumulated motion into taps on the dominant axis.
///
/// Nothing happens until `|x| + |y|` reaches the threshold. Then the
/// dominant axis (vertical on ties) is tapped while the tap index does not
/// exceed the remaining `(|x| + |y|) / threshold`, stepping that axis toward
/// zero each time; the other axis is dropped. Sub-threshold remainder on the
/// dominant axis is kept for later ticks.
fn discretize(cumulative: &mut Motion, threshold: u16, keys: &DirectionKeys) -> SmallVec<[Key; 8]> {
    let threshold = i32::from(threshold.max(1));
    let mut taps = SmallVec::new();

    let mut x = i32::from(cumulative.x);
    let mut y = i32::from(cumulative.y);
    if x.abs() + y.abs() < threshold {
        return taps;
    }

    if x.abs() > y.abs() {
        let key = if x > 0 { keys.right } else { keys.left };
        let mut i = 0;
        while i <= (x.abs() + y.abs()) / threshold {
            taps.push(key);
            x = step_toward_zero(x, threshold);
            i += 1;
        }
        y = 0;
    } else {
        let key = if y > 0 { keys.up } else { keys.down };
        let mut i = 0;
        while i <= (x.abs() + y.abs()) / threshold {
            taps.push(key);
            y = step_toward_zero(y, threshold);
            i += 1;
        }
        x = 0;
    }

    // Both values only moved toward zero, so they still fit in i16
    cumulative.x = x as i16;
    cumulative.y = y as i16;
    taps
}

/// Turn accumulated motion into one scroll delta on the dominant axis.
///
/// Unlike the tap modes, both accumulators are zeroed once a delta is
/// produced, so the remainder is dropped.
fn scroll(cumulative: &mut Motion, threshold: u16) -> MotionOutput {
    let threshold = i32::from(threshold.max(1));
    let total = cumulative.manhattan();
    if total < threshold {
        return MotionOutput::Scroll { h: 0, v: 0 };
    }

    let x = i32::from(cumulative.x);
    let y = i32::from(cumulative.y);
    let output = if x.abs() > y.abs() {
        MotionOutput::Scroll {
            h: clamp_hid(x.signum() * total / threshold),
            v: 0,
        }
    } else {
        MotionOutput::Scroll {
            h: 0,
            v: clamp_hid(y.signum() * total / threshold),
        }
    };
    *cumulative = Motion::ZERO;
    output
}
