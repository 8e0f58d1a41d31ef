// Trackrs Platform Interface
//
// This module defines the collaborators the engine drives: the motion
// sensor, the host keyboard/layer stack, the mouse report channel, a
// millisecond clock and the split-board role query.

use crate::report::MouseReport;
use crate::trackball::Motion;
use crate::{Key, ModifierSet};

/// Relative-motion pointing sensor.
pub trait MotionSensor {
    /// Read one motion sample. A failed read reports zero motion.
    fn read_motion(&mut self) -> Motion;
}

/// Key and layer side of the host firmware.
///
/// Registering something that is already registered is a no-op.
pub trait HostKeyboard {
    fn register_mods(&mut self, mods: ModifierSet);

    fn unregister_mods(&mut self, mods: ModifierSet);

    fn register_key(&mut self, key: Key);

    fn unregister_key(&mut self, key: Key);

    /// Press and immediately release a key, with no delay in between
    fn tap_key(&mut self, key: Key) {
        self.register_key(key);
        self.unregister_key(key);
    }

    fn layer_on(&mut self, layer: u8);

    fn layer_off(&mut self, layer: u8);
}

/// Mouse report channel.
pub trait PointerReport {
    /// Current (not yet sent) report
    fn get_report(&self) -> MouseReport;

    fn set_report(&mut self, report: MouseReport);

    /// Transmit the current report. Transmission is fire-and-forget.
    fn send_report(&mut self);
}

/// Monotonic millisecond counter.
pub trait Clock {
    fn now_ms(&self) -> u32;

    /// Milliseconds since `since`, tolerant of counter wrap-around
    fn elapsed_ms(&self, since: u32) -> u32 {
        self.now_ms().wrapping_sub(since)
    }
}

/// Split-board role query.
pub trait SplitRole {
    /// Whether this half owns the sensor and produces reports
    fn is_primary(&self) -> bool;
}

/// Everything the controller needs from the surrounding firmware.
pub trait Platform: MotionSensor + HostKeyboard + PointerReport + Clock + SplitRole {}

impl<T> Platform for T where T: MotionSensor + HostKeyboard + PointerReport + Clock + SplitRole {}
