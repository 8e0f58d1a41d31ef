// Trackrs Simulation Platform
// In-memory Platform that records every side effect the engine produces
//
// Used by the tests and by the replay tool. Motion comes from a queue,
// time is set by hand, and every host call is appended to an event log.

#[cfg(feature = "host")]
pub mod script;

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;

use crate::platform::{Clock, HostKeyboard, MotionSensor, PointerReport, SplitRole};
use crate::report::MouseReport;
use crate::trackball::Motion;
use crate::{Key, ModifierSet};

/// One host-visible side effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEvent {
    RegisterMods(ModifierSet),
    UnregisterMods(ModifierSet),
    KeyDown(Key),
    KeyUp(Key),
    LayerOn(u8),
    LayerOff(u8),
    /// A transmitted mouse report
    Report(MouseReport),
}

impl fmt::Display for OutputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputEvent::RegisterMods(mods) => write!(f, "mods +{}", mods),
            OutputEvent::UnregisterMods(mods) => write!(f, "mods -{}", mods),
            OutputEvent::KeyDown(key) => write!(f, "key down {}", key),
            OutputEvent::KeyUp(key) => write!(f, "key up {}", key),
            OutputEvent::LayerOn(layer) => write!(f, "layer on {}", layer),
            OutputEvent::LayerOff(layer) => write!(f, "layer off {}", layer),
            OutputEvent::Report(report) => write!(f, "report {}", report),
        }
    }
}

/// Recording implementation of every platform trait.
#[derive(Debug, Clone)]
pub struct RecordingPlatform {
    motion: VecDeque<Motion>,
    now: u32,
    primary: bool,
    mods: ModifierSet,
    pressed: HashSet<Key>,
    layers: BTreeSet<u8>,
    report: MouseReport,
    events: Vec<OutputEvent>,
}

impl Default for RecordingPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPlatform {
    /// Primary half at time zero with nothing queued
    pub fn new() -> Self {
        Self {
            motion: VecDeque::new(),
            now: 0,
            primary: true,
            mods: ModifierSet::EMPTY,
            pressed: HashSet::new(),
            layers: BTreeSet::new(),
            report: MouseReport::default(),
            events: Vec::new(),
        }
    }

    /// Queue one sensor sample
    pub fn push_motion(&mut self, motion: Motion) {
        self.motion.push_back(motion);
    }

    /// Samples queued but not yet read
    pub fn pending_motion(&self) -> usize {
        self.motion.len()
    }

    pub fn set_primary(&mut self, primary: bool) {
        self.primary = primary;
    }

    pub fn set_time(&mut self, now: u32) {
        self.now = now;
    }

    /// Move the clock forward, wrapping like a hardware counter
    pub fn advance(&mut self, ms: u32) {
        self.now = self.now.wrapping_add(ms);
    }

    pub fn events(&self) -> &[OutputEvent] {
        &self.events
    }

    /// Drain the event log
    pub fn take_events(&mut self) -> Vec<OutputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Keys pressed so far, in order
    pub fn tapped_keys(&self) -> Vec<Key> {
        self.events
            .iter()
            .filter_map(|event| match event {
                OutputEvent::KeyDown(key) => Some(*key),
                _ => None,
            })
            .collect()
    }

    /// Reports transmitted so far, in order
    pub fn sent_reports(&self) -> Vec<MouseReport> {
        self.events
            .iter()
            .filter_map(|event| match event {
                OutputEvent::Report(report) => Some(*report),
                _ => None,
            })
            .collect()
    }

    /// Modifiers currently registered
    pub fn mods(&self) -> ModifierSet {
        self.mods
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn layer_active(&self, layer: u8) -> bool {
        self.layers.contains(&layer)
    }

    pub fn active_layers(&self) -> Vec<u8> {
        self.layers.iter().copied().collect()
    }

    /// Report as it would be sent next
    pub fn report(&self) -> MouseReport {
        self.report
    }
}

impl MotionSensor for RecordingPlatform {
    fn read_motion(&mut self) -> Motion {
        self.motion.pop_front().unwrap_or_default()
    }
}

impl HostKeyboard for RecordingPlatform {
    fn register_mods(&mut self, mods: ModifierSet) {
        self.mods.extend(mods);
        self.events.push(OutputEvent::RegisterMods(mods));
    }

    fn unregister_mods(&mut self, mods: ModifierSet) {
        self.mods.subtract(mods);
        self.events.push(OutputEvent::UnregisterMods(mods));
    }

    fn register_key(&mut self, key: Key) {
        self.pressed.insert(key);
        self.events.push(OutputEvent::KeyDown(key));
    }

    fn unregister_key(&mut self, key: Key) {
        self.pressed.remove(&key);
        self.events.push(OutputEvent::KeyUp(key));
    }

    fn layer_on(&mut self, layer: u8) {
        self.layers.insert(layer);
        self.events.push(OutputEvent::LayerOn(layer));
    }

    fn layer_off(&mut self, layer: u8) {
        self.layers.remove(&layer);
        self.events.push(OutputEvent::LayerOff(layer));
    }
}

impl PointerReport for RecordingPlatform {
    fn get_report(&self) -> MouseReport {
        self.report
    }

    fn set_report(&mut self, report: MouseReport) {
        self.report = report;
    }

    /// Motion fields are one-shot: after sending, only the buttons remain
    fn send_report(&mut self) {
        self.events.push(OutputEvent::Report(self.report));
        self.report = self.report.without_motion();
    }
}

impl Clock for RecordingPlatform {
    fn now_ms(&self) -> u32 {
        self.now
    }
}

impl SplitRole for RecordingPlatform {
    fn is_primary(&self) -> bool {
        self.primary
    }
}
