// Trackrs Controller
// Entry points the host firmware calls: ticks, interrupts, key events, tap-dances, combos
//
// The controller itself is immutable after construction. All mutable state
// lives in an `EngineState` the caller owns and passes to every entry point.

use crate::combo::{on_mouse_button, ComboTable};
use crate::config::{ConfigError, LayerBinding, TrackConfig};
use crate::keycode::KeycodeTable;
use crate::platform::Platform;
use crate::state::EngineState;
use crate::sticky::{StickyKey, StickyTargets};
use crate::tap_dance::{classify, Gesture, TapDanceResult, TapDanceState};
use crate::tick::{self, SamplingMode, SamplingStrategy};
use crate::trackball::Motion;
use crate::Key;

/// Wires configuration, dispatch tables and the sampling strategy together.
#[derive(Debug)]
pub struct Controller {
    config: TrackConfig,
    targets: StickyTargets,
    keycodes: KeycodeTable,
    combos: ComboTable,
    sampling: Box<dyn SamplingStrategy>,
}

impl Controller {
    /// Build a controller from a validated configuration
    pub fn new(config: TrackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!(
            "controller ready: {} sampling, sticky term {}ms",
            config.sampling,
            config.sticky_term_ms
        );
        Ok(Self {
            targets: StickyTargets::from_config(&config),
            keycodes: KeycodeTable::standard(),
            combos: ComboTable::standard(),
            sampling: tick::for_mode(config.sampling),
            config,
        })
    }

    /// Fresh engine state for this configuration
    pub fn new_state(&self) -> EngineState {
        EngineState::new(&self.config)
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    pub fn keycodes(&self) -> &KeycodeTable {
        &self.keycodes
    }

    pub fn combos(&self) -> &ComboTable {
        &self.combos
    }

    pub fn sampling_mode(&self) -> SamplingMode {
        self.sampling.mode()
    }

    /// Scheduler tick: run the sampling strategy, then drop expired sticky keys
    pub fn on_tick<P: Platform>(&self, state: &mut EngineState, platform: &mut P) {
        self.sampling.on_tick(state, platform);

        if state.sticky.is_expired(&*platform, self.config.sticky_term_ms) {
            state.sticky.expire(&self.targets, platform);
        }
    }

    /// Sensor motion interrupt
    pub fn on_sensor_interrupt<P: Platform>(&self, state: &mut EngineState, platform: &mut P) {
        self.sampling.on_sensor_interrupt(state, platform);
    }

    /// Key event from the dispatch framework.
    ///
    /// Returns `false` when the event was consumed and `true` when default
    /// processing should continue.
    pub fn on_key_event<P: Platform>(
        &self,
        state: &mut EngineState,
        platform: &mut P,
        key: Key,
        pressed: bool,
    ) -> bool {
        self.keycodes.handle(key, pressed, state, platform)
    }

    /// Combo event by combo index. Unknown indices are ignored.
    pub fn on_combo_event<P: Platform>(&self, platform: &mut P, index: usize, pressed: bool) {
        match self.combos.get(index) {
            Some(combo) => on_mouse_button(platform, combo.button(), pressed),
            None => log::warn!("unknown combo index {}", index),
        }
    }

    /// Tap-dance resolved. The classification is kept for the matching reset.
    pub fn on_gesture_finished<P: Platform>(
        &self,
        state: &mut EngineState,
        platform: &mut P,
        gesture: Gesture,
        dance: &TapDanceState,
    ) {
        let result = classify(dance);
        state.gestures.record(gesture, result);
        log::debug!("{} finished as {:?}", gesture, result);

        let now = platform.now_ms();
        match gesture {
            Gesture::Escape => self.escape_finished(state, platform, result, now),
            Gesture::Lower => {
                self.layer_finished(state, platform, StickyKey::Lower, self.config.lower, result, now)
            }
            Gesture::Raise => {
                self.layer_finished(state, platform, StickyKey::Raise, self.config.raise, result, now)
            }
            _ => {
                if let Some(key) = gesture.sticky_key() {
                    self.modifier_finished(state, platform, key, result, now);
                }
            }
        }
    }

    /// Tap-dance reset, consuming the result captured when it finished
    pub fn on_gesture_reset<P: Platform>(
        &self,
        state: &mut EngineState,
        platform: &mut P,
        gesture: Gesture,
    ) {
        let held = state.gestures.take(gesture) == Some(TapDanceResult::SingleHold);

        let layer = match gesture {
            Gesture::Lower => Some(self.config.lower),
            Gesture::Raise => Some(self.config.raise),
            _ => None,
        };
        let integrates = layer.is_some_and(|binding| binding.integrate_on_hold);

        if integrates {
            state.trackball.clear_motion();
        }
        if held {
            if integrates {
                state.trackball.integration = false;
            }
            state.sticky.release_all(&self.targets, platform);
        }
    }

    fn modifier_finished<P: Platform>(
        &self,
        state: &mut EngineState,
        platform: &mut P,
        key: StickyKey,
        result: TapDanceResult,
        now: u32,
    ) {
        match result {
            TapDanceResult::SingleTap => {
                state.sticky.arm(key, now);
                let mode = key
                    .modifier()
                    .and_then(|m| self.config.modes.for_modifier(m));
                if let Some(mode) = mode {
                    state.trackball.set_mode(mode);
                }
            }
            TapDanceResult::SingleHold => {
                state.sticky.arm(key, now);
                state.sticky.assert_pending(&self.targets, platform);
                state.sticky.disarm();
            }
            TapDanceResult::Other(count) => {
                log::trace!("{} pressed {} times, ignored", key, count);
            }
        }
    }

    fn layer_finished<P: Platform>(
        &self,
        state: &mut EngineState,
        platform: &mut P,
        key: StickyKey,
        binding: LayerBinding,
        result: TapDanceResult,
        now: u32,
    ) {
        let held = match result {
            TapDanceResult::SingleTap => false,
            TapDanceResult::SingleHold => true,
            TapDanceResult::Other(count) => {
                log::trace!("{} pressed {} times, ignored", key, count);
                return;
            }
        };

        state.sticky.arm(key, now);
        platform.layer_on(binding.layer);
        state.sticky.mark_active(key);
        if binding.integrate_on_hold {
            state.trackball.instant = Motion::ZERO;
        }

        if held {
            if binding.integrate_on_hold {
                state.trackball.integration = true;
            }
            state.sticky.assert_pending(&self.targets, platform);
            state.sticky.disarm();
        }
    }

    fn escape_finished<P: Platform>(
        &self,
        state: &mut EngineState,
        platform: &mut P,
        result: TapDanceResult,
        now: u32,
    ) {
        state.sticky.touch(now);
        match result {
            TapDanceResult::SingleTap => platform.tap_key(Key::ESC),
            TapDanceResult::SingleHold => state.trackball.set_mode(self.config.modes.escape_hold),
            TapDanceResult::Other(count) => {
                log::trace!("escape pressed {} times, ignored", count);
            }
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        let config = TrackConfig::default();
        Self {
            targets: StickyTargets::from_config(&config),
            keycodes: KeycodeTable::standard(),
            combos: ComboTable::standard(),
            sampling: tick::for_mode(config.sampling),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MouseButton;
    use crate::sim::RecordingPlatform;
    use crate::trackball::TrackMode;
    use crate::Modifier;

    fn setup() -> (Controller, EngineState, RecordingPlatform) {
        let controller = Controller::default();
        let state = controller.new_state();
        (controller, state, RecordingPlatform::new())
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = TrackConfig {
            scroll_threshold: 3,
            ..TrackConfig::default()
        };
        assert!(Controller::new(config).is_err());
    }

    #[test]
    fn test_tap_switches_mode_and_arms() {
        let (controller, mut state, mut platform) = setup();
        platform.set_time(100);
        controller.on_gesture_finished(&mut state, &mut platform, Gesture::Alt, &TapDanceState::tap());

        assert_eq!(state.trackball.mode, TrackMode::Caret);
        assert!(state.sticky.is_pending(StickyKey::Alt));
        assert_eq!(state.sticky.timer(), Some(100));
        assert!(platform.mods().is_empty());
    }

    #[test]
    fn test_hold_asserts_and_reset_releases() {
        let (controller, mut state, mut platform) = setup();
        controller.on_gesture_finished(&mut state, &mut platform, Gesture::Ctrl, &TapDanceState::hold());

        assert!(platform.mods().contains(Modifier::LeftCtrl));
        assert!(state.sticky.is_active(StickyKey::Ctrl));
        assert!(!state.sticky.any_pending());
        assert_eq!(state.trackball.mode, TrackMode::Cursor);

        controller.on_gesture_reset(&mut state, &mut platform, Gesture::Ctrl);
        assert!(platform.mods().is_empty());
        assert!(!state.sticky.is_active(StickyKey::Ctrl));
    }

    #[test]
    fn test_other_is_ignored() {
        let (controller, mut state, mut platform) = setup();
        let dance = TapDanceState {
            count: 2,
            pressed: false,
        };
        controller.on_gesture_finished(&mut state, &mut platform, Gesture::Gui, &dance);
        controller.on_gesture_reset(&mut state, &mut platform, Gesture::Gui);

        assert!(!state.sticky.any_pending());
        assert!(!state.sticky.is_pending(StickyKey::Gui));
        assert_eq!(state.trackball.mode, TrackMode::Cursor);
        assert!(platform.events().is_empty());
    }

    #[test]
    fn test_escape_tap_and_hold() {
        let (controller, mut state, mut platform) = setup();
        platform.set_time(7);
        controller.on_gesture_finished(&mut state, &mut platform, Gesture::Escape, &TapDanceState::tap());
        assert_eq!(platform.tapped_keys(), vec![Key::ESC]);
        assert_eq!(state.sticky.timer(), Some(7));
        assert!(!state.sticky.any_pending());

        controller.on_gesture_finished(&mut state, &mut platform, Gesture::Escape, &TapDanceState::hold());
        assert_eq!(state.trackball.mode, TrackMode::Scroll);
        assert!(platform.mods().is_empty());
    }

    #[test]
    fn test_combo_event_routes_to_button() {
        let (controller, _state, mut platform) = setup();
        controller.on_combo_event(&mut platform, 1, true);
        assert!(platform.report().is_pressed(MouseButton::Button1));
        controller.on_combo_event(&mut platform, 1, false);
        assert!(!platform.report().is_pressed(MouseButton::Button1));

        controller.on_combo_event(&mut platform, 9, true);
        assert_eq!(platform.sent_reports().len(), 2);
    }

    #[test]
    fn test_sampling_mode_from_config() {
        let config = TrackConfig {
            sampling: SamplingMode::Interrupt,
            ..TrackConfig::default()
        };
        let controller = Controller::new(config).unwrap();
        assert_eq!(controller.sampling_mode(), SamplingMode::Interrupt);
        assert_eq!(Controller::default().sampling_mode(), SamplingMode::Polling);
    }
}
