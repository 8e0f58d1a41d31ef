// Trackrs Custom Keycodes
// Dispatch table from firmware keycodes to their actions

use indexmap::IndexMap;

use crate::combo::on_mouse_button;
use crate::platform::{HostKeyboard, PointerReport};
use crate::report::MouseButton;
use crate::state::EngineState;
use crate::sticky::StickyKey;
use crate::{Key, Modifier, ModifierSet};

/// Action bound to a custom keycode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHandler {
    /// Tap `key` with the current Shift state inverted
    InvertShift(Key),
    /// Tap `key` (optionally shifted) followed by Space, for dead-key layouts
    BareSymbol { key: Key, shifted: bool },
    /// Press or release a mouse button
    Mouse(MouseButton),
    CpiDown,
    CpiUp,
    CpiReset,
    ToggleSmoothScroll,
}

impl KeyHandler {
    /// Whether the handler also acts on key release
    pub fn acts_on_release(self) -> bool {
        matches!(self, KeyHandler::Mouse(_))
    }

    fn run<P>(self, pressed: bool, state: &mut EngineState, platform: &mut P)
    where
        P: HostKeyboard + PointerReport + ?Sized,
    {
        if !pressed && !self.acts_on_release() {
            return;
        }

        let shift = ModifierSet::from(Modifier::LeftShift);
        let shift_active = state.sticky.is_active(StickyKey::Shift);
        match self {
            KeyHandler::InvertShift(key) => {
                if shift_active {
                    platform.unregister_mods(shift);
                    platform.tap_key(key);
                    platform.register_mods(shift);
                } else {
                    platform.register_mods(shift);
                    platform.tap_key(key);
                    platform.unregister_mods(shift);
                }
            }
            KeyHandler::BareSymbol { key, shifted } => {
                let wrap = shifted && !shift_active;
                if wrap {
                    platform.register_mods(shift);
                }
                platform.tap_key(key);
                if wrap {
                    platform.unregister_mods(shift);
                }
                platform.tap_key(Key::SPACE);
            }
            KeyHandler::Mouse(button) => on_mouse_button(platform, button, pressed),
            KeyHandler::CpiDown => state.thresholds.cpi_down(),
            KeyHandler::CpiUp => state.thresholds.cpi_up(),
            KeyHandler::CpiReset => state.thresholds.cpi_reset(),
            KeyHandler::ToggleSmoothScroll => state.thresholds.toggle_smooth_scroll(),
        }
    }
}

/// Keycode to handler map, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeycodeTable {
    handlers: IndexMap<Key, KeyHandler>,
}

impl KeycodeTable {
    pub fn new() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// The firmware's keycode set
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.insert(Key::SCLN_INV, KeyHandler::InvertShift(Key::SEMICOLON));
        table.insert(
            Key::QUOT_MY,
            KeyHandler::BareSymbol {
                key: Key::APOSTROPHE,
                shifted: false,
            },
        );
        table.insert(
            Key::TILD_MY,
            KeyHandler::BareSymbol {
                key: Key::GRAVE,
                shifted: true,
            },
        );
        for key in [Key::BTN1, Key::BTN2, Key::BTN3, Key::BTN4, Key::BTN5] {
            if let Some(button) = MouseButton::from_key(key) {
                table.insert(key, KeyHandler::Mouse(button));
            }
        }
        table.insert(Key::CPI_DOWN, KeyHandler::CpiDown);
        table.insert(Key::CPI_STD, KeyHandler::CpiReset);
        table.insert(Key::CPI_UP, KeyHandler::CpiUp);
        table.insert(Key::SMO_SC, KeyHandler::ToggleSmoothScroll);
        table
    }

    /// Bind a handler, returning the one it replaced
    pub fn insert(&mut self, key: Key, handler: KeyHandler) -> Option<KeyHandler> {
        self.handlers.insert(key, handler)
    }

    pub fn get(&self, key: Key) -> Option<KeyHandler> {
        self.handlers.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &KeyHandler)> {
        self.handlers.iter()
    }

    /// Process a key event.
    ///
    /// Returns `false` when the key belongs to this table (handled, stop
    /// processing) and `true` to let default processing continue.
    pub fn handle<P>(&self, key: Key, pressed: bool, state: &mut EngineState, platform: &mut P) -> bool
    where
        P: HostKeyboard + PointerReport + ?Sized,
    {
        match self.get(key) {
            Some(handler) => {
                log::trace!("{} {} -> {:?}", key, if pressed { "down" } else { "up" }, handler);
                handler.run(pressed, state, platform);
                false
            }
            None => true,
        }
    }
}

impl Default for KeycodeTable {
    fn default() -> Self {
        Self::standard()
    }
}
