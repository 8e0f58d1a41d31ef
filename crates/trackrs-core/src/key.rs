// Trackrs Key Type
// Key codes follow Linux input-event-codes.h; firmware-only codes live above CUSTOM_BASE

use std::fmt;
use std::str::FromStr;

/// Represents a single keyboard key code.
///
/// This is a newtype wrapper around u16 for type safety.
/// Values below [`Key::CUSTOM_BASE`] match Linux input-event-codes.h definitions,
/// values at or above it are keycodes that only the firmware understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Key(pub u16);

impl Key {
    pub const ESC: Key = Key(1);
    pub const R: Key = Key(19);
    pub const T: Key = Key(20);
    pub const LEFT_CTRL: Key = Key(29);
    pub const S: Key = Key(31);
    pub const SEMICOLON: Key = Key(39);
    pub const APOSTROPHE: Key = Key(40);
    pub const GRAVE: Key = Key(41);
    pub const LEFT_SHIFT: Key = Key(42);
    pub const LEFT_ALT: Key = Key(56);
    pub const SPACE: Key = Key(57);
    pub const UP: Key = Key(103);
    pub const LEFT: Key = Key(105);
    pub const RIGHT: Key = Key(106);
    pub const DOWN: Key = Key(108);
    pub const VOLUME_DOWN: Key = Key(114);
    pub const VOLUME_UP: Key = Key(115);
    pub const LEFT_META: Key = Key(125);
    pub const BRIGHTNESS_DOWN: Key = Key(224);
    pub const BRIGHTNESS_UP: Key = Key(225);

    // Mouse buttons share the BTN_* range of input-event-codes.h
    pub const BTN1: Key = Key(0x110);
    pub const BTN2: Key = Key(0x111);
    pub const BTN3: Key = Key(0x112);
    pub const BTN4: Key = Key(0x113);
    pub const BTN5: Key = Key(0x114);

    /// First code reserved for firmware keycodes
    pub const CUSTOM_BASE: u16 = 0x300;

    /// Semicolon with the current Shift state inverted
    pub const SCLN_INV: Key = Key(Self::CUSTOM_BASE);
    /// Bare apostrophe on dead-key layouts
    pub const QUOT_MY: Key = Key(Self::CUSTOM_BASE + 1);
    /// Bare tilde on dead-key layouts
    pub const TILD_MY: Key = Key(Self::CUSTOM_BASE + 2);
    pub const CPI_DOWN: Key = Key(Self::CUSTOM_BASE + 3);
    pub const CPI_STD: Key = Key(Self::CUSTOM_BASE + 4);
    pub const CPI_UP: Key = Key(Self::CUSTOM_BASE + 5);
    /// Smooth scroll toggle
    pub const SMO_SC: Key = Key(Self::CUSTOM_BASE + 6);

    /// Get the name of this key
    pub fn name(self) -> &'static str {
        key_name(self.0)
    }
}

impl From<u16> for Key {
    fn from(code: u16) -> Self {
        Key(code)
    }
}

impl From<Key> for u16 {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        key_from_name(s).ok_or_else(|| format!("Unknown key: {}", s))
    }
}

const KEY_NAMES: &[(u16, &str)] = &[
    (1, "ESC"),
    (2, "KEY_1"),
    (3, "KEY_2"),
    (4, "KEY_3"),
    (5, "KEY_4"),
    (6, "KEY_5"),
    (7, "KEY_6"),
    (8, "KEY_7"),
    (9, "KEY_8"),
    (10, "KEY_9"),
    (11, "KEY_0"),
    (12, "MINUS"),
    (13, "EQUAL"),
    (14, "BACKSPACE"),
    (15, "TAB"),
    (16, "Q"),
    (17, "W"),
    (18, "E"),
    (19, "R"),
    (20, "T"),
    (21, "Y"),
    (22, "U"),
    (23, "I"),
    (24, "O"),
    (25, "P"),
    (26, "LEFT_BRACE"),
    (27, "RIGHT_BRACE"),
    (28, "ENTER"),
    (29, "LEFT_CTRL"),
    (30, "A"),
    (31, "S"),
    (32, "D"),
    (33, "F"),
    (34, "G"),
    (35, "H"),
    (36, "J"),
    (37, "K"),
    (38, "L"),
    (39, "SEMICOLON"),
    (40, "APOSTROPHE"),
    (41, "GRAVE"),
    (42, "LEFT_SHIFT"),
    (43, "BACKSLASH"),
    (44, "Z"),
    (45, "X"),
    (46, "C"),
    (47, "V"),
    (48, "B"),
    (49, "N"),
    (50, "M"),
    (51, "COMMA"),
    (52, "DOT"),
    (53, "SLASH"),
    (54, "RIGHT_SHIFT"),
    (56, "LEFT_ALT"),
    (57, "SPACE"),
    (58, "CAPSLOCK"),
    (97, "RIGHT_CTRL"),
    (100, "RIGHT_ALT"),
    (102, "HOME"),
    (103, "UP"),
    (104, "PAGE_UP"),
    (105, "LEFT"),
    (106, "RIGHT"),
    (107, "END"),
    (108, "DOWN"),
    (109, "PAGE_DOWN"),
    (110, "INSERT"),
    (111, "DELETE"),
    (113, "MUTE"),
    (114, "VOLUMEDOWN"),
    (115, "VOLUMEUP"),
    (125, "LEFT_META"),
    (126, "RIGHT_META"),
    (224, "BRIGHTNESSDOWN"),
    (225, "BRIGHTNESSUP"),
    (0x110, "BTN1"),
    (0x111, "BTN2"),
    (0x112, "BTN3"),
    (0x113, "BTN4"),
    (0x114, "BTN5"),
    (Key::CUSTOM_BASE, "SCLN_INV"),
    (Key::CUSTOM_BASE + 1, "QUOT_MY"),
    (Key::CUSTOM_BASE + 2, "TILD_MY"),
    (Key::CUSTOM_BASE + 3, "CPI_DOWN"),
    (Key::CUSTOM_BASE + 4, "CPI_STD"),
    (Key::CUSTOM_BASE + 5, "CPI_UP"),
    (Key::CUSTOM_BASE + 6, "SMO_SC"),
];

/// Display name for a key code
pub fn key_name(code: u16) -> &'static str {
    KEY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or("UNKNOWN")
}

/// Look up a key by name (case-insensitive, optional `KC_` prefix) or numeric code.
///
/// Numeric codes may be decimal (`"30"`) or hex (`"0x110"`).
pub fn key_from_name(name: &str) -> Option<Key> {
    let trimmed = name.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return u16::from_str_radix(hex, 16).ok().map(Key);
    }
    if let Ok(code) = trimmed.parse::<u16>() {
        return Some(Key(code));
    }

    let upper = trimmed.to_ascii_uppercase();
    let bare = upper.strip_prefix("KC_").unwrap_or(&upper);
    KEY_NAMES
        .iter()
        .find(|(_, n)| *n == bare)
        .map(|(code, _)| Key(*code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_name_roundtrip_for_known_codes() {
        assert_eq!(Key::ESC.name(), "ESC");
        assert_eq!(Key::BTN3.name(), "BTN3");
        assert_eq!(Key::SMO_SC.name(), "SMO_SC");
        assert_eq!(Key::from(0x2ff).name(), "UNKNOWN");
    }

    #[test]
    fn test_key_from_name_variants() {
        assert_eq!(key_from_name("right"), Some(Key::RIGHT));
        assert_eq!(key_from_name("KC_CPI_UP"), Some(Key::CPI_UP));
        assert_eq!(key_from_name("0x110"), Some(Key::BTN1));
        assert_eq!(key_from_name("30"), Some(Key::from(30)));
        assert_eq!(key_from_name("no_such_key"), None);
    }

    #[test]
    fn test_key_from_str_error() {
        let err = "bogus".parse::<Key>().unwrap_err();
        assert!(err.contains("bogus"));
    }
}
