// Trackrs Mouse Report
// HID mouse report composed by the mode engine and the button translator

use std::fmt;

use strum_macros::{Display, EnumCount, EnumIter, EnumString};

use crate::Key;

/// HID boot-protocol style mouse report.
///
/// `x`/`y` carry cursor deltas, `h`/`v` carry horizontal and vertical scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseReport {
    pub buttons: u8,
    pub x: i8,
    pub y: i8,
    pub h: i8,
    pub v: i8,
}

impl MouseReport {
    /// Whether a button bit is set in this report
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons & button.bit() != 0
    }

    /// Set or clear a button bit
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons |= button.bit();
        } else {
            self.buttons &= !button.bit();
        }
    }

    /// Copy of this report with motion and scroll cleared and buttons kept
    pub fn without_motion(&self) -> Self {
        MouseReport {
            buttons: self.buttons,
            ..MouseReport::default()
        }
    }
}

impl fmt::Display for MouseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "buttons={:#07b} x={} y={} h={} v={}",
            self.buttons, self.x, self.y, self.h, self.v
        )
    }
}

/// The five mouse buttons a report can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum MouseButton {
    #[strum(to_string = "Button1", serialize = "Left", serialize = "BTN1")]
    Button1,
    #[strum(to_string = "Button2", serialize = "Right", serialize = "BTN2")]
    Button2,
    #[strum(to_string = "Button3", serialize = "Middle", serialize = "BTN3")]
    Button3,
    #[strum(to_string = "Button4", serialize = "Back", serialize = "BTN4")]
    Button4,
    #[strum(to_string = "Button5", serialize = "Forward", serialize = "BTN5")]
    Button5,
}

impl MouseButton {
    /// Bit of this button in [`MouseReport::buttons`]
    pub const fn bit(self) -> u8 {
        match self {
            MouseButton::Button1 => 1 << 0,
            MouseButton::Button2 => 1 << 1,
            MouseButton::Button3 => 1 << 2,
            MouseButton::Button4 => 1 << 3,
            MouseButton::Button5 => 1 << 4,
        }
    }

    /// Button for one of the BTN1..BTN5 keycodes
    pub fn from_key(key: Key) -> Option<MouseButton> {
        match key {
            Key::BTN1 => Some(MouseButton::Button1),
            Key::BTN2 => Some(MouseButton::Button2),
            Key::BTN3 => Some(MouseButton::Button3),
            Key::BTN4 => Some(MouseButton::Button4),
            Key::BTN5 => Some(MouseButton::Button5),
            _ => None,
        }
    }
}

/// Clamp a computed delta into the signed range a HID report field accepts.
///
/// The range is symmetric, -128 is never produced.
pub fn clamp_hid(value: i32) -> i8 {
    value.clamp(-127, 127) as i8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_hid() {
        assert_eq!(clamp_hid(0), 0);
        assert_eq!(clamp_hid(127), 127);
        assert_eq!(clamp_hid(500), 127);
        assert_eq!(clamp_hid(-128), -127);
        assert_eq!(clamp_hid(-40_000), -127);
    }

    #[test]
    fn test_set_button() {
        let mut report = MouseReport::default();
        report.set_button(MouseButton::Button3, true);
        assert_eq!(report.buttons, 0b100);
        assert!(report.is_pressed(MouseButton::Button3));

        report.set_button(MouseButton::Button1, true);
        report.set_button(MouseButton::Button3, false);
        assert_eq!(report.buttons, 0b001);
    }

    #[test]
    fn test_without_motion_keeps_buttons() {
        let report = MouseReport {
            buttons: 0b10,
            x: 5,
            y: -3,
            h: 1,
            v: 2,
        };
        let cleared = report.without_motion();
        assert_eq!(cleared.buttons, 0b10);
        assert_eq!((cleared.x, cleared.y, cleared.h, cleared.v), (0, 0, 0, 0));
    }

    #[test]
    fn test_button_from_key() {
        assert_eq!(MouseButton::from_key(Key::BTN2), Some(MouseButton::Button2));
        assert_eq!(MouseButton::from_key(Key::SPACE), None);
        assert_eq!("middle".parse::<MouseButton>(), Ok(MouseButton::Button3));
    }
}
