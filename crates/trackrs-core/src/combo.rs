// Trackrs Mouse-Button Combos
// Two-key chords and the shared button translator they feed

use std::fmt;

use crate::platform::PointerReport;
use crate::report::MouseButton;
use crate::Key;

/// Two keys pressed together that act as a mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseCombo {
    keys: [Key; 2],
    button: MouseButton,
}

impl MouseCombo {
    pub const fn new(first: Key, second: Key, button: MouseButton) -> Self {
        Self {
            keys: [first, second],
            button,
        }
    }

    pub fn button(&self) -> MouseButton {
        self.button
    }

    /// Whether this combo is made of `a` and `b`, in either order
    pub fn matches(&self, a: Key, b: Key) -> bool {
        (self.keys[0] == a && self.keys[1] == b) || (self.keys[0] == b && self.keys[1] == a)
    }
}

impl fmt::Display for MouseCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{} -> {}", self.keys[0], self.keys[1], self.button)
    }
}

/// Combos indexed the way the dispatch framework reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboTable {
    combos: Vec<MouseCombo>,
}

impl ComboTable {
    /// R+S right click, S+T left click, R+T middle click
    pub fn standard() -> Self {
        Self {
            combos: vec![
                MouseCombo::new(Key::R, Key::S, MouseButton::Button2),
                MouseCombo::new(Key::S, Key::T, MouseButton::Button1),
                MouseCombo::new(Key::R, Key::T, MouseButton::Button3),
            ],
        }
    }

    pub fn get(&self, index: usize) -> Option<&MouseCombo> {
        self.combos.get(index)
    }

    /// Index of the combo made of `a` and `b`, order-independent
    pub fn find(&self, a: Key, b: Key) -> Option<usize> {
        self.combos.iter().position(|combo| combo.matches(a, b))
    }

    pub fn len(&self) -> usize {
        self.combos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MouseCombo> {
        self.combos.iter()
    }
}

impl Default for ComboTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Set or clear one button in the current report and send it right away
pub fn on_mouse_button<P>(platform: &mut P, button: MouseButton, pressed: bool)
where
    P: PointerReport + ?Sized,
{
    let mut report = platform.get_report();
    report.set_button(button, pressed);
    platform.set_report(report);
    platform.send_report();
    log::debug!(
        "{} {}",
        button,
        if pressed { "pressed" } else { "released" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MouseReport;
    use crate::sim::RecordingPlatform;

    #[test]
    fn test_standard_table() {
        let table = ComboTable::standard();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0).map(|c| c.button()), Some(MouseButton::Button2));
        assert_eq!(table.get(1).map(|c| c.button()), Some(MouseButton::Button1));
        assert_eq!(table.get(2).map(|c| c.button()), Some(MouseButton::Button3));
        assert!(table.get(3).is_none());
    }

    #[test]
    fn test_find_is_order_independent() {
        let table = ComboTable::standard();
        assert_eq!(table.find(Key::T, Key::S), Some(1));
        assert_eq!(table.find(Key::S, Key::T), Some(1));
        assert_eq!(table.find(Key::R, Key::T), Some(2));
        assert_eq!(table.find(Key::R, Key::R), None);
    }

    #[test]
    fn test_on_mouse_button_sends_immediately() {
        let mut platform = RecordingPlatform::new();
        on_mouse_button(&mut platform, MouseButton::Button3, true);
        on_mouse_button(&mut platform, MouseButton::Button1, true);
        on_mouse_button(&mut platform, MouseButton::Button3, false);

        let sent = platform.sent_reports();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].buttons, 0b100);
        assert_eq!(sent[1].buttons, 0b101);
        assert_eq!(sent[2].buttons, 0b001);
        assert_eq!(platform.report(), MouseReport { buttons: 0b001, ..MouseReport::default() });
    }

    #[test]
    fn test_display() {
        let combo = MouseCombo::new(Key::R, Key::S, MouseButton::Button2);
        assert_eq!(combo.to_string(), "R+S -> Button2");
    }
}
