// Trackrs Modifier System
// Left-hand modifiers the sticky keys drive, and a compact bitmask set of them

use std::fmt;

use strum_macros::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};


/// A keyboard modifier that a sticky key can assert.
///
/// Only the left-hand variants exist: the firmware always registers the left
/// modifier bit, the same way the host reports them for the sticky keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Modifier {
    #[strum(to_string = "LCtrl", serialize = "Ctrl", serialize = "Control", serialize = "LC")]
    LeftCtrl,
    #[strum(to_string = "LShift", serialize = "Shift", serialize = "LS")]
    LeftShift,
    #[strum(to_string = "LAlt", serialize = "Alt", serialize = "Opt", serialize = "LA")]
    LeftAlt,
    #[strum(
        to_string = "LGui",
        serialize = "Gui",
        serialize = "Super",
        serialize = "Win",
        serialize = "Cmd",
        serialize = "Meta"
    )]
    LeftGui,
}

impl Modifier {
    /// HID modifier bit for this modifier
    pub const fn bit(self) -> u8 {
        match self {
            Modifier::LeftCtrl => 0x01,
            Modifier::LeftShift => 0x02,
            Modifier::LeftAlt => 0x04,
            Modifier::LeftGui => 0x08,
        }
    }
}

/// Set of modifiers packed into the HID modifier byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierSet(u8);

impl ModifierSet {
    pub const EMPTY: ModifierSet = ModifierSet(0);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    pub fn remove(&mut self, modifier: Modifier) {
        self.0 &= !modifier.bit();
    }

    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    /// Add every modifier of `other` to this set
    pub fn extend(&mut self, other: ModifierSet) {
        self.0 |= other.0;
    }

    /// Remove every modifier of `other` from this set
    pub fn subtract(&mut self, other: ModifierSet) {
        self.0 &= !other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the modifiers in this set, in bit order
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        use strum::IntoEnumIterator;
        Modifier::iter().filter(move |m| self.contains(*m))
    }
}

impl From<Modifier> for ModifierSet {
    fn from(modifier: Modifier) -> Self {
        ModifierSet(modifier.bit())
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let parts: Vec<&'static str> = self.iter().map(|m| m.into()).collect();
        write!(f, "{}", parts.join("+"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_from_alias() {
        assert_eq!("ctrl".parse::<Modifier>(), Ok(Modifier::LeftCtrl));
        assert_eq!("LShift".parse::<Modifier>(), Ok(Modifier::LeftShift));
        assert_eq!("cmd".parse::<Modifier>(), Ok(Modifier::LeftGui));
        assert!("hyper".parse::<Modifier>().is_err());
    }

    #[test]
    fn test_modifier_display_uses_primary_alias() {
        assert_eq!(Modifier::LeftAlt.to_string(), "LAlt");
        assert_eq!(Modifier::LeftGui.to_string(), "LGui");
    }

    #[test]
    fn test_modifier_set_operations() {
        let mut set = ModifierSet::EMPTY;
        assert!(set.is_empty());

        set.insert(Modifier::LeftShift);
        set.insert(Modifier::LeftAlt);
        assert!(set.contains(Modifier::LeftShift));
        assert!(!set.contains(Modifier::LeftCtrl));
        assert_eq!(set.bits(), 0x06);

        set.subtract(ModifierSet::from(Modifier::LeftShift));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Modifier::LeftAlt]);
        assert_eq!(set.to_string(), "LAlt");
    }
}
