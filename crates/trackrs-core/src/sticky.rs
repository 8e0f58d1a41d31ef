// Trackrs Sticky Keys
// Pending/active flags for the sticky modifiers and layers, with one shared expiry timer
//
// All sticky keys share a single timestamp and a single "something is
// pending" flag. Expiry and hold-release always act on the whole group at
// once: whichever key armed the timer last decides when every pending key
// is dropped.

use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, EnumString};

use crate::config::TrackConfig;
use crate::platform::{Clock, HostKeyboard};
use crate::{Modifier, ModifierSet};

/// Keys with sticky semantics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCountMacro, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum StickyKey {
    Alt,
    Shift,
    Ctrl,
    Gui,
    Lower,
    Raise,
}

impl StickyKey {
    /// Modifier behind this key, `None` for the layer keys
    pub fn modifier(self) -> Option<Modifier> {
        match self {
            StickyKey::Alt => Some(Modifier::LeftAlt),
            StickyKey::Shift => Some(Modifier::LeftShift),
            StickyKey::Ctrl => Some(Modifier::LeftCtrl),
            StickyKey::Gui => Some(Modifier::LeftGui),
            StickyKey::Lower | StickyKey::Raise => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// What asserting a sticky key does at the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickyTarget {
    Modifier(Modifier),
    Layer(u8),
}

impl StickyTarget {
    fn assert<P: HostKeyboard + ?Sized>(self, platform: &mut P) {
        match self {
            StickyTarget::Modifier(m) => platform.register_mods(ModifierSet::from(m)),
            StickyTarget::Layer(layer) => platform.layer_on(layer),
        }
    }

    fn release<P: HostKeyboard + ?Sized>(self, platform: &mut P) {
        match self {
            StickyTarget::Modifier(m) => platform.unregister_mods(ModifierSet::from(m)),
            StickyTarget::Layer(layer) => platform.layer_off(layer),
        }
    }
}

/// Layer indices of the two layer keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickyTargets {
    pub lower: u8,
    pub raise: u8,
}

impl StickyTargets {
    pub fn from_config(config: &TrackConfig) -> Self {
        Self {
            lower: config.lower.layer,
            raise: config.raise.layer,
        }
    }

    /// Host-side effect of a sticky key
    pub fn target(&self, key: StickyKey) -> StickyTarget {
        match key.modifier() {
            Some(m) => StickyTarget::Modifier(m),
            None if key == StickyKey::Lower => StickyTarget::Layer(self.lower),
            None => StickyTarget::Layer(self.raise),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct StickyFlags {
    /// The modifier or layer is currently asserted at the host
    active: bool,
    /// Waiting to be asserted by a hold or dropped by expiry
    pending: bool,
}

/// Sticky flags for every key plus the shared timer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StickyKeyState {
    flags: [StickyFlags; StickyKey::COUNT],
    timer: Option<u32>,
    any_pending: bool,
}

impl StickyKeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` pending and restart the shared timer
    pub fn arm(&mut self, key: StickyKey, now: u32) {
        self.flags[key.index()].pending = true;
        self.timer = Some(now);
        self.any_pending = true;
        log::trace!("sticky {} armed at {}ms", key, now);
    }

    /// Restart the shared timer without arming anything
    pub fn touch(&mut self, now: u32) {
        self.timer = Some(now);
    }

    /// Record that the caller asserted `key` at the host itself
    pub fn mark_active(&mut self, key: StickyKey) {
        self.flags[key.index()].active = true;
    }

    /// Assert every pending key, turning it active
    pub fn assert_pending<P>(&mut self, targets: &StickyTargets, platform: &mut P)
    where
        P: HostKeyboard + ?Sized,
    {
        for key in StickyKey::iter() {
            let flags = &mut self.flags[key.index()];
            if flags.pending {
                targets.target(key).assert(platform);
                flags.pending = false;
                flags.active = true;
                log::debug!("sticky {} asserted", key);
            }
        }
    }

    /// Release every active key at the host
    pub fn release_all<P>(&mut self, targets: &StickyTargets, platform: &mut P)
    where
        P: HostKeyboard + ?Sized,
    {
        for key in StickyKey::iter() {
            let flags = &mut self.flags[key.index()];
            if flags.active {
                targets.target(key).release(platform);
                flags.active = false;
                log::debug!("sticky {} released", key);
            }
        }
    }

    /// Stop timer-based accounting; pending flags stay as they are
    pub fn disarm(&mut self) {
        self.any_pending = false;
    }

    /// Whether the group has been pending for longer than `term_ms`
    pub fn is_expired<C: Clock + ?Sized>(&self, clock: &C, term_ms: u32) -> bool {
        self.any_pending
            && self
                .timer
                .is_some_and(|started| clock.elapsed_ms(started) > term_ms)
    }

    /// Drop the whole group: release active keys and clear every pending flag
    pub fn expire<P>(&mut self, targets: &StickyTargets, platform: &mut P)
    where
        P: HostKeyboard + ?Sized,
    {
        log::debug!("sticky term elapsed, releasing all");
        self.release_all(targets, platform);
        for flags in self.flags.iter_mut() {
            flags.pending = false;
        }
        self.any_pending = false;
        self.timer = None;
    }

    pub fn is_active(&self, key: StickyKey) -> bool {
        self.flags[key.index()].active
    }

    /// Keys currently asserted at the host, in declaration order
    pub fn active_keys(&self) -> impl Iterator<Item = StickyKey> + '_ {
        StickyKey::iter().filter(|key| self.is_active(*key))
    }

    pub fn is_pending(&self, key: StickyKey) -> bool {
        self.flags[key.index()].pending
    }

    /// Whether timer-based expiry is armed
    pub fn any_pending(&self) -> bool {
        self.any_pending
    }

    /// Timestamp of the last arm or touch
    pub fn timer(&self) -> Option<u32> {
        self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RecordingPlatform;

    fn targets() -> StickyTargets {
        StickyTargets::from_config(&TrackConfig::default())
    }

    #[test]
    fn test_targets() {
        let t = targets();
        assert_eq!(
            t.target(StickyKey::Shift),
            StickyTarget::Modifier(Modifier::LeftShift)
        );
        assert_eq!(t.target(StickyKey::Lower), StickyTarget::Layer(1));
        assert_eq!(t.target(StickyKey::Raise), StickyTarget::Layer(2));
    }

    #[test]
    fn test_arm_sets_shared_state() {
        let mut state = StickyKeyState::new();
        state.arm(StickyKey::Alt, 10);
        state.arm(StickyKey::Gui, 40);

        assert!(state.is_pending(StickyKey::Alt));
        assert!(state.is_pending(StickyKey::Gui));
        assert!(state.any_pending());
        assert_eq!(state.timer(), Some(40));
        assert!(!state.is_active(StickyKey::Alt));
    }

    #[test]
    fn test_assert_pending_registers_all() {
        let mut platform = RecordingPlatform::new();
        let mut state = StickyKeyState::new();
        state.arm(StickyKey::Ctrl, 0);
        state.arm(StickyKey::Raise, 0);
        state.assert_pending(&targets(), &mut platform);

        assert!(state.is_active(StickyKey::Ctrl));
        assert!(state.is_active(StickyKey::Raise));
        assert!(!state.is_pending(StickyKey::Ctrl));
        assert!(platform.mods().contains(Modifier::LeftCtrl));
        assert!(platform.layer_active(2));
    }

    #[test]
    fn test_expiry_uses_strict_comparison_and_wraps() {
        let mut platform = RecordingPlatform::new();
        let mut state = StickyKeyState::new();
        state.arm(StickyKey::Shift, u32::MAX - 100);

        platform.set_time(399);
        assert!(!state.is_expired(&platform, 500));
        platform.set_time(400);
        assert!(state.is_expired(&platform, 500));

        state.disarm();
        platform.set_time(10_000);
        assert!(!state.is_expired(&platform, 500));
    }

    #[test]
    fn test_active_keys_lists_asserted_only() {
        let mut platform = RecordingPlatform::new();
        let mut state = StickyKeyState::new();
        assert_eq!(state.active_keys().count(), 0);

        state.arm(StickyKey::Raise, 0);
        state.arm(StickyKey::Alt, 0);
        state.assert_pending(&targets(), &mut platform);
        state.arm(StickyKey::Gui, 0);

        assert_eq!(
            state.active_keys().collect::<Vec<_>>(),
            vec![StickyKey::Alt, StickyKey::Raise]
        );
    }

    #[test]
    fn test_expire_clears_everything() {
        let mut platform = RecordingPlatform::new();
        let mut state = StickyKeyState::new();
        state.arm(StickyKey::Lower, 0);
        state.mark_active(StickyKey::Lower);
        platform.layer_on(1);
        state.arm(StickyKey::Alt, 5);

        state.expire(&targets(), &mut platform);

        assert!(!state.is_active(StickyKey::Lower));
        assert!(!state.is_pending(StickyKey::Lower));
        assert!(!state.is_pending(StickyKey::Alt));
        assert!(!state.any_pending());
        assert_eq!(state.timer(), None);
        assert!(!platform.layer_active(1));
        assert!(platform.mods().is_empty());
    }

    #[test]
    fn test_release_all_skips_inactive() {
        let mut platform = RecordingPlatform::new();
        let mut state = StickyKeyState::new();
        state.release_all(&targets(), &mut platform);
        assert!(platform.events().is_empty());
    }
}
