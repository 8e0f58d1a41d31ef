// Trackrs Mode Thresholds
// Runtime sensitivity of each track mode, adjustable from custom keycodes

use crate::config::TrackConfig;

/// Ratio between coarse and smooth scroll thresholds
pub const SMOOTH_SCROLL_FACTOR: u16 = 8;

/// Per-mode sensitivity values.
///
/// Cursor values are multipliers in percent (higher is faster). Caret and
/// scroll values are the motion needed per emitted step (higher is slower).
/// Each has a second value used while integration mode is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeThresholds {
    cursor_multiplier: u16,
    cursor_multiplier_integration: u16,
    caret: u16,
    caret_integration: u16,
    scroll: u16,
    scroll_integration: u16,
    smooth_scroll: bool,
    sensor_cpi: u16,
    cpi_step: u16,
}

impl ModeThresholds {
    /// Build the startup thresholds. Smooth scroll starts enabled, so the
    /// configured scroll thresholds are divided by the smooth-scroll factor.
    pub fn new(config: &TrackConfig) -> Self {
        Self {
            cursor_multiplier: config.cursor_multiplier,
            cursor_multiplier_integration: config.cursor_multiplier_integration,
            caret: config.caret_threshold,
            caret_integration: config.caret_threshold_integration,
            scroll: config.scroll_threshold / SMOOTH_SCROLL_FACTOR,
            scroll_integration: config.scroll_threshold_integration / SMOOTH_SCROLL_FACTOR,
            smooth_scroll: true,
            sensor_cpi: config.sensor_cpi,
            cpi_step: config.cpi_step,
        }
    }

    /// Cursor multiplier for the given integration state
    pub fn cursor_factor(&self, integration: bool) -> u16 {
        if integration {
            self.cursor_multiplier_integration
        } else {
            self.cursor_multiplier
        }
    }

    /// Caret threshold for the given integration state
    pub fn caret_factor(&self, integration: bool) -> u16 {
        if integration {
            self.caret_integration
        } else {
            self.caret
        }
    }

    /// Scroll threshold for the given integration state
    pub fn scroll_factor(&self, integration: bool) -> u16 {
        if integration {
            self.scroll_integration
        } else {
            self.scroll
        }
    }

    /// Media mode ignores integration and always uses the plain caret threshold
    pub fn media_factor(&self) -> u16 {
        self.caret
    }

    pub fn cursor_multiplier(&self) -> u16 {
        self.cursor_multiplier
    }

    pub fn is_smooth_scroll(&self) -> bool {
        self.smooth_scroll
    }

    /// Lower the cursor multiplier by one step, never below the step itself
    pub fn cpi_down(&mut self) {
        if self.cursor_multiplier > self.cpi_step {
            self.cursor_multiplier -= self.cpi_step;
        }
        log::debug!("cursor multiplier now {}", self.cursor_multiplier);
    }

    /// Raise the cursor multiplier by one step
    pub fn cpi_up(&mut self) {
        self.cursor_multiplier = self.cursor_multiplier.saturating_add(self.cpi_step);
        log::debug!("cursor multiplier now {}", self.cursor_multiplier);
    }

    /// Restore the cursor multiplier to the sensor's hardware CPI
    pub fn cpi_reset(&mut self) {
        self.cursor_multiplier = self.sensor_cpi;
        log::debug!("cursor multiplier reset to {}", self.cursor_multiplier);
    }

    /// Flip between smooth and coarse scrolling.
    ///
    /// Leaving smooth mode multiplies both scroll thresholds by
    /// [`SMOOTH_SCROLL_FACTOR`], entering it divides them again. The smooth
    /// values were themselves divided down from u16 settings, so the
    /// multiplication cannot overflow and the toggle is its own inverse.
    pub fn toggle_smooth_scroll(&mut self) {
        if self.smooth_scroll {
            self.scroll *= SMOOTH_SCROLL_FACTOR;
            self.scroll_integration *= SMOOTH_SCROLL_FACTOR;
        } else {
            self.scroll /= SMOOTH_SCROLL_FACTOR;
            self.scroll_integration /= SMOOTH_SCROLL_FACTOR;
        }
        self.smooth_scroll = !self.smooth_scroll;
        log::debug!(
            "smooth scroll {} (scroll threshold {}, integration {})",
            if self.smooth_scroll { "on" } else { "off" },
            self.scroll,
            self.scroll_integration
        );
    }
}

impl Default for ModeThresholds {
    fn default() -> Self {
        Self::new(&TrackConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_values() {
        let t = ModeThresholds::default();
        assert!(t.is_smooth_scroll());
        assert_eq!(t.cursor_factor(false), 800);
        assert_eq!(t.cursor_factor(true), 100);
        assert_eq!(t.caret_factor(false), 24);
        assert_eq!(t.caret_factor(true), 160);
        assert_eq!(t.scroll_factor(false), 1);
        assert_eq!(t.scroll_factor(true), 8);
        assert_eq!(t.media_factor(), 24);
    }

    #[test]
    fn test_cpi_down_floors_at_step() {
        let mut t = ModeThresholds::default();
        for _ in 0..3 {
            t.cpi_down();
        }
        assert_eq!(t.cursor_multiplier(), 500);
        for _ in 0..8 {
            t.cpi_down();
        }
        assert_eq!(t.cursor_multiplier(), 100);
    }

    #[test]
    fn test_cpi_up_and_reset() {
        let mut t = ModeThresholds::default();
        t.cpi_up();
        t.cpi_up();
        assert_eq!(t.cursor_multiplier(), 1000);
        t.cpi_reset();
        assert_eq!(t.cursor_multiplier(), 800);
    }

    #[test]
    fn test_smooth_scroll_toggle_is_its_own_inverse() {
        let mut t = ModeThresholds::default();
        let before = t.clone();

        t.toggle_smooth_scroll();
        assert!(!t.is_smooth_scroll());
        assert_eq!(t.scroll_factor(false), 8);
        assert_eq!(t.scroll_factor(true), 64);

        t.toggle_smooth_scroll();
        assert_eq!(t, before);
    }
}
