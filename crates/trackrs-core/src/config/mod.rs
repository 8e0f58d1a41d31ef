// Trackrs Configuration
// Engine parameters, their firmware defaults and validation

#[cfg(feature = "host")]
pub mod parser;

use crate::tick::SamplingMode;
use crate::trackball::{TrackMode, SMOOTH_SCROLL_FACTOR};
use crate::Modifier;

pub const DEFAULT_SENSOR_CPI: u16 = 800;
pub const DEFAULT_CURSOR_MULTIPLIER: u16 = 800;
pub const DEFAULT_CURSOR_MULTIPLIER_INTEGRATION: u16 = 100;
pub const DEFAULT_CPI_STEP: u16 = 100;
pub const DEFAULT_CARET_THRESHOLD: u16 = 24;
pub const DEFAULT_CARET_THRESHOLD_INTEGRATION: u16 = 160;
pub const DEFAULT_SCROLL_THRESHOLD: u16 = 8;
pub const DEFAULT_SCROLL_THRESHOLD_INTEGRATION: u16 = 64;
pub const DEFAULT_STICKY_TERM_MS: u32 = 500;
pub const DEFAULT_LOWER_LAYER: u8 = 1;
pub const DEFAULT_RAISE_LAYER: u8 = 2;

/// Errors that can occur when loading or validating a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// A layer reached through a sticky Raise/Lower key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerBinding {
    pub layer: u8,
    /// Enable integration mode while the key is held
    pub integrate_on_hold: bool,
}

/// Track modes selected by the sticky keys.
///
/// A `None` binding leaves the mode untouched when that modifier is tapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeBindings {
    pub alt: Option<TrackMode>,
    pub shift: Option<TrackMode>,
    pub ctrl: Option<TrackMode>,
    pub gui: Option<TrackMode>,
    /// Mode entered while Escape is held
    pub escape_hold: TrackMode,
}

impl ModeBindings {
    /// Tap binding for a sticky modifier
    pub fn for_modifier(&self, modifier: Modifier) -> Option<TrackMode> {
        match modifier {
            Modifier::LeftAlt => self.alt,
            Modifier::LeftShift => self.shift,
            Modifier::LeftCtrl => self.ctrl,
            Modifier::LeftGui => self.gui,
        }
    }
}

impl Default for ModeBindings {
    fn default() -> Self {
        Self {
            alt: Some(TrackMode::Caret),
            shift: Some(TrackMode::Cursor),
            ctrl: Some(TrackMode::Scroll),
            gui: Some(TrackMode::Media),
            escape_hold: TrackMode::Scroll,
        }
    }
}

/// Full engine configuration.
///
/// Scroll thresholds are the coarse values; smooth scrolling (on at
/// startup) divides them by [`SMOOTH_SCROLL_FACTOR`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackConfig {
    /// Hardware CPI, restored by the CPI reset key
    pub sensor_cpi: u16,
    pub cpi_step: u16,
    pub cursor_multiplier: u16,
    pub cursor_multiplier_integration: u16,
    pub caret_threshold: u16,
    pub caret_threshold_integration: u16,
    pub scroll_threshold: u16,
    pub scroll_threshold_integration: u16,
    /// How long tapped sticky keys stay pending
    pub sticky_term_ms: u32,
    pub modes: ModeBindings,
    pub raise: LayerBinding,
    pub lower: LayerBinding,
    pub sampling: SamplingMode,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            sensor_cpi: DEFAULT_SENSOR_CPI,
            cpi_step: DEFAULT_CPI_STEP,
            cursor_multiplier: DEFAULT_CURSOR_MULTIPLIER,
            cursor_multiplier_integration: DEFAULT_CURSOR_MULTIPLIER_INTEGRATION,
            caret_threshold: DEFAULT_CARET_THRESHOLD,
            caret_threshold_integration: DEFAULT_CARET_THRESHOLD_INTEGRATION,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            scroll_threshold_integration: DEFAULT_SCROLL_THRESHOLD_INTEGRATION,
            sticky_term_ms: DEFAULT_STICKY_TERM_MS,
            modes: ModeBindings::default(),
            raise: LayerBinding {
                layer: DEFAULT_RAISE_LAYER,
                integrate_on_hold: true,
            },
            lower: LayerBinding {
                layer: DEFAULT_LOWER_LAYER,
                integrate_on_hold: true,
            },
            sampling: SamplingMode::default(),
        }
    }
}

impl TrackConfig {
    /// Check the invariants the engine relies on. Multipliers and thresholds
    /// are positive and scroll thresholds survive the smooth-scroll division
    /// exactly. Neither the sensor CPI nor the cursor multiplier may start
    /// below the CPI step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("sensor.cpi", self.sensor_cpi),
            ("sensor.cpi_step", self.cpi_step),
            ("thresholds.cursor_multiplier", self.cursor_multiplier),
            (
                "thresholds.cursor_multiplier_integration",
                self.cursor_multiplier_integration,
            ),
            ("thresholds.caret", self.caret_threshold),
            ("thresholds.caret_integration", self.caret_threshold_integration),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue(format!("{} must be positive", name)));
            }
        }

        let scroll = [
            ("thresholds.scroll", self.scroll_threshold),
            ("thresholds.scroll_integration", self.scroll_threshold_integration),
        ];
        for (name, value) in scroll {
            if value < SMOOTH_SCROLL_FACTOR || value % SMOOTH_SCROLL_FACTOR != 0 {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must be a positive multiple of {} (got {})",
                    name, SMOOTH_SCROLL_FACTOR, value
                )));
            }
        }

        // CPI_DOWN never goes below one step, so neither starting point may
        let floored = [
            ("sensor.cpi", self.sensor_cpi),
            ("thresholds.cursor_multiplier", self.cursor_multiplier),
        ];
        for (name, value) in floored {
            if value < self.cpi_step {
                return Err(ConfigError::InvalidValue(format!(
                    "{} ({}) must not be below sensor.cpi_step ({})",
                    name, value, self.cpi_step
                )));
            }
        }

        if self.raise.layer == self.lower.layer {
            return Err(ConfigError::InvalidValue(format!(
                "raise and lower share layer {}",
                self.raise.layer
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TrackConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let config = TrackConfig {
            caret_threshold: 0,
            ..TrackConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("thresholds.caret"));
    }

    #[test]
    fn test_scroll_must_be_multiple_of_factor() {
        let config = TrackConfig {
            scroll_threshold: 12,
            ..TrackConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));

        let config = TrackConfig {
            scroll_threshold_integration: 4,
            ..TrackConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_multiplier_below_cpi_step_rejected() {
        let config = TrackConfig {
            cursor_multiplier: 50,
            ..TrackConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("thresholds.cursor_multiplier"));

        let config = TrackConfig {
            sensor_cpi: 300,
            cpi_step: 400,
            cursor_multiplier: 800,
            ..TrackConfig::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("sensor.cpi"));

        let config = TrackConfig {
            cursor_multiplier: 100,
            cpi_step: 100,
            ..TrackConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_layers_must_differ() {
        let mut config = TrackConfig::default();
        config.raise.layer = config.lower.layer;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mode_bindings_by_modifier() {
        let modes = ModeBindings::default();
        assert_eq!(modes.for_modifier(Modifier::LeftAlt), Some(TrackMode::Caret));
        assert_eq!(modes.for_modifier(Modifier::LeftShift), Some(TrackMode::Cursor));
        assert_eq!(modes.for_modifier(Modifier::LeftCtrl), Some(TrackMode::Scroll));
        assert_eq!(modes.for_modifier(Modifier::LeftGui), Some(TrackMode::Media));
        assert_eq!(modes.escape_hold, TrackMode::Scroll);
    }
}
