// Trackrs Config Parser - TOML with Serde
// Loads a TrackConfig from TOML files and writes the defaults back out

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ConfigError, LayerBinding, ModeBindings, TrackConfig};
use crate::tick::SamplingMode;
use crate::trackball::TrackMode;

/// Mode name that disables a tap binding
const NO_MODE: &str = "none";

/// Root TOML table
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor: Option<SensorConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<ThresholdConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticky: Option<StickyConfig>,

    /// Track modes bound to the sticky keys, by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modes: Option<ModesConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<LayersConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling: Option<SamplingConfig>,
}

/// `[sensor]`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SensorConfig {
    pub cpi: Option<u16>,
    pub cpi_step: Option<u16>,
}

/// `[thresholds]`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    pub cursor_multiplier: Option<u16>,
    pub cursor_multiplier_integration: Option<u16>,
    pub caret: Option<u16>,
    pub caret_integration: Option<u16>,
    pub scroll: Option<u16>,
    pub scroll_integration: Option<u16>,
}

/// `[sticky]`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StickyConfig {
    pub term_ms: Option<u32>,
}

/// `[modes]`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModesConfig {
    pub alt: Option<String>,
    pub shift: Option<String>,
    pub ctrl: Option<String>,
    pub gui: Option<String>,
    pub escape_hold: Option<String>,
}

/// `[layers.raise]` / `[layers.lower]`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LayerConfig {
    pub layer: Option<u8>,
    pub integrate_on_hold: Option<bool>,
}

/// `[layers]`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LayersConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raise: Option<LayerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<LayerConfig>,
}

/// `[sampling]`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SamplingConfig {
    pub mode: Option<String>,
}

fn parse_mode(field: &str, name: &str) -> Result<TrackMode, ConfigError> {
    TrackMode::from_str(name.trim())
        .map_err(|_| ConfigError::InvalidValue(format!("{}: unknown track mode '{}'", field, name)))
}

fn parse_binding(field: &str, name: &str) -> Result<Option<TrackMode>, ConfigError> {
    if name.trim().eq_ignore_ascii_case(NO_MODE) {
        Ok(None)
    } else {
        parse_mode(field, name).map(Some)
    }
}

fn binding_name(binding: Option<TrackMode>) -> String {
    binding.map_or_else(|| NO_MODE.to_string(), |mode| mode.to_string())
}

fn apply_layer(binding: &mut LayerBinding, layer: Option<LayerConfig>) {
    if let Some(layer) = layer {
        if let Some(index) = layer.layer {
            binding.layer = index;
        }
        if let Some(integrate) = layer.integrate_on_hold {
            binding.integrate_on_hold = integrate;
        }
    }
}

fn layer_table(binding: &LayerBinding) -> LayerConfig {
    LayerConfig {
        layer: Some(binding.layer),
        integrate_on_hold: Some(binding.integrate_on_hold),
    }
}

impl ConfigToml {
    /// Resolve the parsed tables on top of the defaults
    pub fn to_track_config(self) -> Result<TrackConfig, ConfigError> {
        let mut config = TrackConfig::default();

        if let Some(sensor) = self.sensor {
            if let Some(cpi) = sensor.cpi {
                // Startup multiplier follows the sensor unless [thresholds] says otherwise
                config.sensor_cpi = cpi;
                config.cursor_multiplier = cpi;
            }
            config.cpi_step = sensor.cpi_step.unwrap_or(config.cpi_step);
        }

        if let Some(t) = self.thresholds {
            config.cursor_multiplier = t.cursor_multiplier.unwrap_or(config.cursor_multiplier);
            config.cursor_multiplier_integration = t
                .cursor_multiplier_integration
                .unwrap_or(config.cursor_multiplier_integration);
            config.caret_threshold = t.caret.unwrap_or(config.caret_threshold);
            config.caret_threshold_integration = t
                .caret_integration
                .unwrap_or(config.caret_threshold_integration);
            config.scroll_threshold = t.scroll.unwrap_or(config.scroll_threshold);
            config.scroll_threshold_integration = t
                .scroll_integration
                .unwrap_or(config.scroll_threshold_integration);
        }

        if let Some(sticky) = self.sticky {
            config.sticky_term_ms = sticky.term_ms.unwrap_or(config.sticky_term_ms);
        }

        if let Some(modes) = self.modes {
            let mut bindings = ModeBindings::default();
            if let Some(name) = modes.alt {
                bindings.alt = parse_binding("modes.alt", &name)?;
            }
            if let Some(name) = modes.shift {
                bindings.shift = parse_binding("modes.shift", &name)?;
            }
            if let Some(name) = modes.ctrl {
                bindings.ctrl = parse_binding("modes.ctrl", &name)?;
            }
            if let Some(name) = modes.gui {
                bindings.gui = parse_binding("modes.gui", &name)?;
            }
            // Escape follows Ctrl unless set explicitly
            bindings.escape_hold = match modes.escape_hold {
                Some(name) => parse_mode("modes.escape_hold", &name)?,
                None => bindings.ctrl.unwrap_or(bindings.escape_hold),
            };
            config.modes = bindings;
        }

        if let Some(layers) = self.layers {
            apply_layer(&mut config.raise, layers.raise);
            apply_layer(&mut config.lower, layers.lower);
        }

        if let Some(sampling) = self.sampling {
            if let Some(name) = sampling.mode {
                config.sampling = SamplingMode::from_str(name.trim()).map_err(|_| {
                    ConfigError::InvalidValue(format!("sampling.mode: unknown mode '{}'", name))
                })?;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl From<&TrackConfig> for ConfigToml {
    fn from(config: &TrackConfig) -> Self {
        Self {
            sensor: Some(SensorConfig {
                cpi: Some(config.sensor_cpi),
                cpi_step: Some(config.cpi_step),
            }),
            thresholds: Some(ThresholdConfig {
                cursor_multiplier: Some(config.cursor_multiplier),
                cursor_multiplier_integration: Some(config.cursor_multiplier_integration),
                caret: Some(config.caret_threshold),
                caret_integration: Some(config.caret_threshold_integration),
                scroll: Some(config.scroll_threshold),
                scroll_integration: Some(config.scroll_threshold_integration),
            }),
            sticky: Some(StickyConfig {
                term_ms: Some(config.sticky_term_ms),
            }),
            modes: Some(ModesConfig {
                alt: Some(binding_name(config.modes.alt)),
                shift: Some(binding_name(config.modes.shift)),
                ctrl: Some(binding_name(config.modes.ctrl)),
                gui: Some(binding_name(config.modes.gui)),
                escape_hold: Some(config.modes.escape_hold.to_string()),
            }),
            layers: Some(LayersConfig {
                raise: Some(layer_table(&config.raise)),
                lower: Some(layer_table(&config.lower)),
            }),
            sampling: Some(SamplingConfig {
                mode: Some(config.sampling.to_string()),
            }),
        }
    }
}

impl TrackConfig {
    /// Load a configuration from a TOML string. Missing values keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let parsed: ConfigToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;
        parsed.to_track_config()
    }

    /// Load a configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path)?;
        log::debug!("loading config from {}", path.as_ref().display());
        Self::from_toml(&content)
    }

    /// Get the default config path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("trackrs").join("config.toml"))
    }

    /// Load from the default location (~/.config/trackrs/config.toml),
    /// falling back to the built-in defaults when no file exists
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Ok(Self::default())
    }

    /// Render this configuration as a complete TOML document
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(&ConfigToml::from(self))
            .map_err(|e| ConfigError::TomlParse(e.to_string()))
    }
}

/// Default configuration file contents
pub fn default_config_content() -> Result<String, ConfigError> {
    TrackConfig::default().to_toml()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = TrackConfig::from_toml("").unwrap();
        assert_eq!(config, TrackConfig::default());
    }

    #[test]
    fn test_partial_tables_override() {
        let config = TrackConfig::from_toml(
            r#"
[thresholds]
caret = 32
scroll = 16

[sticky]
term_ms = 750

[layers.raise]
integrate_on_hold = false
"#,
        )
        .unwrap();

        assert_eq!(config.caret_threshold, 32);
        assert_eq!(config.scroll_threshold, 16);
        assert_eq!(config.caret_threshold_integration, 160);
        assert_eq!(config.sticky_term_ms, 750);
        assert!(!config.raise.integrate_on_hold);
        assert!(config.lower.integrate_on_hold);
    }

    #[test]
    fn test_sensor_cpi_moves_multiplier() {
        let config = TrackConfig::from_toml("[sensor]\ncpi = 1200\n").unwrap();
        assert_eq!(config.sensor_cpi, 1200);
        assert_eq!(config.cursor_multiplier, 1200);

        let config =
            TrackConfig::from_toml("[sensor]\ncpi = 1200\n[thresholds]\ncursor_multiplier = 600\n")
                .unwrap();
        assert_eq!(config.cursor_multiplier, 600);
    }

    #[test]
    fn test_mode_names_and_none() {
        let config = TrackConfig::from_toml(
            r#"
[modes]
alt = "arrows"
gui = "none"
ctrl = "cursor"
"#,
        )
        .unwrap();

        assert_eq!(config.modes.alt, Some(TrackMode::Caret));
        assert_eq!(config.modes.gui, None);
        assert_eq!(config.modes.ctrl, Some(TrackMode::Cursor));
        // Escape follows ctrl when not set
        assert_eq!(config.modes.escape_hold, TrackMode::Cursor);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = TrackConfig::from_toml("[modes]\nalt = \"joystick\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
        assert!(err.to_string().contains("modes.alt"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = TrackConfig::from_toml("[sticky]\nterm = 500\n").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_invalid_scroll_rejected_at_load() {
        let err = TrackConfig::from_toml("[thresholds]\nscroll = 10\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_sampling_mode() {
        let config = TrackConfig::from_toml("[sampling]\nmode = \"interrupt\"\n").unwrap();
        assert_eq!(config.sampling, SamplingMode::Interrupt);
    }

    #[test]
    fn test_default_content_parses_back() {
        let content = default_config_content().unwrap();
        assert!(content.contains("[thresholds]"));
        let config = TrackConfig::from_toml(&content).unwrap();
        assert_eq!(config, TrackConfig::default());
    }

    #[test]
    fn test_default_path_location() {
        if let Some(path) = TrackConfig::default_path() {
            assert!(path.ends_with("trackrs/config.toml"));
        }
    }
}
