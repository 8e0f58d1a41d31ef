// Trackrs Replay Scripts
// TOML step lists driven through a Controller against the recording platform
//
// A script is a list of `[[step]]` tables, each tagged by `action`:
//
//   [[step]]
//   action = "hold"
//   gesture = "RAI_TM"
//
//   [[step]]
//   action = "motion"
//   x = 30
//   y = 0
//
//   [[step]]
//   action = "tick"

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use super::{OutputEvent, RecordingPlatform};
use crate::controller::Controller;
use crate::key::key_from_name;
use crate::platform::Clock;
use crate::state::EngineState;
use crate::tap_dance::{Gesture, TapDanceState};
use crate::trackball::Motion;
use crate::Key;

/// Errors that can occur when loading or running a script
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("step {step}: unknown key '{name}'")]
    UnknownKey { step: usize, name: String },

    #[error("step {step}: unknown gesture '{name}'")]
    UnknownGesture { step: usize, name: String },

    #[error("step {step}: no combo for '{name}'")]
    UnknownCombo { step: usize, name: String },
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptToml {
    #[serde(default)]
    step: Vec<StepToml>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", deny_unknown_fields)]
enum StepToml {
    Motion {
        x: i16,
        y: i16,
        #[serde(default = "one")]
        repeat: u32,
    },
    Tick {
        #[serde(default = "one")]
        count: u32,
    },
    Interrupt {
        #[serde(default = "one")]
        count: u32,
    },
    Advance {
        ms: u32,
    },
    Key {
        key: String,
        pressed: Option<bool>,
    },
    Combo {
        keys: String,
        pressed: Option<bool>,
    },
    Tap {
        gesture: String,
    },
    Hold {
        gesture: String,
    },
    Finished {
        gesture: String,
        #[serde(default = "one_press")]
        count: u8,
        #[serde(default)]
        pressed: bool,
    },
    Reset {
        gesture: String,
    },
    Role {
        primary: bool,
    },
}

fn one_press() -> u8 {
    1
}

/// One resolved script step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Queue `repeat` copies of a sensor sample
    Motion { motion: Motion, repeat: u32 },
    Tick(u32),
    Interrupt(u32),
    Advance(u32),
    /// Key event; `None` means press followed by release
    Key { key: Key, pressed: Option<bool> },
    /// Combo event for two keys; `None` means press followed by release
    Combo { keys: [Key; 2], pressed: Option<bool> },
    /// Finished as a single tap, then reset
    Tap(Gesture),
    /// Finished as a single hold; a later `Reset` lets go
    Hold(Gesture),
    Finished { gesture: Gesture, dance: TapDanceState },
    Reset(Gesture),
    Role { primary: bool },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn edge(pressed: Option<bool>) -> &'static str {
            match pressed {
                Some(true) => " down",
                Some(false) => " up",
                None => "",
            }
        }

        match self {
            Step::Motion { motion, repeat } if *repeat == 1 => write!(f, "motion {}", motion),
            Step::Motion { motion, repeat } => write!(f, "motion {} x{}", motion, repeat),
            Step::Tick(count) => write!(f, "tick x{}", count),
            Step::Interrupt(count) => write!(f, "interrupt x{}", count),
            Step::Advance(ms) => write!(f, "advance {}ms", ms),
            Step::Key { key, pressed } => write!(f, "key {}{}", key, edge(*pressed)),
            Step::Combo { keys, pressed } => {
                write!(f, "combo {}+{}{}", keys[0], keys[1], edge(*pressed))
            }
            Step::Tap(gesture) => write!(f, "tap {}", gesture),
            Step::Hold(gesture) => write!(f, "hold {}", gesture),
            Step::Finished { gesture, dance } => write!(
                f,
                "finished {} count={} pressed={}",
                gesture, dance.count, dance.pressed
            ),
            Step::Reset(gesture) => write!(f, "reset {}", gesture),
            Step::Role { primary } => {
                write!(f, "role {}", if *primary { "primary" } else { "secondary" })
            }
        }
    }
}

/// What one step produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTrace {
    pub index: usize,
    pub step: Step,
    /// Clock value after the step
    pub time_ms: u32,
    pub events: Vec<OutputEvent>,
}

/// A parsed replay script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    steps: Vec<Step>,
}

fn parse_key(step: usize, name: &str) -> Result<Key, ScriptError> {
    key_from_name(name).ok_or_else(|| ScriptError::UnknownKey {
        step,
        name: name.to_string(),
    })
}

fn parse_gesture(step: usize, name: &str) -> Result<Gesture, ScriptError> {
    Gesture::from_str(name.trim()).map_err(|_| ScriptError::UnknownGesture {
        step,
        name: name.to_string(),
    })
}

fn parse_combo(step: usize, keys: &str) -> Result<[Key; 2], ScriptError> {
    let unknown = || ScriptError::UnknownCombo {
        step,
        name: keys.to_string(),
    };
    let (first, second) = keys.split_once('+').ok_or_else(unknown)?;
    Ok([parse_key(step, first)?, parse_key(step, second)?])
}

impl StepToml {
    fn resolve(self, step: usize) -> Result<Step, ScriptError> {
        Ok(match self {
            StepToml::Motion { x, y, repeat } => Step::Motion {
                motion: Motion::new(x, y),
                repeat,
            },
            StepToml::Tick { count } => Step::Tick(count),
            StepToml::Interrupt { count } => Step::Interrupt(count),
            StepToml::Advance { ms } => Step::Advance(ms),
            StepToml::Key { key, pressed } => Step::Key {
                key: parse_key(step, &key)?,
                pressed,
            },
            StepToml::Combo { keys, pressed } => Step::Combo {
                keys: parse_combo(step, &keys)?,
                pressed,
            },
            StepToml::Tap { gesture } => Step::Tap(parse_gesture(step, &gesture)?),
            StepToml::Hold { gesture } => Step::Hold(parse_gesture(step, &gesture)?),
            StepToml::Finished {
                gesture,
                count,
                pressed,
            } => Step::Finished {
                gesture: parse_gesture(step, &gesture)?,
                dance: TapDanceState { count, pressed },
            },
            StepToml::Reset { gesture } => Step::Reset(parse_gesture(step, &gesture)?),
            StepToml::Role { primary } => Step::Role { primary },
        })
    }
}

impl Script {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Parse a script from a TOML string. Steps are numbered from 1 in errors.
    pub fn from_toml(content: &str) -> Result<Self, ScriptError> {
        let parsed: ScriptToml =
            toml::from_str(content).map_err(|e| ScriptError::TomlParse(e.to_string()))?;
        let steps = parsed
            .step
            .into_iter()
            .enumerate()
            .map(|(i, step)| step.resolve(i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps })
    }

    /// Load a script from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Execute every step, collecting the events each one produced
    pub fn run(
        &self,
        controller: &Controller,
        state: &mut EngineState,
        platform: &mut RecordingPlatform,
    ) -> Result<Vec<StepTrace>, ScriptError> {
        let mut traces = Vec::with_capacity(self.steps.len());
        for (i, step) in self.steps.iter().enumerate() {
            run_step(i + 1, step, controller, state, platform)?;
            traces.push(StepTrace {
                index: i + 1,
                step: step.clone(),
                time_ms: platform.now_ms(),
                events: platform.take_events(),
            });
        }
        Ok(traces)
    }
}

fn run_step(
    index: usize,
    step: &Step,
    controller: &Controller,
    state: &mut EngineState,
    platform: &mut RecordingPlatform,
) -> Result<(), ScriptError> {
    log::trace!("step {}: {}", index, step);
    match step {
        Step::Motion { motion, repeat } => {
            for _ in 0..*repeat {
                platform.push_motion(*motion);
            }
        }
        Step::Tick(count) => {
            for _ in 0..*count {
                controller.on_tick(state, platform);
            }
        }
        Step::Interrupt(count) => {
            for _ in 0..*count {
                controller.on_sensor_interrupt(state, platform);
            }
        }
        Step::Advance(ms) => platform.advance(*ms),
        Step::Key { key, pressed } => match pressed {
            Some(pressed) => {
                controller.on_key_event(state, platform, *key, *pressed);
            }
            None => {
                controller.on_key_event(state, platform, *key, true);
                controller.on_key_event(state, platform, *key, false);
            }
        },
        Step::Combo { keys, pressed } => {
            let combo = controller
                .combos()
                .find(keys[0], keys[1])
                .ok_or_else(|| ScriptError::UnknownCombo {
                    step: index,
                    name: format!("{}+{}", keys[0], keys[1]),
                })?;
            match pressed {
                Some(pressed) => controller.on_combo_event(platform, combo, *pressed),
                None => {
                    controller.on_combo_event(platform, combo, true);
                    controller.on_combo_event(platform, combo, false);
                }
            }
        }
        Step::Tap(gesture) => {
            controller.on_gesture_finished(state, platform, *gesture, &TapDanceState::tap());
            controller.on_gesture_reset(state, platform, *gesture);
        }
        Step::Hold(gesture) => {
            controller.on_gesture_finished(state, platform, *gesture, &TapDanceState::hold());
        }
        Step::Finished { gesture, dance } => {
            controller.on_gesture_finished(state, platform, *gesture, dance);
        }
        Step::Reset(gesture) => controller.on_gesture_reset(state, platform, *gesture),
        Step::Role { primary } => platform.set_primary(*primary),
    }
    Ok(())
}
