// Trackrs Core Library
// Trackball modes, sticky keys and custom keycodes for a split keyboard

pub mod combo;
pub mod config;
pub mod controller;
pub mod key;
pub mod keycode;
pub mod modifier;
pub mod platform;
pub mod report;
pub mod sim;
pub mod state;
pub mod sticky;
pub mod tap_dance;
pub mod tick;
pub mod trackball;

pub use combo::{on_mouse_button, ComboTable, MouseCombo};
pub use config::{ConfigError, LayerBinding, ModeBindings, TrackConfig};
pub use controller::Controller;
pub use key::Key;
pub use keycode::{KeyHandler, KeycodeTable};
pub use modifier::{Modifier, ModifierSet};
pub use platform::{Clock, HostKeyboard, MotionSensor, Platform, PointerReport, SplitRole};
pub use report::{MouseButton, MouseReport};
pub use sim::{OutputEvent, RecordingPlatform};
pub use state::EngineState;
pub use sticky::{StickyKey, StickyKeyState, StickyTarget, StickyTargets};
pub use tap_dance::{classify, Gesture, GestureResults, TapDanceResult, TapDanceState};
pub use tick::{InterruptDriven, Polled, SamplingMode, SamplingStrategy};
pub use trackball::{ModeThresholds, Motion, MotionOutput, TrackMode, TrackballState};

#[cfg(feature = "host")]
pub use sim::script::{Script, ScriptError, Step, StepTrace};
