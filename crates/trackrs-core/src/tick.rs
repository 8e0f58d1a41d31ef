// Trackrs Tick Driver
// Polled and interrupt-driven ways of feeding the sensor into the mode engine
//
// Exactly one strategy is installed in a controller. The polled strategy
// samples on every scheduler tick; the interrupt-driven one samples from the
// sensor's motion interrupt and only uses the tick to flush integration-mode
// motion.

use std::fmt;

use strum_macros::{Display, EnumIter, EnumString};

use crate::platform::Platform;
use crate::state::EngineState;
use crate::trackball::{apply_motion, emit, sample};

/// Configured sampling strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum SamplingMode {
    #[default]
    #[strum(to_string = "polling", serialize = "poll", serialize = "polled")]
    Polling,
    #[strum(to_string = "interrupt", serialize = "interrupt-driven", serialize = "isr")]
    Interrupt,
}

/// How sensor samples reach the mode engine.
pub trait SamplingStrategy: fmt::Debug {
    fn mode(&self) -> SamplingMode;

    /// Called on every scheduler tick
    fn on_tick(&self, state: &mut EngineState, platform: &mut dyn Platform);

    /// Called from the sensor's motion interrupt
    fn on_sensor_interrupt(&self, state: &mut EngineState, platform: &mut dyn Platform);
}

/// Run the engine once and deliver its output
fn run_engine(state: &mut EngineState, platform: &mut dyn Platform) {
    let output = apply_motion(&mut state.trackball, &state.thresholds);
    emit(&output, platform);
}

/// Sample and report on every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Polled;

impl SamplingStrategy for Polled {
    fn mode(&self) -> SamplingMode {
        SamplingMode::Polling
    }

    fn on_tick(&self, state: &mut EngineState, platform: &mut dyn Platform) {
        if sample(&mut state.trackball, platform) {
            run_engine(state, platform);
        }
    }

    fn on_sensor_interrupt(&self, _state: &mut EngineState, _platform: &mut dyn Platform) {}
}

/// Sample from the motion interrupt; ticks only flush integration mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterruptDriven;

impl SamplingStrategy for InterruptDriven {
    fn mode(&self) -> SamplingMode {
        SamplingMode::Interrupt
    }

    fn on_tick(&self, state: &mut EngineState, platform: &mut dyn Platform) {
        if platform.is_primary() && state.trackball.integration {
            run_engine(state, platform);
        }
    }

    fn on_sensor_interrupt(&self, state: &mut EngineState, platform: &mut dyn Platform) {
        if sample(&mut state.trackball, platform) {
            run_engine(state, platform);
        }
    }
}

/// Strategy for a configured mode
pub fn for_mode(mode: SamplingMode) -> Box<dyn SamplingStrategy> {
    match mode {
        SamplingMode::Polling => Box::new(Polled),
        SamplingMode::Interrupt => Box::new(InterruptDriven),
    }
}
