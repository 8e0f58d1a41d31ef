// Trackrs Replay CLI
// Runs a replay script through the engine and prints every host-visible event

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use trackrs_core::config::parser::default_config_content;
use trackrs_core::{
    ConfigError, Controller, EngineState, RecordingPlatform, Script, StepTrace, TrackConfig,
};

/// Replay trackball, sticky-key and keycode scripts against the trackrs engine
#[derive(Parser, Debug)]
#[command(name = "trackrs-sim")]
#[command(version)]
#[command(about = "Replay input scripts against the trackrs engine", long_about = None)]
struct Args {
    /// TOML configuration file (default: ~/.config/trackrs/config.toml if present)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// TOML replay script
    #[arg(short, long, value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config and exit
    #[arg(long)]
    check_config: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn load_config(args: &Args) -> Result<TrackConfig> {
    let loaded = match &args.config {
        Some(path) => TrackConfig::from_file(path),
        None => TrackConfig::load_default(),
    };
    if let Err(ConfigError::InvalidValue(reason)) = &loaded {
        log::warn!("rejected configuration value: {}", reason);
    }

    let source = match &args.config {
        Some(path) => path.display().to_string(),
        None => "default config".to_string(),
    };
    loaded.with_context(|| format!("failed to load {}", source))
}

fn print_trace(trace: &StepTrace) {
    println!("[{:>3}] {:>7}ms  {}", trace.index, trace.time_ms, trace.step);
    for event in &trace.events {
        println!("                {}", event);
    }
}

fn print_summary(state: &EngineState, platform: &RecordingPlatform) {
    println!(
        "final: mode={} integration={} cursor_multiplier={} smooth_scroll={}",
        state.trackball.mode,
        state.trackball.integration,
        state.thresholds.cursor_multiplier(),
        state.thresholds.is_smooth_scroll()
    );
    println!(
        "host: mods={} layers={:?} report=[{}]",
        platform.mods(),
        platform.active_layers(),
        platform.report()
    );
}

/// Sticky keys still asserted, by name
fn stuck_keys(state: &EngineState) -> Vec<String> {
    state
        .sticky
        .active_keys()
        .map(|key| key.to_string())
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if args.print_default_config {
        print!("{}", default_config_content()?);
        return Ok(());
    }

    let config = load_config(&args)?;
    if args.check_config {
        println!("Configuration is valid");
        return Ok(());
    }

    let Some(script_path) = &args.script else {
        bail!("--script is required unless --check-config or --print-default-config is given");
    };
    let script = Script::from_file(script_path)
        .with_context(|| format!("failed to load script {}", script_path.display()))?;
    log::debug!("{} step(s) loaded from {}", script.len(), script_path.display());

    let controller = Controller::new(config)?;
    let mut state = controller.new_state();
    let mut platform = RecordingPlatform::new();

    let traces = script.run(&controller, &mut state, &mut platform)?;
    for trace in &traces {
        print_trace(trace);
    }
    print_summary(&state, &platform);

    let stuck = stuck_keys(&state);
    if !stuck.is_empty() {
        log::warn!("script ended with sticky keys asserted: {}", stuck.join(", "));
    }

    Ok(())
}
