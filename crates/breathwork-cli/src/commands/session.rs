use std::time::Duration;

use breathwork_core::cues::{NoHaptics, SoundProfile};
use breathwork_core::timer::{find_pattern, BreathEngine, EngineConfig, FrameGate};
use breathwork_core::{Config, ConfigError, Event};
use clap::{Args, Subcommand};
use tokio::time::{Instant, MissedTickBehavior};

use crate::terminal::{self, TerminalBell};

/// Roughly one display refresh.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a session in real time
    Run {
        #[command(flatten)]
        overrides: SessionOverrides,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Run a session against a synthetic clock and print every event as JSON
    Simulate {
        #[command(flatten)]
        overrides: SessionOverrides,
        /// Synthetic frames per second
        #[arg(long, default_value = "60")]
        fps: u32,
    },
}

/// Per-invocation overrides of stored preferences.
#[derive(Args, Debug, Default)]
pub struct SessionOverrides {
    /// Built-in pattern id
    #[arg(long)]
    pattern: Option<String>,
    /// Session length in seconds
    #[arg(long)]
    duration: Option<f64>,
    /// Tone volume, 0.0 to 1.0
    #[arg(long)]
    volume: Option<f64>,
    /// Tone profile (sine, bowl, chime)
    #[arg(long)]
    profile: Option<SoundProfile>,
    #[arg(long)]
    no_sound: bool,
    #[arg(long)]
    no_haptics: bool,
    /// Keep holds silent
    #[arg(long)]
    mute_holds: bool,
}

impl SessionOverrides {
    fn apply(&self, mut config: EngineConfig) -> Result<EngineConfig, ConfigError> {
        if let Some(id) = &self.pattern {
            config.pattern = find_pattern(id)
                .map(|p| p.pattern)
                .ok_or_else(|| ConfigError::UnknownPattern(id.clone()))?;
        }
        if let Some(secs) = self.duration {
            config.total_duration_secs = secs;
        }
        if let Some(volume) = self.volume {
            config.cues.volume = volume;
        }
        if let Some(profile) = self.profile {
            config.cues.profile = profile;
        }
        if self.no_sound {
            config.cues.sound_enabled = false;
        }
        if self.no_haptics {
            config.cues.haptics_enabled = false;
        }
        if self.mute_holds {
            config.cues.mute_holds = true;
        }
        Ok(config)
    }
}

fn engine_config(overrides: &SessionOverrides) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let stored = Config::load()?;
    // Explicit overrides may replace a stored preset that no longer resolves.
    let base = match stored.engine_config() {
        Ok(config) => config,
        Err(e) if overrides.pattern.is_some() => {
            tracing::debug!(error = %e, "ignoring stored session config");
            EngineConfig {
                cues: stored.cue_settings(),
                ..EngineConfig::default()
            }
        }
        Err(e) => return Err(e.into()),
    };
    Ok(overrides.apply(base)?)
}

fn print_event(event: &Event, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        println!("{}", terminal::render(event));
    }
    Ok(())
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Run { overrides, json } => {
            let config = engine_config(&overrides)?;
            let gate = FrameGate::new();
            let engine = BreathEngine::new(config)?
                .with_cues(TerminalBell, NoHaptics)
                .with_frames(gate.clone());

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(drive_realtime(engine, gate, json))
        }
        SessionAction::Simulate { overrides, fps } => {
            if fps == 0 {
                return Err("fps must be positive".into());
            }
            let mut config = engine_config(&overrides)?;
            config.cues.sound_enabled = false;
            config.cues.haptics_enabled = false;

            let gate = FrameGate::new();
            let mut engine = BreathEngine::new(config)?.with_frames(gate.clone());
            for event in simulate(&mut engine, &gate, fps) {
                print_event(&event, true)?;
            }
            print_event(&engine.snapshot(), true)
        }
    }
}

/// Drive the engine from a tokio interval until the session ends.
async fn drive_realtime(
    mut engine: BreathEngine,
    gate: FrameGate,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let origin = Instant::now();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    print_event(&engine.start(), json)?;
    while gate.take() {
        frames.tick().await;
        if let Some(event) = engine.tick(origin.elapsed()) {
            print_event(&event, json)?;
        }
    }
    Ok(())
}

/// Drive the engine with evenly spaced synthetic frames.
fn simulate(engine: &mut BreathEngine, gate: &FrameGate, fps: u32) -> Vec<Event> {
    let mut events = vec![engine.start()];
    let mut frame: u64 = 0;
    while gate.take() {
        let now = Duration::from_secs(frame) / fps;
        if let Some(event) = engine.tick(now) {
            events.push(event);
        }
        frame += 1;
    }
    events
}
