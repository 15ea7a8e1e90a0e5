//! # Breathwork Core Library
//!
//! This library provides the core logic for guided breathing sessions.
//! Everything is usable from the standalone CLI binary; any richer front end
//! is a thin layer over the same engine.
//!
//! ## Architecture
//!
//! - **Breath Engine**: A frame-driven state machine that requires the host
//!   to call `tick()` once per display refresh with a monotonic timestamp
//! - **Cues**: Tone and haptic collaborators injected into the engine;
//!   failures are logged and never affect timing
//! - **Storage**: TOML-based user preferences
//!
//! ## Key Components
//!
//! - [`BreathEngine`]: Core phase state machine
//! - [`BreathPattern`]: Phase durations for a breathing technique
//! - [`CueDispatcher`]: Fire-and-forget cue delivery
//! - [`Config`]: Preference management

pub mod cues;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use cues::{CueDispatcher, CueSettings, HapticFeedback, SoundProfile, TonePlayer, ToneRequest};
pub use error::{ConfigError, CoreError, CueError, ValidationError};
pub use events::Event;
pub use storage::Config;
pub use timer::{
    BreathEngine, BreathPattern, EngineConfig, FrameGate, FrameScheduler, PhaseKind,
    PhaseSequence, SessionState,
};
