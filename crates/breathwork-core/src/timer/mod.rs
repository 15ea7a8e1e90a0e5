mod engine;
mod frames;
mod pattern;
mod presets;
mod state;

pub use engine::{BreathEngine, EngineConfig, COUNTDOWN_SECS, DEFAULT_SESSION_SECS};
pub use frames::{FrameGate, FrameScheduler, Unscheduled};
pub use pattern::{BreathPattern, PhaseKind, PhaseSequence, PhaseStep};
pub use presets::{builtin_patterns, find_pattern, NamedPattern, PatternTier, DEFAULT_PATTERN_ID};
pub use state::SessionState;
