use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::{BreathPattern, PhaseKind, SessionState};

/// Every observable change in a session produces an Event.
///
/// `tick` yields at most one of `CountdownTick`, `PhaseChanged` or
/// `SessionCompleted`; the lifecycle commands return the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        pattern: BreathPattern,
        total_duration_secs: f64,
        at: DateTime<Utc>,
    },
    /// Pre-roll crossed a whole second.
    CountdownTick {
        seconds_left: u64,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        phase: PhaseKind,
        duration_secs: f64,
        breath_count: u32,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        session_id: Uuid,
        breath_count: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        phase: PhaseKind,
        phase_time_remaining: f64,
        total_time_remaining: f64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        phase: PhaseKind,
        phase_time_remaining: f64,
        total_time_remaining: f64,
        at: DateTime<Utc>,
    },
    SessionStopped {
        breath_count: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        pattern: BreathPattern,
        at: DateTime<Utc>,
    },
}
