use serde::{Deserialize, Serialize};

use super::pattern::PhaseKind;

/// Observable session record.
///
/// Owned and mutated by the engine only; callers get copies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: PhaseKind,
    /// Seconds left in the current phase.
    pub phase_time_remaining: f64,
    /// Length of the current phase in seconds.
    pub phase_duration: f64,
    /// Seconds left in the session.
    pub total_time_remaining: f64,
    /// Configured session length in seconds.
    pub total_duration: f64,
    /// Completed breath cycles, counted at the end of each exhale.
    pub breath_count: u32,
    pub is_running: bool,
    pub is_paused: bool,
    /// 0.0 .. 1.0 progress within the current phase.
    pub progress: f64,
}

impl SessionState {
    /// Rest state for a session of `total_duration` seconds.
    pub fn idle(total_duration: f64) -> Self {
        Self {
            phase: PhaseKind::Idle,
            phase_time_remaining: 0.0,
            phase_duration: 0.0,
            total_time_remaining: total_duration,
            total_duration,
            breath_count: 0,
            is_running: false,
            is_paused: false,
            progress: 0.0,
        }
    }

    /// Enter `phase` with a full `duration`.
    pub(crate) fn enter(&mut self, phase: PhaseKind, duration: f64) {
        self.phase = phase;
        self.phase_duration = duration;
        self.phase_time_remaining = duration;
        self.progress = 0.0;
    }

    /// Recompute `progress` from the remaining phase time.
    pub(crate) fn refresh_progress(&mut self) {
        self.progress = if self.phase_duration > 0.0 {
            (1.0 - self.phase_time_remaining / self.phase_duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn elapsed_secs(&self) -> f64 {
        (self.total_duration - self.total_time_remaining).max(0.0)
    }

    /// 0.0 .. 1.0 progress across the whole session.
    pub fn session_progress(&self) -> f64 {
        if self.total_duration <= 0.0 {
            return 0.0;
        }
        (self.elapsed_secs() / self.total_duration).clamp(0.0, 1.0)
    }

    /// Whole seconds shown on a countdown display.
    pub fn display_secs(&self) -> u64 {
        self.phase_time_remaining.max(0.0).ceil() as u64
    }
}
