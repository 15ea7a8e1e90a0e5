//! Breath phase engine.
//!
//! A frame-driven state machine. It owns no thread and no clock: the host
//! calls `tick()` with a monotonic timestamp once per display refresh, and
//! the engine asks for the next frame through its [`FrameScheduler`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Countdown (3s) -> Inhale -> [Hold1] -> Exhale -> [Hold2] -> Inhale ...
//!   ^                                                                   |
//!   +-------------- stop() or session time exhausted -------------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = BreathEngine::new(EngineConfig::default())?;
//! engine.start();
//! // Once per frame:
//! if let Some(event) = engine.tick(now) { /* phase change, completion */ }
//! ```

use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use super::frames::{FrameScheduler, Unscheduled};
use super::pattern::{BreathPattern, PhaseKind, PhaseSequence};
use super::state::SessionState;
use crate::cues::{CueDispatcher, CueSettings, HapticFeedback, TonePlayer};
use crate::error::ValidationError;
use crate::events::Event;

/// Length of the pre-roll before the first inhale.
pub const COUNTDOWN_SECS: f64 = 3.0;

/// Frame gaps above this are logged; they usually mean the host was suspended.
const LARGE_FRAME_DELTA_SECS: f64 = 1.0;

/// Session length used when none is configured.
pub const DEFAULT_SESSION_SECS: f64 = 300.0;

/// Everything needed to configure an engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub pattern: BreathPattern,
    /// Session length in seconds, excluding the countdown.
    pub total_duration_secs: f64,
    pub cues: CueSettings,
}

impl EngineConfig {
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in the pattern, duration
    /// or cue settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pattern.validate()?;
        validate_duration(self.total_duration_secs)?;
        self.cues.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pattern: BreathPattern::default(),
            total_duration_secs: DEFAULT_SESSION_SECS,
            cues: CueSettings::default(),
        }
    }
}

fn validate_duration(secs: f64) -> Result<(), ValidationError> {
    if secs.is_finite() && secs > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveSessionDuration(secs))
    }
}

/// Core breathing engine.
pub struct BreathEngine {
    pattern: BreathPattern,
    sequence: PhaseSequence,
    state: SessionState,
    session_id: Uuid,
    /// Timestamp of the previous active frame. `None` right after start or
    /// resume, so the next frame contributes no elapsed time.
    last_frame: Option<Duration>,
    cues: CueDispatcher,
    frames: Box<dyn FrameScheduler>,
}

impl BreathEngine {
    /// Create an idle engine with silent cues and no frame scheduler.
    ///
    /// Cue toggles from `config` are kept; attach real collaborators with
    /// [`with_cues`](Self::with_cues).
    ///
    /// # Errors
    ///
    /// Rejects invalid configuration before any tick can run.
    pub fn new(config: EngineConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        let sequence = PhaseSequence::from_pattern(&config.pattern)?;
        let mut cues = CueDispatcher::silent();
        cues.set_settings(config.cues);

        Ok(Self {
            pattern: config.pattern,
            sequence,
            state: SessionState::idle(config.total_duration_secs),
            session_id: Uuid::nil(),
            last_frame: None,
            cues,
            frames: Box::new(Unscheduled),
        })
    }

    /// Attach tone and haptic collaborators.
    pub fn with_cues(
        mut self,
        tones: impl TonePlayer + 'static,
        haptics: impl HapticFeedback + 'static,
    ) -> Self {
        let settings = *self.cues.settings();
        self.cues = CueDispatcher::new(settings, Box::new(tones), Box::new(haptics));
        self
    }

    /// Attach the host's frame scheduler.
    pub fn with_frames(mut self, frames: impl FrameScheduler + 'static) -> Self {
        self.frames = Box::new(frames);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn phase(&self) -> PhaseKind {
        self.state.phase
    }

    pub fn breath_count(&self) -> u32 {
        self.state.breath_count
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused
    }

    pub fn pattern(&self) -> &BreathPattern {
        &self.pattern
    }

    pub fn sequence(&self) -> &PhaseSequence {
        &self.sequence
    }

    pub fn cue_settings(&self) -> &CueSettings {
        self.cues.settings()
    }

    /// Id of the current or most recent session; nil before the first start.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            pattern: self.pattern,
            at: Utc::now(),
        }
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Replace the pattern.
    ///
    /// A phase already in progress keeps its duration and remaining time;
    /// the new sequence applies from the next phase change.
    ///
    /// # Errors
    ///
    /// Invalid patterns are rejected and the current one is kept.
    pub fn set_pattern(&mut self, pattern: BreathPattern) -> Result<(), ValidationError> {
        self.sequence = PhaseSequence::from_pattern(&pattern)?;
        self.pattern = pattern;
        tracing::debug!(%pattern, running = self.state.is_running, "pattern updated");
        Ok(())
    }

    /// Change the session length.
    ///
    /// While idle this also resets the remaining time. While running the
    /// remaining time is only capped to the new length.
    ///
    /// # Errors
    ///
    /// Rejects non-positive or non-finite values.
    pub fn set_total_duration(&mut self, secs: f64) -> Result<(), ValidationError> {
        validate_duration(secs)?;
        self.state.total_duration = secs;
        if self.state.is_running {
            self.state.total_time_remaining = self.state.total_time_remaining.min(secs);
        } else {
            self.state.total_time_remaining = secs;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Rejects out-of-range volume.
    pub fn set_cue_settings(&mut self, settings: CueSettings) -> Result<(), ValidationError> {
        settings.validate()?;
        self.cues.set_settings(settings);
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new session with the countdown. Always resets.
    pub fn start(&mut self) -> Event {
        let total = self.state.total_duration;
        self.state = SessionState::idle(total);
        self.state.enter(PhaseKind::Countdown, COUNTDOWN_SECS);
        self.state.is_running = true;
        self.session_id = Uuid::new_v4();
        self.last_frame = None;
        self.frames.request_frame();

        tracing::info!(
            session = %self.session_id,
            pattern = %self.pattern,
            total,
            "session started"
        );
        Event::SessionStarted {
            session_id: self.session_id,
            pattern: self.pattern,
            total_duration_secs: total,
            at: Utc::now(),
        }
    }

    /// Freeze all timing. Frames keep arriving but change nothing.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running || self.state.is_paused {
            return None;
        }
        self.state.is_paused = true;
        tracing::debug!(phase = %self.state.phase, "session paused");
        Some(Event::SessionPaused {
            phase: self.state.phase,
            phase_time_remaining: self.state.phase_time_remaining,
            total_time_remaining: self.state.total_time_remaining,
            at: Utc::now(),
        })
    }

    /// Continue after a pause without counting the paused wall-clock time.
    pub fn resume(&mut self) -> Option<Event> {
        if !self.state.is_running || !self.state.is_paused {
            return None;
        }
        self.state.is_paused = false;
        self.last_frame = None;
        self.frames.request_frame();
        tracing::debug!(phase = %self.state.phase, "session resumed");
        Some(Event::SessionResumed {
            phase: self.state.phase,
            phase_time_remaining: self.state.phase_time_remaining,
            total_time_remaining: self.state.total_time_remaining,
            at: Utc::now(),
        })
    }

    /// Halt and return to idle. Fires no cues.
    pub fn stop(&mut self) -> Event {
        self.frames.cancel_frame();
        let breath_count = self.state.breath_count;
        self.state = SessionState::idle(self.state.total_duration);
        self.last_frame = None;
        tracing::info!(session = %self.session_id, breath_count, "session stopped");
        Event::SessionStopped {
            breath_count,
            at: Utc::now(),
        }
    }

    /// Frame callback. `now` is a monotonic timestamp from any fixed origin.
    ///
    /// Returns at most one event. Re-arms the next frame while a session is
    /// running, paused or not.
    pub fn tick(&mut self, now: Duration) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }

        let event = if self.state.is_paused {
            None
        } else {
            let delta = self.frame_delta(now);
            self.advance(delta)
        };

        if self.state.is_running {
            self.frames.request_frame();
        }
        event
    }

    /// Apply `delta_secs` of elapsed time to the session.
    ///
    /// Negative or non-finite deltas count as zero. A no-op while idle or
    /// paused.
    pub fn advance(&mut self, delta_secs: f64) -> Option<Event> {
        if !self.state.is_running || self.state.is_paused {
            return None;
        }
        let delta = if delta_secs.is_finite() {
            delta_secs.max(0.0)
        } else {
            0.0
        };

        if self.state.phase == PhaseKind::Countdown {
            return self.advance_countdown(delta);
        }

        let phase_left = self.state.phase_time_remaining - delta;
        let total_left = self.state.total_time_remaining - delta;

        if total_left <= 0.0 {
            return Some(self.complete());
        }

        self.state.total_time_remaining = total_left;
        if phase_left <= 0.0 {
            if self.state.phase == PhaseKind::Exhale {
                self.state.breath_count += 1;
            }
            let next = self.sequence.next_after(self.state.phase);
            return Some(self.enter_phase(next.kind, next.duration));
        }

        self.state.phase_time_remaining = phase_left;
        self.state.refresh_progress();
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn frame_delta(&mut self, now: Duration) -> f64 {
        let delta = match self.last_frame.replace(now) {
            Some(last) => now.saturating_sub(last).as_secs_f64(),
            None => 0.0,
        };
        if delta > LARGE_FRAME_DELTA_SECS {
            tracing::warn!(delta, phase = %self.state.phase, "large frame gap");
        } else {
            tracing::trace!(delta, "frame");
        }
        delta
    }

    fn advance_countdown(&mut self, delta: f64) -> Option<Event> {
        let before = self.state.phase_time_remaining;
        let after = before - delta;

        if after <= 0.0 {
            let first = self.sequence.first();
            return Some(self.enter_phase(first.kind, first.duration));
        }

        self.state.phase_time_remaining = after;
        self.state.refresh_progress();

        if after.ceil() < before.ceil() {
            let seconds_left = after.ceil() as u64;
            tracing::debug!(seconds_left, "countdown");
            self.cues.countdown_tick();
            return Some(Event::CountdownTick {
                seconds_left,
                at: Utc::now(),
            });
        }
        None
    }

    fn enter_phase(&mut self, phase: PhaseKind, duration: f64) -> Event {
        self.state.enter(phase, duration);
        tracing::debug!(%phase, duration, breath_count = self.state.breath_count, "phase changed");
        self.cues.phase_entry(phase);
        Event::PhaseChanged {
            phase,
            duration_secs: duration,
            breath_count: self.state.breath_count,
            at: Utc::now(),
        }
    }

    fn complete(&mut self) -> Event {
        if self.state.phase == PhaseKind::Exhale {
            self.state.breath_count += 1;
        }
        let breath_count = self.state.breath_count;

        self.state.phase = PhaseKind::Idle;
        self.state.phase_time_remaining = 0.0;
        self.state.phase_duration = 0.0;
        self.state.total_time_remaining = 0.0;
        self.state.progress = 0.0;
        self.state.is_running = false;
        self.state.is_paused = false;
        self.last_frame = None;
        self.frames.cancel_frame();

        tracing::info!(session = %self.session_id, breath_count, "session completed");
        Event::SessionCompleted {
            session_id: self.session_id,
            breath_count,
            at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for BreathEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreathEngine")
            .field("pattern", &self.pattern)
            .field("state", &self.state)
            .field("session_id", &self.session_id)
            .field("cues", &self.cues)
            .finish_non_exhaustive()
    }
}
