//! Terminal rendering and cue output.

use std::io::Write;

use breathwork_core::cues::{TonePlayer, ToneRequest};
use breathwork_core::{CueError, Event, PhaseKind};

/// Sounds tones as the terminal bell on stderr.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TonePlayer for TerminalBell {
    fn play(&mut self, request: &ToneRequest) -> Result<(), CueError> {
        if request.tone().is_none() {
            return Ok(());
        }
        let mut err = std::io::stderr();
        err.write_all(b"\x07")
            .and_then(|_| err.flush())
            .map_err(|e| CueError::Device(e.to_string()))
    }
}

fn phase_label(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Idle => "idle",
        PhaseKind::Countdown => "get ready",
        PhaseKind::Inhale => "breathe in",
        PhaseKind::Hold1 | PhaseKind::Hold2 => "hold",
        PhaseKind::Exhale => "breathe out",
    }
}

/// One human-readable line for an event.
pub fn render(event: &Event) -> String {
    match event {
        Event::SessionStarted {
            pattern,
            total_duration_secs,
            ..
        } => format!("session started: {pattern} for {total_duration_secs}s\n3..."),
        Event::CountdownTick { seconds_left, .. } => format!("{seconds_left}..."),
        Event::PhaseChanged {
            phase,
            duration_secs,
            breath_count,
            ..
        } => format!(
            "{:<12} {:>5}s   breaths: {breath_count}",
            phase_label(*phase),
            duration_secs
        ),
        Event::SessionCompleted { breath_count, .. } => {
            format!("session complete: {breath_count} breaths")
        }
        Event::SessionPaused { .. } => "paused".to_string(),
        Event::SessionResumed { .. } => "resumed".to_string(),
        Event::SessionStopped { breath_count, .. } => {
            format!("session stopped after {breath_count} breaths")
        }
        Event::StateSnapshot { state, .. } => format!(
            "{} {:.1}s left in phase, {:.1}s left in session, {} breaths",
            state.phase, state.phase_time_remaining, state.total_time_remaining, state.breath_count
        ),
    }
}
