use serde::{Deserialize, Serialize};

use super::SoundProfile;
use crate::error::CueError;
use crate::timer::PhaseKind;

/// What the engine asks a tone player to do on a phase entry or countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneRequest {
    /// `Countdown` means a countdown tick.
    pub phase: PhaseKind,
    /// 0.0 .. 1.0
    pub volume: f64,
    pub profile: SoundProfile,
    /// Holds stay silent when set.
    pub mute_holds: bool,
}

/// A concrete tone to synthesize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f64,
    pub duration_ms: u32,
    pub gain: f64,
}

const INHALE_HZ: f64 = 523.25;
const HOLD_HZ: f64 = 440.0;
const EXHALE_HZ: f64 = 392.0;
const TICK_HZ: f64 = 880.0;
const TICK_MS: u32 = 120;

impl ToneRequest {
    /// Resolve the request into a tone, or `None` when nothing should sound.
    pub fn tone(&self) -> Option<Tone> {
        if self.volume <= 0.0 || (self.mute_holds && self.phase.is_hold()) {
            return None;
        }

        let (base_hz, duration_ms) = match self.phase {
            PhaseKind::Inhale => (INHALE_HZ, self.profile.duration_ms()),
            PhaseKind::Exhale => (EXHALE_HZ, self.profile.duration_ms()),
            PhaseKind::Hold1 | PhaseKind::Hold2 => (HOLD_HZ, self.profile.duration_ms()),
            PhaseKind::Countdown => (TICK_HZ, TICK_MS),
            PhaseKind::Idle => return None,
        };

        Some(Tone {
            frequency_hz: base_hz * self.profile.pitch_ratio(),
            duration_ms,
            gain: self.volume.clamp(0.0, 1.0),
        })
    }
}

/// Audible feedback collaborator.
///
/// Implementations must honor [`ToneRequest::mute_holds`];
/// [`ToneRequest::tone`] already does. Errors are logged by the caller and
/// otherwise ignored.
pub trait TonePlayer: Send {
    fn play(&mut self, request: &ToneRequest) -> Result<(), CueError>;
}

/// Player that never makes a sound.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentTones;

impl TonePlayer for SilentTones {
    fn play(&mut self, _request: &ToneRequest) -> Result<(), CueError> {
        Ok(())
    }
}
