//! Sensory cues fired on phase entry.
//!
//! The engine talks to two injected collaborators, a [`TonePlayer`] and a
//! [`HapticFeedback`], through a [`CueDispatcher`]. Delivery is
//! fire-and-forget: failures are logged here and never reach timer state.

mod haptics;
mod tone;

use serde::{Deserialize, Serialize};

pub use haptics::{pulse_ms, HapticFeedback, NoHaptics, BREATH_PULSE_MS, HOLD_PULSE_MS};
pub use tone::{SilentTones, Tone, TonePlayer, ToneRequest};

use crate::error::{CueError, ValidationError};
use crate::timer::PhaseKind;

/// Timbre family for tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundProfile {
    #[default]
    Sine,
    /// Low and long, like a singing bowl.
    Bowl,
    /// High and short.
    Chime,
}

impl SoundProfile {
    pub(crate) fn pitch_ratio(self) -> f64 {
        match self {
            SoundProfile::Sine => 1.0,
            SoundProfile::Bowl => 0.5,
            SoundProfile::Chime => 2.0,
        }
    }

    pub(crate) fn duration_ms(self) -> u32 {
        match self {
            SoundProfile::Sine => 400,
            SoundProfile::Bowl => 1200,
            SoundProfile::Chime => 250,
        }
    }
}

impl std::str::FromStr for SoundProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sine" => Ok(SoundProfile::Sine),
            "bowl" => Ok(SoundProfile::Bowl),
            "chime" => Ok(SoundProfile::Chime),
            other => Err(format!("unknown sound profile: {other}")),
        }
    }
}

/// Cue delivery toggles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueSettings {
    pub sound_enabled: bool,
    /// 0.0 .. 1.0
    pub volume: f64,
    pub profile: SoundProfile,
    pub haptics_enabled: bool,
    pub mute_holds: bool,
}

impl CueSettings {
    /// Everything off.
    pub fn silent() -> Self {
        Self {
            sound_enabled: false,
            haptics_enabled: false,
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::VolumeOutOfRange`] when volume is outside
    /// `0.0..=1.0` or not a number.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ValidationError::VolumeOutOfRange(self.volume));
        }
        Ok(())
    }
}

impl Default for CueSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            volume: 0.5,
            profile: SoundProfile::default(),
            haptics_enabled: true,
            mute_holds: false,
        }
    }
}

/// Routes cue requests to the injected collaborators.
pub struct CueDispatcher {
    settings: CueSettings,
    tones: Box<dyn TonePlayer>,
    haptics: Box<dyn HapticFeedback>,
}

impl CueDispatcher {
    pub fn new(
        settings: CueSettings,
        tones: Box<dyn TonePlayer>,
        haptics: Box<dyn HapticFeedback>,
    ) -> Self {
        Self {
            settings,
            tones,
            haptics,
        }
    }

    pub fn silent() -> Self {
        Self::new(
            CueSettings::silent(),
            Box::new(SilentTones),
            Box::new(NoHaptics),
        )
    }

    pub fn settings(&self) -> &CueSettings {
        &self.settings
    }

    pub(crate) fn set_settings(&mut self, settings: CueSettings) {
        self.settings = settings;
    }

    /// Tone and vibration for entering a breathing phase.
    pub fn phase_entry(&mut self, phase: PhaseKind) {
        self.play(phase);
        if self.settings.haptics_enabled {
            if let Some(ms) = pulse_ms(phase) {
                if let Err(e) = self.haptics.vibrate(ms) {
                    log_failure("haptic", phase, &e);
                }
            }
        }
    }

    /// Tone for a whole-second step of the pre-roll countdown.
    pub fn countdown_tick(&mut self) {
        self.play(PhaseKind::Countdown);
    }

    fn play(&mut self, phase: PhaseKind) {
        if !self.settings.sound_enabled {
            return;
        }
        let request = ToneRequest {
            phase,
            volume: self.settings.volume,
            profile: self.settings.profile,
            mute_holds: self.settings.mute_holds,
        };
        if let Err(e) = self.tones.play(&request) {
            log_failure("tone", phase, &e);
        }
    }
}

impl std::fmt::Debug for CueDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CueDispatcher")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn log_failure(kind: &str, phase: PhaseKind, err: &CueError) {
    tracing::warn!(cue = kind, %phase, error = %err, "cue delivery failed; ignoring");
}
