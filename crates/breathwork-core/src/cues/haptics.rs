use crate::error::CueError;
use crate::timer::PhaseKind;

/// Pulse length on inhale/exhale entry.
pub const BREATH_PULSE_MS: u32 = 100;
/// Pulse length on hold entry.
pub const HOLD_PULSE_MS: u32 = 40;

/// Vibration pulse for entering `phase`, if any.
pub fn pulse_ms(phase: PhaseKind) -> Option<u32> {
    match phase {
        PhaseKind::Inhale | PhaseKind::Exhale => Some(BREATH_PULSE_MS),
        PhaseKind::Hold1 | PhaseKind::Hold2 => Some(HOLD_PULSE_MS),
        PhaseKind::Idle | PhaseKind::Countdown => None,
    }
}

/// Vibration collaborator. Platforms without a motor should return `Ok(())`.
pub trait HapticFeedback: Send {
    fn vibrate(&mut self, duration_ms: u32) -> Result<(), CueError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn vibrate(&mut self, _duration_ms: u32) -> Result<(), CueError> {
        Ok(())
    }
}
