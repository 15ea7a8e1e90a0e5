use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Every state the engine can report.
///
/// `Idle` and `Countdown` bracket a session; the other four are the
/// breathing phases a [`PhaseSequence`] is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Idle,
    Countdown,
    Inhale,
    /// Hold after inhale.
    Hold1,
    Exhale,
    /// Hold after exhale.
    Hold2,
}

impl PhaseKind {
    pub fn is_hold(self) -> bool {
        matches!(self, PhaseKind::Hold1 | PhaseKind::Hold2)
    }

    /// True for the four phases that make up a breath cycle.
    pub fn is_breathing(self) -> bool {
        !matches!(self, PhaseKind::Idle | PhaseKind::Countdown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PhaseKind::Idle => "idle",
            PhaseKind::Countdown => "countdown",
            PhaseKind::Inhale => "inhale",
            PhaseKind::Hold1 => "hold1",
            PhaseKind::Exhale => "exhale",
            PhaseKind::Hold2 => "hold2",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Phase durations in seconds.
///
/// A hold of zero removes that hold from the active sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreathPattern {
    pub inhale: f64,
    #[serde(default)]
    pub hold1: f64,
    pub exhale: f64,
    #[serde(default)]
    pub hold2: f64,
}

impl BreathPattern {
    pub const fn new(inhale: f64, hold1: f64, exhale: f64, hold2: f64) -> Self {
        Self {
            inhale,
            hold1,
            exhale,
            hold2,
        }
    }

    /// Reject patterns the engine cannot run.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDuration`] for negative or non-finite
    /// fields, [`ValidationError::EmptyPattern`] when everything is zero and
    /// [`ValidationError::ZeroLengthPhase`] when inhale or exhale is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("inhale", self.inhale),
            ("hold1", self.hold1),
            ("exhale", self.exhale),
            ("hold2", self.hold2),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidDuration {
                    field: field.to_string(),
                    value,
                });
            }
        }
        if fields.iter().all(|(_, v)| *v == 0.0) {
            return Err(ValidationError::EmptyPattern);
        }
        if self.inhale == 0.0 {
            return Err(ValidationError::ZeroLengthPhase {
                phase: PhaseKind::Inhale,
            });
        }
        if self.exhale == 0.0 {
            return Err(ValidationError::ZeroLengthPhase {
                phase: PhaseKind::Exhale,
            });
        }
        Ok(())
    }

    /// Length of one full cycle in seconds.
    pub fn cycle_secs(&self) -> f64 {
        self.inhale + self.hold1 + self.exhale + self.hold2
    }

    pub fn breaths_per_minute(&self) -> f64 {
        let cycle = self.cycle_secs();
        if cycle <= 0.0 {
            return 0.0;
        }
        60.0 / cycle
    }
}

impl Default for BreathPattern {
    fn default() -> Self {
        Self::new(4.0, 4.0, 4.0, 4.0)
    }
}

impl fmt::Display for BreathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.inhale, self.hold1, self.exhale, self.hold2
        )
    }
}

/// One entry of the active sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseStep {
    pub kind: PhaseKind,
    /// Duration in seconds.
    pub duration: f64,
}

/// The ordered phases a session cycles through.
///
/// Built from a validated [`BreathPattern`]: inhale and exhale always,
/// each hold only when its duration is positive. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSequence {
    steps: Vec<PhaseStep>,
}

impl PhaseSequence {
    /// # Errors
    ///
    /// Propagates [`BreathPattern::validate`] failures.
    pub fn from_pattern(pattern: &BreathPattern) -> Result<Self, ValidationError> {
        pattern.validate()?;

        let candidates = [
            (PhaseKind::Inhale, pattern.inhale),
            (PhaseKind::Hold1, pattern.hold1),
            (PhaseKind::Exhale, pattern.exhale),
            (PhaseKind::Hold2, pattern.hold2),
        ];
        let steps = candidates
            .into_iter()
            .filter(|(kind, duration)| !kind.is_hold() || *duration > 0.0)
            .map(|(kind, duration)| PhaseStep { kind, duration })
            .collect();

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[PhaseStep] {
        &self.steps
    }

    pub fn first(&self) -> PhaseStep {
        self.steps[0]
    }

    /// The step after `current`, wrapping to the start.
    ///
    /// A phase that is not part of this sequence (countdown, or a hold that
    /// was removed by a pattern change) is followed by the first step.
    pub fn next_after(&self, current: PhaseKind) -> PhaseStep {
        match self.steps.iter().position(|s| s.kind == current) {
            Some(i) => self.steps[(i + 1) % self.steps.len()],
            None => self.first(),
        }
    }

    pub fn cycle_secs(&self) -> f64 {
        self.steps.iter().map(|s| s.duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(seq: &PhaseSequence) -> Vec<PhaseKind> {
        seq.steps().iter().map(|s| s.kind).collect()
    }

    #[test]
    fn zero_holds_are_omitted() {
        let seq = PhaseSequence::from_pattern(&BreathPattern::new(4.0, 0.0, 6.0, 0.0)).unwrap();
        assert_eq!(kinds(&seq), vec![PhaseKind::Inhale, PhaseKind::Exhale]);
        assert_eq!(seq.cycle_secs(), 10.0);
    }

    #[test]
    fn box_pattern_has_four_steps() {
        let seq = PhaseSequence::from_pattern(&BreathPattern::default()).unwrap();
        assert_eq!(
            kinds(&seq),
            vec![
                PhaseKind::Inhale,
                PhaseKind::Hold1,
                PhaseKind::Exhale,
                PhaseKind::Hold2
            ]
        );
    }

    #[test]
    fn next_after_wraps() {
        let seq = PhaseSequence::from_pattern(&BreathPattern::new(4.0, 7.0, 8.0, 0.0)).unwrap();
        assert_eq!(seq.next_after(PhaseKind::Inhale).kind, PhaseKind::Hold1);
        assert_eq!(seq.next_after(PhaseKind::Exhale).kind, PhaseKind::Inhale);
        assert_eq!(seq.next_after(PhaseKind::Countdown).kind, PhaseKind::Inhale);
        // Hold2 is not in this sequence
        assert_eq!(seq.next_after(PhaseKind::Hold2).kind, PhaseKind::Inhale);
    }

    #[test]
    fn all_zero_pattern_is_rejected() {
        let err = BreathPattern::new(0.0, 0.0, 0.0, 0.0).validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyPattern);
    }

    #[test]
    fn zero_inhale_or_exhale_is_rejected() {
        assert_eq!(
            BreathPattern::new(0.0, 4.0, 4.0, 0.0).validate(),
            Err(ValidationError::ZeroLengthPhase {
                phase: PhaseKind::Inhale
            })
        );
        assert_eq!(
            BreathPattern::new(4.0, 4.0, 0.0, 4.0).validate(),
            Err(ValidationError::ZeroLengthPhase {
                phase: PhaseKind::Exhale
            })
        );
    }

    #[test]
    fn negative_and_nan_durations_are_rejected() {
        assert!(matches!(
            BreathPattern::new(4.0, -1.0, 4.0, 0.0).validate(),
            Err(ValidationError::InvalidDuration { ref field, .. }) if field == "hold1"
        ));
        assert!(BreathPattern::new(f64::NAN, 0.0, 4.0, 0.0).validate().is_err());
    }

    #[test]
    fn breaths_per_minute() {
        // 16 seconds per cycle
        assert!((BreathPattern::default().breaths_per_minute() - 3.75).abs() < 1e-9);
    }

    #[test]
    fn phase_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PhaseKind::Hold1).unwrap(), "\"hold1\"");
        assert_eq!(PhaseKind::Countdown.to_string(), "countdown");
    }
}
