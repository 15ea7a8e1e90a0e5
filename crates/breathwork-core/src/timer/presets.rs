//! Built-in breathing techniques.
//!
//! Each preset pairs a [`BreathPattern`] with the text shown when picking one.

use serde::Serialize;

use super::pattern::BreathPattern;

/// Experience level a technique is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternTier {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedPattern {
    pub id: &'static str,
    pub label: &'static str,
    pub tag: &'static str,
    pub description: &'static str,
    pub tier: PatternTier,
    pub pattern: BreathPattern,
}

/// Preset used when nothing else is configured.
pub const DEFAULT_PATTERN_ID: &str = "box";

const PRESETS: &[NamedPattern] = &[
    NamedPattern {
        id: "box",
        label: "Box Breathing",
        tag: "Focus",
        description: "Equal inhale, hold, exhale and hold to steady attention.",
        tier: PatternTier::Beginner,
        pattern: BreathPattern::new(4.0, 4.0, 4.0, 4.0),
    },
    NamedPattern {
        id: "4-7-8",
        label: "Tranquility",
        tag: "Sleep & Anxiety",
        description: "Long hold and longer exhale to settle the nervous system.",
        tier: PatternTier::Beginner,
        pattern: BreathPattern::new(4.0, 7.0, 8.0, 0.0),
    },
    NamedPattern {
        id: "calm",
        label: "Balance",
        tag: "Coherence",
        description: "Gentle inhale with a slightly longer exhale.",
        tier: PatternTier::Beginner,
        pattern: BreathPattern::new(4.0, 0.0, 6.0, 0.0),
    },
    NamedPattern {
        id: "coherence",
        label: "Coherence",
        tag: "Heart Rate Variability",
        description: "Five to six breaths a minute, evenly split.",
        tier: PatternTier::Intermediate,
        pattern: BreathPattern::new(6.0, 0.0, 6.0, 0.0),
    },
    NamedPattern {
        id: "deep-relax",
        label: "Deep Rest",
        tag: "Stress Relief",
        description: "Exhale twice as long as the inhale.",
        tier: PatternTier::Beginner,
        pattern: BreathPattern::new(4.0, 0.0, 8.0, 0.0),
    },
    NamedPattern {
        id: "7-11",
        label: "7-11",
        tag: "Deep Calm",
        description: "Slow counted breathing for moments of panic.",
        tier: PatternTier::Intermediate,
        pattern: BreathPattern::new(7.0, 0.0, 11.0, 0.0),
    },
    NamedPattern {
        id: "awake",
        label: "Energize",
        tag: "Wake Up",
        description: "Long inhale, short exhale to lift alertness.",
        tier: PatternTier::Intermediate,
        pattern: BreathPattern::new(4.0, 0.0, 2.0, 0.0),
    },
    NamedPattern {
        id: "triangle",
        label: "Triangle",
        tag: "Stability",
        description: "Inhale, hold and exhale for the same count.",
        tier: PatternTier::Beginner,
        pattern: BreathPattern::new(4.0, 4.0, 4.0, 0.0),
    },
    NamedPattern {
        id: "tactical",
        label: "Tactical",
        tag: "Advanced Focus",
        description: "Extended box breathing for high-pressure situations.",
        tier: PatternTier::Advanced,
        pattern: BreathPattern::new(5.0, 5.0, 5.0, 5.0),
    },
];

/// All presets in display order.
pub fn builtin_patterns() -> &'static [NamedPattern] {
    PRESETS
}

pub fn find_pattern(id: &str) -> Option<&'static NamedPattern> {
    PRESETS.iter().find(|p| p.id == id)
}
