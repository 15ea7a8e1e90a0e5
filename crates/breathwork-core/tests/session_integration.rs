//! Integration tests for full breathing sessions.
//!
//! Sessions are driven through `tick()` with synthetic timestamps and fake
//! cue collaborators that record what they were asked to do.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use breathwork_core::cues::{CueSettings, HapticFeedback, TonePlayer, ToneRequest};
use breathwork_core::timer::{BreathEngine, BreathPattern, EngineConfig, FrameGate, PhaseKind};
use breathwork_core::{CueError, Event};

#[derive(Clone, Default)]
struct CueLog {
    tones: Arc<Mutex<Vec<ToneRequest>>>,
    pulses: Arc<Mutex<Vec<u32>>>,
}

impl CueLog {
    fn tone_phases(&self) -> Vec<PhaseKind> {
        self.tones.lock().unwrap().iter().map(|r| r.phase).collect()
    }

    fn pulses(&self) -> Vec<u32> {
        self.pulses.lock().unwrap().clone()
    }
}

impl TonePlayer for CueLog {
    fn play(&mut self, request: &ToneRequest) -> Result<(), CueError> {
        self.tones.lock().unwrap().push(*request);
        Ok(())
    }
}

impl HapticFeedback for CueLog {
    fn vibrate(&mut self, duration_ms: u32) -> Result<(), CueError> {
        self.pulses.lock().unwrap().push(duration_ms);
        Ok(())
    }
}

/// Player that behaves like a browser before the first user gesture.
struct BlockedAudio;

impl TonePlayer for BlockedAudio {
    fn play(&mut self, _request: &ToneRequest) -> Result<(), CueError> {
        Err(CueError::AudioBlocked)
    }
}

impl HapticFeedback for BlockedAudio {
    fn vibrate(&mut self, _duration_ms: u32) -> Result<(), CueError> {
        Err(CueError::Unsupported)
    }
}

fn config(pattern: BreathPattern, secs: f64) -> EngineConfig {
    EngineConfig {
        pattern,
        total_duration_secs: secs,
        cues: CueSettings::default(),
    }
}

/// Tick every `step` seconds from t=0 until the session ends, collecting events.
fn run_to_completion(engine: &mut BreathEngine, step: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    let mut now = Duration::ZERO;
    for _ in 0..100_000 {
        if !engine.is_running() {
            break;
        }
        if let Some(ev) = engine.tick(now) {
            events.push(ev);
        }
        now += step;
    }
    events
}

fn phase_changes(events: &[Event]) -> Vec<PhaseKind> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::PhaseChanged { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect()
}

#[test]
fn inhale_exhale_session_counts_final_exhale() {
    let mut engine =
        BreathEngine::new(config(BreathPattern::new(4.0, 0.0, 6.0, 0.0), 20.0)).unwrap();
    engine.start();

    let events = run_to_completion(&mut engine, Duration::from_secs(1));

    assert_eq!(
        phase_changes(&events),
        vec![
            PhaseKind::Inhale,
            PhaseKind::Exhale,
            PhaseKind::Inhale,
            PhaseKind::Exhale
        ]
    );
    match events.last() {
        Some(Event::SessionCompleted { breath_count, .. }) => assert_eq!(*breath_count, 2),
        other => panic!("expected completion, got {other:?}"),
    }

    let state = engine.state();
    assert_eq!(state.phase, PhaseKind::Idle);
    assert_eq!(state.total_time_remaining, 0.0);
    assert_eq!(state.phase_time_remaining, 0.0);
    assert_eq!(state.breath_count, 2);
    assert!(!state.is_running);
}

#[test]
fn session_ending_mid_exhale_counts_partial_breath() {
    // 4+6+4 = 14s, so the session ends 3s into the second exhale
    let mut engine =
        BreathEngine::new(config(BreathPattern::new(4.0, 0.0, 6.0, 0.0), 17.0)).unwrap();
    engine.start();

    let mut events = Vec::new();
    let mut now = Duration::ZERO;
    let step = Duration::from_secs(1);
    let mut unfinished = None;
    while engine.is_running() {
        let before = engine.state();
        if let Some(ev) = engine.tick(now) {
            if matches!(ev, Event::SessionCompleted { .. }) {
                let left = before.phase_time_remaining - step.as_secs_f64();
                unfinished = Some((before.phase, left));
            }
            events.push(ev);
        }
        now += step;
    }

    assert_eq!(
        phase_changes(&events),
        vec![
            PhaseKind::Inhale,
            PhaseKind::Exhale,
            PhaseKind::Inhale,
            PhaseKind::Exhale
        ]
    );
    assert!(matches!(
        events.last(),
        Some(Event::SessionCompleted { breath_count: 2, .. })
    ));
    assert_eq!(unfinished, Some((PhaseKind::Exhale, 3.0)));

    let state = engine.state();
    assert_eq!(state.phase, PhaseKind::Idle);
    assert_eq!(state.total_time_remaining, 0.0);
    assert_eq!(state.phase_time_remaining, 0.0);
    assert_eq!(state.breath_count, 2);
}

#[test]
fn box_session_ends_after_one_cycle() {
    let mut engine =
        BreathEngine::new(config(BreathPattern::new(4.0, 4.0, 4.0, 4.0), 16.0)).unwrap();
    engine.start();

    let events = run_to_completion(&mut engine, Duration::from_millis(250));

    assert_eq!(
        phase_changes(&events),
        vec![
            PhaseKind::Inhale,
            PhaseKind::Hold1,
            PhaseKind::Exhale,
            PhaseKind::Hold2
        ]
    );
    assert!(matches!(
        events.last(),
        Some(Event::SessionCompleted { breath_count: 1, .. })
    ));
    assert_eq!(engine.phase(), PhaseKind::Idle);
}

#[test]
fn session_ending_in_hold_does_not_count_a_breath() {
    // inhale 4, hold 4 -> session ends 2s into the first hold
    let mut engine =
        BreathEngine::new(config(BreathPattern::new(4.0, 4.0, 4.0, 0.0), 6.0)).unwrap();
    engine.start();
    let events = run_to_completion(&mut engine, Duration::from_secs(1));
    assert!(matches!(
        events.last(),
        Some(Event::SessionCompleted { breath_count: 0, .. })
    ));
}

#[test]
fn countdown_emits_two_ticks_before_first_phase() {
    let mut engine = BreathEngine::new(config(BreathPattern::default(), 16.0)).unwrap();
    engine.start();
    let events = run_to_completion(&mut engine, Duration::from_millis(100));

    let ticks: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            Event::CountdownTick { seconds_left, .. } => Some(*seconds_left),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![2, 1]);
    assert!(matches!(
        events.iter().find(|e| !matches!(e, Event::CountdownTick { .. })),
        Some(Event::PhaseChanged {
            phase: PhaseKind::Inhale,
            ..
        })
    ));
}

#[test]
fn cues_fire_on_every_phase_entry() {
    let log = CueLog::default();
    let mut engine = BreathEngine::new(config(BreathPattern::new(4.0, 0.0, 6.0, 0.0), 20.0))
        .unwrap()
        .with_cues(log.clone(), log.clone());
    engine.start();
    run_to_completion(&mut engine, Duration::from_secs(1));

    assert_eq!(
        log.tone_phases(),
        vec![
            PhaseKind::Countdown,
            PhaseKind::Countdown,
            PhaseKind::Inhale,
            PhaseKind::Exhale,
            PhaseKind::Inhale,
            PhaseKind::Exhale,
        ]
    );
    assert_eq!(log.pulses(), vec![100, 100, 100, 100]);
}

#[test]
fn mute_holds_flag_reaches_the_player() {
    let log = CueLog::default();
    let mut cfg = config(BreathPattern::default(), 16.0);
    cfg.cues.mute_holds = true;
    cfg.cues.volume = 0.3;
    let mut engine = BreathEngine::new(cfg).unwrap().with_cues(log.clone(), log.clone());
    engine.start();
    run_to_completion(&mut engine, Duration::from_secs(1));

    let tones = log.tones.lock().unwrap();
    assert!(tones.iter().all(|r| r.mute_holds && r.volume == 0.3));
    let audible: Vec<PhaseKind> = tones
        .iter()
        .filter(|r| r.tone().is_some())
        .map(|r| r.phase)
        .filter(|p| p.is_breathing())
        .collect();
    assert_eq!(audible, vec![PhaseKind::Inhale, PhaseKind::Exhale]);
}

#[test]
fn failing_cues_do_not_affect_timing() {
    let mut quiet =
        BreathEngine::new(config(BreathPattern::new(4.0, 0.0, 6.0, 0.0), 20.0)).unwrap();
    let mut broken = BreathEngine::new(config(BreathPattern::new(4.0, 0.0, 6.0, 0.0), 20.0))
        .unwrap()
        .with_cues(BlockedAudio, BlockedAudio);

    quiet.start();
    broken.start();
    let a = run_to_completion(&mut quiet, Duration::from_secs(1));
    let b = run_to_completion(&mut broken, Duration::from_secs(1));

    assert_eq!(phase_changes(&a), phase_changes(&b));
    assert_eq!(quiet.state(), broken.state());
}

#[test]
fn paused_time_is_not_counted() {
    let pattern = BreathPattern::new(4.0, 0.0, 6.0, 0.0);
    let mut reference = BreathEngine::new(config(pattern, 60.0)).unwrap();
    let mut paused = BreathEngine::new(config(pattern, 60.0)).unwrap();
    reference.start();
    paused.start();

    for t in 0..=5 {
        reference.tick(Duration::from_secs(t));
        paused.tick(Duration::from_secs(t));
    }

    paused.pause();
    for t in 6..=500 {
        assert!(paused.tick(Duration::from_secs(t)).is_none());
    }
    paused.resume();
    // First frame after resume only re-establishes the reference point.
    paused.tick(Duration::from_secs(500));

    reference.tick(Duration::from_secs(6));
    paused.tick(Duration::from_secs(501));

    let a = reference.state();
    let b = paused.state();
    assert_eq!(a.phase, b.phase);
    assert_eq!(a.phase_time_remaining, b.phase_time_remaining);
    assert_eq!(a.total_time_remaining, b.total_time_remaining);
}

#[test]
fn background_gap_completes_instead_of_going_negative() {
    let mut engine = BreathEngine::new(config(BreathPattern::default(), 30.0)).unwrap();
    engine.start();
    engine.tick(Duration::ZERO);
    engine.tick(Duration::from_secs(3));
    assert_eq!(engine.phase(), PhaseKind::Inhale);

    // Tab was hidden for an hour
    let ev = engine.tick(Duration::from_secs(3603));
    assert!(matches!(ev, Some(Event::SessionCompleted { .. })));
    let state = engine.state();
    assert_eq!(state.total_time_remaining, 0.0);
    assert_eq!(state.breath_count, 0);
}

#[test]
fn changing_pattern_mid_phase_keeps_current_phase() {
    let mut engine =
        BreathEngine::new(config(BreathPattern::new(4.0, 0.0, 6.0, 0.0), 60.0)).unwrap();
    engine.start();
    engine.advance(3.0);
    engine.advance(1.0);
    let before = engine.state();
    assert_eq!(before.phase, PhaseKind::Inhale);

    engine.set_pattern(BreathPattern::new(8.0, 2.0, 8.0, 0.0)).unwrap();
    let after = engine.state();
    assert_eq!(after.phase_duration, before.phase_duration);
    assert_eq!(after.phase_time_remaining, before.phase_time_remaining);

    // The next phase comes from the new sequence
    match engine.advance(3.0) {
        Some(Event::PhaseChanged {
            phase,
            duration_secs,
            ..
        }) => {
            assert_eq!(phase, PhaseKind::Hold1);
            assert_eq!(duration_secs, 2.0);
        }
        other => panic!("expected phase change, got {other:?}"),
    }
}

#[test]
fn frame_requests_follow_the_session() {
    let gate = FrameGate::new();
    let mut engine = BreathEngine::new(config(BreathPattern::default(), 16.0))
        .unwrap()
        .with_frames(gate.clone());

    assert!(!gate.is_armed());
    engine.start();
    assert!(gate.take());

    engine.tick(Duration::ZERO);
    assert!(gate.take(), "tick re-arms while running");

    engine.pause();
    engine.tick(Duration::from_secs(1));
    assert!(gate.take(), "paused sessions keep receiving frames");

    engine.resume();
    engine.stop();
    assert!(!gate.is_armed(), "stop withdraws the pending frame");
    assert!(engine.tick(Duration::from_secs(2)).is_none());
    assert!(!gate.is_armed());
}

#[test]
fn completion_stops_frame_requests() {
    let gate = FrameGate::new();
    let mut engine = BreathEngine::new(config(BreathPattern::default(), 16.0))
        .unwrap()
        .with_frames(gate.clone());
    engine.start();
    run_to_completion(&mut engine, Duration::from_secs(1));
    assert!(!gate.is_armed());
}

#[test]
fn stop_fires_no_cues_and_restart_resets() {
    let log = CueLog::default();
    let mut engine = BreathEngine::new(config(BreathPattern::new(4.0, 0.0, 6.0, 0.0), 60.0))
        .unwrap()
        .with_cues(log.clone(), log.clone());
    engine.start();
    for t in 0..=14 {
        engine.tick(Duration::from_secs(t));
    }
    let tones_before = log.tone_phases().len();
    assert_eq!(engine.breath_count(), 1);

    engine.stop();
    assert_eq!(log.tone_phases().len(), tones_before);

    engine.start();
    let state = engine.state();
    assert_eq!(state.breath_count, 0);
    assert_eq!(state.phase, PhaseKind::Countdown);
    assert_eq!(state.total_time_remaining, 60.0);
}
