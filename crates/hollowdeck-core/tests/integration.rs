//! Integration tests for hollowdeck-core.
//!
//! These tests drive the whole pipeline through the public surface:
//! seeded engine → mode scheduling → sink output, plus drift persistence
//! across engine lifetimes.

use std::time::{Duration, Instant};

use hollowdeck_core::{
    render_frame, DriftState, Engine, FileDriftStore, MemoryDriftStore, MemorySink, Mode,
    PatternKind, PortStatus, LOG_CAP, RAMP, SENTINEL,
};

fn fresh_engine(seed: u32, now: Instant) -> Engine {
    let drift = DriftState::new(Box::new(MemoryDriftStore::default()));
    Engine::new(seed, drift, now)
}

/// Step the engine in fixed increments, ticking at each step.
fn run_for(engine: &mut Engine, sink: &mut MemorySink, start: Instant, steps: u32, step: Duration) {
    let mut now = start;
    for _ in 0..steps {
        now += step;
        engine.tick(now, sink);
    }
}

#[test]
fn identical_seeds_replay_identical_sessions() {
    let now = Instant::now();
    let mut a_sink = MemorySink::new();
    let mut b_sink = MemorySink::new();
    let mut a = fresh_engine(99, now);
    let mut b = fresh_engine(99, now);

    a.select_mode(Mode::State, now, &mut a_sink);
    b.select_mode(Mode::State, now, &mut b_sink);
    run_for(&mut a, &mut a_sink, now, 200, Duration::from_millis(400));
    run_for(&mut b, &mut b_sink, now, 200, Duration::from_millis(400));

    assert_eq!(a_sink.log_lines, b_sink.log_lines);
    assert!(!a_sink.log_lines.is_empty());
}

#[test]
fn distinct_seeds_produce_distinct_sessions() {
    let now = Instant::now();
    let mut a_sink = MemorySink::new();
    let mut b_sink = MemorySink::new();
    let mut a = fresh_engine(1, now);
    let mut b = fresh_engine(2, now);

    a.select_mode(Mode::State, now, &mut a_sink);
    b.select_mode(Mode::State, now, &mut b_sink);
    run_for(&mut a, &mut a_sink, now, 100, Duration::from_millis(400));
    run_for(&mut b, &mut b_sink, now, 100, Duration::from_millis(400));

    assert_ne!(a_sink.log_lines, b_sink.log_lines);
}

#[test]
fn long_state_session_stays_within_cap_and_emits_sentinel() {
    let now = Instant::now();
    let mut sink = MemorySink::new();
    let mut engine = fresh_engine(42, now);

    engine.select_mode(Mode::State, now, &mut sink);
    run_for(&mut engine, &mut sink, now, 600, Duration::from_secs(2));

    assert!(engine.log_lines().count() <= LOG_CAP);
    // Over hundreds of draws the sentinel appears many times; a glitch can
    // touch individual characters, so match on the stable core.
    let sentinels = sink
        .log_lines
        .iter()
        .filter(|l| l.as_str() == SENTINEL)
        .count();
    assert!(sentinels > 10, "only {sentinels} sentinel lines");
}

#[test]
fn mode_cycle_keeps_streams_exclusive() {
    let mut now = Instant::now();
    let mut sink = MemorySink::new();
    let mut engine = fresh_engine(7, now);

    engine.select_mode(Mode::Hub, now, &mut sink);
    run_for(&mut engine, &mut sink, now, 20, Duration::from_secs(3));
    now += Duration::from_secs(60);
    assert!(sink.log_lines.is_empty(), "hub mode must not narrate");

    engine.select_mode(Mode::Ports, now, &mut sink);
    let summaries_after_hub = sink.summary_pushes.len();
    run_for(&mut engine, &mut sink, now, 20, Duration::from_secs(3));
    now += Duration::from_secs(60);
    assert_eq!(
        sink.summary_pushes.len(),
        summaries_after_hub,
        "ports mode must not push hub summaries"
    );
    assert!(sink.routing_pushes.len() > 1);

    engine.select_mode(Mode::State, now, &mut sink);
    let routing_after_ports = sink.routing_pushes.len();
    run_for(&mut engine, &mut sink, now, 20, Duration::from_secs(3));
    assert_eq!(
        sink.routing_pushes.len(),
        routing_after_ports,
        "state mode must not push routing tables"
    );
    assert!(!sink.log_lines.is_empty());
}

#[test]
fn high_drift_biases_port_statuses() {
    let now = Instant::now();
    let mut sink = MemorySink::new();
    let drift = DriftState::new(Box::new(MemoryDriftStore::with_value(1.0)));
    let mut engine = Engine::new(11, drift, now);
    assert!(engine.drift() > 0.6);

    engine.select_mode(Mode::Ports, now, &mut sink);
    run_for(&mut engine, &mut sink, now, 80, Duration::from_secs(5));

    // Every mutation under high drift lands in the degraded pool. Seeded
    // statuses may linger, so check the mutated ones via recency.
    let biased = [
        PortStatus::Leak,
        PortStatus::Looping,
        PortStatus::Filtered,
        PortStatus::Silent,
    ];
    let last_push = sink.port_pushes.last().unwrap();
    let degraded = last_push
        .iter()
        .filter(|p| {
            biased
                .iter()
                .any(|b| p.status == b.to_string())
        })
        .count();
    assert!(degraded >= 4, "expected bias to accumulate, got {degraded}");
}

#[test]
fn drift_survives_engine_restart_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drift");
    let now = Instant::now();

    {
        let drift = DriftState::new(Box::new(FileDriftStore::new(&path)));
        let mut engine = Engine::new(5, drift, now);
        for i in 0..10 {
            engine.hover_port(now + Duration::from_millis(300 * i));
        }
        engine.shutdown();
    }
    let raised = {
        let drift = DriftState::new(Box::new(FileDriftStore::new(&path)));
        let engine = Engine::new(5, drift, now);
        engine.drift()
    };
    // Ten hover bumps of at least 0.01 each, inherited at 0.9 scale.
    assert!(raised > 0.08, "drift {raised} should outlive the session");
}

#[test]
fn gallery_frames_use_only_ramp_glyphs() {
    let now = Instant::now();
    let mut sink = MemorySink::new();
    let mut engine = fresh_engine(3, now);

    engine.set_gallery_visible(true, now, &mut sink);
    run_for(&mut engine, &mut sink, now, 30, Duration::from_millis(200));

    assert!(sink.frames.len() > PatternKind::ALL.len());
    for frame in &sink.frames {
        for ch in frame.text.chars() {
            assert!(ch == '\n' || RAMP.contains(&ch), "stray glyph {ch:?}");
        }
    }
}

#[test]
fn rendered_frame_matches_direct_render() {
    // The animator's first visible frame for a node is the t=0 field render.
    let now = Instant::now();
    let mut sink = MemorySink::new();
    let mut engine = fresh_engine(4, now);

    engine.set_gallery_visible(true, now, &mut sink);
    let first = &sink.frames[0];
    let direct = render_frame(first.kind, 0.0).to_text();
    assert_eq!(first.text, direct);
}
