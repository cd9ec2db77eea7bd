use std::time::{Duration, Instant};

use hollowdeck_core::{NarrativeGen, StatusFeed, TraceFeed};

/// Stream generated lines to stdout.
pub fn run(feed: &str, lines: usize, drift: f64, seed: Option<u32>) {
    let drift = super::clamp_drift(drift);
    let rng = super::make_rng(seed);

    match feed {
        "trace" => run_trace(TraceFeed::new(rng), lines, drift),
        "status" => run_status(StatusFeed::new(rng), lines, drift),
        _ => run_log(NarrativeGen::new(rng), lines, drift),
    }
}

fn run_log(mut narrative: NarrativeGen, lines: usize, drift: f64) {
    for _ in 0..lines {
        let line = narrative.emit(drift);
        println!("{}", narrative.glitch(&line, drift));
    }
}

fn run_trace(mut trace: TraceFeed, lines: usize, drift: f64) {
    // Drive the feed with a synthetic clock stepped past every deadline.
    let mut now = Instant::now();
    trace.start(now);
    let mut emitted = 0;
    while emitted < lines {
        if let Some(line) = trace.tick(now, drift) {
            println!("{line}");
            emitted += 1;
        }
        now += Duration::from_secs(5);
    }
}

fn run_status(mut status: StatusFeed, lines: usize, drift: f64) {
    let mut now = Instant::now();
    status.start(now, drift);
    for metric in status.metrics() {
        println!("{metric}");
    }
    let mut emitted = 0;
    while emitted < lines {
        now += Duration::from_secs(10);
        if status.tick(now, drift)
            && let Some(note) = status.notes().last()
        {
            println!("{note}");
            emitted += 1;
        }
    }
}
