//! Side feeds: auxiliary low-stakes generators.
//!
//! Three small streams that dress up the panels around the main log: a
//! trace feed, a status-metrics feed with attached notes, and a rotating
//! corner caption. Each is deadline-driven like the main scheduler and
//! slightly quickened by drift.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::rng::Mulberry32;

const TRACE_POOL: [&str; 4] = [
    "signal accepted",
    "context reduced",
    "redundancy ignored",
    "execution path retained",
];

/// Retained trace lines.
pub const TRACE_CAP: usize = 6;

static STATUS_SETS: [[&str; 4]; 3] = [
    [
        "uptime: fragmented",
        "decision debt: accumulating",
        "external signals: noisy",
        "confidence: probabilistic",
    ],
    [
        "uptime: intermittent",
        "decision debt: rising",
        "external signals: saturated",
        "confidence: unstable",
    ],
    [
        "uptime: drifting",
        "decision debt: unresolved",
        "external signals: sparse",
        "confidence: partial",
    ],
];

const NOTE_POOL: [&str; 4] = [
    "previous input affected latency",
    "state drift detected",
    "buffer reclaimed",
    "signal jitter observed",
];

/// Retained status notes.
pub const NOTE_CAP: usize = 3;

static CORNER_POOL: [&str; 4] = [
    "listening ≠ responding",
    "constraints: minimal",
    "channel open",
    "signal present",
];

/// Corner caption rotation interval.
pub const CORNER_INTERVAL: Duration = Duration::from_millis(2_200);

/// Trace feed: short acknowledgement lines on a drift-quickened tempo.
pub struct TraceFeed {
    rng: Mulberry32,
    lines: VecDeque<String>,
    next: Option<Instant>,
}

impl TraceFeed {
    pub fn new(rng: Mulberry32) -> Self {
        Self {
            rng,
            lines: VecDeque::with_capacity(TRACE_CAP),
            next: None,
        }
    }

    /// Start emitting. The first line lands immediately.
    pub fn start(&mut self, now: Instant) {
        if self.next.is_none() {
            self.next = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    /// Emit when due; returns the new line.
    pub fn tick(&mut self, now: Instant, drift: f64) -> Option<&str> {
        let deadline = self.next?;
        if now < deadline {
            return None;
        }
        let line = self.rng.pick(&TRACE_POOL).to_string();
        self.lines.push_back(line);
        while self.lines.len() > TRACE_CAP {
            self.lines.pop_front();
        }
        let factor = 1.0 - (drift * 0.18).min(0.3);
        let base = self.rng.range(900.0, 2_700.0);
        let delay = (base * factor).max(600.0);
        self.next = Some(now + Duration::from_millis(delay as u64));
        self.lines.back().map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &String> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Status feed: a metric block re-rendered on one cadence and a bounded
/// note ring on another.
pub struct StatusFeed {
    rng: Mulberry32,
    metrics: &'static [&'static str; 4],
    notes: VecDeque<String>,
    next_metrics: Option<Instant>,
    next_note: Option<Instant>,
}

impl StatusFeed {
    pub fn new(mut rng: Mulberry32) -> Self {
        let metrics = &STATUS_SETS[rng.index(STATUS_SETS.len())];
        Self {
            rng,
            metrics,
            notes: VecDeque::with_capacity(NOTE_CAP),
            next_metrics: None,
            next_note: None,
        }
    }

    pub fn start(&mut self, now: Instant, drift: f64) {
        let factor = 1.0 - (drift * 0.2).min(0.35);
        if self.next_metrics.is_none() {
            let delay = (2_400.0 * factor).max(1_400.0);
            self.next_metrics = Some(now + Duration::from_millis(delay as u64));
        }
        if self.next_note.is_none() {
            let delay = (2_600.0 * factor).max(1_600.0);
            self.next_note = Some(now + Duration::from_millis(delay as u64));
        }
    }

    pub fn stop(&mut self) {
        self.next_metrics = None;
        self.next_note = None;
    }

    /// Fire whichever cadence is due. Returns true when anything changed.
    pub fn tick(&mut self, now: Instant, drift: f64) -> bool {
        let factor = 1.0 - (drift * 0.2).min(0.35);
        let mut changed = false;
        if let Some(deadline) = self.next_metrics
            && now >= deadline
        {
            self.metrics = &STATUS_SETS[self.rng.index(STATUS_SETS.len())];
            let delay = (2_400.0 * factor).max(1_400.0);
            self.next_metrics = Some(now + Duration::from_millis(delay as u64));
            changed = true;
        }
        if let Some(deadline) = self.next_note
            && now >= deadline
        {
            self.notes.push_back(self.rng.pick(&NOTE_POOL).to_string());
            while self.notes.len() > NOTE_CAP {
                self.notes.pop_front();
            }
            let delay = (2_600.0 * factor).max(1_600.0);
            self.next_note = Some(now + Duration::from_millis(delay as u64));
            changed = true;
        }
        changed
    }

    pub fn metrics(&self) -> &[&'static str] {
        self.metrics
    }

    pub fn notes(&self) -> impl Iterator<Item = &String> {
        self.notes.iter()
    }
}

/// Rotating corner caption.
pub struct CornerCaption {
    rng: Mulberry32,
    current: &'static str,
    next: Option<Instant>,
}

impl CornerCaption {
    pub fn new(mut rng: Mulberry32) -> Self {
        let current = *rng.pick(&CORNER_POOL);
        Self {
            rng,
            current,
            next: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        if self.next.is_none() {
            self.next = Some(now + CORNER_INTERVAL);
        }
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.next else {
            return false;
        };
        if now < deadline {
            return false;
        }
        self.current = *self.rng.pick(&CORNER_POOL);
        self.next = Some(now + CORNER_INTERVAL);
        true
    }

    pub fn current(&self) -> &'static str {
        self.current
    }
}
