//! Log/narrative generator.
//!
//! Lines come from a fixed corpus of "category: body" phrases plus one
//! sentinel. Selection, corruption ("glitch"), and misattribution are all
//! drift-biased, and pacing alternates a steady tempo with rare
//! silence-then-burst regimes. Misattribution is deliberate: the body text
//! is kept but credited to the wrong subsystem, simulating unreliable
//! introspection.

use std::collections::VecDeque;
use std::time::Duration;

use crate::rng::Mulberry32;

/// The sentinel line. Never glitched by misattribution.
pub const SENTINEL: &str = "— no final state recorded —";

/// Category labels that can claim a line.
pub const CATEGORIES: [&str; 8] = [
    "state", "trace", "memory", "signal", "observer", "ports", "hub", "route",
];

/// The fixed corpus, sentinel excluded.
pub const CORPUS: [&str; 20] = [
    "trace: buffer drift",
    "state: observer engaged",
    "memory: echo unresolved",
    "signal: low variance",
    "observer: passive",
    "trace: residual latency",
    "state: partial coherence",
    "memory: selective retention",
    "signal: narrowband",
    "observer: quiet",
    "trace: recursion idle",
    "state: containment stable",
    "memory: soft index",
    "signal: noisy edges",
    "observer: peripheral",
    "trace: input shadow",
    "state: threshold near",
    "memory: overlap detected",
    "signal: attenuated",
    "observer: aligned",
];

/// Characters a glitch pass may splice in.
const GLITCH_POOL: [char; 12] = ['~', '!', '@', '#', '$', '%', '^', '&', '*', '+', '=', '?'];

/// Base sentinel chance; drift adds `drift * 0.12`.
const SENTINEL_BASE: f64 = 0.24;
const SENTINEL_DRIFT: f64 = 0.12;

/// Chance of repeating the previous line verbatim.
const REPEAT_CHANCE: f64 = 0.1;

/// Glitch chance: `0.06 + drift * 0.16`.
const GLITCH_BASE: f64 = 0.06;
const GLITCH_DRIFT: f64 = 0.16;

/// Chance a glitch pass touches a single character (else two).
const SINGLE_GLITCH_CHANCE: f64 = 0.65;

/// Misattribution chance: `min(0.16, 0.06 + drift * 0.1)`.
const MISATTRIBUTE_CAP: f64 = 0.16;
const MISATTRIBUTE_BASE: f64 = 0.06;
const MISATTRIBUTE_DRIFT: f64 = 0.1;

/// Chance an emitted line is echoed immediately.
pub const ECHO_CHANCE: f64 = 0.1;

/// Silence chance per pacing decision: `0.05 + drift * 0.1`.
const SILENCE_BASE: f64 = 0.05;
const SILENCE_DRIFT: f64 = 0.1;

/// Pacing decision for the next emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// Emit the next line after this delay.
    Line(Duration),
    /// Go quiet; a burst fires once the silence ends.
    Silence(Duration),
}

/// Drift-biased narrative stream.
pub struct NarrativeGen {
    rng: Mulberry32,
    last_line: Option<String>,
    burst_pending: bool,
}

impl NarrativeGen {
    pub fn new(rng: Mulberry32) -> Self {
        Self {
            rng,
            last_line: None,
            burst_pending: false,
        }
    }

    /// Select the next line: sentinel, repeat-of-previous, or corpus draw.
    pub fn pick_line(&mut self, drift: f64) -> String {
        if self.rng.chance(SENTINEL_BASE + drift * SENTINEL_DRIFT) {
            let line = SENTINEL.to_string();
            self.last_line = Some(line.clone());
            return line;
        }
        if self.last_line.is_some() && self.rng.chance(REPEAT_CHANCE) {
            return self.last_line.clone().unwrap_or_default();
        }
        let line = self.rng.pick(&CORPUS).to_string();
        self.last_line = Some(line.clone());
        line
    }

    /// Swap a "category: rest" line's label for a different category.
    /// The sentinel and label-less lines pass through untouched.
    pub fn misattribute(&mut self, line: &str, drift: f64) -> String {
        if line.starts_with('—') {
            return line.to_string();
        }
        let Some(idx) = line.find(':') else {
            return line.to_string();
        };
        let chance = (MISATTRIBUTE_BASE + drift * MISATTRIBUTE_DRIFT).min(MISATTRIBUTE_CAP);
        if !self.rng.chance(chance) {
            return line.to_string();
        }
        let base = line[..idx].trim().to_lowercase();
        let rest = line[idx + 1..].trim();
        let alts: Vec<&str> = CATEGORIES.iter().copied().filter(|c| *c != base).collect();
        if alts.is_empty() {
            return line.to_string();
        }
        format!("{}: {rest}", self.rng.pick(&alts))
    }

    /// Corruption pass: with a drift-biased chance, splice 1-2 punctuation
    /// characters into the line.
    pub fn glitch(&mut self, line: &str, drift: f64) -> String {
        if !self.rng.chance(GLITCH_BASE + drift * GLITCH_DRIFT) {
            return line.to_string();
        }
        let mut chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            return line.to_string();
        }
        let count = if self.rng.chance(SINGLE_GLITCH_CHANCE) { 1 } else { 2 };
        for _ in 0..count {
            let idx = self.rng.index(chars.len());
            chars[idx] = *self.rng.pick(&GLITCH_POOL);
        }
        chars.into_iter().collect()
    }

    /// Full emission: select, misattribute, stamp as previous. Glitching is
    /// a display-time pass; the stored previous line stays clean.
    pub fn emit(&mut self, drift: f64) -> String {
        let line = self.pick_line(drift);
        let line = self.misattribute(&line, drift);
        self.last_line = Some(line.clone());
        line
    }

    /// True when the emitted line should be echoed immediately.
    pub fn should_echo(&mut self) -> bool {
        self.rng.chance(ECHO_CHANCE)
    }

    /// Pacing for the next emission. Entering silence arms one burst.
    pub fn next_pace(&mut self, drift: f64) -> Pace {
        let base = self.rng.range(520.0, 1920.0);
        if self.rng.chance(SILENCE_BASE + drift * SILENCE_DRIFT) {
            self.burst_pending = true;
            let quiet = self.rng.range(6_000.0, 20_000.0);
            return Pace::Silence(Duration::from_millis(quiet as u64));
        }
        let tempo = (base - drift * 240.0).max(320.0);
        Pace::Line(Duration::from_millis(tempo as u64))
    }

    /// Consume the pending burst: 4-7 cumulative offsets 120-340 ms apart.
    pub fn take_burst(&mut self) -> Option<Vec<Duration>> {
        if !self.burst_pending {
            return None;
        }
        self.burst_pending = false;
        let n = 4 + self.rng.index(4);
        let mut offsets = Vec::with_capacity(n);
        let mut delay = 0.0;
        for _ in 0..n {
            delay += self.rng.range(120.0, 340.0);
            offsets.push(Duration::from_millis(delay as u64));
        }
        Some(offsets)
    }

    pub fn burst_pending(&self) -> bool {
        self.burst_pending
    }
}

/// Bounded display buffer: oldest lines evicted beyond the cap.
pub struct LogRing {
    lines: VecDeque<String>,
    cap: usize,
}

/// Hard retention cap for the system log.
pub const LOG_CAP: usize = 160;

impl LogRing {
    pub fn new(cap: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.cap {
            self.lines.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.lines.iter()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for LogRing {
    fn default() -> Self {
        Self::new(LOG_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: u32) -> NarrativeGen {
        NarrativeGen::new(Mulberry32::new(seed))
    }

    #[test]
    fn corpus_lines_have_category_shape() {
        for line in CORPUS {
            let (label, rest) = line.split_once(':').expect("missing label");
            assert!(CATEGORIES.contains(&label));
            assert!(!rest.trim().is_empty());
        }
    }

    #[test]
    fn sentinel_frequency_near_steady_state() {
        // At drift 0.08 the base sentinel chance is 0.2496; repeats can
        // re-emit the sentinel, so the steady state is p / (1 - 0.1(1-p))
        // ≈ 0.270. Seed 42 lands at 0.2672 over 10000 selections.
        let mut g = generator(42);
        let hits = (0..10_000)
            .filter(|_| g.pick_line(0.08) == SENTINEL)
            .count();
        let freq = hits as f64 / 10_000.0;
        assert!(
            (freq - 0.2699).abs() < 0.015,
            "sentinel frequency {freq} outside tolerance"
        );
    }

    #[test]
    fn repeat_reuses_previous_line() {
        let mut g = generator(9);
        let mut repeated = false;
        let mut prev = g.pick_line(0.0);
        for _ in 0..2000 {
            let line = g.pick_line(0.0);
            if line == prev {
                repeated = true;
            }
            prev = line;
        }
        assert!(repeated);
    }

    #[test]
    fn misattribution_never_touches_sentinel() {
        let mut g = generator(4);
        for _ in 0..500 {
            assert_eq!(g.misattribute(SENTINEL, 1.25), SENTINEL);
        }
    }

    #[test]
    fn misattribution_preserves_body() {
        let mut g = generator(12);
        let mut swapped = 0;
        for _ in 0..2000 {
            let out = g.misattribute("trace: buffer drift", 1.25);
            let (label, rest) = out.split_once(':').unwrap();
            assert_eq!(rest.trim(), "buffer drift");
            assert!(CATEGORIES.contains(&label));
            if label != "trace" {
                swapped += 1;
            }
        }
        // Cap is 0.16; expect roughly 320 swaps out of 2000.
        assert!(swapped > 200 && swapped < 450, "swapped {swapped}");
    }

    #[test]
    fn glitch_preserves_length() {
        let mut g = generator(6);
        for _ in 0..2000 {
            let out = g.glitch("signal: narrowband", 1.25);
            assert_eq!(out.chars().count(), "signal: narrowband".chars().count());
        }
    }

    #[test]
    fn glitch_fires_at_expected_rate() {
        let mut g = generator(21);
        let changed = (0..5000)
            .filter(|_| g.glitch("observer: aligned", 0.5) != "observer: aligned")
            .count();
        // Chance at drift 0.5 is 0.14. The pool is pure punctuation, so a
        // glitch never replaces a corpus character with itself. Allow a
        // generous band.
        let rate = changed as f64 / 5000.0;
        assert!((rate - 0.14).abs() < 0.03, "glitch rate {rate}");
    }

    #[test]
    fn pace_silence_arms_burst() {
        let mut g = generator(30);
        let mut saw_silence = false;
        for _ in 0..500 {
            match g.next_pace(1.0) {
                Pace::Silence(quiet) => {
                    saw_silence = true;
                    assert!(quiet >= Duration::from_millis(6_000));
                    assert!(quiet < Duration::from_millis(20_000));
                    assert!(g.burst_pending());
                    let burst = g.take_burst().unwrap();
                    assert!((4..=7).contains(&burst.len()));
                    for pair in burst.windows(2) {
                        // Offsets are truncated cumulative floats; allow 1 ms slack.
                        let gap = pair[1] - pair[0];
                        assert!(gap >= Duration::from_millis(119));
                        assert!(gap <= Duration::from_millis(340));
                    }
                    assert!(g.take_burst().is_none(), "burst fires once");
                }
                Pace::Line(delay) => {
                    assert!(delay >= Duration::from_millis(320));
                    assert!(delay < Duration::from_millis(1_920));
                }
            }
        }
        assert!(saw_silence, "silence regime never entered at drift 1.0");
    }

    #[test]
    fn tempo_floor_holds_at_max_drift() {
        let mut g = generator(2);
        for _ in 0..1000 {
            if let Pace::Line(delay) = g.next_pace(1.25) {
                assert!(delay >= Duration::from_millis(320));
            }
        }
    }

    #[test]
    fn ring_keeps_most_recent_lines_in_order() {
        let mut ring = LogRing::default();
        for i in 0..200 {
            ring.push(format!("line {i}"));
        }
        assert_eq!(ring.len(), LOG_CAP);
        let lines: Vec<&String> = ring.iter().collect();
        assert_eq!(lines[0], "line 40");
        assert_eq!(lines[159], "line 199");
    }

    #[test]
    fn emit_keeps_clean_previous_line() {
        let mut g = generator(17);
        for _ in 0..200 {
            let line = g.emit(0.3);
            assert!(!line.is_empty());
        }
    }
}
