//! Mode scheduler: the deadline-driven heart of the hub.
//!
//! One engine owns the drift state, the port registry, the narrative
//! generator, the gallery animator, and a log ring, and multiplexes them
//! across three display modes. All recurring work hangs off `Option<Instant>`
//! deadlines; switching modes clears every deadline before arming the new
//! one, so a stale schedule can never fire. Within a tick, mutation always
//! precedes rendering.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use log::debug;

use crate::animate::FrameAnimator;
use crate::drift::DriftState;
use crate::field::PatternKind;
use crate::narrative::{LogRing, NarrativeGen, Pace, LOG_CAP};
use crate::ports::{PortRegistry, EGRESS_LINK_URL, EGRESS_VALUE};
use crate::rng::Mulberry32;
use crate::sink::PresentationSink;

/// Hub mode re-renders every 3.2 to 5.6 seconds.
pub const HUB_TICK_MIN_MS: f64 = 3_200.0;
pub const HUB_TICK_MAX_MS: f64 = 5_600.0;
/// Ports mode base cadence, shortened by drift, floored at 1.2 seconds.
pub const PORTS_TICK_MIN_MS: f64 = 1_800.0;
pub const PORTS_TICK_MAX_MS: f64 = 4_400.0;
pub const PORTS_TICK_FLOOR_MS: f64 = 1_200.0;
pub const PORTS_DRIFT_SCALE: f64 = 400.0;

const HUB_MUTATE_CHANCE: f64 = 0.25;
const HUB_BUMP_CHANCE: f64 = 0.4;
const PORTS_MUTATE_CHANCE: f64 = 0.65;

/// Hover bumps are rate-limited to one per window.
pub const HOVER_WINDOW: Duration = Duration::from_millis(250);

const ACTIVATE_LOG_LINE: &str = "value endpoint accessed";
const ACTIVATE_LOG_CHANCE_STATE: f64 = 0.6;
const ACTIVATE_LOG_CHANCE: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Hub,
    Ports,
    State,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Hub, Mode::Ports, Mode::State];
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Hub => "hub",
            Mode::Ports => "ports",
            Mode::State => "state",
        };
        write!(f, "{name}")
    }
}

/// Outcome of activating a port under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Port has no action attached.
    Nothing,
    /// External link surfaced for the host to open or show.
    Link(&'static str),
    /// Value constant surfaced for the host to copy or show.
    Value(&'static str),
}

pub struct Engine {
    rng: Mulberry32,
    drift: DriftState,
    ports: PortRegistry,
    narrative: NarrativeGen,
    animator: FrameAnimator,
    log: LogRing,
    mode: Mode,
    started: Instant,
    next_hub: Option<Instant>,
    next_ports: Option<Instant>,
    next_line: Option<Instant>,
    burst_queue: VecDeque<Instant>,
    last_hover: Option<Instant>,
}

impl Engine {
    pub fn new(seed: u32, drift: DriftState, now: Instant) -> Self {
        let mut rng = Mulberry32::new(seed);
        let ports = PortRegistry::seed(&mut rng, now);
        let narrative = NarrativeGen::new(Mulberry32::new(rng.next_u32()));
        Self {
            rng,
            drift,
            ports,
            narrative,
            animator: FrameAnimator::new(&PatternKind::ALL),
            log: LogRing::new(LOG_CAP),
            mode: Mode::Hub,
            started: now,
            next_hub: None,
            next_ports: None,
            next_line: None,
            burst_queue: VecDeque::new(),
            last_hover: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn drift(&self) -> f64 {
        self.drift.read()
    }

    pub fn ports(&self) -> &PortRegistry {
        &self.ports
    }

    pub fn log_lines(&self) -> impl Iterator<Item = &String> {
        self.log.iter()
    }

    pub fn uptime(&self, now: Instant) -> Duration {
        now.duration_since(self.started)
    }

    /// Switch modes. Every outstanding deadline and queued burst is cleared
    /// before the new schedule is armed; re-selecting the current mode
    /// re-renders it.
    pub fn select_mode(&mut self, mode: Mode, now: Instant, sink: &mut dyn PresentationSink) {
        self.next_hub = None;
        self.next_ports = None;
        self.next_line = None;
        self.burst_queue.clear();

        self.mode = mode;
        debug!("mode -> {mode}");
        sink.notify_mode(mode);

        match mode {
            Mode::Hub => {
                self.render_hub(now, sink);
                self.arm_hub(now);
            }
            Mode::Ports => {
                self.render_ports(now, sink);
                self.arm_ports(now);
            }
            Mode::State => {
                sink.push_ports(&self.ports.list(false));
                self.emit_line(now, sink);
            }
        }
    }

    /// Show or hide the gallery. Going visible pushes the current frames
    /// immediately; going hidden cancels every frame deadline.
    pub fn set_gallery_visible(
        &mut self,
        visible: bool,
        now: Instant,
        sink: &mut dyn PresentationSink,
    ) {
        let was_running = self.animator.is_running();
        self.animator.set_visible(visible, now);
        if visible && !was_running {
            for update in self.animator.initial_frames() {
                sink.push_frame(&update);
            }
        }
    }

    pub fn gallery_visible(&self) -> bool {
        self.animator.is_running()
    }

    /// Drive everything due at `now`. Each tick starts by ratcheting drift
    /// from the store and flushing any debounced persist.
    pub fn tick(&mut self, now: Instant, sink: &mut dyn PresentationSink) {
        self.drift.refresh();
        self.drift.tick(now);

        for update in self.animator.tick(now) {
            sink.push_frame(&update);
        }

        while let Some(&deadline) = self.burst_queue.front() {
            if now < deadline {
                break;
            }
            self.burst_queue.pop_front();
            let drift = self.drift.read();
            let line = self.narrative.emit(drift);
            let shown = self.narrative.glitch(&line, drift);
            self.push_log(&shown, sink);
        }

        match self.mode {
            Mode::Hub => {
                if let Some(deadline) = self.next_hub
                    && now >= deadline
                {
                    self.hub_tick(now, sink);
                }
            }
            Mode::Ports => {
                if let Some(deadline) = self.next_ports
                    && now >= deadline
                {
                    self.ports_tick(now, sink);
                }
            }
            Mode::State => {
                if let Some(deadline) = self.next_line
                    && now >= deadline
                {
                    self.emit_line(now, sink);
                }
            }
        }
    }

    /// Earliest armed deadline, for the host poll loop.
    pub fn next_deadline(&self) -> Option<Instant> {
        let candidates = [
            self.next_hub,
            self.next_ports,
            self.next_line,
            self.burst_queue.front().copied(),
            self.animator.next_deadline(),
        ];
        candidates.into_iter().flatten().min()
    }

    /// Cursor passed over a port. At most one drift bump per window.
    pub fn hover_port(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_hover
            && now.duration_since(last) < HOVER_WINDOW
        {
            return false;
        }
        self.last_hover = Some(now);
        let delta = self.rng.range(0.01, 0.02);
        self.drift.bump(delta, now);
        true
    }

    /// Activate the port at `idx`. Egress ports surface their constant;
    /// the value endpoint sometimes confesses to the log and always nudges
    /// drift upward.
    pub fn activate_port(
        &mut self,
        idx: usize,
        now: Instant,
        sink: &mut dyn PresentationSink,
    ) -> Activation {
        let Some(action) = self.ports.record(idx).and_then(|r| r.action) else {
            return Activation::Nothing;
        };
        match action {
            "egress-link" => Activation::Link(EGRESS_LINK_URL),
            "egress-value" => {
                let chance = if self.mode == Mode::State {
                    ACTIVATE_LOG_CHANCE_STATE
                } else {
                    ACTIVATE_LOG_CHANCE
                };
                if self.rng.chance(chance) {
                    let drift = self.drift.read();
                    let shown = self.narrative.glitch(ACTIVATE_LOG_LINE, drift);
                    self.push_log(&shown, sink);
                }
                let delta = self.rng.range(0.006, 0.014);
                self.drift.bump(delta, now);
                Activation::Value(EGRESS_VALUE)
            }
            _ => Activation::Nothing,
        }
    }

    /// Console opened: small fixed bump.
    pub fn bump_drift(&mut self, delta: f64, now: Instant) {
        self.drift.bump(delta, now);
    }

    /// Flush any pending persist. Call on shutdown.
    pub fn shutdown(&mut self) {
        self.drift.persist();
    }

    fn arm_hub(&mut self, now: Instant) {
        let delay = self.rng.range(HUB_TICK_MIN_MS, HUB_TICK_MAX_MS);
        self.next_hub = Some(now + Duration::from_millis(delay as u64));
    }

    fn arm_ports(&mut self, now: Instant) {
        let base = self.rng.range(PORTS_TICK_MIN_MS, PORTS_TICK_MAX_MS);
        let delay = (base - self.drift.read() * PORTS_DRIFT_SCALE).max(PORTS_TICK_FLOOR_MS);
        self.next_ports = Some(now + Duration::from_millis(delay as u64));
    }

    fn hub_tick(&mut self, now: Instant, sink: &mut dyn PresentationSink) {
        if self.rng.chance(HUB_MUTATE_CHANCE) {
            let drift = self.drift.read();
            self.ports.mutate(&mut self.rng, drift, now);
        }
        if self.rng.chance(HUB_BUMP_CHANCE) {
            let delta = self.rng.range(0.002, 0.006);
            self.drift.bump(delta, now);
        }
        self.render_hub(now, sink);
        self.arm_hub(now);
    }

    fn ports_tick(&mut self, now: Instant, sink: &mut dyn PresentationSink) {
        if self.rng.chance(PORTS_MUTATE_CHANCE) {
            let drift = self.drift.read();
            self.ports.mutate(&mut self.rng, drift, now);
        }
        self.render_ports(now, sink);
        self.arm_ports(now);
    }

    fn render_hub(&mut self, now: Instant, sink: &mut dyn PresentationSink) {
        // Egress records only surface in ports mode.
        sink.push_ports(&self.ports.list(false));
        let drift = self.drift.read();
        let uptime = self.uptime(now);
        let summary = self.ports.summary(&mut self.rng, drift, uptime);
        sink.push_summary(&summary);
    }

    fn render_ports(&mut self, now: Instant, sink: &mut dyn PresentationSink) {
        sink.push_ports(&self.ports.list(true));
        let routing = self.ports.routing(&mut self.rng, now);
        sink.push_routing(&routing);
        let handshakes = self.ports.handshakes(&mut self.rng, now);
        sink.push_handshakes(&handshakes);
    }

    /// Emit one narrative line, maybe an echo, then schedule the next
    /// emission. A silence draw defers everything; the armed burst fires
    /// on the first non-silent line after it.
    fn emit_line(&mut self, now: Instant, sink: &mut dyn PresentationSink) {
        let drift = self.drift.read();
        let line = self.narrative.emit(drift);
        let shown = self.narrative.glitch(&line, drift);
        self.push_log(&shown, sink);
        if self.narrative.should_echo() {
            let echoed = self.narrative.glitch(&line, drift);
            self.push_log(&echoed, sink);
        }
        match self.narrative.next_pace(drift) {
            Pace::Silence(quiet) => {
                self.next_line = Some(now + quiet);
            }
            Pace::Line(tempo) => {
                if let Some(offsets) = self.narrative.take_burst() {
                    for offset in offsets {
                        self.burst_queue.push_back(now + offset);
                    }
                }
                self.next_line = Some(now + tempo);
            }
        }
    }

    fn push_log(&mut self, line: &str, sink: &mut dyn PresentationSink) {
        self.log.push(line.to_string());
        sink.push_log_line(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::{DriftState, MemoryDriftStore};
    use crate::sink::MemorySink;

    fn engine(seed: u32, now: Instant) -> Engine {
        let drift = DriftState::new(Box::new(MemoryDriftStore::default()));
        Engine::new(seed, drift, now)
    }

    #[test]
    fn select_mode_leaves_exactly_one_schedule() {
        let now = Instant::now();
        let mut sink = MemorySink::new();
        let mut eng = engine(1, now);

        for mode in Mode::ALL {
            eng.select_mode(mode, now, &mut sink);
            let armed = [eng.next_hub, eng.next_ports, eng.next_line]
                .iter()
                .filter(|d| d.is_some())
                .count();
            assert_eq!(armed, 1, "{mode} should arm exactly one deadline");
            assert!(eng.burst_queue.is_empty() || eng.mode == Mode::State);
        }
        assert_eq!(sink.modes, vec![Mode::Hub, Mode::Ports, Mode::State]);
    }

    #[test]
    fn stale_deadline_never_fires_after_switch() {
        let now = Instant::now();
        let mut sink = MemorySink::new();
        let mut eng = engine(2, now);

        eng.select_mode(Mode::State, now, &mut sink);
        eng.select_mode(Mode::Hub, now, &mut sink);
        let lines_before = sink.log_lines.len();

        // Far past any state-mode deadline; only hub work may fire.
        eng.tick(now + Duration::from_secs(60), &mut sink);
        assert_eq!(sink.log_lines.len(), lines_before);
        assert!(eng.next_line.is_none());
    }

    #[test]
    fn hub_renders_list_and_summary_immediately() {
        let now = Instant::now();
        let mut sink = MemorySink::new();
        let mut eng = engine(3, now);

        eng.select_mode(Mode::Hub, now, &mut sink);
        assert_eq!(sink.port_pushes.len(), 1);
        assert_eq!(sink.summary_pushes.len(), 1);
        assert_eq!(sink.summary_pushes[0].len(), 11);
        assert!(sink.routing_pushes.is_empty());
    }

    #[test]
    fn egress_rows_only_surface_in_ports_mode() {
        let now = Instant::now();
        let mut sink = MemorySink::new();
        let mut eng = engine(6, now);

        eng.select_mode(Mode::Hub, now, &mut sink);
        eng.select_mode(Mode::State, now, &mut sink);
        for push in &sink.port_pushes {
            assert_eq!(push.len(), 9);
            assert!(push.iter().all(|p| !p.egress));
        }

        eng.select_mode(Mode::Ports, now, &mut sink);
        let ports_push = sink.port_pushes.last().expect("ports push");
        assert_eq!(ports_push.len(), 11);
        assert_eq!(ports_push.iter().filter(|p| p.egress).count(), 2);
    }

    #[test]
    fn ports_mode_renders_three_tables() {
        let now = Instant::now();
        let mut sink = MemorySink::new();
        let mut eng = engine(4, now);

        eng.select_mode(Mode::Ports, now, &mut sink);
        assert_eq!(sink.port_pushes.len(), 1);
        assert_eq!(sink.routing_pushes.len(), 1);
        assert_eq!(sink.handshake_pushes.len(), 1);
    }

    #[test]
    fn state_mode_emits_lines_over_time() {
        let mut now = Instant::now();
        let mut sink = MemorySink::new();
        let mut eng = engine(5, now);

        eng.select_mode(Mode::State, now, &mut sink);
        assert!(!sink.log_lines.is_empty());
        for _ in 0..50 {
            now += Duration::from_secs(30);
            eng.tick(now, &mut sink);
        }
        assert!(sink.log_lines.len() >= 40);
    }

    #[test]
    fn engine_log_ring_caps_at_160() {
        let mut now = Instant::now();
        let mut sink = MemorySink::new();
        let mut eng = engine(6, now);

        eng.select_mode(Mode::State, now, &mut sink);
        while sink.log_lines.len() < 300 {
            now += Duration::from_secs(30);
            eng.tick(now, &mut sink);
        }
        assert_eq!(eng.log_lines().count(), LOG_CAP);
        let tail: Vec<&String> = sink.log_lines.iter().rev().take(LOG_CAP).rev().collect();
        let ring: Vec<&String> = eng.log_lines().collect();
        assert_eq!(ring, tail);
    }

    #[test]
    fn hover_is_rate_limited() {
        let now = Instant::now();
        let mut eng = engine(7, now);
        let before = eng.drift();

        assert!(eng.hover_port(now));
        assert!(!eng.hover_port(now + Duration::from_millis(100)));
        assert!(eng.hover_port(now + Duration::from_millis(300)));

        let gained = eng.drift() - before;
        assert!(gained > 0.019 && gained < 0.041, "gained {gained}");
    }

    #[test]
    fn activating_value_endpoint_bumps_drift() {
        let now = Instant::now();
        let mut sink = MemorySink::new();
        let mut eng = engine(8, now);
        let idx = (0..eng.ports().len())
            .find(|&i| {
                eng.ports()
                    .record(i)
                    .and_then(|r| r.action)
                    .is_some_and(|a| a == "egress-value")
            })
            .unwrap();

        let before = eng.drift();
        let got = eng.activate_port(idx, now, &mut sink);
        assert_eq!(got, Activation::Value(EGRESS_VALUE));
        let gained = eng.drift() - before;
        assert!(gained > 0.005 && gained < 0.015, "gained {gained}");
    }

    #[test]
    fn activating_plain_port_does_nothing() {
        let now = Instant::now();
        let mut sink = MemorySink::new();
        let mut eng = engine(9, now);

        let before = eng.drift();
        assert_eq!(eng.activate_port(0, now, &mut sink), Activation::Nothing);
        assert_eq!(eng.drift(), before);
        assert!(sink.log_lines.is_empty());
    }

    #[test]
    fn gallery_visibility_round_trip() {
        let now = Instant::now();
        let mut sink = MemorySink::new();
        let mut eng = engine(10, now);

        assert!(!eng.gallery_visible());
        eng.set_gallery_visible(true, now, &mut sink);
        assert!(eng.gallery_visible());
        assert_eq!(sink.frames.len(), PatternKind::ALL.len());

        eng.set_gallery_visible(false, now, &mut sink);
        assert!(!eng.gallery_visible());
        let shown = sink.frames.len();
        eng.tick(now + Duration::from_secs(10), &mut sink);
        assert_eq!(sink.frames.len(), shown);
    }

    #[test]
    fn next_deadline_tracks_the_armed_schedule() {
        let now = Instant::now();
        let mut sink = MemorySink::new();
        let mut eng = engine(11, now);

        assert!(eng.next_deadline().is_none());
        eng.select_mode(Mode::Hub, now, &mut sink);
        let deadline = eng.next_deadline().unwrap();
        assert_eq!(Some(deadline), eng.next_hub);
    }
}
