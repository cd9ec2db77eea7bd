//! # hollowdeck-core
//!
//! **A hub that performs coherence without possessing any.**
//!
//! `hollowdeck-core` is the headless engine behind the hollowdeck terminal
//! hub: a procedural fiction that renders scalar-field ASCII frames, churns
//! a registry of fabricated ports, and narrates itself through a drifting,
//! glitching log. Nothing here measures, routes, or stores anything real.
//! Every stochastic stream is seeded, so a given seed replays the same
//! session.
//!
//! ## Quick Start
//!
//! ```
//! use std::time::Instant;
//! use hollowdeck_core::{
//!     DriftState, Engine, MemoryDriftStore, MemorySink, Mode,
//! };
//!
//! let now = Instant::now();
//! let drift = DriftState::new(Box::new(MemoryDriftStore::default()));
//! let mut engine = Engine::new(7, drift, now);
//! let mut sink = MemorySink::new();
//!
//! // Enter state mode; the first narrative line lands immediately.
//! engine.select_mode(Mode::State, now, &mut sink);
//! assert!(!sink.log_lines.is_empty());
//! ```
//!
//! ## Architecture
//!
//! Fields → Glyphs → Animator feeds the visual gallery; Drift biases every
//! scheduler; the [`Engine`] multiplexes hub/ports/state modes over one
//! deadline-driven tick loop and writes to a [`PresentationSink`]. The core
//! never spawns threads and never blocks: hosts poll [`Engine::tick`] and
//! sleep until [`Engine::next_deadline`].

pub mod animate;
pub mod console;
pub mod drift;
pub mod engine;
pub mod feeds;
pub mod field;
pub mod glyph;
pub mod narrative;
pub mod ports;
pub mod rng;
pub mod sink;

pub use animate::{AnimationNode, FrameAnimator, FrameUpdate, FRAME_INTERVAL, TIME_STEP};
pub use console::{Console, Disposition, INPUT_MAX, OPEN_DRIFT_BUMP, REPLY_CAP};
pub use drift::{
    DriftState, DriftStore, FileDriftStore, MemoryDriftStore, DRIFT_FLOOR, DRIFT_MAX,
    PERSIST_DEBOUNCE,
};
pub use engine::{Activation, Engine, Mode, HOVER_WINDOW};
pub use feeds::{CornerCaption, StatusFeed, TraceFeed, CORNER_INTERVAL, NOTE_CAP, TRACE_CAP};
pub use field::{intensity, PatternKind};
pub use glyph::{ramp_char, render_frame, render_frame_sized, Grid, GRID_H, GRID_W, RAMP};
pub use narrative::{LogRing, NarrativeGen, Pace, LOG_CAP, SENTINEL};
pub use ports::{
    format_age, format_uptime, Gate, HandshakeRow, IoDirection, Policy, PortRecord,
    PortRegistry, PortSnapshot, PortStatus, RouteRow, SummaryLine, EGRESS_LINK_URL,
    EGRESS_VALUE,
};
pub use rng::{hash_label, Mulberry32};
pub use sink::{MemorySink, PresentationSink};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
