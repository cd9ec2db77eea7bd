//! Frame animator: per-node tick loops with bounded corruption.
//!
//! Each animated node owns its local time and a private seeded stream, so an
//! identical kind+index pair always reproduces the same visual sequence.
//! Ticks are deadline-driven (the host loop polls [`FrameAnimator::tick`]
//! from its single thread) and visibility gates the whole gallery: frames
//! are only produced while the host reports the gallery visible. A host with
//! no visibility signal simply starts the animator once and leaves it
//! running.

use std::time::{Duration, Instant};

use crate::field::PatternKind;
use crate::glyph::{self, Grid, RAMP};
use crate::rng::Mulberry32;

/// Interval between frames of one node.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(180);

/// Local-time advance per frame.
pub const TIME_STEP: f64 = 0.12;

/// Probability that a corruption pass considers a single cell (else two).
const SINGLE_FLIP_CHANCE: f64 = 0.7;

/// Probability that a considered cell is actually overwritten.
const FLIP_CHANCE: f64 = 0.08;

/// One animated visual element.
#[derive(Debug, Clone)]
pub struct AnimationNode {
    kind: PatternKind,
    t: f64,
    rng: Mulberry32,
}

impl AnimationNode {
    /// Node seeded from its kind and gallery index.
    pub fn new(kind: PatternKind, index: usize) -> Self {
        Self {
            kind,
            t: 0.0,
            rng: Mulberry32::from_label(&format!("{kind}:{index}")),
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Frame at the current local time, uncorrupted. Used for the initial
    /// render before the tick loop starts.
    pub fn current_frame(&self) -> Grid {
        glyph::render_frame(self.kind, self.t)
    }

    /// Advance local time, rebuild the frame, apply the corruption pass.
    pub fn advance(&mut self) -> Grid {
        self.t += TIME_STEP;
        let mut grid = glyph::render_frame(self.kind, self.t);
        self.corrupt(&mut grid);
        grid
    }

    /// Bounded noise: 1-2 candidate flips, each landing with a small
    /// probability, overwriting one random cell with a random ramp glyph.
    fn corrupt(&mut self, grid: &mut Grid) {
        let flips = if self.rng.chance(SINGLE_FLIP_CHANCE) { 1 } else { 2 };
        for _ in 0..flips {
            if !self.rng.chance(FLIP_CHANCE) {
                continue;
            }
            let x = self.rng.index(grid.width);
            let y = self.rng.index(grid.height);
            grid.set(x, y, *self.rng.pick(&RAMP));
        }
    }
}

/// A rendered frame pushed to the presentation sink.
#[derive(Debug, Clone)]
pub struct FrameUpdate {
    pub node: usize,
    pub kind: PatternKind,
    pub text: String,
}

struct NodeRunner {
    node: AnimationNode,
    next: Option<Instant>,
}

/// Drives a gallery of animation nodes on independent deadlines.
pub struct FrameAnimator {
    runners: Vec<NodeRunner>,
    visible: bool,
}

impl FrameAnimator {
    pub fn new(kinds: &[PatternKind]) -> Self {
        let runners = kinds
            .iter()
            .enumerate()
            .map(|(index, &kind)| NodeRunner {
                node: AnimationNode::new(kind, index),
                next: None,
            })
            .collect();
        Self {
            runners,
            visible: false,
        }
    }

    /// Initial frames for every node, uncorrupted.
    pub fn initial_frames(&self) -> Vec<FrameUpdate> {
        self.runners
            .iter()
            .enumerate()
            .map(|(i, r)| FrameUpdate {
                node: i,
                kind: r.node.kind(),
                text: r.node.current_frame().to_text(),
            })
            .collect()
    }

    /// Visibility signal from the host. Starting is idempotent; stopping
    /// clears every pending deadline synchronously.
    pub fn set_visible(&mut self, visible: bool, now: Instant) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        if visible {
            for runner in &mut self.runners {
                if runner.next.is_none() {
                    runner.next = Some(now + FRAME_INTERVAL);
                }
            }
        } else {
            for runner in &mut self.runners {
                runner.next = None;
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.visible
    }

    /// Advance every node whose deadline has passed; re-arm each.
    pub fn tick(&mut self, now: Instant) -> Vec<FrameUpdate> {
        if !self.visible {
            return Vec::new();
        }
        let mut updates = Vec::new();
        for (i, runner) in self.runners.iter_mut().enumerate() {
            let Some(deadline) = runner.next else { continue };
            if now < deadline {
                continue;
            }
            updates.push(FrameUpdate {
                node: i,
                kind: runner.node.kind(),
                text: runner.node.advance().to_text(),
            });
            runner.next = Some(now + FRAME_INTERVAL);
        }
        updates
    }

    /// Earliest pending deadline, for host poll timeouts.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.runners.iter().filter_map(|r| r.next).min()
    }
}
