//! Presentation sink: the write-only boundary between the engine and
//! whatever displays it.
//!
//! The engine never reads back from the sink; the only signal flowing the
//! other way is gallery visibility, which the host sets on the engine
//! directly. Keeping the core headless makes the scheduler testable with
//! a recording sink.

use crate::animate::FrameUpdate;
use crate::engine::Mode;
use crate::ports::{HandshakeRow, PortSnapshot, RouteRow, SummaryLine};

pub trait PresentationSink {
    fn notify_mode(&mut self, mode: Mode);
    fn push_frame(&mut self, update: &FrameUpdate);
    fn push_log_line(&mut self, line: &str);
    fn push_ports(&mut self, ports: &[PortSnapshot]);
    fn push_routing(&mut self, rows: &[RouteRow]);
    fn push_handshakes(&mut self, rows: &[HandshakeRow]);
    fn push_summary(&mut self, lines: &[SummaryLine]);
}

/// Recording sink for tests and the non-interactive CLI paths.
#[derive(Default)]
pub struct MemorySink {
    pub modes: Vec<Mode>,
    pub frames: Vec<FrameUpdate>,
    pub log_lines: Vec<String>,
    pub port_pushes: Vec<Vec<PortSnapshot>>,
    pub routing_pushes: Vec<Vec<RouteRow>>,
    pub handshake_pushes: Vec<Vec<HandshakeRow>>,
    pub summary_pushes: Vec<Vec<SummaryLine>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresentationSink for MemorySink {
    fn notify_mode(&mut self, mode: Mode) {
        self.modes.push(mode);
    }

    fn push_frame(&mut self, update: &FrameUpdate) {
        self.frames.push(update.clone());
    }

    fn push_log_line(&mut self, line: &str) {
        self.log_lines.push(line.to_string());
    }

    fn push_ports(&mut self, ports: &[PortSnapshot]) {
        self.port_pushes.push(ports.to_vec());
    }

    fn push_routing(&mut self, rows: &[RouteRow]) {
        self.routing_pushes.push(rows.to_vec());
    }

    fn push_handshakes(&mut self, rows: &[HandshakeRow]) {
        self.handshake_pushes.push(rows.to_vec());
    }

    fn push_summary(&mut self, lines: &[SummaryLine]) {
        self.summary_pushes.push(lines.to_vec());
    }
}
