//! TUI application state and event loop.
//!
//! Design: the engine runs headless and writes into a [`HubView`] sink; the
//! loop polls keys with a capped timeout, ticks the engine at the current
//! time, and redraws. Everything stays on one thread, so a draw always sees
//! a consistent view.

use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use hollowdeck_core::{
    Activation, Console, CornerCaption, Disposition, Engine, FrameUpdate, Mode, Mulberry32,
    PresentationSink, StatusFeed, TraceFeed, LOG_CAP, OPEN_DRIFT_BUMP, PatternKind,
};
use hollowdeck_core::ports::{HandshakeRow, PortSnapshot, RouteRow, SummaryLine};

// ---------------------------------------------------------------------------
// HubView
// ---------------------------------------------------------------------------

/// Latest engine output, kept for drawing.
#[derive(Default)]
pub struct HubView {
    pub mode: Option<Mode>,
    pub log: VecDeque<String>,
    pub ports: Vec<PortSnapshot>,
    pub routing: Vec<RouteRow>,
    pub handshakes: Vec<HandshakeRow>,
    pub summary: Vec<SummaryLine>,
    pub frames: Vec<Option<String>>,
}

impl PresentationSink for HubView {
    fn notify_mode(&mut self, mode: Mode) {
        self.mode = Some(mode);
    }

    fn push_frame(&mut self, update: &FrameUpdate) {
        if self.frames.len() <= update.node {
            self.frames.resize(update.node + 1, None);
        }
        self.frames[update.node] = Some(update.text.clone());
    }

    fn push_log_line(&mut self, line: &str) {
        self.log.push_back(line.to_string());
        while self.log.len() > LOG_CAP {
            self.log.pop_front();
        }
    }

    fn push_ports(&mut self, ports: &[PortSnapshot]) {
        self.ports = ports.to_vec();
    }

    fn push_routing(&mut self, rows: &[RouteRow]) {
        self.routing = rows.to_vec();
    }

    fn push_handshakes(&mut self, rows: &[HandshakeRow]) {
        self.handshakes = rows.to_vec();
    }

    fn push_summary(&mut self, lines: &[SummaryLine]) {
        self.summary = lines.to_vec();
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    engine: Engine,
    view: HubView,
    console: Console,
    console_open: bool,
    console_input: String,
    trace: TraceFeed,
    status: StatusFeed,
    corner: CornerCaption,
    cursor: usize,
    notice: Option<String>,
    refresh_cap: Duration,
    started: Instant,
    running: bool,
}

impl App {
    pub fn new(engine: Engine, refresh_cap: Duration) -> Self {
        Self {
            engine,
            view: HubView::default(),
            console: Console::new(Mulberry32::from_entropy()),
            console_open: false,
            console_input: String::new(),
            trace: TraceFeed::new(Mulberry32::from_entropy()),
            status: StatusFeed::new(Mulberry32::from_entropy()),
            corner: CornerCaption::new(Mulberry32::from_entropy()),
            cursor: 0,
            notice: None,
            refresh_cap,
            started: Instant::now(),
            running: true,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        // Flush the debounced drift write before exiting.
        self.engine.shutdown();

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let now = Instant::now();
        self.engine.select_mode(Mode::Hub, now, &mut self.view);
        self.trace.start(now);
        let drift = self.engine.drift();
        self.status.start(now, drift);

        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            let timeout = self.poll_timeout();
            if event::poll(timeout)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }

            let now = Instant::now();
            self.engine.tick(now, &mut self.view);
            let drift = self.engine.drift();
            self.trace.tick(now, drift);
            self.status.tick(now, drift);
            if self.console_open {
                self.corner.tick(now);
            }
        }

        Ok(())
    }

    /// Sleep until the next engine deadline, but never past the cap.
    fn poll_timeout(&self) -> Duration {
        let cap = Duration::from_millis(50).max(self.refresh_cap);
        match self.engine.next_deadline() {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .clamp(self.refresh_cap, cap),
            None => cap,
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.console_open {
            self.handle_console_key(key);
            return;
        }
        let now = Instant::now();
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('1') => {
                self.engine.select_mode(Mode::Hub, now, &mut self.view);
                self.clamp_cursor();
            }
            KeyCode::Char('2') => {
                self.engine.select_mode(Mode::Ports, now, &mut self.view);
            }
            KeyCode::Char('3') => {
                self.engine.select_mode(Mode::State, now, &mut self.view);
                self.clamp_cursor();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                self.engine.hover_port(now);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                // Bound by the visible list; egress rows only exist in ports
                // mode, and they sit at the registry's tail so cursor indices
                // stay valid registry indices.
                if self.cursor + 1 < self.view.ports.len() {
                    self.cursor += 1;
                }
                self.engine.hover_port(now);
            }
            KeyCode::Enter => {
                match self.engine.activate_port(self.cursor, now, &mut self.view) {
                    Activation::Link(url) => {
                        self.notice = Some(format!("egress link: {url}"));
                    }
                    Activation::Value(value) => {
                        self.notice = Some(format!("value endpoint: {value}"));
                    }
                    Activation::Nothing => {}
                }
            }
            KeyCode::Char('v') => {
                let visible = !self.engine.gallery_visible();
                self.engine.set_gallery_visible(visible, now, &mut self.view);
            }
            KeyCode::Char('i') => self.open_console(now),
            _ => {}
        }
    }

    fn handle_console_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.close_console(),
            KeyCode::Enter => {
                let submitted = std::mem::take(&mut self.console_input);
                if let Disposition::Simplified(rest) = self.console.submit(&submitted) {
                    // Technical input comes back stripped into the field.
                    self.console_input = rest;
                }
            }
            KeyCode::Backspace => {
                self.console_input.pop();
            }
            KeyCode::Char(c) => self.console_input.push(c),
            _ => {}
        }
    }

    fn open_console(&mut self, now: Instant) {
        self.console_open = true;
        self.console.reset();
        self.console_input.clear();
        self.engine.bump_drift(OPEN_DRIFT_BUMP, now);
        self.corner.start(now);
    }

    fn close_console(&mut self) {
        self.console_open = false;
        self.corner.stop();
    }

    // -- accessors for the draw layer ---------------------------------------

    pub fn view(&self) -> &HubView {
        &self.view
    }

    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }

    pub fn drift(&self) -> f64 {
        self.engine.drift()
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn clamp_cursor(&mut self) {
        if !self.view.ports.is_empty() && self.cursor >= self.view.ports.len() {
            self.cursor = self.view.ports.len() - 1;
        }
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn gallery_visible(&self) -> bool {
        self.engine.gallery_visible()
    }

    pub fn gallery_kinds(&self) -> &'static [PatternKind] {
        &PatternKind::ALL
    }

    pub fn console_open(&self) -> bool {
        self.console_open
    }

    pub fn console_input(&self) -> &str {
        &self.console_input
    }

    pub fn console_replies(&self) -> impl Iterator<Item = &String> {
        self.console.replies()
    }

    pub fn corner_caption(&self) -> &'static str {
        self.corner.current()
    }

    pub fn trace_lines(&self) -> impl Iterator<Item = &String> {
        self.trace.lines()
    }

    pub fn status_metrics(&self) -> &[&'static str] {
        self.status.metrics()
    }

    pub fn status_notes(&self) -> impl Iterator<Item = &String> {
        self.status.notes()
    }
}
