use std::time::{Duration, Instant};

use hollowdeck_core::{DriftState, Engine, FileDriftStore};

/// Launch the interactive hub.
pub fn run(seed: Option<u32>, refresh_cap_ms: u64, drift_file: &str) {
    let now = Instant::now();
    let drift = DriftState::new(Box::new(FileDriftStore::new(drift_file)));
    let seed = seed.unwrap_or_else(|| super::make_rng(None).next_u32());
    log::debug!("hub session seed {seed}, drift file {drift_file}");
    let engine = Engine::new(seed, drift, now);

    let refresh_cap = Duration::from_millis(refresh_cap_ms.max(1));
    let mut app = crate::tui::app::App::new(engine, refresh_cap);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
