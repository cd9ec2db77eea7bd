//! Drift: the single persisted bias scalar.
//!
//! Drift lives in `[0, 1.25]`, starts at a code-default floor, and is nudged
//! upward by user interaction. It is persisted as a fixed-4-decimal string
//! in a flat file, and sessions inherit each other's drift through a one-way
//! ratchet: the in-memory value rises to meet a larger persisted value but
//! is never lowered by a smaller one. Store failures are swallowed; the
//! engine degrades to its in-memory value and nothing else notices.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Lower bound and code default.
pub const DRIFT_FLOOR: f64 = 0.08;

/// Saturation ceiling.
pub const DRIFT_MAX: f64 = 1.25;

/// Fraction of the persisted value inherited at load.
const INHERIT_SCALE: f64 = 0.9;

/// Quiet period after the first un-persisted bump before writing.
pub const PERSIST_DEBOUNCE: Duration = Duration::from_millis(900);

/// Backing store for the drift scalar.
///
/// `load` returning `None` covers both "no value yet" and "store broken";
/// the two are indistinguishable by design.
pub trait DriftStore {
    fn load(&self) -> Option<f64>;
    fn store(&mut self, value: f64) -> io::Result<()>;
}

/// Flat-file store: one fixed-4-decimal value, nothing else.
pub struct FileDriftStore {
    path: PathBuf,
}

impl FileDriftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl DriftStore for FileDriftStore {
    fn load(&self) -> Option<f64> {
        match fs::read_to_string(&self.path) {
            Ok(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    log::debug!("drift store unreadable at {}: {e}", self.path.display());
                }
                None
            }
        }
    }

    fn store(&mut self, value: f64) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{value:.4}"))
    }
}

/// In-memory store for tests and storage-less hosts.
#[derive(Default)]
pub struct MemoryDriftStore {
    value: Option<f64>,
}

impl MemoryDriftStore {
    pub fn with_value(value: f64) -> Self {
        Self { value: Some(value) }
    }
}

impl DriftStore for MemoryDriftStore {
    fn load(&self) -> Option<f64> {
        self.value
    }

    fn store(&mut self, value: f64) -> io::Result<()> {
        self.value = Some(value);
        Ok(())
    }
}

/// The process-wide drift scalar plus its debounced persistence.
pub struct DriftState {
    value: f64,
    store: Box<dyn DriftStore>,
    pending_persist: Option<Instant>,
}

impl DriftState {
    /// Load drift: the floor, raised toward a prior session's persisted
    /// value scaled by 0.9 when one exists.
    pub fn new(store: Box<dyn DriftStore>) -> Self {
        let inherited = store.load().unwrap_or(0.0).max(0.0) * INHERIT_SCALE;
        Self {
            value: DRIFT_FLOOR.max(inherited).min(DRIFT_MAX),
            store,
            pending_persist: None,
        }
    }

    /// Current value. Invariant: always in `[0, 1.25]`.
    pub fn read(&self) -> f64 {
        self.value
    }

    /// Opportunistic ratchet: rise to meet a larger persisted value,
    /// never lower.
    pub fn refresh(&mut self) {
        if let Some(persisted) = self.store.load()
            && persisted > self.value
        {
            self.value = persisted.min(DRIFT_MAX);
        }
    }

    /// Nudge drift by `delta`, clamped into range, and schedule a debounced
    /// persist. Bursts of bumps coalesce into one pending write.
    pub fn bump(&mut self, delta: f64, now: Instant) {
        self.value = (self.value + delta).clamp(0.0, DRIFT_MAX);
        if self.pending_persist.is_none() {
            self.pending_persist = Some(now + PERSIST_DEBOUNCE);
        }
    }

    /// Fire the pending persist once its quiet period has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.pending_persist
            && now >= deadline
        {
            self.pending_persist = None;
            self.persist();
        }
    }

    /// Write back max(persisted, in-memory). Failures are swallowed.
    pub fn persist(&mut self) {
        let persisted = self.store.load().unwrap_or(0.0);
        let next = persisted.max(self.value);
        if let Err(e) = self.store.store(next) {
            log::debug!("drift persist failed: {e}");
        }
    }

    /// True while a debounced write is pending.
    pub fn persist_pending(&self) -> bool {
        self.pending_persist.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(value: Option<f64>) -> DriftState {
        let store = match value {
            Some(v) => MemoryDriftStore::with_value(v),
            None => MemoryDriftStore::default(),
        };
        DriftState::new(Box::new(store))
    }

    #[test]
    fn defaults_to_floor_without_persisted_value() {
        assert_eq!(state_with(None).read(), DRIFT_FLOOR);
    }

    #[test]
    fn load_inherits_scaled_persisted_value() {
        let state = state_with(Some(0.5));
        assert!((state.read() - 0.45).abs() < 1e-12);
    }

    #[test]
    fn load_never_drops_below_floor() {
        // 0.05 * 0.9 is below the floor; the floor wins.
        assert_eq!(state_with(Some(0.05)).read(), DRIFT_FLOOR);
    }

    #[test]
    fn bump_clamps_into_range() {
        let mut state = state_with(None);
        let now = Instant::now();
        state.bump(10.0, now);
        assert_eq!(state.read(), DRIFT_MAX);
        state.bump(10.0, now);
        assert_eq!(state.read(), DRIFT_MAX);
        state.bump(-100.0, now);
        assert_eq!(state.read(), 0.0);
    }

    #[test]
    fn refresh_ratchets_upward_only() {
        let mut state = DriftState::new(Box::new(MemoryDriftStore::default()));
        let base = state.read();
        // Swap in a larger persisted value behind the state's back.
        state.store = Box::new(MemoryDriftStore::with_value(0.7));
        state.refresh();
        assert_eq!(state.read(), 0.7);
        state.store = Box::new(MemoryDriftStore::with_value(0.2));
        state.refresh();
        assert_eq!(state.read(), 0.7, "ratchet must never lower");
        assert!(base < 0.7);
    }

    #[test]
    fn refresh_caps_at_max() {
        let mut state = state_with(None);
        state.store = Box::new(MemoryDriftStore::with_value(9.0));
        state.refresh();
        assert_eq!(state.read(), DRIFT_MAX);
    }

    #[test]
    fn bumps_coalesce_into_one_pending_write() {
        let mut state = state_with(None);
        let now = Instant::now();
        state.bump(0.01, now);
        let first = state.pending_persist;
        state.bump(0.01, now + Duration::from_millis(100));
        assert_eq!(state.pending_persist, first, "later bumps must not re-arm");
        assert!(state.persist_pending());
    }

    #[test]
    fn tick_fires_persist_after_debounce() {
        let mut state = state_with(None);
        let now = Instant::now();
        state.bump(0.1, now);
        state.tick(now + Duration::from_millis(100));
        assert!(state.persist_pending());
        state.tick(now + PERSIST_DEBOUNCE);
        assert!(!state.persist_pending());
        assert_eq!(state.store.load(), Some(state.read()));
    }

    #[test]
    fn persist_keeps_larger_persisted_value() {
        let mut state = state_with(Some(1.2));
        // In-memory is 1.08 (1.2 * 0.9); persisted 1.2 must survive.
        state.persist();
        assert_eq!(state.store.load(), Some(1.2));
    }

    #[test]
    fn file_store_round_trips_four_decimals() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileDriftStore::new(dir.path().join("drift"));
        assert_eq!(store.load(), None);
        store.store(0.123456).unwrap();
        assert_eq!(store.load(), Some(0.1235));
    }

    #[test]
    fn file_store_swallows_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drift");
        fs::write(&path, "not a number").unwrap();
        assert_eq!(FileDriftStore::new(path).load(), None);
    }
}
