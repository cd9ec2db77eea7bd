pub mod drift;
pub mod hub;
pub mod render;
pub mod snapshot;
pub mod stream;

use hollowdeck_core::field::PatternKind;
use hollowdeck_core::{DRIFT_MAX, Mulberry32};

/// Parse a pattern name, falling back loudly.
pub fn parse_pattern(s: &str) -> PatternKind {
    let name = s.to_ascii_lowercase();
    let known = PatternKind::ALL.iter().any(|k| k.to_string() == name);
    if !known {
        eprintln!("Unknown pattern '{s}', using skull");
    }
    PatternKind::parse(&name)
}

/// Clamp a user-supplied drift bias into the engine's range.
pub fn clamp_drift(drift: f64) -> f64 {
    if !drift.is_finite() {
        eprintln!("Drift must be finite, using 0");
        return 0.0;
    }
    if !(0.0..=DRIFT_MAX).contains(&drift) {
        eprintln!("Drift {drift} outside [0, {DRIFT_MAX}], clamping");
    }
    drift.clamp(0.0, DRIFT_MAX)
}

/// Seeded generator, or one drawn from OS entropy when no seed is given.
pub fn make_rng(seed: Option<u32>) -> Mulberry32 {
    match seed {
        Some(seed) => Mulberry32::new(seed),
        None => Mulberry32::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pattern_accepts_known_names() {
        assert_eq!(parse_pattern("gaze"), PatternKind::Gaze);
        assert_eq!(parse_pattern("VOID"), PatternKind::Void);
    }

    #[test]
    fn parse_pattern_falls_back_to_skull() {
        assert_eq!(parse_pattern("nonsense"), PatternKind::Skull);
    }

    #[test]
    fn clamp_drift_saturates() {
        assert_eq!(clamp_drift(-1.0), 0.0);
        assert_eq!(clamp_drift(9.0), DRIFT_MAX);
        assert_eq!(clamp_drift(0.5), 0.5);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = make_rng(Some(5));
        let mut b = make_rng(Some(5));
        assert_eq!(a.next_u32(), b.next_u32());
    }
}
