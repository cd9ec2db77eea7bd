//! Scalar field library.
//!
//! All frame geometry lives here: pure, closed-form functions of
//! (normalized coordinate, time, pattern kind) with no hidden state. Frames
//! are independently reproducible from their inputs, so an animator can be
//! stopped, restarted, or replayed without bookkeeping.
//!
//! Coordinates `nx, ny` are in `[-1, 1]` (grid column/row over grid extent);
//! output intensity is in `[0, 1]`.

use std::fmt;

/// Pattern kind for an animated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatternKind {
    /// Nested rectangular bands with a center cross.
    Ruler,
    /// A single breathing ring, empty interior.
    Void,
    /// Two traveling sinusoids, dampened.
    Fluid,
    /// Two pupils plus a Gaussian halo.
    Gaze,
    /// Two Gaussians (head, jaw) plus a gated teeth band.
    #[default]
    Skull,
}

impl PatternKind {
    /// All kinds, in gallery order.
    pub const ALL: [PatternKind; 5] = [
        PatternKind::Ruler,
        PatternKind::Void,
        PatternKind::Fluid,
        PatternKind::Gaze,
        PatternKind::Skull,
    ];

    /// Parse a kind name; unknown names fall back to the default kind.
    pub fn parse(name: &str) -> PatternKind {
        match name {
            "ruler" => PatternKind::Ruler,
            "void" => PatternKind::Void,
            "fluid" => PatternKind::Fluid,
            "gaze" => PatternKind::Gaze,
            _ => PatternKind::Skull,
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ruler => write!(f, "ruler"),
            Self::Void => write!(f, "void"),
            Self::Fluid => write!(f, "fluid"),
            Self::Gaze => write!(f, "gaze"),
            Self::Skull => write!(f, "skull"),
        }
    }
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Field intensity at a normalized coordinate.
///
/// Total over its whole input domain; always returns a value in `[0, 1]`.
pub fn intensity(kind: PatternKind, nx: f64, ny: f64, t: f64) -> f64 {
    match kind {
        PatternKind::Ruler => {
            let border: f64 = if nx.abs() > 0.86 || ny.abs() > 0.78 { 1.0 } else { 0.0 };
            let inner = if nx.abs() > 0.55 && nx.abs() < 0.86 && ny.abs() > 0.48 && ny.abs() < 0.78
            {
                0.85
            } else {
                0.0
            };
            let core = if nx.abs() < 0.06 || ny.abs() < 0.06 { 0.7 } else { 0.0 };
            border.max(inner).max(core) * 0.95
        }
        PatternKind::Void => {
            let r = (nx * nx + ny * ny).sqrt();
            // Interior stays empty; only the breathing ring lights up.
            if (r - (0.55 + 0.04 * (t * 0.9).sin())).abs() < 0.06 {
                0.9
            } else {
                0.0
            }
        }
        PatternKind::Fluid => {
            let a = ((nx * 3.2 + t * 0.9) + (ny * 2.3 - t * 0.7).cos()).sin();
            let b = ((ny * 3.8 - t * 0.8) + (nx * 2.1 + t * 0.6).sin()).cos();
            // Dampened to avoid saturating the dense end of the ramp.
            ((a + b) * 0.25 + 0.5) * 0.8
        }
        PatternKind::Gaze => {
            let lx = nx + 0.35;
            let rx = nx - 0.35;
            let r1 = (lx * lx + ny * ny).sqrt();
            let r2 = (rx * rx + ny * ny).sqrt();
            let pupils = if r1 < 0.18 { 1.0 } else { 0.0 } + if r2 < 0.18 { 1.0 } else { 0.0 };
            let halo = (-3.2 * (nx * nx + ny * ny)).exp();
            clamp01(0.55 * halo + 0.65 * pupils)
        }
        PatternKind::Skull => {
            let head = (-2.4 * (nx * nx + (ny + 0.15) * (ny + 0.15))).exp();
            let jaw = (-7.0 * (nx * nx + (ny - 0.55) * (ny - 0.55))).exp();
            let teeth = if ny > 0.25 && ny < 0.55 && ((nx + 1.0) * 8.0).sin().abs() > 0.6 {
                0.45
            } else {
                0.0
            };
            clamp01(0.8 * head + 0.6 * jaw + teeth)
        }
    }
}
