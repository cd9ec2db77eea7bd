//! Glyph renderer: intensity → character ramp → printable frame.

use crate::field::{self, PatternKind};

/// Brightness ramp, sparsest to densest.
pub const RAMP: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Frame columns.
pub const GRID_W: usize = 22;
/// Frame rows.
pub const GRID_H: usize = 12;

/// Map an intensity in `[0, 1]` to a ramp glyph.
///
/// 0.0 maps to the sparsest glyph, 1.0 to the densest; the mapping is
/// monotone non-decreasing in between.
pub fn ramp_char(v: f64) -> char {
    let i = (v.clamp(0.0, 1.0) * (RAMP.len() - 1) as f64).floor() as usize;
    RAMP[i.min(RAMP.len() - 1)]
}

/// A rectangular character grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    cells: Vec<char>,
}

impl Grid {
    /// Blank grid filled with the sparsest glyph.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> char {
        self.cells[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, c: char) {
        self.cells[y * self.width + x] = c;
    }

    /// Rows joined with line breaks into one printable block.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..self.width {
                out.push(self.get(x, y));
            }
        }
        out
    }
}

/// Build one full frame of a pattern at time `t` on the standard grid.
pub fn render_frame(kind: PatternKind, t: f64) -> Grid {
    render_frame_sized(kind, t, GRID_W, GRID_H)
}

/// Build one frame on an arbitrary grid size.
pub fn render_frame_sized(kind: PatternKind, t: f64, width: usize, height: usize) -> Grid {
    let mut grid = Grid::blank(width, height);
    for y in 0..height {
        for x in 0..width {
            let nx = (x as f64 / (width - 1) as f64) * 2.0 - 1.0;
            let ny = (y as f64 / (height - 1) as f64) * 2.0 - 1.0;
            grid.set(x, y, ramp_char(field::intensity(kind, nx, ny, t)));
        }
    }
    grid
}
