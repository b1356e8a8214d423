use crate::*;

/// Upper bound for a cell's edge in pixels.
pub const MAX_CELL_SIZE: u32 = 40;

/// Width assumed for layout while no surface is attached.
pub const FALLBACK_SURFACE_WIDTH: u32 = 600;

/// Pixel sizes derived from the board width and the surface width.
///
/// Recomputed for every snapshot since boards of different difficulty have a
/// different column count.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderMetrics {
    pub cell_size: u32,
    pub glyph_size: u32,
}

impl RenderMetrics {
    pub fn compute(columns: usize, surface_width: u32) -> Self {
        let fitted = match columns {
            0 => MAX_CELL_SIZE,
            columns => (surface_width as usize / columns)
                .try_into()
                .unwrap_or(MAX_CELL_SIZE),
        };
        let cell_size = fitted.min(MAX_CELL_SIZE);
        Self {
            cell_size,
            // floor(cell_size * 0.5)
            glyph_size: cell_size / 2,
        }
    }

    /// Pixel area covered by a cell: `[c*s, (c+1)*s) × [r*s, (r+1)*s)`.
    pub fn cell_bounds(self, at: GridCoord) -> Rect {
        let size = f64::from(self.cell_size);
        Rect::new(at.col as f64 * size, at.row as f64 * size, size, size)
    }

    pub fn cell_center(self, at: GridCoord) -> Point {
        self.cell_bounds(at).center()
    }
}

impl Default for RenderMetrics {
    fn default() -> Self {
        Self::compute(0, FALLBACK_SURFACE_WIDTH)
    }
}
