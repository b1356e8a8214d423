//! Paints a [`BoardSnapshot`] onto a [`Surface`].
//!
//! Rendering only reads the snapshot and the metrics, so painting the same
//! input twice produces the same frame.

use std::borrow::Cow;

use sweepview_protocol::{Cell, CellSlot};

use crate::*;

pub const FLAG_GLYPH: &str = "🏳";
pub const BOMB_GLYPH: &str = "💣";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub drawn: usize,
    pub skipped: usize,
}

/// Background color and overlay glyph for a cell.
pub fn cell_paint(cell: Cell) -> (Color, Option<Cow<'static, str>>) {
    use Cell::*;
    match cell {
        Hidden => (Color::HIDDEN, None),
        Flagged => (Color::ALERT, Some(Cow::Borrowed(FLAG_GLYPH))),
        Bomb => (Color::ALERT, Some(Cow::Borrowed(BOMB_GLYPH))),
        // zero is drawn as a literal digit too
        Revealed(count) => (Color::REVEALED, Some(Cow::Owned(count.to_string()))),
    }
}

/// Clears the surface and draws every cell row by row.
///
/// Returns `None` without touching anything when either the surface or the
/// snapshot is missing. Cells that are not recognized are logged and left
/// undrawn; the rest of the board is still painted.
pub fn render<S: Surface + ?Sized>(
    surface: Option<&mut S>,
    snapshot: Option<&BoardSnapshot>,
    metrics: RenderMetrics,
) -> Option<RenderReport> {
    let (Some(surface), Some(snapshot)) = (surface, snapshot) else {
        log::warn!("Board or game state is not set, skipping render");
        return None;
    };

    surface.clear();

    let mut report = RenderReport::default();
    for (at, slot) in snapshot.iter_cells() {
        let CellSlot::Known(cell) = slot else {
            log::error!("Unknown cell state at ({}, {}): {:?}", at.row, at.col, slot);
            report.skipped += 1;
            continue;
        };

        match draw_cell(surface, at, *cell, metrics) {
            Ok(()) => report.drawn += 1,
            Err(err) => {
                log::error!("Could not draw cell ({}, {}): {}", at.row, at.col, err);
                report.skipped += 1;
            }
        }
    }

    log::trace!("rendered board: {:?}", report);
    Some(report)
}

fn draw_cell<S: Surface + ?Sized>(
    surface: &mut S,
    at: GridCoord,
    cell: Cell,
    metrics: RenderMetrics,
) -> Result<(), SurfaceError> {
    let bounds = metrics.cell_bounds(at);
    let (fill, glyph) = cell_paint(cell);

    surface.fill_rect(bounds, fill);
    surface.stroke_rect(bounds, Color::INK);

    if let Some(glyph) = glyph {
        surface.fill_text(&glyph, bounds.center(), metrics.glyph_size, Color::INK)?;
    }

    Ok(())
}
