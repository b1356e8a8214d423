use crate::*;

/// Pointer gestures understood by the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerAction {
    /// Left click.
    Primary,
    /// Context click.
    Secondary,
}

impl PointerAction {
    pub const fn command_at(self, at: GridCoord) -> RemoteCommand {
        match self {
            Self::Primary => RemoteCommand::Reveal(at),
            Self::Secondary => RemoteCommand::ToggleFlag(at),
        }
    }

    pub const fn disposition(self) -> EventDisposition {
        match self {
            Self::Primary => EventDisposition::Default,
            Self::Secondary => EventDisposition::PreventDefault,
        }
    }
}

/// Whether the platform's default handling of an event must be suppressed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventDisposition {
    Default,
    PreventDefault,
}

/// Pointer event in viewport pixels together with the surface's top-left
/// corner in the same space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub client: Point,
    pub surface_origin: Point,
}

impl PointerEvent {
    pub const fn new(action: PointerAction, client: Point, surface_origin: Point) -> Self {
        Self {
            action,
            client,
            surface_origin,
        }
    }
}

/// Maps a viewport position to the cell under it.
///
/// The result is not checked against the board size; the engine rejects or
/// ignores coordinates outside of it. Only a zero cell size yields `None`.
pub fn map_pointer(client: Point, surface_origin: Point, cell_size: u32) -> Option<GridCoord> {
    if cell_size == 0 {
        return None;
    }

    let size = f64::from(cell_size);
    let dx = client.x - surface_origin.x;
    let dy = client.y - surface_origin.y;

    Some(GridCoord::new(
        (dy / size).floor() as Coord,
        (dx / size).floor() as Coord,
    ))
}
