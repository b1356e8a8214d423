//! Wire shapes exchanged with the remote minesweeper engine.
//!
//! The engine serializes its board with serde's default enum representation, so
//! cells arrive as `"Hidden"` or `{"Revealed": 3}`, optionally wrapped in a
//! `{"state": ...}` record.

use serde::{Deserialize, Deserializer, Serialize};

/// Push event carrying a full board after every engine-side change.
pub const BOARD_UPDATE_EVENT: &str = "board:update";

pub const REVEAL_CELL: &str = "reveal_cell";
pub const FLAG_CELL: &str = "flag_cell";
pub const NEW_GAME: &str = "new_game";
pub const GET_GAME_STATE: &str = "get_game_state";

/// HTTP route for a command name, as exposed by the engine's local API server.
pub fn api_route(command: &str) -> String {
    format!("/api/{command}")
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(alias = "easy")]
    Easy,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "hard")]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Argument accepted by the `new_game` command.
    pub const fn as_arg(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
        }
    }

    pub fn from_arg(arg: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_arg() == arg)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameProgress {
    Ongoing,
    Won,
    Lost,
}

impl GameProgress {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Hidden,
    Flagged,
    Bomb,
    Revealed(u32),
}

/// One grid entry as received.
///
/// Entries that are not a recognized [`Cell`] are kept verbatim instead of
/// failing the whole board, so the view can skip just that cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellSlot {
    Known(Cell),
    Unrecognized(serde_json::Value),
}

impl CellSlot {
    pub const fn known(&self) -> Option<Cell> {
        match self {
            Self::Known(cell) => Some(*cell),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<Cell> for CellSlot {
    fn from(cell: Cell) -> Self {
        Self::Known(cell)
    }
}

impl Default for CellSlot {
    fn default() -> Self {
        Self::Known(Cell::Hidden)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSlot {
    Bare(Cell),
    Wrapped { state: Cell },
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for CellSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawSlot::deserialize(deserializer)? {
            RawSlot::Bare(cell) | RawSlot::Wrapped { state: cell } => Self::Known(cell),
            RawSlot::Other(value) => Self::Unrecognized(value),
        })
    }
}

/// Board as the engine sends it, before the grid is checked for shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireBoard {
    pub difficulty: Difficulty,
    pub cells: Vec<Vec<CellSlot>>,
    #[serde(alias = "progress")]
    pub game_state: GameProgress,
    /// Absent until the engine starts tracking time.
    #[serde(default, alias = "elapsedSeconds")]
    pub time_elapsed: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRequest {
    pub row: i64,
    pub col: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameRequest {
    pub difficulty: String,
}

impl From<Difficulty> for NewGameRequest {
    fn from(difficulty: Difficulty) -> Self {
        Self {
            difficulty: difficulty.as_arg().to_string(),
        }
    }
}

pub fn decode_board(json: &str) -> serde_json::Result<WireBoard> {
    serde_json::from_str(json)
}
