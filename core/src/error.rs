use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Board row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Board cells do not fit a {rows}x{columns} grid")]
    Shape { rows: usize, columns: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Engine rejected the command: {0}")]
    Rejected(String),
    #[error("Could not decode engine response: {0}")]
    Decode(String),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscribeError {
    #[error("Push channel unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Drawing surface failed: {0}")]
    Draw(String),
}
