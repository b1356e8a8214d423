use ndarray::Array2;
use serde::{Deserialize, Serialize};
use sweepview_protocol::{CellSlot, Difficulty, GameProgress, WireBoard};

use crate::*;

/// Immutable board state published by the engine.
///
/// Cells are stored in an [`Array2`] indexed `[row, col]`, so every snapshot is
/// rectangular by construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    difficulty: Difficulty,
    cells: Array2<CellSlot>,
    progress: GameProgress,
    elapsed: Option<u64>,
}

impl BoardSnapshot {
    pub fn new(
        difficulty: Difficulty,
        cells: Array2<CellSlot>,
        progress: GameProgress,
        elapsed: Option<u64>,
    ) -> Self {
        Self {
            difficulty,
            cells,
            progress,
            elapsed,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn progress(&self) -> GameProgress {
        self.progress
    }

    pub fn elapsed(&self) -> Option<u64> {
        self.elapsed
    }

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn columns(&self) -> usize {
        self.cells.ncols()
    }

    pub fn cell_at(&self, at: GridCoord) -> Option<&CellSlot> {
        self.cells.get(at.to_nd_index()?)
    }

    /// Every cell with its position, row by row.
    pub fn iter_cells(&self) -> impl Iterator<Item = (GridCoord, &CellSlot)> {
        self.cells
            .indexed_iter()
            .map(|(index, slot)| (GridCoord::from(index), slot))
    }
}

impl TryFrom<WireBoard> for BoardSnapshot {
    type Error = SnapshotError;

    fn try_from(board: WireBoard) -> Result<Self, Self::Error> {
        let rows = board.cells.len();
        let columns = board.cells.first().map_or(0, Vec::len);

        if let Some((row, found)) = board
            .cells
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != columns)
        {
            return Err(SnapshotError::Ragged {
                row,
                expected: columns,
                found,
            });
        }

        let cells = Array2::from_shape_vec(
            (rows, columns),
            board.cells.into_iter().flatten().collect(),
        )
        .map_err(|_| SnapshotError::Shape { rows, columns })?;

        Ok(Self::new(
            board.difficulty,
            cells,
            board.game_state,
            board.time_elapsed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use sweepview_protocol::Cell;

    #[test]
    fn converts_rectangular_board_in_row_major_order() {
        let snapshot = snapshot_of(&[
            &[Cell::Hidden, Cell::Flagged, Cell::Bomb],
            &[Cell::Revealed(1), Cell::Revealed(0), Cell::Hidden],
        ]);

        assert_eq!(snapshot.rows(), 2);
        assert_eq!(snapshot.columns(), 3);
        assert_eq!(
            snapshot.cell_at(GridCoord::new(1, 0)),
            Some(&CellSlot::Known(Cell::Revealed(1)))
        );

        let order: Vec<_> = snapshot.iter_cells().map(|(at, _)| (at.row, at.col)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn rejects_ragged_rows() {
        let mut board = wire_board(&[&[Cell::Hidden, Cell::Hidden], &[Cell::Hidden, Cell::Hidden]]);
        board.cells[1].pop();

        assert_eq!(
            BoardSnapshot::try_from(board),
            Err(SnapshotError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn empty_board_is_accepted() {
        let snapshot = snapshot_of(&[]);
        assert_eq!((snapshot.rows(), snapshot.columns()), (0, 0));
        assert_eq!(snapshot.iter_cells().count(), 0);
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let snapshot = snapshot_of(&[&[Cell::Hidden]]);
        assert_eq!(snapshot.cell_at(GridCoord::new(-1, 0)), None);
        assert_eq!(snapshot.cell_at(GridCoord::new(0, 1)), None);
    }
}
