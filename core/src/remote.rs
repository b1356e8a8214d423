use sweepview_protocol::{Difficulty, WireBoard};

use crate::*;

/// Request/response access to the authoritative engine.
///
/// Every call mutates (or reads) engine state and answers with the resulting
/// board. Futures are driven on the single UI thread and need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait RemoteEngine {
    async fn reveal(&self, at: GridCoord) -> Result<WireBoard, CommandError>;

    async fn toggle_flag(&self, at: GridCoord) -> Result<WireBoard, CommandError>;

    async fn new_game(&self, difficulty: Difficulty) -> Result<WireBoard, CommandError>;

    async fn board_state(&self) -> Result<WireBoard, CommandError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RemoteCommand {
    Reveal(GridCoord),
    ToggleFlag(GridCoord),
    NewGame(Difficulty),
    BoardState,
}

/// A command that did not produce a snapshot. The previous snapshot stays in
/// place; this is kept so the host can show a transient error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandFailure {
    pub command: RemoteCommand,
    pub error: CommandError,
}

/// Sends [`RemoteCommand`]s and turns answers into [`BoardSnapshot`]s.
#[derive(Debug)]
pub struct RemoteCommandClient<E> {
    engine: E,
}

impl<E: RemoteEngine> RemoteCommandClient<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub async fn execute(&self, command: RemoteCommand) -> Result<BoardSnapshot, CommandError> {
        use RemoteCommand::*;

        log::debug!("remote command: {:?}", command);
        let board = match command {
            Reveal(at) => self.engine.reveal(at).await,
            ToggleFlag(at) => self.engine.toggle_flag(at).await,
            NewGame(difficulty) => self.engine.new_game(difficulty).await,
            BoardState => self.engine.board_state().await,
        }?;

        Ok(BoardSnapshot::try_from(board)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use futures_executor::block_on;
    use sweepview_protocol::Cell;

    #[test]
    fn execute_forwards_coordinates_unchanged() {
        let engine = FakeEngine::new(wire_board(&[&[Cell::Hidden]]));
        let client = RemoteCommandClient::new(engine);

        block_on(client.execute(RemoteCommand::Reveal(GridCoord::new(0, 7)))).unwrap();
        block_on(client.execute(RemoteCommand::ToggleFlag(GridCoord::new(-2, 1)))).unwrap();

        assert_eq!(
            client.engine().calls(),
            vec![
                RemoteCommand::Reveal(GridCoord::new(0, 7)),
                RemoteCommand::ToggleFlag(GridCoord::new(-2, 1)),
            ]
        );
    }

    #[test]
    fn ragged_answer_is_an_error() {
        let mut board = wire_board(&[&[Cell::Hidden, Cell::Hidden], &[Cell::Hidden, Cell::Hidden]]);
        board.cells[0].push(Cell::Hidden.into());
        let client = RemoteCommandClient::new(FakeEngine::new(board));

        let result = block_on(client.execute(RemoteCommand::BoardState));

        assert!(matches!(
            result,
            Err(CommandError::Snapshot(SnapshotError::Ragged { row: 1, .. }))
        ));
    }

    #[test]
    fn engine_rejection_is_passed_through() {
        let engine = FakeEngine::new(wire_board(&[&[Cell::Hidden]]));
        engine.fail_next(CommandError::Rejected("Game is not ongoing".to_string()));
        let client = RemoteCommandClient::new(engine);

        assert_eq!(
            block_on(client.execute(RemoteCommand::Reveal(GridCoord::new(0, 0)))),
            Err(CommandError::Rejected("Game is not ongoing".to_string()))
        );
    }
}
