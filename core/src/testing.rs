//! Test doubles for the engine, the push channel, the input source and the
//! drawing surface.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use futures_channel::oneshot;
use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use sweepview_protocol::{Cell, CellSlot, Difficulty, GameProgress, WireBoard};

use crate::*;

pub(crate) fn wire_board(rows: &[&[Cell]]) -> WireBoard {
    WireBoard {
        difficulty: Difficulty::Easy,
        cells: rows
            .iter()
            .map(|row| row.iter().copied().map(CellSlot::from).collect())
            .collect(),
        game_state: GameProgress::Ongoing,
        time_elapsed: None,
    }
}

pub(crate) fn uniform_board(rows: usize, columns: usize, cell: Cell) -> WireBoard {
    WireBoard {
        cells: vec![vec![CellSlot::from(cell); columns]; rows],
        ..wire_board(&[])
    }
}

pub(crate) fn snapshot_with(rows: &[&[Cell]], progress: GameProgress) -> BoardSnapshot {
    let mut board = wire_board(rows);
    board.game_state = progress;
    BoardSnapshot::try_from(board).unwrap()
}

pub(crate) fn snapshot_of(rows: &[&[Cell]]) -> BoardSnapshot {
    snapshot_with(rows, GameProgress::Ongoing)
}

struct EngineState {
    board: RefCell<WireBoard>,
    calls: RefCell<Vec<RemoteCommand>>,
    failure: RefCell<Option<CommandError>>,
    gated: std::cell::Cell<bool>,
    gates: RefCell<VecDeque<oneshot::Sender<()>>>,
}

/// Engine answering every command with a preset board.
///
/// The board is captured when a command starts, so gated commands answer with
/// whatever was set at that time.
#[derive(Clone)]
pub(crate) struct FakeEngine {
    state: Rc<EngineState>,
}

impl FakeEngine {
    pub(crate) fn new(board: WireBoard) -> Self {
        Self {
            state: Rc::new(EngineState {
                board: RefCell::new(board),
                calls: RefCell::new(Vec::new()),
                failure: RefCell::new(None),
                gated: std::cell::Cell::new(false),
                gates: RefCell::new(VecDeque::new()),
            }),
        }
    }

    pub(crate) fn set_board(&self, board: WireBoard) {
        *self.state.board.borrow_mut() = board;
    }

    pub(crate) fn calls(&self) -> Vec<RemoteCommand> {
        self.state.calls.borrow().clone()
    }

    pub(crate) fn fail_next(&self, error: CommandError) {
        *self.state.failure.borrow_mut() = Some(error);
    }

    /// Holds every following answer until released.
    pub(crate) fn gate(&self) {
        self.state.gated.set(true);
    }

    pub(crate) fn release_next(&self) {
        let gate = self.state.gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            let _ = gate.send(());
        }
    }

    pub(crate) fn release_last(&self) {
        let gate = self.state.gates.borrow_mut().pop_back();
        if let Some(gate) = gate {
            let _ = gate.send(());
        }
    }

    async fn answer(&self, command: RemoteCommand) -> Result<WireBoard, CommandError> {
        self.state.calls.borrow_mut().push(command);
        let failure = self.state.failure.borrow_mut().take();
        let board = self.state.board.borrow().clone();

        if self.state.gated.get() {
            let (tx, rx) = oneshot::channel();
            self.state.gates.borrow_mut().push_back(tx);
            let _ = rx.await;
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(board),
        }
    }
}

impl RemoteEngine for FakeEngine {
    async fn reveal(&self, at: GridCoord) -> Result<WireBoard, CommandError> {
        self.answer(RemoteCommand::Reveal(at)).await
    }

    async fn toggle_flag(&self, at: GridCoord) -> Result<WireBoard, CommandError> {
        self.answer(RemoteCommand::ToggleFlag(at)).await
    }

    async fn new_game(&self, difficulty: Difficulty) -> Result<WireBoard, CommandError> {
        self.answer(RemoteCommand::NewGame(difficulty)).await
    }

    async fn board_state(&self) -> Result<WireBoard, CommandError> {
        self.answer(RemoteCommand::BoardState).await
    }
}

struct FakeSubscription {
    unsubscribed: Rc<RefCell<usize>>,
}

impl Subscription for FakeSubscription {
    fn unsubscribe(self: Box<Self>) {
        *self.unsubscribed.borrow_mut() += 1;
    }
}

/// Push channel whose setup resolves only when told to.
///
/// Boards pushed through it reach the sink whether or not setup completed.
#[derive(Default)]
pub(crate) struct FakeChannel {
    sink: RefCell<Option<SnapshotSink>>,
    pending: RefCell<Option<oneshot::Sender<Result<(), SubscribeError>>>>,
    unsubscribed: Rc<RefCell<usize>>,
}

impl FakeChannel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn resolve(&self) {
        self.finish(Ok(()));
    }

    pub(crate) fn reject(&self, reason: &str) {
        self.finish(Err(SubscribeError::Unavailable(reason.to_string())));
    }

    pub(crate) fn push(&self, board: WireBoard) {
        let sink = self.sink.borrow().clone();
        if let Some(sink) = sink {
            sink(board);
        }
    }

    pub(crate) fn unsubscribe_count(&self) -> usize {
        *self.unsubscribed.borrow()
    }

    fn finish(&self, result: Result<(), SubscribeError>) {
        let pending = self.pending.borrow_mut().take();
        if let Some(pending) = pending {
            let _ = pending.send(result);
        }
    }
}

impl PushChannel for FakeChannel {
    fn subscribe(
        &self,
        sink: SnapshotSink,
    ) -> LocalBoxFuture<'static, Result<Box<dyn Subscription>, SubscribeError>> {
        *self.sink.borrow_mut() = Some(sink);
        let (tx, rx) = oneshot::channel();
        *self.pending.borrow_mut() = Some(tx);
        let unsubscribed = self.unsubscribed.clone();

        async move {
            match rx.await {
                Ok(Ok(())) => Ok(Box::new(FakeSubscription { unsubscribed }) as Box<dyn Subscription>),
                Ok(Err(err)) => Err(err),
                Err(_) => Err(SubscribeError::Unavailable("setup dropped".to_string())),
            }
        }
        .boxed_local()
    }
}

type ActiveListeners = Rc<RefCell<Vec<(usize, InputHandlers)>>>;

struct FakeListeners {
    id: usize,
    active: ActiveListeners,
}

impl AttachedListeners for FakeListeners {
    fn detach(self: Box<Self>) {
        self.active.borrow_mut().retain(|(id, _)| *id != self.id);
    }
}

/// Input source dispatching synthetic clicks to every attached listener pair.
pub(crate) struct FakeInput {
    origin: Point,
    active: ActiveListeners,
    next_id: std::cell::Cell<usize>,
}

impl FakeInput {
    pub(crate) fn new(origin: Point) -> Self {
        Self {
            origin,
            active: Rc::default(),
            next_id: std::cell::Cell::new(0),
        }
    }

    pub(crate) fn active_listeners(&self) -> usize {
        self.active.borrow().len()
    }

    pub(crate) fn click(&self, client: Point) -> Vec<EventDisposition> {
        self.handlers()
            .iter()
            .map(|handlers| handlers.primary(client, self.origin))
            .collect()
    }

    pub(crate) fn context_click(&self, client: Point) -> Vec<EventDisposition> {
        self.handlers()
            .iter()
            .map(|handlers| handlers.secondary(client, self.origin))
            .collect()
    }

    fn handlers(&self) -> Vec<InputHandlers> {
        self.active
            .borrow()
            .iter()
            .map(|(_, handlers)| handlers.clone())
            .collect()
    }
}

impl InputSource for FakeInput {
    fn attach(&self, handlers: InputHandlers) -> Box<dyn AttachedListeners> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.active.borrow_mut().push((id, handlers));
        Box::new(FakeListeners {
            id,
            active: self.active.clone(),
        })
    }
}

/// Recording surface that stays inspectable after being handed over.
#[derive(Clone)]
pub(crate) struct TestSurface(Rc<RefCell<RecordingSurface>>);

impl TestSurface {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self(Rc::new(RefCell::new(RecordingSurface::new(width, height))))
    }

    pub(crate) fn ops(&self) -> Vec<DrawOp> {
        self.0.borrow().ops().to_vec()
    }

    pub(crate) fn frame(&self) -> Vec<DrawOp> {
        self.0.borrow().frame().to_vec()
    }
}

impl Surface for TestSurface {
    fn width(&self) -> u32 {
        self.0.borrow().width()
    }

    fn height(&self) -> u32 {
        self.0.borrow().height()
    }

    fn clear(&mut self) {
        self.0.borrow_mut().clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.0.borrow_mut().fill_rect(rect, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.0.borrow_mut().stroke_rect(rect, color);
    }

    fn fill_text(
        &mut self,
        text: &str,
        center: Point,
        font_px: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.0.borrow_mut().fill_text(text, center, font_px, color)
    }
}
