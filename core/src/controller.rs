use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures_util::task::{LocalSpawn, LocalSpawnExt};
use sweepview_protocol::{Difficulty, WireBoard};

use crate::{
    BoardSnapshot, BoardStateStore, CommandFailure, EventDisposition, EventSubscriber,
    PointerAction, PointerEvent, Point, PushChannel, RemoteCommand, RemoteCommandClient,
    RemoteEngine, RenderMetrics, RenderReport, SnapshotOrigin, SnapshotSink, Surface, map_pointer,
};

pub type PointerHandler = Rc<dyn Fn(PointerEvent) -> EventDisposition>;

/// Listener record given to an [`InputSource`] when a surface is attached.
#[derive(Clone)]
pub struct InputHandlers {
    handler: PointerHandler,
}

impl InputHandlers {
    pub fn new(handler: PointerHandler) -> Self {
        Self { handler }
    }

    pub fn primary(&self, client: Point, surface_origin: Point) -> EventDisposition {
        (self.handler)(PointerEvent::new(
            PointerAction::Primary,
            client,
            surface_origin,
        ))
    }

    pub fn secondary(&self, client: Point, surface_origin: Point) -> EventDisposition {
        (self.handler)(PointerEvent::new(
            PointerAction::Secondary,
            client,
            surface_origin,
        ))
    }
}

/// The primary and secondary listeners bound to one surface.
pub trait AttachedListeners {
    fn detach(self: Box<Self>);
}

/// Platform side of a drawing surface that produces pointer events.
pub trait InputSource {
    /// Binds exactly one primary and one secondary listener.
    fn attach(&self, handlers: InputHandlers) -> Box<dyn AttachedListeners>;
}

type SharedSurface = Rc<RefCell<Option<Box<dyn Surface>>>>;

struct Inner<E> {
    store: Rc<RefCell<BoardStateStore>>,
    surface: SharedSurface,
    listeners: RefCell<Option<Box<dyn AttachedListeners>>>,
    subscriber: EventSubscriber,
    client: Rc<RemoteCommandClient<E>>,
    spawner: Rc<dyn LocalSpawn>,
    disposed: Rc<Cell<bool>>,
}

/// Keeps a surface in sync with the engine's board and forwards pointer input.
///
/// Cloning yields another handle to the same controller.
pub struct BoardController<E> {
    inner: Rc<Inner<E>>,
}

impl<E> Clone for BoardController<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E> PartialEq for BoardController<E> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E> core::fmt::Debug for BoardController<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BoardController")
            .field("store", &self.inner.store)
            .field("subscriber", &self.inner.subscriber)
            .field("disposed", &self.inner.disposed.get())
            .finish_non_exhaustive()
    }
}

impl<E: RemoteEngine + 'static> BoardController<E> {
    /// Creates the store and starts subscribing to board updates.
    pub fn new(engine: E, channel: &dyn PushChannel, spawner: Rc<dyn LocalSpawn>) -> Self {
        let store = Rc::new(RefCell::new(BoardStateStore::new()));
        let surface: SharedSurface = Rc::new(RefCell::new(None));
        let disposed = Rc::new(Cell::new(false));

        {
            let surface = surface.clone();
            store
                .borrow_mut()
                .set_observer(Box::new(move |snapshot, metrics| {
                    paint(&surface, snapshot, metrics);
                }));
        }

        let sink = push_sink(store.clone(), disposed.clone());
        let subscriber = EventSubscriber::start(channel, sink, &*spawner);

        Self {
            inner: Rc::new(Inner {
                store,
                surface,
                listeners: RefCell::new(None),
                subscriber,
                client: Rc::new(RemoteCommandClient::new(engine)),
                spawner,
                disposed,
            }),
        }
    }

    /// Moves the controller to `surface`.
    ///
    /// Listeners bound to the previous surface are detached first, so there is
    /// never more than one primary and one secondary listener active.
    pub fn set_surface(&self, surface: Box<dyn Surface>, input: &dyn InputSource) {
        let inner = &self.inner;
        if inner.disposed.get() {
            log::warn!("ignoring surface attached after dispose");
            return;
        }

        let previous = inner.listeners.borrow_mut().take();
        if let Some(previous) = previous {
            log::debug!("detaching listeners from previous surface");
            previous.detach();
        }

        let width = surface.width();
        *inner.surface.borrow_mut() = Some(surface);
        let listeners = input.attach(self.input_handlers());
        *inner.listeners.borrow_mut() = Some(listeners);

        inner.store.borrow_mut().set_surface_width(width);
        log::debug!("attached to {}px wide surface", width);

        if inner.store.borrow().snapshot().is_some() {
            self.render();
        }
    }

    /// Maps a pointer event to a cell and sends the matching command.
    pub fn handle_pointer(&self, event: PointerEvent) -> EventDisposition {
        let disposition = event.action.disposition();
        if self.inner.disposed.get() {
            return disposition;
        }

        let cell_size = {
            let store = self.inner.store.borrow();
            if store.snapshot().is_none() {
                log::debug!("no board yet, ignoring {:?}", event.action);
                return disposition;
            }
            store.metrics().cell_size
        };

        let Some(at) = map_pointer(event.client, event.surface_origin, cell_size) else {
            return disposition;
        };
        log::trace!("{:?} on cell ({}, {})", event.action, at.row, at.col);

        self.dispatch(event.action.command_at(at));
        disposition
    }

    pub fn new_game(&self, difficulty: Difficulty) {
        self.dispatch(RemoteCommand::NewGame(difficulty));
    }

    /// Asks the engine for its current board.
    pub fn refresh(&self) {
        self.dispatch(RemoteCommand::BoardState);
    }

    pub fn render(&self) -> Option<RenderReport> {
        let store = self.inner.store.borrow();
        let mut surface = self.inner.surface.borrow_mut();
        crate::render::render(surface.as_deref_mut(), store.snapshot(), store.metrics())
    }

    /// Engine elapsed time, `0` while unknown.
    pub fn duration(&self) -> u64 {
        self.inner.store.borrow().duration()
    }

    pub fn snapshot(&self) -> Option<BoardSnapshot> {
        self.inner.store.borrow().snapshot().cloned()
    }

    pub fn metrics(&self) -> RenderMetrics {
        self.inner.store.borrow().metrics()
    }

    pub fn last_failure(&self) -> Option<CommandFailure> {
        self.inner.store.borrow().last_failure().cloned()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Detaches input listeners and the push subscription and drops the board.
    ///
    /// Responses to commands still in flight are discarded when they arrive.
    /// Calling this again does nothing.
    pub fn dispose(&self) {
        let inner = &self.inner;
        if inner.disposed.replace(true) {
            return;
        }

        let listeners = inner.listeners.borrow_mut().take();
        if let Some(listeners) = listeners {
            listeners.detach();
        }
        inner.subscriber.dispose();
        inner.store.borrow_mut().clear();
        inner.surface.borrow_mut().take();
        log::debug!("board controller disposed");
    }

    fn input_handlers(&self) -> InputHandlers {
        let weak = Rc::downgrade(&self.inner);
        InputHandlers::new(Rc::new(move |event: PointerEvent| match weak.upgrade() {
            Some(inner) => BoardController { inner }.handle_pointer(event),
            None => event.action.disposition(),
        }))
    }

    fn dispatch(&self, command: RemoteCommand) {
        let inner = &self.inner;
        if inner.disposed.get() {
            return;
        }

        let seq = inner.store.borrow_mut().next_command_seq();
        let client = inner.client.clone();
        let store = inner.store.clone();
        let disposed = inner.disposed.clone();

        let task = async move {
            let result = client.execute(command).await;
            if disposed.get() {
                log::debug!("discarding response to {:?} after dispose", command);
                return;
            }

            let mut store = store.borrow_mut();
            match result {
                Ok(snapshot) => {
                    store.set_snapshot(snapshot, SnapshotOrigin::Command(seq));
                }
                Err(error) => store.record_failure(CommandFailure { command, error }),
            }
        };

        if let Err(err) = inner.spawner.spawn_local(task) {
            log::error!("could not spawn {:?}: {:?}", command, err);
        }
    }
}

fn paint(surface: &SharedSurface, snapshot: &BoardSnapshot, metrics: RenderMetrics) {
    match surface.try_borrow_mut() {
        Ok(mut surface) => {
            crate::render::render(surface.as_deref_mut(), Some(snapshot), metrics);
        }
        Err(_) => log::error!("surface busy, skipping render"),
    }
}

fn push_sink(store: Rc<RefCell<BoardStateStore>>, disposed: Rc<Cell<bool>>) -> SnapshotSink {
    Rc::new(move |board: WireBoard| {
        if disposed.get() {
            log::debug!("ignoring board update after dispose");
            return;
        }

        match BoardSnapshot::try_from(board) {
            Ok(snapshot) => {
                store
                    .borrow_mut()
                    .set_snapshot(snapshot, SnapshotOrigin::Push);
            }
            Err(err) => log::error!("ignoring malformed board update: {}", err),
        }
    })
}
