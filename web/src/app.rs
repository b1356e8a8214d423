use std::rc::Rc;

use futures_util::task::LocalSpawn;
use gloo::timers::callback::Interval;
use sweepview_core::{
    BoardController, CommandFailure, Difficulty, GameProgress, InputSource, RemoteEngine, Surface,
};
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use crate::Transport;
use crate::canvas::CanvasSurface;
use crate::http::{HttpEngine, NoPush};
use crate::listeners::CanvasHost;
use crate::spawn::BrowserSpawner;
use crate::tauri::{TauriChannel, TauriEngine};

/// What the view needs from a controller, whatever the transport.
trait BoardSession {
    fn set_surface(&self, surface: Box<dyn Surface>, input: &dyn InputSource);
    fn new_game(&self, difficulty: Difficulty);
    fn refresh(&self);
    fn duration(&self) -> u64;
    fn progress(&self) -> Option<GameProgress>;
    fn last_failure(&self) -> Option<CommandFailure>;
    fn dispose(&self);
}

impl<E: RemoteEngine + 'static> BoardSession for BoardController<E> {
    fn set_surface(&self, surface: Box<dyn Surface>, input: &dyn InputSource) {
        BoardController::set_surface(self, surface, input);
    }

    fn new_game(&self, difficulty: Difficulty) {
        BoardController::new_game(self, difficulty);
    }

    fn refresh(&self) {
        BoardController::refresh(self);
    }

    fn duration(&self) -> u64 {
        BoardController::duration(self)
    }

    fn progress(&self) -> Option<GameProgress> {
        self.snapshot().map(|snapshot| snapshot.progress())
    }

    fn last_failure(&self) -> Option<CommandFailure> {
        BoardController::last_failure(self)
    }

    fn dispose(&self) {
        BoardController::dispose(self);
    }
}

fn format_for_counter(secs: u64) -> String {
    match secs {
        0..1000 => format!("{:03}", secs),
        1000.. => "999".to_string(),
    }
}

fn progress_class(progress: Option<GameProgress>) -> &'static str {
    use GameProgress::*;
    match progress {
        None => "not-started",
        Some(Ongoing) => "in-progress",
        Some(Won) => "won",
        Some(Lost) => "lost",
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Status {
    secs: u64,
    progress: Option<GameProgress>,
    failure: Option<String>,
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct BoardViewProps {
    pub(crate) transport: Transport,
    pub(crate) api_base: AttrValue,
}

pub(crate) enum Msg {
    NewGame(Difficulty),
    UpdateTime,
}

pub(crate) struct BoardView {
    session: Box<dyn BoardSession>,
    canvas: NodeRef,
    status: Status,
    _timer_interval: Interval,
}

impl BoardView {
    const CANVAS_SIZE: u32 = 600;

    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(500, move || link.send_message(Msg::UpdateTime))
    }

    fn current_status(&self) -> Status {
        Status {
            // the engine reports milliseconds
            secs: self.session.duration() / 1000,
            progress: self.session.progress(),
            failure: self
                .session
                .last_failure()
                .map(|failure| failure.error.to_string()),
        }
    }
}

impl Component for BoardView {
    type Message = Msg;
    type Properties = BoardViewProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let spawner: Rc<dyn LocalSpawn> = Rc::new(BrowserSpawner);
        let session: Box<dyn BoardSession> = match props.transport {
            Transport::Tauri => Box::new(BoardController::new(TauriEngine, &TauriChannel, spawner)),
            Transport::Http => Box::new(BoardController::new(
                HttpEngine::new(props.api_base.to_string()),
                &NoPush,
                spawner,
            )),
        };
        session.refresh();

        Self {
            session,
            canvas: NodeRef::default(),
            status: Status::default(),
            _timer_interval: BoardView::create_timer(ctx),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            NewGame(difficulty) => {
                log::debug!("new game: {:?}", difficulty);
                self.session.new_game(difficulty);
                false
            }
            UpdateTime => {
                let status = self.current_status();
                if self.status != status {
                    self.status = status;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Status {
            secs,
            progress,
            failure,
        } = &self.status;
        let size = Self::CANVAS_SIZE.to_string();

        html! {
            <div class={"sweepview"}>
                <nav>
                    {
                        for Difficulty::ALL.iter().map(|&difficulty| {
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::NewGame(difficulty));
                            html! {
                                <button {onclick}>{difficulty.as_arg()}</button>
                            }
                        })
                    }
                    <aside class={classes!(progress_class(*progress))}>{format_for_counter(*secs)}</aside>
                </nav>
                <canvas ref={self.canvas.clone()} width={size.clone()} height={size}/>
                if let Some(failure) = failure {
                    <small class={"error"}>{failure.clone()}</small>
                }
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if !first_render {
            return;
        }

        let Some(canvas) = self.canvas.cast::<HtmlCanvasElement>() else {
            log::error!("canvas was not mounted");
            return;
        };
        match CanvasSurface::new(canvas.clone()) {
            Ok(surface) => self
                .session
                .set_surface(Box::new(surface), &CanvasHost::new(canvas)),
            Err(err) => log::error!("could not draw on canvas: {}", err),
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.session.dispose();
    }
}
