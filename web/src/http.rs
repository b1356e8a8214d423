use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use gloo::net::http::{Request, Response};
use serde::Serialize;
use sweepview_core::{
    CommandError, Difficulty, GridCoord, PushChannel, RemoteEngine, SnapshotSink, SubscribeError,
    Subscription, WireBoard,
};
use sweepview_protocol::{
    CellRequest, FLAG_CELL, GET_GAME_STATE, NEW_GAME, NewGameRequest, REVEAL_CELL, api_route,
    decode_board,
};

fn transport_error(err: gloo::net::Error) -> CommandError {
    CommandError::Transport(err.to_string())
}

/// The engine's HTTP API, e.g. `POST {base}/api/reveal_cell`.
#[derive(Clone, Debug)]
pub(crate) struct HttpEngine {
    base: String,
}

impl HttpEngine {
    pub(crate) fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, command: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), api_route(command))
    }

    async fn post<B: Serialize>(&self, command: &str, body: &B) -> Result<WireBoard, CommandError> {
        let response = Request::post(&self.url(command))
            .json(body)
            .map_err(transport_error)?
            .send()
            .await
            .map_err(transport_error)?;
        Self::board_from(response).await
    }

    async fn board_from(response: Response) -> Result<WireBoard, CommandError> {
        let text = response.text().await.map_err(transport_error)?;
        if !response.ok() {
            log::debug!("engine answered {}: {}", response.status(), text);
            return Err(CommandError::Rejected(text));
        }
        Ok(decode_board(&text)?)
    }
}

impl RemoteEngine for HttpEngine {
    async fn reveal(&self, at: GridCoord) -> Result<WireBoard, CommandError> {
        let body = CellRequest {
            row: at.row,
            col: at.col,
        };
        self.post(REVEAL_CELL, &body).await
    }

    async fn toggle_flag(&self, at: GridCoord) -> Result<WireBoard, CommandError> {
        let body = CellRequest {
            row: at.row,
            col: at.col,
        };
        self.post(FLAG_CELL, &body).await
    }

    async fn new_game(&self, difficulty: Difficulty) -> Result<WireBoard, CommandError> {
        self.post(NEW_GAME, &NewGameRequest::from(difficulty)).await
    }

    async fn board_state(&self) -> Result<WireBoard, CommandError> {
        let response = Request::get(&self.url(GET_GAME_STATE))
            .send()
            .await
            .map_err(transport_error)?;
        Self::board_from(response).await
    }
}

struct NoSubscription;

impl Subscription for NoSubscription {
    fn unsubscribe(self: Box<Self>) {}
}

/// Push channel for transports that never push; the board only changes
/// through command answers.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct NoPush;

impl PushChannel for NoPush {
    fn subscribe(
        &self,
        _sink: SnapshotSink,
    ) -> LocalBoxFuture<'static, Result<Box<dyn Subscription>, SubscribeError>> {
        async { Ok(Box::new(NoSubscription) as Box<dyn Subscription>) }.boxed_local()
    }
}
