//! Engine access over Tauri IPC.
//!
//! Uses the `window.__TAURI__` global the desktop shell injects, so the page
//! needs no JS bundle of its own.

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use sweepview_core::{
    CommandError, Difficulty, GridCoord, PushChannel, RemoteEngine, SnapshotSink, SubscribeError,
    Subscription, WireBoard,
};
use sweepview_protocol::{
    BOARD_UPDATE_EVENT, CellRequest, FLAG_CELL, GET_GAME_STATE, NEW_GAME, NewGameRequest,
    REVEAL_CELL, decode_board,
};
use wasm_bindgen::prelude::*;

use crate::describe_js;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["window", "__TAURI__", "core"], js_name = invoke)]
    async fn tauri_invoke(command: &str, args: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["window", "__TAURI__", "event"], js_name = listen)]
    async fn tauri_listen(
        event: &str,
        handler: &Closure<dyn FnMut(JsValue)>,
    ) -> Result<JsValue, JsValue>;
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, CommandError> {
    let json = serde_json::to_string(value)?;
    js_sys::JSON::parse(&json).map_err(|err| CommandError::Decode(describe_js(&err)))
}

fn board_from_js(value: &JsValue) -> Result<WireBoard, CommandError> {
    let json = js_sys::JSON::stringify(value)
        .map_err(|err| CommandError::Decode(describe_js(&err)))?;
    Ok(decode_board(&String::from(json))?)
}

/// Commands answering with `Err(String)` reject with that string; anything
/// thrown is a failure to reach the engine at all.
fn invoke_error(err: JsValue) -> CommandError {
    match err.as_string() {
        Some(reason) => CommandError::Rejected(reason),
        None => CommandError::Transport(describe_js(&err)),
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct TauriEngine;

impl TauriEngine {
    async fn invoke<A: Serialize>(&self, command: &str, args: &A) -> Result<WireBoard, CommandError> {
        let answer = tauri_invoke(command, to_js(args)?)
            .await
            .map_err(invoke_error)?;
        board_from_js(&answer)
    }
}

impl RemoteEngine for TauriEngine {
    async fn reveal(&self, at: GridCoord) -> Result<WireBoard, CommandError> {
        let args = CellRequest {
            row: at.row,
            col: at.col,
        };
        self.invoke(REVEAL_CELL, &args).await
    }

    async fn toggle_flag(&self, at: GridCoord) -> Result<WireBoard, CommandError> {
        let args = CellRequest {
            row: at.row,
            col: at.col,
        };
        self.invoke(FLAG_CELL, &args).await
    }

    async fn new_game(&self, difficulty: Difficulty) -> Result<WireBoard, CommandError> {
        self.invoke(NEW_GAME, &NewGameRequest::from(difficulty))
            .await
    }

    async fn board_state(&self) -> Result<WireBoard, CommandError> {
        self.invoke(GET_GAME_STATE, &serde_json::Map::new()).await
    }
}

struct TauriSubscription {
    unlisten: js_sys::Function,
    _handler: Closure<dyn FnMut(JsValue)>,
}

impl Subscription for TauriSubscription {
    fn unsubscribe(self: Box<Self>) {
        if let Err(err) = self.unlisten.call0(&JsValue::NULL) {
            log::warn!("unlisten failed: {}", describe_js(&err));
        }
    }
}

/// `board:update` events emitted by the desktop shell.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct TauriChannel;

impl PushChannel for TauriChannel {
    fn subscribe(
        &self,
        sink: SnapshotSink,
    ) -> LocalBoxFuture<'static, Result<Box<dyn Subscription>, SubscribeError>> {
        let handler = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let payload = match js_sys::Reflect::get(&event, &JsValue::from_str("payload")) {
                Ok(payload) => payload,
                Err(err) => {
                    log::error!("board update without payload: {}", describe_js(&err));
                    return;
                }
            };
            match board_from_js(&payload) {
                Ok(board) => sink(board),
                Err(err) => log::error!("ignoring malformed board update: {}", err),
            }
        });

        async move {
            let unlisten = tauri_listen(BOARD_UPDATE_EVENT, &handler)
                .await
                .map_err(|err| SubscribeError::Unavailable(describe_js(&err)))?;
            let unlisten = unlisten.dyn_into::<js_sys::Function>().map_err(|_| {
                SubscribeError::Unavailable("listen did not return a function".to_string())
            })?;
            Ok(Box::new(TauriSubscription {
                unlisten,
                _handler: handler,
            }) as Box<dyn Subscription>)
        }
        .boxed_local()
    }
}
